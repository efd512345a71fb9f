use sdlite_dom::{Attribute, Node, Pool, Value};

/// The pool appenders a single `parse` call shares across every node it
/// builds. Not safe to share across threads or across independent
/// `parse` calls: it is local to one call and recycled between siblings,
/// never between unrelated documents.
pub(crate) struct ParserContext {
    pub(crate) values: Pool<Value>,
    pub(crate) attributes: Pool<Attribute>,
    pub(crate) chars: Pool<u8>,
    pub(crate) bytes: Pool<u8>,
    /// Per-depth node appenders, grown on demand. `nodes[d]`
    /// is reused across every sibling block at nesting depth `d`, so peak
    /// pool memory is bounded by the sum of sibling widths along the
    /// current path rather than by the whole tree.
    nodes: Vec<Pool<Node>>,
}

impl ParserContext {
    pub(crate) fn new() -> Self {
        ParserContext { values: Pool::new(), attributes: Pool::new(), chars: Pool::new(), bytes: Pool::new(), nodes: Vec::new() }
    }

    pub(crate) fn nodes_pool(&mut self, depth: usize) -> &mut Pool<Node> {
        while self.nodes.len() <= depth {
            self.nodes.push(Pool::new());
        }
        &mut self.nodes[depth]
    }
}
