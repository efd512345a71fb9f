use sdlite_lexer::Location;

use crate::attribute::Attribute;
use crate::value::Value;

/// The qualified name synthesized for a value-led statement (glossary
/// "anonymous node").
pub const ANONYMOUS_NAME: &str = "content";

/// A single SDLang statement: a (possibly anonymous) name, positional
/// values, named attributes, and an optional child block.
///
/// `values` and `attributes` are in source order and are not deduplicated.
/// `children` is empty when no `{ ... }` block was present.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub qualified_name: Box<str>,
    pub location: Location,
    pub values: Box<[Value]>,
    pub attributes: Box<[Attribute]>,
    pub children: Box<[Node]>,
}

impl Node {
    /// Whether this node is the synthesized anonymous node. An
    /// anonymous node is only ever produced by the parser with at least one
    /// value; this just checks the name, which is also legal for a
    /// user-named node literally called `"content"`.
    pub fn is_anonymous(&self) -> bool {
        &*self.qualified_name == ANONYMOUS_NAME
    }

    /// Splits `qualified_name` on its single `:`, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.qualified_name.split_once(':').map(|(ns, _)| ns)
    }

    /// The unqualified name, with any `namespace:` prefix stripped.
    pub fn name(&self) -> &str {
        match self.qualified_name.split_once(':') {
            Some((_, name)) => name,
            None => &self.qualified_name,
        }
    }
}
