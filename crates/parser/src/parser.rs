use sdlite_dom::{decode_value, Attribute, Node, SdlError, SdlErrorKind, Value, ANONYMOUS_NAME};
use sdlite_lexer::{Token, TokenKind};

use crate::context::ParserContext;
use crate::token_stream::TokenFilter;

/// Recursive-descent consumer of the (comment-filtered, line-continuation
/// aware) token stream, building [`Node`] records.
struct Parser<'source> {
    source: &'source [u8],
    tokens: TokenFilter<'source>,
    ctx: ParserContext,
}

impl<'source> Parser<'source> {
    fn new(source: &'source [u8], filename: &str) -> Self {
        Parser { source, tokens: TokenFilter::new(source, filename), ctx: ParserContext::new() }
    }

    fn describe_token(&self, token: &Token) -> String {
        match token.kind {
            TokenKind::Invalid => format!("malformed token '{}'", String::from_utf8_lossy(token.text(self.source))),
            TokenKind::Identifier => format!("identifier '{}'", String::from_utf8_lossy(token.text(self.source))),
            _ => token.kind.expected_phrase().to_string(),
        }
    }

    fn unexpected(&self, token: &Token, expected: &str) -> SdlError {
        let message = format!("Unexpected {}, expected {}", self.describe_token(token), expected);
        SdlError::new(SdlErrorKind::UnexpectedToken, token.location.clone(), message)
    }

    fn skip_separators(&mut self) -> Result<(), SdlError> {
        loop {
            match self.tokens.peek()?.kind {
                TokenKind::Eol | TokenKind::Semicolon => {
                    self.tokens.next()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Runs the top-level `document := nodes EOF` production, invoking
    /// `on_node` once per completed top-level node in source order.
    /// Top-level nodes are never pooled: each is handed to the callback and
    /// forgotten immediately, matching the streaming contract.
    fn run(&mut self, on_node: &mut dyn FnMut(Node) -> Result<(), SdlError>) -> Result<(), SdlError> {
        loop {
            self.skip_separators()?;
            if self.tokens.peek()?.kind == TokenKind::Eof {
                return Ok(());
            }
            let node = self.parse_node(0)?;
            on_node(node)?;
        }
    }

    /// `nodes := (eol | ';')* (node ((eol | ';')+ node?)*)?`, collecting
    /// siblings into the per-depth node appender.
    fn parse_nodes(&mut self, depth: usize) -> Result<Box<[Node]>, SdlError> {
        loop {
            self.skip_separators()?;
            match self.tokens.peek()?.kind {
                TokenKind::Eof | TokenKind::BlockClose => break,
                _ => {
                    let node = self.parse_node(depth + 1)?;
                    self.ctx.nodes_pool(depth).put(node);
                }
            }
        }
        Ok(self.ctx.nodes_pool(depth).extract_array())
    }

    /// `node := qname? values attributes block?`. `depth` is the pool
    /// index this node's own children (if any) will be collected into.
    fn parse_node(&mut self, depth: usize) -> Result<Node, SdlError> {
        let location = self.tokens.peek()?.location.clone();

        let is_anonymous = self.tokens.peek()?.kind != TokenKind::Identifier;
        let qualified_name: Box<str> = if is_anonymous { ANONYMOUS_NAME.into() } else { self.parse_qname()?.into() };

        let values = self.parse_values()?;

        if is_anonymous && values.is_empty() {
            let token = self.tokens.peek()?.clone();
            return Err(self.unexpected(&token, "values for anonymous node"));
        }

        let attributes = self.parse_attributes()?;

        let has_block = self.tokens.peek()?.kind == TokenKind::BlockOpen;
        let children = if has_block { self.parse_block(depth)? } else { Box::new([]) as Box<[Node]> };

        self.check_end_of_node(has_block)?;

        Ok(Node { qualified_name, location, values, attributes, children })
    }

    /// `qname := ident (':' ident)?`. The leading `ident` is assumed
    /// already confirmed present by the caller's peek.
    fn parse_qname(&mut self) -> Result<String, SdlError> {
        let first = self.tokens.next()?;
        let mut name = String::from_utf8_lossy(first.text(self.source)).into_owned();
        if self.tokens.peek()?.kind == TokenKind::Namespace {
            self.tokens.next()?;
            let second = self.tokens.next()?;
            if second.kind != TokenKind::Identifier {
                return Err(self.unexpected(&second, "identifier"));
            }
            name.push(':');
            name.push_str(&String::from_utf8_lossy(second.text(self.source)));
        }
        Ok(name)
    }

    /// `values := value*`: every scalar-kind token up to the first
    /// identifier, `=`, `{`, or end-of-node marker. Extracts the shared
    /// value pool before returning, so a nested `parse_block` call (which
    /// may recurse into sibling nodes sharing the same pool) can never
    /// drain values this node has already collected.
    fn parse_values(&mut self) -> Result<Box<[Value]>, SdlError> {
        loop {
            let token = self.tokens.peek()?.clone();
            if !token.kind.is_scalar() {
                return Ok(self.ctx.values.extract_array());
            }
            self.tokens.next()?;
            let value = decode_value(&token, self.source, &mut self.ctx.chars, &mut self.ctx.bytes)?;
            self.ctx.values.put(value);
        }
    }

    /// `attributes := (ident (':' ident)? '=' value)*`. Extracts the
    /// shared attribute pool before returning, for the same reason
    /// `parse_values` does.
    fn parse_attributes(&mut self) -> Result<Box<[Attribute]>, SdlError> {
        loop {
            if self.tokens.peek()?.kind != TokenKind::Identifier {
                return Ok(self.ctx.attributes.extract_array());
            }
            let first = self.tokens.next()?;
            let mut name = String::from_utf8_lossy(first.text(self.source)).into_owned();
            if self.tokens.peek()?.kind == TokenKind::Namespace {
                self.tokens.next()?;
                let second = self.tokens.next()?;
                if second.kind != TokenKind::Identifier {
                    return Err(self.unexpected(&second, "identifier"));
                }
                name.push(':');
                name.push_str(&String::from_utf8_lossy(second.text(self.source)));
            }

            let eq = self.tokens.peek()?.clone();
            if eq.kind != TokenKind::Assign {
                return Err(self.unexpected(&eq, "'='"));
            }
            self.tokens.next()?;

            let value_token = self.tokens.peek()?.clone();
            if !value_token.kind.is_scalar() {
                return Err(self.unexpected(&value_token, "value"));
            }
            self.tokens.next()?;
            let value = decode_value(&value_token, self.source, &mut self.ctx.chars, &mut self.ctx.bytes)?;
            self.ctx.attributes.put(Attribute::new(name, value));
        }
    }

    /// `block := '{' eol nodes '}' (eol | EOF)`. The trailing `(eol | EOF)`
    /// is verified by the caller via `check_end_of_node`, not here.
    fn parse_block(&mut self, depth: usize) -> Result<Box<[Node]>, SdlError> {
        self.tokens.next()?; // '{'
        let after_open = self.tokens.peek()?.clone();
        if after_open.kind != TokenKind::Eol {
            return Err(self.unexpected(&after_open, "end of line"));
        }
        self.tokens.next()?;

        let children = self.parse_nodes(depth)?;

        let close = self.tokens.peek()?.clone();
        if close.kind != TokenKind::BlockClose {
            return Err(self.unexpected(&close, "'}'"));
        }
        self.tokens.next()?;
        Ok(children)
    }

    fn check_end_of_node(&mut self, has_block: bool) -> Result<(), SdlError> {
        let token = self.tokens.peek()?.clone();
        let ok = if has_block {
            matches!(token.kind, TokenKind::Eol | TokenKind::Eof)
        } else {
            matches!(token.kind, TokenKind::Eol | TokenKind::Semicolon | TokenKind::Eof)
        };
        if ok {
            Ok(())
        } else {
            Err(self.unexpected(&token, "end of node"))
        }
    }
}

/// Parses `input` (from `filename`, used only in error locations) and calls
/// `on_node` once per completed top-level node, in source order.
/// Returns the first error raised by either the grammar or by
/// `on_node` itself; parsing never resynchronizes after an error.
pub fn parse<F>(input: &[u8], filename: &str, mut on_node: F) -> Result<(), SdlError>
where
    F: FnMut(Node) -> Result<(), SdlError>,
{
    Parser::new(input, filename).run(&mut on_node)
}

/// Convenience wrapper collecting every top-level node into a `Vec`, for
/// callers that would rather build a tree than stream through a callback.
/// Does not change the streaming contract of [`parse`] itself — it is
/// built entirely out of the public callback API.
pub fn parse_document(input: &[u8], filename: &str) -> Result<Vec<Node>, SdlError> {
    let mut nodes = Vec::new();
    parse(input, filename, |node| {
        nodes.push(node);
        Ok(())
    })?;
    Ok(nodes)
}
