//! Recursive-descent parser and SDLang generator built on
//! [`sdlite_lexer`] and [`sdlite_dom`].
//!
//! This is the crate most consumers depend on directly: it re-exports the
//! lexer's and DOM's public types alongside its own `parse`/
//! `parse_document`/`generate` entry points, so `use sdlite_parser::*`
//! is enough to work with a document end to end.

mod context;
mod generator;
mod parser;
mod token_stream;

pub use crate::generator::{escape_sdl_string, generate, generate_to_string, write_float, write_float32};
pub use crate::parser::{parse, parse_document};

pub use sdlite_dom::{
    decode_value, Attribute, CivilDate, CivilDateTime, CivilTime, DateTimeValue, Hnsecs, Node, Pool, SdlError,
    SdlErrorKind, TokenDecode, Timezone, Value, ANONYMOUS_NAME,
};
pub use sdlite_lexer::{lex, Lexer, Location, Token, TokenKind};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_and_regenerates_simple_document() {
        let input = b"foo \"bar\"\nbaz 1 2 3 {\n  qux true\n}\n";
        let nodes = parse_document(input, "test.sdl").expect("parses");
        assert_eq!(nodes.len(), 2);
        assert_eq!(&*nodes[0].qualified_name, "foo");
        assert_eq!(&*nodes[1].qualified_name, "baz");
        assert_eq!(nodes[1].children.len(), 1);

        let rendered = generate_to_string(&nodes);
        assert_eq!(rendered, "foo \"bar\"\nbaz 1 2 3 {\n\tqux true\n}\n");
    }

    #[test]
    fn node_with_values_and_a_child_block_keeps_its_own_values() {
        // A regression test for pool cross-contamination: the child's
        // `parse_values`/`parse_attributes` must not drain values this
        // node already collected before `parse_block` recurses.
        let nodes = parse_document(b"baz 1 2 3 {\n\tqux true\n}\n", "test.sdl").expect("parses");
        assert_eq!(nodes.len(), 1);
        assert_eq!(&*nodes[0].qualified_name, "baz");
        assert_eq!(nodes[0].values, vec![Value::I32(1), Value::I32(2), Value::I32(3)].into_boxed_slice());
        assert_eq!(nodes[0].children.len(), 1);
        assert_eq!(&*nodes[0].children[0].qualified_name, "qux");
        assert_eq!(nodes[0].children[0].values, vec![Value::Bool(true)].into_boxed_slice());
    }

    #[test]
    fn anonymous_node_without_values_is_an_error() {
        let err = parse_document(b":\n", "test.sdl").unwrap_err();
        assert!(err.to_string().contains("values for anonymous node"));
    }

    #[test]
    fn unexpected_equals_reports_end_of_node() {
        let err = parse_document(b"foo=bar\n", "test.sdl").unwrap_err();
        assert!(err.to_string().contains("expected end of node"));
    }

    #[test]
    fn dangling_namespace_colon_expects_identifier() {
        let err = parse_document(b"foo:\n", "test.sdl").unwrap_err();
        assert!(err.to_string().contains("expected identifier"));
    }

    #[test]
    fn backslash_not_followed_by_eol_is_an_error() {
        let err = parse_document(b"foo \"bar\" \\ \"bar\"\n", "test.sdl").unwrap_err();
        assert!(err.to_string().contains("Expected EOL after backslash"));
    }

    #[test]
    fn backslash_continuation_joins_lines() {
        let nodes = parse_document(b"foo \\\n  null\nbar\n", "test.sdl").expect("parses");
        assert_eq!(nodes.len(), 2);
        assert_eq!(&*nodes[0].qualified_name, "foo");
        assert_eq!(nodes[0].values.len(), 1);
        assert_eq!(&*nodes[1].qualified_name, "bar");
    }
}
