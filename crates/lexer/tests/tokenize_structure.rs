mod support;

use pretty_assertions::assert_eq;
use sdlite_lexer::{lex, TokenKind};
use support::{assert_eof, assert_token, lex_all};

#[test]
fn punctuation_tokens() {
    let source = b"{ } ; = : \\";
    let tokens = lex_all(source);
    assert_eq!(
        tokens.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        vec![
            TokenKind::BlockOpen,
            TokenKind::BlockClose,
            TokenKind::Semicolon,
            TokenKind::Assign,
            TokenKind::Namespace,
            TokenKind::Backslash,
        ]
    );
}

#[test]
fn carriage_return_newline_is_a_single_eol() {
    let source = b"foo\r\nbar";
    let mut lexer = lex(source, "test.sdl");
    assert_token(&lexer.next().unwrap(), source, TokenKind::Identifier, b"foo");
    assert_token(&lexer.next().unwrap(), source, TokenKind::Eol, b"\r\n");
    assert_token(&lexer.next().unwrap(), source, TokenKind::Identifier, b"bar");
}

#[test]
fn eof_is_repeatable_but_iterator_stops_after_first() {
    let mut lexer = lex(b"", "test.sdl");
    let first = lexer.next_token();
    assert_eof(&first);
    let second = lexer.next_token();
    assert_eof(&second);
    assert!(lexer.next().is_none());
}

#[test]
fn line_and_block_comments_are_tokenized_but_filtered_by_kind() {
    let source = b"// line\n/* block */ foo # hash";
    let tokens = lex_all(source);
    let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, vec![TokenKind::Comment, TokenKind::Eol, TokenKind::Comment, TokenKind::Identifier, TokenKind::Comment]);
}

#[test]
fn unterminated_block_comment_is_invalid() {
    let tokens = lex_all(b"/* never closes");
    assert_eq!(tokens[0].0, TokenKind::Invalid);
}

#[test]
fn slash_not_followed_by_slash_or_star_is_invalid() {
    let tokens = lex_all(b"/x");
    assert_eq!(tokens[0].0, TokenKind::Invalid);
}

#[test]
fn quoted_string_with_escapes() {
    let source = br#""a\"b\\c\n\t""#;
    let tokens = lex_all(source);
    assert_eq!(tokens, vec![(TokenKind::Text, source.to_vec())]);
}

#[test]
fn quoted_string_line_continuation_is_swallowed_by_lexer() {
    let source = b"\"a\\\n   b\"";
    let tokens = lex_all(source);
    assert_eq!(tokens[0].0, TokenKind::Text);
}

#[test]
fn unterminated_quoted_string_is_invalid() {
    let tokens = lex_all(b"\"never closes");
    assert_eq!(tokens[0].0, TokenKind::Invalid);
}

#[test]
fn raw_newline_inside_quoted_string_is_invalid() {
    let tokens = lex_all(b"\"a\nb\"");
    assert_eq!(tokens[0].0, TokenKind::Invalid);
}

#[test]
fn wysiwyg_string_passes_through_raw() {
    let source = b"`a\\nb`";
    let tokens = lex_all(source);
    assert_eq!(tokens, vec![(TokenKind::Text, source.to_vec())]);
}

#[test]
fn binary_block_requires_base64_padding() {
    assert_eq!(lex_all(b"[YWJj]")[0].0, TokenKind::Binary);
    assert_eq!(lex_all(b"[YWJjZA]")[0].0, TokenKind::Invalid);
}

#[test]
fn binary_block_ignores_embedded_whitespace() {
    let tokens = lex_all(b"[YWJj\n YWJj]");
    assert_eq!(tokens[0].0, TokenKind::Binary);
}

#[test]
fn identifiers_allow_dash_dot_dollar_underscore() {
    let tokens = lex_all(b"foo-bar.baz_$qux");
    assert_eq!(tokens, vec![(TokenKind::Identifier, b"foo-bar.baz_$qux".to_vec())]);
}

#[test]
fn keyword_prefixed_identifiers_stay_identifiers() {
    for source in [b"on_site".as_slice(), b"off_peak".as_slice(), b"null_value".as_slice(), b"trueish".as_slice()] {
        let tokens = lex_all(source);
        assert_eq!(tokens[0].0, TokenKind::Identifier, "{:?} should lex as an identifier", source);
    }
}

#[test]
fn true_false_on_off_are_boolean_tokens() {
    for source in [b"true".as_slice(), b"false".as_slice(), b"on".as_slice(), b"off".as_slice()] {
        assert_eq!(lex_all(source)[0].0, TokenKind::Boolean);
    }
}

#[test]
fn null_is_its_own_token_kind() {
    assert_eq!(lex_all(b"null")[0].0, TokenKind::Null);
}

#[test]
fn unicode_identifier_start() {
    let tokens = lex_all("\u{e9}cole".as_bytes());
    assert_eq!(tokens[0].0, TokenKind::Identifier);
}
