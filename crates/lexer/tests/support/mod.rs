use pretty_assertions::assert_eq;
use sdlite_lexer::{Token, TokenKind};

/// Asserts a token's kind and text (sliced out of `source`) match.
pub fn assert_token(token: &Token, source: &[u8], kind: TokenKind, text: &[u8]) {
    assert_eq!(token.kind, kind);
    assert_eq!(token.text(source), text);
}

pub fn assert_eof(token: &Token) {
    assert_eq!(token.kind, TokenKind::Eof);
}

/// Lexes the whole input and returns every non-EOF token's kind/text pair,
/// so scenario tests can assert on full token streams at a glance.
pub fn lex_all(source: &[u8]) -> Vec<(TokenKind, Vec<u8>)> {
    sdlite_lexer::lex(source, "test.sdl")
        .map(|t| (t.kind, t.text(source).to_vec()))
        .filter(|(kind, _)| *kind != TokenKind::Eof)
        .collect()
}
