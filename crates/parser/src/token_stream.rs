use sdlite_dom::{SdlError, SdlErrorKind};
use sdlite_lexer::{lex, Lexer, Token, TokenKind};

/// The derived token stream the parser actually consumes: comments
/// are dropped and a `\` immediately followed by an end-of-line is elided
/// (both tokens consumed, gluing the physical lines together while still
/// letting the lexer count them). Any other token after a `\` is a syntax
/// error raised right here, before the parser's grammar ever sees it.
pub(crate) struct TokenFilter<'source> {
    lexer: Lexer<'source>,
    peeked: Option<Token>,
}

impl<'source> TokenFilter<'source> {
    pub(crate) fn new(source: &'source [u8], filename: &str) -> Self {
        TokenFilter { lexer: lex(source, filename), peeked: None }
    }

    fn fill(&mut self) -> Result<(), SdlError> {
        loop {
            let mut token = self.lexer.next().expect("lexer always yields at least one token");
            while token.kind == TokenKind::Comment {
                token = self.lexer.next().expect("lexer always yields at least one token");
            }
            if token.kind == TokenKind::Backslash {
                let after = self.lexer.next().expect("lexer always yields at least one token");
                if after.kind != TokenKind::Eol {
                    return Err(SdlError::new(SdlErrorKind::BackslashNotFollowedByEol, token.location, "Expected EOL after backslash"));
                }
                continue;
            }
            self.peeked = Some(token);
            return Ok(());
        }
    }

    pub(crate) fn peek(&mut self) -> Result<&Token, SdlError> {
        if self.peeked.is_none() {
            self.fill()?;
        }
        Ok(self.peeked.as_ref().expect("just filled"))
    }

    pub(crate) fn next(&mut self) -> Result<Token, SdlError> {
        if self.peeked.is_none() {
            self.fill()?;
        }
        Ok(self.peeked.take().expect("just filled"))
    }
}
