use std::rc::Rc;

use crate::cursor::Cursor;
use crate::location::Location;
use crate::token::{Token, TokenKind};

/// A forward stateful iterator over a UTF-8 byte stream, producing a stream
/// of [`Token`]s. The lexer never decodes scalar values and never
/// raises: a malformed construct surfaces as a single `TokenKind::Invalid`
/// token whose text covers the failed extent, leaving the decision to
/// reject entirely to the parser.
pub struct Lexer<'source> {
    source: &'source [u8],
    cursor: Cursor<'source>,
    filename: Rc<str>,
    line: u32,
    column: u32,
    eof_emitted: bool,
}

type Mark<'source> = (Cursor<'source>, u32, u32);

impl<'source> Lexer<'source> {
    pub fn new(source: &'source [u8], filename: &str) -> Self {
        Lexer { source, cursor: Cursor::new(source), filename: Rc::from(filename), line: 0, column: 0, eof_emitted: false }
    }

    /// Produce the next token. Safe to call again after an `Eof` token has
    /// been returned; it keeps returning `Eof`.
    pub fn next_token(&mut self) -> Token {
        let whitespace_start = self.cursor.position();
        self.skip_spaces_and_tabs();
        let whitespace_end = self.cursor.position();
        let location = self.current_location();
        let text_start = self.cursor.position();

        let kind = if self.cursor.is_eof() { TokenKind::Eof } else { self.classify() };

        let text_end = self.cursor.position();
        Token { kind, location, whitespace_prefix: whitespace_start..whitespace_end, text: text_start..text_end }
    }

    fn current_location(&self) -> Location {
        Location { file: self.filename.clone(), line: self.line, column: self.column, offset: self.cursor.position() as u64 }
    }

    fn mark(&self) -> Mark<'source> {
        (self.cursor, self.line, self.column)
    }

    fn reset(&mut self, mark: Mark<'source>) {
        self.cursor = mark.0;
        self.line = mark.1;
        self.column = mark.2;
    }

    /// Advance by one logical unit: a lone byte, or a `\r\n` pair merged
    /// into a single line break. This is the only
    /// place position/line/column bookkeeping happens, so every scanner
    /// below — string bodies, comments, base64 blocks — gets correct
    /// tracking for free, including embedded EOLs inside WYSIWYG strings.
    fn bump(&mut self) -> Option<u8> {
        let byte = self.cursor.advance()?;
        match byte {
            b'\r' => {
                if self.cursor.peek() == Some(b'\n') {
                    self.cursor.advance();
                }
                self.line += 1;
                self.column = 0;
            }
            b'\n' => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        Some(byte)
    }

    fn skip_spaces_and_tabs(&mut self) {
        while matches!(self.cursor.peek(), Some(b' ') | Some(b'\t')) {
            self.bump();
        }
    }

    fn decode_char_at_cursor(&self) -> Option<(char, usize)> {
        let remaining = self.cursor.remaining();
        let lead = *remaining.first()?;
        let len = utf8_char_len(lead);
        let slice = remaining.get(..len)?;
        let s = std::str::from_utf8(slice).ok()?;
        let ch = s.chars().next()?;
        Some((ch, len))
    }

    fn consume_ident_continuation(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(b) if b.is_ascii() => {
                    if is_ident_continue_ascii(b) {
                        self.bump();
                    } else {
                        break;
                    }
                }
                Some(_) => match self.decode_char_at_cursor() {
                    Some((ch, len)) if ch.is_alphabetic() => {
                        for _ in 0..len {
                            self.bump();
                        }
                    }
                    _ => break,
                },
                None => break,
            }
        }
    }

    fn classify(&mut self) -> TokenKind {
        match self.cursor.peek().expect("classify called at eof") {
            b'\r' | b'\n' => {
                self.bump();
                TokenKind::Eol
            }
            b'/' => self.scan_slash(),
            b'-' if self.cursor.peek_by(1) == Some(b'-') => {
                self.bump();
                self.bump();
                self.scan_line_comment();
                TokenKind::Comment
            }
            b'-' if matches!(self.cursor.peek_by(1), Some(b) if b.is_ascii_digit()) => {
                self.bump();
                self.scan_numeric()
            }
            b'#' => {
                self.bump();
                self.scan_line_comment();
                TokenKind::Comment
            }
            b'"' => self.scan_quoted_string(),
            b'`' => self.scan_wysiwyg_string(),
            b'[' => self.scan_binary(),
            b'{' => {
                self.bump();
                TokenKind::BlockOpen
            }
            b'}' => {
                self.bump();
                TokenKind::BlockClose
            }
            b';' => {
                self.bump();
                TokenKind::Semicolon
            }
            b'=' => {
                self.bump();
                TokenKind::Assign
            }
            b':' => {
                self.bump();
                TokenKind::Namespace
            }
            b'\\' => {
                self.bump();
                TokenKind::Backslash
            }
            b'0'..=b'9' => self.scan_numeric(),
            b if b.is_ascii_alphabetic() || b == b'_' => self.scan_identifier(),
            _ => self.scan_unicode_or_invalid(),
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        self.bump();
        match self.cursor.peek() {
            Some(b'/') => {
                self.bump();
                self.scan_line_comment();
                TokenKind::Comment
            }
            Some(b'*') => {
                self.bump();
                self.scan_block_comment()
            }
            _ => TokenKind::Invalid,
        }
    }

    fn scan_line_comment(&mut self) {
        while let Some(b) = self.cursor.peek() {
            if b == b'\r' || b == b'\n' {
                break;
            }
            self.bump();
        }
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        loop {
            match self.cursor.peek() {
                None => return TokenKind::Invalid,
                Some(b'*') if self.cursor.peek_by(1) == Some(b'/') => {
                    self.bump();
                    self.bump();
                    return TokenKind::Comment;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn scan_quoted_string(&mut self) -> TokenKind {
        self.bump(); // opening quote
        loop {
            match self.cursor.peek() {
                None => return TokenKind::Invalid,
                Some(b'"') => {
                    self.bump();
                    return TokenKind::Text;
                }
                Some(b'\\') => {
                    self.bump();
                    match self.cursor.peek() {
                        Some(b'"') | Some(b'\\') | Some(b'n') | Some(b'r') | Some(b't') => {
                            self.bump();
                        }
                        Some(b'\r') | Some(b'\n') => {
                            self.bump(); // merges \r\n as one line break
                            self.skip_spaces_and_tabs();
                        }
                        _ => return TokenKind::Invalid,
                    }
                }
                Some(b'\r') | Some(b'\n') => return TokenKind::Invalid,
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn scan_wysiwyg_string(&mut self) -> TokenKind {
        self.bump(); // opening backtick
        loop {
            match self.cursor.peek() {
                None => return TokenKind::Invalid,
                Some(b'`') => {
                    self.bump();
                    return TokenKind::Text;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn scan_binary(&mut self) -> TokenKind {
        self.bump(); // '['
        let mut base64_chars = 0usize;
        loop {
            match self.cursor.peek() {
                None => return TokenKind::Invalid,
                Some(b']') => {
                    self.bump();
                    return if base64_chars % 4 == 0 { TokenKind::Binary } else { TokenKind::Invalid };
                }
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.bump();
                }
                Some(b) if b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=' => {
                    self.bump();
                    base64_chars += 1;
                }
                Some(_) => return TokenKind::Invalid,
            }
        }
    }

    fn consume_digits(&mut self) {
        while matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
            self.bump();
        }
    }

    /// `:integer`, used by both the duration and time-of-day sub-grammars.
    fn consume_colon_digits(&mut self) -> bool {
        if self.cursor.peek() != Some(b':') {
            return false;
        }
        self.bump();
        if !matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
            return false;
        }
        self.consume_digits();
        true
    }

    fn maybe_consume_fraction(&mut self) -> bool {
        if self.cursor.peek() == Some(b'.') {
            self.bump();
            if !matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
                return false;
            }
            self.consume_digits();
        }
        true
    }

    /// Entered on an ASCII digit, possibly after a leading `-` already
    /// consumed by the caller. The shared decimal-digit prefix is
    /// disambiguated into number/duration/date/date-time forms.
    fn scan_numeric(&mut self) -> TokenKind {
        self.consume_digits();
        match self.cursor.peek() {
            Some(b':') => self.scan_duration(3),
            Some(b'D') => {
                self.bump();
                TokenKind::Number
            }
            Some(b'f') | Some(b'F') => {
                self.bump();
                TokenKind::Number
            }
            Some(b'd') => {
                if self.cursor.peek_by(1) == Some(b':') {
                    self.bump();
                    self.scan_duration(4)
                } else {
                    self.bump();
                    TokenKind::Number
                }
            }
            Some(b'/') => self.scan_date_or_date_time(),
            Some(b'.') => self.scan_fractional(),
            Some(b'l') | Some(b'L') => {
                self.bump();
                TokenKind::Number
            }
            _ => TokenKind::Number,
        }
    }

    /// `segments` is 3 for `HH:MM:SS[.frac]` (leading int already consumed
    /// as hours) or 4 for `Dd:HH:MM:SS[.frac]` (leading int = days, `d`
    /// already consumed, three more `:integer` segments required).
    fn scan_duration(&mut self, segments: u32) -> TokenKind {
        let required_colon_segments = segments - 1;
        for _ in 0..required_colon_segments {
            if !self.consume_colon_digits() {
                return TokenKind::Invalid;
            }
        }
        if !self.maybe_consume_fraction() {
            return TokenKind::Invalid;
        }
        TokenKind::Duration
    }

    fn scan_fractional(&mut self) -> TokenKind {
        self.bump(); // '.'
        if !matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
            return TokenKind::Invalid;
        }
        self.consume_digits();
        match self.cursor.peek() {
            Some(b'f') | Some(b'F') => {
                self.bump();
                TokenKind::Number
            }
            Some(b'd') | Some(b'D') => {
                self.bump();
                TokenKind::Number
            }
            Some(b'b') | Some(b'B') if matches!(self.cursor.peek_by(1), Some(b'd') | Some(b'D')) => {
                self.bump();
                self.bump();
                TokenKind::Number
            }
            Some(b) if b.is_ascii_alphabetic() => TokenKind::Invalid,
            _ => TokenKind::Number,
        }
    }

    fn consume_slash_digits(&mut self) -> bool {
        if self.cursor.peek() != Some(b'/') {
            return false;
        }
        self.bump();
        if !matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
            return false;
        }
        self.consume_digits();
        true
    }

    fn try_scan_time_of_day(&mut self) -> bool {
        if !matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
            return false;
        }
        self.consume_digits(); // HH
        if !self.consume_colon_digits() {
            return false; // :MM mandatory
        }
        if self.cursor.peek() == Some(b':') {
            if !self.consume_colon_digits() {
                return false; // :SS
            }
            if !self.maybe_consume_fraction() {
                return false;
            }
        }
        true
    }

    /// Three uppercase letters, optionally followed by a `±HH[:MM]` offset.
    /// The lexer only checks the syntactic shape; whether the three
    /// letters mean UTC/GMT or a named zone is the decoder's job.
    fn scan_timezone(&mut self) -> bool {
        self.bump(); // leading '-'
        let mut letters = 0;
        for _ in 0..3 {
            match self.cursor.peek() {
                Some(b) if b.is_ascii_uppercase() => {
                    self.bump();
                    letters += 1;
                }
                _ => break,
            }
        }
        if letters != 3 {
            return false;
        }
        if matches!(self.cursor.peek(), Some(b'+') | Some(b'-')) {
            self.bump();
            for _ in 0..2 {
                if matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
                    self.bump();
                } else {
                    return false;
                }
            }
            if self.cursor.peek() == Some(b':') {
                self.bump();
                for _ in 0..2 {
                    if matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
                        self.bump();
                    } else {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// `YYYY` has already been consumed; `/` is next. This is the one
    /// real backtrack in the lexer: a trailing ` HH:MM...` is attempted
    /// speculatively and unwound to a bare date on failure.
    fn scan_date_or_date_time(&mut self) -> TokenKind {
        if !self.consume_slash_digits() {
            return TokenKind::Invalid;
        }
        if !self.consume_slash_digits() {
            return TokenKind::Invalid;
        }
        if self.cursor.peek() != Some(b' ') {
            return TokenKind::Date;
        }
        let before_time = self.mark();
        self.bump(); // the space
        if !self.try_scan_time_of_day() {
            self.reset(before_time);
            return TokenKind::Date;
        }
        if self.cursor.peek() == Some(b'-') {
            if self.scan_timezone() {
                TokenKind::DateTime
            } else {
                TokenKind::Invalid
            }
        } else {
            TokenKind::DateTime
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.cursor.position();
        self.bump();
        self.consume_ident_continuation();
        let text = &self.source[start..self.cursor.position()];
        match text {
            b"true" | b"false" | b"on" | b"off" => TokenKind::Boolean,
            b"null" => TokenKind::Null,
            _ => TokenKind::Identifier,
        }
    }

    fn scan_unicode_or_invalid(&mut self) -> TokenKind {
        if let Some((ch, len)) = self.decode_char_at_cursor() {
            if ch.is_alphabetic() {
                for _ in 0..len {
                    self.bump();
                }
                self.consume_ident_continuation();
                return TokenKind::Identifier;
            }
            for _ in 0..len {
                self.bump();
            }
        } else {
            self.bump();
        }
        TokenKind::Invalid
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.eof_emitted {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.eof_emitted = true;
        }
        Some(token)
    }
}

fn is_ident_continue_ascii(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'$')
}

fn utf8_char_len(lead_byte: u8) -> usize {
    if lead_byte & 0x80 == 0 {
        1
    } else if lead_byte & 0xE0 == 0xC0 {
        2
    } else if lead_byte & 0xF0 == 0xE0 {
        3
    } else if lead_byte & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Lex `input` (from `filename`, used only in [`Location`]) into a forward
/// token stream. Every input produces at least one token; malformed
/// constructs become a single `Invalid` token rather than a raised error
/// (the lexer alone never raises).
pub fn lex(input: &[u8], filename: &str) -> Lexer<'_> {
    Lexer::new(input, filename)
}
