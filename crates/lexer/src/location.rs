use std::fmt;
use std::rc::Rc;

/// Position of a token in its source file.
///
/// `line` and `column` are 0-based internally; callers that render a
/// user-visible message should add one to `line` (see [`crate::Token`]
/// users and the parser's error formatting), matching the SDLang
/// convention of 1-based line numbers in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: Rc<str>,
    pub line: u32,
    pub column: u32,
    pub offset: u64,
}

impl Location {
    pub fn start(file: Rc<str>) -> Self {
        Location { file, line: 0, column: 0, offset: 0 }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line + 1)
    }
}
