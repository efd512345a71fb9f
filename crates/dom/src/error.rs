use core::fmt;

use sdlite_lexer::Location;

/// Discriminant for the error taxonomy. Every surfaced error is
/// fatal to the `parse` call that raised it (no resynchronization).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SdlErrorKind {
    /// A token of one kind was found where one or more other kinds were
    /// expected (`"Unexpected X, expected Y"`).
    UnexpectedToken,
    /// A string, backtick string, block comment, or base64 block ran off
    /// the end of input without its closing delimiter.
    UnterminatedConstruct,
    /// A `\` was not immediately followed by an end-of-line.
    BackslashNotFollowedByEol,
    /// An anonymous (value-led) statement had no values.
    AnonymousNodeWithoutValues,
    /// A date/date-time/duration component (month, day, hour, ...) fell
    /// outside its valid range during value construction.
    OutOfRangeComponent,
}

/// A single structured parse error: a kind discriminant, the location it was
/// raised at, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdlError {
    pub kind: SdlErrorKind,
    pub location: Location,
    pub message: String,
}

impl SdlError {
    pub fn new(kind: SdlErrorKind, location: Location, message: impl Into<String>) -> Self {
        SdlError { kind, location, message: message.into() }
    }
}

impl fmt::Display for SdlError {
    /// Renders as `"<file>:<line+1>: <message>"`; `Location`'s own
    /// `Display` already adds one to the 0-based line number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl core::error::Error for SdlError {}
