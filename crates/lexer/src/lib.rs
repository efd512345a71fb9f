//! Hand-written lexer for the SDLang text format.
//!
//! Produces a forward stream of zero-copy [`Token`]s from a byte slice.
//! Classification and value decoding are deliberately kept apart: this
//! crate only recognizes and delimits; turning token text into a typed
//! [`Value`](https://docs.rs/sdlite-dom) is `sdlite-dom`'s job.

pub mod location;
pub mod token;

mod cursor;
mod lexer;

pub use crate::lexer::{lex, Lexer};
pub use crate::location::Location;
pub use crate::token::{Token, TokenKind};
