//! Typed value, node, and pool-appender model for SDLang documents.
//!
//! This crate owns everything needed once a token has
//! been classified by `sdlite-lexer`: the `Value` tagged union, `Node` and
//! `Attribute` records, the `Pool<T>` appender those records are carved out
//! of, the scalar value decoder, and the structured `SdlError` type shared
//! with `sdlite-parser`.

mod attribute;
mod decode;
mod error;
mod node;
mod pool;
mod value;

pub use crate::attribute::Attribute;
pub use crate::decode::{decode_value, TokenDecode};
pub use crate::error::{SdlError, SdlErrorKind};
pub use crate::node::{Node, ANONYMOUS_NAME};
pub use crate::pool::Pool;
pub use crate::value::{CivilDate, CivilDateTime, CivilTime, DateTimeValue, Hnsecs, Timezone, Value};
