//! Low-level input handling for the Serpent tokenizer.
//!
//! - [`decode`]: BOM and `coding:` cookie detection, bytes to codepoints
//! - [`SourceBuffer`]: the decoded codepoints
//! - [`Cursor`]: physical-character reader with newline normalisation and
//!   lazy line counting
//!
//! This crate knows nothing about tokens.

mod cursor;
mod preprocess;
mod source_buffer;

pub use cursor::{is_potential_identifier_char, is_potential_identifier_start, Cursor, End};
pub use preprocess::{decode, DecodedSource, Encoding, EncodingError, Fallback};
pub use source_buffer::SourceBuffer;
