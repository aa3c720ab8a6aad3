//! Tokenizer for the Serpent front end.
//!
//! [`Tokenizer`] turns a [`SourceBuffer`](serpent_lexer_core::SourceBuffer)
//! into [`Token`](serpent_ir::Token)s one at a time, tracking indentation,
//! brackets and the incomplete-input state of interactive sessions. The
//! [`cook`] module turns the text of `STRING` and `NUMBER` tokens into
//! values.
//!
//! Problems are reported through an
//! [`ErrorCallback`](serpent_diagnostic::ErrorCallback). A token that could
//! not be scanned comes back as `ERRORTOKEN`; [`Tokenizer::status`] says
//! why.

pub mod cook;
mod flags;
mod lex_error;
mod tokenizer;

pub use flags::TokenizerFlags;
pub use lex_error::LexError;
pub use tokenizer::{tokenize, Status, Step, Tokenizer};
