//! Diagnostics for the Serpent front end.
//!
//! The tokenizer and the parser never print or return errors directly: every
//! problem is handed to an [`ErrorCallback`] together with its [`ErrorKind`]
//! and [`SourceRange`](serpent_ir::SourceRange). The caller decides what to
//! do with it. [`DiagnosticQueue`] is the stock implementation that collects,
//! deduplicates and sorts what it receives.

mod callback;
mod diagnostic;
pub mod queue;

pub use callback::{Discard, ErrorCallback};
pub use diagnostic::{Diagnostic, ErrorKind, Severity};
pub use queue::{DiagnosticConfig, DiagnosticQueue};
