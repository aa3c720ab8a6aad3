//! The error-reporting capability handed to the tokenizer and the parser.

use serpent_ir::SourceRange;

use crate::ErrorKind;

/// Receiver of diagnostics for one parse.
///
/// Errors are final for the parse that reports them; warnings are advisory.
pub trait ErrorCallback {
    fn on_error(&mut self, kind: ErrorKind, range: SourceRange, message: &str);

    fn on_warning(&mut self, kind: ErrorKind, range: SourceRange, message: &str) {
        let _ = (kind, range, message);
    }
}

impl<T: ErrorCallback + ?Sized> ErrorCallback for &mut T {
    fn on_error(&mut self, kind: ErrorKind, range: SourceRange, message: &str) {
        (**self).on_error(kind, range, message);
    }

    fn on_warning(&mut self, kind: ErrorKind, range: SourceRange, message: &str) {
        (**self).on_warning(kind, range, message);
    }
}

/// Callback that drops everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct Discard;

impl ErrorCallback for Discard {
    fn on_error(&mut self, _: ErrorKind, _: SourceRange, _: &str) {}
}
