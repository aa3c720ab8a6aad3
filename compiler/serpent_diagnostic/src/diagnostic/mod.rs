//! Core diagnostic types.

use serpent_ir::SourceRange;
use std::fmt;

/// Category of a reported problem.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    Syntax,
    Indentation,
    /// Inconsistent mixing of tabs and spaces.
    Tab,
    Deprecation,
    /// Raw source bytes that could not be decoded: an unknown `coding:`
    /// declaration or a byte the declared encoding rejects.
    InvalidEncoding,
    /// Interactive input ended inside an unfinished construct and the host
    /// has no more lines to offer. Raised when a pending request for more
    /// input is turned into a failure instead of being answered.
    IncompleteSource,
    /// Escape decoding failure inside a literal (`(unicode error) ...`).
    Encoding,
}

impl ErrorKind {
    /// Name of the exception class a host would raise for this kind.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::Syntax | ErrorKind::Encoding | ErrorKind::InvalidEncoding => "SyntaxError",
            ErrorKind::Indentation => "IndentationError",
            ErrorKind::Tab => "TabError",
            ErrorKind::Deprecation => "DeprecationWarning",
            ErrorKind::IncompleteSource => "IncompleteInputError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One reported error or warning.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub range: SourceRange,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, range: SourceRange, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Error,
            range,
            message: message.into(),
        }
    }

    pub fn warning(kind: ErrorKind, range: SourceRange, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Warning,
            range,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.range, self.message)
    }
}

#[cfg(test)]
mod tests;
