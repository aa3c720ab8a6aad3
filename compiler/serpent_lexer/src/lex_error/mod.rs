//! Tokenizer diagnostics.
//!
//! The `Display` text of each variant is the message handed to the error
//! callback.

use serpent_diagnostic::ErrorKind;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum LexError {
    // === Characters ===
    #[error("invalid character '{ch}' (U+{:x})", codepoint(.ch))]
    InvalidCharacter { ch: char },

    // === Numbers ===
    /// `kind` is `hexadecimal`, `octal`, `binary` or `decimal`.
    #[error("invalid {kind} literal")]
    InvalidLiteral { kind: &'static str },
    #[error("invalid digit '{digit}' in {kind} literal")]
    InvalidDigit { digit: char, kind: &'static str },
    #[error(
        "leading zeros in decimal integer literals are not permitted; use an 0o prefix for octal integers"
    )]
    LeadingZeros,

    // === Strings ===
    #[error("unterminated string literal (detected at line {line})")]
    UnterminatedString { line: i32 },
    #[error("unterminated triple-quoted string literal (detected at line {line})")]
    UnterminatedTripleQuoted { line: i32 },
    #[error("invalid escape sequence '\\{escape}'")]
    InvalidEscape { escape: char },
    #[error("invalid octal escape sequence '\\{digits}'")]
    InvalidOctalEscape { digits: String },

    // === Brackets ===
    #[error("too many nested parentheses")]
    TooManyNestedParens,
    #[error("unmatched '{close}'")]
    Unmatched { close: char },
    #[error("closing parenthesis '{close}' does not match opening parenthesis '{open}'")]
    Mismatched { close: char, open: char },
    #[error("closing parenthesis '{close}' does not match opening parenthesis '{open}' on line {line}")]
    MismatchedOnLine { close: char, open: char, line: i32 },
    #[error("'{open}' was never closed")]
    NeverClosed { open: char },

    // === Lines ===
    #[error("unexpected EOF while parsing")]
    UnexpectedEof,
    #[error("unexpected character after line continuation character")]
    LineContinuation,
    #[error("inconsistent use of tabs and spaces in indentation")]
    InconsistentTabs,
    #[error("too many levels of indentation")]
    TooDeepIndentation,
    #[error("unindent does not match any outer indentation level")]
    DedentInvalid,
}

#[allow(
    clippy::trivially_copy_pass_by_ref,
    reason = "thiserror passes format arguments by reference"
)]
fn codepoint(ch: &char) -> u32 {
    u32::from(*ch)
}

impl LexError {
    /// Category reported alongside the message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LexError::InconsistentTabs => ErrorKind::Tab,
            LexError::TooDeepIndentation | LexError::DedentInvalid => ErrorKind::Indentation,
            LexError::InvalidEscape { .. } | LexError::InvalidOctalEscape { .. } => {
                ErrorKind::Deprecation
            }
            _ => ErrorKind::Syntax,
        }
    }
}
