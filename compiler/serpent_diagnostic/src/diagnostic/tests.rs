use super::*;
use pretty_assertions::assert_eq;

#[test]
fn kind_names() {
    assert_eq!(ErrorKind::Syntax.name(), "SyntaxError");
    assert_eq!(ErrorKind::Indentation.name(), "IndentationError");
    assert_eq!(ErrorKind::Tab.to_string(), "TabError");
    assert_eq!(ErrorKind::Encoding.name(), "SyntaxError");
    assert_eq!(ErrorKind::InvalidEncoding.name(), "SyntaxError");
    assert_eq!(ErrorKind::IncompleteSource.name(), "IncompleteInputError");
}

#[test]
fn constructors_set_severity() {
    let range = SourceRange::new(1, 0, 1, 1);
    let err = Diagnostic::error(ErrorKind::Syntax, range, "invalid syntax");
    let warn = Diagnostic::warning(ErrorKind::Deprecation, range, "invalid escape sequence '\\d'");
    assert!(err.is_error());
    assert!(!warn.is_error());
    assert_eq!(warn.severity.to_string(), "warning");
}

#[test]
fn display_includes_kind_range_and_message() {
    let diag = Diagnostic::error(
        ErrorKind::Indentation,
        SourceRange::new(2, 0, 2, -1),
        "unexpected indent",
    );
    assert_eq!(
        diag.to_string(),
        "IndentationError at (2, 0)-(2, -1): unexpected indent"
    );
}
