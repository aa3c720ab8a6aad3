use super::*;
use pretty_assertions::assert_eq;
use crate::{Discard, Severity};

fn at(line: i32, col: i32) -> SourceRange {
    SourceRange::new(line, col, line, col + 1)
}

// === Collection ===

#[test]
fn collects_errors_and_warnings_through_the_callback() {
    let mut queue = DiagnosticQueue::new();
    queue.on_warning(ErrorKind::Deprecation, at(1, 4), "invalid escape sequence '\\d'");
    queue.on_error(ErrorKind::Syntax, at(2, 0), "invalid syntax");

    assert!(queue.has_errors());
    assert_eq!(queue.error_count(), 1);
    assert_eq!(queue.diagnostics().len(), 2);
    assert_eq!(queue.diagnostics()[0].severity, Severity::Warning);
    assert_eq!(
        queue.first_error().map(|d| d.message.as_str()),
        Some("invalid syntax")
    );
}

#[test]
fn callback_works_through_a_mutable_reference() {
    fn report(mut cb: impl ErrorCallback) {
        cb.on_error(ErrorKind::Tab, at(3, 0), "inconsistent use of tabs and spaces in indentation");
    }
    let mut queue = DiagnosticQueue::new();
    report(&mut queue);
    assert_eq!(queue.diagnostics()[0].kind, ErrorKind::Tab);
}

// === Filtering ===

#[test]
fn duplicate_error_on_same_line_is_dropped() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(Diagnostic::error(ErrorKind::Syntax, at(1, 0), "invalid syntax")));
    assert!(!queue.add(Diagnostic::error(ErrorKind::Syntax, at(1, 5), "invalid syntax")));
    assert!(queue.add(Diagnostic::error(ErrorKind::Syntax, at(2, 0), "invalid syntax")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn unlimited_config_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    for _ in 0..20 {
        assert!(queue.add(Diagnostic::error(ErrorKind::Syntax, at(1, 0), "invalid syntax")));
    }
    assert_eq!(queue.error_count(), 20);
}

#[test]
fn error_limit_stops_collection() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    assert!(queue.add(Diagnostic::error(ErrorKind::Syntax, at(1, 0), "a")));
    assert!(queue.add(Diagnostic::error(ErrorKind::Syntax, at(2, 0), "b")));
    assert!(!queue.add(Diagnostic::error(ErrorKind::Syntax, at(3, 0), "c")));
    assert!(!queue.add(Diagnostic::warning(ErrorKind::Deprecation, at(4, 0), "d")));
}

// === Flush ===

#[test]
fn flush_sorts_by_position_and_resets() {
    let mut queue = DiagnosticQueue::new();
    queue.on_error(ErrorKind::Syntax, at(3, 0), "third");
    queue.on_warning(ErrorKind::Deprecation, at(1, 2), "first");
    queue.on_error(ErrorKind::Syntax, at(2, 7), "second");

    let messages: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, ["first", "second", "third"]);
    assert!(!queue.has_errors());
    assert!(queue.diagnostics().is_empty());
}

#[test]
fn discard_ignores_everything() {
    let mut cb = Discard;
    cb.on_error(ErrorKind::Syntax, at(1, 0), "ignored");
    cb.on_warning(ErrorKind::Deprecation, at(1, 0), "ignored");
}
