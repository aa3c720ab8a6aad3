//! Raw bytes input: decoding failures and the Latin-1 fallback.

use pretty_assertions::assert_eq;
use serpent_diagnostic::{DiagnosticConfig, DiagnosticQueue, ErrorKind};
use serpent_ir::SourceRange;
use serpent_lexer_core::Fallback;

use super::dump;
use crate::{parse_bytes, ParseOptions, ParseOutput};

fn parse_raw(bytes: &[u8], fallback: Fallback) -> (ParseOutput, DiagnosticQueue) {
    let mut errors = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let output = parse_bytes(bytes, fallback, ParseOptions::default(), &mut errors);
    (output, errors)
}

#[test]
fn test_utf8_with_bom() {
    let (output, errors) = parse_raw(b"\xef\xbb\xbfx = '\xc3\xa9'\n", Fallback::Strict);
    assert!(!errors.has_errors());
    assert_eq!(
        dump(&output.arena, output.root.unwrap()),
        "Module(Assign(Name(x), Constant(\"\u{e9}\")))"
    );
}

#[test]
fn test_unknown_cookie_is_reported() {
    let (output, errors) = parse_raw(b"# coding: bogus\nx = 1\n", Fallback::Strict);
    assert!(!output.is_ok());
    let error = errors.first_error().unwrap();
    assert_eq!(error.kind, ErrorKind::InvalidEncoding);
    assert_eq!(error.message, "unknown encoding: bogus");
    assert_eq!(error.range, SourceRange::new(1, 0, 1, 0));
    assert_eq!(errors.diagnostics().len(), 1);
}

#[test]
fn test_malformed_utf8_points_at_the_byte() {
    let (output, errors) = parse_raw(b"x = 1\ny = '\xff'\n", Fallback::Strict);
    assert!(!output.is_ok());
    let error = errors.first_error().unwrap();
    assert_eq!(error.kind, ErrorKind::InvalidEncoding);
    assert_eq!(
        error.message,
        "'utf-8' codec can't decode byte 0xff in position 11"
    );
    assert_eq!(error.range, SourceRange::new(2, 5, 2, 6));
}

#[test]
fn test_latin1_fallback_parses() {
    let (output, errors) = parse_raw(b"# coding: bogus\nx = '\xff'\n", Fallback::Latin1);
    assert!(!errors.has_errors());
    assert_eq!(
        dump(&output.arena, output.root.unwrap()),
        "Module(Assign(Name(x), Constant(\"\u{ff}\")))"
    );
}

#[test]
fn test_latin1_fallback_keeps_error_positions() {
    // One byte per codepoint: the identifier is a single column wide.
    let (output, errors) = parse_raw(b"# coding: bogus\n\xe9 = = 1\n", Fallback::Latin1);
    assert!(!output.is_ok());
    let error = errors.first_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Syntax);
    assert_eq!(error.message, "invalid syntax");
    assert_eq!(error.range, SourceRange::new(2, 4, 2, 5));
}
