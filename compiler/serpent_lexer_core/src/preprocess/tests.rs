#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;

fn text(decoded: &DecodedSource) -> String {
    decoded.buffer.chars().iter().collect()
}

// === Defaults ===

#[test]
fn plain_utf8() {
    let decoded = decode("x = '\u{e9}'\n".as_bytes(), Fallback::Strict).unwrap();
    assert_eq!(decoded.encoding, Encoding::Utf8);
    assert_eq!(text(&decoded), "x = '\u{e9}'\n");
}

#[test]
fn bom_is_skipped() {
    let decoded = decode(b"\xEF\xBB\xBFpass\n", Fallback::Strict).unwrap();
    assert_eq!(decoded.encoding, Encoding::Utf8);
    assert_eq!(text(&decoded), "pass\n");
}

// === Cookies ===

#[test]
fn latin1_cookie_on_first_line() {
    let decoded = decode(b"# -*- coding: latin-1 -*-\nx = '\xe9'\n", Fallback::Strict).unwrap();
    assert_eq!(decoded.encoding, Encoding::Latin1);
    assert!(text(&decoded).ends_with("x = '\u{e9}'\n"));
}

#[test]
fn cookie_on_second_line_after_shebang() {
    let decoded = decode(b"#!/usr/bin/env python\n# vim: set fileencoding=iso-8859-1 :\n", Fallback::Strict)
        .unwrap();
    assert_eq!(decoded.encoding, Encoding::Latin1);
}

#[test]
fn cookie_after_blank_first_line() {
    let decoded = decode(b"\n# coding=ascii\n", Fallback::Strict).unwrap();
    assert_eq!(decoded.encoding, Encoding::Ascii);
}

#[test]
fn code_on_first_line_stops_the_search() {
    let decoded = decode(b"x = 1\n# coding: latin-1\n", Fallback::Strict).unwrap();
    assert_eq!(decoded.encoding, Encoding::Utf8);
}

#[test]
fn third_line_is_not_examined() {
    let decoded = decode(b"#\n#\n# coding: latin-1\n", Fallback::Strict).unwrap();
    assert_eq!(decoded.encoding, Encoding::Utf8);
}

#[test]
fn cookie_names_are_normalised() {
    assert_eq!(Encoding::from_cookie("UTF_8"), Some(Encoding::Utf8));
    assert_eq!(Encoding::from_cookie("utf-8-sig"), Some(Encoding::Utf8));
    assert_eq!(Encoding::from_cookie("iso-latin-1-unix"), Some(Encoding::Latin1));
    assert_eq!(Encoding::from_cookie("us-ascii"), Some(Encoding::Ascii));
    assert_eq!(Encoding::from_cookie("utf-80"), None);
}

// === Errors ===

#[test]
fn unknown_cookie_is_an_error() {
    let err = decode(b"# coding: klingon\n", Fallback::Strict).unwrap_err();
    assert_eq!(err.to_string(), "unknown encoding: klingon");
}

#[test]
fn malformed_utf8_reports_position() {
    let err = decode(b"x = '\xff'\n", Fallback::Strict).unwrap_err();
    assert_eq!(
        err,
        EncodingError::Malformed {
            codec: "utf-8",
            byte: 0xff,
            position: 5
        }
    );
    assert_eq!(
        err.to_string(),
        "'utf-8' codec can't decode byte 0xff in position 5"
    );
}

#[test]
fn non_ascii_under_ascii_cookie() {
    let err = decode(b"# coding: ascii\n\xc3\xa9\n", Fallback::Strict).unwrap_err();
    assert!(matches!(err, EncodingError::Malformed { position: 16, .. }));
}

// === Fallback ===

#[test]
fn latin1_fallback_keeps_every_byte() {
    let decoded = decode(b"# coding: klingon\nx = '\xff'\n", Fallback::Latin1).unwrap();
    assert_eq!(decoded.encoding, Encoding::Latin1);
    assert_eq!(decoded.buffer.len(), 26);

    let decoded = decode(b"x = '\xff'\n", Fallback::Latin1).unwrap();
    assert_eq!(text(&decoded), "x = '\u{ff}'\n");
}
