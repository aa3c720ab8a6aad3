//! String literal tests: concatenation, bytes and f-strings.

use pretty_assertions::assert_eq;
use serpent_diagnostic::ErrorKind;
use serpent_ir::{NodeKind, SourceRange};

use super::{error_message, expr, first_error, parse_with};
use crate::{InputMode, ParseOptions};

// === Plain strings ===

#[test]
fn test_adjacent_strings_concatenate() {
    assert_eq!(expr("'a' \"b\""), "Constant(\"ab\")");
    assert_eq!(expr("('a'\n 'b')"), "Constant(\"ab\")");
}

#[test]
fn test_escapes_are_cooked() {
    assert_eq!(expr(r"'a\tb'"), "Constant(\"a\\tb\")");
    assert_eq!(expr(r"r'a\tb'"), "Constant(\"a\\\\tb\")");
}

#[test]
fn test_named_escapes() {
    assert_eq!(
        expr(r"'\N{GREEK SMALL LETTER ALPHA}'"),
        format!("Constant({:?})", "\u{3b1}")
    );
    assert_eq!(
        expr(r"f'{x}\N{BULLET}'"),
        format!("JoinedStr(FormattedValue(Name(x)), Constant({:?}))", "\u{2022}")
    );
}

#[test]
fn test_unknown_character_name() {
    let error = first_error("x = '\\N{NO SUCH NAME}'\n");
    assert_eq!(error.kind, ErrorKind::Encoding);
    assert_eq!(
        error.message,
        "(unicode error) 'unicodeescape' codec can't decode bytes in position 0-15: unknown Unicode character name"
    );
    assert_eq!(
        error_message("x = f'{a}\\N{NO SUCH NAME}'\n"),
        "(unicode error) 'unicodeescape' codec can't decode bytes in position 0-15: unknown Unicode character name"
    );
}

#[test]
fn test_bytes() {
    assert_eq!(expr("b'a' b'c'"), "Constant(b\"ac\")");
}

#[test]
fn test_bytes_and_str_do_not_mix() {
    assert_eq!(
        error_message("x = 'a' b'c'\n"),
        "cannot mix bytes and nonbytes literals"
    );
}

#[test]
fn test_unicode_prefix_is_recorded() {
    let (output, _) = parse_with("u'x'", ParseOptions::new(InputMode::Eval));
    let root = output.root.unwrap();
    let NodeKind::Expression { body } = *output.arena.kind(root) else {
        panic!("not an expression");
    };
    let NodeKind::Constant { unicode_prefix, .. } = *output.arena.kind(body) else {
        panic!("not a constant");
    };
    assert!(unicode_prefix);
}

// === F-strings ===

#[test]
fn test_fstring_parts() {
    assert_eq!(
        expr("f'a{b}c'"),
        "JoinedStr(Constant(\"a\"), FormattedValue(Name(b)), Constant(\"c\"))"
    );
}

#[test]
fn test_fstring_doubled_braces() {
    assert_eq!(expr("f'{{x}}'"), "JoinedStr(Constant(\"{x}\"))");
}

#[test]
fn test_fstring_conversion() {
    assert_eq!(expr("f'{x!r}'"), "JoinedStr(FormattedValue!Repr(Name(x)))");
    assert_eq!(expr("f'{x!s}'"), "JoinedStr(FormattedValue!Str(Name(x)))");
    assert_eq!(expr("f'{x!a}'"), "JoinedStr(FormattedValue!Ascii(Name(x)))");
}

#[test]
fn test_fstring_self_documenting() {
    assert_eq!(
        expr("f'{x=}'"),
        "JoinedStr(Constant(\"x=\"), FormattedValue!Repr(Name(x)))"
    );
    assert_eq!(
        expr("f'{x = :>4}'"),
        "JoinedStr(Constant(\"x = \"), FormattedValue(Name(x), JoinedStr(Constant(\">4\"))))"
    );
}

#[test]
fn test_fstring_format_spec() {
    assert_eq!(
        expr("f'{x:>10}'"),
        "JoinedStr(FormattedValue(Name(x), JoinedStr(Constant(\">10\"))))"
    );
    assert_eq!(
        expr("f'{x:{w}.{p}}'"),
        "JoinedStr(FormattedValue(Name(x), JoinedStr(FormattedValue(Name(w)), Constant(\".\"), FormattedValue(Name(p)))))"
    );
}

#[test]
fn test_fstring_expressions() {
    assert_eq!(
        expr("f'{a + b}'"),
        "JoinedStr(FormattedValue(BinOp.Add(Name(a), Name(b))))"
    );
    assert_eq!(
        expr("f'{d[\"k\"]}'"),
        "JoinedStr(FormattedValue(Subscript(Name(d), Constant(\"k\"))))"
    );
    assert_eq!(
        expr("f'{a != b}'"),
        "JoinedStr(FormattedValue(Compare[NotEq](Name(a), Name(b))))"
    );
    assert_eq!(
        expr("f'{x, y}'"),
        "JoinedStr(FormattedValue(Tuple(Name(x), Name(y))))"
    );
}

#[test]
fn test_fstring_concatenates_with_plain_strings() {
    assert_eq!(
        expr("'a' f'{b}' 'c'"),
        "JoinedStr(Constant(\"a\"), FormattedValue(Name(b)), Constant(\"c\"))"
    );
    assert_eq!(expr("'a' f'b'"), "JoinedStr(Constant(\"ab\"))");
}

#[test]
fn test_fstring_positions_are_absolute() {
    let (output, errors) = parse_with("x = 1\ny = f'{zz}'\n", ParseOptions::default());
    assert!(!errors.has_errors());
    let root = output.root.unwrap();
    let assign = output.arena.children(root)[1];
    let joined = output.arena.children(assign)[1];
    let field = output.arena.children(joined)[0];
    let name = output.arena.children(field)[0];
    assert_eq!(output.arena.range(field), SourceRange::new(2, 6, 2, 10));
    assert_eq!(output.arena.range(name), SourceRange::new(2, 7, 2, 9));
}

// === F-string errors ===

#[test]
fn test_fstring_errors() {
    let cases = [
        ("f'}'", "f-string: single '}' is not allowed"),
        ("f'{x'", "f-string: expecting '}'"),
        ("f'{}'", "f-string: empty expression not allowed"),
        ("f'{  }'", "f-string: empty expression not allowed"),
        (
            "f'{x!z}'",
            "f-string: invalid conversion character: expected 's', 'r', or 'a'",
        ),
        ("f'{a#}'", "f-string expression part cannot include '#'"),
        ("f'{a)}'", "f-string: unmatched ')'"),
        (
            "f'{(a}'",
            "f-string: closing parenthesis '}' does not match opening parenthesis '('",
        ),
    ];
    for (source, expected) in cases {
        assert_eq!(error_message(&format!("x = {source}\n")), expected, "for {source}");
    }
}

#[test]
fn test_fstring_backslash_in_expression() {
    assert_eq!(
        error_message("x = f'{\"\\n\".join(a)}'\n"),
        "f-string expression part cannot include a backslash"
    );
}

#[test]
fn test_fstring_field_syntax_error_is_prefixed() {
    let message = error_message("x = f'{a b}'\n");
    assert!(message.starts_with("f-string: "), "{message}");
}
