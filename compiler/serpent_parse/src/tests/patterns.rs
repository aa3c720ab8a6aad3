//! `match` statement tests.

use pretty_assertions::assert_eq;

use super::{dump, error_message, first_error, parse_ok, statement};
use serpent_diagnostic::ErrorKind;

/// The pattern of `case <pattern>:` inside a one-case match, dumped.
fn case(pattern: &str) -> String {
    let source = format!("match x:\n    case {pattern}:\n        pass\n");
    let output = parse_ok(&source);
    let root = output.root.unwrap();
    let stmt = output.arena.children(root)[0];
    let case = output.arena.children(stmt)[1];
    dump(&output.arena, output.arena.children(case)[0])
}

fn case_error(pattern: &str) -> String {
    error_message(&format!("match x:\n    case {pattern}:\n        pass\n"))
}

#[test]
fn test_match_statement() {
    let source = "\
match command:
    case 1:
        pass
    case _:
        stop()
";
    assert_eq!(
        statement(source),
        "Match(Name(command), match_case(MatchValue(Constant(1)), Pass), match_case(MatchAs, Expr(Call(Name(stop)))))"
    );
}

#[test]
fn test_tuple_subject() {
    let source = "match a, *b:\n    case _:\n        pass\n";
    assert_eq!(
        statement(source),
        "Match(Tuple(Name(a), Starred(Name(b))), match_case(MatchAs, Pass))"
    );
}

#[test]
fn test_guard() {
    let source = "match x:\n    case y if y > 0:\n        pass\n";
    assert_eq!(
        statement(source),
        "Match(Name(x), match_case(MatchAs.y, Compare[Gt](Name(y), Constant(0)), Pass))"
    );
}

// === Literal and value patterns ===

#[test]
fn test_literal_patterns() {
    assert_eq!(case("'s'"), "MatchValue(Constant(\"s\"))");
    assert_eq!(case("-1"), "MatchValue(UnaryOp.USub(Constant(1)))");
    assert_eq!(
        case("1 + 2j"),
        "MatchValue(BinOp.Add(Constant(1), Constant(2.0j)))"
    );
    assert_eq!(
        case("-1 - 2j"),
        "MatchValue(BinOp.Sub(UnaryOp.USub(Constant(1)), Constant(2.0j)))"
    );
}

#[test]
fn test_singleton_patterns() {
    assert_eq!(case("None"), "MatchSingleton(None)");
    assert_eq!(case("True"), "MatchSingleton(True)");
}

#[test]
fn test_value_pattern() {
    assert_eq!(case("Color.RED"), "MatchValue(Attribute.RED(Name(Color)))");
    assert_eq!(
        case("a.b.c"),
        "MatchValue(Attribute.c(Attribute.b(Name(a))))"
    );
}

#[test]
fn test_capture_and_wildcard() {
    assert_eq!(case("name"), "MatchAs.name");
    assert_eq!(case("_"), "MatchAs");
}

// === Structural patterns ===

#[test]
fn test_sequence_patterns() {
    assert_eq!(case("[a, *rest]"), "MatchSequence(MatchAs.a, MatchStar.rest)");
    assert_eq!(case("(a, b)"), "MatchSequence(MatchAs.a, MatchAs.b)");
    assert_eq!(case("a, *_"), "MatchSequence(MatchAs.a, MatchStar)");
    assert_eq!(case("[]"), "MatchSequence");
    assert_eq!(case("(a)"), "MatchAs.a");
}

#[test]
fn test_mapping_patterns() {
    assert_eq!(
        case("{'k': v, **rest}"),
        "MatchMapping.**rest(Constant(\"k\"), MatchAs.v)"
    );
    assert_eq!(
        case("{1: _, K.V: [y]}"),
        "MatchMapping(Constant(1), MatchAs, Attribute.V(Name(K)), MatchSequence(MatchAs.y))"
    );
    assert_eq!(case("{}"), "MatchMapping");
}

#[test]
fn test_class_patterns() {
    assert_eq!(case("Point()"), "MatchClass(Name(Point))");
    assert_eq!(
        case("Point(0, y=1)"),
        "MatchClass[y](Name(Point), MatchValue(Constant(0)), MatchValue(Constant(1)))"
    );
    assert_eq!(
        case("m.Point(x=a, y=b,)"),
        "MatchClass[x, y](Attribute.Point(Name(m)), MatchAs.a, MatchAs.b)"
    );
}

#[test]
fn test_or_and_as_patterns() {
    assert_eq!(
        case("1 | 2 as n"),
        "MatchAs.n(MatchOr(MatchValue(Constant(1)), MatchValue(Constant(2))))"
    );
    assert_eq!(
        case("[a] | (a, _)"),
        "MatchOr(MatchSequence(MatchAs.a), MatchSequence(MatchAs.a, MatchAs))"
    );
}

// === Errors ===

#[test]
fn test_complex_literal_errors() {
    assert_eq!(case_error("1j + 2j"), "real number required in complex literal");
    assert_eq!(case_error("1 + 2"), "imaginary number required in complex literal");
}

#[test]
fn test_invalid_as_targets() {
    assert_eq!(case_error("x as _"), "cannot use '_' as a target");
    assert_eq!(case_error("x as 1"), "invalid pattern target");
}

#[test]
fn test_positional_after_keyword_pattern() {
    assert_eq!(
        case_error("C(a=1, b)"),
        "positional patterns follow keyword patterns"
    );
}

#[test]
fn test_match_without_cases_block() {
    let error = first_error("match x:\ncase 1:\n    pass\n");
    assert_eq!(error.kind, ErrorKind::Indentation);
    assert_eq!(
        error.message,
        "expected an indented block after 'match' statement on line 1"
    );
}
