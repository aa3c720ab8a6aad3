//! Expression tests: precedence, displays, calls and comprehensions.

use pretty_assertions::assert_eq;
use serpent_ir::{ConstantValue, NodeKind};

use super::{expr, parse_with};
use crate::{InputMode, ParseOptions};

// === Operators ===

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(
        expr("1 + 2 * 3"),
        "BinOp.Add(Constant(1), BinOp.Mult(Constant(2), Constant(3)))"
    );
    assert_eq!(
        expr("(1 + 2) * 3"),
        "BinOp.Mult(BinOp.Add(Constant(1), Constant(2)), Constant(3))"
    );
}

#[test]
fn test_binary_operators_fold_left() {
    assert_eq!(
        expr("a - b - c"),
        "BinOp.Sub(BinOp.Sub(Name(a), Name(b)), Name(c))"
    );
    assert_eq!(
        expr("a << b | c & d ^ e"),
        "BinOp.BitOr(BinOp.LShift(Name(a), Name(b)), BinOp.BitXor(BinOp.BitAnd(Name(c), Name(d)), Name(e)))"
    );
}

#[test]
fn test_power_is_right_associative_and_binds_tighter_than_unary() {
    assert_eq!(
        expr("a ** b ** c"),
        "BinOp.Pow(Name(a), BinOp.Pow(Name(b), Name(c)))"
    );
    assert_eq!(
        expr("-x ** 2"),
        "UnaryOp.USub(BinOp.Pow(Name(x), Constant(2)))"
    );
    assert_eq!(expr("~-+x"), "UnaryOp.Invert(UnaryOp.USub(UnaryOp.UAdd(Name(x))))");
}

#[test]
fn test_matrix_and_floor_division() {
    assert_eq!(
        expr("a @ b // c % d"),
        "BinOp.Mod(BinOp.FloorDiv(BinOp.MatMult(Name(a), Name(b)), Name(c)), Name(d))"
    );
}

#[test]
fn test_chained_comparison() {
    assert_eq!(
        expr("a < b <= c"),
        "Compare[Lt, LtE](Name(a), Name(b), Name(c))"
    );
    assert_eq!(
        expr("a not in b is not c"),
        "Compare[NotIn, IsNot](Name(a), Name(b), Name(c))"
    );
}

#[test]
fn test_boolean_operators_flatten() {
    assert_eq!(
        expr("a or b or c"),
        "BoolOp.Or(Name(a), Name(b), Name(c))"
    );
    assert_eq!(
        expr("not a and b or c"),
        "BoolOp.Or(BoolOp.And(UnaryOp.Not(Name(a)), Name(b)), Name(c))"
    );
}

#[test]
fn test_conditional_expression() {
    assert_eq!(expr("x if c else y"), "IfExp(Name(x), Name(c), Name(y))");
    assert_eq!(
        expr("a if b else c if d else e"),
        "IfExp(Name(a), Name(b), IfExp(Name(c), Name(d), Name(e)))"
    );
}

#[test]
fn test_assignment_expression() {
    assert_eq!(expr("(y := f(x))"), "NamedExpr(Name(y), Call(Name(f), Name(x)))");
}

#[test]
fn test_await() {
    assert_eq!(expr("await x.y"), "Await(Attribute.y(Name(x)))");
}

// === Atoms ===

#[test]
fn test_literals() {
    assert_eq!(expr("42"), "Constant(42)");
    assert_eq!(expr("0xff"), "Constant(255)");
    assert_eq!(expr("1.5"), "Constant(1.5)");
    assert_eq!(expr("2j"), "Constant(2.0j)");
    assert_eq!(expr("True"), "Constant(True)");
    assert_eq!(expr("None"), "Constant(None)");
    assert_eq!(expr("..."), "Constant(...)");
}

#[test]
fn test_large_integer_keeps_digits() {
    let (output, errors) = parse_with(
        "123456789012345678901234567890",
        ParseOptions::new(InputMode::Eval),
    );
    assert!(!errors.has_errors());
    let root = output.root.unwrap();
    let NodeKind::Expression { body } = *output.arena.kind(root) else {
        panic!("not an expression");
    };
    let NodeKind::Constant { value, .. } = *output.arena.kind(body) else {
        panic!("not a constant");
    };
    assert_eq!(
        output.arena.constant(value),
        &ConstantValue::BigInt {
            digits: "123456789012345678901234567890".to_owned(),
            radix: 10,
        }
    );
}

#[test]
fn test_tuples() {
    assert_eq!(expr("()"), "Tuple");
    assert_eq!(expr("(1,)"), "Tuple(Constant(1))");
    assert_eq!(expr("1, 2"), "Tuple(Constant(1), Constant(2))");
    assert_eq!(expr("(a)"), "Name(a)");
}

#[test]
fn test_lists_and_sets() {
    assert_eq!(expr("[]"), "List");
    assert_eq!(expr("[1, *rest]"), "List(Constant(1), Starred(Name(rest)))");
    assert_eq!(expr("{1, 2}"), "Set(Constant(1), Constant(2))");
}

#[test]
fn test_dicts() {
    assert_eq!(expr("{}"), "Dict");
    assert_eq!(
        expr("{'a': 1, **rest}"),
        "Dict(Constant(\"a\"), Constant(1), Name(rest))"
    );
}

#[test]
fn test_comprehensions() {
    assert_eq!(
        expr("[x for x in y if x]"),
        "ListComp(Name(x), comprehension(Name(x), Name(y), Name(x)))"
    );
    assert_eq!(
        expr("{k: v for k, v in items}"),
        "DictComp(Name(k), Name(v), comprehension(Tuple(Name(k), Name(v)), Name(items)))"
    );
    assert_eq!(
        expr("{x for x in a for b in x}"),
        "SetComp(Name(x), comprehension(Name(x), Name(a)), comprehension(Name(b), Name(x)))"
    );
    assert_eq!(
        expr("(x async for x in y)"),
        "GeneratorExp(Name(x), comprehension(Name(x), Name(y)))"
    );
}

#[test]
fn test_yield_in_parentheses() {
    assert_eq!(expr("(yield)"), "Yield");
    assert_eq!(expr("(yield from g)"), "YieldFrom(Name(g))");
}

// === Primaries ===

#[test]
fn test_attribute_subscript_call_chain() {
    assert_eq!(
        expr("a.b[c](d)"),
        "Call(Subscript(Attribute.b(Name(a)), Name(c)), Name(d))"
    );
}

#[test]
fn test_call_arguments() {
    assert_eq!(
        expr("f(a, *b, k=1, **d)"),
        "Call(Name(f), Name(a), Starred(Name(b)), keyword.k(Constant(1)), keyword(Name(d)))"
    );
    assert_eq!(expr("f()"), "Call(Name(f))");
    assert_eq!(expr("f(a,)"), "Call(Name(f), Name(a))");
}

#[test]
fn test_call_with_generator_argument() {
    assert_eq!(
        expr("sum(x for x in y)"),
        "Call(Name(sum), GeneratorExp(Name(x), comprehension(Name(x), Name(y))))"
    );
}

#[test]
fn test_slices() {
    assert_eq!(
        expr("x[1:2, ::3]"),
        "Subscript(Name(x), Tuple(Slice(Constant(1), Constant(2)), Slice(Constant(3))))"
    );
    assert_eq!(expr("x[:]"), "Subscript(Name(x), Slice)");
    assert_eq!(expr("x[a, b]"), "Subscript(Name(x), Tuple(Name(a), Name(b)))");
}

// === Lambdas ===

#[test]
fn test_lambda() {
    assert_eq!(
        expr("lambda x, y=1: x"),
        "Lambda(arguments(arg.x, arg.y, Constant(1)), Name(x))"
    );
    assert_eq!(expr("lambda: 0"), "Lambda(arguments, Constant(0))");
}

#[test]
fn test_lambda_star_parameters() {
    assert_eq!(
        expr("lambda *a, b, **c: b"),
        "Lambda(arguments(arg.a, arg.b, arg.c), Name(b))"
    );
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 100;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(expr(&source), "Name(x)");
}
