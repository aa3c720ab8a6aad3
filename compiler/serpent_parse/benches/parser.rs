//! Parser benchmarks for Serpent.
//!
//! Measures parsing performance for various tree shapes, from the token
//! stream through both passes to the finished arena.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serpent_diagnostic::Discard;
use serpent_lexer_core::SourceBuffer;
use serpent_parse::{parse, InputMode, ParseOptions, ParseOutput};

/// Simple function
const SIMPLE_FUNCTION: &str = "def add(a: int, b: int) -> int:\n    return a + b\n";

/// Nested arithmetic expression
const NESTED_ARITHMETIC: &str = "((a + b) * (c - d)) / ((a - b) + (c * d)) ** 2 % m";

/// Class with methods, decorators and f-strings
const CLASS: &str = r#"
@dataclass(frozen=True)
class Point(Base, metaclass=Meta):
    """A point."""
    x: float = 0.0
    y: float = 0.0

    def __repr__(self) -> str:
        return f"Point({self.x!r}, {self.y:.2f})"

    @property
    def norm(self):
        return (self.x ** 2 + self.y ** 2) ** 0.5
"#;

/// Comprehensions of every kind
const COMPREHENSIONS: &str = r#"
squares = [x * x for x in range(100) if x % 2]
index = {name: i for i, name in enumerate(names)}
unique = {word.lower() for line in lines for word in line.split()}
total = sum(v for v in values if v is not None)
"#;

/// Match statement with every pattern kind
const MATCH: &str = r#"
match command:
    case {"action": "move", "to": [x, y], **rest}:
        move(x, y)
    case Point(x=0, y=0) | Origin():
        reset()
    case [first, *others] if others:
        handle(first)
    case str() as text:
        say(text)
    case -1 | 1 + 2j | None:
        pass
    case _:
        fail()
"#;

/// Invalid source, exercising the error pass.
const INVALID: &str = r#"
def f(a, b):
    return [a, b c]
"#;

/// Multiple functions
fn generate_n_functions(n: usize) -> String {
    (0..n)
        .map(|i| format!("def func{i}(x: int) -> int:\n    return x + {i}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Deeply nested conditionals
fn generate_nested_conditionals(depth: usize) -> String {
    let mut expr = "x".to_string();
    for i in 0..depth {
        expr = format!("({expr} if x > {i} else {i})");
    }
    format!("def nested(x):\n    return {expr}\n")
}

/// Deeply nested blocks
fn generate_nested_blocks(depth: usize) -> String {
    let mut source = String::new();
    for i in 0..depth {
        source.push_str(&"    ".repeat(i));
        source.push_str(&format!("if x > {i}:\n"));
    }
    source.push_str(&"    ".repeat(depth));
    source.push_str("pass\n");
    source
}

fn run(source: &SourceBuffer, mode: InputMode) -> ParseOutput {
    parse(source, ParseOptions::new(mode), &mut Discard)
}

fn bench_parser_simple(c: &mut Criterion) {
    let source = SourceBuffer::new(SIMPLE_FUNCTION);

    c.bench_function("parser/simple_function", |b| {
        b.iter(|| black_box(run(black_box(&source), InputMode::File)))
    });
}

fn bench_parser_nested_arithmetic(c: &mut Criterion) {
    let source = SourceBuffer::new(NESTED_ARITHMETIC);

    c.bench_function("parser/nested_arithmetic", |b| {
        b.iter(|| black_box(run(black_box(&source), InputMode::Eval)))
    });
}

fn bench_parser_constructs(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/constructs");

    for (name, text) in [
        ("class", CLASS),
        ("comprehensions", COMPREHENSIONS),
        ("match", MATCH),
    ] {
        let source = SourceBuffer::new(text);
        group.bench_function(name, |b| {
            b.iter(|| black_box(run(black_box(&source), InputMode::File)))
        });
    }

    group.finish();
}

fn bench_parser_error_pass(c: &mut Criterion) {
    let source = SourceBuffer::new(INVALID);

    c.bench_function("parser/error_pass", |b| {
        b.iter(|| black_box(run(black_box(&source), InputMode::File)))
    });
}

fn bench_parser_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/scaling");

    for size in [10, 50, 100, 500] {
        let source = SourceBuffer::new(&generate_n_functions(size));
        group.bench_with_input(BenchmarkId::new("functions", size), &source, |b, src| {
            b.iter(|| black_box(run(src, InputMode::File)))
        });
    }

    group.finish();
}

fn bench_parser_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/nesting");

    for depth in [5, 10, 20, 50] {
        let source = SourceBuffer::new(&generate_nested_conditionals(depth));
        group.bench_with_input(BenchmarkId::new("conditionals", depth), &source, |b, src| {
            b.iter(|| black_box(run(src, InputMode::File)))
        });

        let source = SourceBuffer::new(&generate_nested_blocks(depth));
        group.bench_with_input(BenchmarkId::new("blocks", depth), &source, |b, src| {
            b.iter(|| black_box(run(src, InputMode::File)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_nested_arithmetic,
    bench_parser_constructs,
    bench_parser_error_pass,
    bench_parser_scaling,
    bench_parser_nesting,
);
criterion_main!(benches);
