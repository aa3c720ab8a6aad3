//! Lexer benchmarks for Serpent.
//!
//! Measures tokenization throughput across input sizes and token mixes.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serpent_diagnostic::Discard;
use serpent_lexer::{tokenize, TokenizerFlags};
use serpent_lexer_core::SourceBuffer;

/// Simple function
const SIMPLE_FUNCTION: &str = "def add(a: int, b: int) -> int:\n    return a + b\n";

/// Literals of every kind
const LITERALS: &str = r#"
n = 0x_ff + 0o17 + 0b1010 + 1_000_000 + 3.14e-10 + 2j
s = 'single' "double" r'raw\n' b'bytes' '''triple
quoted'''
f = f"{n!r:>{width}} and {s=}"
"#;

/// Deep bracket nesting, continuation lines and comments
const LAYOUT: &str = r"
result = compute(  # first
    [1, 2,
     (3, 4)],
    key=lambda x: \
        x * 2,
)
";

fn generate_n_functions(n: usize) -> String {
    (0..n)
        .map(|i| format!("def func{i}(x: int) -> int:\n    return x + {i}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn run(source: &SourceBuffer) -> usize {
    tokenize(source, TokenizerFlags::EXEC_INPUT, &mut Discard).len()
}

fn bench_lexer_simple(c: &mut Criterion) {
    let source = SourceBuffer::new(SIMPLE_FUNCTION);

    c.bench_function("lexer/simple_function", |b| {
        b.iter(|| black_box(run(black_box(&source))))
    });
}

fn bench_lexer_mixes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer/mixes");

    for (name, text) in [("literals", LITERALS), ("layout", LAYOUT)] {
        let source = SourceBuffer::new(text);
        group.bench_function(name, |b| b.iter(|| black_box(run(black_box(&source)))));
    }

    group.finish();
}

fn bench_lexer_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer/throughput");

    for size in [10, 100, 1000] {
        let text = generate_n_functions(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        let source = SourceBuffer::new(&text);
        group.bench_with_input(BenchmarkId::new("functions", size), &source, |b, src| {
            b.iter(|| black_box(run(src)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_simple,
    bench_lexer_mixes,
    bench_lexer_throughput,
);
criterion_main!(benches);
