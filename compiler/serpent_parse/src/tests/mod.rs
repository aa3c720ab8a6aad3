//! Parser tests.
//!
//! Tests are organized into modules by category:
//! - `expressions`: precedence, displays, calls, lambdas, comprehensions
//! - `statements`: simple and compound statements, definitions, imports
//! - `strings`: implicit concatenation and f-strings
//! - `patterns`: `match` statements and case patterns
//! - `errors`: diagnostics produced by the error pass
//! - `interactive`: single-statement and line-at-a-time input
//! - `spans`: source ranges of the finished tree
//! - `bytes`: raw bytes input and decoding failures
//!
//! Most assertions compare a compact rendering of the tree produced by
//! [`dump`]: `Kind(child, child, ...)` with operators, names and attribute
//! names folded into the label.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod bytes;
mod expressions;
mod patterns;
mod strings;

use serpent_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use serpent_ir::{check_spans, NodeId, NodeKind, SstArena};
use serpent_lexer_core::SourceBuffer;

use crate::{init_tracing, parse, InputMode, ParseOptions, ParseOutput};

/// Parse `source` and collect every diagnostic.
///
/// Run with `RUST_LOG=serpent_parse=trace` to see the parser's traces.
pub(crate) fn parse_with(source: &str, options: ParseOptions) -> (ParseOutput, DiagnosticQueue) {
    init_tracing();
    let buffer = SourceBuffer::new(source);
    let mut errors = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let output = parse(&buffer, options, &mut errors);
    (output, errors)
}

/// Parse a module that must come out clean.
pub(crate) fn parse_ok(source: &str) -> ParseOutput {
    let (output, errors) = parse_with(source, ParseOptions::default());
    assert!(
        !errors.has_errors(),
        "unexpected errors for {source:?}: {:?}",
        errors.diagnostics()
    );
    let root = output.root.expect("no tree");
    assert_eq!(
        check_spans(&output.arena, root),
        Ok(()),
        "bad spans for {source:?}"
    );
    output
}

/// First error reported for a module that must fail.
pub(crate) fn first_error(source: &str) -> Diagnostic {
    first_error_with(source, ParseOptions::default())
}

pub(crate) fn first_error_with(source: &str, options: ParseOptions) -> Diagnostic {
    let (output, errors) = parse_with(source, options);
    assert!(!output.is_ok(), "{source:?} parsed without error");
    errors
        .first_error()
        .cloned()
        .unwrap_or_else(|| panic!("no diagnostic for {source:?}"))
}

/// Message of the first error for `source`.
pub(crate) fn error_message(source: &str) -> String {
    first_error(source).message
}

/// Every statement of a module, dumped.
pub(crate) fn statements(source: &str) -> Vec<String> {
    let output = parse_ok(source);
    let root = output.root.unwrap();
    output
        .arena
        .children(root)
        .into_iter()
        .map(|stmt| dump(&output.arena, stmt))
        .collect()
}

/// The single statement of a one-statement module, dumped.
pub(crate) fn statement(source: &str) -> String {
    let mut stmts = statements(source);
    assert_eq!(stmts.len(), 1, "expected one statement in {source:?}: {stmts:?}");
    stmts.remove(0)
}

/// An expression parsed in eval mode, dumped.
pub(crate) fn expr(source: &str) -> String {
    let (output, errors) = parse_with(source, ParseOptions::new(InputMode::Eval));
    assert!(
        !errors.has_errors(),
        "unexpected errors for {source:?}: {:?}",
        errors.diagnostics()
    );
    let root = output.root.unwrap();
    assert_eq!(
        check_spans(&output.arena, root),
        Ok(()),
        "bad spans for {source:?}"
    );
    let NodeKind::Expression { body } = *output.arena.kind(root) else {
        panic!("eval root is {}", output.arena.describe(root));
    };
    dump(&output.arena, body)
}

/// Compact rendering of the subtree at `id`.
pub(crate) fn dump(arena: &SstArena, id: NodeId) -> String {
    let kind = arena.kind(id);
    let label = match *kind {
        NodeKind::Name { id, .. } => return format!("Name({})", arena.name_str(id)),
        NodeKind::Constant { value, .. } => return format!("Constant({})", arena.constant(value)),
        NodeKind::MatchSingleton { value } => {
            return format!("MatchSingleton({})", arena.constant(value));
        }
        NodeKind::BinOp { op, .. } => format!("BinOp.{op:?}"),
        NodeKind::AugAssign { op, .. } => format!("AugAssign.{op:?}"),
        NodeKind::UnaryOp { op, .. } => format!("UnaryOp.{op:?}"),
        NodeKind::BoolOp { op, .. } => format!("BoolOp.{op:?}"),
        NodeKind::Compare { ops, .. } => format!("Compare{:?}", arena.ops(ops)),
        NodeKind::Attribute { attr, .. } => format!("Attribute.{}", arena.name_str(attr)),
        NodeKind::Arg { arg, .. } => format!("arg.{}", arena.name_str(arg)),
        NodeKind::Keyword { arg: Some(arg), .. } => format!("keyword.{}", arena.name_str(arg)),
        NodeKind::FunctionDef { name, .. } | NodeKind::ClassDef { name, .. } => {
            format!("{}.{}", kind.name(), arena.name_str(name))
        }
        NodeKind::Alias { name, asname } => {
            let mut label = format!("alias.{}", arena.name_str(name));
            if let Some(asname) = asname {
                label.push_str(" as ");
                label.push_str(arena.name_str(asname));
            }
            return label;
        }
        NodeKind::ImportFrom { module, level, .. } => {
            let dots = ".".repeat(level as usize);
            let module = module.map_or("", |m| arena.name_str(m));
            format!("ImportFrom.{dots}{module}")
        }
        NodeKind::Global { names } | NodeKind::Nonlocal { names } => {
            let names: Vec<&str> = arena.names(names).iter().map(|&n| arena.name_str(n)).collect();
            return format!("{}({})", kind.name(), names.join(", "));
        }
        NodeKind::ExceptHandler { name: Some(name), .. } => {
            format!("ExceptHandler.{}", arena.name_str(name))
        }
        NodeKind::MatchAs {
            name: Some(name), ..
        } => format!("MatchAs.{}", arena.name_str(name)),
        NodeKind::MatchStar { name: Some(name) } => format!("MatchStar.{}", arena.name_str(name)),
        NodeKind::MatchMapping {
            rest: Some(rest), ..
        } => format!("MatchMapping.**{}", arena.name_str(rest)),
        NodeKind::MatchClass { kwd_attrs, .. } if !arena.names(kwd_attrs).is_empty() => {
            let attrs: Vec<&str> = arena
                .names(kwd_attrs)
                .iter()
                .map(|&n| arena.name_str(n))
                .collect();
            format!("MatchClass[{}]", attrs.join(", "))
        }
        NodeKind::FormattedValue {
            conversion: Some(conversion),
            ..
        } => format!("FormattedValue!{conversion:?}"),
        _ => kind.name().to_owned(),
    };
    let children = arena.children(id);
    if children.is_empty() {
        return label;
    }
    let children: Vec<String> = children.into_iter().map(|child| dump(arena, child)).collect();
    format!("{label}({})", children.join(", "))
}
