//! Serpent IR: the data model shared by the tokenizer, the parser and the
//! span checker.
//!
//! - [`SourceRange`]: `(line, column)` pairs in codepoints
//! - [`Token`] and [`TokenKind`]: tokenizer output
//! - [`SstArena`]: the flat syntax tree, children referenced by [`NodeId`]
//! - [`check_spans`]: the span containment / ordering oracle
//!
//! # Design
//!
//! - **Flatten everything**: nodes live in parallel vectors, no `Box<Node>`
//! - **Intern identifiers**: `Name(u32)` instead of `String`
//! - **No back-pointers**: walkers carry their own ancestor stack

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod source_range;
pub mod span_check;
pub mod sst;
mod token;

pub use interner::StringInterner;
pub use name::Name;
pub use source_range::SourceRange;
pub use span_check::{check_spans, SpanViolation, ViolationKind};
pub use sst::{
    BinOp, BoolOp, ChildRun, CmpOp, ConstId, ConstantValue, Conversion, ExprContext, NameList,
    NodeId, NodeKind, NodeList, OpList, SstArena, UnaryOp,
};
pub use token::{Token, TokenKind};
