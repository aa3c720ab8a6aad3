//! Stack growth for deeply nested source.
//!
//! The PEG parser recurses once per nesting level of the input. Pathological
//! programs (`((((...))))` a few thousand deep, long chains of unary
//! operators) would otherwise exhaust the native stack.
//!
//! On native targets [`ensure_sufficient_stack`] grows the stack through
//! `stacker`; on `wasm32` it calls the closure directly.

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
///
/// Wrap every grammar rule that can recurse into itself through nested input:
///
/// ```text
/// fn parse_atom(&mut self) -> Option<NodeId> {
///     ensure_sufficient_stack(|| self.parse_atom_inner())
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// `wasm32` manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
