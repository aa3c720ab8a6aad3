//! Collecting error callback.
//!
//! Features:
//! - Error limit
//! - Deduplication of repeated errors on the same line
//! - Sorting by position on flush

use std::hash::{Hash, Hasher};

use serpent_ir::SourceRange;

use crate::{Diagnostic, ErrorCallback, ErrorKind};

/// Number of characters used when comparing messages for deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for [`DiagnosticQueue`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited). Warnings are not
    /// counted but are dropped once the limit is hit.
    pub error_limit: usize,
    /// Drop an error whose line and message prefix match the previous one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep everything (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating and sorting diagnostics.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    /// `(line, message_prefix_hash)` of the last accepted error.
    last_error: Option<(i32, u64)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if it was kept, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.limit_reached() {
            return false;
        }
        if diag.is_error() {
            let key = (diag.range.start_line, message_prefix_hash(&diag.message));
            if self.config.deduplicate && self.last_error == Some(key) {
                return false;
            }
            self.last_error = Some(key);
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Diagnostics in arrival order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// First error in arrival order.
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_error())
    }

    /// Take every diagnostic, sorted by start position.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(|d| d.range.start());
        self.error_count = 0;
        self.last_error = None;
        out
    }
}

impl ErrorCallback for DiagnosticQueue {
    fn on_error(&mut self, kind: ErrorKind, range: SourceRange, message: &str) {
        self.add(Diagnostic::error(kind, range, message));
    }

    fn on_warning(&mut self, kind: ErrorKind, range: SourceRange, message: &str) {
        self.add(Diagnostic::warning(kind, range, message));
    }
}

#[cfg(test)]
mod tests;
