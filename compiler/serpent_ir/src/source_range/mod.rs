//! Source positions measured in codepoints.
//!
//! A range is `(start_line, start_column)-(end_line, end_column)` with 1-based
//! lines and 0-based columns. A column of `-1` marks a synthetic position
//! (`ENDMARKER`, `INDENT`, `DEDENT`, parameter lists with no parameters).

use std::fmt;

/// Source range in codepoints.
///
/// Layout: 16 bytes, four `i32` fields.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SourceRange {
    pub start_line: i32,
    pub start_column: i32,
    pub end_line: i32,
    pub end_column: i32,
}

crate::static_assert_size!(SourceRange, 16);

impl SourceRange {
    /// Range of nodes that have no source text of their own.
    pub const ARTIFICIAL: SourceRange = SourceRange {
        start_line: 0,
        start_column: -1,
        end_line: 0,
        end_column: -1,
    };

    #[inline]
    pub const fn new(start_line: i32, start_column: i32, end_line: i32, end_column: i32) -> Self {
        SourceRange {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Zero-width synthetic range on `line` (both columns are `-1`).
    #[inline]
    pub const fn synthetic(line: i32) -> Self {
        SourceRange::new(line, -1, line, -1)
    }

    /// Keep this start, take the end of `other`.
    #[inline]
    #[must_use]
    pub const fn with_end(self, other: SourceRange) -> Self {
        SourceRange::new(
            self.start_line,
            self.start_column,
            other.end_line,
            other.end_column,
        )
    }

    /// Keep this start, end at `(line, column)`.
    #[inline]
    #[must_use]
    pub const fn with_end_at(self, line: i32, column: i32) -> Self {
        SourceRange::new(self.start_line, self.start_column, line, column)
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn merge(self, other: SourceRange) -> Self {
        let (start_line, start_column) = self.start().min(other.start());
        let (end_line, end_column) = self.end().max(other.end());
        SourceRange::new(start_line, start_column, end_line, end_column)
    }

    #[inline]
    pub const fn start(&self) -> (i32, i32) {
        (self.start_line, self.start_column)
    }

    #[inline]
    pub const fn end(&self) -> (i32, i32) {
        (self.end_line, self.end_column)
    }

    /// `true` when either column is the `-1` sentinel.
    #[inline]
    pub const fn has_sentinel(&self) -> bool {
        self.start_column < 0 || self.end_column < 0
    }

    /// `true` unless the start lies strictly before the end.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start() >= self.end()
    }

    /// Is `other` within this range (boundaries included)?
    #[inline]
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    /// Does this range end after `other` starts?
    #[inline]
    pub fn overlaps_start_of(&self, other: &SourceRange) -> bool {
        self.end() > other.start()
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

impl fmt::Debug for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}
