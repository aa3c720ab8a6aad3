//! Decoded source text as a codepoint array.
//!
//! All offsets and columns in the front end count codepoints, so the text is
//! stored one `char` per element. Line endings are kept as written; the
//! [`Cursor`] normalises them while reading.

use crate::Cursor;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    chars: Vec<char>,
}

impl SourceBuffer {
    /// Buffer for text that is already decoded. A leading byte order mark is
    /// dropped; `coding:` cookies are not looked at.
    pub fn new(text: &str) -> Self {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        SourceBuffer {
            chars: text.chars().collect(),
        }
    }

    pub(crate) fn from_chars(chars: Vec<char>) -> Self {
        SourceBuffer { chars }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of codepoints.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Text of `start..end`, clamped to the buffer.
    pub fn text(&self, start: u32, end: u32) -> String {
        let len = self.chars.len();
        let end = (end as usize).min(len);
        let start = (start as usize).min(end);
        self.chars[start..end].iter().collect()
    }

    /// Cursor at the first codepoint.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.chars)
    }

    /// Append more text (interactive input arriving line by line).
    pub fn push_str(&mut self, text: &str) {
        self.chars.extend(text.chars());
    }
}

impl From<&str> for SourceBuffer {
    fn from(text: &str) -> Self {
        SourceBuffer::new(text)
    }
}
