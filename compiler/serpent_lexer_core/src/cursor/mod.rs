//! Physical-character reader over a codepoint buffer.
//!
//! - `\r\n` and a lone `\r` are both read as a single `\n`.
//! - The line number advances lazily, when the character *after* a newline
//!   is read, and not at all when that newline was the last character.
//! - With a final newline requested, input that does not end in a newline
//!   reads one synthesized `\n` before the end.
//! - In interactive mode running out of input is either a request for more
//!   input or a clean stop, see [`End`].
//!
//! The cursor is [`Copy`], so a lookahead is a copy that is dropped.

/// Why [`Cursor::bump`] returned `None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum End {
    Eof,
    /// Interactive input ran out while incomplete-source reporting was off.
    InteractiveStop,
    /// Interactive input ran out on `line`; the caller should ask for more.
    Incomplete { line: i32 },
}

/// Characters that may start an identifier before Unicode verification.
#[inline]
pub fn is_potential_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c as u32 >= 128
}

/// Characters that may continue an identifier before Unicode verification.
#[inline]
pub fn is_potential_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c as u32 >= 128
}

#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    chars: &'a [char],
    pos: u32,
    line: i32,
    line_start: u32,
    read_newline: bool,
    final_newline: bool,
    interactive: bool,
    report_incomplete: bool,
    end: Option<End>,
}

impl<'a> Cursor<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Cursor {
            chars,
            pos: 0,
            line: 1,
            line_start: 0,
            read_newline: false,
            final_newline: false,
            interactive: false,
            report_incomplete: true,
            end: None,
        }
    }

    /// Read a synthesized `\n` when the input does not end with one.
    #[must_use]
    pub fn with_final_newline(mut self, yes: bool) -> Self {
        self.final_newline = yes;
        self
    }

    #[must_use]
    pub fn interactive(mut self, yes: bool) -> Self {
        self.interactive = yes;
        self
    }

    pub fn set_report_incomplete(&mut self, yes: bool) {
        self.report_incomplete = yes;
    }

    pub fn report_incomplete(&self) -> bool {
        self.report_incomplete
    }

    #[inline]
    fn len(&self) -> u32 {
        u32::try_from(self.chars.len()).unwrap_or(u32::MAX)
    }

    #[inline]
    fn at(&self, pos: u32) -> Option<char> {
        self.chars.get(pos as usize).copied()
    }

    /// Read the next physical character.
    pub fn bump(&mut self) -> Option<char> {
        if self.read_newline {
            self.read_newline = false;
            if self.pos < self.len() {
                self.line += 1;
            }
            self.line_start = self.pos;
        }
        if let Some(mut c) = self.at(self.pos) {
            if c == '\r' {
                if self.at(self.pos + 1) == Some('\n') {
                    self.pos += 1;
                }
                c = '\n';
            }
            self.pos += 1;
            self.read_newline = c == '\n';
            return Some(c);
        }
        if self.pos == self.len() && self.final_newline && !self.ends_with_newline() {
            self.pos += 1;
            self.read_newline = true;
            return Some('\n');
        }
        // A pending request for input is dropped once reporting is off.
        if self.report_incomplete && matches!(self.end, Some(End::Incomplete { .. })) {
            return None;
        }
        self.end = Some(if !self.interactive {
            End::Eof
        } else if self.report_incomplete {
            End::Incomplete { line: self.line }
        } else {
            End::InteractiveStop
        });
        None
    }

    fn ends_with_newline(&self) -> bool {
        matches!(self.chars.last(), Some('\n' | '\r'))
    }

    /// Step back over the last character read; `\r\n` counts as one.
    ///
    /// Does nothing once the end of a non-interactive input was reached.
    pub fn back(&mut self) {
        if self.pos == 0 || self.end == Some(End::Eof) {
            return;
        }
        self.pos -= 1;
        if self.at(self.pos) == Some('\n') && self.pos > 0 && self.at(self.pos - 1) == Some('\r') {
            self.pos -= 1;
        }
        self.read_newline = false;
    }

    /// Does the input continue with `word` followed by a character that
    /// cannot continue an identifier, or by the end of the input?
    pub fn lookahead(&self, word: &[char]) -> bool {
        let start = self.pos as usize;
        let end = start + word.len();
        self.chars.get(start..end) == Some(word)
            && !matches!(self.chars.get(end), Some(&c) if is_potential_identifier_char(c))
    }

    /// Offset of the next character to read.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Current 1-based line.
    #[inline]
    pub fn line(&self) -> i32 {
        self.line
    }

    /// Offset of the first character of the current line.
    #[inline]
    pub fn line_start(&self) -> u32 {
        self.line_start
    }

    /// Why the last read failed, if it did.
    #[inline]
    pub fn end(&self) -> Option<End> {
        self.end
    }

    /// Jump back to a position recorded earlier, restoring its line.
    ///
    /// Clears a reached [`End::Eof`]; an interactive end survives the jump.
    pub fn rewind(&mut self, pos: u32, line: i32, line_start: u32) {
        self.pos = pos;
        self.line = line;
        self.line_start = line_start;
        self.read_newline = false;
        if self.end != Some(End::Eof) {
            return;
        }
        self.end = None;
    }

    /// Move to `pos` on the current line.
    pub fn seek(&mut self, pos: u32) {
        self.pos = pos;
        self.read_newline = false;
    }

    /// The characters of `start..end`, clamped to the input.
    pub fn slice(&self, start: u32, end: u32) -> &'a [char] {
        let end = (end as usize).min(self.chars.len());
        let start = (start as usize).min(end);
        &self.chars[start..end]
    }

    /// Character at `pos`, without moving.
    #[inline]
    pub fn char_at(&self, pos: u32) -> Option<char> {
        self.at(pos)
    }
}
