//! Indentation at the start of a line, and backslash continuations.

use serpent_ir::Token;

use super::{Status, Tokenizer};
use crate::{LexError, TokenizerFlags};

const TAB_SIZE: u32 = 8;
const ALT_TAB_SIZE: u32 = 1;
const MAX_INDENT: usize = 100;

impl Tokenizer<'_> {
    /// Measure the indentation of a fresh line and queue `INDENT`/`DEDENT`s.
    ///
    /// Returns whether the line is blank (empty or comment only).
    pub(super) fn indentation(&mut self) -> Result<bool, Token> {
        let mut col = 0u32;
        let mut altcol = 0u32;
        let mut cont_line_col = 0u32;
        self.at_bol = false;

        let c = loop {
            let c = self.bump();
            match c {
                Some(' ') => {
                    col += 1;
                    altcol += 1;
                }
                Some('\t') => {
                    col = (col / TAB_SIZE + 1) * TAB_SIZE;
                    altcol = (altcol / ALT_TAB_SIZE + 1) * ALT_TAB_SIZE;
                }
                Some('\x0c') => {
                    col = 0;
                    altcol = 0;
                }
                Some('\\') => {
                    if cont_line_col == 0 {
                        cont_line_col = col;
                    }
                    self.continuation_line()?;
                }
                _ => break c,
            }
        };
        self.back(c);

        let mut blank_line = false;
        if matches!(c, Some('#' | '\n')) {
            // At the prompt an empty line closes open blocks, and a blank
            // first line still counts.
            let let_through = self.has(TokenizerFlags::INTERACTIVE)
                && ((col == 0 && c == Some('\n')) || self.cursor.line() == 1);
            if let_through {
                col = 0;
                altcol = 0;
            } else {
                blank_line = true;
            }
        }

        if blank_line || !self.parens.is_empty() {
            return Ok(blank_line);
        }

        if cont_line_col != 0 {
            col = cont_line_col;
            altcol = cont_line_col;
        }
        let top = self.indents.last().copied().unwrap_or(0);
        let alt_top = self.alt_indents.last().copied().unwrap_or(0);

        if col == top {
            if altcol != alt_top {
                return Err(self.inconsistent_tabs());
            }
        } else if col > top {
            if self.indents.len() >= MAX_INDENT {
                return Err(
                    self.status_error(Status::TooDeepIndentation, LexError::TooDeepIndentation)
                );
            }
            if altcol <= alt_top {
                return Err(self.inconsistent_tabs());
            }
            self.pending_indents += 1;
            self.indents.push(col);
            self.alt_indents.push(altcol);
        } else {
            while self.indents.len() > 1 && self.indents.last().is_some_and(|&top| col < top) {
                self.pending_indents -= 1;
                self.indents.pop();
                self.alt_indents.pop();
            }
            if self.indents.last().copied() != Some(col) {
                return Err(self.status_error(Status::DedentInvalid, LexError::DedentInvalid));
            }
            if self.alt_indents.last().copied() != Some(altcol) {
                return Err(self.inconsistent_tabs());
            }
        }
        Ok(false)
    }

    fn inconsistent_tabs(&mut self) -> Token {
        self.status_error(Status::TabsSpacesInconsistent, LexError::InconsistentTabs)
    }

    /// After a `\`: the next character must be a newline, and the input must
    /// go on after it.
    pub(super) fn continuation_line(&mut self) -> Result<(), Token> {
        let c = self.bump();
        if c.is_none() {
            return Err(self.status_error(Status::Eof, LexError::UnexpectedEof));
        }
        if c != Some('\n') {
            return Err(
                self.status_error(Status::LineContinuationError, LexError::LineContinuation)
            );
        }
        let c = self.bump();
        if c.is_none() {
            return Err(self.status_error(Status::Eof, LexError::UnexpectedEof));
        }
        self.back(c);
        Ok(())
    }
}
