//! The tokenizer state machine.
//!
//! One [`Tokenizer`] lives for one tokenization session. [`Tokenizer::next`]
//! scans one token; everything it diagnoses along the way is buffered and
//! handed to the error callback only once the token is complete, so a token
//! abandoned for lack of interactive input leaves no trace.
//!
//! # Layout
//!
//! - `mod.rs`: state, the main dispatch, token construction
//! - `indent.rs`: start-of-line indentation and line continuations
//! - `number.rs`: numeric literals
//! - `string.rs`: string literals and escape warnings

use serpent_diagnostic::{Diagnostic, ErrorCallback, Severity};
use serpent_ir::{SourceRange, Token, TokenKind};
use serpent_lexer_core::{
    is_potential_identifier_char, is_potential_identifier_start, Cursor, End, SourceBuffer,
};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use crate::{LexError, TokenizerFlags};

mod indent;
mod number;
mod string;

/// Maximum bracket nesting.
const MAX_PAREN_LEVEL: usize = 200;

const TYPE_COMMENT_PREFIX: &[char] = &['#', ' ', 't', 'y', 'p', 'e', ':', ' '];
const TYPE_IGNORE: &[char] = &['i', 'g', 'n', 'o', 'r', 'e'];

/// Why the last `ERRORTOKEN` (or end of input) happened.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Status {
    Ok,
    Eof,
    /// Diagnosed by the tokenizer; the message has been reported.
    SyntaxError,
    TabsSpacesInconsistent,
    TooDeepIndentation,
    DedentInvalid,
    LineContinuationError,
    /// Interactive input ran out with incomplete-source reporting off.
    InteractiveStop,
}

/// Result of one [`Tokenizer::next`] call.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Step {
    Token(Token),
    /// Interactive input ended inside a construct; ask for more lines.
    NeedsMoreInput { line: i32 },
}

#[derive(Copy, Clone, Debug)]
struct Paren {
    open: char,
    line: i32,
    column: i32,
}

/// Error-tolerant, pull-based tokenizer over a [`SourceBuffer`].
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    errors: &'a mut dyn ErrorCallback,
    flags: TokenizerFlags,
    status: Status,
    error: Option<LexError>,
    /// Diagnostics for the token being scanned.
    pending: SmallVec<[Diagnostic; 2]>,

    token_start: u32,
    at_bol: bool,
    /// Set after a `COMMENT` on an otherwise blank line, consumed by the
    /// next call.
    comment_on_blank_line: bool,

    /// Positive: queued `INDENT`s. Negative: queued `DEDENT`s.
    pending_indents: i32,
    indents: SmallVec<[u32; 16]>,
    alt_indents: SmallVec<[u32; 16]>,
    parens: SmallVec<[Paren; 8]>,

    /// Where the current string literal began.
    first_line: i32,
    multi_line_start: u32,

    line_offset: i32,
    column_offset: i32,
}

impl<'a> Tokenizer<'a> {
    pub fn new(
        source: &'a SourceBuffer,
        flags: TokenizerFlags,
        errors: &'a mut dyn ErrorCallback,
    ) -> Self {
        let cursor = source
            .cursor()
            .with_final_newline(flags.contains(TokenizerFlags::EXEC_INPUT))
            .interactive(flags.contains(TokenizerFlags::INTERACTIVE));
        Tokenizer {
            cursor,
            errors,
            flags,
            status: Status::Ok,
            error: None,
            pending: SmallVec::new(),
            token_start: 0,
            at_bol: true,
            comment_on_blank_line: false,
            pending_indents: 0,
            indents: smallvec![0],
            alt_indents: smallvec![0],
            parens: SmallVec::new(),
            first_line: 1,
            multi_line_start: 0,
            line_offset: 0,
            column_offset: 0,
        }
    }

    /// Shift every reported range: the buffer starts at `(line + 1, column)`
    /// of some enclosing text.
    #[must_use]
    pub fn with_offset(mut self, line: i32, column: i32) -> Self {
        self.line_offset = line;
        self.column_offset = column;
        self
    }

    /// Scan the next token.
    pub fn next(&mut self) -> Step {
        self.pending.clear();
        let token = self.scan();
        if let Some(End::Incomplete { line }) = self.cursor.end() {
            self.pending.clear();
            trace!(line, "input incomplete");
            return Step::NeedsMoreInput { line };
        }
        for diagnostic in self.pending.drain(..) {
            match diagnostic.severity {
                Severity::Error => {
                    self.errors
                        .on_error(diagnostic.kind, diagnostic.range, &diagnostic.message);
                }
                Severity::Warning => {
                    self.errors
                        .on_warning(diagnostic.kind, diagnostic.range, &diagnostic.message);
                }
            }
        }
        trace!(kind = %token.kind, range = %token.range, "token");
        Step::Token(token)
    }

    // === Accessors ===

    /// Status of the last failure; [`Status::Ok`] until something fails.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The error behind the last `ERRORTOKEN`, if any.
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    pub fn flags(&self) -> TokenizerFlags {
        self.flags
    }

    /// Number of currently open brackets.
    pub fn paren_level(&self) -> usize {
        self.parens.len()
    }

    /// The innermost open bracket and where it is.
    pub fn innermost_paren(&self) -> Option<(char, SourceRange)> {
        self.parens.last().map(|p| {
            let line = p.line + self.line_offset;
            let column = if p.line == 1 {
                p.column + self.column_offset
            } else {
                p.column
            };
            (p.open, SourceRange::new(line, column, line, -1))
        })
    }

    /// Number of open indentation levels.
    pub fn indent_depth(&self) -> usize {
        self.indents.len() - 1
    }

    /// Close every open indentation level: the next `depth` tokens are
    /// `DEDENT`s.
    pub fn set_pending_dedents(&mut self) {
        let depth = self.indent_depth();
        if depth > 0 {
            self.pending_indents = -i32::try_from(depth).unwrap_or(i32::MAX);
            self.indents.truncate(1);
            self.alt_indents.truncate(1);
        }
    }

    pub fn set_report_incomplete_source(&mut self, yes: bool) {
        self.cursor.set_report_incomplete(yes);
    }

    pub fn report_incomplete_source(&self) -> bool {
        self.cursor.report_incomplete()
    }

    /// Current line, with the line offset applied.
    pub fn line(&self) -> i32 {
        self.cursor.line() + self.line_offset
    }

    /// Column `pos` would have on the current line.
    pub fn column_of(&self, pos: u32) -> i32 {
        let column = to_column(pos.saturating_sub(self.cursor.line_start()));
        if self.cursor.line() == 1 {
            column + self.column_offset
        } else {
            column
        }
    }

    /// Column of the next character to read.
    pub fn column(&self) -> i32 {
        self.column_of(self.cursor.pos())
    }

    /// Hand a diagnostic straight to the callback.
    pub fn errors_mut(&mut self) -> &mut dyn ErrorCallback {
        &mut *self.errors
    }

    // === Token text ===

    /// Text of `token`, clamped to the buffer, with `\r\n` and `\r` read as
    /// `\n`.
    pub fn token_text(&self, token: &Token) -> String {
        let chars = self.cursor.slice(token.start, token.end);
        let mut text = String::with_capacity(chars.len());
        let mut iter = chars.iter().copied().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' {
                if iter.peek() == Some(&'\n') {
                    iter.next();
                }
                text.push('\n');
            } else {
                text.push(c);
            }
        }
        text
    }

    /// `Token NAME [0, 1] (1, 0) (1, 1) 'a'`.
    pub fn render(&self, token: &Token) -> String {
        format!(
            "Token {} [{}, {}] ({}, {}) ({}, {}) '{}'",
            token.kind.name(),
            token.start,
            token.end,
            token.range.start_line,
            token.range.start_column,
            token.range.end_line,
            token.range.end_column,
            self.token_text(token)
        )
    }

    /// `range` with its end moved to the current position.
    pub fn extend_to_current(&self, range: SourceRange) -> SourceRange {
        range.with_end_at(self.line(), self.column())
    }

    /// Is there anything but whitespace and comments after the current
    /// position?
    pub fn is_bad_single_statement(&self) -> bool {
        let mut pos = self.cursor.pos();
        loop {
            match self.cursor.char_at(pos) {
                None => return false,
                Some(' ' | '\t' | '\x0c' | '\n' | '\r') => pos += 1,
                Some('#') => {
                    while !matches!(self.cursor.char_at(pos), None | Some('\n' | '\r')) {
                        pos += 1;
                    }
                }
                Some(_) => return true,
            }
        }
    }

    // === Reading ===

    fn bump(&mut self) -> Option<char> {
        let c = self.cursor.bump();
        if c.is_none() {
            match self.cursor.end() {
                Some(End::Eof) => self.status = Status::Eof,
                Some(End::InteractiveStop) => self.status = Status::InteractiveStop,
                Some(End::Incomplete { .. }) | None => {}
            }
        }
        c
    }

    /// Undo the read that produced `c`; reads that hit the end are not undone.
    fn back(&mut self, c: Option<char>) {
        if c.is_some() {
            self.cursor.back();
        }
    }

    fn has(&self, flag: TokenizerFlags) -> bool {
        self.flags.contains(flag)
    }

    // === Scanning ===

    fn scan(&mut self) -> Token {
        let mut blank_line = std::mem::take(&mut self.comment_on_blank_line);
        'next_line: loop {
            if self.at_bol {
                blank_line = match self.indentation() {
                    Ok(blank) => blank,
                    Err(token) => return token,
                };
            }
            self.token_start = self.cursor.pos();

            if self.pending_indents != 0 {
                if self.pending_indents < 0 {
                    self.pending_indents += 1;
                    return self.make(TokenKind::Dedent);
                }
                self.pending_indents -= 1;
                return self.make(TokenKind::Indent);
            }

            'again: loop {
                let mut c = self.bump();
                while matches!(c, Some(' ' | '\t' | '\x0c')) {
                    c = self.bump();
                }
                self.token_start = self.cursor.pos().saturating_sub(1);

                if c == Some('#') {
                    while !matches!(c, None | Some('\n')) {
                        c = self.bump();
                    }
                    if self.has(TokenizerFlags::TYPE_COMMENT) {
                        if let Some(token) = self.type_comment(c, blank_line) {
                            return token;
                        }
                    }
                    if self.has(TokenizerFlags::EXTRA_TOKENS) {
                        self.back(c);
                        self.comment_on_blank_line = blank_line;
                        return self.make(TokenKind::Comment);
                    }
                }

                if self.status == Status::InteractiveStop {
                    self.token_start = self.cursor.pos();
                    return self.make(TokenKind::EndMarker);
                }

                let Some(ch) = c else {
                    self.token_start = self.cursor.pos();
                    if let Some(paren) = self.parens.last() {
                        self.error = Some(LexError::NeverClosed { open: paren.open });
                        return self.make(TokenKind::ErrorToken);
                    }
                    if self.status == Status::Eof {
                        return self.make(TokenKind::EndMarker);
                    }
                    return self.make(TokenKind::ErrorToken);
                };

                if is_potential_identifier_start(ch) {
                    return self.identifier(ch);
                }

                if ch == '\n' {
                    self.at_bol = true;
                    if blank_line || !self.parens.is_empty() {
                        if self.has(TokenizerFlags::EXTRA_TOKENS) {
                            return self.make(TokenKind::Nl);
                        }
                        blank_line = false;
                        continue 'next_line;
                    }
                    return self.make(TokenKind::Newline);
                }

                if ch == '.' {
                    return self.period();
                }

                if ch.is_ascii_digit() {
                    return self.number(ch);
                }

                if ch == '"' || ch == '\'' {
                    return self.string(ch, string::Prefix::default());
                }

                if ch == '\\' {
                    if let Err(token) = self.continuation_line() {
                        return token;
                    }
                    continue 'again;
                }

                return self.operator(ch);
            }
        }
    }

    fn type_comment(&mut self, c: Option<char>, blank_line: bool) -> Option<Token> {
        let mut i = self.token_start;
        for &p in TYPE_COMMENT_PREFIX {
            if self.cursor.char_at(i).is_none() {
                return None;
            }
            if p == ' ' {
                while matches!(self.cursor.char_at(i), Some(' ' | '\t')) {
                    i += 1;
                }
            } else if self.cursor.char_at(i) == Some(p) {
                i += 1;
            } else {
                return None;
            }
        }
        let type_start = i;
        let ignore_end = i + 6;
        let end_char = self.cursor.char_at(ignore_end);
        self.back(c);
        let pos = self.cursor.pos();
        let is_ignore = pos >= ignore_end
            && self.cursor.slice(type_start, ignore_end) == TYPE_IGNORE
            && !(pos > ignore_end
                && end_char.is_some_and(|e| !e.is_ascii() || e.is_ascii_alphanumeric()));
        if is_ignore {
            if blank_line {
                self.bump();
                self.at_bol = true;
            }
            self.token_start = ignore_end;
            return Some(self.make(TokenKind::TypeIgnore));
        }
        self.token_start = type_start;
        Some(self.make(TokenKind::TypeComment))
    }

    fn identifier(&mut self, first: char) -> Token {
        let mut prefix = string::Prefix::default();
        let mut c = Some(first);
        loop {
            match c {
                Some('b' | 'B') if !(prefix.bytes || prefix.unicode || prefix.format) => {
                    prefix.bytes = true;
                }
                Some('u' | 'U')
                    if !(prefix.bytes || prefix.unicode || prefix.raw || prefix.format) =>
                {
                    prefix.unicode = true;
                }
                Some('r' | 'R') if !(prefix.raw || prefix.unicode) => prefix.raw = true,
                Some('f' | 'F') if !(prefix.format || prefix.bytes || prefix.unicode) => {
                    prefix.format = true;
                }
                _ => break,
            }
            c = self.bump();
            if let Some(quote @ ('"' | '\'')) = c {
                return self.string(quote, prefix);
            }
        }

        let mut non_ascii = false;
        while let Some(ch) = c.filter(|&ch| is_potential_identifier_char(ch)) {
            non_ascii |= !ch.is_ascii();
            c = self.bump();
        }
        self.back(c);

        let text = self.cursor.slice(self.token_start, self.cursor.pos());
        if non_ascii {
            if let Some(bad) = invalid_identifier_char(text) {
                return self.syntax_error(LexError::InvalidCharacter { ch: bad });
            }
        }
        match text {
            ['a', 's', 'y', 'n', 'c'] => self.make(TokenKind::Async),
            ['a', 'w', 'a', 'i', 't'] => self.make(TokenKind::Await),
            _ => self.make(TokenKind::Name),
        }
    }

    fn period(&mut self) -> Token {
        let c2 = self.bump();
        if c2.is_some_and(|d| d.is_ascii_digit()) {
            return self.fraction(c2);
        }
        if c2 == Some('.') {
            let c3 = self.bump();
            if c3 == Some('.') {
                return self.make(TokenKind::Ellipsis);
            }
            self.back(c3);
        }
        self.back(c2);
        self.make(TokenKind::Dot)
    }

    fn operator(&mut self, c1: char) -> Token {
        let c2 = self.bump();
        if let Some(c2) = c2 {
            let two = TokenKind::two_chars(c1, c2);
            if two != TokenKind::Op {
                let c3 = self.bump();
                if let Some(c3) = c3 {
                    let three = TokenKind::three_chars(c1, c2, c3);
                    if three != TokenKind::Op {
                        return self.make(three);
                    }
                }
                self.back(c3);
                return self.make(two);
            }
        }
        self.back(c2);

        match c1 {
            '(' | '[' | '{' => {
                if self.parens.len() >= MAX_PAREN_LEVEL {
                    return self.syntax_error(LexError::TooManyNestedParens);
                }
                self.parens.push(Paren {
                    open: c1,
                    line: self.cursor.line(),
                    column: to_column(self.token_start.saturating_sub(self.cursor.line_start())),
                });
            }
            ')' | ']' | '}' => {
                let Some(paren) = self.parens.pop() else {
                    return self.syntax_error(LexError::Unmatched { close: c1 });
                };
                let matches = matches!((paren.open, c1), ('(', ')') | ('[', ']') | ('{', '}'));
                if !matches {
                    let error = if paren.line == self.cursor.line() {
                        LexError::Mismatched {
                            close: c1,
                            open: paren.open,
                        }
                    } else {
                        LexError::MismatchedOnLine {
                            close: c1,
                            open: paren.open,
                            line: paren.line,
                        }
                    };
                    return self.syntax_error(error);
                }
            }
            _ => {}
        }
        self.make(TokenKind::one_char(c1))
    }

    // === Token construction ===

    fn make(&self, kind: TokenKind) -> Token {
        let range = match kind {
            TokenKind::EndMarker | TokenKind::Indent | TokenKind::Dedent => {
                SourceRange::synthetic(self.cursor.line() + self.line_offset)
            }
            TokenKind::String => self.token_range(true),
            _ => self.token_range(false),
        };
        Token::new(kind, range, self.token_start, self.cursor.pos())
    }

    /// Range of `token_start..pos`; a string starts on its first line.
    fn token_range(&self, string: bool) -> SourceRange {
        let (start_line, start_line_start) = if string {
            (self.first_line, self.multi_line_start)
        } else {
            (self.cursor.line(), self.cursor.line_start())
        };
        let end_line = self.cursor.line();
        let pos = self.cursor.pos();

        let mut column = if self.token_start >= start_line_start {
            to_column(self.token_start - start_line_start)
        } else {
            -1
        };
        let mut end_column = if pos >= self.cursor.line_start() {
            to_column(pos - self.cursor.line_start())
        } else {
            -1
        };
        if start_line == 1 {
            column += self.column_offset;
        }
        if end_line == 1 {
            end_column += self.column_offset;
        }
        SourceRange::new(
            start_line + self.line_offset,
            column,
            end_line + self.line_offset,
            end_column,
        )
    }

    /// Record `error`, buffer its diagnostic and produce an `ERRORTOKEN`.
    fn syntax_error(&mut self, error: LexError) -> Token {
        self.status = Status::SyntaxError;
        let token = self.make(TokenKind::ErrorToken);
        self.pending
            .push(Diagnostic::error(error.kind(), token.range, error.to_string()));
        self.error = Some(error);
        token
    }

    /// `ERRORTOKEN` whose diagnosis is left to the consumer.
    fn status_error(&mut self, status: Status, error: LexError) -> Token {
        self.status = status;
        self.error = Some(error);
        self.make(TokenKind::ErrorToken)
    }

    fn warn(&mut self, warning: LexError) {
        let range = self.token_range(false);
        self.pending
            .push(Diagnostic::warning(warning.kind(), range, warning.to_string()));
    }

    fn warn_string(&mut self, warning: LexError) {
        let range = self.token_range(true);
        self.pending
            .push(Diagnostic::warning(warning.kind(), range, warning.to_string()));
    }
}

/// First character of `text` that breaks `XID_Start XID_Continue*`.
fn invalid_identifier_char(text: &[char]) -> Option<char> {
    let (&first, rest) = text.split_first()?;
    if first != '_' && !unicode_ident::is_xid_start(first) {
        return Some(first);
    }
    rest.iter()
        .copied()
        .find(|&c| !unicode_ident::is_xid_continue(c))
}

#[inline]
fn to_column(offset: u32) -> i32 {
    i32::try_from(offset).unwrap_or(i32::MAX)
}

/// Tokenize all of `source`, stopping after `ENDMARKER`, the first
/// `ERRORTOKEN`, or a request for more input.
pub fn tokenize(
    source: &SourceBuffer,
    flags: TokenizerFlags,
    errors: &mut dyn ErrorCallback,
) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(source, flags, errors);
    let mut tokens = Vec::new();
    while let Step::Token(token) = tokenizer.next() {
        tokens.push(token);
        if matches!(token.kind, TokenKind::EndMarker | TokenKind::ErrorToken) {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests;
