//! Reporting syntax errors.
//!
//! Every error goes to the tokenizer's [`ErrorCallback`] and sets the error
//! indicator, after which every rule fails and the parse unwinds. Helpers
//! return `Option<T>` so a rule can `return self.raise_...(...)`.
//!
//! [`ErrorCallback`]: serpent_diagnostic::ErrorCallback

use serpent_diagnostic::ErrorKind;
use serpent_ir::{CmpOp, NodeId, NodeKind, SourceRange, Token, TokenKind};
use serpent_lexer::{LexError, Status};
use tracing::debug;

use crate::{InputMode, Parser};

/// Which kind of target list an invalid-target diagnostic is about.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Targets {
    /// Assignment and `with ... as` targets.
    Star,
    Del,
    For,
}

impl Parser<'_> {
    /// Report `message` at `range` and stop the parse.
    pub(crate) fn raise_error<T>(
        &mut self,
        kind: ErrorKind,
        range: SourceRange,
        message: &str,
    ) -> Option<T> {
        self.error_indicator = true;
        debug!(?kind, %range, message, "syntax error");
        if self.mode == InputMode::FString && !message.starts_with("f-string") {
            let message = format!("f-string: {message}");
            self.tokenizer.errors_mut().on_error(kind, range, &message);
        } else {
            self.tokenizer.errors_mut().on_error(kind, range, message);
        }
        None
    }

    pub(crate) fn raise_at<T>(&mut self, range: SourceRange, message: &str) -> Option<T> {
        self.raise_error(ErrorKind::Syntax, range, message)
    }

    /// Syntax error at `node`.
    pub(crate) fn raise_at_node<T>(&mut self, node: NodeId, message: &str) -> Option<T> {
        let range = self.arena.range(node);
        self.raise_at(range, message)
    }

    /// Syntax error from the start of `start` to the end of `end`.
    pub(crate) fn raise_between<T>(
        &mut self,
        start: SourceRange,
        end: SourceRange,
        message: &str,
    ) -> Option<T> {
        self.raise_at(start.with_end(end), message)
    }

    /// Syntax error spanning from node `start` to node `end`.
    pub(crate) fn raise_nodes<T>(&mut self, start: NodeId, end: NodeId, message: &str) -> Option<T> {
        let start = self.arena.range(start);
        let end = if end.is_none() { start } else { self.arena.range(end) };
        self.raise_between(start, end, message)
    }

    /// Syntax error at the last token read.
    pub(crate) fn raise_syntax_error<T>(&mut self, message: &str) -> Option<T> {
        let range = self.error_token_range();
        self.raise_at(range, message)
    }

    /// Indentation error at the last token read.
    pub(crate) fn raise_indentation_error<T>(&mut self, message: &str) -> Option<T> {
        let range = self.error_token_range();
        self.raise_error(ErrorKind::Indentation, range, message)
    }

    /// Syntax error from `range` to the tokenizer's current position.
    pub(crate) fn raise_starting_from<T>(&mut self, range: SourceRange, message: &str) -> Option<T> {
        let range = self.tokenizer.extend_to_current(range);
        self.raise_at(range, message)
    }

    fn error_token_range(&self) -> SourceRange {
        match self.tokens.last() {
            Some(token) => token.range,
            None => {
                let line = self.tokenizer.line();
                SourceRange::new(line, 0, line, 0)
            }
        }
    }

    // === Assignment targets ===

    /// The first sub-expression of `expr` that cannot be a target of the
    /// given kind.
    pub(crate) fn invalid_target(&self, expr: NodeId, targets: Targets) -> Option<NodeId> {
        match *self.arena.kind(expr) {
            NodeKind::List { elts, .. } | NodeKind::Tuple { elts, .. } => self
                .arena
                .list(elts)
                .iter()
                .find_map(|&elt| self.invalid_target(elt, targets)),
            NodeKind::Starred { value, .. } => {
                if targets == Targets::Del {
                    Some(expr)
                } else {
                    self.invalid_target(value, targets)
                }
            }
            NodeKind::Compare { left, ops, .. } => {
                if targets != Targets::For {
                    return Some(expr);
                }
                if self.arena.ops(ops).first() == Some(&CmpOp::In) {
                    self.invalid_target(left, targets)
                } else {
                    None
                }
            }
            NodeKind::Name { .. } | NodeKind::Subscript { .. } | NodeKind::Attribute { .. } => None,
            _ => Some(expr),
        }
    }

    /// "cannot assign to ..." / "cannot delete ..." for the offending part of
    /// `expr`, or plain "invalid syntax" when every part is a valid target.
    pub(crate) fn raise_invalid_target<T>(&mut self, targets: Targets, expr: NodeId) -> Option<T> {
        if let Some(bad) = self.invalid_target(expr, targets) {
            let verb = match targets {
                Targets::Star | Targets::For => "cannot assign to",
                Targets::Del => "cannot delete",
            };
            let message = format!("{verb} {}", self.arena.expr_name(bad));
            return self.raise_at_node(bad, &message);
        }
        self.raise_syntax_error("invalid syntax")
    }

    // === Tokenizer failures ===

    /// "'(' was never closed" at the innermost open bracket.
    pub(crate) fn raise_unclosed_paren(&mut self) {
        if let Some((open, range)) = self.tokenizer.innermost_paren() {
            let message = LexError::NeverClosed { open }.to_string();
            self.raise_at::<()>(range, &message);
        }
    }

    /// Report the failure behind an `ERRORTOKEN` unless the tokenizer already
    /// did.
    pub(crate) fn tokenizer_error(&mut self, token: Token) {
        let line = self.tokenizer.line();
        let (error, range) = match self.tokenizer.status() {
            Status::SyntaxError => {
                self.error_indicator = true;
                return;
            }
            Status::Eof => {
                if self.tokenizer.paren_level() > 0 {
                    self.raise_unclosed_paren();
                } else {
                    self.raise_syntax_error::<()>("unexpected EOF while parsing");
                }
                return;
            }
            Status::DedentInvalid => (LexError::DedentInvalid, token.range),
            Status::TabsSpacesInconsistent => {
                (LexError::InconsistentTabs, SourceRange::new(line, 0, line, -1))
            }
            Status::TooDeepIndentation => {
                (LexError::TooDeepIndentation, SourceRange::new(line, 0, line, -1))
            }
            Status::LineContinuationError => {
                let column = self.tokenizer.column();
                (LexError::LineContinuation, SourceRange::new(line, column, line, -1))
            }
            Status::Ok | Status::InteractiveStop => {
                self.raise_at::<()>(
                    SourceRange::new(line, 0, line, -1),
                    "unknown parsing error",
                );
                return;
            }
        };
        self.raise_error::<()>(error.kind(), range, &error.to_string());
    }

    /// Last resort after both passes failed silently: blame the furthest
    /// token read.
    pub(crate) fn report_failure(&mut self) {
        let Some(last) = self.tokens.last().copied() else {
            self.raise_syntax_error::<()>("error at start before reading any input");
            return;
        };
        match last.kind {
            TokenKind::ErrorToken if self.tokenizer.status() == Status::Eof => {
                if self.tokenizer.paren_level() > 0 {
                    self.raise_unclosed_paren();
                } else {
                    self.raise_syntax_error::<()>("unexpected EOF while parsing");
                }
            }
            TokenKind::Indent => {
                self.raise_indentation_error::<()>("unexpected indent");
            }
            TokenKind::Dedent => {
                self.raise_indentation_error::<()>("unexpected unindent");
            }
            _ => {
                self.raise_at::<()>(last.range, "invalid syntax");
            }
        }
    }
}
