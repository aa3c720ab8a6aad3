//! Token access for the grammar rules.
//!
//! Tokens are pulled from the tokenizer the first time a rule looks at a
//! position and kept for the rest of the parse, so backtracking and the
//! second pass never re-scan. `NAME` tokens spelling a reserved word are
//! promoted to their keyword kind here.

use serpent_ir::{ExprContext, Name, NodeId, NodeKind, NodeList, SourceRange, Token, TokenKind};
use serpent_lexer::Step;
use tracing::trace;

use crate::memo::{Entry, Memo, Rule};
use crate::{InputMode, Parser, TokenMeta, TypeIgnore};

/// Soft keywords: names that act as keywords only in some positions.
const SOFT_KEYWORDS: [&str; 3] = ["_", "case", "match"];

impl Parser<'_> {
    // === Fetching ===

    /// Read one more token from the tokenizer. `false` when interactive
    /// input ran out.
    fn fill(&mut self) -> bool {
        let mut token = loop {
            match self.tokenizer.next() {
                Step::NeedsMoreInput { line } => {
                    self.incomplete = Some(line);
                    self.error_indicator = true;
                    return false;
                }
                Step::Token(token) if token.kind == TokenKind::TypeIgnore => {
                    let text = self.tokenizer.token_text(&token);
                    let tag = self.arena.intern(&text);
                    self.type_ignores.push(TypeIgnore {
                        line: token.range.start_line,
                        tag,
                        range: token.range,
                    });
                }
                Step::Token(token) => break token,
            }
        };

        if self.mode == InputMode::Single
            && token.kind == TokenKind::EndMarker
            && self.parsing_started
        {
            token.kind = TokenKind::Newline;
            self.parsing_started = false;
            self.tokenizer.set_pending_dedents();
        } else {
            self.parsing_started = true;
        }

        let mut name = None;
        if token.kind == TokenKind::Name {
            let text = self.tokenizer.token_text(&token);
            match TokenKind::keyword(&text) {
                Some(keyword) => token.kind = keyword,
                None => name = Some(self.arena.intern(&text)),
            }
        }
        let level = u32::try_from(self.tokenizer.paren_level()).unwrap_or(u32::MAX);

        trace!(index = self.tokens.len(), kind = %token.kind, range = %token.range, "fetch");
        self.tokens.push(token);
        self.meta.push(TokenMeta { name, level });

        if token.kind == TokenKind::ErrorToken {
            self.tokenizer_error(token);
        }
        true
    }

    /// The token at the current position; `None` once an error has been
    /// reported.
    pub(crate) fn peek(&mut self) -> Option<Token> {
        if self.error_indicator {
            return None;
        }
        if self.pos >= self.tokens.len() && !self.fill() {
            return None;
        }
        self.tokens.get(self.pos).copied()
    }

    pub(crate) fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Is the current token of `kind`?
    #[inline]
    pub(crate) fn at(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consume the current token if it is of `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        let token = self.peek()?;
        if token.kind == kind {
            self.pos += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Consume the current token whatever it is.
    pub(crate) fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Consume a token that must be there; otherwise report
    /// "expected '`what`'" at the token found instead.
    pub(crate) fn eat_forced(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        let token = self.peek()?;
        if token.kind == kind {
            self.pos += 1;
            return Some(token);
        }
        self.raise_at(token.range, &format!("expected '{what}'"))
    }

    // === Names ===

    /// Interned text of the `NAME` token at `index`.
    pub(crate) fn name_at(&self, index: usize) -> Option<Name> {
        self.meta.get(index).and_then(|m| m.name)
    }

    /// Consume a `NAME` token.
    pub(crate) fn name_token(&mut self) -> Option<(Name, Token)> {
        let token = self.peek()?;
        if token.kind != TokenKind::Name {
            return None;
        }
        let name = self.name_at(self.pos)?;
        self.pos += 1;
        Some((name, token))
    }

    /// Consume a `NAME` token as a `Name` expression.
    pub(crate) fn name_expr(&mut self, ctx: ExprContext) -> Option<NodeId> {
        let (id, token) = self.name_token()?;
        Some(self.arena.alloc(NodeKind::Name { id, ctx }, token.range))
    }

    /// Is the current token the name `text`?
    pub(crate) fn at_name(&mut self, text: &str) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        token.kind == TokenKind::Name
            && self
                .name_at(self.pos)
                .is_some_and(|name| self.arena.name_str(name) == text)
    }

    /// Consume the soft keyword `text`.
    pub(crate) fn soft_keyword(&mut self, text: &str) -> Option<Token> {
        if self.at_name(text) {
            self.bump()
        } else {
            None
        }
    }

    /// Is the current token any soft keyword?
    pub(crate) fn at_any_soft_keyword(&mut self) -> bool {
        SOFT_KEYWORDS.iter().any(|kw| self.at_name(kw))
    }

    // === Backtracking ===

    #[inline]
    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    /// Run `f`; rewind if it fails.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.error_indicator {
            return None;
        }
        let mark = self.pos;
        let result = f(self);
        if result.is_none() {
            self.pos = mark;
        }
        result
    }

    /// Does `f` succeed here? Never consumes.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> bool {
        let mark = self.pos;
        let matched = f(self).is_some();
        self.pos = mark;
        matched
    }

    /// Is the current token one of `kinds`?
    pub(crate) fn at_any(&mut self, kinds: &[TokenKind]) -> bool {
        self.peek_kind().is_some_and(|k| kinds.contains(&k))
    }

    // === Memoization ===

    /// Run the node-producing rule `rule` at the current position, or replay
    /// its remembered outcome.
    pub(crate) fn memoized(
        &mut self,
        rule: Rule,
        f: impl FnOnce(&mut Self) -> Option<NodeId>,
    ) -> Option<NodeId> {
        if self.error_indicator {
            return None;
        }
        let start = self.pos;
        if let Some(entry) = self.memo.get(start, rule) {
            trace!(?rule, pos = start, "memo hit");
            self.pos = entry.end as usize;
            return match entry.value {
                Memo::Node(id) => Some(id),
                Memo::Failed | Memo::Nodes(_) => None,
            };
        }
        let result = f(self);
        let value = match result {
            Some(id) => Memo::Node(id),
            None => {
                self.pos = start;
                Memo::Failed
            }
        };
        self.remember(start, rule, value);
        result
    }

    /// [`memoized`](Self::memoized) for rules producing a list.
    pub(crate) fn memoized_list(
        &mut self,
        rule: Rule,
        f: impl FnOnce(&mut Self) -> Option<NodeList>,
    ) -> Option<NodeList> {
        if self.error_indicator {
            return None;
        }
        let start = self.pos;
        if let Some(entry) = self.memo.get(start, rule) {
            trace!(?rule, pos = start, "memo hit");
            self.pos = entry.end as usize;
            return match entry.value {
                Memo::Nodes(list) => Some(list),
                Memo::Failed | Memo::Node(_) => None,
            };
        }
        let result = f(self);
        let value = match result {
            Some(list) => Memo::Nodes(list),
            None => {
                self.pos = start;
                Memo::Failed
            }
        };
        self.remember(start, rule, value);
        result
    }

    fn remember(&mut self, start: usize, rule: Rule, value: Memo) {
        let end = u32::try_from(self.pos).unwrap_or(u32::MAX);
        self.memo.insert(start, rule, Entry { end, value });
    }

    // === Ranges ===

    /// Range from the token at `start` to the last non-whitespace token
    /// consumed so far.
    pub(crate) fn range_from(&self, start: usize) -> SourceRange {
        if start >= self.pos {
            return SourceRange::ARTIFICIAL;
        }
        let Some(first) = self.tokens.get(start) else {
            return SourceRange::ARTIFICIAL;
        };
        match self.last_non_whitespace() {
            Some(last) => first.range.with_end(last.range),
            None => first.range,
        }
    }

    /// The last consumed token that is not `NEWLINE`, `INDENT`, `DEDENT` or
    /// `ENDMARKER`.
    pub(crate) fn last_non_whitespace(&self) -> Option<Token> {
        self.tokens[..self.pos.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| !t.kind.is_whitespace())
            .copied()
    }

    /// The token just before the current position.
    pub(crate) fn previous(&self) -> Option<Token> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .copied()
    }

    /// Bracket depth after the token just before the current position.
    pub(crate) fn previous_level(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.meta.get(i))
            .map_or(0, |m| m.level)
    }

    /// Allocate a node spanning the tokens from `start` to here.
    pub(crate) fn node(&mut self, kind: NodeKind, start: usize) -> NodeId {
        let range = self.range_from(start);
        self.arena.alloc(kind, range)
    }

    /// Text of `token` as written.
    pub(crate) fn text(&self, token: &Token) -> String {
        self.tokenizer.token_text(token)
    }
}
