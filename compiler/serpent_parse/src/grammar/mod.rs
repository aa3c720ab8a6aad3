//! Grammar rules.
//!
//! Each rule is a method on [`Parser`] returning `Option`: `Some` with the
//! position advanced past what it matched, or `None` with the position
//! unchanged. Alternatives are tried in order and the first success wins.
//! Rules named `invalid_*` only run in the second pass; they either report
//! an error or fail.
//!
//! # Layout
//!
//! - `mod.rs`: start rules, statement lists, blocks
//! - `stmt/`: simple and compound statements, `match`
//! - `expr/`: expressions from `star_expressions` down to atoms
//! - `params.rs`: `def` and `lambda` parameter lists
//! - `targets.rs`: assignment and deletion targets
//! - `pattern.rs`: `case` patterns
//! - `strings.rs`: string concatenation and f-strings
//! - `invalid.rs`: error alternatives shared by several rules

mod expr;
mod invalid;
mod params;
mod pattern;
mod stmt;
mod strings;
mod targets;

use serpent_ir::{NodeId, NodeKind, NodeList, TokenKind};
use serpent_stack::ensure_sufficient_stack;
use smallvec::SmallVec;
use tracing::debug;

use crate::memo::Rule;
use crate::{InputMode, Parser};

/// Scratch list of nodes built by a rule before it goes into the arena.
pub(crate) type Nodes = SmallVec<[NodeId; 8]>;

impl Parser<'_> {
    /// The start rule for the parse mode.
    pub(crate) fn start_rule(&mut self) -> Option<NodeId> {
        debug!(mode = ?self.mode, invalid_rules = self.call_invalid_rules, "pass");
        match self.mode {
            InputMode::File => self.file(),
            InputMode::Eval => self.eval(),
            InputMode::Single => self.interactive(),
            InputMode::FString => self.star_expressions(),
        }
    }

    /// Run `rule` only in the error pass, and never let it move the cursor.
    pub(crate) fn invalid(&mut self, rule: impl FnOnce(&mut Self) -> Option<()>) {
        if !self.call_invalid_rules || self.error_indicator {
            return;
        }
        let mark = self.mark();
        let _ = rule(self);
        self.reset(mark);
    }

    // === Start rules ===

    // file: [statements] ENDMARKER
    fn file(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let body = self.statements().unwrap_or(NodeList::EMPTY);
        self.eat(TokenKind::EndMarker)?;
        let type_ignores = self.type_ignore_nodes();
        Some(self.node(NodeKind::Module { body, type_ignores }, start))
    }

    // eval: expressions NEWLINE* ENDMARKER
    fn eval(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let body = self.expressions()?;
        while self.eat(TokenKind::Newline).is_some() {}
        self.eat(TokenKind::EndMarker)?;
        Some(self.node(NodeKind::Expression { body }, start))
    }

    // interactive: statement_newline
    fn interactive(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let body = self.statement_newline()?;
        Some(self.node(NodeKind::Interactive { body }, start))
    }

    fn type_ignore_nodes(&mut self) -> NodeList {
        let mut nodes = Nodes::new();
        for i in 0..self.type_ignores.len() {
            let ignore = self.type_ignores[i];
            let lineno = u32::try_from(ignore.line).unwrap_or(0);
            let kind = NodeKind::TypeIgnore {
                lineno,
                tag: ignore.tag,
            };
            nodes.push(self.arena.alloc(kind, ignore.range));
        }
        self.arena.alloc_list(&nodes)
    }

    // === Statements ===

    // statements: statement+
    pub(crate) fn statements(&mut self) -> Option<NodeList> {
        let mut body = Nodes::new();
        while self.statement(&mut body).is_some() {}
        if body.is_empty() {
            return None;
        }
        Some(self.arena.alloc_list(&body))
    }

    // statement: compound_stmt | simple_stmts
    fn statement(&mut self, out: &mut Nodes) -> Option<()> {
        ensure_sufficient_stack(|| {
            if let Some(stmt) = self.compound_stmt() {
                out.push(stmt);
                return Some(());
            }
            self.simple_stmts(out)
        })
    }

    // statement_newline:
    //     | compound_stmt NEWLINE
    //     | simple_stmts
    //     | NEWLINE
    //     | ENDMARKER
    fn statement_newline(&mut self) -> Option<NodeList> {
        let start = self.mark();
        if let Some(stmt) = self.try_parse(|p| {
            let stmt = p.compound_stmt()?;
            p.eat(TokenKind::Newline)?;
            Some(stmt)
        }) {
            return Some(self.arena.alloc_list(&[stmt]));
        }
        let mut out = Nodes::new();
        if self.simple_stmts(&mut out).is_some() {
            return Some(self.arena.alloc_list(&out));
        }
        if self.eat(TokenKind::Newline).is_some() {
            let pass = self.node(NodeKind::Pass, start);
            return Some(self.arena.alloc_list(&[pass]));
        }
        // An empty interactive statement ends the session.
        None
    }

    // simple_stmts:
    //     | simple_stmt !';' NEWLINE
    //     | ';'.simple_stmt+ [';'] NEWLINE
    pub(crate) fn simple_stmts(&mut self, out: &mut Nodes) -> Option<()> {
        let mark = self.mark();
        let len = out.len();
        let first = self.simple_stmt()?;
        out.push(first);
        while self.eat(TokenKind::Semi).is_some() {
            match self.simple_stmt() {
                Some(stmt) => out.push(stmt),
                None => break,
            }
        }
        if self.eat(TokenKind::Newline).is_some() {
            return Some(());
        }
        out.truncate(len);
        self.reset(mark);
        None
    }

    // block:
    //     | NEWLINE INDENT statements DEDENT
    //     | simple_stmts
    //     | invalid_block
    pub(crate) fn block(&mut self) -> Option<NodeList> {
        self.memoized_list(Rule::Block, |p| {
            let indented = p.try_parse(|p| {
                p.eat(TokenKind::Newline)?;
                p.eat(TokenKind::Indent)?;
                let body = p.statements()?;
                p.eat(TokenKind::Dedent)?;
                Some(body)
            });
            if indented.is_some() {
                return indented;
            }
            let mut out = Nodes::new();
            if p.simple_stmts(&mut out).is_some() {
                return Some(p.arena.alloc_list(&out));
            }
            p.invalid(Self::invalid_block);
            None
        })
    }

    // invalid_block: NEWLINE !INDENT
    fn invalid_block(&mut self) -> Option<()> {
        self.eat(TokenKind::Newline)?;
        if self.at(TokenKind::Indent) {
            return None;
        }
        self.raise_indentation_error("expected an indented block")
    }

    /// `NEWLINE !INDENT` after the `:` of the compound statement `what`
    /// starting on `line`.
    pub(crate) fn missing_indented_block(&mut self, what: &str, line: i32) -> Option<()> {
        self.eat(TokenKind::Newline)?;
        if self.at(TokenKind::Indent) {
            return None;
        }
        self.raise_indentation_error(&format!(
            "expected an indented block after {what} on line {line}"
        ))
    }

    /// Optional `TYPE_COMMENT` token, interned.
    pub(crate) fn type_comment(&mut self) -> Option<serpent_ir::Name> {
        let token = self.eat(TokenKind::TypeComment)?;
        let text = self.text(&token);
        Some(self.arena.intern(&text))
    }
}
