//! Statements.

mod compound;
mod import;
mod match_stmt;
mod simple;

use serpent_ir::{NodeId, NodeKind, TokenKind};

use crate::memo::Rule;
use crate::Parser;

impl Parser<'_> {
    // simple_stmt:
    //     | assignment
    //     | star_expressions
    //     | &'return' return_stmt
    //     | &('import' | 'from') import_stmt
    //     | &'raise' raise_stmt
    //     | 'pass'
    //     | &'del' del_stmt
    //     | &'yield' yield_stmt
    //     | &'assert' assert_stmt
    //     | 'break'
    //     | 'continue'
    //     | &'global' global_stmt
    //     | &'nonlocal' nonlocal_stmt
    pub(crate) fn simple_stmt(&mut self) -> Option<NodeId> {
        self.memoized(Rule::SimpleStmt, |p| {
            let start = p.mark();
            if let Some(stmt) = p.try_parse(Self::assignment) {
                return Some(stmt);
            }
            if let Some(value) = p.try_parse(Self::star_expressions) {
                return Some(p.node(NodeKind::ExprStmt { value }, start));
            }
            match p.peek_kind()? {
                TokenKind::KwReturn => p.return_stmt(),
                TokenKind::KwImport | TokenKind::KwFrom => p.import_stmt(),
                TokenKind::KwRaise => p.raise_stmt(),
                TokenKind::KwPass => p.keyword_stmt(NodeKind::Pass),
                TokenKind::KwDel => p.del_stmt(),
                TokenKind::KwYield => p.yield_stmt(),
                TokenKind::KwAssert => p.assert_stmt(),
                TokenKind::KwBreak => p.keyword_stmt(NodeKind::Break),
                TokenKind::KwContinue => p.keyword_stmt(NodeKind::Continue),
                TokenKind::KwGlobal => p.global_stmt(),
                TokenKind::KwNonlocal => p.nonlocal_stmt(),
                _ => None,
            }
        })
    }

    /// `pass`, `break` and `continue`.
    fn keyword_stmt(&mut self, kind: NodeKind) -> Option<NodeId> {
        let start = self.mark();
        self.bump()?;
        Some(self.node(kind, start))
    }

    // compound_stmt:
    //     | &('def' | '@' | ASYNC) function_def
    //     | &'if' if_stmt
    //     | &('class' | '@') class_def
    //     | &('with' | ASYNC) with_stmt
    //     | &('for' | ASYNC) for_stmt
    //     | &'try' try_stmt
    //     | &'while' while_stmt
    //     | match_stmt
    pub(crate) fn compound_stmt(&mut self) -> Option<NodeId> {
        match self.peek_kind()? {
            TokenKind::KwDef => self.function_def(),
            TokenKind::At => self
                .try_parse(Self::function_def)
                .or_else(|| self.class_def()),
            TokenKind::Async => self
                .try_parse(Self::function_def)
                .or_else(|| self.try_parse(Self::with_stmt))
                .or_else(|| self.for_stmt()),
            TokenKind::KwIf => self.if_stmt(),
            TokenKind::KwClass => self.class_def(),
            TokenKind::KwWith => self.with_stmt(),
            TokenKind::KwFor => self.for_stmt(),
            TokenKind::KwTry => self.try_stmt(),
            TokenKind::KwWhile => self.while_stmt(),
            TokenKind::Name => self.match_stmt(),
            _ => None,
        }
    }
}
