//! The `match` statement. `match` and `case` are soft keywords, so every
//! rule here starts by checking a `NAME` token's text.

use serpent_ir::{ExprContext, NodeId, NodeKind, TokenKind};

use crate::grammar::Nodes;
use crate::Parser;

impl Parser<'_> {
    // match_stmt:
    //     | "match" subject_expr ':' NEWLINE INDENT case_block+ DEDENT
    //     | invalid_match_stmt
    pub(crate) fn match_stmt(&mut self) -> Option<NodeId> {
        if !self.at_name("match") {
            return None;
        }
        let start = self.mark();
        let stmt = self.try_parse(|p| {
            p.soft_keyword("match")?;
            let subject = p.subject_expr()?;
            p.eat(TokenKind::Colon)?;
            p.eat(TokenKind::Newline)?;
            p.eat(TokenKind::Indent)?;
            let mut cases = Nodes::new();
            while let Some(case) = p.case_block() {
                cases.push(case);
            }
            if cases.is_empty() {
                return None;
            }
            p.eat(TokenKind::Dedent)?;
            let cases = p.arena.alloc_list(&cases);
            Some(p.node(NodeKind::Match { subject, cases }, start))
        });
        if stmt.is_some() {
            return stmt;
        }
        self.invalid(Self::invalid_match_stmt);
        None
    }

    // subject_expr:
    //     | star_named_expression ',' star_named_expressions?
    //     | named_expression
    fn subject_expr(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let tuple = self.try_parse(|p| {
            let first = p.star_named_expression()?;
            p.eat(TokenKind::Comma)?;
            let mut elts = Nodes::new();
            elts.push(first);
            if let Some(rest) = p.star_named_expressions() {
                elts.extend(rest);
            }
            let elts = p.arena.alloc_list(&elts);
            Some(p.node(
                NodeKind::Tuple {
                    elts,
                    ctx: ExprContext::Load,
                },
                start,
            ))
        });
        if tuple.is_some() {
            return tuple;
        }
        self.named_expression()
    }

    // invalid_match_stmt:
    //     | "match" subject_expr !':'
    //     | "match" subject_expr ':' NEWLINE !INDENT
    fn invalid_match_stmt(&mut self) -> Option<()> {
        let header = self.soft_keyword("match")?;
        self.subject_expr()?;
        if !self.at(TokenKind::Colon) {
            return self.raise_syntax_error("expected ':'");
        }
        self.bump()?;
        self.missing_indented_block("'match' statement", header.range.start_line)
    }

    // case_block:
    //     | invalid_case_block
    //     | "case" patterns guard? ':' block
    fn case_block(&mut self) -> Option<NodeId> {
        if !self.at_name("case") {
            return None;
        }
        self.invalid(Self::invalid_case_block);
        let start = self.mark();
        self.try_parse(|p| {
            p.soft_keyword("case")?;
            let pattern = p.patterns()?;
            let guard = p.guard();
            p.eat(TokenKind::Colon)?;
            let body = p.block()?;
            Some(p.node(
                NodeKind::MatchCase {
                    pattern,
                    guard,
                    body,
                },
                start,
            ))
        })
    }

    // guard: 'if' named_expression
    fn guard(&mut self) -> Option<NodeId> {
        self.try_parse(|p| {
            p.eat(TokenKind::KwIf)?;
            p.named_expression()
        })
    }

    // invalid_case_block:
    //     | "case" patterns guard? !':'
    //     | "case" patterns guard? ':' NEWLINE !INDENT
    fn invalid_case_block(&mut self) -> Option<()> {
        let header = self.soft_keyword("case")?;
        self.patterns()?;
        self.guard();
        if !self.at(TokenKind::Colon) {
            return self.raise_syntax_error("expected ':'");
        }
        self.bump()?;
        self.missing_indented_block("'case' statement", header.range.start_line)
    }
}
