//! Error alternatives of `expression` and `named_expression`.
//!
//! These run in the second pass at every position an expression may start,
//! so each one backs out quickly unless the input really is malformed.

use serpent_ir::{ExprContext, NodeId, NodeKind, TokenKind};

use crate::Parser;

/// Statements from older versions of the language that are now functions.
const LEGACY_STATEMENTS: [&str; 2] = ["print", "exec"];

impl Parser<'_> {
    // invalid_expression:
    //     | invalid_legacy_expression
    //     | !(NAME STRING | SOFT_KEYWORD) disjunction expression_without_invalid
    //     | disjunction 'if' disjunction !('else' | ':')
    pub(crate) fn invalid_expression(&mut self) -> Option<()> {
        let start = self.mark();
        self.invalid_legacy_expression();
        if self.error_indicator {
            return None;
        }
        self.reset(start);

        let excluded = self.at_any_soft_keyword()
            || self.look_ahead(|p| {
                p.name_token()?;
                p.eat(TokenKind::String)
            });
        if !excluded {
            if let Some((first, second)) = self.try_parse(|p| {
                let first = p.disjunction()?;
                let second = p.expression_without_invalid()?;
                Some((first, second))
            }) {
                if !self.is_legacy_name(first) && self.previous_level() > 0 {
                    return self.raise_nodes(first, second, "invalid syntax. Perhaps you forgot a comma?");
                }
            }
            self.reset(start);
        }

        let body = self.disjunction()?;
        self.eat(TokenKind::KwIf)?;
        let test = self.disjunction()?;
        if self.at_any(&[TokenKind::KwElse, TokenKind::Colon]) {
            return None;
        }
        self.raise_nodes(body, test, "expected 'else' after 'if' expression")
    }

    // invalid_legacy_expression: NAME !'(' star_expressions
    fn invalid_legacy_expression(&mut self) -> Option<()> {
        let name = self.name_expr(ExprContext::Load)?;
        if !self.is_legacy_name(name) || self.at(TokenKind::LPar) {
            return None;
        }
        let args = self.star_expressions()?;
        let NodeKind::Name { id, .. } = *self.arena.kind(name) else {
            return None;
        };
        let statement = self.arena.name_str(id).to_owned();
        let message = format!(
            "Missing parentheses in call to '{statement}'. Did you mean {statement}(...)?"
        );
        self.raise_nodes(name, args, &message)
    }

    fn is_legacy_name(&self, expr: NodeId) -> bool {
        match *self.arena.kind(expr) {
            NodeKind::Name { id, .. } => LEGACY_STATEMENTS.contains(&self.arena.name_str(id)),
            _ => false,
        }
    }

    /// `expression` with the error alternatives switched off.
    fn expression_without_invalid(&mut self) -> Option<NodeId> {
        let saved = self.call_invalid_rules;
        self.call_invalid_rules = false;
        let expr = self.conditional_expression();
        self.call_invalid_rules = saved;
        expr
    }

    // invalid_named_expression:
    //     | expression ':=' expression
    //     | NAME '=' bitwise_or !('=' | ':=')
    //     | !(list | tuple | genexp | 'True' | 'None' | 'False')
    //           bitwise_or '=' bitwise_or !('=' | ':=')
    pub(crate) fn invalid_named_expression(&mut self) -> Option<()> {
        let start = self.mark();
        if let Some(target) = self.try_parse(|p| {
            let target = p.expression()?;
            p.eat(TokenKind::ColonEqual)?;
            p.expression()?;
            Some(target)
        }) {
            let message = format!(
                "cannot use assignment expressions with {}",
                self.arena.expr_name(target)
            );
            return self.raise_at_node(target, &message);
        }
        self.reset(start);

        if let Some((name, value)) = self.try_parse(|p| {
            let name = p.name_expr(ExprContext::Load)?;
            p.eat(TokenKind::Equal)?;
            let value = p.bitwise_or()?;
            if p.at_any(&[TokenKind::Equal, TokenKind::ColonEqual]) {
                return None;
            }
            Some((name, value))
        }) {
            return self.raise_nodes(
                name,
                value,
                "invalid syntax. Maybe you meant '==' or ':=' instead of '='?",
            );
        }
        self.reset(start);

        let excluded = self.at_any(&[TokenKind::KwTrue, TokenKind::KwNone, TokenKind::KwFalse])
            || self.look_ahead(Self::list)
            || self.look_ahead(Self::tuple)
            || self.look_ahead(Self::genexp);
        if excluded {
            return None;
        }
        let target = self.bitwise_or()?;
        self.eat(TokenKind::Equal)?;
        self.bitwise_or()?;
        if self.at_any(&[TokenKind::Equal, TokenKind::ColonEqual]) {
            return None;
        }
        let message = format!(
            "cannot assign to {} here. Maybe you meant '==' instead of '='?",
            self.arena.expr_name(target)
        );
        self.raise_at_node(target, &message)
    }
}
