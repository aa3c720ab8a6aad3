//! Expressions, from `star_expressions` down to the boolean operators.
//!
//! Operator precedence is encoded in the call chain: `expression` calls
//! `disjunction`, which calls `conjunction`, and so on down to `atom` in
//! `atom.rs`. Each level only handles its own operators.

mod args;
mod atom;
mod lambda;
mod operators;
mod primary;

use serpent_ir::{BoolOp, ExprContext, NodeId, NodeKind, TokenKind, UnaryOp};
use serpent_stack::ensure_sufficient_stack;

use crate::grammar::Nodes;
use crate::memo::Rule;
use crate::Parser;

impl Parser<'_> {
    // === Expression lists ===

    // star_expressions:
    //     | star_expression (',' star_expression)+ [',']
    //     | star_expression ','
    //     | star_expression
    pub(crate) fn star_expressions(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let first = self.star_expression()?;
        if !self.at(TokenKind::Comma) {
            return Some(first);
        }
        let mut elts = Nodes::new();
        elts.push(first);
        while self.eat(TokenKind::Comma).is_some() {
            match self.star_expression() {
                Some(elt) => elts.push(elt),
                None => break,
            }
        }
        Some(self.tuple_node(&elts, start))
    }

    // star_expression:
    //     | '*' bitwise_or
    //     | expression
    pub(crate) fn star_expression(&mut self) -> Option<NodeId> {
        self.memoized(Rule::StarExpression, |p| {
            p.starred_bitwise_or().or_else(|| p.expression())
        })
    }

    /// `'*' bitwise_or` as a `Starred` load.
    fn starred_bitwise_or(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(TokenKind::Star)?;
            let value = p.bitwise_or()?;
            Some(p.node(
                NodeKind::Starred {
                    value,
                    ctx: ExprContext::Load,
                },
                start,
            ))
        })
    }

    // star_named_expressions: ','.star_named_expression+ [',']
    pub(crate) fn star_named_expressions(&mut self) -> Option<Nodes> {
        let mut elts = Nodes::new();
        elts.push(self.star_named_expression()?);
        while let Some(elt) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.star_named_expression()
        }) {
            elts.push(elt);
        }
        self.eat(TokenKind::Comma);
        Some(elts)
    }

    // star_named_expression:
    //     | '*' bitwise_or
    //     | named_expression
    pub(crate) fn star_named_expression(&mut self) -> Option<NodeId> {
        self.starred_bitwise_or()
            .or_else(|| self.named_expression())
    }

    // assignment_expression: NAME ':=' ~ expression
    pub(crate) fn assignment_expression(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let target = self.try_parse(|p| {
            let target = p.name_expr(ExprContext::Store)?;
            p.eat(TokenKind::ColonEqual)?;
            Some(target)
        })?;
        let Some(value) = self.expression() else {
            self.reset(start);
            return None;
        };
        Some(self.node(NodeKind::NamedExpr { target, value }, start))
    }

    /// `NAME ':='` ahead: past that point an assignment expression is the
    /// only reading.
    pub(crate) fn at_assignment_expression(&mut self) -> bool {
        self.look_ahead(|p| {
            p.name_token()?;
            p.eat(TokenKind::ColonEqual)
        })
    }

    // named_expression:
    //     | assignment_expression
    //     | invalid_named_expression
    //     | expression !':='
    pub(crate) fn named_expression(&mut self) -> Option<NodeId> {
        if self.at_assignment_expression() {
            return self.assignment_expression();
        }
        self.invalid(Self::invalid_named_expression);
        let start = self.mark();
        let expr = self.expression()?;
        if self.at(TokenKind::ColonEqual) {
            self.reset(start);
            return None;
        }
        Some(expr)
    }

    // expressions:
    //     | expression (',' expression)+ [',']
    //     | expression ','
    //     | expression
    pub(crate) fn expressions(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let first = self.expression()?;
        if !self.at(TokenKind::Comma) {
            return Some(first);
        }
        let mut elts = Nodes::new();
        elts.push(first);
        while self.eat(TokenKind::Comma).is_some() {
            match self.expression() {
                Some(elt) => elts.push(elt),
                None => break,
            }
        }
        Some(self.tuple_node(&elts, start))
    }

    pub(crate) fn tuple_node(&mut self, elts: &[NodeId], start: usize) -> NodeId {
        let elts = self.arena.alloc_list(elts);
        self.node(
            NodeKind::Tuple {
                elts,
                ctx: ExprContext::Load,
            },
            start,
        )
    }

    // === Conditional expressions ===

    // expression:
    //     | invalid_expression
    //     | disjunction 'if' disjunction 'else' expression
    //     | disjunction
    //     | lambdef
    pub(crate) fn expression(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Expression, |p| {
            ensure_sufficient_stack(|| {
                p.invalid(Self::invalid_expression);
                p.conditional_expression()
            })
        })
    }

    /// `expression` without its error alternative and memo entry.
    pub(crate) fn conditional_expression(&mut self) -> Option<NodeId> {
        if self.at(TokenKind::KwLambda) {
            return self.lambdef();
        }
        let start = self.mark();
        let body = self.disjunction()?;
        let conditional = self.try_parse(|p| {
            p.eat(TokenKind::KwIf)?;
            let test = p.disjunction()?;
            p.eat(TokenKind::KwElse)?;
            let orelse = p.expression()?;
            Some((test, orelse))
        });
        Some(match conditional {
            Some((test, orelse)) => self.node(NodeKind::IfExp { test, body, orelse }, start),
            None => body,
        })
    }

    // yield_expr:
    //     | 'yield' 'from' expression
    //     | 'yield' [star_expressions]
    pub(crate) fn yield_expr(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::KwYield)?;
        if self.eat(TokenKind::KwFrom).is_some() {
            let Some(value) = self.expression() else {
                self.reset(start);
                return None;
            };
            return Some(self.node(NodeKind::YieldFrom { value }, start));
        }
        let value = self.star_expressions();
        Some(self.node(NodeKind::Yield { value }, start))
    }

    // === Boolean operators ===

    // disjunction:
    //     | conjunction ('or' conjunction)+
    //     | conjunction
    pub(crate) fn disjunction(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Disjunction, |p| {
            p.bool_chain(TokenKind::KwOr, BoolOp::Or, Self::conjunction)
        })
    }

    // conjunction:
    //     | inversion ('and' inversion)+
    //     | inversion
    fn conjunction(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Conjunction, |p| {
            p.bool_chain(TokenKind::KwAnd, BoolOp::And, Self::inversion)
        })
    }

    /// `operand (keyword operand)*`, flattened into one `BoolOp` when there
    /// is more than one operand.
    fn bool_chain(
        &mut self,
        keyword: TokenKind,
        op: BoolOp,
        operand: fn(&mut Self) -> Option<NodeId>,
    ) -> Option<NodeId> {
        let start = self.mark();
        let first = operand(self)?;
        let mut values = Nodes::new();
        values.push(first);
        while let Some(value) = self.try_parse(|p| {
            p.eat(keyword)?;
            operand(p)
        }) {
            values.push(value);
        }
        if values.len() == 1 {
            return Some(first);
        }
        let values = self.arena.alloc_list(&values);
        Some(self.node(NodeKind::BoolOp { op, values }, start))
    }

    // inversion:
    //     | 'not' inversion
    //     | comparison
    fn inversion(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Inversion, |p| {
            let start = p.mark();
            if p.eat(TokenKind::KwNot).is_some() {
                if let Some(operand) = p.inversion() {
                    return Some(p.node(
                        NodeKind::UnaryOp {
                            op: UnaryOp::Not,
                            operand,
                        },
                        start,
                    ));
                }
                p.reset(start);
            }
            p.comparison()
        })
    }
}
