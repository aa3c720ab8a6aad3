//! Assignments and the keyword-led simple statements.

use serpent_ir::{BinOp, ExprContext, NodeId, NodeKind, TokenKind};

use crate::error::Targets;
use crate::grammar::Nodes;
use crate::Parser;

impl Parser<'_> {
    // assignment:
    //     | NAME ':' expression ['=' annotated_rhs]
    //     | ('(' single_target ')' | single_subscript_attribute_target)
    //           ':' expression ['=' annotated_rhs]
    //     | (star_targets '=')+ (yield_expr | star_expressions) !'=' [TYPE_COMMENT]
    //     | single_target augassign ~ (yield_expr | star_expressions)
    //     | invalid_assignment
    pub(crate) fn assignment(&mut self) -> Option<NodeId> {
        let start = self.mark();

        let annotated = self.try_parse(|p| {
            let target = p.name_expr(ExprContext::Store)?;
            p.annotation_tail(target, true, start)
        });
        if annotated.is_some() {
            return annotated;
        }

        let annotated = self.try_parse(|p| {
            let target = p
                .try_parse(|p| {
                    p.eat(TokenKind::LPar)?;
                    let target = p.single_target()?;
                    p.eat(TokenKind::RPar)?;
                    Some(target)
                })
                .or_else(|| p.single_subscript_attribute_target(ExprContext::Store))?;
            p.annotation_tail(target, false, start)
        });
        if annotated.is_some() {
            return annotated;
        }

        let assign = self.try_parse(|p| {
            let mut targets = Nodes::new();
            while let Some(target) = p.try_parse(|p| {
                let target = p.star_targets()?;
                p.eat(TokenKind::Equal)?;
                Some(target)
            }) {
                targets.push(target);
            }
            if targets.is_empty() {
                return None;
            }
            let value = p.annotated_rhs()?;
            if p.at(TokenKind::Equal) {
                return None;
            }
            let type_comment = p.type_comment();
            let targets = p.arena.alloc_list(&targets);
            Some(p.node(
                NodeKind::Assign {
                    targets,
                    value,
                    type_comment,
                },
                start,
            ))
        });
        if assign.is_some() {
            return assign;
        }

        if let Some(target) = self.try_parse(Self::single_target) {
            if let Some(op) = self.augassign() {
                // Past the operator there is no other way to read the line.
                let Some(value) = self.annotated_rhs() else {
                    self.reset(start);
                    return None;
                };
                return Some(self.node(NodeKind::AugAssign { target, op, value }, start));
            }
            self.reset(start);
        }

        self.invalid(Self::invalid_assignment);
        None
    }

    /// `':' expression ['=' annotated_rhs]` after an annotation target.
    fn annotation_tail(&mut self, target: NodeId, simple: bool, start: usize) -> Option<NodeId> {
        self.eat(TokenKind::Colon)?;
        let annotation = self.expression()?;
        let value = self.try_parse(|p| {
            p.eat(TokenKind::Equal)?;
            p.annotated_rhs()
        });
        Some(self.node(
            NodeKind::AnnAssign {
                target,
                annotation,
                value,
                simple,
            },
            start,
        ))
    }

    // annotated_rhs: yield_expr | star_expressions
    pub(crate) fn annotated_rhs(&mut self) -> Option<NodeId> {
        if self.at(TokenKind::KwYield) {
            return self.yield_expr();
        }
        self.star_expressions()
    }

    fn augassign(&mut self) -> Option<BinOp> {
        let op = match self.peek_kind()? {
            TokenKind::PlusEqual => BinOp::Add,
            TokenKind::MinEqual => BinOp::Sub,
            TokenKind::StarEqual => BinOp::Mult,
            TokenKind::AtEqual => BinOp::MatMult,
            TokenKind::SlashEqual => BinOp::Div,
            TokenKind::PercentEqual => BinOp::Mod,
            TokenKind::AmperEqual => BinOp::BitAnd,
            TokenKind::VBarEqual => BinOp::BitOr,
            TokenKind::CircumflexEqual => BinOp::BitXor,
            TokenKind::LeftShiftEqual => BinOp::LShift,
            TokenKind::RightShiftEqual => BinOp::RShift,
            TokenKind::DoubleStarEqual => BinOp::Pow,
            TokenKind::DoubleSlashEqual => BinOp::FloorDiv,
            _ => return None,
        };
        self.bump()?;
        Some(op)
    }

    // invalid_assignment:
    //     | invalid_ann_assign_target ':' expression
    //     | star_named_expression ',' star_named_expressions* ':' expression
    //     | expression ':' expression
    //     | (star_targets '=')* star_expressions '='
    //     | (star_targets '=')* yield_expr '='
    //     | star_expressions augassign (yield_expr | star_expressions)
    fn invalid_assignment(&mut self) -> Option<()> {
        if let Some(target) = self.try_parse(|p| {
            let target = p.invalid_ann_assign_target()?;
            p.eat(TokenKind::Colon)?;
            p.expression()?;
            Some(target)
        }) {
            let message = format!(
                "only single target (not {}) can be annotated",
                self.arena.expr_name(target)
            );
            return self.raise_at_node(target, &message);
        }

        if let Some(first) = self.try_parse(|p| {
            let first = p.star_named_expression()?;
            p.eat(TokenKind::Comma)?;
            while p.try_parse(Self::star_named_expressions).is_some() {}
            p.eat(TokenKind::Colon)?;
            p.expression()?;
            Some(first)
        }) {
            return self.raise_at_node(first, "only single target (not tuple) can be annotated");
        }

        if let Some(target) = self.try_parse(|p| {
            let target = p.expression()?;
            p.eat(TokenKind::Colon)?;
            p.expression()?;
            Some(target)
        }) {
            return self.raise_at_node(target, "illegal target for annotation");
        }

        if let Some(target) = self.try_parse(|p| {
            p.skip_assignment_targets();
            let target = p.star_expressions()?;
            p.eat(TokenKind::Equal)?;
            Some(target)
        }) {
            return self.raise_invalid_target(Targets::Star, target);
        }

        if let Some(target) = self.try_parse(|p| {
            p.skip_assignment_targets();
            let target = p.yield_expr()?;
            p.eat(TokenKind::Equal)?;
            Some(target)
        }) {
            return self.raise_at_node(target, "assignment to yield expression not possible");
        }

        let target = self.try_parse(|p| {
            let target = p.star_expressions()?;
            p.augassign()?;
            p.annotated_rhs()?;
            Some(target)
        })?;
        let message = format!(
            "'{}' is an illegal expression for augmented assignment",
            self.arena.expr_name(target)
        );
        self.raise_at_node(target, &message)
    }

    /// `(star_targets '=')*`
    fn skip_assignment_targets(&mut self) {
        while self
            .try_parse(|p| {
                p.star_targets()?;
                p.eat(TokenKind::Equal)
            })
            .is_some()
        {}
    }

    // invalid_ann_assign_target:
    //     | list
    //     | tuple
    //     | '(' invalid_ann_assign_target ')'
    fn invalid_ann_assign_target(&mut self) -> Option<NodeId> {
        if let Some(list) = self.try_parse(Self::list) {
            return Some(list);
        }
        if let Some(tuple) = self.try_parse(Self::tuple) {
            return Some(tuple);
        }
        self.try_parse(|p| {
            p.eat(TokenKind::LPar)?;
            let inner = p.invalid_ann_assign_target()?;
            p.eat(TokenKind::RPar)?;
            Some(inner)
        })
    }

    // === Keyword statements ===

    // return_stmt: 'return' [star_expressions]
    pub(crate) fn return_stmt(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::KwReturn)?;
        let value = self.star_expressions();
        Some(self.node(NodeKind::Return { value }, start))
    }

    // raise_stmt:
    //     | 'raise' expression ['from' expression]
    //     | 'raise'
    pub(crate) fn raise_stmt(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::KwRaise)?;
        let Some(exc) = self.expression() else {
            return Some(self.node(
                NodeKind::Raise {
                    exc: None,
                    cause: None,
                },
                start,
            ));
        };
        let cause = self.try_parse(|p| {
            p.eat(TokenKind::KwFrom)?;
            p.expression()
        });
        Some(self.node(
            NodeKind::Raise {
                exc: Some(exc),
                cause,
            },
            start,
        ))
    }

    // global_stmt: 'global' ','.NAME+
    pub(crate) fn global_stmt(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::KwGlobal)?;
        let Some(names) = self.name_list() else {
            self.reset(start);
            return None;
        };
        Some(self.node(NodeKind::Global { names }, start))
    }

    // nonlocal_stmt: 'nonlocal' ','.NAME+
    pub(crate) fn nonlocal_stmt(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::KwNonlocal)?;
        let Some(names) = self.name_list() else {
            self.reset(start);
            return None;
        };
        Some(self.node(NodeKind::Nonlocal { names }, start))
    }

    /// `','.NAME+`
    fn name_list(&mut self) -> Option<serpent_ir::NameList> {
        let (first, _) = self.name_token()?;
        let mut names = vec![first];
        while let Some(name) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.name_token().map(|(name, _)| name)
        }) {
            names.push(name);
        }
        Some(self.arena.alloc_names(&names))
    }

    // del_stmt:
    //     | 'del' del_targets &(';' | NEWLINE)
    //     | invalid_del_stmt
    pub(crate) fn del_stmt(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let stmt = self.try_parse(|p| {
            p.eat(TokenKind::KwDel)?;
            let targets = p.del_targets()?;
            if !p.at_any(&[TokenKind::Semi, TokenKind::Newline]) {
                return None;
            }
            Some(p.node(NodeKind::Delete { targets }, start))
        });
        if stmt.is_some() {
            return stmt;
        }
        // invalid_del_stmt: 'del' star_expressions
        self.invalid(|p| {
            p.eat(TokenKind::KwDel)?;
            let target = p.star_expressions()?;
            p.raise_invalid_target(Targets::Del, target)
        });
        None
    }

    // yield_stmt: yield_expr
    pub(crate) fn yield_stmt(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let value = self.yield_expr()?;
        Some(self.node(NodeKind::ExprStmt { value }, start))
    }

    // assert_stmt: 'assert' expression [',' expression]
    pub(crate) fn assert_stmt(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::KwAssert)?;
        let Some(test) = self.expression() else {
            self.reset(start);
            return None;
        };
        let msg = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.expression()
        });
        Some(self.node(NodeKind::Assert { test, msg }, start))
    }
}
