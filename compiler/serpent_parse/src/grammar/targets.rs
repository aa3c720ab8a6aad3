//! Assignment and deletion targets.
//!
//! Targets are read with their final context (`Store` or `Del`) already
//! set. `t_primary` is the chain in front of a target's last `.name` or
//! `[subscript]`; it only extends while another `.`, `(` or `[` follows, so
//! the last link is left to the target rule itself.

use serpent_ir::{ExprContext, NodeId, NodeKind, NodeList, TokenKind};

use crate::grammar::Nodes;
use crate::memo::Rule;
use crate::Parser;

impl Parser<'_> {
    // === Assignment ===

    // star_targets:
    //     | star_target !','
    //     | star_target (',' star_target)* [',']
    pub(crate) fn star_targets(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let first = self.star_target()?;
        if !self.at(TokenKind::Comma) {
            return Some(first);
        }
        let mut elts = Nodes::new();
        elts.push(first);
        while let Some(elt) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.star_target()
        }) {
            elts.push(elt);
        }
        self.eat(TokenKind::Comma);
        Some(self.sequence_target(&elts, start, false, ExprContext::Store))
    }

    /// `Tuple` (or `List` when `list`) of targets in context `ctx`.
    fn sequence_target(
        &mut self,
        elts: &[NodeId],
        start: usize,
        list: bool,
        ctx: ExprContext,
    ) -> NodeId {
        let elts = self.arena.alloc_list(elts);
        let kind = if list {
            NodeKind::List { elts, ctx }
        } else {
            NodeKind::Tuple { elts, ctx }
        };
        self.node(kind, start)
    }

    // star_target:
    //     | '*' (!'*' star_target)
    //     | target_with_star_atom
    pub(crate) fn star_target(&mut self) -> Option<NodeId> {
        self.memoized(Rule::StarTarget, |p| {
            let start = p.mark();
            if p.eat(TokenKind::Star).is_some() {
                if p.at(TokenKind::Star) {
                    p.reset(start);
                    return None;
                }
                let Some(value) = p.star_target() else {
                    p.reset(start);
                    return None;
                };
                return Some(p.node(
                    NodeKind::Starred {
                        value,
                        ctx: ExprContext::Store,
                    },
                    start,
                ));
            }
            p.target_with_star_atom()
        })
    }

    // target_with_star_atom:
    //     | t_primary '.' NAME !t_lookahead
    //     | t_primary '[' slices ']' !t_lookahead
    //     | star_atom
    fn target_with_star_atom(&mut self) -> Option<NodeId> {
        self.memoized(Rule::TargetWithStarAtom, |p| {
            p.single_subscript_attribute_target(ExprContext::Store)
                .or_else(|| p.star_atom())
        })
    }

    // star_atom:
    //     | NAME
    //     | '(' target_with_star_atom ')'
    //     | '(' [star_targets_tuple_seq] ')'
    //     | '[' [star_targets_list_seq] ']'
    fn star_atom(&mut self) -> Option<NodeId> {
        let start = self.mark();
        match self.peek_kind()? {
            TokenKind::Name => self.name_expr(ExprContext::Store),
            TokenKind::LPar => self
                .try_parse(|p| {
                    p.bump()?;
                    let target = p.target_with_star_atom()?;
                    p.eat(TokenKind::RPar)?;
                    Some(target)
                })
                .or_else(|| {
                    self.try_parse(|p| {
                        p.bump()?;
                        let elts = p.star_targets_tuple_seq().unwrap_or_default();
                        p.eat(TokenKind::RPar)?;
                        Some(p.sequence_target(&elts, start, false, ExprContext::Store))
                    })
                }),
            TokenKind::LSqb => self.try_parse(|p| {
                p.bump()?;
                let elts = p.star_targets_list_seq().unwrap_or_default();
                p.eat(TokenKind::RSqb)?;
                Some(p.sequence_target(&elts, start, true, ExprContext::Store))
            }),
            _ => None,
        }
    }

    // star_targets_list_seq: ','.star_target+ [',']
    fn star_targets_list_seq(&mut self) -> Option<Nodes> {
        let mut elts = Nodes::new();
        elts.push(self.star_target()?);
        while let Some(elt) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.star_target()
        }) {
            elts.push(elt);
        }
        self.eat(TokenKind::Comma);
        Some(elts)
    }

    // star_targets_tuple_seq:
    //     | star_target (',' star_target)+ [',']
    //     | star_target ','
    fn star_targets_tuple_seq(&mut self) -> Option<Nodes> {
        let start = self.mark();
        let elts = self.star_targets_list_seq()?;
        let trailing_comma = self
            .previous()
            .is_some_and(|token| token.kind == TokenKind::Comma);
        if elts.len() == 1 && !trailing_comma {
            self.reset(start);
            return None;
        }
        Some(elts)
    }

    // single_target:
    //     | single_subscript_attribute_target
    //     | NAME
    //     | '(' single_target ')'
    pub(crate) fn single_target(&mut self) -> Option<NodeId> {
        if let Some(target) = self.single_subscript_attribute_target(ExprContext::Store) {
            return Some(target);
        }
        if let Some(name) = self.name_expr(ExprContext::Store) {
            return Some(name);
        }
        self.try_parse(|p| {
            p.eat(TokenKind::LPar)?;
            let target = p.single_target()?;
            p.eat(TokenKind::RPar)?;
            Some(target)
        })
    }

    // single_subscript_attribute_target:
    //     | t_primary '.' NAME !t_lookahead
    //     | t_primary '[' slices ']' !t_lookahead
    pub(crate) fn single_subscript_attribute_target(&mut self, ctx: ExprContext) -> Option<NodeId> {
        let start = self.mark();
        self.try_parse(|p| {
            let value = p.t_primary()?;
            if !p.at_any(&[TokenKind::Dot, TokenKind::LSqb]) {
                return None;
            }
            let target = p.postfix(value, start, ctx)?;
            if p.at_t_lookahead() {
                return None;
            }
            Some(target)
        })
    }

    // === Deletion ===

    // del_targets: ','.del_target+ [',']
    pub(crate) fn del_targets(&mut self) -> Option<NodeList> {
        let elts = self.del_target_seq()?;
        Some(self.arena.alloc_list(&elts))
    }

    fn del_target_seq(&mut self) -> Option<Nodes> {
        let mut elts = Nodes::new();
        elts.push(self.del_target()?);
        while let Some(elt) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.del_target()
        }) {
            elts.push(elt);
        }
        self.eat(TokenKind::Comma);
        Some(elts)
    }

    // del_target:
    //     | t_primary '.' NAME !t_lookahead
    //     | t_primary '[' slices ']' !t_lookahead
    //     | del_t_atom
    fn del_target(&mut self) -> Option<NodeId> {
        self.memoized(Rule::DelTarget, |p| {
            p.single_subscript_attribute_target(ExprContext::Del)
                .or_else(|| p.del_t_atom())
        })
    }

    // del_t_atom:
    //     | NAME
    //     | '(' del_target ')'
    //     | '(' [del_targets] ')'
    //     | '[' [del_targets] ']'
    fn del_t_atom(&mut self) -> Option<NodeId> {
        let start = self.mark();
        match self.peek_kind()? {
            TokenKind::Name => self.name_expr(ExprContext::Del),
            TokenKind::LPar => self
                .try_parse(|p| {
                    p.bump()?;
                    let target = p.del_target()?;
                    p.eat(TokenKind::RPar)?;
                    Some(target)
                })
                .or_else(|| {
                    self.try_parse(|p| {
                        p.bump()?;
                        let elts = p.del_target_seq().unwrap_or_default();
                        p.eat(TokenKind::RPar)?;
                        Some(p.sequence_target(&elts, start, false, ExprContext::Del))
                    })
                }),
            TokenKind::LSqb => self.try_parse(|p| {
                p.bump()?;
                let elts = p.del_target_seq().unwrap_or_default();
                p.eat(TokenKind::RSqb)?;
                Some(p.sequence_target(&elts, start, true, ExprContext::Del))
            }),
            _ => None,
        }
    }

    // === Target prefixes ===

    // t_primary:
    //     | t_primary '.' NAME &t_lookahead
    //     | t_primary '[' slices ']' &t_lookahead
    //     | t_primary genexp &t_lookahead
    //     | t_primary '(' [arguments] ')' &t_lookahead
    //     | atom &t_lookahead
    fn t_primary(&mut self) -> Option<NodeId> {
        self.memoized(Rule::TPrimary, |p| {
            let start = p.mark();
            let mut expr = p.atom()?;
            if !p.at_t_lookahead() {
                p.reset(start);
                return None;
            }
            loop {
                let mark = p.mark();
                match p.postfix(expr, start, ExprContext::Load) {
                    Some(next) if p.at_t_lookahead() => expr = next,
                    _ => {
                        p.reset(mark);
                        break;
                    }
                }
            }
            Some(expr)
        })
    }

    // t_lookahead: '(' | '[' | '.'
    fn at_t_lookahead(&mut self) -> bool {
        self.at_any(&[TokenKind::LPar, TokenKind::LSqb, TokenKind::Dot])
    }
}
