//! Attribute access, calls and subscripts.

use serpent_ir::{ExprContext, NodeId, NodeKind, NodeList, TokenKind};

use crate::grammar::Nodes;
use crate::memo::Rule;
use crate::Parser;

impl Parser<'_> {
    // primary:
    //     | primary '.' NAME
    //     | primary genexp
    //     | primary '(' [arguments] ')'
    //     | primary '[' slices ']'
    //     | atom
    pub(crate) fn primary(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Primary, |p| {
            let start = p.mark();
            let mut expr = p.atom()?;
            while let Some(next) = p.postfix(expr, start, ExprContext::Load) {
                expr = next;
            }
            Some(expr)
        })
    }

    /// One `.NAME`, call or subscript applied to `value`.
    pub(crate) fn postfix(
        &mut self,
        value: NodeId,
        start: usize,
        ctx: ExprContext,
    ) -> Option<NodeId> {
        match self.peek_kind()? {
            TokenKind::Dot => self.try_parse(|p| {
                p.bump()?;
                let (attr, _) = p.name_token()?;
                Some(p.node(NodeKind::Attribute { value, attr, ctx }, start))
            }),
            TokenKind::LPar => {
                if let Some(genexp) = self.try_parse(Self::genexp) {
                    let args = self.arena.alloc_list(&[genexp]);
                    return Some(self.node(
                        NodeKind::Call {
                            func: value,
                            args,
                            keywords: NodeList::EMPTY,
                        },
                        start,
                    ));
                }
                self.try_parse(|p| {
                    p.bump()?;
                    let arguments = p.arguments();
                    p.eat(TokenKind::RPar)?;
                    let (args, keywords) = p.call_parts(arguments);
                    Some(p.node(
                        NodeKind::Call {
                            func: value,
                            args,
                            keywords,
                        },
                        start,
                    ))
                })
            }
            TokenKind::LSqb => self.try_parse(|p| {
                p.bump()?;
                let slice = p.slices()?;
                p.eat(TokenKind::RSqb)?;
                Some(p.node(NodeKind::Subscript { value, slice, ctx }, start))
            }),
            _ => None,
        }
    }

    /// Positional and keyword arguments of the placeholder call built by
    /// `arguments`.
    pub(crate) fn call_parts(&self, arguments: Option<NodeId>) -> (NodeList, NodeList) {
        match arguments.map(|call| self.arena.kind(call)) {
            Some(&NodeKind::Call { args, keywords, .. }) => (args, keywords),
            _ => (NodeList::EMPTY, NodeList::EMPTY),
        }
    }

    // slices:
    //     | slice !','
    //     | ','.slice+ [',']
    pub(crate) fn slices(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let first = self.slice()?;
        if !self.at(TokenKind::Comma) {
            return Some(first);
        }
        let mut elts = Nodes::new();
        elts.push(first);
        while self.eat(TokenKind::Comma).is_some() {
            match self.slice() {
                Some(elt) => elts.push(elt),
                None => break,
            }
        }
        Some(self.tuple_node(&elts, start))
    }

    // slice:
    //     | [expression] ':' [expression] [':' [expression]]
    //     | named_expression
    fn slice(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let ranged = self.try_parse(|p| {
            let lower = p.expression();
            p.eat(TokenKind::Colon)?;
            let upper = p.expression();
            let step = p
                .try_parse(|p| {
                    p.eat(TokenKind::Colon)?;
                    Some(p.expression())
                })
                .flatten();
            Some(p.node(NodeKind::Slice { lower, upper, step }, start))
        });
        if ranged.is_some() {
            return ranged;
        }
        self.named_expression()
    }
}
