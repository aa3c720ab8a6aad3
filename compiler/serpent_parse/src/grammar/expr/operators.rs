//! Comparison, binary and unary operators.

use serpent_ir::{BinOp, CmpOp, NodeId, NodeKind, TokenKind, UnaryOp};
use smallvec::SmallVec;

use crate::grammar::Nodes;
use crate::memo::Rule;
use crate::Parser;

impl Parser<'_> {
    // comparison:
    //     | bitwise_or compare_op_bitwise_or_pair+
    //     | bitwise_or
    pub(crate) fn comparison(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let left = self.bitwise_or()?;
        let mut ops: SmallVec<[CmpOp; 4]> = SmallVec::new();
        let mut comparators = Nodes::new();
        while let Some((op, right)) = self.try_parse(|p| {
            let op = p.compare_op()?;
            let right = p.bitwise_or()?;
            Some((op, right))
        }) {
            ops.push(op);
            comparators.push(right);
        }
        if ops.is_empty() {
            return Some(left);
        }
        let ops = self.arena.alloc_ops(&ops);
        let comparators = self.arena.alloc_list(&comparators);
        Some(self.node(
            NodeKind::Compare {
                left,
                ops,
                comparators,
            },
            start,
        ))
    }

    // compare_op_bitwise_or_pair:
    //     '==' | '!=' | '<=' | '<' | '>=' | '>' | 'not' 'in' | 'in' | 'is' 'not' | 'is'
    fn compare_op(&mut self) -> Option<CmpOp> {
        let op = match self.bump()?.kind {
            TokenKind::EqEqual => CmpOp::Eq,
            TokenKind::NotEqual => CmpOp::NotEq,
            TokenKind::LessEqual => CmpOp::LtE,
            TokenKind::Less => CmpOp::Lt,
            TokenKind::GreaterEqual => CmpOp::GtE,
            TokenKind::Greater => CmpOp::Gt,
            TokenKind::KwIn => CmpOp::In,
            TokenKind::KwNot => {
                self.eat(TokenKind::KwIn)?;
                CmpOp::NotIn
            }
            TokenKind::KwIs => {
                if self.eat(TokenKind::KwNot).is_some() {
                    CmpOp::IsNot
                } else {
                    CmpOp::Is
                }
            }
            _ => return None,
        };
        Some(op)
    }

    // bitwise_or: bitwise_or '|' bitwise_xor | bitwise_xor
    pub(crate) fn bitwise_or(&mut self) -> Option<NodeId> {
        self.memoized(Rule::BitwiseOr, |p| {
            p.binary_chain(Self::bitwise_xor, |kind| {
                (kind == TokenKind::VBar).then_some(BinOp::BitOr)
            })
        })
    }

    // bitwise_xor: bitwise_xor '^' bitwise_and | bitwise_and
    fn bitwise_xor(&mut self) -> Option<NodeId> {
        self.binary_chain(Self::bitwise_and, |kind| {
            (kind == TokenKind::Circumflex).then_some(BinOp::BitXor)
        })
    }

    // bitwise_and: bitwise_and '&' shift_expr | shift_expr
    fn bitwise_and(&mut self) -> Option<NodeId> {
        self.binary_chain(Self::shift_expr, |kind| {
            (kind == TokenKind::Amper).then_some(BinOp::BitAnd)
        })
    }

    // shift_expr:
    //     | shift_expr '<<' sum
    //     | shift_expr '>>' sum
    //     | sum
    fn shift_expr(&mut self) -> Option<NodeId> {
        self.binary_chain(Self::sum, |kind| match kind {
            TokenKind::LeftShift => Some(BinOp::LShift),
            TokenKind::RightShift => Some(BinOp::RShift),
            _ => None,
        })
    }

    // sum:
    //     | sum '+' term
    //     | sum '-' term
    //     | term
    pub(crate) fn sum(&mut self) -> Option<NodeId> {
        self.binary_chain(Self::term, |kind| match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    // term:
    //     | term '*' factor
    //     | term '/' factor
    //     | term '//' factor
    //     | term '%' factor
    //     | term '@' factor
    //     | factor
    fn term(&mut self) -> Option<NodeId> {
        self.binary_chain(Self::factor, |kind| match kind {
            TokenKind::Star => Some(BinOp::Mult),
            TokenKind::Slash => Some(BinOp::Div),
            TokenKind::DoubleSlash => Some(BinOp::FloorDiv),
            TokenKind::Percent => Some(BinOp::Mod),
            TokenKind::At => Some(BinOp::MatMult),
            _ => None,
        })
    }

    /// A left-recursive binary rule, read as `operand (op operand)*` and
    /// folded to the left.
    fn binary_chain(
        &mut self,
        operand: fn(&mut Self) -> Option<NodeId>,
        operator: fn(TokenKind) -> Option<BinOp>,
    ) -> Option<NodeId> {
        let start = self.mark();
        let mut left = operand(self)?;
        loop {
            let mark = self.mark();
            let Some(op) = self.peek_kind().and_then(operator) else {
                break;
            };
            self.bump();
            let Some(right) = operand(self) else {
                self.reset(mark);
                break;
            };
            left = self.node(NodeKind::BinOp { left, op, right }, start);
        }
        Some(left)
    }

    // factor:
    //     | '+' factor
    //     | '-' factor
    //     | '~' factor
    //     | power
    pub(crate) fn factor(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Factor, |p| {
            let start = p.mark();
            let op = match p.peek_kind()? {
                TokenKind::Plus => UnaryOp::UAdd,
                TokenKind::Minus => UnaryOp::USub,
                TokenKind::Tilde => UnaryOp::Invert,
                _ => return p.power(),
            };
            p.bump();
            let Some(operand) = p.factor() else {
                p.reset(start);
                return None;
            };
            Some(p.node(NodeKind::UnaryOp { op, operand }, start))
        })
    }

    // power:
    //     | await_primary '**' factor
    //     | await_primary
    fn power(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let left = self.await_primary()?;
        let exponent = self.try_parse(|p| {
            p.eat(TokenKind::DoubleStar)?;
            p.factor()
        });
        Some(match exponent {
            Some(right) => self.node(
                NodeKind::BinOp {
                    left,
                    op: BinOp::Pow,
                    right,
                },
                start,
            ),
            None => left,
        })
    }

    // await_primary:
    //     | AWAIT primary
    //     | primary
    fn await_primary(&mut self) -> Option<NodeId> {
        self.memoized(Rule::AwaitPrimary, |p| {
            let start = p.mark();
            if p.eat(TokenKind::Await).is_some() {
                let Some(value) = p.primary() else {
                    p.reset(start);
                    return None;
                };
                return Some(p.node(NodeKind::Await { value }, start));
            }
            p.primary()
        })
    }
}
