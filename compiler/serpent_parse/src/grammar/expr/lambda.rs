use serpent_ir::{NodeId, NodeKind, TokenKind};

use crate::Parser;

impl Parser<'_> {
    // lambdef: 'lambda' [lambda_params] ':' expression
    pub(crate) fn lambdef(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(TokenKind::KwLambda)?;
            let args = match p.lambda_params() {
                Some(args) => args,
                None => p.empty_arguments(),
            };
            p.eat(TokenKind::Colon)?;
            let body = p.expression()?;
            Some(p.node(NodeKind::Lambda { args, body }, start))
        })
    }
}
