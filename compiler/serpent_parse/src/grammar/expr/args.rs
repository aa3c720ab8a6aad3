//! Call arguments.
//!
//! `arguments` returns a placeholder `Call` with no callee whose `args` and
//! `keywords` the caller copies into the real call (or class header).

use rustc_hash::FxHashSet;
use serpent_ir::{ExprContext, NodeId, NodeKind, NodeList, TokenKind};

use crate::grammar::Nodes;
use crate::memo::Rule;
use crate::Parser;

impl Parser<'_> {
    // arguments:
    //     | args [','] &')'
    //     | invalid_arguments
    pub(crate) fn arguments(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Arguments, |p| {
            let call = p.try_parse(|p| {
                let call = p.args()?;
                p.eat(TokenKind::Comma);
                p.at(TokenKind::RPar).then_some(call)
            });
            if let Some(call) = call {
                p.check_repeated_keywords(call)?;
                return Some(call);
            }
            p.invalid(Self::invalid_arguments);
            None
        })
    }

    /// "keyword argument repeated" at the second use of a keyword.
    fn check_repeated_keywords(&mut self, call: NodeId) -> Option<()> {
        let (_, keywords) = self.call_parts(Some(call));
        let mut seen = FxHashSet::default();
        let repeated = self
            .arena
            .list(keywords)
            .iter()
            .find_map(|&keyword| match *self.arena.kind(keyword) {
                NodeKind::Keyword { arg: Some(name), .. } if !seen.insert(name) => {
                    Some((keyword, name))
                }
                _ => None,
            });
        match repeated {
            Some((keyword, name)) => {
                let message = format!("keyword argument repeated: {}", self.arena.name_str(name));
                self.raise_at_node(keyword, &message)
            }
            None => Some(()),
        }
    }

    // args:
    //     | ','.(starred_expression
    //           | (assignment_expression | expression !':=') !'=')+ [',' kwargs]
    //     | kwargs
    fn args(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let mut items = Nodes::new();
        if let Some(first) = self.positional_arg() {
            items.push(first);
            while let Some(arg) = self.try_parse(|p| {
                p.eat(TokenKind::Comma)?;
                p.positional_arg()
            }) {
                items.push(arg);
            }
            if let Some(rest) = self.try_parse(|p| {
                p.eat(TokenKind::Comma)?;
                p.kwargs()
            }) {
                items.extend(rest);
            }
        } else {
            items = self.kwargs()?;
        }

        let (keywords, args): (Nodes, Nodes) = items
            .into_iter()
            .partition(|&item| matches!(self.arena.kind(item), NodeKind::Keyword { .. }));
        let args = self.arena.alloc_list(&args);
        let keywords = self.arena.alloc_list(&keywords);
        Some(self.node(
            NodeKind::Call {
                func: NodeId::NONE,
                args,
                keywords,
            },
            start,
        ))
    }

    fn positional_arg(&mut self) -> Option<NodeId> {
        if let Some(starred) = self.try_parse(Self::starred_expression) {
            return Some(starred);
        }
        self.try_parse(|p| {
            let arg = p.assignment_or_expression()?;
            if p.at(TokenKind::Equal) {
                return None;
            }
            Some(arg)
        })
    }

    // kwargs:
    //     | ','.kwarg_or_starred+ ',' ','.kwarg_or_double_starred+
    //     | ','.kwarg_or_starred+
    //     | ','.kwarg_or_double_starred+
    fn kwargs(&mut self) -> Option<Nodes> {
        let Some(first) = self.kwarg_or_starred() else {
            return self.kwarg_or_double_starred_list();
        };
        let mut items = Nodes::new();
        items.push(first);
        while let Some(item) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.kwarg_or_starred()
        }) {
            items.push(item);
        }
        if let Some(rest) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.kwarg_or_double_starred_list()
        }) {
            items.extend(rest);
        }
        Some(items)
    }

    fn kwarg_or_double_starred_list(&mut self) -> Option<Nodes> {
        let mut items = Nodes::new();
        items.push(self.kwarg_or_double_starred()?);
        while let Some(item) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.kwarg_or_double_starred()
        }) {
            items.push(item);
        }
        Some(items)
    }

    // starred_expression: '*' expression
    pub(crate) fn starred_expression(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::Star)?;
        let Some(value) = self.expression() else {
            self.reset(start);
            return None;
        };
        Some(self.node(
            NodeKind::Starred {
                value,
                ctx: ExprContext::Load,
            },
            start,
        ))
    }

    // kwarg_or_starred:
    //     | invalid_kwarg
    //     | NAME '=' expression
    //     | starred_expression
    fn kwarg_or_starred(&mut self) -> Option<NodeId> {
        self.invalid(Self::invalid_kwarg);
        self.keyword_arg()
            .or_else(|| self.try_parse(Self::starred_expression))
    }

    // kwarg_or_double_starred:
    //     | invalid_kwarg
    //     | NAME '=' expression
    //     | '**' expression
    fn kwarg_or_double_starred(&mut self) -> Option<NodeId> {
        self.invalid(Self::invalid_kwarg);
        if let Some(keyword) = self.keyword_arg() {
            return Some(keyword);
        }
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(TokenKind::DoubleStar)?;
            let value = p.expression()?;
            Some(p.node(NodeKind::Keyword { arg: None, value }, start))
        })
    }

    /// `NAME '=' expression`
    fn keyword_arg(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.try_parse(|p| {
            let (name, _) = p.name_token()?;
            p.eat(TokenKind::Equal)?;
            let value = p.expression()?;
            Some(p.node(
                NodeKind::Keyword {
                    arg: Some(name),
                    value,
                },
                start,
            ))
        })
    }

    // === Error alternatives ===

    // invalid_arguments:
    //     | args ',' '*'
    //     | expression for_if_clauses ',' [args | expression for_if_clauses]
    //     | NAME '=' expression for_if_clauses
    //     | args for_if_clauses
    //     | args ',' expression for_if_clauses
    //     | args ',' args
    fn invalid_arguments(&mut self) -> Option<()> {
        if let Some(call) = self.try_parse(|p| {
            let call = p.args()?;
            p.eat(TokenKind::Comma)?;
            p.eat(TokenKind::Star)?;
            Some(call)
        }) {
            return self.raise_at_node(
                call,
                "iterable argument unpacking follows keyword argument unpacking",
            );
        }

        if let Some((elt, clauses)) = self.try_parse(|p| {
            let elt = p.expression()?;
            let clauses = p.for_if_clauses()?;
            p.eat(TokenKind::Comma)?;
            Some((elt, clauses))
        }) {
            let end = self.last_comprehension_item(clauses);
            return self.raise_nodes(elt, end, "Generator expression must be parenthesized");
        }

        if let Some((name, equal)) = self.try_parse(|p| {
            let (_, name) = p.name_token()?;
            let equal = p.eat(TokenKind::Equal)?;
            p.expression()?;
            p.for_if_clauses()?;
            Some((name, equal))
        }) {
            return self.raise_between(
                name.range,
                equal.range,
                "invalid syntax. Maybe you meant '==' or ':=' instead of '='?",
            );
        }

        if let Some((call, clauses)) = self.try_parse(|p| {
            let call = p.args()?;
            let clauses = p.for_if_clauses()?;
            Some((call, clauses))
        }) {
            let (args, _) = self.call_parts(Some(call));
            let args = self.arena.list(args);
            // A lone argument followed by a comprehension is a valid
            // generator expression argument.
            if args.len() <= 1 {
                return None;
            }
            let last = args[args.len() - 1];
            let end = self.last_comprehension_item(clauses);
            return self.raise_nodes(last, end, "Generator expression must be parenthesized");
        }

        if let Some((elt, clauses)) = self.try_parse(|p| {
            p.args()?;
            p.eat(TokenKind::Comma)?;
            let elt = p.expression()?;
            let clauses = p.for_if_clauses()?;
            Some((elt, clauses))
        }) {
            let end = match self.arena.list(clauses).last().map(|&c| *self.arena.kind(c)) {
                Some(NodeKind::Comprehension { target, .. }) => target,
                _ => elt,
            };
            return self.raise_nodes(elt, end, "Generator expression must be parenthesized");
        }

        let call = self.try_parse(|p| {
            let call = p.args()?;
            p.eat(TokenKind::Comma)?;
            p.args()?;
            Some(call)
        })?;
        let (_, keywords) = self.call_parts(Some(call));
        let unpacking = self
            .arena
            .list(keywords)
            .iter()
            .any(|&keyword| matches!(self.arena.kind(keyword), NodeKind::Keyword { arg: None, .. }));
        if unpacking {
            self.raise_syntax_error("positional argument follows keyword argument unpacking")
        } else {
            self.raise_syntax_error("positional argument follows keyword argument")
        }
    }

    /// The last node of a comprehension: its final `if` condition, or the
    /// iterable when there is none.
    fn last_comprehension_item(&self, clauses: NodeList) -> NodeId {
        let last = self.arena.list(clauses).last().copied();
        match last.map(|clause| *self.arena.kind(clause)) {
            Some(NodeKind::Comprehension { iter, ifs, .. }) => {
                self.arena.list(ifs).last().copied().unwrap_or(iter)
            }
            _ => last.unwrap_or(NodeId::NONE),
        }
    }

    // invalid_kwarg:
    //     | ('True' | 'False' | 'None') '='
    //     | NAME '=' expression for_if_clauses
    //     | !(NAME '=') expression '='
    fn invalid_kwarg(&mut self) -> Option<()> {
        let token = self.peek()?;
        if matches!(
            token.kind,
            TokenKind::KwTrue | TokenKind::KwFalse | TokenKind::KwNone
        ) {
            if let Some(equal) = self.try_parse(|p| {
                p.bump()?;
                p.eat(TokenKind::Equal)
            }) {
                let message = format!("cannot assign to {}", self.text(&token));
                return self.raise_between(token.range, equal.range, &message);
            }
        }

        if let Some((name, equal)) = self.try_parse(|p| {
            let (_, name) = p.name_token()?;
            let equal = p.eat(TokenKind::Equal)?;
            p.expression()?;
            p.for_if_clauses()?;
            Some((name, equal))
        }) {
            return self.raise_between(
                name.range,
                equal.range,
                "invalid syntax. Maybe you meant '==' or ':=' instead of '='?",
            );
        }

        if self.look_ahead(|p| {
            p.name_token()?;
            p.eat(TokenKind::Equal)
        }) {
            return None;
        }
        let target = self.expression()?;
        let equal = self.eat(TokenKind::Equal)?;
        let range = self.arena.range(target);
        self.raise_between(
            range,
            equal.range,
            "expression cannot contain assignment, perhaps you meant \"==\"?",
        )
    }
}
