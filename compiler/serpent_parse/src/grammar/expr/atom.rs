//! Atoms: names, literals and bracketed displays.

use serpent_ir::{ConstantValue, ExprContext, NodeId, NodeKind, NodeList, SourceRange, TokenKind};
use serpent_lexer::cook::cook_number;

use crate::grammar::Nodes;
use crate::Parser;

impl Parser<'_> {
    // atom:
    //     | NAME
    //     | 'True' | 'False' | 'None'
    //     | &STRING strings
    //     | NUMBER
    //     | &'(' (tuple | group | genexp)
    //     | &'[' (list | listcomp)
    //     | &'{' (dict | set | dictcomp | setcomp)
    //     | '...'
    pub(crate) fn atom(&mut self) -> Option<NodeId> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Name => self.name_expr(ExprContext::Load),
            TokenKind::KwTrue => self.constant_token(ConstantValue::Bool(true)),
            TokenKind::KwFalse => self.constant_token(ConstantValue::Bool(false)),
            TokenKind::KwNone => self.constant_token(ConstantValue::None),
            TokenKind::Ellipsis => self.constant_token(ConstantValue::Ellipsis),
            TokenKind::String => self.strings(),
            TokenKind::Number => {
                let text = self.text(&token);
                match cook_number(&text) {
                    Some(value) => self.constant_token(value),
                    None => self.raise_at(token.range, "invalid syntax"),
                }
            }
            TokenKind::LPar => self
                .try_parse(Self::tuple)
                .or_else(|| self.try_parse(Self::group))
                .or_else(|| self.try_parse(Self::genexp)),
            TokenKind::LSqb => self
                .try_parse(Self::list)
                .or_else(|| self.try_parse(Self::listcomp)),
            TokenKind::LBrace => self
                .try_parse(Self::dict)
                .or_else(|| self.try_parse(Self::set))
                .or_else(|| self.try_parse(Self::dictcomp))
                .or_else(|| self.try_parse(Self::setcomp)),
            _ => None,
        }
    }

    /// Consume one token as a `Constant` holding `value`.
    fn constant_token(&mut self, value: ConstantValue) -> Option<NodeId> {
        let token = self.bump()?;
        let value = self.arena.alloc_constant(value);
        Some(self.arena.alloc(
            NodeKind::Constant {
                value,
                unicode_prefix: false,
            },
            token.range,
        ))
    }

    // === Parenthesized ===

    // tuple: '(' [star_named_expression ',' [star_named_expressions]] ')'
    pub(crate) fn tuple(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::LPar)?;
        let mut elts = Nodes::new();
        if !self.at(TokenKind::RPar) {
            elts.push(self.star_named_expression()?);
            self.eat(TokenKind::Comma)?;
            if let Some(rest) = self.star_named_expressions() {
                elts.extend(rest);
            }
        }
        self.eat(TokenKind::RPar)?;
        Some(self.tuple_node(&elts, start))
    }

    // group:
    //     | '(' (yield_expr | named_expression) ')'
    //     | invalid_group
    fn group(&mut self) -> Option<NodeId> {
        let inner = self.try_parse(|p| {
            p.eat(TokenKind::LPar)?;
            let inner = if p.at(TokenKind::KwYield) {
                p.yield_expr()?
            } else {
                p.named_expression()?
            };
            p.eat(TokenKind::RPar)?;
            Some(inner)
        });
        if inner.is_some() {
            return inner;
        }
        self.invalid(Self::invalid_group);
        None
    }

    // invalid_group:
    //     | '(' starred_expression ')'
    //     | '(' '**' expression ')'
    fn invalid_group(&mut self) -> Option<()> {
        self.eat(TokenKind::LPar)?;
        if let Some(starred) = self.try_parse(|p| {
            let starred = p.starred_expression()?;
            p.eat(TokenKind::RPar)?;
            Some(starred)
        }) {
            return self.raise_at_node(starred, "cannot use starred expression here");
        }
        let stars = self.eat(TokenKind::DoubleStar)?;
        self.expression()?;
        self.eat(TokenKind::RPar)?;
        self.raise_at(stars.range, "cannot use double starred expression here")
    }

    // genexp:
    //     | '(' (assignment_expression | expression !':=') for_if_clauses ')'
    //     | invalid_comprehension
    pub(crate) fn genexp(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let genexp = self.try_parse(|p| {
            p.eat(TokenKind::LPar)?;
            let elt = p.assignment_or_expression()?;
            let generators = p.for_if_clauses()?;
            p.eat(TokenKind::RPar)?;
            Some(p.node(NodeKind::GeneratorExp { elt, generators }, start))
        });
        if genexp.is_some() {
            return genexp;
        }
        self.invalid(Self::invalid_comprehension);
        None
    }

    /// `assignment_expression | expression !':='`
    pub(crate) fn assignment_or_expression(&mut self) -> Option<NodeId> {
        if self.at_assignment_expression() {
            return self.assignment_expression();
        }
        let elt = self.expression()?;
        if self.at(TokenKind::ColonEqual) {
            return None;
        }
        Some(elt)
    }

    // === Lists and sets ===

    // list: '[' [star_named_expressions] ']'
    pub(crate) fn list(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::LSqb)?;
        let elts = self.star_named_expressions().unwrap_or_default();
        self.eat(TokenKind::RSqb)?;
        let elts = self.arena.alloc_list(&elts);
        Some(self.node(
            NodeKind::List {
                elts,
                ctx: ExprContext::Load,
            },
            start,
        ))
    }

    // listcomp:
    //     | '[' named_expression for_if_clauses ']'
    //     | invalid_comprehension
    fn listcomp(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let comp = self.try_parse(|p| {
            p.eat(TokenKind::LSqb)?;
            let elt = p.named_expression()?;
            let generators = p.for_if_clauses()?;
            p.eat(TokenKind::RSqb)?;
            Some(p.node(NodeKind::ListComp { elt, generators }, start))
        });
        if comp.is_some() {
            return comp;
        }
        self.invalid(Self::invalid_comprehension);
        None
    }

    // set: '{' star_named_expressions '}'
    fn set(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::LBrace)?;
        let elts = self.star_named_expressions()?;
        self.eat(TokenKind::RBrace)?;
        let elts = self.arena.alloc_list(&elts);
        Some(self.node(NodeKind::Set { elts }, start))
    }

    // setcomp:
    //     | '{' named_expression for_if_clauses '}'
    //     | invalid_comprehension
    fn setcomp(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let comp = self.try_parse(|p| {
            p.eat(TokenKind::LBrace)?;
            let elt = p.named_expression()?;
            let generators = p.for_if_clauses()?;
            p.eat(TokenKind::RBrace)?;
            Some(p.node(NodeKind::SetComp { elt, generators }, start))
        });
        if comp.is_some() {
            return comp;
        }
        self.invalid(Self::invalid_comprehension);
        None
    }

    // invalid_comprehension:
    //     | ('[' | '(' | '{') starred_expression for_if_clauses
    //     | ('[' | '{') star_named_expression ',' star_named_expressions for_if_clauses
    //     | ('[' | '{') star_named_expression ',' for_if_clauses
    fn invalid_comprehension(&mut self) -> Option<()> {
        let open = self.bump()?.kind;
        if !matches!(open, TokenKind::LSqb | TokenKind::LPar | TokenKind::LBrace) {
            return None;
        }
        if let Some(starred) = self.try_parse(|p| {
            let starred = p.starred_expression()?;
            p.for_if_clauses()?;
            Some(starred)
        }) {
            return self.raise_at_node(
                starred,
                "iterable unpacking cannot be used in comprehension",
            );
        }
        if open == TokenKind::LPar {
            return None;
        }
        let first = self.star_named_expression()?;
        let comma = self.eat(TokenKind::Comma)?;
        let last = match self.try_parse(|p| {
            let rest = p.star_named_expressions()?;
            p.look_ahead(Self::for_if_clauses).then_some(rest)
        }) {
            Some(rest) => rest.last().map_or(comma.range, |&last| self.arena.range(last)),
            None => {
                if !self.look_ahead(Self::for_if_clauses) {
                    return None;
                }
                comma.range
            }
        };
        let first = self.arena.range(first);
        self.raise_between(
            first,
            last,
            "did you forget parentheses around the comprehension target?",
        )
    }

    // === Dicts ===

    // dict:
    //     | '{' [double_starred_kvpairs] '}'
    //     | '{' invalid_double_starred_kvpairs '}'
    fn dict(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let dict = self.try_parse(|p| {
            p.eat(TokenKind::LBrace)?;
            let (keys, values) = p
                .double_starred_kvpairs()
                .unwrap_or((NodeList::EMPTY, NodeList::EMPTY));
            p.eat(TokenKind::RBrace)?;
            Some(p.node(NodeKind::Dict { keys, values }, start))
        });
        if dict.is_some() {
            return dict;
        }
        self.invalid(|p| {
            p.eat(TokenKind::LBrace)?;
            p.invalid_double_starred_kvpairs()?;
            p.eat(TokenKind::RBrace)?;
            None
        });
        None
    }

    // double_starred_kvpairs: ','.double_starred_kvpair+ [',']
    fn double_starred_kvpairs(&mut self) -> Option<(NodeList, NodeList)> {
        let mut keys = Nodes::new();
        let mut values = Nodes::new();
        let (key, value) = self.double_starred_kvpair()?;
        keys.push(key);
        values.push(value);
        while let Some((key, value)) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.double_starred_kvpair()
        }) {
            keys.push(key);
            values.push(value);
        }
        self.eat(TokenKind::Comma);
        Some((self.arena.alloc_list(&keys), self.arena.alloc_list(&values)))
    }

    // double_starred_kvpair:
    //     | '**' bitwise_or
    //     | kvpair
    fn double_starred_kvpair(&mut self) -> Option<(NodeId, NodeId)> {
        let unpacked = self.try_parse(|p| {
            p.eat(TokenKind::DoubleStar)?;
            p.bitwise_or()
        });
        if let Some(value) = unpacked {
            return Some((NodeId::NONE, value));
        }
        self.kvpair()
    }

    // kvpair: expression ':' expression
    fn kvpair(&mut self) -> Option<(NodeId, NodeId)> {
        self.try_parse(|p| {
            let key = p.expression()?;
            p.eat(TokenKind::Colon)?;
            let value = p.expression()?;
            Some((key, value))
        })
    }

    // dictcomp:
    //     | '{' kvpair for_if_clauses '}'
    //     | invalid_dict_comprehension
    fn dictcomp(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let comp = self.try_parse(|p| {
            p.eat(TokenKind::LBrace)?;
            let (key, value) = p.kvpair()?;
            let generators = p.for_if_clauses()?;
            p.eat(TokenKind::RBrace)?;
            Some(p.node(
                NodeKind::DictComp {
                    key,
                    value,
                    generators,
                },
                start,
            ))
        });
        if comp.is_some() {
            return comp;
        }
        // invalid_dict_comprehension: '{' '**' bitwise_or for_if_clauses '}'
        self.invalid(|p| {
            p.eat(TokenKind::LBrace)?;
            let stars = p.eat(TokenKind::DoubleStar)?;
            p.bitwise_or()?;
            p.for_if_clauses()?;
            p.eat(TokenKind::RBrace)?;
            p.raise_at(stars.range, "dict unpacking cannot be used in dict comprehension")
        });
        None
    }

    // invalid_double_starred_kvpairs:
    //     | ','.double_starred_kvpair+ ',' invalid_kvpair
    //     | expression ':' '*' bitwise_or
    //     | expression ':' &('}' | ',')
    fn invalid_double_starred_kvpairs(&mut self) -> Option<()> {
        let start = self.mark();
        let after_pairs = self.try_parse(|p| {
            p.double_starred_kvpair()?;
            while p
                .try_parse(|p| {
                    p.eat(TokenKind::Comma)?;
                    p.double_starred_kvpair()
                })
                .is_some()
            {}
            p.eat(TokenKind::Comma)
        });
        if after_pairs.is_some() {
            self.invalid_kvpair();
            if self.error_indicator {
                return None;
            }
            self.reset(start);
        }
        self.invalid_dict_value()
    }

    // invalid_kvpair:
    //     | expression !(':')
    //     | expression ':' '*' bitwise_or
    //     | expression ':' &('}' | ',')
    fn invalid_kvpair(&mut self) -> Option<()> {
        let mark = self.mark();
        let key = self.expression()?;
        if !self.at(TokenKind::Colon) {
            if self.error_indicator {
                return None;
            }
            let range = self.arena.range(key);
            return self.raise_at(
                SourceRange::new(range.start_line, range.end_column - 1, range.end_line, -1),
                "':' expected after dictionary key",
            );
        }
        self.reset(mark);
        self.invalid_dict_value()
    }

    /// `expression ':' '*' bitwise_or` or `expression ':' &('}' | ',')`
    fn invalid_dict_value(&mut self) -> Option<()> {
        self.expression()?;
        self.eat(TokenKind::Colon)?;
        if let Some(star) = self.eat(TokenKind::Star) {
            self.bitwise_or()?;
            return self.raise_starting_from(
                star.range,
                "cannot use a starred expression in a dictionary value",
            );
        }
        if !self.at_any(&[TokenKind::RBrace, TokenKind::Comma]) {
            return None;
        }
        self.raise_syntax_error("expression expected after dictionary key and ':'")
    }

    // === Comprehension clauses ===

    // for_if_clauses: for_if_clause+
    pub(crate) fn for_if_clauses(&mut self) -> Option<NodeList> {
        let mut clauses = Nodes::new();
        while let Some(clause) = self.for_if_clause() {
            clauses.push(clause);
        }
        if clauses.is_empty() {
            return None;
        }
        Some(self.arena.alloc_list(&clauses))
    }

    // for_if_clause:
    //     | [ASYNC] 'for' star_targets 'in' ~ disjunction ('if' disjunction)*
    //     | invalid_for_target
    fn for_if_clause(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let head = self.try_parse(|p| {
            let is_async = p.eat(TokenKind::Async).is_some();
            p.eat(TokenKind::KwFor)?;
            let target = p.star_targets()?;
            p.eat(TokenKind::KwIn)?;
            Some((is_async, target))
        });
        let Some((is_async, target)) = head else {
            self.invalid(Self::invalid_for_target);
            return None;
        };
        let Some(iter) = self.disjunction() else {
            self.reset(start);
            return None;
        };
        let mut ifs = Nodes::new();
        while let Some(condition) = self.try_parse(|p| {
            p.eat(TokenKind::KwIf)?;
            p.disjunction()
        }) {
            ifs.push(condition);
        }
        let ifs = self.arena.alloc_list(&ifs);
        Some(self.node(
            NodeKind::Comprehension {
                target,
                iter,
                ifs,
                is_async,
            },
            start,
        ))
    }
}
