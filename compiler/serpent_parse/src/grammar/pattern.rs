//! `case` patterns.

use serpent_ir::{BinOp, ConstantValue, ExprContext, Name, NodeId, NodeKind, TokenKind, UnaryOp};
use serpent_lexer::cook::cook_number;

use crate::grammar::Nodes;
use crate::memo::Rule;
use crate::Parser;

impl Parser<'_> {
    // patterns:
    //     | open_sequence_pattern
    //     | pattern
    pub(crate) fn patterns(&mut self) -> Option<NodeId> {
        let start = self.mark();
        if let Some(patterns) = self.try_parse(Self::open_sequence_pattern) {
            let patterns = self.arena.alloc_list(&patterns);
            return Some(self.node(NodeKind::MatchSequence { patterns }, start));
        }
        self.pattern()
    }

    // pattern: as_pattern | or_pattern
    fn pattern(&mut self) -> Option<NodeId> {
        self.try_parse(Self::as_pattern)
            .or_else(|| self.or_pattern())
    }

    // as_pattern:
    //     | or_pattern 'as' pattern_capture_target
    //     | invalid_as_pattern
    fn as_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let bound = self.try_parse(|p| {
            let pattern = p.or_pattern()?;
            p.eat(TokenKind::KwAs)?;
            let name = p.pattern_capture_target()?;
            Some(p.node(
                NodeKind::MatchAs {
                    pattern: Some(pattern),
                    name: Some(name),
                },
                start,
            ))
        });
        if bound.is_some() {
            return bound;
        }
        self.invalid(Self::invalid_as_pattern);
        None
    }

    // invalid_as_pattern:
    //     | or_pattern 'as' "_"
    //     | or_pattern 'as' !NAME expression
    fn invalid_as_pattern(&mut self) -> Option<()> {
        self.or_pattern()?;
        self.eat(TokenKind::KwAs)?;
        if let Some(wildcard) = self.soft_keyword("_") {
            return self.raise_at(wildcard.range, "cannot use '_' as a target");
        }
        if self.at(TokenKind::Name) {
            return None;
        }
        let target = self.expression()?;
        self.raise_at_node(target, "invalid pattern target")
    }

    // or_pattern: '|'.closed_pattern+
    fn or_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let first = self.closed_pattern()?;
        let mut patterns = Nodes::new();
        patterns.push(first);
        while let Some(pattern) = self.try_parse(|p| {
            p.eat(TokenKind::VBar)?;
            p.closed_pattern()
        }) {
            patterns.push(pattern);
        }
        if patterns.len() == 1 {
            return Some(first);
        }
        let patterns = self.arena.alloc_list(&patterns);
        Some(self.node(NodeKind::MatchOr { patterns }, start))
    }

    // closed_pattern:
    //     | literal_pattern
    //     | capture_pattern
    //     | wildcard_pattern
    //     | value_pattern
    //     | group_pattern
    //     | sequence_pattern
    //     | mapping_pattern
    //     | class_pattern
    fn closed_pattern(&mut self) -> Option<NodeId> {
        self.memoized(Rule::ClosedPattern, |p| {
            if let Some(literal) = p.try_parse(Self::literal_pattern) {
                return Some(literal);
            }
            let start = p.mark();
            if let Some(name) = p.try_parse(Self::pattern_capture_target) {
                return Some(p.node(
                    NodeKind::MatchAs {
                        pattern: None,
                        name: Some(name),
                    },
                    start,
                ));
            }
            if let Some(wildcard) = p.soft_keyword("_") {
                return Some(p.arena.alloc(
                    NodeKind::MatchAs {
                        pattern: None,
                        name: None,
                    },
                    wildcard.range,
                ));
            }
            if let Some(value) = p.try_parse(Self::value_pattern) {
                return Some(value);
            }
            if let Some(group) = p.try_parse(|p| {
                p.eat(TokenKind::LPar)?;
                let pattern = p.pattern()?;
                p.eat(TokenKind::RPar)?;
                Some(pattern)
            }) {
                return Some(group);
            }
            p.try_parse(Self::sequence_pattern)
                .or_else(|| p.try_parse(Self::mapping_pattern))
                .or_else(|| p.class_pattern())
        })
    }

    // === Literals ===

    // literal_pattern:
    //     | signed_number !('+' | '-')
    //     | complex_number
    //     | strings
    //     | 'None'
    //     | 'True'
    //     | 'False'
    fn literal_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        match self.peek_kind()? {
            TokenKind::KwNone => self.singleton_pattern(ConstantValue::None),
            TokenKind::KwTrue => self.singleton_pattern(ConstantValue::Bool(true)),
            TokenKind::KwFalse => self.singleton_pattern(ConstantValue::Bool(false)),
            TokenKind::String => {
                let value = self.strings()?;
                Some(self.node(NodeKind::MatchValue { value }, start))
            }
            _ => {
                let value = self.literal_number()?;
                Some(self.node(NodeKind::MatchValue { value }, start))
            }
        }
    }

    fn singleton_pattern(&mut self, value: ConstantValue) -> Option<NodeId> {
        let token = self.bump()?;
        let value = self.arena.alloc_constant(value);
        Some(self.arena.alloc(NodeKind::MatchSingleton { value }, token.range))
    }

    /// `signed_number !('+' | '-') | complex_number` as an expression.
    fn literal_number(&mut self) -> Option<NodeId> {
        let signed = self.try_parse(|p| {
            let number = p.signed_number()?;
            if p.at_any(&[TokenKind::Plus, TokenKind::Minus]) {
                return None;
            }
            Some(number)
        });
        if signed.is_some() {
            return signed;
        }
        self.try_parse(Self::complex_number)
    }

    // literal_expr:
    //     | signed_number !('+' | '-')
    //     | complex_number
    //     | strings
    //     | 'None'
    //     | 'True'
    //     | 'False'
    fn literal_expr(&mut self) -> Option<NodeId> {
        match self.peek_kind()? {
            TokenKind::KwNone | TokenKind::KwTrue | TokenKind::KwFalse | TokenKind::String => {
                self.atom()
            }
            _ => self.literal_number(),
        }
    }

    // complex_number:
    //     | signed_real_number '+' imaginary_number
    //     | signed_real_number '-' imaginary_number
    fn complex_number(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let left = self.signed_number_checked(Some(false))?;
        let op = match self.bump()?.kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            _ => return None,
        };
        let right = self.number_checked(Some(true))?;
        Some(self.node(NodeKind::BinOp { left, op, right }, start))
    }

    // signed_number:
    //     | NUMBER
    //     | '-' NUMBER
    fn signed_number(&mut self) -> Option<NodeId> {
        self.signed_number_checked(None)
    }

    // signed_real_number:
    //     | real_number
    //     | '-' real_number
    fn signed_number_checked(&mut self, imaginary: Option<bool>) -> Option<NodeId> {
        let start = self.mark();
        if self.eat(TokenKind::Minus).is_some() {
            let operand = self.number_checked(imaginary)?;
            return Some(self.node(
                NodeKind::UnaryOp {
                    op: UnaryOp::USub,
                    operand,
                },
                start,
            ));
        }
        self.number_checked(imaginary)
    }

    /// A `NUMBER`; with `Some(imaginary)`, one that must (or must not) be
    /// imaginary.
    // real_number: NUMBER
    // imaginary_number: NUMBER
    fn number_checked(&mut self, imaginary: Option<bool>) -> Option<NodeId> {
        let token = self.eat(TokenKind::Number)?;
        let text = self.text(&token);
        let Some(value) = cook_number(&text) else {
            return self.raise_at(token.range, "invalid syntax");
        };
        let is_imaginary = matches!(value, ConstantValue::Complex(_));
        match imaginary {
            Some(false) if is_imaginary => {
                return self.raise_at(token.range, "real number required in complex literal");
            }
            Some(true) if !is_imaginary => {
                return self.raise_at(token.range, "imaginary number required in complex literal");
            }
            _ => {}
        }
        let value = self.arena.alloc_constant(value);
        Some(self.arena.alloc(
            NodeKind::Constant {
                value,
                unicode_prefix: false,
            },
            token.range,
        ))
    }

    // === Names ===

    // pattern_capture_target: !"_" NAME !('.' | '(' | '=')
    fn pattern_capture_target(&mut self) -> Option<Name> {
        if self.at_name("_") {
            return None;
        }
        let (name, _) = self.name_token()?;
        if self.at_any(&[TokenKind::Dot, TokenKind::LPar, TokenKind::Equal]) {
            return None;
        }
        Some(name)
    }

    // value_pattern: attr !('.' | '(' | '=')
    fn value_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let value = self.attr()?;
        if self.at_any(&[TokenKind::Dot, TokenKind::LPar, TokenKind::Equal]) {
            return None;
        }
        Some(self.node(NodeKind::MatchValue { value }, start))
    }

    // attr: name_or_attr '.' NAME
    fn attr(&mut self) -> Option<NodeId> {
        let attr = self.name_or_attr()?;
        if matches!(self.arena.kind(attr), NodeKind::Attribute { .. }) {
            Some(attr)
        } else {
            None
        }
    }

    // name_or_attr: attr | NAME
    fn name_or_attr(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let mut value = self.name_expr(ExprContext::Load)?;
        while let Some(attr) = self.try_parse(|p| {
            p.eat(TokenKind::Dot)?;
            p.name_token().map(|(name, _)| name)
        }) {
            value = self.node(
                NodeKind::Attribute {
                    value,
                    attr,
                    ctx: ExprContext::Load,
                },
                start,
            );
        }
        Some(value)
    }

    // === Sequences ===

    // sequence_pattern:
    //     | '[' maybe_sequence_pattern? ']'
    //     | '(' open_sequence_pattern? ')'
    fn sequence_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let patterns = match self.bump()?.kind {
            TokenKind::LSqb => {
                let patterns = self.maybe_sequence_pattern().unwrap_or_default();
                self.eat(TokenKind::RSqb)?;
                patterns
            }
            TokenKind::LPar => {
                let patterns = self.open_sequence_pattern().unwrap_or_default();
                self.eat(TokenKind::RPar)?;
                patterns
            }
            _ => return None,
        };
        let patterns = self.arena.alloc_list(&patterns);
        Some(self.node(NodeKind::MatchSequence { patterns }, start))
    }

    // open_sequence_pattern: maybe_star_pattern ',' maybe_sequence_pattern?
    fn open_sequence_pattern(&mut self) -> Option<Nodes> {
        self.try_parse(|p| {
            let mut patterns = Nodes::new();
            patterns.push(p.maybe_star_pattern()?);
            p.eat(TokenKind::Comma)?;
            if let Some(rest) = p.maybe_sequence_pattern() {
                patterns.extend(rest);
            }
            Some(patterns)
        })
    }

    // maybe_sequence_pattern: ','.maybe_star_pattern+ ','?
    fn maybe_sequence_pattern(&mut self) -> Option<Nodes> {
        let mut patterns = Nodes::new();
        patterns.push(self.maybe_star_pattern()?);
        while let Some(pattern) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.maybe_star_pattern()
        }) {
            patterns.push(pattern);
        }
        self.eat(TokenKind::Comma);
        Some(patterns)
    }

    // maybe_star_pattern: star_pattern | pattern
    fn maybe_star_pattern(&mut self) -> Option<NodeId> {
        self.star_pattern().or_else(|| self.pattern())
    }

    // star_pattern:
    //     | '*' pattern_capture_target
    //     | '*' wildcard_pattern
    fn star_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(TokenKind::Star)?;
            let name = match p.soft_keyword("_") {
                Some(_) => None,
                None => Some(p.pattern_capture_target()?),
            };
            Some(p.node(NodeKind::MatchStar { name }, start))
        })
    }

    // === Mappings ===

    // mapping_pattern:
    //     | '{' '}'
    //     | '{' double_star_pattern ','? '}'
    //     | '{' items_pattern ',' double_star_pattern ','? '}'
    //     | '{' items_pattern ','? '}'
    fn mapping_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::LBrace)?;
        let mut keys = Nodes::new();
        let mut patterns = Nodes::new();
        let mut rest = None;
        if !self.at(TokenKind::RBrace) {
            rest = self.double_star_pattern();
            if rest.is_none() {
                while let Some((key, pattern)) = self.key_value_pattern() {
                    keys.push(key);
                    patterns.push(pattern);
                    if self.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                    if self.at(TokenKind::DoubleStar) {
                        rest = Some(self.double_star_pattern()?);
                        break;
                    }
                }
                if keys.is_empty() {
                    return None;
                }
            }
            if rest.is_some() {
                self.eat(TokenKind::Comma);
            }
        }
        self.eat(TokenKind::RBrace)?;
        let keys = self.arena.alloc_list(&keys);
        let patterns = self.arena.alloc_list(&patterns);
        Some(self.node(
            NodeKind::MatchMapping {
                keys,
                patterns,
                rest,
            },
            start,
        ))
    }

    // key_value_pattern: (literal_expr | attr) ':' pattern
    fn key_value_pattern(&mut self) -> Option<(NodeId, NodeId)> {
        self.try_parse(|p| {
            let key = p
                .try_parse(Self::literal_expr)
                .or_else(|| p.try_parse(Self::attr))?;
            p.eat(TokenKind::Colon)?;
            let pattern = p.pattern()?;
            Some((key, pattern))
        })
    }

    // double_star_pattern: '**' pattern_capture_target
    fn double_star_pattern(&mut self) -> Option<Name> {
        self.try_parse(|p| {
            p.eat(TokenKind::DoubleStar)?;
            p.pattern_capture_target()
        })
    }

    // === Classes ===

    // class_pattern:
    //     | name_or_attr '(' ')'
    //     | name_or_attr '(' positional_patterns ','? ')'
    //     | name_or_attr '(' keyword_patterns ','? ')'
    //     | name_or_attr '(' positional_patterns ',' keyword_patterns ','? ')'
    //     | invalid_class_pattern
    fn class_pattern(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let class = self.try_parse(|p| {
            let cls = p.name_or_attr()?;
            p.eat(TokenKind::LPar)?;
            let mut patterns = Nodes::new();
            let mut kwd_attrs: Vec<Name> = Vec::new();
            let mut kwd_patterns = Nodes::new();
            while !p.at(TokenKind::RPar) {
                if let Some((attr, pattern)) = p.keyword_pattern() {
                    kwd_attrs.push(attr);
                    kwd_patterns.push(pattern);
                } else if kwd_attrs.is_empty() {
                    patterns.push(p.pattern()?);
                } else {
                    return None;
                }
                if p.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            p.eat(TokenKind::RPar)?;
            let patterns = p.arena.alloc_list(&patterns);
            let kwd_attrs = p.arena.alloc_names(&kwd_attrs);
            let kwd_patterns = p.arena.alloc_list(&kwd_patterns);
            Some(p.node(
                NodeKind::MatchClass {
                    cls,
                    patterns,
                    kwd_attrs,
                    kwd_patterns,
                },
                start,
            ))
        });
        if class.is_some() {
            return class;
        }
        self.invalid(Self::invalid_class_pattern);
        None
    }

    // positional_patterns: ','.pattern+
    fn positional_patterns(&mut self) -> Option<Nodes> {
        let mut patterns = Nodes::new();
        patterns.push(self.pattern()?);
        while let Some(pattern) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.pattern()
        }) {
            patterns.push(pattern);
        }
        Some(patterns)
    }

    // keyword_patterns: ','.keyword_pattern+
    fn keyword_patterns(&mut self) -> Option<()> {
        self.keyword_pattern()?;
        while self
            .try_parse(|p| {
                p.eat(TokenKind::Comma)?;
                p.keyword_pattern()
            })
            .is_some()
        {}
        Some(())
    }

    // keyword_pattern: NAME '=' pattern
    fn keyword_pattern(&mut self) -> Option<(Name, NodeId)> {
        self.try_parse(|p| {
            let (attr, _) = p.name_token()?;
            p.eat(TokenKind::Equal)?;
            let pattern = p.pattern()?;
            Some((attr, pattern))
        })
    }

    // invalid_class_pattern:
    //     | name_or_attr '(' invalid_class_argument_pattern
    // invalid_class_argument_pattern:
    //     | [positional_patterns ','] keyword_patterns ',' positional_patterns
    fn invalid_class_pattern(&mut self) -> Option<()> {
        self.name_or_attr()?;
        self.eat(TokenKind::LPar)?;
        self.try_parse(|p| {
            p.positional_patterns()?;
            p.eat(TokenKind::Comma)
        });
        self.keyword_patterns()?;
        self.eat(TokenKind::Comma)?;
        let misplaced = self.positional_patterns()?;
        let first = self.arena.range(*misplaced.first()?);
        let last = self.arena.range(*misplaced.last()?);
        self.raise_between(first, last, "positional patterns follow keyword patterns")
    }
}
