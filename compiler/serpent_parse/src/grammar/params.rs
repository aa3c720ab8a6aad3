//! Parameter lists of `def` and `lambda`.
//!
//! Both share one implementation parameterized by [`Style`]: a `def` list
//! ends at `)` and allows annotations and per-parameter type comments, a
//! `lambda` list ends at `:` and allows neither.

use rustc_hash::FxHashSet;
use serpent_ir::{NodeId, NodeKind, SourceRange, TokenKind};

use crate::grammar::Nodes;
use crate::Parser;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Style {
    Def,
    Lambda,
}

impl Style {
    fn closer(self) -> TokenKind {
        match self {
            Style::Def => TokenKind::RPar,
            Style::Lambda => TokenKind::Colon,
        }
    }
}

/// Whether a parameter may, must or must not carry `= default`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum DefaultRule {
    Without,
    With,
    Maybe,
}

/// `*args`, keyword-only parameters and `**kwargs`.
#[derive(Default)]
struct StarEtc {
    vararg: Option<NodeId>,
    kwonly: Nodes,
    kw_defaults: Nodes,
    kwarg: Option<NodeId>,
}

impl Parser<'_> {
    // params:
    //     | invalid_parameters
    //     | parameters
    pub(crate) fn params(&mut self) -> Option<NodeId> {
        self.invalid(|p| p.invalid_parameters(Style::Def));
        self.parameters(Style::Def)
    }

    // lambda_params:
    //     | invalid_lambda_parameters
    //     | lambda_parameters
    pub(crate) fn lambda_params(&mut self) -> Option<NodeId> {
        self.invalid(|p| p.invalid_parameters(Style::Lambda));
        self.parameters(Style::Lambda)
    }

    /// `Arguments` with nothing in it, for `def f():` and `lambda: 0`.
    pub(crate) fn empty_arguments(&mut self) -> NodeId {
        self.arena.alloc(
            NodeKind::Arguments {
                posonly: serpent_ir::NodeList::EMPTY,
                args: serpent_ir::NodeList::EMPTY,
                vararg: None,
                kwonly: serpent_ir::NodeList::EMPTY,
                kw_defaults: serpent_ir::NodeList::EMPTY,
                kwarg: None,
                defaults: serpent_ir::NodeList::EMPTY,
            },
            SourceRange::ARTIFICIAL,
        )
    }

    // parameters:
    //     | slash_no_default param_no_default* param_with_default* [star_etc]
    //     | slash_with_default param_with_default* [star_etc]
    //     | param_no_default+ param_with_default* [star_etc]
    //     | param_with_default+ [star_etc]
    //     | star_etc
    fn parameters(&mut self, style: Style) -> Option<NodeId> {
        let start = self.mark();
        let mut posonly = Nodes::new();
        let mut args = Nodes::new();
        let mut defaults = Nodes::new();

        // slash_no_default | slash_with_default
        if let Some((before_slash, slash_defaults)) = self.try_parse(|p| {
            let mut before_slash = Nodes::new();
            let mut slash_defaults = Nodes::new();
            p.param_run(style, DefaultRule::Without, &mut before_slash, &mut slash_defaults);
            p.param_run(style, DefaultRule::With, &mut before_slash, &mut slash_defaults);
            if before_slash.is_empty() {
                return None;
            }
            p.eat(TokenKind::Slash)?;
            p.comma_or_closer(style)?;
            Some((before_slash, slash_defaults))
        }) {
            posonly = before_slash;
            defaults = slash_defaults;
        }

        if defaults.is_empty() {
            self.param_run(style, DefaultRule::Without, &mut args, &mut defaults);
        }
        self.param_run(style, DefaultRule::With, &mut args, &mut defaults);
        let star = self.star_etc(style);
        if posonly.is_empty() && args.is_empty() && star.is_none() {
            self.reset(start);
            return None;
        }
        let star = star.unwrap_or_default();

        let kind = NodeKind::Arguments {
            posonly: self.arena.alloc_list(&posonly),
            args: self.arena.alloc_list(&args),
            vararg: star.vararg,
            kwonly: self.arena.alloc_list(&star.kwonly),
            kw_defaults: self.arena.alloc_list(&star.kw_defaults),
            kwarg: star.kwarg,
            defaults: self.arena.alloc_list(&defaults),
        };
        let arguments = self.node(kind, start);
        self.check_duplicate_parameters(arguments)?;
        Some(arguments)
    }

    /// `','` or a lookahead for the closing token.
    fn comma_or_closer(&mut self, style: Style) -> Option<()> {
        if self.eat(TokenKind::Comma).is_some() || self.at(style.closer()) {
            Some(())
        } else {
            None
        }
    }

    /// As many parameters following `rule` as there are. Parameters go to
    /// `params`, defaults to `defaults`.
    fn param_run(&mut self, style: Style, rule: DefaultRule, params: &mut Nodes, defaults: &mut Nodes) {
        while let Some((param, default)) = self.param_item(style, rule) {
            params.push(param);
            if let Some(default) = default {
                defaults.push(default);
            }
        }
    }

    // param_no_default:
    //     | param ',' TYPE_COMMENT?
    //     | param TYPE_COMMENT? &')'
    // param_with_default:
    //     | param default ',' TYPE_COMMENT?
    //     | param default TYPE_COMMENT? &')'
    // param_maybe_default:
    //     | param default? ',' TYPE_COMMENT?
    //     | param default? TYPE_COMMENT? &')'
    // param: NAME annotation?
    // annotation: ':' expression
    // default: '=' expression
    fn param_item(&mut self, style: Style, rule: DefaultRule) -> Option<(NodeId, Option<NodeId>)> {
        self.try_parse(|p| {
            let start = p.mark();
            let (arg, _) = p.name_token()?;
            let annotation = match style {
                Style::Def => p.try_parse(|p| {
                    p.eat(TokenKind::Colon)?;
                    p.expression()
                }),
                Style::Lambda => None,
            };
            let range = p.range_from(start);
            let default = match rule {
                DefaultRule::Without => None,
                DefaultRule::With | DefaultRule::Maybe => p.try_parse(|p| {
                    p.eat(TokenKind::Equal)?;
                    p.expression()
                }),
            };
            if rule == DefaultRule::With && default.is_none() {
                return None;
            }
            let type_comment = if p.eat(TokenKind::Comma).is_some() {
                p.param_type_comment(style)
            } else {
                let type_comment = p.param_type_comment(style);
                if !p.at(style.closer()) {
                    return None;
                }
                type_comment
            };
            let param = p.arena.alloc(
                NodeKind::Arg {
                    arg,
                    annotation,
                    type_comment,
                },
                range,
            );
            Some((param, default))
        })
    }

    fn param_type_comment(&mut self, style: Style) -> Option<serpent_ir::Name> {
        match style {
            Style::Def => self.type_comment(),
            Style::Lambda => None,
        }
    }

    // star_etc:
    //     | '*' param_no_default param_maybe_default* [kwds]
    //     | '*' ',' param_maybe_default+ [kwds]
    //     | kwds
    //     | invalid_star_etc
    fn star_etc(&mut self, style: Style) -> Option<StarEtc> {
        let named = self.try_parse(|p| {
            p.eat(TokenKind::Star)?;
            let (vararg, _) = p.param_item(style, DefaultRule::Without)?;
            let mut star = StarEtc {
                vararg: Some(vararg),
                ..StarEtc::default()
            };
            p.keyword_only_run(style, &mut star);
            star.kwarg = p.kwds(style);
            Some(star)
        });
        if named.is_some() {
            return named;
        }

        let bare = self.try_parse(|p| {
            p.eat(TokenKind::Star)?;
            p.eat(TokenKind::Comma)?;
            let mut star = StarEtc::default();
            p.keyword_only_run(style, &mut star);
            if star.kwonly.is_empty() {
                return None;
            }
            star.kwarg = p.kwds(style);
            Some(star)
        });
        if bare.is_some() {
            return bare;
        }

        if let Some(kwarg) = self.kwds(style) {
            return Some(StarEtc {
                kwarg: Some(kwarg),
                ..StarEtc::default()
            });
        }

        self.invalid(|p| p.invalid_star_etc(style));
        None
    }

    /// `param_maybe_default*` into the keyword-only lists.
    fn keyword_only_run(&mut self, style: Style, star: &mut StarEtc) {
        while let Some((param, default)) = self.param_item(style, DefaultRule::Maybe) {
            star.kwonly.push(param);
            star.kw_defaults.push(default.unwrap_or(NodeId::NONE));
        }
    }

    // kwds: '**' param_no_default
    fn kwds(&mut self, style: Style) -> Option<NodeId> {
        self.try_parse(|p| {
            p.eat(TokenKind::DoubleStar)?;
            p.param_item(style, DefaultRule::Without).map(|(param, _)| param)
        })
    }

    // invalid_star_etc:
    //     | '*' (')' | ',' (')' | '**'))
    //     | '*' ',' TYPE_COMMENT
    // invalid_lambda_star_etc:
    //     | '*' (':' | ',' (':' | '**'))
    fn invalid_star_etc(&mut self, style: Style) -> Option<()> {
        let star = self.eat(TokenKind::Star)?;
        let closer = style.closer();
        let bare = self.at(closer)
            || self.look_ahead(|p| {
                p.eat(TokenKind::Comma)?;
                if p.at(closer) || p.at(TokenKind::DoubleStar) {
                    Some(())
                } else {
                    None
                }
            });
        if bare {
            return self.raise_at(star.range, "named arguments must follow bare *");
        }
        if style == Style::Def {
            self.eat(TokenKind::Comma)?;
            self.eat(TokenKind::TypeComment)?;
            return self.raise_syntax_error("bare * has associated type comment");
        }
        None
    }

    // invalid_parameters:
    //     | param_no_default* invalid_parameters_helper param_no_default
    // invalid_parameters_helper:
    //     | slash_with_default
    //     | param_with_default+
    fn invalid_parameters(&mut self, style: Style) -> Option<()> {
        let mut scratch = Nodes::new();
        let mut scratch_defaults = Nodes::new();
        self.param_run(style, DefaultRule::Without, &mut scratch, &mut scratch_defaults);
        scratch.clear();
        self.param_run(style, DefaultRule::With, &mut scratch, &mut scratch_defaults);
        if scratch.is_empty() {
            return None;
        }
        self.try_parse(|p| {
            p.eat(TokenKind::Slash)?;
            p.comma_or_closer(style)
        });
        let (param, _) = self.param_item(style, DefaultRule::Without)?;
        self.raise_at_node(param, "non-default argument follows default argument")
    }

    /// "duplicate argument" at the second parameter with a name.
    fn check_duplicate_parameters(&mut self, arguments: NodeId) -> Option<()> {
        let NodeKind::Arguments {
            posonly,
            args,
            vararg,
            kwonly,
            kwarg,
            ..
        } = *self.arena.kind(arguments)
        else {
            return Some(());
        };
        let mut params: Nodes = Nodes::new();
        params.extend_from_slice(self.arena.list(posonly));
        params.extend_from_slice(self.arena.list(args));
        params.extend(vararg);
        params.extend_from_slice(self.arena.list(kwonly));
        params.extend(kwarg);

        let mut seen = FxHashSet::default();
        let duplicate = params.iter().find_map(|&param| match *self.arena.kind(param) {
            NodeKind::Arg { arg, .. } if !seen.insert(arg) => Some((param, arg)),
            _ => None,
        });
        match duplicate {
            Some((param, name)) => {
                let message = format!(
                    "duplicate argument '{}' in function definition",
                    self.arena.name_str(name)
                );
                self.raise_at_node(param, &message)
            }
            None => Some(()),
        }
    }
}
