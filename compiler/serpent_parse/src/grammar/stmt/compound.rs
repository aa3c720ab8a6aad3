//! `if`, `while`, `for`, `with`, `try`, `def` and `class`.

use serpent_ir::{Name, NodeId, NodeKind, NodeList, TokenKind};

use crate::error::Targets;
use crate::grammar::Nodes;
use crate::Parser;

impl Parser<'_> {
    // === Conditionals and loops ===

    // if_stmt:
    //     | invalid_if_stmt
    //     | 'if' named_expression ':' block elif_stmt
    //     | 'if' named_expression ':' block [else_block]
    pub(crate) fn if_stmt(&mut self) -> Option<NodeId> {
        self.invalid(|p| p.invalid_conditional(TokenKind::KwIf, "'if' statement"));
        self.conditional(TokenKind::KwIf)
    }

    // elif_stmt:
    //     | invalid_elif_stmt
    //     | 'elif' named_expression ':' block elif_stmt
    //     | 'elif' named_expression ':' block [else_block]
    fn elif_stmt(&mut self) -> Option<NodeId> {
        self.invalid(|p| p.invalid_conditional(TokenKind::KwElif, "'elif' statement"));
        self.conditional(TokenKind::KwElif)
    }

    /// `if` or `elif` with everything after it; an `elif` chain nests in
    /// `orelse`.
    fn conditional(&mut self, keyword: TokenKind) -> Option<NodeId> {
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(keyword)?;
            let test = p.named_expression()?;
            p.eat(TokenKind::Colon)?;
            let body = p.block()?;
            let orelse = match p.elif_stmt() {
                Some(elif) => p.arena.alloc_list(&[elif]),
                None => p.else_block().unwrap_or(NodeList::EMPTY),
            };
            Some(p.node(NodeKind::If { test, body, orelse }, start))
        })
    }

    /// The two ways an `if`, `elif` or `while` header goes wrong: no colon,
    /// or no indented block after it.
    fn invalid_conditional(&mut self, keyword: TokenKind, what: &str) -> Option<()> {
        if self
            .try_parse(|p| {
                p.eat(keyword)?;
                p.named_expression()?;
                p.eat(TokenKind::Newline)
            })
            .is_some()
        {
            return self.raise_syntax_error("expected ':'");
        }
        let header = self.eat(keyword)?;
        self.named_expression()?;
        self.eat(TokenKind::Colon)?;
        self.missing_indented_block(what, header.range.start_line)
    }

    // else_block:
    //     | invalid_else_stmt
    //     | 'else' &&':' block
    pub(crate) fn else_block(&mut self) -> Option<NodeList> {
        self.invalid(|p| {
            let header = p.eat(TokenKind::KwElse)?;
            p.eat(TokenKind::Colon)?;
            p.missing_indented_block("'else' statement", header.range.start_line)
        });
        self.try_parse(|p| {
            p.eat(TokenKind::KwElse)?;
            p.eat_forced(TokenKind::Colon, ":")?;
            p.block()
        })
    }

    // while_stmt:
    //     | invalid_while_stmt
    //     | 'while' named_expression ':' block [else_block]
    pub(crate) fn while_stmt(&mut self) -> Option<NodeId> {
        self.invalid(|p| p.invalid_conditional(TokenKind::KwWhile, "'while' statement"));
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(TokenKind::KwWhile)?;
            let test = p.named_expression()?;
            p.eat(TokenKind::Colon)?;
            let body = p.block()?;
            let orelse = p.else_block().unwrap_or(NodeList::EMPTY);
            Some(p.node(NodeKind::While { test, body, orelse }, start))
        })
    }

    // for_stmt:
    //     | invalid_for_stmt
    //     | [ASYNC] 'for' star_targets 'in' ~ star_expressions &&':' [TYPE_COMMENT]
    //           block [else_block]
    //     | invalid_for_target
    pub(crate) fn for_stmt(&mut self) -> Option<NodeId> {
        self.invalid(Self::invalid_for_stmt);
        let start = self.mark();
        let head = self.try_parse(|p| {
            let is_async = p.eat(TokenKind::Async).is_some();
            p.eat(TokenKind::KwFor)?;
            let target = p.star_targets()?;
            p.eat(TokenKind::KwIn)?;
            Some((is_async, target))
        });
        if let Some((is_async, target)) = head {
            let stmt = self.try_parse(|p| {
                let iter = p.star_expressions()?;
                p.eat_forced(TokenKind::Colon, ":")?;
                let type_comment = p.type_comment();
                let body = p.block()?;
                let orelse = p.else_block().unwrap_or(NodeList::EMPTY);
                Some(p.node(
                    NodeKind::For {
                        target,
                        iter,
                        body,
                        orelse,
                        type_comment,
                        is_async,
                    },
                    start,
                ))
            });
            if stmt.is_none() {
                self.reset(start);
            }
            return stmt;
        }
        self.invalid(Self::invalid_for_target);
        None
    }

    // invalid_for_stmt:
    //     | [ASYNC] 'for' star_targets 'in' star_expressions ':' NEWLINE !INDENT
    fn invalid_for_stmt(&mut self) -> Option<()> {
        self.eat(TokenKind::Async);
        let header = self.eat(TokenKind::KwFor)?;
        self.star_targets()?;
        self.eat(TokenKind::KwIn)?;
        self.star_expressions()?;
        self.eat(TokenKind::Colon)?;
        self.missing_indented_block("'for' statement", header.range.start_line)
    }

    // invalid_for_target: [ASYNC] 'for' star_expressions
    pub(crate) fn invalid_for_target(&mut self) -> Option<()> {
        self.eat(TokenKind::Async);
        self.eat(TokenKind::KwFor)?;
        let target = self.star_expressions()?;
        self.raise_invalid_target(Targets::For, target)
    }

    // === with ===

    // with_stmt:
    //     | invalid_with_stmt_indent
    //     | [ASYNC] 'with' '(' ','.with_item+ ','? ')' ':' block
    //     | [ASYNC] 'with' ','.with_item+ ':' [TYPE_COMMENT] block
    //     | invalid_with_stmt
    pub(crate) fn with_stmt(&mut self) -> Option<NodeId> {
        self.invalid(Self::invalid_with_stmt_indent);
        let start = self.mark();

        let parenthesized = self.try_parse(|p| {
            let is_async = p.eat(TokenKind::Async).is_some();
            p.eat(TokenKind::KwWith)?;
            p.eat(TokenKind::LPar)?;
            let items = p.with_items()?;
            p.eat(TokenKind::Comma);
            p.eat(TokenKind::RPar)?;
            p.eat(TokenKind::Colon)?;
            let body = p.block()?;
            Some(p.node(
                NodeKind::With {
                    items,
                    body,
                    type_comment: None,
                    is_async,
                },
                start,
            ))
        });
        if parenthesized.is_some() {
            return parenthesized;
        }

        let plain = self.try_parse(|p| {
            let is_async = p.eat(TokenKind::Async).is_some();
            p.eat(TokenKind::KwWith)?;
            let items = p.with_items()?;
            p.eat(TokenKind::Colon)?;
            let type_comment = p.type_comment();
            let body = p.block()?;
            Some(p.node(
                NodeKind::With {
                    items,
                    body,
                    type_comment,
                    is_async,
                },
                start,
            ))
        });
        if plain.is_some() {
            return plain;
        }

        self.invalid(Self::invalid_with_stmt);
        None
    }

    fn with_items(&mut self) -> Option<NodeList> {
        let mut items = Nodes::new();
        items.push(self.with_item()?);
        while let Some(item) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.with_item()
        }) {
            items.push(item);
        }
        Some(self.arena.alloc_list(&items))
    }

    // with_item:
    //     | expression 'as' star_target &(',' | ')' | ':')
    //     | invalid_with_item
    //     | expression
    fn with_item(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let bound = self.try_parse(|p| {
            let context_expr = p.expression()?;
            p.eat(TokenKind::KwAs)?;
            let target = p.star_target()?;
            if !p.at_any(&[TokenKind::Comma, TokenKind::RPar, TokenKind::Colon]) {
                return None;
            }
            Some(p.node(
                NodeKind::WithItem {
                    context_expr,
                    optional_vars: Some(target),
                },
                start,
            ))
        });
        if bound.is_some() {
            return bound;
        }
        // invalid_with_item: expression 'as' expression &(',' | ')' | ':')
        self.invalid(|p| {
            p.expression()?;
            p.eat(TokenKind::KwAs)?;
            let target = p.expression()?;
            if !p.at_any(&[TokenKind::Comma, TokenKind::RPar, TokenKind::Colon]) {
                return None;
            }
            p.raise_invalid_target(Targets::Star, target)
        });
        let context_expr = self.expression()?;
        Some(self.node(
            NodeKind::WithItem {
                context_expr,
                optional_vars: None,
            },
            start,
        ))
    }

    // invalid_with_stmt:
    //     | [ASYNC] 'with' ','.(expression ['as' star_target])+ &&':'
    //     | [ASYNC] 'with' '(' ','.(expressions ['as' star_target])+ ','? ')' &&':'
    fn invalid_with_stmt(&mut self) -> Option<()> {
        let mark = self.mark();
        let plain = self.try_parse(|p| {
            p.eat(TokenKind::Async);
            p.eat(TokenKind::KwWith)?;
            p.loose_with_items(Self::expression)?;
            p.eat_forced(TokenKind::Colon, ":")
        });
        if plain.is_some() || self.error_indicator {
            return None;
        }
        self.reset(mark);
        self.eat(TokenKind::Async);
        self.eat(TokenKind::KwWith)?;
        self.eat(TokenKind::LPar)?;
        self.loose_with_items(Self::expressions)?;
        self.eat(TokenKind::Comma);
        self.eat(TokenKind::RPar)?;
        self.eat_forced(TokenKind::Colon, ":")?;
        None
    }

    /// `','.(expr ['as' star_target])+` with `expr` parsed by `item`.
    fn loose_with_items(&mut self, item: fn(&mut Self) -> Option<NodeId>) -> Option<()> {
        let one = |p: &mut Self| {
            item(p)?;
            p.try_parse(|p| {
                p.eat(TokenKind::KwAs)?;
                p.star_target()
            });
            Some(())
        };
        one(self)?;
        while self
            .try_parse(|p| {
                p.eat(TokenKind::Comma)?;
                one(p)
            })
            .is_some()
        {}
        Some(())
    }

    // invalid_with_stmt_indent:
    //     | [ASYNC] 'with' ','.(expression ['as' star_target])+ ':' NEWLINE !INDENT
    //     | [ASYNC] 'with' '(' ','.(expressions ['as' star_target])+ ','? ')' ':'
    //           NEWLINE !INDENT
    fn invalid_with_stmt_indent(&mut self) -> Option<()> {
        let mark = self.mark();
        let header = self.try_parse(|p| {
            p.eat(TokenKind::Async);
            let header = p.eat(TokenKind::KwWith)?;
            p.loose_with_items(Self::expression)?;
            p.eat(TokenKind::Colon)?;
            Some(header)
        });
        if let Some(header) = header {
            return self.missing_indented_block("'with' statement", header.range.start_line);
        }
        self.reset(mark);
        self.eat(TokenKind::Async);
        let header = self.eat(TokenKind::KwWith)?;
        self.eat(TokenKind::LPar)?;
        self.loose_with_items(Self::expressions)?;
        self.eat(TokenKind::Comma);
        self.eat(TokenKind::RPar)?;
        self.eat(TokenKind::Colon)?;
        self.missing_indented_block("'with' statement", header.range.start_line)
    }

    // === try ===

    // try_stmt:
    //     | invalid_try_stmt
    //     | 'try' &&':' block finally_block
    //     | 'try' &&':' block except_block+ [else_block] [finally_block]
    pub(crate) fn try_stmt(&mut self) -> Option<NodeId> {
        self.invalid(Self::invalid_try_stmt);
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(TokenKind::KwTry)?;
            p.eat_forced(TokenKind::Colon, ":")?;
            let body = p.block()?;
            if let Some(finalbody) = p.finally_block() {
                return Some(p.node(
                    NodeKind::Try {
                        body,
                        handlers: NodeList::EMPTY,
                        orelse: NodeList::EMPTY,
                        finalbody,
                    },
                    start,
                ));
            }
            let mut handlers = Nodes::new();
            while let Some(handler) = p.except_block() {
                handlers.push(handler);
            }
            if handlers.is_empty() {
                return None;
            }
            let handlers = p.arena.alloc_list(&handlers);
            let orelse = p.else_block().unwrap_or(NodeList::EMPTY);
            let finalbody = p.finally_block().unwrap_or(NodeList::EMPTY);
            Some(p.node(
                NodeKind::Try {
                    body,
                    handlers,
                    orelse,
                    finalbody,
                },
                start,
            ))
        })
    }

    // invalid_try_stmt:
    //     | 'try' ':' NEWLINE !INDENT
    //     | 'try' ':' block !('except' | 'finally')
    fn invalid_try_stmt(&mut self) -> Option<()> {
        let header = self.eat(TokenKind::KwTry)?;
        self.eat(TokenKind::Colon)?;
        let mark = self.mark();
        self.missing_indented_block("'try' statement", header.range.start_line);
        if self.error_indicator {
            return None;
        }
        self.reset(mark);
        self.block()?;
        if self.at_any(&[TokenKind::KwExcept, TokenKind::KwFinally]) {
            return None;
        }
        self.raise_syntax_error("expected 'except' or 'finally' block")
    }

    // except_block:
    //     | invalid_except_stmt_indent
    //     | 'except' expression ['as' NAME] ':' block
    //     | 'except' ':' block
    //     | invalid_except_stmt
    fn except_block(&mut self) -> Option<NodeId> {
        self.invalid(Self::invalid_except_stmt_indent);
        let start = self.mark();
        let typed = self.try_parse(|p| {
            p.eat(TokenKind::KwExcept)?;
            let type_ = p.expression()?;
            let name = p.except_name();
            p.eat(TokenKind::Colon)?;
            let body = p.block()?;
            Some(p.node(
                NodeKind::ExceptHandler {
                    type_: Some(type_),
                    name,
                    body,
                },
                start,
            ))
        });
        if typed.is_some() {
            return typed;
        }
        let bare = self.try_parse(|p| {
            p.eat(TokenKind::KwExcept)?;
            p.eat(TokenKind::Colon)?;
            let body = p.block()?;
            Some(p.node(
                NodeKind::ExceptHandler {
                    type_: None,
                    name: None,
                    body,
                },
                start,
            ))
        });
        if bare.is_some() {
            return bare;
        }
        self.invalid(Self::invalid_except_stmt);
        None
    }

    /// `['as' NAME]` after an exception type.
    fn except_name(&mut self) -> Option<Name> {
        self.try_parse(|p| {
            p.eat(TokenKind::KwAs)?;
            p.name_token().map(|(name, _)| name)
        })
    }

    // invalid_except_stmt:
    //     | 'except' expression ',' expressions ['as' NAME] ':'
    //     | 'except' expression ['as' NAME] NEWLINE
    //     | 'except' NEWLINE
    fn invalid_except_stmt(&mut self) -> Option<()> {
        if let Some(first) = self.try_parse(|p| {
            p.eat(TokenKind::KwExcept)?;
            let first = p.expression()?;
            p.eat(TokenKind::Comma)?;
            p.expressions()?;
            p.except_name();
            p.eat(TokenKind::Colon)?;
            Some(first)
        }) {
            let range = self.arena.range(first);
            return self.raise_starting_from(range, "multiple exception types must be parenthesized");
        }
        let missing_colon = self
            .try_parse(|p| {
                p.eat(TokenKind::KwExcept)?;
                p.expression()?;
                p.except_name();
                p.eat(TokenKind::Newline)
            })
            .or_else(|| {
                self.try_parse(|p| {
                    p.eat(TokenKind::KwExcept)?;
                    p.eat(TokenKind::Newline)
                })
            });
        if missing_colon.is_some() {
            return self.raise_syntax_error("expected ':'");
        }
        None
    }

    // invalid_except_stmt_indent:
    //     | 'except' expression ['as' NAME] ':' NEWLINE !INDENT
    //     | 'except' ':' NEWLINE !INDENT
    fn invalid_except_stmt_indent(&mut self) -> Option<()> {
        let header = self.eat(TokenKind::KwExcept)?;
        if self.eat(TokenKind::Colon).is_none() {
            self.expression()?;
            self.except_name();
            self.eat(TokenKind::Colon)?;
        }
        self.missing_indented_block("'except' statement", header.range.start_line)
    }

    // finally_block:
    //     | invalid_finally_stmt
    //     | 'finally' &&':' block
    fn finally_block(&mut self) -> Option<NodeList> {
        self.invalid(|p| {
            let header = p.eat(TokenKind::KwFinally)?;
            p.eat(TokenKind::Colon)?;
            p.missing_indented_block("'finally' statement", header.range.start_line)
        });
        self.try_parse(|p| {
            p.eat(TokenKind::KwFinally)?;
            p.eat_forced(TokenKind::Colon, ":")?;
            p.block()
        })
    }

    // === Definitions ===

    // decorators: ('@' named_expression NEWLINE)+
    fn decorators(&mut self) -> Option<NodeList> {
        let mut decorators = Nodes::new();
        while let Some(decorator) = self.try_parse(|p| {
            p.eat(TokenKind::At)?;
            let decorator = p.named_expression()?;
            p.eat(TokenKind::Newline)?;
            Some(decorator)
        }) {
            decorators.push(decorator);
        }
        if decorators.is_empty() {
            return None;
        }
        Some(self.arena.alloc_list(&decorators))
    }

    // function_def:
    //     | decorators function_def_raw
    //     | function_def_raw
    pub(crate) fn function_def(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let decorators = self.decorators().unwrap_or(NodeList::EMPTY);
        let def = self.function_def_raw(decorators, start);
        if def.is_none() {
            self.reset(start);
        }
        def
    }

    // function_def_raw:
    //     | invalid_def_raw
    //     | [ASYNC] 'def' NAME '(' [params] ')' ['->' expression] &&':'
    //           [func_type_comment] block
    fn function_def_raw(&mut self, decorators: NodeList, start: usize) -> Option<NodeId> {
        self.invalid(Self::invalid_def_raw);
        self.try_parse(|p| {
            let is_async = p.eat(TokenKind::Async).is_some();
            p.eat(TokenKind::KwDef)?;
            let (name, _) = p.name_token()?;
            p.eat(TokenKind::LPar)?;
            let args = match p.params() {
                Some(args) => args,
                None => p.empty_arguments(),
            };
            p.eat(TokenKind::RPar)?;
            let returns = p.try_parse(|p| {
                p.eat(TokenKind::RArrow)?;
                p.expression()
            });
            p.eat_forced(TokenKind::Colon, ":")?;
            let type_comment = p.func_type_comment();
            let body = p.block()?;
            Some(p.node(
                NodeKind::FunctionDef {
                    name,
                    args,
                    body,
                    decorators,
                    returns,
                    type_comment,
                    is_async,
                },
                start,
            ))
        })
    }

    // invalid_def_raw:
    //     | [ASYNC] 'def' NAME '(' [params] ')' ['->' expression] ':' NEWLINE !INDENT
    fn invalid_def_raw(&mut self) -> Option<()> {
        self.eat(TokenKind::Async);
        let header = self.eat(TokenKind::KwDef)?;
        self.name_token()?;
        self.eat(TokenKind::LPar)?;
        self.params();
        self.eat(TokenKind::RPar)?;
        self.try_parse(|p| {
            p.eat(TokenKind::RArrow)?;
            p.expression()
        });
        self.eat(TokenKind::Colon)?;
        self.missing_indented_block("function definition", header.range.start_line)
    }

    // func_type_comment:
    //     | NEWLINE TYPE_COMMENT &(NEWLINE INDENT)
    //     | invalid_double_type_comments
    //     | TYPE_COMMENT
    fn func_type_comment(&mut self) -> Option<Name> {
        let on_own_line = self.try_parse(|p| {
            p.eat(TokenKind::Newline)?;
            let comment = p.type_comment()?;
            let indented = p.look_ahead(|p| {
                p.eat(TokenKind::Newline)?;
                p.eat(TokenKind::Indent)
            });
            indented.then_some(comment)
        });
        if on_own_line.is_some() {
            return on_own_line;
        }
        // invalid_double_type_comments:
        //     TYPE_COMMENT NEWLINE TYPE_COMMENT NEWLINE INDENT
        self.invalid(|p| {
            p.eat(TokenKind::TypeComment)?;
            p.eat(TokenKind::Newline)?;
            p.eat(TokenKind::TypeComment)?;
            p.eat(TokenKind::Newline)?;
            p.eat(TokenKind::Indent)?;
            p.raise_syntax_error("Cannot have two type comments on def")
        });
        self.type_comment()
    }

    // class_def:
    //     | decorators class_def_raw
    //     | class_def_raw
    pub(crate) fn class_def(&mut self) -> Option<NodeId> {
        let start = self.mark();
        let decorators = self.decorators().unwrap_or(NodeList::EMPTY);
        let class = self.class_def_raw(decorators, start);
        if class.is_none() {
            self.reset(start);
        }
        class
    }

    // class_def_raw:
    //     | invalid_class_def_raw
    //     | 'class' NAME ['(' [arguments] ')'] &&':' block
    fn class_def_raw(&mut self, decorators: NodeList, start: usize) -> Option<NodeId> {
        self.invalid(Self::invalid_class_def_raw);
        self.try_parse(|p| {
            p.eat(TokenKind::KwClass)?;
            let (name, _) = p.name_token()?;
            let (bases, keywords) = p
                .try_parse(|p| {
                    p.eat(TokenKind::LPar)?;
                    let arguments = p.arguments();
                    p.eat(TokenKind::RPar)?;
                    Some(p.call_parts(arguments))
                })
                .unwrap_or((NodeList::EMPTY, NodeList::EMPTY));
            p.eat_forced(TokenKind::Colon, ":")?;
            let body = p.block()?;
            Some(p.node(
                NodeKind::ClassDef {
                    name,
                    bases,
                    keywords,
                    body,
                    decorators,
                },
                start,
            ))
        })
    }

    // invalid_class_def_raw:
    //     | 'class' NAME ['(' [arguments] ')'] ':' NEWLINE !INDENT
    fn invalid_class_def_raw(&mut self) -> Option<()> {
        let header = self.eat(TokenKind::KwClass)?;
        self.name_token()?;
        self.try_parse(|p| {
            p.eat(TokenKind::LPar)?;
            p.arguments();
            p.eat(TokenKind::RPar)
        });
        self.eat(TokenKind::Colon)?;
        self.missing_indented_block("class definition", header.range.start_line)
    }
}
