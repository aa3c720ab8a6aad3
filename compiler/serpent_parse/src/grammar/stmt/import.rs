use serpent_ir::{Name, NodeId, NodeKind, NodeList, TokenKind};

use crate::grammar::Nodes;
use crate::Parser;

impl Parser<'_> {
    // import_stmt: import_name | import_from
    pub(crate) fn import_stmt(&mut self) -> Option<NodeId> {
        match self.peek_kind()? {
            TokenKind::KwImport => self.import_name(),
            TokenKind::KwFrom => self.import_from(),
            _ => None,
        }
    }

    // import_name: 'import' dotted_as_names
    fn import_name(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.eat(TokenKind::KwImport)?;
        let Some(names) = self.dotted_as_names() else {
            self.reset(start);
            return None;
        };
        Some(self.node(NodeKind::Import { names }, start))
    }

    // import_from:
    //     | 'from' ('.' | '...')* dotted_name 'import' import_from_targets
    //     | 'from' ('.' | '...')+ 'import' import_from_targets
    fn import_from(&mut self) -> Option<NodeId> {
        let start = self.mark();
        self.try_parse(|p| {
            p.eat(TokenKind::KwFrom)?;
            let mut level = 0;
            loop {
                if p.eat(TokenKind::Dot).is_some() {
                    level += 1;
                } else if p.eat(TokenKind::Ellipsis).is_some() {
                    level += 3;
                } else {
                    break;
                }
            }
            let module = p.dotted_name();
            if module.is_none() && level == 0 {
                return None;
            }
            p.eat(TokenKind::KwImport)?;
            let names = p.import_from_targets()?;
            Some(p.node(
                NodeKind::ImportFrom {
                    module,
                    names,
                    level,
                },
                start,
            ))
        })
    }

    // import_from_targets:
    //     | '(' import_from_as_names [','] ')'
    //     | import_from_as_names !','
    //     | '*'
    //     | invalid_import_from_targets
    fn import_from_targets(&mut self) -> Option<NodeList> {
        let parenthesized = self.try_parse(|p| {
            p.eat(TokenKind::LPar)?;
            let names = p.import_from_as_names()?;
            p.eat(TokenKind::Comma);
            p.eat(TokenKind::RPar)?;
            Some(names)
        });
        if parenthesized.is_some() {
            return parenthesized;
        }
        let bare = self.try_parse(|p| {
            let names = p.import_from_as_names()?;
            if p.at(TokenKind::Comma) {
                return None;
            }
            Some(names)
        });
        if bare.is_some() {
            return bare;
        }
        if let Some(star) = self.eat(TokenKind::Star) {
            let name = self.arena.intern("*");
            let alias = self
                .arena
                .alloc(NodeKind::Alias { name, asname: None }, star.range);
            return Some(self.arena.alloc_list(&[alias]));
        }
        // invalid_import_from_targets: import_from_as_names ',' NEWLINE
        self.invalid(|p| {
            p.import_from_as_names()?;
            p.eat(TokenKind::Comma)?;
            p.eat(TokenKind::Newline)?;
            p.raise_syntax_error("trailing comma not allowed without surrounding parentheses")
        });
        None
    }

    // import_from_as_names: ','.import_from_as_name+
    // import_from_as_name: NAME ['as' NAME]
    fn import_from_as_names(&mut self) -> Option<NodeList> {
        self.alias_list(|p| p.name_token().map(|(name, _)| name))
    }

    // dotted_as_names: ','.dotted_as_name+
    // dotted_as_name: dotted_name ['as' NAME]
    fn dotted_as_names(&mut self) -> Option<NodeList> {
        self.alias_list(Self::dotted_name)
    }

    fn alias_list(&mut self, name: fn(&mut Self) -> Option<Name>) -> Option<NodeList> {
        let mut aliases = Nodes::new();
        aliases.push(self.alias(name)?);
        while let Some(alias) = self.try_parse(|p| {
            p.eat(TokenKind::Comma)?;
            p.alias(name)
        }) {
            aliases.push(alias);
        }
        Some(self.arena.alloc_list(&aliases))
    }

    fn alias(&mut self, name: fn(&mut Self) -> Option<Name>) -> Option<NodeId> {
        let start = self.mark();
        let name = name(self)?;
        let asname = self.try_parse(|p| {
            p.eat(TokenKind::KwAs)?;
            p.name_token().map(|(name, _)| name)
        });
        Some(self.node(NodeKind::Alias { name, asname }, start))
    }

    // dotted_name: dotted_name '.' NAME | NAME
    fn dotted_name(&mut self) -> Option<Name> {
        let (first, _) = self.name_token()?;
        let mut parts = vec![first];
        while let Some(part) = self.try_parse(|p| {
            p.eat(TokenKind::Dot)?;
            p.name_token().map(|(name, _)| name)
        }) {
            parts.push(part);
        }
        if parts.len() == 1 {
            return Some(first);
        }
        let dotted = parts
            .iter()
            .map(|&part| self.arena.name_str(part))
            .collect::<Vec<_>>()
            .join(".");
        Some(self.arena.intern(&dotted))
    }
}
