//! String literals: implicit concatenation and f-strings.
//!
//! The tokenizer hands over an f-string as one `STRING` token. Here its
//! body is split into literal text and replacement fields. The expression of
//! each field is parsed by a separate [`Parser`] whose tokenizer is shifted
//! to the field's position in the file, so every node it builds carries
//! absolute source positions. Both parsers share one arena.
//!
//! Parts of a `JoinedStr` get ranges of their own: literal text covers its
//! characters, a `FormattedValue` covers `{` through `}`. The text of a
//! self-documenting field (`{x=}`) is attributed to its opening brace.

use serpent_ir::{
    ConstantValue, Conversion, NodeId, NodeKind, SourceRange, SstArena, Token, TokenKind,
};
use serpent_lexer::cook::{cook_str, cook_string, CookError, Cooked, StringShape};
use serpent_lexer::{Tokenizer, TokenizerFlags};
use serpent_lexer_core::SourceBuffer;
use smallvec::SmallVec;
use tracing::trace;

use crate::grammar::Nodes;
use crate::memo::Rule;
use crate::{InputMode, Parser};

/// Deepest format-spec nesting a replacement field may sit at.
const MAX_FIELD_NESTING: u32 = 2;

/// Open brackets allowed inside one replacement field.
const MAX_FIELD_PARENS: usize = 200;

/// Body of one f-string token, with the source position of every character.
struct FStringScan {
    chars: Vec<char>,
    /// `(line, column)` of each of `chars`, plus the position after the last.
    at: Vec<(i32, i32)>,
    pos: usize,
    /// Index of the closing quotes.
    end: usize,
    raw: bool,
    token: Token,
}

impl FStringScan {
    fn new(token: Token, text: &str, shape: StringShape) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut at = Vec::with_capacity(chars.len() + 1);
        let (mut line, mut column) = token.range.start();
        for &c in &chars {
            at.push((line, column));
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        at.push((line, column));
        let pos = (shape.prefix_len + shape.quote_len).min(chars.len());
        let end = chars.len().saturating_sub(shape.quote_len).max(pos);
        FStringScan {
            chars,
            at,
            pos,
            end,
            raw: shape.raw,
            token,
        }
    }

    fn peek(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    fn char_at(&self, index: usize) -> Option<char> {
        if index < self.end {
            self.chars.get(index).copied()
        } else {
            None
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    fn range(&self, start: usize, end: usize) -> SourceRange {
        let (start_line, start_column) = self.at[start];
        let (end_line, end_column) = self.at[end];
        SourceRange::new(start_line, start_column, end_line, end_column)
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

/// Values of a `JoinedStr` being assembled. Adjacent literal text is merged
/// into a single `Constant`.
#[derive(Default)]
struct Parts {
    values: Nodes,
    text: String,
    text_range: Option<SourceRange>,
}

impl Parts {
    fn push_text(&mut self, text: &str, range: SourceRange) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        self.text_range = Some(match self.text_range {
            Some(before) => before.with_end(range),
            None => range,
        });
    }

    fn push_node(&mut self, arena: &mut SstArena, node: NodeId) {
        self.flush(arena);
        self.values.push(node);
    }

    fn flush(&mut self, arena: &mut SstArena) {
        if let Some(range) = self.text_range.take() {
            let value = arena.alloc_constant(ConstantValue::Str(std::mem::take(&mut self.text)));
            let node = arena.alloc(
                NodeKind::Constant {
                    value,
                    unicode_prefix: false,
                },
                range,
            );
            self.values.push(node);
        }
    }

    fn finish(mut self, arena: &mut SstArena, range: SourceRange) -> NodeId {
        self.flush(arena);
        let values = arena.alloc_list(&self.values);
        arena.alloc(NodeKind::JoinedStr { values }, range)
    }
}

impl Parser<'_> {
    // strings: STRING+
    pub(crate) fn strings(&mut self) -> Option<NodeId> {
        self.memoized(Rule::Strings, |p| {
            let start = p.mark();
            let mut tokens: SmallVec<[Token; 4]> = SmallVec::new();
            while let Some(token) = p.eat(TokenKind::String) {
                tokens.push(token);
            }
            if tokens.is_empty() {
                return None;
            }
            p.concatenate_strings(&tokens, start)
        })
    }

    /// One `Constant` (or `JoinedStr` when an f-string is among them) for a
    /// run of adjacent string tokens.
    fn concatenate_strings(&mut self, tokens: &[Token], start: usize) -> Option<NodeId> {
        let texts: SmallVec<[(Token, String, StringShape); 4]> = tokens
            .iter()
            .map(|&token| {
                let text = self.text(&token);
                let shape = StringShape::of(&text);
                (token, text, shape)
            })
            .collect();

        let bytes = texts.iter().filter(|(_, _, shape)| shape.bytes).count();
        if bytes != 0 && bytes != texts.len() {
            return self.raise_syntax_error("cannot mix bytes and nonbytes literals");
        }

        let unicode_prefix = texts
            .first()
            .is_some_and(|(_, text, _)| text.starts_with(['u', 'U']));
        if !texts.iter().any(|(_, _, shape)| shape.format) {
            let mut value = if bytes == 0 {
                Cooked::Str(String::new())
            } else {
                Cooked::Bytes(Vec::new())
            };
            for (token, text, _) in &texts {
                match cook_string(text) {
                    Ok(cooked) => value.append(cooked),
                    Err(err) => return self.report_cook_error(token, &err),
                }
            }
            return Some(self.string_constant(value.into(), unicode_prefix, start));
        }

        let mut parts = Parts::default();
        for (token, text, shape) in &texts {
            let mut scan = FStringScan::new(*token, text, *shape);
            if shape.format {
                self.fstring_parts(&mut scan, 0, &mut parts)?;
                continue;
            }
            let (body_start, body_end) = (scan.pos, scan.end);
            match cook_str(shape.body(text), shape.raw) {
                Ok(cooked) => parts.push_text(&cooked, scan.range(body_start, body_end)),
                Err(err) => return self.report_cook_error(token, &err),
            }
        }
        let range = self.range_from(start);
        Some(parts.finish(&mut self.arena, range))
    }

    fn string_constant(&mut self, value: ConstantValue, unicode_prefix: bool, start: usize) -> NodeId {
        let value = self.arena.alloc_constant(value);
        self.node(
            NodeKind::Constant {
                value,
                unicode_prefix,
            },
            start,
        )
    }

    fn report_cook_error<T>(&mut self, token: &Token, err: &CookError) -> Option<T> {
        self.raise_error(err.kind(), token.range, &err.to_string())
    }

    // === F-strings ===

    /// Literal text and replacement fields up to the end of the body, or up
    /// to the `}` closing a format spec when `level > 0`.
    fn fstring_parts(&mut self, scan: &mut FStringScan, level: u32, parts: &mut Parts) -> Option<()> {
        loop {
            if self.fstring_literal(scan, level, parts)? {
                continue;
            }
            if scan.at_end() || scan.peek() == Some('}') {
                break;
            }
            self.fstring_field(scan, level, parts)?;
        }
        if level > 0 && scan.peek() != Some('}') {
            return self.raise_at(scan.token.range, "f-string: expecting '}'");
        }
        Some(())
    }

    /// Literal text up to the next `{` or `}`. `true` when it stopped at a
    /// doubled brace, which stands for the brace itself.
    fn fstring_literal(&mut self, scan: &mut FStringScan, level: u32, parts: &mut Parts) -> Option<bool> {
        let start = scan.pos;
        let mut doubled = false;
        let end = loop {
            let Some(mut c) = scan.peek() else {
                break scan.pos;
            };
            scan.pos += 1;
            if !scan.raw && c == '\\' && !scan.at_end() {
                c = scan.chars[scan.pos];
                scan.pos += 1;
                if c == 'N' {
                    // `\N{name}`: the braces belong to the escape.
                    if scan.peek() == Some('{') {
                        while let Some(d) = scan.peek() {
                            scan.pos += 1;
                            if d == '}' {
                                break;
                            }
                        }
                    }
                    continue;
                }
            }
            if c != '{' && c != '}' {
                continue;
            }
            if level == 0 {
                if scan.peek() == Some(c) {
                    let end = scan.pos;
                    scan.pos += 1;
                    doubled = true;
                    break end;
                }
                if c == '}' {
                    return self.raise_at(scan.token.range, "f-string: single '}' is not allowed");
                }
            }
            scan.pos -= 1;
            break scan.pos;
        };

        if end > start {
            match cook_str(&scan.text(start, end), scan.raw) {
                Ok(text) => parts.push_text(&text, scan.range(start, end)),
                Err(err) => return self.report_cook_error(&scan.token, &err),
            }
        }
        Some(doubled)
    }

    /// One replacement field, starting at its `{`.
    fn fstring_field(&mut self, scan: &mut FStringScan, level: u32, parts: &mut Parts) -> Option<()> {
        let open = scan.pos;
        if level >= MAX_FIELD_NESTING {
            return self.raise_at(scan.token.range, "f-string: expressions nested too deeply");
        }
        scan.pos += 1;
        let expr_start = scan.pos;
        let expr_end = self.fstring_expression_end(scan)?;

        if scan.at_end() {
            return self.raise_at(scan.token.range, "f-string: expecting '}'");
        }
        if scan.chars[expr_start..expr_end].iter().all(|c| c.is_whitespace()) {
            return self.raise_at(scan.token.range, "f-string: empty expression not allowed");
        }
        let value = self.fstring_expression(scan, expr_start, expr_end)?;

        let mut self_documenting = false;
        if scan.peek() == Some('=') {
            scan.pos += 1;
            while scan.peek().is_some_and(|c| c.is_ascii_whitespace() || c == '\x0b') {
                scan.pos += 1;
            }
            if scan.at_end() {
                return self.raise_at(scan.token.range, "f-string: expecting '}'");
            }
            let text = scan.text(expr_start, scan.pos);
            parts.push_text(&text, scan.range(open, open + 1));
            self_documenting = true;
        }

        let mut conversion = None;
        if scan.peek() == Some('!') {
            scan.pos += 1;
            let Some(c) = scan.peek() else {
                return self.raise_at(scan.token.range, "f-string: expecting '}'");
            };
            scan.pos += 1;
            conversion = Conversion::from_char(c);
            if conversion.is_none() {
                return self.raise_at(
                    scan.token.range,
                    "f-string: invalid conversion character: expected 's', 'r', or 'a'",
                );
            }
        }

        let mut format_spec = None;
        if scan.peek() == Some(':') {
            let colon = scan.pos;
            scan.pos += 1;
            if scan.at_end() {
                return self.raise_at(scan.token.range, "f-string: expecting '}'");
            }
            let mut spec = Parts::default();
            self.fstring_parts(scan, level + 1, &mut spec)?;
            let range = scan.range(colon, scan.pos);
            format_spec = Some(spec.finish(&mut self.arena, range));
        }

        if scan.peek() != Some('}') {
            return self.raise_at(scan.token.range, "f-string: expecting '}'");
        }
        scan.pos += 1;

        if self_documenting && conversion.is_none() && format_spec.is_none() {
            conversion = Some(Conversion::Repr);
        }
        let first = if self_documenting { open + 1 } else { open };
        let node = self.arena.alloc(
            NodeKind::FormattedValue {
                value,
                conversion,
                format_spec,
            },
            scan.range(first, scan.pos),
        );
        parts.push_node(&mut self.arena, node);
        Some(())
    }

    /// Advance over the expression of a replacement field: up to a `!`, `:`,
    /// `=` or `}` outside brackets and strings. Returns where it ends.
    fn fstring_expression_end(&mut self, scan: &mut FStringScan) -> Option<usize> {
        let mut quote: Option<(char, usize)> = None;
        let mut parens: SmallVec<[char; 8]> = SmallVec::new();
        while let Some(c) = scan.peek() {
            if c == '\\' {
                return self.raise_at(
                    scan.token.range,
                    "f-string expression part cannot include a backslash",
                );
            }
            if let Some((q, size)) = quote {
                if c == q && (size == 1 || self.fstring_triple(scan, q)) {
                    scan.pos += size;
                    quote = None;
                } else {
                    scan.pos += 1;
                }
                continue;
            }
            match c {
                '\'' | '"' => {
                    let size = if self.fstring_triple(scan, c) { 3 } else { 1 };
                    quote = Some((c, size));
                    scan.pos += size;
                    continue;
                }
                '[' | '(' | '{' => {
                    if parens.len() >= MAX_FIELD_PARENS {
                        return self.raise_at(scan.token.range, "f-string: too many nested parenthesis");
                    }
                    parens.push(c);
                }
                '#' => {
                    return self.raise_at(
                        scan.token.range,
                        "f-string expression part cannot include '#'",
                    );
                }
                '!' | ':' | '}' | '=' | '<' | '>' if parens.is_empty() => {
                    let next = scan.char_at(scan.pos + 1);
                    if next == Some('=') && matches!(c, '!' | '=' | '<' | '>') {
                        scan.pos += 2;
                        continue;
                    }
                    if c != '<' && c != '>' {
                        break;
                    }
                }
                ']' | ')' | '}' => {
                    let Some(opening) = parens.pop() else {
                        let message = format!("f-string: unmatched '{c}'");
                        return self.raise_at(scan.token.range, &message);
                    };
                    let expected = match opening {
                        '(' => ')',
                        '[' => ']',
                        _ => '}',
                    };
                    if c != expected {
                        let message = format!(
                            "f-string: closing parenthesis '{c}' does not match opening parenthesis '{opening}'"
                        );
                        return self.raise_at(scan.token.range, &message);
                    }
                }
                _ => {}
            }
            scan.pos += 1;
        }
        if quote.is_some() {
            return self.raise_at(scan.token.range, "f-string: unterminated string");
        }
        if let Some(opening) = parens.last() {
            let message = format!("f-string: unmatched '{opening}'");
            return self.raise_at(scan.token.range, &message);
        }
        Some(scan.pos)
    }

    fn fstring_triple(&self, scan: &FStringScan, quote: char) -> bool {
        scan.char_at(scan.pos + 1) == Some(quote) && scan.char_at(scan.pos + 2) == Some(quote)
    }

    /// Parse `scan[start..end]` as a parenthesized expression with a parser
    /// of its own.
    fn fstring_expression(&mut self, scan: &FStringScan, start: usize, end: usize) -> Option<NodeId> {
        let (line, column) = scan.at[start];
        let mut text = String::with_capacity(end - start + 2);
        text.push('(');
        text.extend(&scan.chars[start..end]);
        text.push(')');
        trace!(line, column, text = %text, "f-string field");

        let source = SourceBuffer::new(&text);
        let arena = std::mem::take(&mut self.arena);
        let tokenizer = Tokenizer::new(&source, TokenizerFlags::empty(), self.tokenizer.errors_mut())
            .with_offset(line - 1, column - 1);
        let mut field = Parser::with_tokenizer(tokenizer, InputMode::FString, arena, text.len() / 3 + 4);
        let value = field.run().map(|root| field.unwrap_field(root));
        self.arena = field.arena;
        if value.is_none() {
            self.error_indicator = true;
        }
        value
    }

    /// Drop the parentheses added around a field's text from the range of
    /// the expression they enclose (a tuple or generator expression).
    fn unwrap_field(&mut self, root: NodeId) -> NodeId {
        let Some(open) = self.tokens.first().copied() else {
            return root;
        };
        let close = self.tokens.iter().rposition(|t| t.kind == TokenKind::RPar);
        let range = self.arena.range(root);
        if let Some(close) = close {
            if close > 1 && range.start() == open.range.start() {
                let inner = self.tokens[1].range.with_end(self.tokens[close - 1].range);
                self.arena.set_range(root, inner);
            }
        }
        root
    }
}
