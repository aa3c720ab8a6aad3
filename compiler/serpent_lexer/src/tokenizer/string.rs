//! String literals.

use serpent_ir::{Token, TokenKind};

use super::Tokenizer;
use crate::LexError;

/// Prefix letters seen before the opening quote.
#[derive(Copy, Clone, Default, Debug)]
pub(super) struct Prefix {
    pub bytes: bool,
    pub raw: bool,
    pub unicode: bool,
    pub format: bool,
}

impl Tokenizer<'_> {
    /// Scan a string whose opening `quote` has just been read.
    pub(super) fn string(&mut self, quote: char, prefix: Prefix) -> Token {
        self.first_line = self.cursor.line();
        self.multi_line_start = self.cursor.line_start();

        let mut quote_size = 1;
        let mut end_quote_size = 0;
        let mut c = self.bump();
        if c == Some(quote) {
            c = self.bump();
            if c == Some(quote) {
                quote_size = 3;
            } else {
                // Empty string.
                end_quote_size = 1;
            }
        }
        if c != Some(quote) {
            self.back(c);
        }

        while end_quote_size != quote_size {
            match self.bump() {
                None => return self.unterminated(quote_size),
                Some('\n') if quote_size == 1 => return self.unterminated(quote_size),
                Some(ch) if ch == quote => end_quote_size += 1,
                Some(ch) => {
                    end_quote_size = 0;
                    if ch == '\\' {
                        self.bump();
                    }
                }
            }
        }

        if !prefix.raw {
            self.check_escapes(prefix, quote_size);
        }
        self.make(TokenKind::String)
    }

    /// Report from the opening quote, naming the line where the scan gave up.
    fn unterminated(&mut self, quote_size: usize) -> Token {
        let detected = self.cursor.line();
        self.cursor
            .rewind(self.token_start + 1, self.first_line, self.multi_line_start);
        let error = if quote_size == 3 {
            LexError::UnterminatedTripleQuoted { line: detected }
        } else {
            LexError::UnterminatedString { line: detected }
        };
        self.syntax_error(error)
    }

    /// Warn about the first escape sequence in the body that means nothing.
    fn check_escapes(&mut self, prefix: Prefix, quote_size: usize) {
        let text = self.cursor.slice(self.token_start, self.cursor.pos());
        let prefix_len = text
            .iter()
            .position(|&c| c == '"' || c == '\'')
            .unwrap_or(0);
        let body_start = prefix_len + quote_size;
        let body_end = text.len().saturating_sub(quote_size).max(body_start);
        let body = &text[body_start..body_end];

        let mut i = 0;
        while i < body.len() {
            if body[i] != '\\' {
                i += 1;
                continue;
            }
            let Some(&escape) = body.get(i + 1) else {
                break;
            };
            match escape {
                '\n' | '\r' | '\\' | '\'' | '"' | 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | 'x' => {}
                'N' | 'u' | 'U' if !prefix.bytes => {}
                '0'..='7' => {
                    let digits: String = body[i + 1..]
                        .iter()
                        .take(3)
                        .take_while(|c| matches!(c, '0'..='7'))
                        .collect();
                    if u32::from_str_radix(&digits, 8).is_ok_and(|value| value > 0o377) {
                        self.warn_string(LexError::InvalidOctalEscape { digits });
                        return;
                    }
                }
                _ => {
                    self.warn_string(LexError::InvalidEscape { escape });
                    return;
                }
            }
            i += 2;
        }
    }
}
