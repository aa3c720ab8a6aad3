//! Numeric literals.
//!
//! `_` may separate digits, never lead, trail or double up. A literal that
//! runs straight into an identifier character is an error, except for the
//! keywords that can legitimately follow an expression (`1if x else 2`),
//! which only draw a warning.

use serpent_ir::{Token, TokenKind};
use serpent_lexer_core::is_potential_identifier_char;

use super::Tokenizer;
use crate::LexError;

const DECIMAL: &str = "decimal";

fn is_digit(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_digit())
}

impl Tokenizer<'_> {
    /// Scan a number whose first digit `first` has been read.
    pub(super) fn number(&mut self, first: char) -> Token {
        if first == '0' {
            let c = self.bump();
            return match c {
                Some('x' | 'X') => self.radix_number(16, "hexadecimal"),
                Some('o' | 'O') => self.radix_number(8, "octal"),
                Some('b' | 'B') => self.radix_number(2, "binary"),
                _ => self.leading_zero(c),
            };
        }
        let Ok(c) = self.decimal_tail() else {
            return self.syntax_error(LexError::InvalidLiteral { kind: DECIMAL });
        };
        self.decimal_suffix(c)
    }

    fn radix_number(&mut self, radix: u32, kind: &'static str) -> Token {
        let in_radix = |c: Option<char>| c.is_some_and(|c| c.is_digit(radix));
        let mut c = self.bump();
        loop {
            if c == Some('_') {
                c = self.bump();
            }
            if !in_radix(c) {
                self.back(c);
                return match c {
                    Some(digit) if radix != 16 && digit.is_ascii_digit() => {
                        self.syntax_error(LexError::InvalidDigit { digit, kind })
                    }
                    _ => self.syntax_error(LexError::InvalidLiteral { kind }),
                };
            }
            loop {
                c = self.bump();
                if !in_radix(c) {
                    break;
                }
            }
            if c != Some('_') {
                break;
            }
        }
        if radix != 16 {
            if let Some(digit) = c.filter(char::is_ascii_digit) {
                return self.syntax_error(LexError::InvalidDigit { digit, kind });
            }
        }
        self.finish_number(c, kind)
    }

    /// `0`, `00`, `0_0`, `0.5`, `0e1`, `0j`: anything starting with zero
    /// that is not a radix literal. `c` is the character after the `0`.
    fn leading_zero(&mut self, mut c: Option<char>) -> Token {
        loop {
            if c == Some('_') {
                c = self.bump();
                if !is_digit(c) {
                    self.back(c);
                    return self.syntax_error(LexError::InvalidLiteral { kind: DECIMAL });
                }
            }
            if c != Some('0') {
                break;
            }
            c = self.bump();
        }
        let zeros_end = self.cursor.pos();
        let mut nonzero = false;
        if is_digit(c) {
            nonzero = true;
            match self.decimal_tail() {
                Ok(next) => c = next,
                Err(()) => {
                    return self.syntax_error(LexError::InvalidLiteral { kind: DECIMAL });
                }
            }
        }
        match c {
            Some('.') => {
                let c = self.bump();
                self.fraction(c)
            }
            Some('e' | 'E') => self.exponent(c),
            Some('j' | 'J') => self.imaginary(),
            _ if nonzero => {
                self.back(c);
                self.cursor.seek(zeros_end);
                self.syntax_error(LexError::LeadingZeros)
            }
            _ => self.finish_number(c, DECIMAL),
        }
    }

    /// Read the rest of a run of decimal digits, `_` allowed between digits.
    /// Returns the first character after the run.
    fn decimal_tail(&mut self) -> Result<Option<char>, ()> {
        loop {
            let mut c;
            loop {
                c = self.bump();
                if !is_digit(c) {
                    break;
                }
            }
            if c != Some('_') {
                return Ok(c);
            }
            c = self.bump();
            if !is_digit(c) {
                self.back(c);
                return Err(());
            }
        }
    }

    fn decimal_suffix(&mut self, c: Option<char>) -> Token {
        match c {
            Some('.') => {
                let c = self.bump();
                self.fraction(c)
            }
            Some('e' | 'E') => self.exponent(c),
            Some('j' | 'J') => self.imaginary(),
            _ => self.finish_number(c, DECIMAL),
        }
    }

    /// After the `.` of a float; `c` is the character following it.
    pub(super) fn fraction(&mut self, mut c: Option<char>) -> Token {
        if is_digit(c) {
            match self.decimal_tail() {
                Ok(next) => c = next,
                Err(()) => {
                    return self.syntax_error(LexError::InvalidLiteral { kind: DECIMAL });
                }
            }
        }
        match c {
            Some('e' | 'E') => self.exponent(c),
            Some('j' | 'J') => self.imaginary(),
            _ => self.finish_number(c, DECIMAL),
        }
    }

    /// After an `e`/`E` (`e`); a sign must be followed by a digit, and an
    /// `e` followed by neither ends the number before it.
    fn exponent(&mut self, e: Option<char>) -> Token {
        let mut c = self.bump();
        if matches!(c, Some('+' | '-')) {
            c = self.bump();
            if !is_digit(c) {
                self.back(c);
                return self.syntax_error(LexError::InvalidLiteral { kind: DECIMAL });
            }
        } else if !is_digit(c) {
            self.back(c);
            if let Some(error) = self.verify_end_of_number(e, DECIMAL) {
                return error;
            }
            self.back(e);
            return self.make(TokenKind::Number);
        }
        let c = match self.decimal_tail() {
            Ok(c) => c,
            Err(()) => return self.syntax_error(LexError::InvalidLiteral { kind: DECIMAL }),
        };
        if matches!(c, Some('j' | 'J')) {
            return self.imaginary();
        }
        self.finish_number(c, DECIMAL)
    }

    fn imaginary(&mut self) -> Token {
        let c = self.bump();
        self.finish_number(c, "imaginary")
    }

    fn finish_number(&mut self, c: Option<char>, kind: &'static str) -> Token {
        if let Some(error) = self.verify_end_of_number(c, kind) {
            return error;
        }
        self.back(c);
        self.make(TokenKind::Number)
    }

    /// Check what follows a literal; `c` has been read.
    fn verify_end_of_number(&mut self, c: Option<char>, kind: &'static str) -> Option<Token> {
        let keyword_follows = match c {
            Some('a') => self.cursor.lookahead(&['n', 'd']),
            Some('e') => self.cursor.lookahead(&['l', 's', 'e']),
            Some('f') => self.cursor.lookahead(&['o', 'r']),
            Some('i') => {
                let c2 = self.bump();
                let r = matches!(c2, Some('f' | 'n' | 's'));
                self.back(c2);
                r
            }
            Some('o') => self.cursor.lookahead(&['r']),
            Some('n') => self.cursor.lookahead(&['o', 't']),
            _ => false,
        };
        if keyword_follows {
            self.back(c);
            self.warn(LexError::InvalidLiteral { kind });
            self.bump();
        } else if let Some(ch) = c {
            if ch.is_ascii() && is_potential_identifier_char(ch) {
                self.back(c);
                return Some(self.syntax_error(LexError::InvalidLiteral { kind }));
            }
        }
        None
    }
}
