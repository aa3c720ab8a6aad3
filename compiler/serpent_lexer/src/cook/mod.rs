//! Literal cooking: the value behind a `STRING` or `NUMBER` token.
//!
//! The tokenizer only checks the shape of a literal. Cooking strips prefixes,
//! quotes and `_` separators and resolves escape sequences. Escapes that
//! mean nothing are kept verbatim (the tokenizer has already warned about
//! them).

use serpent_diagnostic::ErrorKind;
use serpent_ir::ConstantValue;
use thiserror::Error;

/// Value of a string literal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Cooked {
    Str(String),
    Bytes(Vec<u8>),
}

impl Cooked {
    /// Append the value of an adjacent literal of the same kind.
    ///
    /// A value of the other kind is dropped; callers reject mixed runs.
    pub fn append(&mut self, other: Cooked) {
        match (self, other) {
            (Cooked::Str(value), Cooked::Str(more)) => value.push_str(&more),
            (Cooked::Bytes(value), Cooked::Bytes(more)) => value.extend(more),
            _ => {}
        }
    }
}

impl From<Cooked> for ConstantValue {
    fn from(cooked: Cooked) -> Self {
        match cooked {
            Cooked::Str(value) => ConstantValue::Str(value),
            Cooked::Bytes(value) => ConstantValue::Bytes(value),
        }
    }
}

/// Escape decoding failure. Positions count characters of the literal body.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CookError {
    #[error(
        "(unicode error) 'unicodeescape' codec can't decode bytes in position {start}-{end}: truncated \\{shape} escape"
    )]
    Truncated {
        start: usize,
        end: usize,
        /// `xXX`, `uXXXX` or `UXXXXXXXX`.
        shape: &'static str,
    },
    #[error(
        "(unicode error) 'unicodeescape' codec can't decode bytes in position {start}-{end}: illegal Unicode character"
    )]
    IllegalCharacter { start: usize, end: usize },
    #[error(
        "(unicode error) 'unicodeescape' codec can't decode bytes in position {start}-{end}: malformed \\N character escape"
    )]
    MalformedName { start: usize, end: usize },
    #[error(
        "(unicode error) 'unicodeescape' codec can't decode bytes in position {start}-{end}: unknown Unicode character name"
    )]
    UnknownName { start: usize, end: usize },
    #[error("(value error) invalid \\x escape at position {position}")]
    InvalidBytesEscape { position: usize },
    #[error("bytes can only contain ASCII literal characters")]
    NonAsciiBytes,
}

impl CookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CookError::NonAsciiBytes => ErrorKind::Syntax,
            CookError::Truncated { .. }
            | CookError::IllegalCharacter { .. }
            | CookError::MalformedName { .. }
            | CookError::UnknownName { .. }
            | CookError::InvalidBytesEscape { .. } => ErrorKind::Encoding,
        }
    }
}

/// Prefix flags and quote shape of a string token.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StringShape {
    pub raw: bool,
    pub bytes: bool,
    pub format: bool,
    /// Number of prefix characters.
    pub prefix_len: usize,
    /// 1 or 3.
    pub quote_len: usize,
}

impl StringShape {
    /// Read the prefix and quotes of a string token's text.
    pub fn of(text: &str) -> StringShape {
        let mut shape = StringShape::default();
        for c in text.chars() {
            match c {
                'r' | 'R' => shape.raw = true,
                'b' | 'B' => shape.bytes = true,
                'f' | 'F' => shape.format = true,
                'u' | 'U' => {}
                _ => break,
            }
            shape.prefix_len += 1;
        }
        let rest = &text[shape.prefix_len..];
        shape.quote_len = if rest.starts_with("'''") || rest.starts_with("\"\"\"") {
            3
        } else {
            1
        };
        shape
    }

    /// The text between the quotes.
    pub fn body<'t>(&self, text: &'t str) -> &'t str {
        let start = (self.prefix_len + self.quote_len).min(text.len());
        let end = text.len().saturating_sub(self.quote_len).max(start);
        &text[start..end]
    }
}

/// Cook the full text of a (non-format) string token.
pub fn cook_string(text: &str) -> Result<Cooked, CookError> {
    let shape = StringShape::of(text);
    let body = shape.body(text);
    if shape.bytes {
        return cook_bytes(body, shape.raw).map(Cooked::Bytes);
    }
    cook_str(body, shape.raw).map(Cooked::Str)
}

/// Decode the escapes of a `str` body.
pub fn cook_str(body: &str, raw: bool) -> Result<String, CookError> {
    if raw || !body.contains('\\') {
        return Ok(body.to_owned());
    }
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }
        let Some(&escape) = chars.get(i + 1) else {
            out.push('\\');
            break;
        };
        let start = i;
        i += 2;
        match escape {
            '\n' => {}
            'x' | 'u' | 'U' => {
                let (width, shape) = match escape {
                    'x' => (2, "xXX"),
                    'u' => (4, "uXXXX"),
                    _ => (8, "UXXXXXXXX"),
                };
                let (value, taken) = hex_digits(&chars[i..], width);
                if taken < width {
                    return Err(CookError::Truncated {
                        start,
                        end: i + taken - 1,
                        shape,
                    });
                }
                i += width;
                match char::from_u32(value) {
                    Some(ch) => out.push(ch),
                    None if value > 0x0010_FFFF => {
                        return Err(CookError::IllegalCharacter { start, end: i - 1 });
                    }
                    // Lone surrogates have no `char`.
                    None => out.push(char::REPLACEMENT_CHARACTER),
                }
            }
            'N' => {
                let (ch, used) = named_escape(&chars[i..], start)?;
                out.push(ch);
                i += used;
            }
            '0'..='7' => {
                let (value, taken) = octal_digits(&chars[i - 1..]);
                i += taken - 1;
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => match simple_escape(other) {
                Some(ch) => out.push(ch),
                None => {
                    out.push('\\');
                    out.push(other);
                }
            },
        }
    }
    Ok(out)
}

/// Decode the escapes of a `bytes` body.
pub fn cook_bytes(body: &str, raw: bool) -> Result<Vec<u8>, CookError> {
    if !body.is_ascii() {
        return Err(CookError::NonAsciiBytes);
    }
    let bytes = body.as_bytes();
    if raw || !bytes.contains(&b'\\') {
        return Ok(bytes.to_vec());
    }
    let chars: Vec<char> = body.chars().collect();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            push_ascii(&mut out, c);
            i += 1;
            continue;
        }
        let Some(&escape) = chars.get(i + 1) else {
            out.push(b'\\');
            break;
        };
        let start = i;
        i += 2;
        match escape {
            '\n' => {}
            'x' => {
                let (value, taken) = hex_digits(&chars[i..], 2);
                if taken < 2 {
                    return Err(CookError::InvalidBytesEscape { position: start });
                }
                i += 2;
                out.push(u8::try_from(value).unwrap_or(u8::MAX));
            }
            '0'..='7' => {
                let (value, taken) = octal_digits(&chars[i - 1..]);
                i += taken - 1;
                out.push(u8::try_from(value & 0xFF).unwrap_or(u8::MAX));
            }
            other => match simple_escape(other) {
                Some(ch) => push_ascii(&mut out, ch),
                None => {
                    out.push(b'\\');
                    push_ascii(&mut out, other);
                }
            },
        }
    }
    Ok(out)
}

fn push_ascii(out: &mut Vec<u8>, c: char) {
    if let Ok(b) = u8::try_from(c) {
        out.push(b);
    }
}

fn simple_escape(c: char) -> Option<char> {
    let ch = match c {
        '\\' => '\\',
        '\'' => '\'',
        '"' => '"',
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        _ => return None,
    };
    Some(ch)
}

/// Up to `width` hex digits: the value and how many were present.
fn hex_digits(chars: &[char], width: usize) -> (u32, usize) {
    let mut value = 0u32;
    let mut taken = 0;
    for &c in chars.iter().take(width) {
        let Some(d) = c.to_digit(16) else { break };
        value = value.wrapping_mul(16).wrapping_add(d);
        taken += 1;
    }
    (value, taken)
}

/// One to three octal digits.
fn octal_digits(chars: &[char]) -> (u32, usize) {
    let mut value = 0u32;
    let mut taken = 0;
    for &c in chars.iter().take(3) {
        let Some(d) = c.to_digit(8) else { break };
        value = value * 8 + d;
        taken += 1;
    }
    (value, taken)
}

/// `{NAME}` after `\N`: the character and the number of characters used.
///
/// `start` is the position of the backslash, for error reporting.
fn named_escape(chars: &[char], start: usize) -> Result<(char, usize), CookError> {
    let malformed = CookError::MalformedName {
        start,
        end: start + 1,
    };
    if chars.first() != Some(&'{') {
        return Err(malformed);
    }
    let close = chars.iter().position(|&c| c == '}').ok_or(malformed)?;
    let name: String = chars[1..close].iter().collect::<String>().to_ascii_uppercase();
    control_character(&name)
        .or_else(|| unicode_names2::character(&name))
        .map(|ch| (ch, close + 1))
        .ok_or(CookError::UnknownName {
            start,
            end: start + 2 + close,
        })
}

/// Names and abbreviations of control characters, whose formal Unicode
/// name is `<control>`.
fn control_character(name: &str) -> Option<char> {
    let ch = match name {
        "NULL" | "NUL" => '\0',
        "START OF HEADING" | "SOH" => '\x01',
        "START OF TEXT" | "STX" => '\x02',
        "END OF TEXT" | "ETX" => '\x03',
        "END OF TRANSMISSION" | "EOT" => '\x04',
        "ENQUIRY" | "ENQ" => '\x05',
        "ACKNOWLEDGE" | "ACK" => '\x06',
        "BELL" | "BEL" | "ALERT" => '\x07',
        "BACKSPACE" | "BS" => '\x08',
        "CHARACTER TABULATION" | "HORIZONTAL TABULATION" | "TAB" | "HT" => '\t',
        "LINE FEED" | "NEW LINE" | "END OF LINE" | "LF" | "NL" | "EOL" => '\n',
        "LINE TABULATION" | "VERTICAL TABULATION" | "VT" => '\x0b',
        "FORM FEED" | "FF" => '\x0c',
        "CARRIAGE RETURN" | "CR" => '\r',
        "SHIFT OUT" | "SO" => '\x0e',
        "SHIFT IN" | "SI" => '\x0f',
        "DATA LINK ESCAPE" | "DLE" => '\x10',
        "DEVICE CONTROL ONE" | "DC1" => '\x11',
        "DEVICE CONTROL TWO" | "DC2" => '\x12',
        "DEVICE CONTROL THREE" | "DC3" => '\x13',
        "DEVICE CONTROL FOUR" | "DC4" => '\x14',
        "NEGATIVE ACKNOWLEDGE" | "NAK" => '\x15',
        "SYNCHRONOUS IDLE" | "SYN" => '\x16',
        "END OF TRANSMISSION BLOCK" | "ETB" => '\x17',
        "CANCEL" | "CAN" => '\x18',
        "END OF MEDIUM" | "EM" => '\x19',
        "SUBSTITUTE" | "SUB" => '\x1a',
        "ESCAPE" | "ESC" => '\x1b',
        "INFORMATION SEPARATOR FOUR" | "FS" => '\x1c',
        "INFORMATION SEPARATOR THREE" | "GS" => '\x1d',
        "INFORMATION SEPARATOR TWO" | "RS" => '\x1e',
        "INFORMATION SEPARATOR ONE" | "US" => '\x1f',
        "SPACE" | "SP" => ' ',
        "DELETE" | "DEL" => '\x7f',
        "NO-BREAK SPACE" | "NBSP" => '\u{a0}',
        "BYTE ORDER MARK" | "BOM" => '\u{feff}',
        _ => return None,
    };
    Some(ch)
}

/// Value of a `NUMBER` token; `None` if `text` is not a numeric literal.
pub fn cook_number(text: &str) -> Option<ConstantValue> {
    let clean: String = text.chars().filter(|&c| c != '_').collect();
    let lower = clean.to_ascii_lowercase();

    if let Some(imag) = lower.strip_suffix('j') {
        return imag.parse::<f64>().ok().map(ConstantValue::Complex);
    }

    let radix = match lower.get(..2) {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => 10,
    };
    if radix != 10 {
        return int_value(&lower[2..], radix);
    }
    if lower.contains(['.', 'e']) {
        return lower.parse::<f64>().ok().map(ConstantValue::Float);
    }
    int_value(&lower, 10)
}

fn int_value(digits: &str, radix: u32) -> Option<ConstantValue> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    if let Ok(value) = i64::from_str_radix(digits, radix) {
        return Some(ConstantValue::Int(value));
    }
    let trimmed = digits.trim_start_matches('0');
    Some(ConstantValue::BigInt {
        digits: trimmed.to_owned(),
        radix,
    })
}
