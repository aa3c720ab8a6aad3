//! Bytes to codepoints: byte order mark and `coding:` cookie detection.
//!
//! The cookie is looked for in the first two lines, byte by byte, before
//! anything is decoded. It has the shape
//! `^[ \t\f]*#.*?coding[:=][ \t]*([-_.a-zA-Z0-9]+)`. The second line is only
//! examined when the first one is blank or a comment.

use thiserror::Error;

use crate::SourceBuffer;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encodings the preprocessor can decode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1: every byte is the codepoint of the same value.
    Latin1,
    Ascii,
}

impl Encoding {
    /// Normalised codec name.
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "iso-8859-1",
            Encoding::Ascii => "ascii",
        }
    }

    /// Resolve a cookie name.
    pub fn from_cookie(name: &str) -> Option<Encoding> {
        let name = name.to_ascii_lowercase().replace('_', "-");
        let is = |base: &str| name == base || name.starts_with(&format!("{base}-"));
        if is("utf-8") || name == "utf8" {
            Some(Encoding::Utf8)
        } else if is("latin-1") || is("iso-8859-1") || is("iso-latin-1") || name == "latin1" {
            Some(Encoding::Latin1)
        } else if name == "ascii" || name == "us-ascii" {
            Some(Encoding::Ascii)
        } else {
            None
        }
    }
}

/// What to do when the declared encoding cannot be used.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Fallback {
    /// Report the problem.
    #[default]
    Strict,
    /// Decode as Latin-1 instead, so that every byte still becomes exactly
    /// one codepoint and later positions stay meaningful.
    Latin1,
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum EncodingError {
    #[error("unknown encoding: {name}")]
    Unknown { name: String },
    #[error("'{codec}' codec can't decode byte 0x{byte:02x} in position {position}")]
    Malformed {
        codec: &'static str,
        byte: u8,
        position: usize,
    },
}

/// Output of [`decode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedSource {
    pub buffer: SourceBuffer,
    /// Encoding the bytes were actually decoded with.
    pub encoding: Encoding,
}

/// Decode raw source bytes.
pub fn decode(bytes: &[u8], fallback: Fallback) -> Result<DecodedSource, EncodingError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let declared = match detect_encoding(body) {
        Ok(encoding) => encoding,
        Err(_) if fallback == Fallback::Latin1 => Encoding::Latin1,
        Err(err) => return Err(err),
    };
    match decode_with(body, declared) {
        Ok(chars) => Ok(DecodedSource {
            buffer: SourceBuffer::from_chars(chars),
            encoding: declared,
        }),
        Err(_) if fallback == Fallback::Latin1 => Ok(DecodedSource {
            buffer: SourceBuffer::from_chars(latin1(body)),
            encoding: Encoding::Latin1,
        }),
        Err(err) => Err(err),
    }
}

/// Encoding declared by the first two lines; UTF-8 without a cookie.
fn detect_encoding(bytes: &[u8]) -> Result<Encoding, EncodingError> {
    let first_end = memchr::memchr(b'\n', bytes).map_or(bytes.len(), |i| i + 1);
    let (first, rest) = bytes.split_at(first_end);
    let name = match check_line(first) {
        Cookie::Found(name) => Some(name),
        Cookie::Stop => None,
        Cookie::Continue => match check_line(rest) {
            Cookie::Found(name) => Some(name),
            Cookie::Stop | Cookie::Continue => None,
        },
    };
    match name {
        None => Ok(Encoding::Utf8),
        Some(name) => Encoding::from_cookie(name).ok_or_else(|| EncodingError::Unknown {
            name: name.to_owned(),
        }),
    }
}

enum Cookie<'a> {
    Found(&'a str),
    /// Blank or comment-only line without a cookie: keep looking.
    Continue,
    /// Code line: no cookie may follow.
    Stop,
}

fn check_line(bytes: &[u8]) -> Cookie<'_> {
    let line_end = memchr::memchr2(b'\n', b'\r', bytes).unwrap_or(bytes.len());
    let line = &bytes[..line_end];
    let indent = line
        .iter()
        .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\x0c'))
        .count();
    match line.get(indent) {
        None => Cookie::Continue,
        Some(b'#') => find_cookie(&line[indent + 1..]).map_or(Cookie::Continue, Cookie::Found),
        Some(_) => Cookie::Stop,
    }
}

fn find_cookie(comment: &[u8]) -> Option<&str> {
    let mut from = 0;
    while let Some(found) = memchr::memmem::find(&comment[from..], b"coding") {
        let mut i = from + found + b"coding".len();
        from = i;
        if !matches!(comment.get(i), Some(b':' | b'=')) {
            continue;
        }
        i += 1;
        while matches!(comment.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        let begin = i;
        while comment
            .get(i)
            .is_some_and(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        {
            i += 1;
        }
        if begin < i {
            return std::str::from_utf8(&comment[begin..i]).ok();
        }
    }
    None
}

fn decode_with(bytes: &[u8], encoding: Encoding) -> Result<Vec<char>, EncodingError> {
    match encoding {
        Encoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.chars().collect()),
            Err(err) => {
                let position = err.valid_up_to();
                Err(EncodingError::Malformed {
                    codec: encoding.name(),
                    byte: bytes[position],
                    position,
                })
            }
        },
        Encoding::Latin1 => Ok(latin1(bytes)),
        Encoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(position) => Err(EncodingError::Malformed {
                codec: encoding.name(),
                byte: bytes[position],
                position,
            }),
            None => Ok(latin1(bytes)),
        },
    }
}

fn latin1(bytes: &[u8]) -> Vec<char> {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests;
