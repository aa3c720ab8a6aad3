//! Token kinds and the token record produced by the tokenizer.

use crate::SourceRange;
use std::fmt;

/// Token kind with stable numeric identifiers.
///
/// | Range | Category |
/// |-------|----------|
/// | 0-6   | Structural and literal tokens |
/// | 7-53  | Operators and punctuation |
/// | 54-62 | Special tokens |
/// | 63-95 | Reserved keywords |
///
/// The tokenizer never produces keyword kinds: keywords leave the tokenizer
/// as [`TokenKind::Name`] and the parser promotes them when it first reads
/// the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // === Structural and literal (0-6) ===
    EndMarker = 0,
    Name = 1,
    Number = 2,
    String = 3,
    Newline = 4,
    Indent = 5,
    Dedent = 6,

    // === Operators and punctuation (7-53) ===
    LPar = 7,
    RPar = 8,
    LSqb = 9,
    RSqb = 10,
    Colon = 11,
    Comma = 12,
    Semi = 13,
    Plus = 14,
    Minus = 15,
    Star = 16,
    Slash = 17,
    VBar = 18,
    Amper = 19,
    Less = 20,
    Greater = 21,
    Equal = 22,
    Dot = 23,
    Percent = 24,
    LBrace = 25,
    RBrace = 26,
    EqEqual = 27,
    NotEqual = 28,
    LessEqual = 29,
    GreaterEqual = 30,
    Tilde = 31,
    Circumflex = 32,
    LeftShift = 33,
    RightShift = 34,
    DoubleStar = 35,
    PlusEqual = 36,
    MinEqual = 37,
    StarEqual = 38,
    SlashEqual = 39,
    PercentEqual = 40,
    AmperEqual = 41,
    VBarEqual = 42,
    CircumflexEqual = 43,
    LeftShiftEqual = 44,
    RightShiftEqual = 45,
    DoubleStarEqual = 46,
    DoubleSlash = 47,
    DoubleSlashEqual = 48,
    At = 49,
    AtEqual = 50,
    RArrow = 51,
    Ellipsis = 52,
    ColonEqual = 53,

    // === Special (54-62) ===
    Op = 54,
    Await = 55,
    Async = 56,
    TypeIgnore = 57,
    TypeComment = 58,
    SoftKeyword = 59,
    ErrorToken = 60,
    Comment = 61,
    Nl = 62,

    // === Reserved keywords (63-95) ===
    KwFalse = 63,
    KwNone = 64,
    KwTrue = 65,
    KwAnd = 66,
    KwAs = 67,
    KwAssert = 68,
    KwBreak = 69,
    KwClass = 70,
    KwContinue = 71,
    KwDef = 72,
    KwDel = 73,
    KwElif = 74,
    KwElse = 75,
    KwExcept = 76,
    KwFinally = 77,
    KwFor = 78,
    KwFrom = 79,
    KwGlobal = 80,
    KwIf = 81,
    KwImport = 82,
    KwIn = 83,
    KwIs = 84,
    KwLambda = 85,
    KwNonlocal = 86,
    KwNot = 87,
    KwOr = 88,
    KwPass = 89,
    KwRaise = 90,
    KwReturn = 91,
    KwTry = 92,
    KwWhile = 93,
    KwWith = 94,
    KwYield = 95,
}

impl TokenKind {
    /// Number of kinds; one past the largest discriminant.
    pub const COUNT: usize = TokenKind::KwYield as usize + 1;

    /// Stable numeric identifier.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Name used in token renderings (`NAME`, `NEWLINE`, `LPAR`, ...).
    ///
    /// Keywords render as their source text.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EndMarker => "ENDMARKER",
            Self::Name => "NAME",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Newline => "NEWLINE",
            Self::Indent => "INDENT",
            Self::Dedent => "DEDENT",
            Self::LPar => "LPAR",
            Self::RPar => "RPAR",
            Self::LSqb => "LSQB",
            Self::RSqb => "RSQB",
            Self::Colon => "COLON",
            Self::Comma => "COMMA",
            Self::Semi => "SEMI",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::VBar => "VBAR",
            Self::Amper => "AMPER",
            Self::Less => "LESS",
            Self::Greater => "GREATER",
            Self::Equal => "EQUAL",
            Self::Dot => "DOT",
            Self::Percent => "PERCENT",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::EqEqual => "EQEQUAL",
            Self::NotEqual => "NOTEQUAL",
            Self::LessEqual => "LESSEQUAL",
            Self::GreaterEqual => "GREATEREQUAL",
            Self::Tilde => "TILDE",
            Self::Circumflex => "CIRCUMFLEX",
            Self::LeftShift => "LEFTSHIFT",
            Self::RightShift => "RIGHTSHIFT",
            Self::DoubleStar => "DOUBLESTAR",
            Self::PlusEqual => "PLUSEQUAL",
            Self::MinEqual => "MINEQUAL",
            Self::StarEqual => "STAREQUAL",
            Self::SlashEqual => "SLASHEQUAL",
            Self::PercentEqual => "PERCENTEQUAL",
            Self::AmperEqual => "AMPEREQUAL",
            Self::VBarEqual => "VBAREQUAL",
            Self::CircumflexEqual => "CIRCUMFLEXEQUAL",
            Self::LeftShiftEqual => "LEFTSHIFTEQUAL",
            Self::RightShiftEqual => "RIGHTSHIFTEQUAL",
            Self::DoubleStarEqual => "DOUBLESTAREQUAL",
            Self::DoubleSlash => "DOUBLESLASH",
            Self::DoubleSlashEqual => "DOUBLESLASHEQUAL",
            Self::At => "AT",
            Self::AtEqual => "ATEQUAL",
            Self::RArrow => "RARROW",
            Self::Ellipsis => "ELLIPSIS",
            Self::ColonEqual => "COLONEQUAL",
            Self::Op => "OP",
            Self::Await => "AWAIT",
            Self::Async => "ASYNC",
            Self::TypeIgnore => "TYPE_IGNORE",
            Self::TypeComment => "TYPE_COMMENT",
            Self::SoftKeyword => "SOFT_KEYWORD",
            Self::ErrorToken => "ERRORTOKEN",
            Self::Comment => "COMMENT",
            Self::Nl => "NL",
            Self::KwFalse => "False",
            Self::KwNone => "None",
            Self::KwTrue => "True",
            Self::KwAnd => "and",
            Self::KwAs => "as",
            Self::KwAssert => "assert",
            Self::KwBreak => "break",
            Self::KwClass => "class",
            Self::KwContinue => "continue",
            Self::KwDef => "def",
            Self::KwDel => "del",
            Self::KwElif => "elif",
            Self::KwElse => "else",
            Self::KwExcept => "except",
            Self::KwFinally => "finally",
            Self::KwFor => "for",
            Self::KwFrom => "from",
            Self::KwGlobal => "global",
            Self::KwIf => "if",
            Self::KwImport => "import",
            Self::KwIn => "in",
            Self::KwIs => "is",
            Self::KwLambda => "lambda",
            Self::KwNonlocal => "nonlocal",
            Self::KwNot => "not",
            Self::KwOr => "or",
            Self::KwPass => "pass",
            Self::KwRaise => "raise",
            Self::KwReturn => "return",
            Self::KwTry => "try",
            Self::KwWhile => "while",
            Self::KwWith => "with",
            Self::KwYield => "yield",
        }
    }

    /// Keyword kind for reserved word `text`.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "False" => Self::KwFalse,
            "None" => Self::KwNone,
            "True" => Self::KwTrue,
            "and" => Self::KwAnd,
            "as" => Self::KwAs,
            "assert" => Self::KwAssert,
            "break" => Self::KwBreak,
            "class" => Self::KwClass,
            "continue" => Self::KwContinue,
            "def" => Self::KwDef,
            "del" => Self::KwDel,
            "elif" => Self::KwElif,
            "else" => Self::KwElse,
            "except" => Self::KwExcept,
            "finally" => Self::KwFinally,
            "for" => Self::KwFor,
            "from" => Self::KwFrom,
            "global" => Self::KwGlobal,
            "if" => Self::KwIf,
            "import" => Self::KwImport,
            "in" => Self::KwIn,
            "is" => Self::KwIs,
            "lambda" => Self::KwLambda,
            "nonlocal" => Self::KwNonlocal,
            "not" => Self::KwNot,
            "or" => Self::KwOr,
            "pass" => Self::KwPass,
            "raise" => Self::KwRaise,
            "return" => Self::KwReturn,
            "try" => Self::KwTry,
            "while" => Self::KwWhile,
            "with" => Self::KwWith,
            "yield" => Self::KwYield,
            _ => return None,
        };
        Some(kind)
    }

    #[inline]
    pub const fn is_keyword(self) -> bool {
        self as u8 >= Self::KwFalse as u8
    }

    /// `NEWLINE`, `INDENT`, `DEDENT` and `ENDMARKER`: tokens that never
    /// contribute to a node's end position.
    #[inline]
    pub const fn is_whitespace(self) -> bool {
        matches!(
            self,
            Self::EndMarker | Self::Newline | Self::Indent | Self::Dedent
        )
    }

    /// Single character operator or punctuation; `Op` when unknown.
    pub const fn one_char(c: char) -> TokenKind {
        match c {
            '%' => Self::Percent,
            '&' => Self::Amper,
            '(' => Self::LPar,
            ')' => Self::RPar,
            '*' => Self::Star,
            '+' => Self::Plus,
            ',' => Self::Comma,
            '-' => Self::Minus,
            '.' => Self::Dot,
            '/' => Self::Slash,
            ':' => Self::Colon,
            ';' => Self::Semi,
            '<' => Self::Less,
            '=' => Self::Equal,
            '>' => Self::Greater,
            '@' => Self::At,
            '[' => Self::LSqb,
            ']' => Self::RSqb,
            '^' => Self::Circumflex,
            '{' => Self::LBrace,
            '|' => Self::VBar,
            '}' => Self::RBrace,
            '~' => Self::Tilde,
            _ => Self::Op,
        }
    }

    /// Two character operator; `Op` when unknown.
    pub const fn two_chars(c1: char, c2: char) -> TokenKind {
        match (c1, c2) {
            ('!', '=') | ('<', '>') => Self::NotEqual,
            ('%', '=') => Self::PercentEqual,
            ('&', '=') => Self::AmperEqual,
            ('*', '*') => Self::DoubleStar,
            ('*', '=') => Self::StarEqual,
            ('+', '=') => Self::PlusEqual,
            ('-', '=') => Self::MinEqual,
            ('-', '>') => Self::RArrow,
            ('/', '/') => Self::DoubleSlash,
            ('/', '=') => Self::SlashEqual,
            (':', '=') => Self::ColonEqual,
            ('<', '<') => Self::LeftShift,
            ('<', '=') => Self::LessEqual,
            ('=', '=') => Self::EqEqual,
            ('>', '=') => Self::GreaterEqual,
            ('>', '>') => Self::RightShift,
            ('@', '=') => Self::AtEqual,
            ('^', '=') => Self::CircumflexEqual,
            ('|', '=') => Self::VBarEqual,
            _ => Self::Op,
        }
    }

    /// Three character operator; `Op` when unknown.
    pub const fn three_chars(c1: char, c2: char, c3: char) -> TokenKind {
        match (c1, c2, c3) {
            ('*', '*', '=') => Self::DoubleStarEqual,
            ('.', '.', '.') => Self::Ellipsis,
            ('/', '/', '=') => Self::DoubleSlashEqual,
            ('<', '<', '=') => Self::LeftShiftEqual,
            ('>', '>', '=') => Self::RightShiftEqual,
            _ => Self::Op,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token: kind, source range and codepoint offsets into the tokenizer's
/// buffer. The text itself is never copied; ask the tokenizer for it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub range: SourceRange,
    /// Offset of the first codepoint.
    pub start: u32,
    /// Offset one past the last codepoint; may exceed the buffer length for
    /// the synthesized final `NEWLINE`.
    pub end: u32,
}

crate::static_assert_size!(Token, 28);

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, range: SourceRange, start: u32, end: u32) -> Self {
        Token {
            kind,
            range,
            start,
            end,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}] @ {:?}",
            self.kind, self.start, self.end, self.range
        )
    }
}
