//! Literal values.

use std::fmt;

/// Index into the arena's constant pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ConstId(u32);

impl ConstId {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        ConstId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Value of a `Constant` node or a `MatchSingleton` pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    None,
    Bool(bool),
    Ellipsis,
    Int(i64),
    /// Integer literal that does not fit in `i64`: digits without prefix or
    /// underscores, and their radix.
    BigInt {
        digits: String,
        radix: u32,
    },
    Float(f64),
    /// Imaginary literal; the value is the imaginary part.
    Complex(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl ConstantValue {
    /// Description used by "cannot assign to ..." diagnostics.
    pub const fn describe(&self) -> &'static str {
        match self {
            ConstantValue::None => "None",
            ConstantValue::Bool(true) => "True",
            ConstantValue::Bool(false) => "False",
            ConstantValue::Ellipsis => "ellipsis",
            _ => "literal",
        }
    }

    pub const fn is_str(&self) -> bool {
        matches!(self, ConstantValue::Str(_))
    }

    pub const fn is_bytes(&self) -> bool {
        matches!(self, ConstantValue::Bytes(_))
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::None => f.write_str("None"),
            ConstantValue::Bool(true) => f.write_str("True"),
            ConstantValue::Bool(false) => f.write_str("False"),
            ConstantValue::Ellipsis => f.write_str("..."),
            ConstantValue::Int(v) => write!(f, "{v}"),
            ConstantValue::BigInt { digits, radix } => match radix {
                16 => write!(f, "0x{digits}"),
                8 => write!(f, "0o{digits}"),
                2 => write!(f, "0b{digits}"),
                _ => f.write_str(digits),
            },
            ConstantValue::Float(v) => write!(f, "{v:?}"),
            ConstantValue::Complex(v) => write!(f, "{v:?}j"),
            ConstantValue::Str(s) => write!(f, "{s:?}"),
            ConstantValue::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
        }
    }
}
