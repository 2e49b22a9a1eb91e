//! ABI type descriptors and runtime values

use std::fmt;

use ethcall_primitives::{Address, H256, U256};

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple (struct)
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(|t| t.is_dynamic()),
            _ => false,
        }
    }

    /// Structural compatibility of a plain value with this type.
    ///
    /// Range checked: a `Uint(bits)` only accepts values that fit in `bits`,
    /// a `FixedBytes(n)` only accepts literals of at most `n` bytes (shorter
    /// literals are right-padded by the encoder). Composite types recurse.
    /// Exact-width equality is deliberately NOT required here; explicit type
    /// tags on [`crate::CallArg::Typed`] exist for that.
    pub fn matches(&self, token: &Token) -> bool {
        match (self, token) {
            (ParamType::Address, Token::Address(_)) => true,
            (ParamType::Bool, Token::Bool(_)) => true,
            (ParamType::String, Token::String(_)) => true,
            (ParamType::Bytes, Token::Bytes(_)) => true,
            (ParamType::Uint(bits), Token::Uint(value)) => value.bits() <= *bits,
            (ParamType::Int(bits), Token::Int(value)) => int_fits(value, *bits),
            (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
                !data.is_empty() && data.len() <= *size
            }
            (ParamType::Array(inner), Token::Array(items)) => {
                items.iter().all(|t| inner.matches(t))
            }
            (ParamType::FixedArray(inner, size), Token::FixedArray(items)) => {
                items.len() == *size && items.iter().all(|t| inner.matches(t))
            }
            (ParamType::Tuple(fields), Token::Tuple(items)) => {
                fields.len() == items.len()
                    && fields.iter().zip(items).all(|(f, t)| f.matches(t))
            }
            _ => false,
        }
    }
}

/// Signed `bits`-wide range check on sign-magnitude representation.
fn int_fits(value: &I256, bits: usize) -> bool {
    if bits == 0 || bits > 256 {
        return false;
    }
    // Negative bound is 2^(bits-1), positive bound 2^(bits-1) - 1.
    let bound = if bits == 256 {
        U256::one() << 255
    } else {
        U256::one() << (bits - 1)
    };
    if value.negative {
        value.abs <= bound
    } else {
        value.abs < bound
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            ParamType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Solidity ABI runtime values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer
    Uint(U256),
    /// Signed integer
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes literal (1-32 bytes)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

impl Token {
    /// Create a uint token from a u128
    pub fn uint(value: u128) -> Self {
        Token::Uint(U256::from(value))
    }

    /// Create an int token from an i128
    pub fn int(value: i128) -> Self {
        Token::Int(I256::from_i128(value))
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a bytes32 token from a hash
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }
}

/// Signed 256-bit integer in sign-magnitude form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// Sign (true if negative)
    pub negative: bool,
}

impl I256 {
    /// Create a new I256
    pub fn new(abs: U256, negative: bool) -> Self {
        Self { abs, negative }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        if value < 0 {
            Self {
                abs: U256::from(value.unsigned_abs()),
                negative: true,
            }
        } else {
            Self {
                abs: U256::from(value as u128),
                negative: false,
            }
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }
}

/// Canonicalize a decoded token against its declared type.
///
/// Masks an unsigned integer to its declared width and truncates fixed-bytes
/// literals to their declared length; composites recurse. Values already in
/// range come back unchanged.
pub fn normalize(ty: &ParamType, token: Token) -> Token {
    match (ty, token) {
        (ParamType::Uint(bits), Token::Uint(value)) if *bits < 256 => {
            let mask = (U256::one() << *bits) - U256::one();
            Token::Uint(value & mask)
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(mut data)) => {
            data.truncate(*size);
            Token::FixedBytes(data)
        }
        (ParamType::Array(inner), Token::Array(items)) => {
            Token::Array(items.into_iter().map(|t| normalize(inner, t)).collect())
        }
        (ParamType::FixedArray(inner, _), Token::FixedArray(items)) => {
            Token::FixedArray(items.into_iter().map(|t| normalize(inner, t)).collect())
        }
        (ParamType::Tuple(fields), Token::Tuple(items)) if fields.len() == items.len() => {
            Token::Tuple(
                fields
                    .iter()
                    .zip(items)
                    .map(|(f, t)| normalize(f, t))
                    .collect(),
            )
        }
        (_, token) => token,
    }
}
