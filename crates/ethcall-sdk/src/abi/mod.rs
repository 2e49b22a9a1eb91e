//! ABI codec: encoding of call data, decoding of return data, and the
//! structural type-compatibility predicate the selector resolver matches
//! plain argument values against.

mod decode;
mod encode;
mod types;

pub use decode::decode;
pub use encode::{encode, encode_call, selector};
pub use types::{normalize, I256, ParamType, Token};
