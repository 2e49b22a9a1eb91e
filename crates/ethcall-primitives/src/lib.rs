//! # ethcall-primitives
//!
//! Primitive chain types shared across the ethcall workspace: the 20-byte
//! account [`Address`], the 32-byte [`H256`] hash, and a re-export of the
//! 256-bit unsigned integer used for chain quantities.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{H256, HashError};

// Re-export primitive-types for U256
pub use primitive_types::U256;
