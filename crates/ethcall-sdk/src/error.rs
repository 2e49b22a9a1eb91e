//! Call error taxonomy
//!
//! Every failure in the resolve/dispatch pipeline surfaces as a distinct
//! [`CallError`] variant; nothing is retried or downgraded internally.

use thiserror::Error;

use crate::selector::{CallArg, FunctionSelector};

/// Errors produced by overload resolution and call dispatch
#[derive(Debug, Error)]
pub enum CallError {
    /// No candidate signature fits the supplied arguments
    #[error(
        "no overload matches arguments {args:?}; candidates: [{}]",
        signatures(.candidates)
    )]
    NoMatchingSelector {
        /// The arguments the caller supplied
        args: Vec<CallArg>,
        /// Every candidate that was considered
        candidates: Vec<FunctionSelector>,
    },

    /// Two or more candidate signatures fit the supplied arguments
    #[error(
        "{} overloads match arguments {args:?}: [{}]; tag arguments with explicit types to disambiguate",
        .matches.len(),
        signatures(.matches)
    )]
    AmbiguousSelector {
        /// The arguments the caller supplied
        args: Vec<CallArg>,
        /// The candidates that all matched
        matches: Vec<FunctionSelector>,
    },

    /// Function name not present in the contract interface
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Merged call parameters lack a destination address
    #[error("no destination address in call parameters")]
    NoDestinationAddress,

    /// Transport/network error
    #[error("transport error: {0}")]
    Transport(String),

    /// RPC error reported by the node
    #[error("rpc error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Transport succeeded but returned the no-payload sentinel ("0x")
    #[error("call returned no decodable payload (0x): reverted or void return")]
    UnknownResult,

    /// Raw result failed to parse as hex
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Call parameters carry no resolved selector to decode against
    #[error("call parameters carry no resolved selector")]
    MissingSelector,

    /// ABI encoding error
    #[error("abi encoding error: {0}")]
    AbiEncode(String),

    /// ABI decoding error
    #[error("abi decoding error: {0}")]
    AbiDecode(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

fn signatures(selectors: &[FunctionSelector]) -> String {
    selectors
        .iter()
        .map(|s| s.signature())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<hex::FromHexError> for CallError {
    fn from(e: hex::FromHexError) -> Self {
        CallError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for CallError {
    fn from(e: serde_json::Error) -> Self {
        CallError::Serialization(e.to_string())
    }
}
