//! # ethcall-sdk
//!
//! Client library for invoking smart-contract functions on an
//! Ethereum-compatible chain.
//!
//! ## Features
//!
//! - **Selector resolution**: matches a runtime argument list against a
//!   function's overloaded signatures, with explicit type tags as the
//!   disambiguation escape hatch
//! - **EthClient**: dispatches resolved calls over a pluggable JSON-RPC
//!   transport and classifies every failure
//! - **Contract**: binding of named functions to a deployed address
//! - **ABI**: Solidity ABI encoding and decoding
//!
//! ## Contract interaction
//!
//! ```rust,no_run
//! use ethcall_sdk::{contract, Address, EthClient, Token};
//! use ethcall_sdk::types::CallOverrides;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EthClient::new_mock();
//!
//!     let token = Address::from_hex("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")?;
//!     let erc20 = contract::erc20(token);
//!
//!     let owner = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d")?;
//!     let balance = erc20
//!         .call(
//!             &client,
//!             "balanceOf",
//!             &[Token::Address(owner).into()],
//!             &CallOverrides::default(),
//!         )
//!         .await?;
//!     println!("balance: {:?}", balance[0]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Overloads
//!
//! When two signatures share a name and both fit the supplied values, the
//! resolver refuses to guess. Wrap the ambiguous argument in
//! [`CallArg::Typed`] to force an exact-type match:
//!
//! ```rust
//! use ethcall_sdk::abi::ParamType;
//! use ethcall_sdk::{CallArg, Token};
//!
//! let arg = CallArg::Typed(ParamType::Uint(8), Token::uint(42));
//! # let _ = arg;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod client;
pub mod contract;
mod error;
mod selector;
mod transport;
pub mod types;

// Re-export main types
pub use abi::Token;
pub use client::EthClient;
pub use error::CallError;
pub use selector::{resolve, CallArg, FunctionSelector, StateMutability};
pub use transport::{MockTransport, RecordedCall, TransportOpts};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use ethcall_primitives::{Address, H256, U256};
