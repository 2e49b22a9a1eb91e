//! Call dispatcher: executes resolved calls through a transport
//!
//! [`EthClient`] owns the process-default transport (an explicit object,
//! never a global lookup) and merges caller overrides into each invocation.
//! `call` and `send` carry the response-interpretation state machine; the
//! remaining verbs are pass-throughs with error propagation only.

use std::sync::Arc;

use ethcall_primitives::H256;
use serde_json::Value;
use tracing::debug;

use crate::abi::{self, Token};
use crate::transport::{deserialize_response, MockTransport, Transport, TransportOpts};
use crate::types::{CallOverrides, CallParams, LogFilter};
use crate::CallError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Client dispatching contract calls over a JSON-RPC transport
pub struct EthClient {
    transport: Arc<dyn Transport>,
    opts: TransportOpts,
}

impl EthClient {
    /// Create a client around the given default transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            opts: TransportOpts::default(),
        }
    }

    /// Create a client around an owned transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self::new(Arc::new(transport))
    }

    /// Create a client with a mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a client with an HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> Self {
        Self::with_transport(HttpTransport::new(url))
    }

    /// Set the default transport options
    pub fn with_default_opts(mut self, opts: TransportOpts) -> Self {
        self.opts = opts;
        self
    }

    fn transport_for<'a>(&'a self, overrides: &'a CallOverrides) -> &'a Arc<dyn Transport> {
        overrides.transport.as_ref().unwrap_or(&self.transport)
    }

    fn opts_for(&self, overrides: &CallOverrides) -> TransportOpts {
        overrides
            .transport_opts
            .clone()
            .unwrap_or_else(|| self.opts.clone())
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        overrides: &CallOverrides,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, CallError> {
        let result = self
            .transport_for(overrides)
            .request_json(method, params, &self.opts_for(overrides))
            .await?;
        deserialize_response(result)
    }

    // ==================== Call & Send ====================

    /// Execute a read-only call and decode its return values.
    ///
    /// The raw `"0x"` sentinel is never decoded: it means "reverted or
    /// returned nothing" and surfaces as [`CallError::UnknownResult`],
    /// distinct from both a transport failure and a genuine empty tuple.
    pub async fn call(
        &self,
        params: &CallParams,
        overrides: &CallOverrides,
    ) -> Result<Vec<Token>, CallError> {
        let merged = params.merged(overrides);
        let to = merged.to.ok_or(CallError::NoDestinationAddress)?;
        let block = overrides.block.unwrap_or_default();
        debug!(to = %to, ?block, "dispatching eth_call");

        let raw: String = self
            .request(
                overrides,
                "eth_call",
                vec![serde_json::to_value(&merged)?, serde_json::to_value(block)?],
            )
            .await?;
        let data = decode_hex_payload(&raw)?;

        let selector = merged.selector.as_ref().ok_or(CallError::MissingSelector)?;
        let tokens = abi::decode(&selector.outputs, &data)?;
        Ok(selector
            .outputs
            .iter()
            .zip(tokens)
            .map(|(ty, token)| abi::normalize(ty, token))
            .collect())
    }

    /// Submit a state-changing transaction; returns the raw transaction
    /// hash string. No decoding beyond the `"0x"` sentinel check; `block`
    /// overrides do not apply.
    pub async fn send(
        &self,
        params: &CallParams,
        overrides: &CallOverrides,
    ) -> Result<String, CallError> {
        let merged = params.merged(overrides);
        let to = merged.to.ok_or(CallError::NoDestinationAddress)?;
        debug!(to = %to, "dispatching eth_sendTransaction");

        let raw: String = self
            .request(
                overrides,
                "eth_sendTransaction",
                vec![serde_json::to_value(&merged)?],
            )
            .await?;
        if raw == "0x" {
            return Err(CallError::UnknownResult);
        }
        Ok(raw)
    }

    // ==================== Pass-through verbs ====================

    /// Estimate gas for a call; transport errors propagate unchanged
    pub async fn estimate_gas(
        &self,
        params: &CallParams,
        overrides: &CallOverrides,
    ) -> Result<u64, CallError> {
        let merged = params.merged(overrides);
        let raw: String = self
            .request(
                overrides,
                "eth_estimateGas",
                vec![serde_json::to_value(&merged)?],
            )
            .await?;
        parse_hex_u64(&raw)
    }

    /// Fetch logs matching a filter
    pub async fn get_logs(
        &self,
        filter: &LogFilter,
        overrides: &CallOverrides,
    ) -> Result<Vec<Value>, CallError> {
        self.request(overrides, "eth_getLogs", vec![serde_json::to_value(filter)?])
            .await
    }

    /// Fetch the current gas price
    pub async fn gas_price(&self, overrides: &CallOverrides) -> Result<u128, CallError> {
        let raw: String = self.request(overrides, "eth_gasPrice", vec![]).await?;
        parse_hex_u128(&raw)
    }

    /// Fetch a transaction receipt; `None` when the node knows no such hash
    pub async fn get_transaction_receipt(
        &self,
        hash: &H256,
        overrides: &CallOverrides,
    ) -> Result<Option<Value>, CallError> {
        self.request(
            overrides,
            "eth_getTransactionReceipt",
            vec![Value::String(hash.to_hex())],
        )
        .await
    }
}

// ==================== Helper Functions ====================

/// Reject the no-payload sentinel, then hex-decode the raw result.
fn decode_hex_payload(raw: &str) -> Result<Vec<u8>, CallError> {
    if raw == "0x" {
        return Err(CallError::UnknownResult);
    }
    let s = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(s).map_err(|e| CallError::InvalidHex(e.to_string()))
}

fn parse_hex_u64(s: &str) -> Result<u64, CallError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| CallError::InvalidHex(e.to_string()))
}

fn parse_hex_u128(s: &str) -> Result<u128, CallError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u128::from_str_radix(s, 16).map_err(|e| CallError::InvalidHex(e.to_string()))
}
