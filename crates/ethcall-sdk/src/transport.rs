//! Transport layer for RPC communication

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::CallError;

/// Per-call transport options, passed through to the implementation
#[derive(Debug, Clone, Default)]
pub struct TransportOpts {
    /// Request timeout; semantics are the transport's own
    pub timeout: Option<Duration>,
}

/// Transport trait for RPC communication (object-safe).
///
/// Any conforming implementation is substitutable; the dispatcher resolves
/// which one to use per call (override first, client default second).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get the JSON result
    async fn request_json(
        &self,
        method: &str,
        params: Vec<Value>,
        opts: &TransportOpts,
    ) -> Result<Value, CallError>;
}

/// Helper to deserialize a JSON result
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, CallError> {
    serde_json::from_value(value).map_err(|e| CallError::Serialization(e.to_string()))
}

/// One invocation observed by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// RPC method name
    pub method: String,
    /// Positional parameters as sent
    pub params: Vec<Value>,
}

/// Mock transport for testing.
///
/// Serves canned per-method responses (falling back to defaults) and records
/// every invocation so tests can assert what reached the wire, or that
/// nothing did.
pub struct MockTransport {
    responses: Mutex<HashMap<String, Value>>,
    defaults: HashMap<String, Value>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert("eth_gasPrice".to_string(), Value::String("0x3b9aca00".to_string())); // 1 gwei
        defaults.insert("eth_estimateGas".to_string(), Value::String("0x5208".to_string())); // 21000
        defaults.insert(
            "eth_sendTransaction".to_string(),
            Value::String(
                "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b".to_string(),
            ),
        );
        defaults.insert("eth_call".to_string(), Value::String("0x".to_string()));
        defaults.insert("eth_getLogs".to_string(), Value::Array(Vec::new()));
        defaults.insert("eth_getTransactionReceipt".to_string(), Value::Null);

        Self {
            responses: Mutex::new(HashMap::new()),
            defaults,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set a canned response for a specific method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (another test thread panicked while
    /// holding the lock).
    pub fn set_response(&self, method: &str, response: Value) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), response);
    }

    /// Clear canned responses
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn clear_responses(&self) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .clear();
    }

    /// Every call observed so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// Number of calls observed so far
    pub fn call_count(&self) -> usize {
        self.recorded_calls().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(
        &self,
        method: &str,
        params: Vec<Value>,
        _opts: &TransportOpts,
    ) -> Result<Value, CallError> {
        self.calls
            .lock()
            .map_err(|_| CallError::Transport("MockTransport mutex poisoned".to_string()))?
            .push(RecordedCall {
                method: method.to_string(),
                params,
            });

        let canned = self
            .responses
            .lock()
            .map_err(|_| CallError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(method)
            .cloned();
        if let Some(response) = canned {
            return Ok(response);
        }

        if let Some(response) = self.defaults.get(method) {
            return Ok(response.clone());
        }

        Err(CallError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// HTTP transport speaking JSON-RPC 2.0
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(
        &self,
        method: &str,
        params: Vec<Value>,
        opts: &TransportOpts,
    ) -> Result<Value, CallError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(CallError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or_else(|| CallError::Rpc {
            code: -32603,
            message: "No result in response".to_string(),
        })
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
