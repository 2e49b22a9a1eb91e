//! Dispatcher integration tests
//!
//! Drives EthClient against the recording mock transport: response
//! interpretation, the destination guard, override merging, and per-call
//! transport selection.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use ethcall_sdk::abi::ParamType;
use ethcall_sdk::types::{BlockId, CallOverrides, CallParams, LogFilter};
use ethcall_sdk::{
    Address, CallError, EthClient, FunctionSelector, MockTransport, StateMutability, Token,
    Transport, TransportOpts,
};
use serde_json::Value;

fn balance_params(to: Address) -> CallParams {
    CallParams {
        to: Some(to),
        data: Some(Bytes::from(vec![0x70, 0xa0, 0x82, 0x31])),
        selector: Some(FunctionSelector::new(
            "balanceOf",
            vec![ParamType::Address],
            vec![ParamType::Uint(256)],
            StateMutability::View,
        )),
        ..Default::default()
    }
}

fn uint_word_hex(value: u64) -> String {
    format!("0x{:064x}", value)
}

// ==================== call: response interpretation ====================

#[tokio::test]
async fn call_decodes_return_values() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_call", Value::String(uint_word_hex(100)));
    let client = EthClient::new(mock.clone());

    let tokens = client
        .call(&balance_params(Address::ZERO), &CallOverrides::default())
        .await
        .unwrap();
    assert_eq!(tokens, vec![Token::uint(100)]);
}

#[tokio::test]
async fn call_empty_sentinel_is_unknown_result() {
    // The mock's default eth_call response is the bare "0x" sentinel.
    let client = EthClient::new_mock();
    let result = client
        .call(&balance_params(Address::ZERO), &CallOverrides::default())
        .await;
    assert!(matches!(result, Err(CallError::UnknownResult)));
}

#[tokio::test]
async fn call_malformed_hex_is_invalid_hex() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_call", Value::String("0xnothex".to_string()));
    let client = EthClient::new(mock.clone());

    let result = client
        .call(&balance_params(Address::ZERO), &CallOverrides::default())
        .await;
    assert!(matches!(result, Err(CallError::InvalidHex(_))));
}

#[tokio::test]
async fn call_without_selector_cannot_decode() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_call", Value::String(uint_word_hex(1)));
    let client = EthClient::new(mock.clone());

    let params = CallParams {
        to: Some(Address::ZERO),
        data: Some(Bytes::from(vec![0x01])),
        ..Default::default()
    };
    let result = client.call(&params, &CallOverrides::default()).await;
    assert!(matches!(result, Err(CallError::MissingSelector)));
}

// ==================== destination guard ====================

#[tokio::test]
async fn call_without_destination_never_reaches_transport() {
    let mock = Arc::new(MockTransport::new());
    let client = EthClient::new(mock.clone());

    let params = CallParams {
        data: Some(Bytes::from(vec![0x01])),
        ..Default::default()
    };
    let result = client.call(&params, &CallOverrides::default()).await;
    assert!(matches!(result, Err(CallError::NoDestinationAddress)));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn send_without_destination_never_reaches_transport() {
    let mock = Arc::new(MockTransport::new());
    let client = EthClient::new(mock.clone());

    let result = client
        .send(&CallParams::default(), &CallOverrides::default())
        .await;
    assert!(matches!(result, Err(CallError::NoDestinationAddress)));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn destination_supplied_via_override_passes_the_guard() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_call", Value::String(uint_word_hex(5)));
    let client = EthClient::new(mock.clone());

    let mut params = balance_params(Address::ZERO);
    params.to = None;
    let overrides = CallOverrides {
        to: Some(Address::ZERO),
        ..Default::default()
    };
    let tokens = client.call(&params, &overrides).await.unwrap();
    assert_eq!(tokens, vec![Token::uint(5)]);
}

// ==================== block and payload plumbing ====================

#[tokio::test]
async fn call_defaults_to_latest_block() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_call", Value::String(uint_word_hex(0)));
    let client = EthClient::new(mock.clone());

    client
        .call(&balance_params(Address::ZERO), &CallOverrides::default())
        .await
        .unwrap();

    let calls = mock.recorded_calls();
    assert_eq!(calls[0].method, "eth_call");
    assert_eq!(calls[0].params[1], Value::String("latest".to_string()));
}

#[tokio::test]
async fn block_override_appears_verbatim() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_call", Value::String(uint_word_hex(0)));
    let client = EthClient::new(mock.clone());

    let overrides = CallOverrides {
        block: Some(BlockId::Pending),
        ..Default::default()
    };
    client
        .call(&balance_params(Address::ZERO), &overrides)
        .await
        .unwrap();

    let calls = mock.recorded_calls();
    assert_eq!(calls[0].params[1], Value::String("pending".to_string()));
}

#[tokio::test]
async fn outbound_payload_has_wire_keys_only() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_call", Value::String(uint_word_hex(0)));
    let client = EthClient::new(mock.clone());

    let dest = Address::from_hex("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap();
    client
        .call(&balance_params(dest), &CallOverrides::default())
        .await
        .unwrap();

    let calls = mock.recorded_calls();
    let payload = calls[0].params[0].as_object().unwrap();
    assert_eq!(
        payload["to"],
        Value::String("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d".to_string())
    );
    assert_eq!(payload["data"], Value::String("0x70a08231".to_string()));
    // The resolved selector is internal and must be stripped.
    assert!(!payload.contains_key("selector"));
}

// ==================== send ====================

#[tokio::test]
async fn send_returns_raw_transaction_hash() {
    let mock = Arc::new(MockTransport::new());
    let client = EthClient::new(mock.clone());

    let hash = client
        .send(&balance_params(Address::ZERO), &CallOverrides::default())
        .await
        .unwrap();
    assert_eq!(
        hash,
        "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"
    );
    assert_eq!(mock.recorded_calls()[0].method, "eth_sendTransaction");
    // eth_sendTransaction takes a single positional parameter.
    assert_eq!(mock.recorded_calls()[0].params.len(), 1);
}

#[tokio::test]
async fn send_empty_sentinel_is_unknown_result() {
    let mock = Arc::new(MockTransport::new());
    mock.set_response("eth_sendTransaction", Value::String("0x".to_string()));
    let client = EthClient::new(mock.clone());

    let result = client
        .send(&balance_params(Address::ZERO), &CallOverrides::default())
        .await;
    assert!(matches!(result, Err(CallError::UnknownResult)));
}

// ==================== transport selection and error propagation ====================

struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn request_json(
        &self,
        _method: &str,
        _params: Vec<Value>,
        _opts: &TransportOpts,
    ) -> Result<Value, CallError> {
        Err(CallError::Rpc {
            code: -32000,
            message: "execution reverted".to_string(),
        })
    }
}

#[tokio::test]
async fn transport_error_propagates_unchanged() {
    let client = EthClient::with_transport(FailingTransport);
    let result = client
        .call(&balance_params(Address::ZERO), &CallOverrides::default())
        .await;
    match result.unwrap_err() {
        CallError::Rpc { code, message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "execution reverted");
        }
        other => panic!("expected Rpc error, got {:?}", other),
    }
}

#[tokio::test]
async fn per_call_transport_override_wins() {
    let default_mock = Arc::new(MockTransport::new());
    let override_mock = Arc::new(MockTransport::new());
    override_mock.set_response("eth_call", Value::String(uint_word_hex(42)));
    let client = EthClient::new(default_mock.clone());

    let overrides = CallOverrides {
        transport: Some(override_mock.clone()),
        ..Default::default()
    };
    let tokens = client
        .call(&balance_params(Address::ZERO), &overrides)
        .await
        .unwrap();

    assert_eq!(tokens, vec![Token::uint(42)]);
    assert_eq!(default_mock.call_count(), 0);
    assert_eq!(override_mock.call_count(), 1);
}

// ==================== pass-through verbs ====================

#[tokio::test]
async fn estimate_gas_passes_merged_params() {
    let mock = Arc::new(MockTransport::new());
    let client = EthClient::new(mock.clone());

    let overrides = CallOverrides {
        gas_price: Some(2_000_000_000),
        ..Default::default()
    };
    let gas = client
        .estimate_gas(&balance_params(Address::ZERO), &overrides)
        .await
        .unwrap();
    assert_eq!(gas, 21000);

    let payload = mock.recorded_calls()[0].params[0].as_object().unwrap().clone();
    assert_eq!(payload["gasPrice"], Value::String("0x77359400".to_string()));
}

#[tokio::test]
async fn get_logs_passes_filter() {
    let mock = Arc::new(MockTransport::new());
    let client = EthClient::new(mock.clone());

    let filter = LogFilter {
        from_block: Some(BlockId::Number(1)),
        address: Some(Address::ZERO),
        ..Default::default()
    };
    let logs = client.get_logs(&filter, &CallOverrides::default()).await.unwrap();
    assert!(logs.is_empty());

    let payload = mock.recorded_calls()[0].params[0].as_object().unwrap().clone();
    assert_eq!(payload["fromBlock"], Value::String("0x1".to_string()));
}

#[tokio::test]
async fn gas_price_parses_hex_quantity() {
    let client = EthClient::new_mock();
    let price = client.gas_price(&CallOverrides::default()).await.unwrap();
    assert_eq!(price, 1_000_000_000);
}
