//! Call parameter and override types

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use ethcall_primitives::{Address, H256, U256};
use serde::ser::SerializeMap;
use serde::Serialize;

use crate::selector::FunctionSelector;
use crate::transport::{Transport, TransportOpts};

/// Block identifier for RPC queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
    /// Safe block
    Safe,
    /// Finalized block
    Finalized,
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockId::Number(n) => serializer.serialize_str(&format!("0x{:x}", n)),
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Pending => serializer.serialize_str("pending"),
            BlockId::Earliest => serializer.serialize_str("earliest"),
            BlockId::Safe => serializer.serialize_str("safe"),
            BlockId::Finalized => serializer.serialize_str("finalized"),
        }
    }
}

/// Parameters of a contract call or transaction.
///
/// Serialization emits only the set transport-visible keys as hex-quantity
/// strings; the resolved `selector` is internal and never reaches the wire.
#[derive(Debug, Clone, Default)]
pub struct CallParams {
    /// Sender address
    pub from: Option<Address>,
    /// Destination address
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price (legacy)
    pub gas_price: Option<u128>,
    /// Max fee per gas (EIP-1559)
    pub max_fee_per_gas: Option<u128>,
    /// Max priority fee per gas (EIP-1559)
    pub max_priority_fee_per_gas: Option<u128>,
    /// Value to transfer
    pub value: Option<U256>,
    /// Sender nonce
    pub nonce: Option<u64>,
    /// Encoded call data
    pub data: Option<Bytes>,
    /// Selector the call was resolved against. Internal only; stripped from
    /// the outbound RPC payload by the Serialize impl.
    pub selector: Option<FunctionSelector>,
}

impl CallParams {
    /// Merge caller overrides on top of these params; overrides win on
    /// collision. The resolved selector is not overridable.
    pub fn merged(&self, overrides: &CallOverrides) -> CallParams {
        CallParams {
            from: overrides.from.or(self.from),
            to: overrides.to.or(self.to),
            gas: overrides.gas.or(self.gas),
            gas_price: overrides.gas_price.or(self.gas_price),
            max_fee_per_gas: overrides.max_fee_per_gas.or(self.max_fee_per_gas),
            max_priority_fee_per_gas: overrides
                .max_priority_fee_per_gas
                .or(self.max_priority_fee_per_gas),
            value: overrides.value.or(self.value),
            nonce: overrides.nonce.or(self.nonce),
            data: overrides.data.clone().or_else(|| self.data.clone()),
            selector: self.selector.clone(),
        }
    }
}

impl Serialize for CallParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(from) = &self.from {
            map.serialize_entry("from", &from.to_hex())?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &to.to_hex())?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &format!("0x{:x}", gas))?;
        }
        if let Some(gas_price) = &self.gas_price {
            map.serialize_entry("gasPrice", &format!("0x{:x}", gas_price))?;
        }
        if let Some(max_fee) = &self.max_fee_per_gas {
            map.serialize_entry("maxFeePerGas", &format!("0x{:x}", max_fee))?;
        }
        if let Some(max_priority) = &self.max_priority_fee_per_gas {
            map.serialize_entry("maxPriorityFeePerGas", &format!("0x{:x}", max_priority))?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", &format!("0x{:x}", value))?;
        }
        if let Some(nonce) = &self.nonce {
            map.serialize_entry("nonce", &format!("0x{:x}", nonce))?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &format!("0x{}", hex::encode(data)))?;
        }
        // self.selector deliberately omitted.
        map.end()
    }
}

/// Caller-supplied per-invocation overrides.
///
/// Field overrides take precedence over the base [`CallParams`] on merge.
/// `block` applies to read calls only; `transport`/`transport_opts` replace
/// the client's defaults for this invocation.
#[derive(Clone, Default)]
pub struct CallOverrides {
    /// Sender address override
    pub from: Option<Address>,
    /// Destination address override
    pub to: Option<Address>,
    /// Gas limit override
    pub gas: Option<u64>,
    /// Gas price override
    pub gas_price: Option<u128>,
    /// Max fee per gas override
    pub max_fee_per_gas: Option<u128>,
    /// Max priority fee per gas override
    pub max_priority_fee_per_gas: Option<u128>,
    /// Value override
    pub value: Option<U256>,
    /// Nonce override
    pub nonce: Option<u64>,
    /// Call data override
    pub data: Option<Bytes>,
    /// Chain state to query (read calls only; default latest)
    pub block: Option<BlockId>,
    /// Transport to use instead of the client default
    pub transport: Option<Arc<dyn Transport>>,
    /// Transport options to use instead of the client default
    pub transport_opts: Option<TransportOpts>,
}

impl fmt::Debug for CallOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOverrides")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("gas", &self.gas)
            .field("gas_price", &self.gas_price)
            .field("max_fee_per_gas", &self.max_fee_per_gas)
            .field("max_priority_fee_per_gas", &self.max_priority_fee_per_gas)
            .field("value", &self.value)
            .field("nonce", &self.nonce)
            .field("data", &self.data)
            .field("block", &self.block)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .field("transport_opts", &self.transport_opts)
            .finish()
    }
}

/// Filter for eth_getLogs queries
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Start of the block range
    pub from_block: Option<BlockId>,
    /// End of the block range
    pub to_block: Option<BlockId>,
    /// Contract address
    pub address: Option<Address>,
    /// Topic filters
    pub topics: Option<Vec<H256>>,
}

impl Serialize for LogFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(from_block) = &self.from_block {
            map.serialize_entry("fromBlock", from_block)?;
        }
        if let Some(to_block) = &self.to_block {
            map.serialize_entry("toBlock", to_block)?;
        }
        if let Some(address) = &self.address {
            map.serialize_entry("address", &address.to_hex())?;
        }
        if let Some(topics) = &self.topics {
            let rendered: Vec<String> = topics.iter().map(|t| t.to_hex()).collect();
            map.serialize_entry("topics", &rendered)?;
        }
        map.end()
    }
}
