//! Contract binding: named functions over the resolve/encode/dispatch pipeline

use bytes::Bytes;
use ethcall_primitives::Address;

use crate::abi::{encode_call, ParamType, Token};
use crate::client::EthClient;
use crate::selector::{resolve, CallArg, FunctionSelector, StateMutability};
use crate::types::{CallOverrides, CallParams};
use crate::CallError;

/// A contract interface bound to a deployed address.
///
/// Several selectors may share a function name ("overloads"); declaration
/// order is preserved but never consulted for dispatch — an ambiguous match
/// is an error, not a first-wins pick.
#[derive(Debug, Clone)]
pub struct Contract {
    address: Address,
    functions: Vec<FunctionSelector>,
}

impl Contract {
    /// Create an empty binding for the given address
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: Vec::new(),
        }
    }

    /// Get the contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Add a function selector
    pub fn add_function(&mut self, selector: FunctionSelector) {
        self.functions.push(selector);
    }

    /// All selectors sharing `name`, in declaration order
    pub fn candidates(&self, name: &str) -> Vec<&FunctionSelector> {
        self.functions.iter().filter(|f| f.name == name).collect()
    }

    /// Resolve `name` + `args` to a selector and its encoded call data
    pub fn encode_input(
        &self,
        name: &str,
        args: &[CallArg],
    ) -> Result<(FunctionSelector, Bytes), CallError> {
        let candidates: Vec<FunctionSelector> =
            self.candidates(name).into_iter().cloned().collect();
        if candidates.is_empty() {
            return Err(CallError::UnknownFunction(name.to_string()));
        }
        let (selector, tokens) = resolve(&candidates, args)?;
        let data = encode_call(selector.selector(), &selector.inputs, &tokens)?;
        Ok((selector.clone(), Bytes::from(data)))
    }

    /// Build ready-to-dispatch params: destination, call data, and the
    /// resolved selector for response decoding
    pub fn call_params(&self, name: &str, args: &[CallArg]) -> Result<CallParams, CallError> {
        let (selector, data) = self.encode_input(name, args)?;
        Ok(CallParams {
            to: Some(self.address),
            data: Some(data),
            selector: Some(selector),
            ..Default::default()
        })
    }

    /// Resolve, encode, and execute a read-only call
    pub async fn call(
        &self,
        client: &EthClient,
        name: &str,
        args: &[CallArg],
        overrides: &CallOverrides,
    ) -> Result<Vec<Token>, CallError> {
        let params = self.call_params(name, args)?;
        client.call(&params, overrides).await
    }

    /// Resolve, encode, and submit a state-changing transaction
    pub async fn send(
        &self,
        client: &EthClient,
        name: &str,
        args: &[CallArg],
        overrides: &CallOverrides,
    ) -> Result<String, CallError> {
        let params = self.call_params(name, args)?;
        client.send(&params, overrides).await
    }
}

/// Builder for contract bindings
pub struct ContractBuilder {
    address: Address,
    functions: Vec<FunctionSelector>,
}

impl ContractBuilder {
    /// Create a new contract builder
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: Vec::new(),
        }
    }

    /// Add a function; call repeatedly with the same name to declare overloads
    pub fn function(
        mut self,
        name: &str,
        inputs: Vec<ParamType>,
        outputs: Vec<ParamType>,
        mutability: StateMutability,
    ) -> Self {
        self.functions
            .push(FunctionSelector::new(name, inputs, outputs, mutability));
        self
    }

    /// Build the contract
    pub fn build(self) -> Contract {
        Contract {
            address: self.address,
            functions: self.functions,
        }
    }
}

/// Create an ERC20 contract binding
pub fn erc20(address: Address) -> Contract {
    ContractBuilder::new(address)
        .function("name", vec![], vec![ParamType::String], StateMutability::View)
        .function("symbol", vec![], vec![ParamType::String], StateMutability::View)
        .function(
            "decimals",
            vec![],
            vec![ParamType::Uint(8)],
            StateMutability::View,
        )
        .function(
            "totalSupply",
            vec![],
            vec![ParamType::Uint(256)],
            StateMutability::View,
        )
        .function(
            "balanceOf",
            vec![ParamType::Address],
            vec![ParamType::Uint(256)],
            StateMutability::View,
        )
        .function(
            "transfer",
            vec![ParamType::Address, ParamType::Uint(256)],
            vec![ParamType::Bool],
            StateMutability::NonPayable,
        )
        .function(
            "approve",
            vec![ParamType::Address, ParamType::Uint(256)],
            vec![ParamType::Bool],
            StateMutability::NonPayable,
        )
        .function(
            "allowance",
            vec![ParamType::Address, ParamType::Address],
            vec![ParamType::Uint(256)],
            StateMutability::View,
        )
        .function(
            "transferFrom",
            vec![ParamType::Address, ParamType::Address, ParamType::Uint(256)],
            vec![ParamType::Bool],
            StateMutability::NonPayable,
        )
        .build()
}
