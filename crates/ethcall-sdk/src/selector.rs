//! Overload resolution over candidate function selectors
//!
//! A contract function name may map to several signatures differing in arity
//! or parameter types. [`resolve`] picks the unique candidate matching a
//! concrete argument list, or fails with a classified error. Plain values
//! match structurally (range checked, see [`ParamType::matches`]); values
//! wrapped in [`CallArg::Typed`] match only a candidate whose declared
//! parameter type is exactly equal to the tag.

use crate::abi::{self, ParamType, Token};
use crate::CallError;

/// State mutability of a contract function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutability {
    /// Reads nothing, writes nothing
    Pure,
    /// Reads state, writes nothing
    View,
    /// Writes state, rejects attached value
    NonPayable,
    /// Writes state, accepts attached value
    Payable,
}

/// Immutable descriptor of one contract function signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSelector {
    /// Function name
    pub name: String,
    /// Ordered parameter types
    pub inputs: Vec<ParamType>,
    /// Parameter names; may be empty when the interface omits them
    pub param_names: Vec<String>,
    /// Ordered return types
    pub outputs: Vec<ParamType>,
    /// State mutability
    pub mutability: StateMutability,
}

impl FunctionSelector {
    /// Create a new selector without parameter names
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<ParamType>,
        outputs: Vec<ParamType>,
        mutability: StateMutability,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            param_names: Vec::new(),
            outputs,
            mutability,
        }
    }

    /// Attach parameter names (must match the input count to be meaningful)
    pub fn with_param_names(mut self, names: Vec<String>) -> Self {
        self.param_names = names;
        self
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        let inputs = self
            .inputs
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({})", self.name, inputs)
    }

    /// 4-byte call-data selector derived from the canonical signature
    pub fn selector(&self) -> [u8; 4] {
        abi::selector(&self.signature())
    }
}

/// A single positional call argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// Plain value, matched structurally against the declared type
    Value(Token),
    /// Value with an explicit type tag, matched by exact type equality
    Typed(ParamType, Token),
}

impl CallArg {
    fn fits(&self, declared: &ParamType) -> bool {
        match self {
            CallArg::Typed(tag, _) => tag == declared,
            CallArg::Value(token) => declared.matches(token),
        }
    }

    /// Strip any type tag; the annotation only drives matching, not encoding
    pub fn into_token(self) -> Token {
        match self {
            CallArg::Value(token) => token,
            CallArg::Typed(_, token) => token,
        }
    }
}

impl From<Token> for CallArg {
    fn from(token: Token) -> Self {
        CallArg::Value(token)
    }
}

/// Pick the unique candidate matching `args`.
///
/// Returns the selector plus the arguments stripped back to plain tokens.
/// Zero matches fail with [`CallError::NoMatchingSelector`]; two or more
/// fail with [`CallError::AmbiguousSelector`] — the resolver never picks the
/// first match, which would make dispatch order-dependent as interfaces
/// grow overloads.
pub fn resolve<'a>(
    candidates: &'a [FunctionSelector],
    args: &[CallArg],
) -> Result<(&'a FunctionSelector, Vec<Token>), CallError> {
    let matching: Vec<&FunctionSelector> = candidates
        .iter()
        .filter(|candidate| {
            candidate.inputs.len() == args.len()
                && candidate
                    .inputs
                    .iter()
                    .zip(args)
                    .all(|(declared, arg)| arg.fits(declared))
        })
        .collect();

    match matching.as_slice() {
        [] => Err(CallError::NoMatchingSelector {
            args: args.to_vec(),
            candidates: candidates.to_vec(),
        }),
        [single] => Ok((
            single,
            args.iter().cloned().map(CallArg::into_token).collect(),
        )),
        several => Err(CallError::AmbiguousSelector {
            args: args.to_vec(),
            matches: several.iter().map(|s| (*s).clone()).collect(),
        }),
    }
}
