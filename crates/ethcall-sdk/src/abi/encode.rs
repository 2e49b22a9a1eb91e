//! Solidity ABI encoding (head/tail layout)

use ethcall_primitives::U256;
use sha3::{Digest, Keccak256};

use super::types::{I256, ParamType, Token};
use crate::CallError;

/// Compute a 4-byte function selector (first 4 bytes of keccak256(signature))
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Encode call data: 4-byte selector followed by the encoded arguments
pub fn encode_call(
    selector: [u8; 4],
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, CallError> {
    let mut out = selector.to_vec();
    out.extend(encode(types, tokens)?);
    Ok(out)
}

/// Encode a token sequence against its declared types
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, CallError> {
    if types.len() != tokens.len() {
        return Err(CallError::AbiEncode(format!(
            "expected {} values, got {}",
            types.len(),
            tokens.len()
        )));
    }

    let head_size: usize = types.iter().map(head_len).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (ty, token) in types.iter().zip(tokens) {
        if ty.is_dynamic() {
            head.extend(uint_word(&U256::from(head_size + tail.len())));
            encode_value(ty, token, &mut tail)?;
        } else {
            encode_value(ty, token, &mut head)?;
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Head size in bytes: 32 for everything except inlined static composites.
pub(super) fn head_len(ty: &ParamType) -> usize {
    match ty {
        ParamType::FixedArray(inner, size) if !ty.is_dynamic() => size * head_len(inner),
        ParamType::Tuple(fields) if !ty.is_dynamic() => fields.iter().map(head_len).sum(),
        _ => 32,
    }
}

fn encode_value(ty: &ParamType, token: &Token, out: &mut Vec<u8>) -> Result<(), CallError> {
    match (ty, token) {
        (ParamType::Address, Token::Address(addr)) => {
            out.extend([0u8; 12]);
            out.extend(addr.as_bytes());
        }
        (ParamType::Uint(_), Token::Uint(value)) => out.extend(uint_word(value)),
        (ParamType::Int(_), Token::Int(value)) => out.extend(int_word(value)),
        (ParamType::Bool, Token::Bool(value)) => {
            out.extend([0u8; 31]);
            out.push(u8::from(*value));
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() > *size || *size > 32 {
                return Err(CallError::AbiEncode(format!(
                    "bytes{} literal of {} bytes",
                    size,
                    data.len()
                )));
            }
            // Literal right-padded to the full word.
            out.extend(data);
            out.resize(out.len() + 32 - data.len(), 0);
        }
        (ParamType::Bytes, Token::Bytes(data)) => encode_tail_bytes(data, out),
        (ParamType::String, Token::String(s)) => encode_tail_bytes(s.as_bytes(), out),
        (ParamType::Array(inner), Token::Array(items)) => {
            out.extend(uint_word(&U256::from(items.len())));
            encode_elements(inner, items, out)?;
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(items)) => {
            if items.len() != *size {
                return Err(CallError::AbiEncode(format!(
                    "fixed array of {} elements, got {}",
                    size,
                    items.len()
                )));
            }
            encode_elements(inner, items, out)?;
        }
        (ParamType::Tuple(fields), Token::Tuple(items)) => {
            out.extend(encode(fields, items)?);
        }
        (ty, token) => {
            return Err(CallError::AbiEncode(format!(
                "value {:?} does not fit type {}",
                token, ty
            )));
        }
    }
    Ok(())
}

/// Encode equally typed array elements with their own head/tail layout.
fn encode_elements(inner: &ParamType, items: &[Token], out: &mut Vec<u8>) -> Result<(), CallError> {
    let types = vec![inner.clone(); items.len()];
    out.extend(encode(&types, items)?);
    Ok(())
}

fn encode_tail_bytes(data: &[u8], out: &mut Vec<u8>) {
    out.extend(uint_word(&U256::from(data.len())));
    out.extend(data);
    let rem = data.len() % 32;
    if rem != 0 {
        out.resize(out.len() + 32 - rem, 0);
    }
}

pub(super) fn uint_word(value: &U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn int_word(value: &I256) -> [u8; 32] {
    if value.negative && !value.abs.is_zero() {
        // Two's complement of the magnitude.
        let complement = (!value.abs).overflowing_add(U256::one()).0;
        uint_word(&complement)
    } else {
        uint_word(&value.abs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethcall_primitives::Address;

    #[test]
    fn test_transfer_selector() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_encode_static_pair() {
        let to = Address::from_hex("0x1234567890123456789012345678901234567890").unwrap();
        let encoded = encode(
            &[ParamType::Address, ParamType::Uint(256)],
            &[Token::Address(to), Token::uint(1000)],
        )
        .unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[12..32], to.as_bytes());
        assert_eq!(encoded[63], 0xe8);
        assert_eq!(encoded[62], 0x03);
    }

    #[test]
    fn test_encode_call_prefixes_selector() {
        let data = encode_call(
            [0xa9, 0x05, 0x9c, 0xbb],
            &[ParamType::Address, ParamType::Uint(256)],
            &[Token::Address(Address::ZERO), Token::uint(1)],
        )
        .unwrap();
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 68);
    }

    #[test]
    fn test_encode_dynamic_bytes_offset() {
        let encoded = encode(
            &[ParamType::Uint(256), ParamType::Bytes],
            &[Token::uint(7), Token::Bytes(vec![0xaa; 3])],
        )
        .unwrap();
        // head: value word + offset word (0x40), tail: length word + padded data
        assert_eq!(encoded.len(), 64 + 64);
        assert_eq!(encoded[63], 0x40);
        assert_eq!(encoded[95], 3);
        assert_eq!(&encoded[96..99], &[0xaa, 0xaa, 0xaa]);
        assert_eq!(encoded[99], 0);
    }

    #[test]
    fn test_encode_short_fixed_bytes_right_pads() {
        let encoded = encode(
            &[ParamType::FixedBytes(32)],
            &[Token::FixedBytes(vec![0xde, 0xad])],
        )
        .unwrap();
        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..2], &[0xde, 0xad]);
        assert!(encoded[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_negative_int() {
        let encoded = encode(&[ParamType::Int(256)], &[Token::int(-1)]).unwrap();
        assert!(encoded.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_encode_shape_mismatch() {
        let result = encode(&[ParamType::Bool], &[Token::uint(1)]);
        assert!(matches!(result, Err(CallError::AbiEncode(_))));
    }

    #[test]
    fn test_encode_arity_mismatch() {
        let result = encode(&[ParamType::Bool], &[]);
        assert!(matches!(result, Err(CallError::AbiEncode(_))));
    }
}
