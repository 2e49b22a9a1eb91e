//! Solidity ABI decoding of return data

use ethcall_primitives::{Address, U256};

use super::encode::head_len;
use super::types::{I256, ParamType, Token};
use crate::CallError;

/// Decode positional return values from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, CallError> {
    let decoder = Decoder { data };
    let mut offset = 0;
    let mut out = Vec::with_capacity(types.len());
    for ty in types {
        out.push(decoder.value(ty, offset)?);
        offset += head_len(ty);
    }
    Ok(out)
}

struct Decoder<'a> {
    data: &'a [u8],
}

impl Decoder<'_> {
    /// Decode the value whose head slot sits at `offset`; dynamic types
    /// follow the pointer in the head slot.
    fn value(&self, ty: &ParamType, offset: usize) -> Result<Token, CallError> {
        if ty.is_dynamic() {
            let at = self.pointer(offset)?;
            self.tail(ty, at)
        } else {
            self.static_value(ty, offset)
        }
    }

    fn static_value(&self, ty: &ParamType, offset: usize) -> Result<Token, CallError> {
        match ty {
            ParamType::Address => {
                let word = self.word(offset)?;
                let mut bytes = [0u8; 20];
                bytes.copy_from_slice(&word[12..32]);
                Ok(Token::Address(Address::from_bytes(bytes)))
            }
            ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(self.word(offset)?))),
            ParamType::Int(_) => {
                let word = self.word(offset)?;
                let negative = word[0] & 0x80 != 0;
                let value = U256::from_big_endian(word);
                let abs = if negative {
                    // Undo two's complement.
                    (!value).overflowing_add(U256::one()).0
                } else {
                    value
                };
                Ok(Token::Int(I256::new(abs, negative)))
            }
            ParamType::Bool => Ok(Token::Bool(self.word(offset)?[31] != 0)),
            ParamType::FixedBytes(size) => {
                if *size > 32 {
                    return Err(CallError::AbiDecode(format!("bytes{} exceeds a word", size)));
                }
                Ok(Token::FixedBytes(self.word(offset)?[..*size].to_vec()))
            }
            ParamType::FixedArray(inner, size) => {
                let mut items = Vec::with_capacity(*size);
                for i in 0..*size {
                    items.push(self.static_value(inner, offset + i * head_len(inner))?);
                }
                Ok(Token::FixedArray(items))
            }
            ParamType::Tuple(fields) => {
                let mut items = Vec::with_capacity(fields.len());
                let mut at = offset;
                for field in fields {
                    items.push(self.static_value(field, at)?);
                    at += head_len(field);
                }
                Ok(Token::Tuple(items))
            }
            ty => Err(CallError::AbiDecode(format!(
                "dynamic type {} in static position",
                ty
            ))),
        }
    }

    /// Decode a dynamic value whose encoding starts at absolute offset `at`.
    /// Element pointers inside are relative to the enclosing block start.
    fn tail(&self, ty: &ParamType, at: usize) -> Result<Token, CallError> {
        match ty {
            ParamType::Bytes => Ok(Token::Bytes(self.length_prefixed(at)?)),
            ParamType::String => {
                let raw = self.length_prefixed(at)?;
                let s = String::from_utf8(raw)
                    .map_err(|e| CallError::AbiDecode(format!("invalid utf-8 string: {}", e)))?;
                Ok(Token::String(s))
            }
            ParamType::Array(inner) => {
                let len = self.pointer(at)?;
                let base = at + 32;
                let mut items = Vec::with_capacity(len);
                for i in 0..len {
                    items.push(self.element(inner, base, i)?);
                }
                Ok(Token::Array(items))
            }
            ParamType::FixedArray(inner, size) => {
                let mut items = Vec::with_capacity(*size);
                for i in 0..*size {
                    items.push(self.element(inner, at, i)?);
                }
                Ok(Token::FixedArray(items))
            }
            ParamType::Tuple(fields) => {
                let mut items = Vec::with_capacity(fields.len());
                let mut head = 0;
                for field in fields {
                    if field.is_dynamic() {
                        let ptr = self.pointer(at + head)?;
                        items.push(self.tail(field, at + ptr)?);
                    } else {
                        items.push(self.static_value(field, at + head)?);
                    }
                    head += head_len(field);
                }
                Ok(Token::Tuple(items))
            }
            ty => self.static_value(ty, at),
        }
    }

    fn element(&self, inner: &ParamType, base: usize, index: usize) -> Result<Token, CallError> {
        if inner.is_dynamic() {
            let ptr = self.pointer(base + index * 32)?;
            self.tail(inner, base + ptr)
        } else {
            self.static_value(inner, base + index * head_len(inner))
        }
    }

    fn length_prefixed(&self, at: usize) -> Result<Vec<u8>, CallError> {
        let len = self.pointer(at)?;
        let start = at + 32;
        let end = start
            .checked_add(len)
            .ok_or_else(|| CallError::AbiDecode("length overflow".into()))?;
        if end > self.data.len() {
            return Err(CallError::AbiDecode(format!(
                "data too short: need {} bytes, have {}",
                end,
                self.data.len()
            )));
        }
        Ok(self.data[start..end].to_vec())
    }

    fn pointer(&self, offset: usize) -> Result<usize, CallError> {
        let value = U256::from_big_endian(self.word(offset)?);
        if value > U256::from(u32::MAX) {
            return Err(CallError::AbiDecode(format!("offset {} out of range", value)));
        }
        Ok(value.as_usize())
    }

    fn word(&self, offset: usize) -> Result<&[u8], CallError> {
        let end = offset
            .checked_add(32)
            .ok_or_else(|| CallError::AbiDecode("offset overflow".into()))?;
        if end > self.data.len() {
            return Err(CallError::AbiDecode(format!(
                "data too short: need {} bytes, have {}",
                end,
                self.data.len()
            )));
        }
        Ok(&self.data[offset..end])
    }
}

#[cfg(test)]
mod tests {
    use super::super::encode::encode;
    use super::*;
    use ethcall_primitives::Address;

    #[test]
    fn test_decode_uint() {
        let mut data = [0u8; 32];
        data[31] = 100;
        let tokens = decode(&[ParamType::Uint(256)], &data).unwrap();
        assert_eq!(tokens, vec![Token::uint(100)]);
    }

    #[test]
    fn test_decode_bool_and_address() {
        let addr = Address::from_hex("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap();
        let data = encode(
            &[ParamType::Bool, ParamType::Address],
            &[Token::Bool(true), Token::Address(addr)],
        )
        .unwrap();
        let tokens = decode(&[ParamType::Bool, ParamType::Address], &data).unwrap();
        assert_eq!(tokens, vec![Token::Bool(true), Token::Address(addr)]);
    }

    #[test]
    fn test_decode_negative_int() {
        let data = encode(&[ParamType::Int(256)], &[Token::int(-42)]).unwrap();
        let tokens = decode(&[ParamType::Int(256)], &data).unwrap();
        assert_eq!(tokens, vec![Token::int(-42)]);
    }

    #[test]
    fn test_decode_string() {
        let data = encode(
            &[ParamType::String],
            &[Token::string("Wrapped Ether")],
        )
        .unwrap();
        let tokens = decode(&[ParamType::String], &data).unwrap();
        assert_eq!(tokens, vec![Token::string("Wrapped Ether")]);
    }

    #[test]
    fn test_decode_dynamic_array() {
        let ty = ParamType::Array(Box::new(ParamType::Uint(256)));
        let value = Token::Array(vec![Token::uint(1), Token::uint(2), Token::uint(3)]);
        let data = encode(std::slice::from_ref(&ty), std::slice::from_ref(&value)).unwrap();
        let tokens = decode(std::slice::from_ref(&ty), &data).unwrap();
        assert_eq!(tokens, vec![value]);
    }

    #[test]
    fn test_decode_tuple_with_dynamic_field() {
        let ty = ParamType::Tuple(vec![ParamType::Uint(256), ParamType::Bytes]);
        let value = Token::Tuple(vec![Token::uint(9), Token::Bytes(vec![1, 2, 3])]);
        let data = encode(std::slice::from_ref(&ty), std::slice::from_ref(&value)).unwrap();
        let tokens = decode(std::slice::from_ref(&ty), &data).unwrap();
        assert_eq!(tokens, vec![value]);
    }

    #[test]
    fn test_decode_truncated_data() {
        let result = decode(&[ParamType::Uint(256)], &[0u8; 16]);
        assert!(matches!(result, Err(CallError::AbiDecode(_))));
    }

    #[test]
    fn test_decode_empty_type_list() {
        let tokens = decode(&[], &[]).unwrap();
        assert!(tokens.is_empty());
    }
}
