//! Encoding of single field values.
//!
//! Static values occupy exactly their type's width. Integers, `bool` and
//! `address` are right-aligned (signed integers in two's complement); `bytesN`
//! values must be exactly N bytes. Dynamic values are written
//! raw with no length prefix: the packed counter carries their lengths.
//! Arrays are the tight concatenation of their elements' static encodings.

use alloy_primitives::{Address, I256, U256};

use crate::error::AbiError;
use crate::layout::WORD_BYTES;
use crate::types::AbiType;
use crate::value::AbiValue;
use crate::word::Word;

/// Encodes `value` as a field of type `ty`.
///
/// # Errors
///
/// [`AbiError::ValueOutOfRange`] when a number is wider than the type or a
/// `bytesN` value is not exactly N bytes, [`AbiError::TypeMismatch`] when the
/// value kind does not match.
pub fn encode_field(ty: AbiType, value: &AbiValue) -> Result<Vec<u8>, AbiError> {
    let mut out = Vec::with_capacity(ty.static_width().unwrap_or_default());
    encode_field_into(ty, value, &mut out)?;
    Ok(out)
}

/// Appends the encoding of `value` to `out`. On error `out` may hold a
/// partially written field.
pub fn encode_field_into(ty: AbiType, value: &AbiValue, out: &mut Vec<u8>) -> Result<(), AbiError> {
    match (ty, value) {
        (AbiType::Bytes, AbiValue::Bytes(bytes)) => out.extend_from_slice(bytes),
        (AbiType::String, AbiValue::String(s)) => out.extend_from_slice(s.as_bytes()),
        (AbiType::Bytes | AbiType::String, other) => return Err(mismatch(ty, other)),
        _ => match ty.element_type() {
            Some(elem) => {
                let AbiValue::Array(items) = value else {
                    return Err(mismatch(ty, value));
                };
                out.reserve(items.len() * elem.static_width().unwrap_or_default());
                for item in items {
                    encode_static(elem, item, out)?;
                }
            }
            None => encode_static(ty, value, out)?,
        },
    }
    Ok(())
}

fn encode_static(ty: AbiType, value: &AbiValue, out: &mut Vec<u8>) -> Result<(), AbiError> {
    match (ty, value) {
        (AbiType::Uint(w), AbiValue::Uint(v)) => {
            if v.bit_len() > usize::from(w.bits()) {
                return Err(AbiError::ValueOutOfRange { ty });
            }
            let word = v.to_be_bytes::<WORD_BYTES>();
            out.extend_from_slice(&word[WORD_BYTES - usize::from(w.bytes())..]);
        }
        (AbiType::Int(w), AbiValue::Int(v)) => {
            let word = v.into_raw().to_be_bytes::<WORD_BYTES>();
            let split = WORD_BYTES - usize::from(w.bytes());
            // Fits iff every dropped byte is a copy of the kept sign bit.
            let sign = sign_fill(word[split]);
            if word[..split].iter().any(|&b| b != sign) {
                return Err(AbiError::ValueOutOfRange { ty });
            }
            out.extend_from_slice(&word[split..]);
        }
        (AbiType::FixedBytes(w), AbiValue::FixedBytes(bytes)) => {
            let width = usize::from(w.bytes());
            if bytes.len() != width {
                return Err(AbiError::ValueOutOfRange { ty });
            }
            out.extend_from_slice(bytes);
        }
        (AbiType::Bool, AbiValue::Bool(b)) => out.push(u8::from(*b)),
        (AbiType::Address, AbiValue::Address(addr)) => out.extend_from_slice(addr.as_slice()),
        (ty, value) => return Err(mismatch(ty, value)),
    }
    Ok(())
}

/// Decodes a field of type `ty` from exactly the bytes it occupies.
///
/// # Errors
///
/// [`AbiError::MalformedField`] when the length disagrees with a static width,
/// an array is not a whole number of elements, a `bool` byte is not 0 or 1,
/// or a `string` is not UTF-8.
pub fn decode_field(ty: AbiType, bytes: &[u8]) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Bytes => Ok(AbiValue::Bytes(bytes.to_vec())),
        AbiType::String => String::from_utf8(bytes.to_vec())
            .map(AbiValue::String)
            .map_err(|e| malformed(ty, e.to_string())),
        _ => match ty.element_type() {
            Some(elem) => {
                let Some(width) = elem.static_width() else {
                    return Err(malformed(ty, "array element is not static"));
                };
                if bytes.len() % width != 0 {
                    return Err(malformed(
                        ty,
                        format!("{} bytes is not a multiple of {width}", bytes.len()),
                    ));
                }
                bytes
                    .chunks_exact(width)
                    .map(|chunk| decode_static(elem, chunk))
                    .collect::<Result<Vec<_>, _>>()
                    .map(AbiValue::Array)
            }
            None => decode_static(ty, bytes),
        },
    }
}

fn decode_static(ty: AbiType, bytes: &[u8]) -> Result<AbiValue, AbiError> {
    let Some(width) = ty.static_width() else {
        return Err(malformed(ty, "not a static type"));
    };
    if bytes.len() != width {
        return Err(malformed(
            ty,
            format!("expected {width} bytes, got {}", bytes.len()),
        ));
    }

    match ty {
        AbiType::Uint(_) => U256::try_from_be_slice(bytes)
            .map(AbiValue::Uint)
            .ok_or_else(|| malformed(ty, "integer wider than 256 bits")),
        AbiType::Int(_) => {
            let mut word = [sign_fill(bytes[0]); WORD_BYTES];
            word[WORD_BYTES - width..].copy_from_slice(bytes);
            Ok(AbiValue::Int(I256::from_raw(U256::from_be_bytes(word))))
        }
        AbiType::FixedBytes(_) => Ok(AbiValue::FixedBytes(bytes.to_vec())),
        AbiType::Bool => match bytes[0] {
            0 => Ok(AbiValue::Bool(false)),
            1 => Ok(AbiValue::Bool(true)),
            b => Err(malformed(ty, format!("invalid bool byte 0x{b:02x}"))),
        },
        AbiType::Address => Ok(AbiValue::Address(Address::from_slice(bytes))),
        _ => Err(malformed(ty, "not a static type")),
    }
}

/// Encodes a static value into one word using ABI word alignment: `bytesN`
/// left-aligned, signed integers sign-extended, everything else zero-padded
/// on the left.
pub fn encode_word(ty: AbiType, value: &AbiValue) -> Result<Word, AbiError> {
    let Some(width) = ty.static_width() else {
        return Err(AbiError::UnsupportedType(format!(
            "{ty} does not fit in a single word"
        )));
    };
    let encoded = encode_field(ty, value)?;

    let mut word = [0u8; WORD_BYTES];
    match ty {
        AbiType::FixedBytes(_) => word[..width].copy_from_slice(&encoded),
        AbiType::Int(_) => {
            word.fill(sign_fill(encoded[0]));
            word[WORD_BYTES - width..].copy_from_slice(&encoded);
        }
        _ => word[WORD_BYTES - width..].copy_from_slice(&encoded),
    }
    Ok(word)
}

/// Inverse of [`encode_word`]; padding must be canonical.
pub fn decode_word(ty: AbiType, word: &Word) -> Result<AbiValue, AbiError> {
    let Some(width) = ty.static_width() else {
        return Err(AbiError::UnsupportedType(format!(
            "{ty} does not fit in a single word"
        )));
    };

    let (payload, padding, pad) = match ty {
        AbiType::FixedBytes(_) => (&word[..width], &word[width..], 0u8),
        AbiType::Int(_) => {
            let payload = &word[WORD_BYTES - width..];
            (payload, &word[..WORD_BYTES - width], sign_fill(payload[0]))
        }
        _ => (&word[WORD_BYTES - width..], &word[..WORD_BYTES - width], 0u8),
    };
    if padding.iter().any(|&b| b != pad) {
        return Err(malformed(ty, "non-canonical word padding"));
    }
    decode_field(ty, payload)
}

fn sign_fill(msb: u8) -> u8 {
    if msb & 0x80 != 0 {
        0xff
    } else {
        0x00
    }
}

fn mismatch(ty: AbiType, value: &AbiValue) -> AbiError {
    AbiError::TypeMismatch {
        ty,
        found: value.kind(),
    }
}

fn malformed(ty: AbiType, reason: impl Into<String>) -> AbiError {
    AbiError::MalformedField {
        ty,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn ty(name: &str) -> AbiType {
        name.parse().unwrap()
    }

    // -------------------- Static encoding --------------------

    #[test]
    fn uint_is_right_aligned() -> Result<()> {
        let bytes = encode_field(AbiType::UINT32, &AbiValue::from(1u64))?;
        assert_eq!(bytes, vec![0, 0, 0, 1]);

        let bytes = encode_field(AbiType::UINT256, &AbiValue::from(7u64))?;
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 7);
        assert!(bytes[..31].iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn uint_out_of_range() {
        let err = encode_field(AbiType::UINT8, &AbiValue::from(256u64)).unwrap_err();
        assert_eq!(err, AbiError::ValueOutOfRange { ty: AbiType::UINT8 });
        assert!(encode_field(AbiType::UINT8, &AbiValue::from(255u64)).is_ok());
    }

    #[test]
    fn int_is_twos_complement() -> Result<()> {
        let minus_one = AbiValue::Int(I256::MINUS_ONE);
        assert_eq!(encode_field(AbiType::INT8, &minus_one)?, vec![0xff]);
        assert_eq!(encode_field(AbiType::INT32, &minus_one)?, vec![0xff; 4]);

        let min_i8 = AbiValue::Int("-128".parse::<I256>()?);
        assert_eq!(encode_field(AbiType::INT8, &min_i8)?, vec![0x80]);
        assert_eq!(decode_field(AbiType::INT8, &[0x80])?, min_i8);
        Ok(())
    }

    #[test]
    fn int_out_of_range() -> Result<()> {
        for v in ["128", "-129"] {
            let value = AbiValue::Int(v.parse::<I256>()?);
            assert_eq!(
                encode_field(AbiType::INT8, &value),
                Err(AbiError::ValueOutOfRange { ty: AbiType::INT8 }),
                "{v}"
            );
        }
        Ok(())
    }

    #[test]
    fn fixed_bytes_must_match_width() -> Result<()> {
        let value = AbiValue::FixedBytes(vec![0xab, 0xcd, 0, 0]);
        let bytes = encode_field(AbiType::BYTES4, &value)?;
        assert_eq!(bytes, vec![0xab, 0xcd, 0, 0]);
        assert_eq!(decode_field(AbiType::BYTES4, &bytes)?, value);

        for len in [2, 5] {
            assert_eq!(
                encode_field(AbiType::BYTES4, &AbiValue::FixedBytes(vec![1; len])),
                Err(AbiError::ValueOutOfRange { ty: AbiType::BYTES4 })
            );
        }
        Ok(())
    }

    #[test]
    fn bool_and_address() -> Result<()> {
        assert_eq!(encode_field(AbiType::Bool, &AbiValue::Bool(true))?, vec![1]);
        let addr = Address::repeat_byte(0xab);
        let bytes = encode_field(AbiType::Address, &AbiValue::Address(addr))?;
        assert_eq!(bytes, vec![0xab; 20]);
        assert_eq!(decode_field(AbiType::Address, &bytes)?, AbiValue::Address(addr));
        Ok(())
    }

    #[test]
    fn type_mismatch() {
        let err = encode_field(AbiType::Bool, &AbiValue::from(1u64)).unwrap_err();
        assert_eq!(
            err,
            AbiError::TypeMismatch {
                ty: AbiType::Bool,
                found: "uint"
            }
        );
        assert!(matches!(
            encode_field(AbiType::String, &AbiValue::Bytes(vec![1])),
            Err(AbiError::TypeMismatch { .. })
        ));
        assert!(matches!(
            encode_field(ty("uint8[]"), &AbiValue::from(1u64)),
            Err(AbiError::TypeMismatch { .. })
        ));
    }

    // -------------------- Dynamic encoding --------------------

    #[test]
    fn dynamic_values_are_raw() -> Result<()> {
        assert_eq!(
            encode_field(AbiType::Bytes, &AbiValue::Bytes(vec![0xde, 0xad]))?,
            vec![0xde, 0xad]
        );
        assert_eq!(encode_field(AbiType::String, &AbiValue::from("hi"))?, b"hi".to_vec());
        assert!(encode_field(AbiType::String, &AbiValue::from(""))?.is_empty());
        Ok(())
    }

    #[test]
    fn arrays_are_packed() -> Result<()> {
        let value = AbiValue::Array(vec![AbiValue::from(1u64), AbiValue::from(2u64)]);
        let bytes = encode_field(ty("uint16[]"), &value)?;
        assert_eq!(bytes, vec![0, 1, 0, 2]);
        assert_eq!(decode_field(ty("uint16[]"), &bytes)?, value);

        let empty = AbiValue::Array(vec![]);
        assert!(encode_field(AbiType::AddressArray, &empty)?.is_empty());
        assert_eq!(decode_field(AbiType::AddressArray, &[])?, empty);
        Ok(())
    }

    #[test]
    fn array_element_out_of_range() {
        let value = AbiValue::Array(vec![AbiValue::from(1u64), AbiValue::from(300u64)]);
        assert_eq!(
            encode_field(ty("uint8[]"), &value),
            Err(AbiError::ValueOutOfRange { ty: AbiType::UINT8 })
        );
    }

    // -------------------- Decoding --------------------

    #[test]
    fn decode_rejects_wrong_static_width() {
        assert!(matches!(
            decode_field(AbiType::UINT32, &[0, 1]),
            Err(AbiError::MalformedField { .. })
        ));
        assert!(matches!(
            decode_field(AbiType::Address, &[0; 32]),
            Err(AbiError::MalformedField { .. })
        ));
    }

    #[test]
    fn decode_rejects_partial_array() {
        assert!(matches!(
            decode_field(ty("uint32[]"), &[0; 6]),
            Err(AbiError::MalformedField { .. })
        ));
    }

    #[test]
    fn decode_rejects_invalid_bool_and_utf8() {
        assert!(matches!(
            decode_field(AbiType::Bool, &[2]),
            Err(AbiError::MalformedField { .. })
        ));
        assert!(matches!(
            decode_field(AbiType::String, &[0xff, 0xfe]),
            Err(AbiError::MalformedField { .. })
        ));
    }

    #[test]
    fn decode_signed_array() -> Result<()> {
        let value = decode_field(ty("int16[]"), &[0xff, 0xfe, 0x00, 0x05])?;
        assert_eq!(
            value,
            AbiValue::Array(vec![
                AbiValue::Int("-2".parse::<I256>()?),
                AbiValue::Int("5".parse::<I256>()?),
            ])
        );
        Ok(())
    }

    // -------------------- Word alignment --------------------

    #[test]
    fn address_word_is_left_padded() -> Result<()> {
        let addr = Address::repeat_byte(0xab);
        let word = encode_word(AbiType::Address, &AbiValue::Address(addr))?;
        assert!(word[..12].iter().all(|&b| b == 0));
        assert!(word[12..].iter().all(|&b| b == 0xab));
        assert_eq!(decode_word(AbiType::Address, &word)?, AbiValue::Address(addr));
        Ok(())
    }

    #[test]
    fn fixed_bytes_word_is_right_padded() -> Result<()> {
        let word = encode_word(AbiType::BYTES4, &AbiValue::FixedBytes(vec![1, 2, 3, 4]))?;
        assert_eq!(&word[..4], &[1, 2, 3, 4]);
        assert!(word[4..].iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn negative_int_word_is_sign_extended() -> Result<()> {
        let word = encode_word(AbiType::INT8, &AbiValue::Int(I256::MINUS_ONE))?;
        assert_eq!(word, [0xff; 32]);
        assert_eq!(decode_word(AbiType::INT8, &word)?, AbiValue::Int(I256::MINUS_ONE));
        Ok(())
    }

    #[test]
    fn word_rejects_dirty_padding() {
        let mut word = [0u8; 32];
        word[31] = 1;
        word[0] = 1;
        assert!(matches!(
            decode_word(AbiType::UINT8, &word),
            Err(AbiError::MalformedField { .. })
        ));
    }

    #[test]
    fn word_rejects_dynamic_types() {
        assert!(matches!(
            encode_word(AbiType::String, &AbiValue::from("x")),
            Err(AbiError::UnsupportedType(_))
        ));
    }
}
