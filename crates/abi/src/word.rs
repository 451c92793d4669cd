//! Storage words and their `0x`-prefixed hex form.

use crate::error::AbiError;
use crate::layout::WORD_BYTES;

/// One storage word.
pub type Word = [u8; WORD_BYTES];

/// Formats bytes as a `0x`-prefixed lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses a `0x`-prefixed hex string. An empty body (`"0x"`) is an empty blob.
pub fn from_hex(input: &str) -> Result<Vec<u8>, AbiError> {
    let body = input.strip_prefix("0x").ok_or_else(|| AbiError::InvalidHex {
        input: input.to_string(),
        reason: "missing 0x prefix".to_string(),
    })?;
    hex::decode(body).map_err(|e| AbiError::InvalidHex {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Parses exactly one word of hex.
pub fn word_from_hex(input: &str) -> Result<Word, AbiError> {
    let bytes = from_hex(input)?;
    Word::try_from(bytes.as_slice()).map_err(|_| AbiError::InvalidHex {
        input: input.to_string(),
        reason: format!("expected {WORD_BYTES} bytes, got {}", bytes.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_prefixed_lowercase() {
        assert_eq!(to_hex(&[0xde, 0xad]), "0xdead");
        assert_eq!(to_hex(&[]), "0x");
    }

    #[test]
    fn parses_mixed_case() {
        assert_eq!(from_hex("0xDeAd").unwrap(), vec![0xde, 0xad]);
        assert!(from_hex("0x").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(from_hex("dead").is_err());
        assert!(from_hex("0xabc").is_err());
        assert!(from_hex("0xzz").is_err());
    }

    #[test]
    fn word_requires_32_bytes() {
        let hex = to_hex(&[7u8; WORD_BYTES]);
        assert_eq!(word_from_hex(&hex).unwrap(), [7u8; WORD_BYTES]);
        assert!(matches!(
            word_from_hex("0x0102"),
            Err(AbiError::InvalidHex { .. })
        ));
    }
}
