use thiserror::Error;

use crate::types::AbiType;

/// Failures of the type registry, the field codec and hex parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// A type name or code outside the supported set.
    #[error("unsupported abi type: {0}")]
    UnsupportedType(String),

    /// A numeric value wider than its type, or a `bytesN` value that is not N bytes.
    #[error("value does not fit in {ty}")]
    ValueOutOfRange { ty: AbiType },

    /// The value's kind does not match the field type.
    #[error("expected a value of type {ty}, found {found}")]
    TypeMismatch { ty: AbiType, found: &'static str },

    /// Encoded bytes that cannot be a value of the field type.
    #[error("malformed {ty} field: {reason}")]
    MalformedField { ty: AbiType, reason: String },

    /// Text that is not a `0x`-prefixed hex string of the expected size.
    #[error("invalid hex {input:?}: {reason}")]
    InvalidHex { input: String, reason: String },
}
