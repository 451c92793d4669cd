use abi::{AbiError, AbiType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Unknown type name while building from type names.
    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("static field {ty} at index {index} follows a dynamic field")]
    Order { index: usize, ty: AbiType },

    #[error("too many {what}: {count} exceeds {max}")]
    Capacity {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("malformed schema: {0}")]
    Malformed(String),

    #[error("key schema has dynamic field {ty} at index {index}")]
    KeySchemaDynamicField { index: usize, ty: AbiType },

    #[error("field index {index} out of range for schema with {len} fields")]
    IndexOutOfRange { index: usize, len: usize },
}
