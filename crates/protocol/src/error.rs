use abi::AbiError;
use packed_counter::PackedCounterError;
use schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    PackedCounter(#[from] PackedCounterError),

    #[error("expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("static data is {actual} bytes, schema requires {expected}")]
    StaticLengthMismatch { expected: usize, actual: usize },

    #[error("dynamic data is {actual} bytes, packed counter declares {expected}")]
    DynamicLengthMismatch { expected: u64, actual: u64 },

    #[error("packed counter describes {counter} dynamic fields, schema has {schema}")]
    DynamicFieldCountMismatch { schema: usize, counter: usize },

    #[error("unknown resource type {0:?}")]
    UnknownResourceType(String),

    #[error("malformed resource id: {0}")]
    MalformedResourceId(String),
}
