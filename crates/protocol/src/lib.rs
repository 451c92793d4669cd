//! # Protocol
//!
//! Schema-driven encoding of table rows into fixed 32-byte words.
//!
//! A row is split in two. Its **key** is a tuple of static values, one word
//! each ([`encode_key_tuple`]). Its **value** becomes a [`Record`]:
//!
//! ```text
//! ┌──────────────────────────────┬────────────────────┬──────────────────────────────┐
//! │ static data                  │ packed counter     │ dynamic data                 │
//! │ static fields, tightly packed│ one word: lengths  │ dynamic fields, concatenated │
//! │ (schema.static_data_length())│ of dynamic fields  │ (counter.total_length())     │
//! └──────────────────────────────┴────────────────────┴──────────────────────────────┘
//! ```
//!
//! Both parts are driven by a [`Schema`]; the [`TableSchema`] of a table is
//! stored as two header words next to its [`ResourceId`].
//!
//! Every function here is pure: no I/O, no shared state. Encoding the same
//! values with the same schema always yields the same bytes.
//!
//! ## Example
//! ```rust
//! use protocol::{decode_record, encode_record, AbiValue, Schema};
//!
//! let schema = Schema::from_abi_types(&["uint32", "bytes", "string"]).unwrap();
//! let values = vec![
//!     AbiValue::from(1u64),
//!     AbiValue::Bytes(vec![0xde, 0xad]),
//!     AbiValue::from("hi"),
//! ];
//!
//! let record = encode_record(&schema, &values).unwrap();
//! assert_eq!(record.static_data.len(), 4);
//! assert_eq!(record.packed_counter.total_length(), 4);
//!
//! let decoded = decode_record(
//!     &schema,
//!     &record.static_data,
//!     &record.packed_counter,
//!     &record.dynamic_data,
//! )
//! .unwrap();
//! assert_eq!(decoded, values);
//! ```

mod error;
mod key_tuple;
mod record;
mod resource;

pub use abi::{
    decode_field, decode_word, encode_field, encode_word, from_hex, layout, to_hex,
    word_from_hex, AbiError, AbiType, AbiValue, Address, ByteWidth, FieldWidth, Word, I256, U256,
};
pub use error::ProtocolError;
pub use key_tuple::{decode_key_tuple, encode_key_tuple, KeyTuple};
pub use packed_counter::{PackedCounter, PackedCounterError};
pub use record::{
    decode_record, decode_record_bytes, decode_record_hex, encode_record, static_data_length,
    Record,
};
pub use resource::{ResourceId, ResourceType};
pub use schema::{Schema, SchemaError, TableSchema};
