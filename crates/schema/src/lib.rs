//! # Schema
//!
//! Row shapes for the table record protocol and their one-word header form.
//!
//! A [`Schema`] lists a row's field types with every static field before
//! every dynamic one. Because the split is positional, the header only needs
//! the two counts and one type code per field:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ static_len (u16 BE) | n_static (u8) | n_dynamic (u8)        │
//! │ type_code (u8) × (n_static + n_dynamic), static first       │
//! │ zero padding up to 32 bytes                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stored static length is redundant with the type codes; decoding
//! recomputes it and rejects a word where the two disagree.
//!
//! A [`TableSchema`] pairs a key schema (static only) with a value schema.

mod error;
mod schema;
mod table;

pub use error::SchemaError;
pub use schema::Schema;
pub use table::TableSchema;
