//! # ABI
//!
//! Value types and single-field encoding for the table record protocol.
//!
//! Every column of a table has an [`AbiType`] drawn from a closed set of
//! Solidity-style types. A type is either **static** (fixed byte width, known
//! from the type alone) or **dynamic** (width varies per value and is carried
//! separately by a packed counter).
//!
//! | Family              | Width            | Alignment                 |
//! |---------------------|------------------|---------------------------|
//! | `uintN`, `intN`     | `N / 8` bytes    | right, two's complement   |
//! | `bytesN`            | `N` bytes        | raw, exactly `N` bytes    |
//! | `bool`              | 1 byte           | `0x00` / `0x01`           |
//! | `address`           | 20 bytes         | right                     |
//! | `T[]` (static `T`)  | dynamic          | packed elements           |
//! | `bytes`, `string`   | dynamic          | raw                       |
//!
//! All multi-byte integers are big-endian. Byte layouts of the header words
//! live in [`layout`].
//!
//! ## Example
//! ```rust
//! use abi::{decode_field, encode_field, AbiType, AbiValue};
//!
//! let bytes = encode_field(AbiType::UINT32, &AbiValue::from(1u64)).unwrap();
//! assert_eq!(bytes, vec![0, 0, 0, 1]);
//! assert_eq!(decode_field(AbiType::UINT32, &bytes).unwrap(), AbiValue::from(1u64));
//! ```

mod error;
mod field;
pub mod layout;
mod types;
mod value;
mod word;

pub use alloy_primitives::{Address, I256, U256};
pub use error::AbiError;
pub use field::{decode_field, decode_word, encode_field, encode_field_into, encode_word};
pub use types::{AbiType, ByteWidth, FieldWidth, ADDRESS_BYTES, TYPE_CODE_COUNT};
pub use value::AbiValue;
pub use word::{from_hex, to_hex, word_from_hex, Word};
