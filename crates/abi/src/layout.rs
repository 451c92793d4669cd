//! Byte layout of every fixed-size unit on the wire.
//!
//! All encoded headers are exactly one storage word. The constants below are
//! the only place widths, offsets and capacities are spelled out; the schema,
//! packed counter and record codecs derive everything else from them.
//!
//! ```text
//! schema word
//! ┌────────────────┬──────────┬───────────┬──────────────────────────────┐
//! │ static len u16 │ n_static │ n_dynamic │ type codes (28 × u8, 0-pad)  │
//! └────────────────┴──────────┴───────────┴──────────────────────────────┘
//!   [0:2]            [2]        [3]         [4:32]
//!
//! packed counter word
//! ┌───────┬───────┬───────┬───────┬───────┬──────────┬───────────┐
//! │ len 0 │ len 1 │ len 2 │ len 3 │ len 4 │ reserved │ total u32 │
//! └───────┴───────┴───────┴───────┴───────┴──────────┴───────────┘
//!   [0:5]   [5:10]  [10:15] [15:20] [20:25] [25:28]    [28:32]
//! ```
//!
//! All integers are big-endian.

/// Width of one storage word in bytes.
pub const WORD_BYTES: usize = 32;

/// Width of the total static byte length at the start of a schema word.
pub const SCHEMA_STATIC_LENGTH_BYTES: usize = 2;

/// Offset of the static field count byte in a schema word.
pub const SCHEMA_STATIC_COUNT_OFFSET: usize = 2;

/// Offset of the dynamic field count byte in a schema word.
pub const SCHEMA_DYNAMIC_COUNT_OFFSET: usize = 3;

/// Offset of the first type code in a schema word.
pub const SCHEMA_TYPES_OFFSET: usize = 4;

/// Number of type codes a schema word can hold.
pub const MAX_TOTAL_FIELDS: usize = WORD_BYTES - SCHEMA_TYPES_OFFSET;

/// Maximum number of static fields in one schema.
pub const MAX_STATIC_FIELDS: usize = MAX_TOTAL_FIELDS;

/// Maximum number of dynamic fields in one schema; equals the packed counter
/// slot count.
pub const MAX_DYNAMIC_FIELDS: usize = 5;

/// Largest total static byte length the schema header can record.
pub const MAX_STATIC_DATA_LENGTH: usize = u16::MAX as usize;

/// Width of one per-field length slot in a packed counter word.
pub const PACKED_COUNTER_SLOT_BYTES: usize = 5;

/// Width of the total dynamic length at the end of a packed counter word.
pub const PACKED_COUNTER_TOTAL_BYTES: usize = 4;

/// Offset of the total dynamic length in a packed counter word.
pub const PACKED_COUNTER_TOTAL_OFFSET: usize = WORD_BYTES - PACKED_COUNTER_TOTAL_BYTES;

/// Bytes between the last slot and the total; always zero on the wire.
pub const PACKED_COUNTER_RESERVED: std::ops::Range<usize> =
    MAX_DYNAMIC_FIELDS * PACKED_COUNTER_SLOT_BYTES..PACKED_COUNTER_TOTAL_OFFSET;

/// Largest length a single slot can hold.
pub const MAX_DYNAMIC_FIELD_LENGTH: u64 = (1 << (PACKED_COUNTER_SLOT_BYTES * 8)) - 1;

/// Largest total dynamic length a counter can hold.
pub const MAX_DYNAMIC_DATA_LENGTH: u64 = u32::MAX as u64;

const _: () =
    assert!(MAX_DYNAMIC_FIELDS * PACKED_COUNTER_SLOT_BYTES <= PACKED_COUNTER_TOTAL_OFFSET);
const _: () = assert!(MAX_DYNAMIC_FIELDS <= MAX_TOTAL_FIELDS);

/// Width of the resource type tag at the start of a resource id.
pub const RESOURCE_TYPE_BYTES: usize = 2;

/// Width of the namespace in a resource id.
pub const RESOURCE_NAMESPACE_BYTES: usize = 14;

/// Width of the name in a resource id; fills the rest of the word.
pub const RESOURCE_NAME_BYTES: usize = WORD_BYTES - RESOURCE_TYPE_BYTES - RESOURCE_NAMESPACE_BYTES;
