//! # Packed Counter
//!
//! One word summarizing the byte lengths of a record's dynamic fields.
//!
//! With every length in a fixed slot, the offset of any dynamic field is the
//! sum of the slots before it, so a reader can slice field `i` out of the
//! dynamic data without touching fields `0..i`.
//!
//! ```text
//! [len0: 5B][len1: 5B][len2: 5B][len3: 5B][len4: 5B][reserved: 3B][total: u32]
//! ```
//!
//! All integers are big-endian. Slots past the last dynamic field are zero.
//! The total is redundant with the slots: decoding rejects any word where
//! they disagree, which lets callers trust [`PackedCounter::total_length`]
//! without re-summing.

use abi::layout::{
    MAX_DYNAMIC_DATA_LENGTH, MAX_DYNAMIC_FIELDS, MAX_DYNAMIC_FIELD_LENGTH,
    PACKED_COUNTER_RESERVED, PACKED_COUNTER_SLOT_BYTES, PACKED_COUNTER_TOTAL_OFFSET, WORD_BYTES,
};
use abi::{from_hex, to_hex, Word};
use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackedCounterError {
    #[error("too many dynamic fields: {count} exceeds {max}")]
    TooManyDynamicFields { count: usize, max: usize },

    /// `index` is `None` when the summed total overflows.
    #[error("dynamic length {length} exceeds {max}")]
    LengthOverflow {
        index: Option<usize>,
        length: u64,
        max: u64,
    },

    #[error("packed counter total {total} does not match summed lengths {sum}")]
    Consistency { total: u64, sum: u64 },

    #[error("malformed packed counter: {0}")]
    Malformed(String),

    #[error("dynamic field index {index} out of range for {count} fields")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Per-field dynamic lengths plus their total.
///
/// `field_count` is the number of slots the counter describes. A counter
/// built with [`new`](PackedCounter::new) knows it exactly; one read from a
/// word only knows the slots up to the last non-zero one, since trailing
/// empty fields are indistinguishable from unused slots. Use
/// [`with_field_count`](PackedCounter::with_field_count) to line it up with a
/// schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedCounter {
    lengths: [u64; MAX_DYNAMIC_FIELDS],
    field_count: usize,
    total: u64,
}

impl PackedCounter {
    /// Builds a counter from dynamic field lengths in schema order.
    ///
    /// # Errors
    ///
    /// - [`PackedCounterError::TooManyDynamicFields`] beyond the slot count.
    /// - [`PackedCounterError::LengthOverflow`] if a length does not fit its
    ///   slot or the total does not fit the total field.
    pub fn new(lengths: &[u64]) -> Result<Self, PackedCounterError> {
        if lengths.len() > MAX_DYNAMIC_FIELDS {
            return Err(PackedCounterError::TooManyDynamicFields {
                count: lengths.len(),
                max: MAX_DYNAMIC_FIELDS,
            });
        }

        let mut slots = [0u64; MAX_DYNAMIC_FIELDS];
        let mut total = 0u64;
        for (index, (&length, slot)) in lengths.iter().zip(slots.iter_mut()).enumerate() {
            if length > MAX_DYNAMIC_FIELD_LENGTH {
                return Err(PackedCounterError::LengthOverflow {
                    index: Some(index),
                    length,
                    max: MAX_DYNAMIC_FIELD_LENGTH,
                });
            }
            *slot = length;
            // Cannot overflow: at most five slot-sized values.
            total += length;
        }
        if total > MAX_DYNAMIC_DATA_LENGTH {
            return Err(PackedCounterError::LengthOverflow {
                index: None,
                length: total,
                max: MAX_DYNAMIC_DATA_LENGTH,
            });
        }

        Ok(Self {
            lengths: slots,
            field_count: lengths.len(),
            total,
        })
    }

    /// Total byte length of all dynamic data.
    pub fn total_length(&self) -> u64 {
        self.total
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    pub fn lengths(&self) -> &[u64] {
        &self.lengths[..self.field_count]
    }

    pub fn length_of_field(&self, index: usize) -> Result<u64, PackedCounterError> {
        self.check_index(index)?;
        Ok(self.lengths[index])
    }

    /// Byte offset of dynamic field `index` within the dynamic data.
    pub fn offset_of_field(&self, index: usize) -> Result<u64, PackedCounterError> {
        self.check_index(index)?;
        Ok(self.lengths[..index].iter().sum())
    }

    /// The same counter viewed as describing `count` fields.
    ///
    /// Returns `None` if `count` exceeds the slot count or would drop a
    /// non-zero slot.
    pub fn with_field_count(&self, count: usize) -> Option<Self> {
        if count > MAX_DYNAMIC_FIELDS || self.lengths[count..].iter().any(|&l| l != 0) {
            return None;
        }
        Some(Self {
            field_count: count,
            ..*self
        })
    }

    fn check_index(&self, index: usize) -> Result<(), PackedCounterError> {
        if index >= self.field_count {
            return Err(PackedCounterError::IndexOutOfRange {
                index,
                count: self.field_count,
            });
        }
        Ok(())
    }

    pub fn to_word(&self) -> Word {
        let mut word = [0u8; WORD_BYTES];
        for (chunk, &length) in word
            .chunks_exact_mut(PACKED_COUNTER_SLOT_BYTES)
            .zip(&self.lengths)
        {
            BigEndian::write_uint(chunk, length, PACKED_COUNTER_SLOT_BYTES);
        }
        BigEndian::write_u32(&mut word[PACKED_COUNTER_TOTAL_OFFSET..], self.total as u32);
        word
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.to_word())
    }

    /// Parses a counter word.
    ///
    /// The result only covers slots up to the last non-zero one; call
    /// [`with_field_count`](PackedCounter::with_field_count) before using the
    /// per-field accessors on a known number of fields.
    ///
    /// # Errors
    ///
    /// - [`PackedCounterError::Consistency`] if the slot sum differs from the
    ///   stored total.
    /// - [`PackedCounterError::Malformed`] if the reserved bytes are not zero.
    pub fn from_word(word: &Word) -> Result<Self, PackedCounterError> {
        parse_word(word).inspect_err(|e| debug!(error = %e, "rejected packed counter word"))
    }

    pub fn from_hex(hex: &str) -> Result<Self, PackedCounterError> {
        let bytes = from_hex(hex).map_err(|e| PackedCounterError::Malformed(e.to_string()))?;
        let word = Word::try_from(bytes.as_slice()).map_err(|_| {
            PackedCounterError::Malformed(format!(
                "packed counter must be {WORD_BYTES} bytes, got {}",
                bytes.len()
            ))
        })?;
        Self::from_word(&word)
    }
}

fn parse_word(word: &Word) -> Result<PackedCounter, PackedCounterError> {
    if word[PACKED_COUNTER_RESERVED].iter().any(|&b| b != 0) {
        return Err(PackedCounterError::Malformed(
            "reserved bytes are not zero".to_string(),
        ));
    }

    let total = u64::from(BigEndian::read_u32(&word[PACKED_COUNTER_TOTAL_OFFSET..]));
    let mut lengths = [0u64; MAX_DYNAMIC_FIELDS];
    let mut field_count = 0;
    let mut sum = 0u64;
    for (index, (chunk, slot)) in word
        .chunks_exact(PACKED_COUNTER_SLOT_BYTES)
        .zip(lengths.iter_mut())
        .enumerate()
    {
        *slot = BigEndian::read_uint(chunk, PACKED_COUNTER_SLOT_BYTES);
        sum += *slot;
        if *slot != 0 {
            field_count = index + 1;
        }
    }

    if sum != total {
        return Err(PackedCounterError::Consistency { total, sum });
    }

    Ok(PackedCounter {
        lengths,
        field_count,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    // -------------------- Construction --------------------

    #[test]
    fn accessors() -> Result<()> {
        let pc = PackedCounter::new(&[2, 0, 5])?;
        assert_eq!(pc.total_length(), 7);
        assert_eq!(pc.field_count(), 3);
        assert_eq!(pc.lengths(), &[2, 0, 5]);
        assert_eq!(pc.length_of_field(2)?, 5);
        assert_eq!(pc.offset_of_field(0)?, 0);
        assert_eq!(pc.offset_of_field(2)?, 2);
        Ok(())
    }

    #[test]
    fn index_out_of_range() -> Result<()> {
        let pc = PackedCounter::new(&[2, 2])?;
        assert_eq!(
            pc.length_of_field(2),
            Err(PackedCounterError::IndexOutOfRange { index: 2, count: 2 })
        );
        assert!(pc.offset_of_field(5).is_err());
        Ok(())
    }

    #[test]
    fn empty_counter_is_zero_word() -> Result<()> {
        let pc = PackedCounter::new(&[])?;
        assert_eq!(pc.total_length(), 0);
        assert_eq!(pc.to_word(), [0u8; WORD_BYTES]);
        Ok(())
    }

    #[test]
    fn rejects_6th_dynamic_field() {
        assert!(PackedCounter::new(&[1; 5]).is_ok());
        assert_eq!(
            PackedCounter::new(&[1; 6]),
            Err(PackedCounterError::TooManyDynamicFields { count: 6, max: 5 })
        );
    }

    #[test]
    fn rejects_slot_overflow() {
        let err = PackedCounter::new(&[1, MAX_DYNAMIC_FIELD_LENGTH + 1]).unwrap_err();
        assert!(matches!(
            err,
            PackedCounterError::LengthOverflow { index: Some(1), .. }
        ));
    }

    #[test]
    fn rejects_total_overflow() {
        let err = PackedCounter::new(&[MAX_DYNAMIC_DATA_LENGTH, 1]).unwrap_err();
        assert!(matches!(
            err,
            PackedCounterError::LengthOverflow { index: None, .. }
        ));
        assert!(PackedCounter::new(&[MAX_DYNAMIC_DATA_LENGTH]).is_ok());
    }

    // -------------------- Word layout --------------------

    #[test]
    fn word_layout() -> Result<()> {
        let word = PackedCounter::new(&[2, 2])?.to_word();
        let mut expected = [0u8; WORD_BYTES];
        expected[4] = 2;
        expected[9] = 2;
        expected[31] = 4;
        assert_eq!(word, expected);
        Ok(())
    }

    #[test]
    fn wide_lengths_use_all_slot_bytes() -> Result<()> {
        let pc = PackedCounter::new(&[0x01_0203_0405 >> 8, 0x0a0b])?;
        let word = pc.to_word();
        assert_eq!(&word[..5], &[0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&word[5..10], &[0, 0, 0, 0x0a, 0x0b]);
        assert_eq!(PackedCounter::from_word(&word)?, pc);
        Ok(())
    }

    #[test]
    fn word_round_trip_trims_trailing_empty_fields() -> Result<()> {
        let pc = PackedCounter::new(&[3, 0, 4, 0])?;
        let decoded = PackedCounter::from_word(&pc.to_word())?;
        assert_eq!(decoded.field_count(), 3);
        assert_eq!(decoded.total_length(), 7);
        assert_eq!(decoded.with_field_count(4), Some(pc));
        assert_eq!(PackedCounter::from_hex(&pc.to_hex())?.to_word(), pc.to_word());
        Ok(())
    }

    #[test]
    fn all_empty_word_needs_field_count() -> Result<()> {
        let decoded = PackedCounter::from_word(&PackedCounter::new(&[0, 0])?.to_word())?;
        assert_eq!(decoded.field_count(), 0);
        assert_eq!(
            decoded.offset_of_field(0),
            Err(PackedCounterError::IndexOutOfRange { index: 0, count: 0 })
        );

        let widened = decoded.with_field_count(2).expect("zero slots widen");
        assert_eq!(widened.offset_of_field(1)?, 0);
        assert_eq!(widened.length_of_field(1)?, 0);
        Ok(())
    }

    #[test]
    fn with_field_count_keeps_non_zero_slots() -> Result<()> {
        let pc = PackedCounter::new(&[1, 2])?;
        assert!(pc.with_field_count(1).is_none());
        assert!(pc.with_field_count(6).is_none());
        assert_eq!(pc.with_field_count(5).map(|p| p.field_count()), Some(5));
        Ok(())
    }

    // -------------------- Corruption --------------------

    #[test]
    fn rejects_corrupt_total() -> Result<()> {
        let mut word = PackedCounter::new(&[2, 2])?.to_word();
        word[31] ^= 0x01;
        assert_eq!(
            PackedCounter::from_word(&word),
            Err(PackedCounterError::Consistency { total: 5, sum: 4 })
        );
        Ok(())
    }

    #[test]
    fn rejects_corrupt_slot() -> Result<()> {
        let mut word = PackedCounter::new(&[2, 2])?.to_word();
        word[0] = 0x80;
        assert!(matches!(
            PackedCounter::from_word(&word),
            Err(PackedCounterError::Consistency { .. })
        ));
        Ok(())
    }

    #[test]
    fn rejects_reserved_bytes() -> Result<()> {
        let mut word = PackedCounter::new(&[2])?.to_word();
        word[26] = 1;
        assert!(matches!(
            PackedCounter::from_word(&word),
            Err(PackedCounterError::Malformed(_))
        ));
        Ok(())
    }

    #[test]
    fn rejects_short_hex() {
        assert!(matches!(
            PackedCounter::from_hex("0x00"),
            Err(PackedCounterError::Malformed(_))
        ));
    }
}
