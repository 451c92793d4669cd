use abi::layout::WORD_BYTES;
use abi::{decode_field, encode_field_into, to_hex, AbiValue, Word};
use packed_counter::{PackedCounter, PackedCounterError};
use schema::Schema;
use tracing::trace;

use crate::error::ProtocolError;

/// The encoded value portion of one row.
///
/// `static_data` is exactly [`Schema::static_data_length`] bytes and
/// `dynamic_data` is exactly [`PackedCounter::total_length`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Record {
    pub static_data: Vec<u8>,
    pub packed_counter: PackedCounter,
    pub dynamic_data: Vec<u8>,
}

impl Record {
    /// Decodes the record's values; see [`decode_record`].
    pub fn decode(&self, schema: &Schema) -> Result<Vec<AbiValue>, ProtocolError> {
        decode_record(
            schema,
            &self.static_data,
            &self.packed_counter,
            &self.dynamic_data,
        )
    }

    /// Concatenated blob: `static_data ‖ packed counter word ‖ dynamic_data`.
    /// The counter word and dynamic data are left out when `schema` has no
    /// dynamic fields.
    pub fn to_bytes(&self, schema: &Schema) -> Vec<u8> {
        if schema.dynamic_count() == 0 {
            return self.static_data.clone();
        }
        let mut out =
            Vec::with_capacity(self.static_data.len() + WORD_BYTES + self.dynamic_data.len());
        out.extend_from_slice(&self.static_data);
        out.extend_from_slice(&self.packed_counter.to_word());
        out.extend_from_slice(&self.dynamic_data);
        out
    }

    pub fn to_hex(&self, schema: &Schema) -> String {
        to_hex(&self.to_bytes(schema))
    }
}

/// Byte length of the static data of a record with this schema.
pub fn static_data_length(schema: &Schema) -> usize {
    schema.static_data_length()
}

/// Encodes one row's values, in schema order, into a [`Record`].
///
/// Output is deterministic: equal inputs give byte-identical records.
///
/// # Errors
///
/// - [`ProtocolError::ArityMismatch`] if `values` and `schema` differ in length.
/// - Field codec errors for individual values.
/// - Packed counter errors if the dynamic lengths overflow the counter.
pub fn encode_record(schema: &Schema, values: &[AbiValue]) -> Result<Record, ProtocolError> {
    if values.len() != schema.len() {
        return Err(ProtocolError::ArityMismatch {
            expected: schema.len(),
            actual: values.len(),
        });
    }
    let (static_values, dynamic_values) = values.split_at(schema.static_count());

    let mut static_data = Vec::with_capacity(schema.static_data_length());
    for (&ty, value) in schema.static_fields().iter().zip(static_values) {
        encode_field_into(ty, value, &mut static_data)?;
    }
    debug_assert_eq!(
        static_data.len(),
        schema.static_data_length(),
        "static fields encode to their declared widths"
    );

    let mut dynamic_data = Vec::new();
    let mut lengths = Vec::with_capacity(schema.dynamic_count());
    for (&ty, value) in schema.dynamic_fields().iter().zip(dynamic_values) {
        let start = dynamic_data.len();
        encode_field_into(ty, value, &mut dynamic_data)?;
        lengths.push((dynamic_data.len() - start) as u64);
    }
    let packed_counter = PackedCounter::new(&lengths)?;

    trace!(
        schema = %schema,
        static_len = static_data.len(),
        dynamic_len = dynamic_data.len(),
        "encoded record"
    );

    Ok(Record {
        static_data,
        packed_counter,
        dynamic_data,
    })
}

/// Decodes a record's three parts back into values in schema order.
///
/// Lengths are validated before any field is read.
///
/// # Errors
///
/// - [`ProtocolError::StaticLengthMismatch`] if `static_data` is not exactly
///   the schema's static length.
/// - [`ProtocolError::DynamicLengthMismatch`] if `dynamic_data` is not exactly
///   the counter's total.
/// - [`ProtocolError::DynamicFieldCountMismatch`] if the counter has non-zero
///   lengths beyond the schema's dynamic fields.
/// - Field codec errors for individual fields.
pub fn decode_record(
    schema: &Schema,
    static_data: &[u8],
    packed_counter: &PackedCounter,
    dynamic_data: &[u8],
) -> Result<Vec<AbiValue>, ProtocolError> {
    if static_data.len() != schema.static_data_length() {
        return Err(ProtocolError::StaticLengthMismatch {
            expected: schema.static_data_length(),
            actual: static_data.len(),
        });
    }
    if dynamic_data.len() as u64 != packed_counter.total_length() {
        return Err(ProtocolError::DynamicLengthMismatch {
            expected: packed_counter.total_length(),
            actual: dynamic_data.len() as u64,
        });
    }
    let counter = packed_counter
        .with_field_count(schema.dynamic_count())
        .ok_or(ProtocolError::DynamicFieldCountMismatch {
            schema: schema.dynamic_count(),
            counter: packed_counter.field_count(),
        })?;

    let mut values = Vec::with_capacity(schema.len());

    let mut offset = 0;
    for &ty in schema.static_fields() {
        let width = ty.static_width().unwrap_or_default();
        values.push(decode_field(ty, &static_data[offset..offset + width])?);
        offset += width;
    }

    // Slot sums equal the total, which equals dynamic_data.len(), so every
    // slice below is in bounds. The total fits in u32, hence in usize.
    for (index, &ty) in schema.dynamic_fields().iter().enumerate() {
        let start = counter.offset_of_field(index)? as usize;
        let length = counter.length_of_field(index)? as usize;
        values.push(decode_field(ty, &dynamic_data[start..start + length])?);
    }

    trace!(schema = %schema, fields = values.len(), "decoded record");
    Ok(values)
}

/// Decodes the concatenated form produced by [`Record::to_bytes`].
pub fn decode_record_bytes(schema: &Schema, data: &[u8]) -> Result<Vec<AbiValue>, ProtocolError> {
    let static_len = schema.static_data_length();
    if data.len() < static_len || (schema.dynamic_count() == 0 && data.len() != static_len) {
        return Err(ProtocolError::StaticLengthMismatch {
            expected: static_len,
            actual: data.len(),
        });
    }
    let (static_data, rest) = data.split_at(static_len);

    if schema.dynamic_count() == 0 {
        return decode_record(schema, static_data, &PackedCounter::default(), &[]);
    }

    if rest.len() < WORD_BYTES {
        return Err(PackedCounterError::Malformed(format!(
            "record ends {} bytes into the packed counter",
            rest.len()
        ))
        .into());
    }
    let (counter_word, dynamic_data) = rest.split_at(WORD_BYTES);
    let counter_word: &Word = counter_word
        .try_into()
        .map_err(|_| PackedCounterError::Malformed("packed counter is not one word".to_string()))?;
    let packed_counter = PackedCounter::from_word(counter_word)?;

    decode_record(schema, static_data, &packed_counter, dynamic_data)
}

/// Hex form of [`decode_record_bytes`].
pub fn decode_record_hex(schema: &Schema, hex: &str) -> Result<Vec<AbiValue>, ProtocolError> {
    decode_record_bytes(schema, &abi::from_hex(hex)?)
}
