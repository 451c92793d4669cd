use abi::{decode_word, encode_word, AbiValue, Word};
use schema::{Schema, SchemaError};

use crate::error::ProtocolError;

/// Encoded key of one row: one word per key field.
pub type KeyTuple = Vec<Word>;

/// Encodes key values, one word each, in key schema order.
///
/// # Errors
///
/// - [`SchemaError::KeySchemaDynamicField`] if the schema has dynamic fields.
/// - [`ProtocolError::ArityMismatch`] if the value count differs from the
///   schema's field count.
/// - Field codec errors for individual values.
pub fn encode_key_tuple(
    key_schema: &Schema,
    values: &[AbiValue],
) -> Result<KeyTuple, ProtocolError> {
    ensure_static(key_schema)?;
    if values.len() != key_schema.len() {
        return Err(ProtocolError::ArityMismatch {
            expected: key_schema.len(),
            actual: values.len(),
        });
    }

    let tuple = key_schema
        .fields()
        .iter()
        .zip(values)
        .map(|(&ty, value)| encode_word(ty, value))
        .collect::<Result<KeyTuple, _>>()?;
    Ok(tuple)
}

/// Inverse of [`encode_key_tuple`].
pub fn decode_key_tuple(
    key_schema: &Schema,
    tuple: &[Word],
) -> Result<Vec<AbiValue>, ProtocolError> {
    ensure_static(key_schema)?;
    if tuple.len() != key_schema.len() {
        return Err(ProtocolError::ArityMismatch {
            expected: key_schema.len(),
            actual: tuple.len(),
        });
    }

    let values = key_schema
        .fields()
        .iter()
        .zip(tuple)
        .map(|(&ty, word)| decode_word(ty, word))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(values)
}

fn ensure_static(key_schema: &Schema) -> Result<(), SchemaError> {
    match key_schema.dynamic_fields().first() {
        Some(&ty) => Err(SchemaError::KeySchemaDynamicField {
            index: key_schema.static_count(),
            ty,
        }),
        None => Ok(()),
    }
}
