use std::fmt;

use abi::layout::{
    MAX_DYNAMIC_FIELDS, MAX_STATIC_DATA_LENGTH, MAX_STATIC_FIELDS, MAX_TOTAL_FIELDS,
    SCHEMA_DYNAMIC_COUNT_OFFSET, SCHEMA_STATIC_COUNT_OFFSET, SCHEMA_STATIC_LENGTH_BYTES,
    SCHEMA_TYPES_OFFSET, WORD_BYTES,
};
use abi::{from_hex, to_hex, AbiType, Word};
use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

use crate::error::SchemaError;

/// Ordered field types of one row shape: static fields first, then dynamic.
///
/// A `Schema` can only be obtained through [`Schema::new`] (or one of the
/// decoders that funnel into it), so every value upholds the ordering and
/// capacity limits of [`abi::layout`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Schema {
    fields: Vec<AbiType>,
    static_count: usize,
    static_length: u16,
}

impl Schema {
    /// Builds a schema from field types in declared order.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Order`] if a static type follows a dynamic one.
    /// - [`SchemaError::Capacity`] if the static, dynamic or total field count,
    ///   or the summed static width, exceeds its maximum.
    pub fn new<I: IntoIterator<Item = AbiType>>(types: I) -> Result<Self, SchemaError> {
        let fields: Vec<AbiType> = types.into_iter().collect();

        let mut static_count = 0usize;
        let mut static_length = 0usize;
        let mut seen_dynamic = false;
        for (index, &ty) in fields.iter().enumerate() {
            match ty.static_width() {
                Some(_) if seen_dynamic => return Err(SchemaError::Order { index, ty }),
                Some(width) => {
                    static_count += 1;
                    static_length += width;
                }
                None => seen_dynamic = true,
            }
        }

        let dynamic_count = fields.len() - static_count;
        check_capacity("static fields", static_count, MAX_STATIC_FIELDS)?;
        check_capacity("dynamic fields", dynamic_count, MAX_DYNAMIC_FIELDS)?;
        check_capacity("fields", fields.len(), MAX_TOTAL_FIELDS)?;
        check_capacity("static bytes", static_length, MAX_STATIC_DATA_LENGTH)?;

        Ok(Self {
            fields,
            static_count,
            static_length: static_length as u16,
        })
    }

    /// Builds a schema from Solidity type names such as `"uint256"`.
    pub fn from_abi_types<S: AsRef<str>>(names: &[S]) -> Result<Self, SchemaError> {
        let types = names
            .iter()
            .map(|name| name.as_ref().parse::<AbiType>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(types)
    }

    /// All field types, static first.
    pub fn fields(&self) -> &[AbiType] {
        &self.fields
    }

    pub fn static_fields(&self) -> &[AbiType] {
        &self.fields[..self.static_count]
    }

    pub fn dynamic_fields(&self) -> &[AbiType] {
        &self.fields[self.static_count..]
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn static_count(&self) -> usize {
        self.static_count
    }

    pub fn dynamic_count(&self) -> usize {
        self.fields.len() - self.static_count
    }

    /// Byte length of a record's static data: the sum of all static widths.
    pub fn static_data_length(&self) -> usize {
        usize::from(self.static_length)
    }

    /// Type of the field at `index`.
    pub fn field_type(&self, index: usize) -> Result<AbiType, SchemaError> {
        self.fields
            .get(index)
            .copied()
            .ok_or(SchemaError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            })
    }

    /// Serializes the schema into its header word.
    pub fn to_word(&self) -> Word {
        let mut word = [0u8; WORD_BYTES];
        BigEndian::write_u16(&mut word[..SCHEMA_STATIC_LENGTH_BYTES], self.static_length);
        word[SCHEMA_STATIC_COUNT_OFFSET] = self.static_count as u8;
        word[SCHEMA_DYNAMIC_COUNT_OFFSET] = self.dynamic_count() as u8;
        for (slot, ty) in word[SCHEMA_TYPES_OFFSET..].iter_mut().zip(&self.fields) {
            *slot = ty.code();
        }
        word
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.to_word())
    }

    /// Parses a header word produced by [`to_word`](Schema::to_word).
    ///
    /// Bytes after the last type code are not inspected.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Malformed`] if the counts do not fit the word, a type
    /// code is unknown or sits on the wrong side of the static/dynamic split,
    /// or the stored static length disagrees with the field widths.
    pub fn from_word(word: &Word) -> Result<Self, SchemaError> {
        parse_word(word).inspect_err(|e| debug!(error = %e, "rejected schema word"))
    }

    /// Parses a `0x`-prefixed hex word.
    pub fn from_hex(hex: &str) -> Result<Self, SchemaError> {
        let bytes = from_hex(hex).map_err(|e| SchemaError::Malformed(e.to_string()))?;
        let word = Word::try_from(bytes.as_slice()).map_err(|_| {
            SchemaError::Malformed(format!(
                "schema word must be {WORD_BYTES} bytes, got {}",
                bytes.len()
            ))
        })?;
        Self::from_word(&word)
    }
}

fn parse_word(word: &Word) -> Result<Schema, SchemaError> {
    let stored_length = BigEndian::read_u16(&word[..SCHEMA_STATIC_LENGTH_BYTES]);
    let static_count = usize::from(word[SCHEMA_STATIC_COUNT_OFFSET]);
    let dynamic_count = usize::from(word[SCHEMA_DYNAMIC_COUNT_OFFSET]);

    let total = static_count + dynamic_count;
    if total > MAX_TOTAL_FIELDS {
        return Err(SchemaError::Malformed(format!(
            "{static_count} static and {dynamic_count} dynamic fields exceed {MAX_TOTAL_FIELDS} type slots"
        )));
    }
    if dynamic_count > MAX_DYNAMIC_FIELDS {
        return Err(SchemaError::Malformed(format!(
            "{dynamic_count} dynamic fields exceed {MAX_DYNAMIC_FIELDS}"
        )));
    }

    let codes = &word[SCHEMA_TYPES_OFFSET..SCHEMA_TYPES_OFFSET + total];
    let mut fields = Vec::with_capacity(total);
    for (index, &code) in codes.iter().enumerate() {
        let ty = AbiType::from_code(code).ok_or_else(|| {
            SchemaError::Malformed(format!("unknown type code {code} at index {index}"))
        })?;
        let counted_static = index < static_count;
        if ty.is_dynamic() == counted_static {
            let side = if counted_static { "static" } else { "dynamic" };
            return Err(SchemaError::Malformed(format!(
                "{ty} at index {index} is counted as {side}"
            )));
        }
        fields.push(ty);
    }

    let schema = Schema::new(fields).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    if schema.static_length != stored_length {
        return Err(SchemaError::Malformed(format!(
            "stored static length {stored_length} disagrees with field widths {}",
            schema.static_length
        )));
    }
    Ok(schema)
}

fn check_capacity(what: &'static str, count: usize, max: usize) -> Result<(), SchemaError> {
    if count > max {
        return Err(SchemaError::Capacity { what, count, max });
    }
    Ok(())
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, ty) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}
