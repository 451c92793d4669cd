use abi::Word;

use crate::error::SchemaError;
use crate::schema::Schema;

/// Key and value schemas of one table. Keys are always fully static.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TableSchema {
    key_schema: Schema,
    value_schema: Schema,
}

impl TableSchema {
    /// # Errors
    ///
    /// [`SchemaError::KeySchemaDynamicField`] if `key_schema` has a dynamic
    /// field.
    pub fn new(key_schema: Schema, value_schema: Schema) -> Result<Self, SchemaError> {
        if let Some(&ty) = key_schema.dynamic_fields().first() {
            return Err(SchemaError::KeySchemaDynamicField {
                index: key_schema.static_count(),
                ty,
            });
        }
        Ok(Self {
            key_schema,
            value_schema,
        })
    }

    /// Decodes both header words; see [`Schema::from_word`].
    pub fn from_words(key: &Word, value: &Word) -> Result<Self, SchemaError> {
        Self::new(Schema::from_word(key)?, Schema::from_word(value)?)
    }

    pub fn from_hex(key: &str, value: &str) -> Result<Self, SchemaError> {
        Self::new(Schema::from_hex(key)?, Schema::from_hex(value)?)
    }

    /// `(key word, value word)`.
    pub fn to_words(&self) -> (Word, Word) {
        (self.key_schema.to_word(), self.value_schema.to_word())
    }

    pub fn key_schema(&self) -> &Schema {
        &self.key_schema
    }

    pub fn value_schema(&self) -> &Schema {
        &self.value_schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi::AbiType;
    use anyhow::Result;

    #[test]
    fn words_round_trip() -> Result<()> {
        let table = TableSchema::new(
            Schema::new([AbiType::Address, AbiType::UINT256])?,
            Schema::new([AbiType::UINT32, AbiType::Bytes, AbiType::String])?,
        )?;
        let (key, value) = table.to_words();
        assert_eq!(TableSchema::from_words(&key, &value)?, table);
        Ok(())
    }

    #[test]
    fn rejects_dynamic_key_field() -> Result<()> {
        let key = Schema::new([AbiType::BYTES32, AbiType::String])?;
        let value = Schema::new([AbiType::Bool])?;

        let err = TableSchema::from_words(&key.to_word(), &value.to_word()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::KeySchemaDynamicField {
                index: 1,
                ty: AbiType::String
            }
        );
        Ok(())
    }

    #[test]
    fn malformed_value_word_is_reported() -> Result<()> {
        let key = Schema::new([AbiType::BYTES32])?.to_hex();
        let err = TableSchema::from_hex(&key, "0x01").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
        Ok(())
    }
}
