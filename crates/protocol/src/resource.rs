use std::fmt;
use std::str::FromStr;

use abi::layout::{RESOURCE_NAMESPACE_BYTES, RESOURCE_NAME_BYTES, RESOURCE_TYPE_BYTES, WORD_BYTES};
use abi::{to_hex, word_from_hex, Word};

use crate::error::ProtocolError;

/// Kind of resource a [`ResourceId`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Table,
    OffchainTable,
    Namespace,
    Module,
    System,
}

impl ResourceType {
    /// Two-byte tag stored at the start of the id.
    pub const fn tag(self) -> [u8; RESOURCE_TYPE_BYTES] {
        match self {
            ResourceType::Table => *b"tb",
            ResourceType::OffchainTable => *b"ot",
            ResourceType::Namespace => *b"ns",
            ResourceType::Module => *b"md",
            ResourceType::System => *b"sy",
        }
    }

    pub fn from_tag(tag: [u8; RESOURCE_TYPE_BYTES]) -> Option<Self> {
        match &tag {
            b"tb" => Some(ResourceType::Table),
            b"ot" => Some(ResourceType::OffchainTable),
            b"ns" => Some(ResourceType::Namespace),
            b"md" => Some(ResourceType::Module),
            b"sy" => Some(ResourceType::System),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceType::Table => "table",
            ResourceType::OffchainTable => "offchainTable",
            ResourceType::Namespace => "namespace",
            ResourceType::Module => "module",
            ResourceType::System => "system",
        })
    }
}

impl FromStr for ResourceType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ResourceType::Table),
            "offchainTable" => Ok(ResourceType::OffchainTable),
            "namespace" => Ok(ResourceType::Namespace),
            "module" => Ok(ResourceType::Module),
            "system" => Ok(ResourceType::System),
            other => Err(ProtocolError::UnknownResourceType(other.to_string())),
        }
    }
}

/// 32-byte identifier of a table, system or other registered resource.
///
/// ```text
/// [type tag: 2B][namespace: 14B, zero-padded][name: 16B, zero-padded]
/// ```
///
/// Namespace and name longer than their fields are truncated (at a UTF-8
/// character boundary) on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    resource_type: ResourceType,
    namespace: String,
    name: String,
}

impl ResourceId {
    pub fn new(resource_type: ResourceType, namespace: &str, name: &str) -> Self {
        Self {
            resource_type,
            namespace: truncate(namespace, RESOURCE_NAMESPACE_BYTES).to_string(),
            name: truncate(name, RESOURCE_NAME_BYTES).to_string(),
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_word(&self) -> Word {
        let mut word = [0u8; WORD_BYTES];
        let (tag, rest) = word.split_at_mut(RESOURCE_TYPE_BYTES);
        let (namespace, name) = rest.split_at_mut(RESOURCE_NAMESPACE_BYTES);
        tag.copy_from_slice(&self.resource_type.tag());
        namespace[..self.namespace.len()].copy_from_slice(self.namespace.as_bytes());
        name[..self.name.len()].copy_from_slice(self.name.as_bytes());
        word
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.to_word())
    }

    /// # Errors
    ///
    /// [`ProtocolError::UnknownResourceType`] for an unknown tag,
    /// [`ProtocolError::MalformedResourceId`] if namespace or name is not UTF-8.
    pub fn from_word(word: &Word) -> Result<Self, ProtocolError> {
        let (tag, rest) = word.split_at(RESOURCE_TYPE_BYTES);
        let (namespace, name) = rest.split_at(RESOURCE_NAMESPACE_BYTES);

        let tag = [tag[0], tag[1]];
        let resource_type = ResourceType::from_tag(tag)
            .ok_or_else(|| ProtocolError::UnknownResourceType(to_hex(&tag)))?;

        Ok(Self {
            resource_type,
            namespace: decode_name(namespace)?,
            name: decode_name(name)?,
        })
    }

    pub fn from_hex(hex: &str) -> Result<Self, ProtocolError> {
        Self::from_word(&word_from_hex(hex)?)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.resource_type, self.namespace, self.name)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn decode_name(field: &[u8]) -> Result<String, ProtocolError> {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8(field[..end].to_vec())
        .map_err(|e| ProtocolError::MalformedResourceId(e.to_string()))
}
