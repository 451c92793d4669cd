use std::fmt;
use std::str::FromStr;

use crate::error::AbiError;

/// Byte width of a sized type: `uint<8*n>`, `int<8*n>` or `bytes<n>` for
/// `n` in `1..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteWidth(u8);

impl ByteWidth {
    /// Returns `None` unless `bytes` is in `1..=32`.
    pub const fn new(bytes: u8) -> Option<Self> {
        if bytes >= 1 && bytes <= 32 {
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns `None` unless `bits` is a multiple of 8 in `8..=256`.
    pub const fn from_bits(bits: u16) -> Option<Self> {
        if bits % 8 == 0 && bits >= 8 && bits <= 256 {
            Some(Self((bits / 8) as u8))
        } else {
            None
        }
    }

    pub const fn bytes(self) -> u8 {
        self.0
    }

    pub const fn bits(self) -> u16 {
        self.0 as u16 * 8
    }
}

/// Encoded width of a type: fixed, or carried by the packed counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldWidth {
    Static(usize),
    Dynamic,
}

/// Every value type a schema can describe.
///
/// The set is closed; each variant has a one-byte code used in schema words.
/// Codes are assigned in blocks:
///
/// ```text
///   0..=31   uint8   .. uint256
///  32..=63   int8    .. int256
///  64..=95   bytes1  .. bytes32
///  96        bool
///  97        address
///  98..=129  uint8[] .. uint256[]
/// 130..=161  int8[]  .. int256[]
/// 162..=193  bytes1[] .. bytes32[]
/// 194        bool[]
/// 195        address[]
/// 196        bytes
/// 197        string
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiType {
    Uint(ByteWidth),
    Int(ByteWidth),
    FixedBytes(ByteWidth),
    Bool,
    Address,
    UintArray(ByteWidth),
    IntArray(ByteWidth),
    FixedBytesArray(ByteWidth),
    BoolArray,
    AddressArray,
    Bytes,
    String,
}

const UINT_BASE: u8 = 0;
const INT_BASE: u8 = 32;
const FIXED_BYTES_BASE: u8 = 64;
const BOOL_CODE: u8 = 96;
const ADDRESS_CODE: u8 = 97;
const UINT_ARRAY_BASE: u8 = 98;
const INT_ARRAY_BASE: u8 = 130;
const FIXED_BYTES_ARRAY_BASE: u8 = 162;
const BOOL_ARRAY_CODE: u8 = 194;
const ADDRESS_ARRAY_CODE: u8 = 195;
const BYTES_CODE: u8 = 196;
const STRING_CODE: u8 = 197;

/// Number of assigned type codes; codes at or above this are unsupported.
pub const TYPE_CODE_COUNT: u8 = 198;

/// Width of an `address` in bytes.
pub const ADDRESS_BYTES: usize = 20;

impl AbiType {
    pub const UINT8: AbiType = AbiType::Uint(ByteWidth(1));
    pub const UINT16: AbiType = AbiType::Uint(ByteWidth(2));
    pub const UINT32: AbiType = AbiType::Uint(ByteWidth(4));
    pub const UINT64: AbiType = AbiType::Uint(ByteWidth(8));
    pub const UINT128: AbiType = AbiType::Uint(ByteWidth(16));
    pub const UINT256: AbiType = AbiType::Uint(ByteWidth(32));
    pub const INT8: AbiType = AbiType::Int(ByteWidth(1));
    pub const INT32: AbiType = AbiType::Int(ByteWidth(4));
    pub const INT256: AbiType = AbiType::Int(ByteWidth(32));
    pub const BYTES4: AbiType = AbiType::FixedBytes(ByteWidth(4));
    pub const BYTES32: AbiType = AbiType::FixedBytes(ByteWidth(32));

    /// Encoded width of this type.
    pub const fn width(self) -> FieldWidth {
        match self {
            AbiType::Uint(w) | AbiType::Int(w) | AbiType::FixedBytes(w) => {
                FieldWidth::Static(w.0 as usize)
            }
            AbiType::Bool => FieldWidth::Static(1),
            AbiType::Address => FieldWidth::Static(ADDRESS_BYTES),
            AbiType::UintArray(_)
            | AbiType::IntArray(_)
            | AbiType::FixedBytesArray(_)
            | AbiType::BoolArray
            | AbiType::AddressArray
            | AbiType::Bytes
            | AbiType::String => FieldWidth::Dynamic,
        }
    }

    /// Fixed byte width, or `None` for dynamic types.
    pub const fn static_width(self) -> Option<usize> {
        match self.width() {
            FieldWidth::Static(n) => Some(n),
            FieldWidth::Dynamic => None,
        }
    }

    pub const fn is_dynamic(self) -> bool {
        matches!(self.width(), FieldWidth::Dynamic)
    }

    /// Element type of an array type.
    pub const fn element_type(self) -> Option<AbiType> {
        match self {
            AbiType::UintArray(w) => Some(AbiType::Uint(w)),
            AbiType::IntArray(w) => Some(AbiType::Int(w)),
            AbiType::FixedBytesArray(w) => Some(AbiType::FixedBytes(w)),
            AbiType::BoolArray => Some(AbiType::Bool),
            AbiType::AddressArray => Some(AbiType::Address),
            _ => None,
        }
    }

    /// One-byte code stored in schema words.
    pub const fn code(self) -> u8 {
        match self {
            AbiType::Uint(w) => UINT_BASE + w.0 - 1,
            AbiType::Int(w) => INT_BASE + w.0 - 1,
            AbiType::FixedBytes(w) => FIXED_BYTES_BASE + w.0 - 1,
            AbiType::Bool => BOOL_CODE,
            AbiType::Address => ADDRESS_CODE,
            AbiType::UintArray(w) => UINT_ARRAY_BASE + w.0 - 1,
            AbiType::IntArray(w) => INT_ARRAY_BASE + w.0 - 1,
            AbiType::FixedBytesArray(w) => FIXED_BYTES_ARRAY_BASE + w.0 - 1,
            AbiType::BoolArray => BOOL_ARRAY_CODE,
            AbiType::AddressArray => ADDRESS_ARRAY_CODE,
            AbiType::Bytes => BYTES_CODE,
            AbiType::String => STRING_CODE,
        }
    }

    /// Inverse of [`code`](AbiType::code).
    pub const fn from_code(code: u8) -> Option<AbiType> {
        let ty = match code {
            0..=31 => AbiType::Uint(ByteWidth(code - UINT_BASE + 1)),
            32..=63 => AbiType::Int(ByteWidth(code - INT_BASE + 1)),
            64..=95 => AbiType::FixedBytes(ByteWidth(code - FIXED_BYTES_BASE + 1)),
            BOOL_CODE => AbiType::Bool,
            ADDRESS_CODE => AbiType::Address,
            98..=129 => AbiType::UintArray(ByteWidth(code - UINT_ARRAY_BASE + 1)),
            130..=161 => AbiType::IntArray(ByteWidth(code - INT_ARRAY_BASE + 1)),
            162..=193 => AbiType::FixedBytesArray(ByteWidth(code - FIXED_BYTES_ARRAY_BASE + 1)),
            BOOL_ARRAY_CODE => AbiType::BoolArray,
            ADDRESS_ARRAY_CODE => AbiType::AddressArray,
            BYTES_CODE => AbiType::Bytes,
            STRING_CODE => AbiType::String,
            _ => return None,
        };
        Some(ty)
    }

    /// Every supported type, in code order.
    pub fn all() -> impl Iterator<Item = AbiType> {
        (0..TYPE_CODE_COUNT).filter_map(AbiType::from_code)
    }
}

impl TryFrom<u8> for AbiType {
    type Error = AbiError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        AbiType::from_code(code).ok_or_else(|| AbiError::UnsupportedType(format!("code {code}")))
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(w) => write!(f, "uint{}", w.bits()),
            AbiType::Int(w) => write!(f, "int{}", w.bits()),
            AbiType::FixedBytes(w) => write!(f, "bytes{}", w.bytes()),
            AbiType::Bool => f.write_str("bool"),
            AbiType::Address => f.write_str("address"),
            AbiType::UintArray(w) => write!(f, "uint{}[]", w.bits()),
            AbiType::IntArray(w) => write!(f, "int{}[]", w.bits()),
            AbiType::FixedBytesArray(w) => write!(f, "bytes{}[]", w.bytes()),
            AbiType::BoolArray => f.write_str("bool[]"),
            AbiType::AddressArray => f.write_str("address[]"),
            AbiType::Bytes => f.write_str("bytes"),
            AbiType::String => f.write_str("string"),
        }
    }
}

impl FromStr for AbiType {
    type Err = AbiError;

    /// Parses a Solidity type name such as `uint32`, `bytes32[]` or `string`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || AbiError::UnsupportedType(s.to_string());

        if let Some(elem) = s.strip_suffix("[]") {
            return match elem.parse::<AbiType>().map_err(|_| unsupported())? {
                AbiType::Uint(w) => Ok(AbiType::UintArray(w)),
                AbiType::Int(w) => Ok(AbiType::IntArray(w)),
                AbiType::FixedBytes(w) => Ok(AbiType::FixedBytesArray(w)),
                AbiType::Bool => Ok(AbiType::BoolArray),
                AbiType::Address => Ok(AbiType::AddressArray),
                _ => Err(unsupported()),
            };
        }

        match s {
            "bool" => return Ok(AbiType::Bool),
            "address" => return Ok(AbiType::Address),
            "bytes" => return Ok(AbiType::Bytes),
            "string" => return Ok(AbiType::String),
            _ => {}
        }

        // Sized names never carry a leading zero or sign.
        let parse_size = |digits: &str| -> Option<u16> {
            if digits.is_empty() || digits.starts_with('0') {
                return None;
            }
            digits.parse().ok()
        };

        if let Some(digits) = s.strip_prefix("uint") {
            let w = parse_size(digits).and_then(ByteWidth::from_bits);
            return w.map(AbiType::Uint).ok_or_else(unsupported);
        }
        if let Some(digits) = s.strip_prefix("int") {
            let w = parse_size(digits).and_then(ByteWidth::from_bits);
            return w.map(AbiType::Int).ok_or_else(unsupported);
        }
        if let Some(digits) = s.strip_prefix("bytes") {
            let w = parse_size(digits)
                .and_then(|n| u8::try_from(n).ok())
                .and_then(ByteWidth::new);
            return w.map(AbiType::FixedBytes).ok_or_else(unsupported);
        }

        Err(unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------- Registry --------------------

    #[test]
    fn static_widths() {
        assert_eq!(AbiType::UINT256.static_width(), Some(32));
        assert_eq!(AbiType::UINT32.static_width(), Some(4));
        assert_eq!(AbiType::INT8.static_width(), Some(1));
        assert_eq!(AbiType::BYTES4.static_width(), Some(4));
        assert_eq!(AbiType::Bool.static_width(), Some(1));
        assert_eq!(AbiType::Address.static_width(), Some(20));
    }

    #[test]
    fn dynamic_types_have_no_width() {
        for ty in [
            AbiType::Bytes,
            AbiType::String,
            AbiType::BoolArray,
            AbiType::AddressArray,
            AbiType::UintArray(ByteWidth(8)),
        ] {
            assert!(ty.is_dynamic(), "{ty} should be dynamic");
            assert_eq!(ty.width(), FieldWidth::Dynamic);
        }
    }

    #[test]
    fn byte_width_bounds() {
        assert!(ByteWidth::new(0).is_none());
        assert!(ByteWidth::new(33).is_none());
        assert_eq!(ByteWidth::from_bits(256).map(ByteWidth::bytes), Some(32));
        assert!(ByteWidth::from_bits(12).is_none());
        assert!(ByteWidth::from_bits(264).is_none());
    }

    // -------------------- Codes --------------------

    #[test]
    fn every_code_round_trips() {
        let all: Vec<_> = AbiType::all().collect();
        assert_eq!(all.len(), TYPE_CODE_COUNT as usize);
        for (i, ty) in all.iter().enumerate() {
            assert_eq!(ty.code() as usize, i);
        }
    }

    #[test]
    fn known_codes() {
        assert_eq!(AbiType::UINT8.code(), 0);
        assert_eq!(AbiType::UINT256.code(), 31);
        assert_eq!(AbiType::INT256.code(), 63);
        assert_eq!(AbiType::BYTES32.code(), 95);
        assert_eq!(AbiType::Bool.code(), 96);
        assert_eq!(AbiType::Address.code(), 97);
        assert_eq!(AbiType::AddressArray.code(), 195);
        assert_eq!(AbiType::Bytes.code(), 196);
        assert_eq!(AbiType::String.code(), 197);
    }

    #[test]
    fn unknown_code_is_unsupported() {
        assert!(AbiType::from_code(198).is_none());
        assert!(matches!(
            AbiType::try_from(255u8),
            Err(AbiError::UnsupportedType(_))
        ));
    }

    // -------------------- Names --------------------

    #[test]
    fn every_name_round_trips() {
        for ty in AbiType::all() {
            let name = ty.to_string();
            assert_eq!(name.parse::<AbiType>().unwrap(), ty, "{name}");
        }
    }

    #[test]
    fn rejects_unknown_names() {
        for name in [
            "uint", "uint7", "uint264", "uint08", "int0", "bytes0", "bytes33", "string[]",
            "bytes[]", "float", "", "uint256[][]",
        ] {
            assert!(
                matches!(name.parse::<AbiType>(), Err(AbiError::UnsupportedType(_))),
                "{name:?} should be unsupported"
            );
        }
    }
}
