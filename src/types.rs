//! Core data types for NRRD volumes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar element types supported in NRRD payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ElementType {
    /// Signed 8-bit integer
    I8 = 0,
    /// Unsigned 8-bit integer
    U8 = 1,
    /// Signed 16-bit integer
    I16 = 2,
    /// Unsigned 16-bit integer
    U16 = 3,
    /// Signed 32-bit integer
    I32 = 4,
    /// Unsigned 32-bit integer
    U32 = 5,
    /// 32-bit floating point
    F32 = 6,
    /// 64-bit floating point
    F64 = 7,
}

impl ElementType {
    /// Size in bytes of one sample of this type
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::F64 => 8,
        }
    }

    /// Check if this is a floating point type
    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    /// Check if this is an integer type
    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Resolve an NRRD `type` field token, including the long-form C aliases
    /// (`"unsigned char"`, `"uint8"`, and `"uint8_t"` all name the same kind).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "signed char" | "int8" | "int8_t" => Some(ElementType::I8),
            "uchar" | "unsigned char" | "uint8" | "uint8_t" => Some(ElementType::U8),
            "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
                Some(ElementType::I16)
            }
            "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
                Some(ElementType::U16)
            }
            "int" | "signed int" | "int32" | "int32_t" => Some(ElementType::I32),
            "uint" | "unsigned int" | "uint32" | "uint32_t" => Some(ElementType::U32),
            "float" => Some(ElementType::F32),
            "double" => Some(ElementType::F64),
            _ => None,
        }
    }

    /// Canonical header token for this type
    pub fn token(&self) -> &'static str {
        match self {
            ElementType::I8 => "int8",
            ElementType::U8 => "uint8",
            ElementType::I16 => "int16",
            ElementType::U16 => "uint16",
            ElementType::I32 => "int32",
            ElementType::U32 => "uint32",
            ElementType::F32 => "float",
            ElementType::F64 => "double",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Byte order of multi-byte samples in the payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    /// Least-significant byte first
    #[default]
    Little,
    /// Most-significant byte first
    Big,
}

impl Endianness {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "little" => Some(Endianness::Little),
            "big" => Some(Endianness::Big),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Endianness::Little => "little",
            Endianness::Big => "big",
        }
    }
}

/// Payload encoding marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// Uncompressed samples directly after the header
    #[default]
    Raw,
    /// Gzip-compressed sample block
    Gzip,
}

impl Encoding {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "raw" => Some(Encoding::Raw),
            "gzip" | "gz" => Some(Encoding::Gzip),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Encoding::Raw => "raw",
            Encoding::Gzip => "gzip",
        }
    }
}
