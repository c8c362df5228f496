//! TIFF field types

#[cfg(feature = "serde")]
use serde::Serialize;

/// The type of the values stored in a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FieldType {
    U8,
    Ascii,
    U16,
    U32,
    Rational,
    I8,
    Undefined,
    I16,
    I32,
    SRational,
    F32,
    F64,
    /// Offset to a child directory, stored like a `U32`
    Ifd,
    Unknown(u16),
}

impl FieldType {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => FieldType::U8,
            2 => FieldType::Ascii,
            3 => FieldType::U16,
            4 => FieldType::U32,
            5 => FieldType::Rational,
            6 => FieldType::I8,
            7 => FieldType::Undefined,
            8 => FieldType::I16,
            9 => FieldType::I32,
            10 => FieldType::SRational,
            11 => FieldType::F32,
            12 => FieldType::F64,
            13 => FieldType::Ifd,
            other => FieldType::Unknown(other),
        }
    }

    /// Size in bytes of one value, `None` for unknown types
    pub fn size(&self) -> Option<usize> {
        match self {
            FieldType::U8 | FieldType::Ascii | FieldType::I8 | FieldType::Undefined => Some(1),
            FieldType::U16 | FieldType::I16 => Some(2),
            FieldType::U32 | FieldType::I32 | FieldType::F32 | FieldType::Ifd => Some(4),
            FieldType::Rational | FieldType::SRational | FieldType::F64 => Some(8),
            FieldType::Unknown(_) => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(
            self,
            FieldType::U8
                | FieldType::U16
                | FieldType::U32
                | FieldType::I8
                | FieldType::I16
                | FieldType::I32
                | FieldType::Ifd
        )
    }

    /// Types decoded natively as reals (integers are also accepted by real reads)
    pub fn is_real(&self) -> bool {
        matches!(
            self,
            FieldType::Rational | FieldType::SRational | FieldType::F32 | FieldType::F64
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::U8 => "U8",
            FieldType::Ascii => "ASCII",
            FieldType::U16 => "U16",
            FieldType::U32 => "U32",
            FieldType::Rational => "Rational",
            FieldType::I8 => "I8",
            FieldType::Undefined => "Undefined",
            FieldType::I16 => "I16",
            FieldType::I32 => "I32",
            FieldType::SRational => "SRational",
            FieldType::F32 => "F32",
            FieldType::F64 => "F64",
            FieldType::Ifd => "IFD",
            FieldType::Unknown(_) => "Unknown",
        }
    }
}
