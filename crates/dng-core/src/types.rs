//! Core types for DNG decoding

#[cfg(feature = "serde")]
use serde::Serialize;

/// Byte order of multi-byte values in a TIFF container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ByteOrder {
    /// `II` mark
    LittleEndian,
    /// `MM` mark
    BigEndian,
}

impl ByteOrder {
    /// Interpret a two-byte byte-order mark
    pub fn from_mark(mark: [u8; 2]) -> Option<Self> {
        match &mark {
            b"II" => Some(ByteOrder::LittleEndian),
            b"MM" => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }
}

/// Color space carried by an RGB rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ColorSpace {
    /// Linear camera-native RGB
    CameraRgb,
    /// CIE XYZ relative to a D50 white
    XyzD50,
    /// Gamma-encoded sRGB
    Srgb,
}

/// Image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}
