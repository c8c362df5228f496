//! Error types for DNG decoding

use crate::ColorSpace;
use thiserror::Error;

/// Result type for DNG operations
pub type DngResult<T> = Result<T, DngError>;

/// Errors that can occur while decoding a DNG file
///
/// Recoverable container problems (a bad byte-order mark, an unexpected
/// version, too many directories) are not errors; they are collected by the
/// container parser and parsing continues.
#[derive(Error, Debug)]
pub enum DngError {
    #[error("{primitive}: out of bounds at offset {offset} (needs {width} bytes, buffer holds {len})")]
    ScannerOutOfBounds {
        primitive: &'static str,
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("{primitive}: undefined byte order at offset {offset}")]
    UndefinedByteOrder { primitive: &'static str, offset: usize },

    #[error("missing tag {tag}")]
    MissingTag { tag: String },

    #[error("invalid tag {tag}: {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("no image segment layout: expected RowsPerStrip or TileWidth/TileLength")]
    NoSegmentLayout,

    #[error("ambiguous image segment layout: both strip and tile tags are present")]
    AmbiguousLayout,

    #[error("no raw image directory (NewSubfileType = 0)")]
    NoRawDirectory,

    #[error("unexpected JPEG marker at offset {offset}: expected {expected}, found 0xFF{found:02X}")]
    UnexpectedMarker {
        offset: usize,
        expected: &'static str,
        found: u8,
    },

    #[error("invalid {segment} header: {reason}")]
    InvalidHeader { segment: &'static str, reason: String },

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("component {component} references missing Huffman table {table}")]
    MissingHuffmanTable { component: u8, table: u8 },

    #[error("no Huffman code matches at byte {byte_offset}, bit {bit_offset}: lookahead {lookahead:016b}")]
    InvalidHuffmanCode {
        byte_offset: usize,
        bit_offset: usize,
        lookahead: u16,
    },

    #[error("sample count mismatch: expected {expected}, decoded {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("image segment at ({x0}, {y0}): {source}")]
    Segment {
        x0: u32,
        y0: u32,
        #[source]
        source: Box<DngError>,
    },

    #[error("tag {tag}: {source}")]
    Tag {
        tag: String,
        #[source]
        source: Box<DngError>,
    },

    #[error("unknown calibration illuminant {0}")]
    UnknownIlluminant(u16),

    #[error("singular matrix (determinant {determinant})")]
    SingularMatrix { determinant: f64 },

    #[error("{operation}: dimension mismatch {left:?} vs {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("color space mismatch: expected {expected:?}, got {actual:?}")]
    ColorSpaceMismatch {
        expected: ColorSpace,
        actual: ColorSpace,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DngError {
    /// Attach the position of the image segment that failed
    pub fn in_segment(self, x0: u32, y0: u32) -> Self {
        DngError::Segment {
            x0,
            y0,
            source: Box::new(self),
        }
    }

    /// Attach the name of the tag whose value could not be used
    pub fn for_tag(self, tag: impl Into<String>) -> Self {
        DngError::Tag {
            tag: tag.into(),
            source: Box::new(self),
        }
    }

    pub fn missing_tag(tag: impl Into<String>) -> Self {
        DngError::MissingTag { tag: tag.into() }
    }

    pub fn invalid_tag(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        DngError::InvalidTag {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_header(segment: &'static str, reason: impl Into<String>) -> Self {
        DngError::InvalidHeader {
            segment,
            reason: reason.into(),
        }
    }
}
