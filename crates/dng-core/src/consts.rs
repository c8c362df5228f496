//! Constants used throughout the DNG decoder

/// TIFF magic number following the byte-order mark
pub const TIFF_VERSION: u16 = 42;

/// Default bound on the number of directories walked in one container
pub const MAX_DIRECTORIES: usize = 256;

/// Supported range of BitsPerSample for raw images
pub const MIN_BITS_PER_SAMPLE: u32 = 2;
pub const MAX_BITS_PER_SAMPLE: u32 = 32;

/// Supported range of lossless JPEG sample precision
pub const MIN_JPEG_PRECISION: u8 = 2;
pub const MAX_JPEG_PRECISION: u8 = 16;

/// Maximum number of lossless JPEG components in one frame
pub const MAX_JPEG_COMPONENTS: usize = 4;

/// Number of Huffman table slots per class
pub const MAX_HUFFMAN_TABLES: usize = 4;

/// Difference assigned to magnitude category 16 (no extra bits follow)
pub const SSSS16_DIFFERENCE: i32 = 32768;

/// Default preview white balance temperature in Kelvin
pub const DEFAULT_TEMPERATURE_K: f64 = 5500.0;

/// Accepted range for user supplied temperatures
pub const MIN_TEMPERATURE_K: f64 = 1000.0;
pub const MAX_TEMPERATURE_K: f64 = 50000.0;

/// CIE daylight locus validity range and branch point
pub const DAYLIGHT_MIN_K: f64 = 4000.0;
pub const DAYLIGHT_BRANCH_K: f64 = 7000.0;
pub const DAYLIGHT_MAX_K: f64 = 25000.0;

/// Determinants at or below this magnitude are treated as singular
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Text dump truncation limits
pub const DUMP_MAX_INTS: usize = 16;
pub const DUMP_MAX_REALS: usize = 8;
