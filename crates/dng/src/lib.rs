//! # DNG - raw image decoding in Rust
//!
//! This crate provides a high-level API for reading Digital Negative files:
//! dumping their tag directories and rendering the lossless JPEG compressed
//! raw image into an 8-bit sRGB preview.
//!
//! ## Quick Start
//!
//! ### Rendering a preview
//!
//! ```no_run
//! use dng::{render_file, DemosaicMode, PreviewOptions};
//!
//! let options = PreviewOptions::new()
//!     .temperature(6500.0)
//!     .demosaic(DemosaicMode::RggbLinear);
//! let preview = render_file("input.dng", &options).unwrap();
//! println!(
//!     "Rendered {}x{} preview ({} segments skipped)",
//!     preview.image.width(),
//!     preview.image.height(),
//!     preview.failures.len()
//! );
//! ```
//!
//! ### Dumping tags
//!
//! ```no_run
//! let data = std::fs::read("input.dng").unwrap();
//! let container = dng::TiffContainer::parse(&data).unwrap();
//! for directory in container.dump() {
//!     print!("{directory}");
//! }
//! ```
//!
//! ## Pipeline
//!
//! - TIFF container walk over root directories and SubIFDs
//! - Lossless JPEG (SOF3) decoding of every strip or tile
//! - Linearization against black and white levels
//! - Bilinear, pixelated or grayscale demosaicing
//! - White balance by AsShotNeutral or by a calibrated target temperature
//! - Segments decoded in parallel

use std::path::Path;
use tracing::info;

// Re-export core types
pub use dng_core::{
    ActiveArea, ActiveAreaPattern, ByteOrder, ColorSpace, Dimensions, DngError, DngResult, Image,
    Plane, RgbRect,
};

// Re-export container parsing
pub use dng_container::{
    tags, DirectoryDump, EntryDump, FieldType, IfdView, ImageSegment, ParseOptions, TagValue,
    TiffContainer,
};

// Re-export the segment codec
pub use dng_ljpeg::{decode as decode_lossless_jpeg, LosslessJpeg};

// Re-export color calibration
pub use dng_color::{
    as_shot_neutral, as_shot_temperature, color_temperature_kelvin, daylight_xyz, ColorCalibration, Filter,
    Matrix,
};

// Re-export decoder
pub use dng_decoder::{
    CalibrationCache, DemosaicMode, DngDecoder, Linearizer, Preview, PreviewOptions,
    SegmentFailure, SegmentPolicy, WhiteBalanceMode,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// DNG format version whose tags this implementation reads
pub const DNG_FORMAT_VERSION: &str = "1.4.0.0";

/// Read a file and render its raw image
pub fn render_file<P: AsRef<Path>>(path: P, options: &PreviewOptions) -> DngResult<Preview> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    info!(path = %path.display(), bytes = data.len(), "rendering preview");

    let decoder = DngDecoder::new(&data)?;
    let mut cache = CalibrationCache::new();
    decoder.render_preview(options, &mut cache)
}

/// Read a file and dump every directory
pub fn dump_file<P: AsRef<Path>>(path: P) -> DngResult<Vec<DirectoryDump>> {
    let data = std::fs::read(path)?;
    Ok(TiffContainer::parse(&data)?.dump())
}
