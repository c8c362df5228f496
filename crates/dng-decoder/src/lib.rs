//! DNG raw decoding pipeline
//!
//! Ties the container, lossless JPEG, linearization, demosaic and color
//! crates together: [`DngDecoder`] selects the raw directory, decodes its
//! image segments and renders previews in parallel across segments.

pub mod cache;
pub mod linearizer;
pub mod options;
pub mod pipeline;

pub use cache::{CalibrationCache, CalibrationKey};
pub use linearizer::Linearizer;
pub use options::{DemosaicMode, PreviewOptions, SegmentPolicy, WhiteBalanceMode};
pub use pipeline::{ColorStages, DngDecoder, Preview, SegmentFailure};
