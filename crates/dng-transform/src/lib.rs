//! Sample-domain transforms for DNG raw data
//!
//! This crate implements lossless JPEG prediction reversal and the demosaic
//! strategies that turn a single-channel CFA plane into RGB.

pub mod demosaic;
pub mod prediction;

pub use demosaic::*;
pub use prediction::*;
