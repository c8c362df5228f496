//! Lossless JPEG (SOF3) decoding for DNG image segments
//!
//! Only the subset written by raw converters is accepted: one frame, Huffman
//! coding, 1x1 sampling, one interleaved scan and no restart intervals. The
//! marker sequence must be exactly SOI, SOF3, one or more DHT, SOS, the
//! entropy-coded data and EOI.

pub mod decoder;
pub mod entropy;
pub mod frame;
pub mod markers;
pub mod scan;
pub mod tables;

pub use decoder::{decode, LosslessJpeg};
pub use entropy::{destuff, magnitude_to_difference};
pub use frame::{FrameComponent, FrameHeader};
pub use scan::{ScanComponent, ScanHeader};
pub use tables::HuffmanTables;
