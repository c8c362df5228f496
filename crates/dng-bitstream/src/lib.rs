//! Byte and bit level readers for DNG containers and lossless JPEG streams
//!
//! This crate provides the bounds-checked, byte-order aware [`ByteScanner`]
//! used by the TIFF container parser, the MSB-first [`BitReader`] used by the
//! entropy decoder, and canonical [`HuffmanTable`] construction.

pub mod bitreader;
pub mod huffman;
pub mod scanner;

pub use bitreader::{BitReader, Padding};
pub use huffman::{HuffmanCode, HuffmanTable};
pub use scanner::ByteScanner;
