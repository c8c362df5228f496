//! Core types and utilities for the DNG decoder
//!
//! This crate provides the shared error type, geometry, and the rectangle
//! types that flow between the container parser, the lossless JPEG codec,
//! the linearizer and the color pipeline.

pub mod area;
pub mod consts;
pub mod error;
pub mod image;
pub mod types;

pub use area::*;
pub use error::{DngError, DngResult};
pub use image::*;
pub use types::*;
