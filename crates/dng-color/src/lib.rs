//! Color science for DNG rendering
//!
//! This crate implements:
//! - Dense matrix algebra used by the calibration chain
//! - Calibration illuminants and interpolation between two profiles
//! - The CIE daylight locus and McCamy temperature estimates
//! - White-balance and display filters over [`dng_core::RgbRect`]

pub mod calibration;
pub mod daylight;
pub mod filter;
pub mod illuminant;
pub mod matrix;
pub mod srgb;

pub use calibration::{as_shot_neutral, as_shot_temperature, ColorCalibration};
pub use daylight::*;
pub use filter::*;
pub use illuminant::*;
pub use matrix::Matrix;
pub use srgb::*;
