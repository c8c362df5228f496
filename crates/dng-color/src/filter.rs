//! Per-pixel color filters over RGB rectangles

use crate::calibration::as_shot_neutral;
use crate::srgb::xyz_d50_to_srgb;
use crate::{ColorCalibration, Matrix};
use dng_container::IfdView;
use dng_core::{ColorSpace, DngError, DngResult, RgbRect};

/// A stage of the color pipeline
///
/// Filters produce a new rectangle and report the color space of the output
/// through its tag.
pub trait Filter: Send + Sync {
    fn apply(&self, input: &RgbRect) -> DngResult<RgbRect>;
}

fn require_space(input: &RgbRect, expected: ColorSpace) -> DngResult<()> {
    if input.space() != expected {
        return Err(DngError::ColorSpaceMismatch {
            expected,
            actual: input.space(),
        });
    }
    Ok(())
}

/// Per-channel gain; the color space is unchanged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFilter {
    pub scale: [f32; 3],
}

impl ScaleFilter {
    pub fn new(scale: [f32; 3]) -> Self {
        Self { scale }
    }

    pub fn identity() -> Self {
        Self::new([1.0; 3])
    }
}

impl Filter for ScaleFilter {
    fn apply(&self, input: &RgbRect) -> DngResult<RgbRect> {
        let s = self.scale;
        Ok(input.map_pixels(input.space(), |[r, g, b]| [r * s[0], g * s[1], b * s[2]]))
    }
}

/// 3x3 linear transform into `output` space
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixFilter {
    matrix: [[f32; 3]; 3],
    input: Option<ColorSpace>,
    output: ColorSpace,
}

impl MatrixFilter {
    pub fn new(matrix: &Matrix, output: ColorSpace) -> DngResult<Self> {
        Ok(Self {
            matrix: matrix.to_f32_3x3()?,
            input: None,
            output,
        })
    }

    /// Reject inputs not tagged with `space`
    pub fn expecting(mut self, space: ColorSpace) -> Self {
        self.input = Some(space);
        self
    }
}

impl Filter for MatrixFilter {
    fn apply(&self, input: &RgbRect) -> DngResult<RgbRect> {
        if let Some(expected) = self.input {
            require_space(input, expected)?;
        }
        let m = &self.matrix;
        Ok(input.map_pixels(self.output, |[r, g, b]| {
            [
                m[0][0] * r + m[0][1] * g + m[0][2] * b,
                m[1][0] * r + m[1][1] * g + m[1][2] * b,
                m[2][0] * r + m[2][1] * g + m[2][2] * b,
            ]
        }))
    }
}

/// White balance by `1 / AsShotNeutral`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsShotNeutralFilter(ScaleFilter);

impl AsShotNeutralFilter {
    pub fn new(neutral: [f64; 3]) -> Self {
        Self(ScaleFilter::new([
            (1.0 / neutral[0]) as f32,
            (1.0 / neutral[1]) as f32,
            (1.0 / neutral[2]) as f32,
        ]))
    }

    pub fn from_directory(view: &IfdView<'_, '_>) -> DngResult<Self> {
        as_shot_neutral(view)?
            .map(Self::new)
            .ok_or_else(|| DngError::missing_tag("AsShotNeutral"))
    }

    pub fn scale(&self) -> [f32; 3] {
        self.0.scale
    }
}

impl Filter for AsShotNeutralFilter {
    fn apply(&self, input: &RgbRect) -> DngResult<RgbRect> {
        self.0.apply(input)
    }
}

/// Camera RGB to XYZ (D50) for a target white temperature
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureFilter(MatrixFilter);

impl TemperatureFilter {
    pub fn new(calibration: &ColorCalibration) -> DngResult<Self> {
        Ok(Self(
            MatrixFilter::new(&calibration.camera_to_xyz_d50, ColorSpace::XyzD50)?
                .expecting(ColorSpace::CameraRgb),
        ))
    }
}

impl Filter for TemperatureFilter {
    fn apply(&self, input: &RgbRect) -> DngResult<RgbRect> {
        self.0.apply(input)
    }
}

/// XYZ (D50) to gamma-encoded sRGB, unclamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XyzD50ToSrgb;

impl Filter for XyzD50ToSrgb {
    fn apply(&self, input: &RgbRect) -> DngResult<RgbRect> {
        require_space(input, ColorSpace::XyzD50)?;
        Ok(input.map_pixels(ColorSpace::Srgb, xyz_d50_to_srgb))
    }
}
