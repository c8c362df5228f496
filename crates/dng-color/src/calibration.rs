//! Camera color calibration at a target white temperature

use crate::daylight::daylight_xyz;
use crate::illuminant::{interpolation_weight, required_temperature};
use crate::Matrix;
use dng_container::{tags, IfdView};
use dng_core::{DngError, DngResult};
use tracing::debug;

/// Number of color planes supported by the pipeline
const COLOR_PLANES: usize = 3;

/// Calibration matrices of one directory blended for a temperature
///
/// Built once per (directory, temperature, camera-calibration flag) and
/// shared read-only between segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCalibration {
    pub temperature_k: f64,
    /// Weight of the first calibration set
    pub alpha: f64,
    pub color_matrix: Matrix,
    pub camera_calibration: Matrix,
    pub forward_matrix: Option<Matrix>,
    pub analog_balance: Matrix,
    pub xyz_to_camera: Matrix,
    pub camera_neutral: Matrix,
    pub reference_neutral: Matrix,
    pub camera_to_xyz_d50: Matrix,
}

fn square_matrix(view: &IfdView<'_, '_>, tag: u16) -> DngResult<Option<Matrix>> {
    match view.reals_exact(tag, COLOR_PLANES * COLOR_PLANES)? {
        Some(values) => Ok(Some(Matrix::from_row_major(COLOR_PLANES, COLOR_PLANES, values)?)),
        None => Ok(None),
    }
}

/// Blend a paired tag; a single present member is used as is
fn blended(first: Option<Matrix>, second: Option<Matrix>, alpha: f64) -> DngResult<Option<Matrix>> {
    match (first, second) {
        (Some(a), Some(b)) => Matrix::blend(&a, &b, alpha).map(Some),
        (Some(m), None) | (None, Some(m)) => Ok(Some(m)),
        (None, None) => Ok(None),
    }
}

impl ColorCalibration {
    /// Read and compose the calibration of `view` for `temperature_k`
    ///
    /// `use_camera_calibration = false` replaces `CameraCalibration1/2` by the
    /// identity.
    pub fn from_directory(
        view: &IfdView<'_, '_>,
        temperature_k: f64,
        use_camera_calibration: bool,
    ) -> DngResult<Self> {
        if !temperature_k.is_finite() || temperature_k <= 0.0 {
            return Err(DngError::InvalidParameter(format!(
                "temperature {temperature_k} K must be positive"
            )));
        }

        let color_matrix_1 = square_matrix(view, tags::COLOR_MATRIX_1)?
            .ok_or_else(|| DngError::missing_tag("ColorMatrix1"))?;
        let color_matrix_2 = square_matrix(view, tags::COLOR_MATRIX_2)?;

        let alpha = match color_matrix_2 {
            Some(_) => {
                let illuminant = |tag: u16| -> DngResult<f64> {
                    let id = view
                        .int(tag)?
                        .ok_or_else(|| DngError::missing_tag(tags::display_name(tag)))?;
                    let id = u16::try_from(id)
                        .map_err(|_| DngError::invalid_tag(tags::display_name(tag), format!("{id} out of range")))?;
                    required_temperature(id).map_err(|err| err.for_tag(tags::display_name(tag)))
                };
                let t1 = illuminant(tags::CALIBRATION_ILLUMINANT_1)?;
                let t2 = illuminant(tags::CALIBRATION_ILLUMINANT_2)?;
                interpolation_weight(temperature_k, t1, t2)
            }
            None => 1.0,
        };

        let color_matrix = match &color_matrix_2 {
            Some(second) => Matrix::blend(&color_matrix_1, second, alpha)?,
            None => color_matrix_1,
        };
        let camera_calibration = if use_camera_calibration {
            blended(
                square_matrix(view, tags::CAMERA_CALIBRATION_1)?,
                square_matrix(view, tags::CAMERA_CALIBRATION_2)?,
                alpha,
            )?
            .unwrap_or_else(|| Matrix::identity(COLOR_PLANES))
        } else {
            Matrix::identity(COLOR_PLANES)
        };
        let forward_matrix = blended(
            square_matrix(view, tags::FORWARD_MATRIX_1)?,
            square_matrix(view, tags::FORWARD_MATRIX_2)?,
            alpha,
        )?;
        let analog_balance = Matrix::diagonal(
            &view
                .reals_exact(tags::ANALOG_BALANCE, COLOR_PLANES)?
                .unwrap_or_else(|| vec![1.0; COLOR_PLANES]),
        );

        let balance_calibration = analog_balance.multiply(&camera_calibration)?;
        let xyz_to_camera = balance_calibration.multiply(&color_matrix)?;
        let white = daylight_xyz(temperature_k, 1.0);
        let camera_neutral = xyz_to_camera.multiply(&Matrix::column(&white))?;
        let balance_calibration_inverse = balance_calibration.inverse()?;
        let reference_neutral = balance_calibration_inverse.multiply(&camera_neutral)?;
        let white_balance = Matrix::diagonal(reference_neutral.data()).inverse()?;

        let camera_to_xyz_d50 = match &forward_matrix {
            Some(forward) => forward
                .multiply(&white_balance)?
                .multiply(&balance_calibration_inverse)?,
            // Chromatic adaptation is the identity here
            None => xyz_to_camera.inverse()?,
        };

        debug!(
            temperature_k,
            alpha,
            forward = forward_matrix.is_some(),
            "color calibration"
        );

        Ok(Self {
            temperature_k,
            alpha,
            color_matrix,
            camera_calibration,
            forward_matrix,
            analog_balance,
            xyz_to_camera,
            camera_neutral,
            reference_neutral,
            camera_to_xyz_d50,
        })
    }
}

/// `AsShotNeutral` of a directory, when present
pub fn as_shot_neutral(view: &IfdView<'_, '_>) -> DngResult<Option<[f64; 3]>> {
    let Some(values) = view.reals_exact(tags::AS_SHOT_NEUTRAL, COLOR_PLANES)? else {
        return Ok(None);
    };
    if values.iter().any(|&v| !(v.is_finite() && v > 0.0)) {
        return Err(DngError::invalid_tag(
            "AsShotNeutral",
            format!("values must be positive, found {values:?}"),
        ));
    }
    Ok(Some([values[0], values[1], values[2]]))
}

/// Correlated temperature of `AsShotWhiteXY`, when present
pub fn as_shot_temperature(view: &IfdView<'_, '_>) -> DngResult<Option<f64>> {
    Ok(view
        .reals_exact(tags::AS_SHOT_WHITE_XY, 2)?
        .map(|xy| crate::color_temperature_kelvin(xy[0], xy[1])))
}
