//! Lossless JPEG predictors (ITU T.81 Annex H)

use dng_core::{DngError, DngResult, Plane};

/// Predictor selection value from the scan header
///
/// `Ra` is the sample to the left, `Rb` the one above, `Rc` above-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LosslessPredictor {
    /// Ra
    Left,
    /// Rb
    Above,
    /// Rc
    AboveLeft,
    /// Ra + Rb - Rc
    Gradient,
    /// Ra + ((Rb - Rc) >> 1)
    LeftGradient,
    /// Rb + ((Ra - Rc) >> 1)
    AboveGradient,
    /// (Ra + Rb) / 2
    Average,
}

impl LosslessPredictor {
    pub fn from_selection(selection: u8) -> DngResult<Self> {
        match selection {
            1 => Ok(LosslessPredictor::Left),
            2 => Ok(LosslessPredictor::Above),
            3 => Ok(LosslessPredictor::AboveLeft),
            4 => Ok(LosslessPredictor::Gradient),
            5 => Ok(LosslessPredictor::LeftGradient),
            6 => Ok(LosslessPredictor::AboveGradient),
            7 => Ok(LosslessPredictor::Average),
            0 | 8 => Err(DngError::UnsupportedFeature(format!(
                "lossless predictor {selection}"
            ))),
            other => Err(DngError::InvalidParameter(format!(
                "predictor selection {other} out of range"
            ))),
        }
    }

    pub fn selection(&self) -> u8 {
        match self {
            LosslessPredictor::Left => 1,
            LosslessPredictor::Above => 2,
            LosslessPredictor::AboveLeft => 3,
            LosslessPredictor::Gradient => 4,
            LosslessPredictor::LeftGradient => 5,
            LosslessPredictor::AboveGradient => 6,
            LosslessPredictor::Average => 7,
        }
    }

    #[inline]
    fn predict(&self, ra: i32, rb: i32, rc: i32) -> i32 {
        match self {
            LosslessPredictor::Left => ra,
            LosslessPredictor::Above => rb,
            LosslessPredictor::AboveLeft => rc,
            LosslessPredictor::Gradient => ra + rb - rc,
            LosslessPredictor::LeftGradient => ra + ((rb - rc) >> 1),
            LosslessPredictor::AboveGradient => rb + ((ra - rc) >> 1),
            LosslessPredictor::Average => (ra + rb) >> 1,
        }
    }
}

/// Rebuild samples of one component from decoded differences
///
/// The first sample is predicted from `2^(precision - point_transform - 1)`,
/// the rest of row 0 from the left neighbour and column 0 of later rows from
/// the sample above. Every value is taken modulo 2^16 and finally shifted
/// left by the point transform.
pub fn reconstruct(
    differences: &Plane<i32>,
    predictor: LosslessPredictor,
    precision: u8,
    point_transform: u8,
) -> DngResult<Plane<u16>> {
    if point_transform >= precision || precision > 16 {
        return Err(DngError::InvalidParameter(format!(
            "point transform {point_transform} invalid for precision {precision}"
        )));
    }

    let width = differences.width();
    let height = differences.height();
    let mut samples: Plane<i32> = Plane::new(width, height);
    let seed = 1i32 << (precision - point_transform - 1);

    for y in 0..height {
        for x in 0..width {
            let prediction = match (x, y) {
                (0, 0) => seed,
                (_, 0) => samples.get(x - 1, 0),
                (0, _) => samples.get(0, y - 1),
                _ => predictor.predict(
                    samples.get(x - 1, y),
                    samples.get(x, y - 1),
                    samples.get(x - 1, y - 1),
                ),
            };
            let value = prediction.wrapping_add(differences.get(x, y)) & 0xFFFF;
            samples.set(x, y, value);
        }
    }

    Ok(samples.map(|_, _, v| ((v << point_transform) & 0xFFFF) as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(width: usize, values: &[i32]) -> Plane<i32> {
        Plane::from_vec(width, values.len() / width, values.to_vec()).unwrap()
    }

    #[test]
    fn test_unsupported_selections() {
        assert!(matches!(
            LosslessPredictor::from_selection(0),
            Err(DngError::UnsupportedFeature(_))
        ));
        assert!(matches!(
            LosslessPredictor::from_selection(8),
            Err(DngError::UnsupportedFeature(_))
        ));
        assert!(LosslessPredictor::from_selection(9).is_err());
        assert_eq!(LosslessPredictor::from_selection(6).unwrap().selection(), 6);
    }

    #[test]
    fn test_first_row_seed_and_left() {
        let diffs = plane(3, &[1, 2, -3]);
        let out = reconstruct(&diffs, LosslessPredictor::Left, 12, 0).unwrap();
        assert_eq!(out.row(0), &[2049, 2051, 2048]);
    }

    #[test]
    fn test_first_column_uses_above() {
        // Predictor 4 would give a different answer at (0, 1) if it were used
        let diffs = plane(2, &[0, 10, 5, 1]);
        let out = reconstruct(&diffs, LosslessPredictor::Gradient, 8, 0).unwrap();
        assert_eq!(out.row(0), &[128, 138]);
        // (0,1): above 128 + 5; (1,1): 133 + 138 - 128 + 1
        assert_eq!(out.row(1), &[133, 144]);
    }

    #[test]
    fn test_predictors_on_interior_sample() {
        // Ra = 100, Rb = 60, Rc = 40 at (1, 1) after seeding
        let precision = 16;
        let seed = 1 << 15;
        let diffs = plane(2, &[40 - seed, 60 - 40, 100 - 40, 0]);
        let expected = [(1, 100), (2, 60), (3, 40), (4, 120), (5, 110), (6, 90), (7, 80)];
        for (selection, value) in expected {
            let predictor = LosslessPredictor::from_selection(selection).unwrap();
            let out = reconstruct(&diffs, predictor, precision, 0).unwrap();
            assert_eq!(out.get(1, 1), value, "predictor {selection}");
        }
    }

    #[test]
    fn test_wraps_modulo_sixteen_bits() {
        let diffs = plane(2, &[0, 40000]);
        let out = reconstruct(&diffs, LosslessPredictor::Left, 16, 0).unwrap();
        assert_eq!(out.row(0), &[32768, 7232]);
    }

    #[test]
    fn test_point_transform_shift() {
        let diffs = plane(2, &[0, 3]);
        let out = reconstruct(&diffs, LosslessPredictor::Left, 14, 2).unwrap();
        // seed 2^(14-2-1) = 2048, shifted by 2
        assert_eq!(out.row(0), &[8192, 8204]);
        assert!(reconstruct(&diffs, LosslessPredictor::Left, 8, 8).is_err());
    }
}
