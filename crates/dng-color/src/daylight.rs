//! CIE daylight locus and correlated color temperature

use dng_core::consts::{DAYLIGHT_BRANCH_K, DAYLIGHT_MAX_K, DAYLIGHT_MIN_K};

/// XYZ of the CIE daylight illuminant at `temperature_k` with `Y = luminance`
///
/// The chromaticity `x` is the cubic in `1/T` from Judd et al. (1964); the
/// lower branch clamps `T` up to 4000 K and the upper branch down to 25000 K.
pub fn daylight_xyz(temperature_k: f64, luminance: f64) -> [f64; 3] {
    let x = if temperature_k <= DAYLIGHT_BRANCH_K {
        let t = temperature_k.max(DAYLIGHT_MIN_K);
        -4.6070e9 / t.powi(3) + 2.9678e6 / t.powi(2) + 0.09911e3 / t + 0.244063
    } else {
        let t = temperature_k.min(DAYLIGHT_MAX_K);
        -2.0064e9 / t.powi(3) + 1.9018e6 / t.powi(2) + 0.24748e3 / t + 0.237040
    };
    let y = 2.870 * x - 3.000 * x * x - 0.275;
    let z = 1.0 - x - y;

    [luminance * x / y, luminance, luminance * z / y]
}

/// Chromaticity `(x, y)` of an XYZ triple
pub fn chromaticity(xyz: [f64; 3]) -> (f64, f64) {
    let sum = xyz[0] + xyz[1] + xyz[2];
    (xyz[0] / sum, xyz[1] / sum)
}

/// McCamy's (1992) cubic estimate of correlated color temperature
pub fn color_temperature_kelvin(x: f64, y: f64) -> f64 {
    let n = (x - 0.3320) / (0.1858 - y);
    449.0 * n.powi(3) + 3525.0 * n.powi(2) + 6823.3 * n + 5520.33
}
