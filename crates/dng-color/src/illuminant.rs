//! Calibration illuminants (EXIF LightSource codes)

use dng_core::{DngError, DngResult};

/// Correlated color temperature of a calibration illuminant
///
/// Returns `None` for codes without a defined temperature (0 unknown,
/// 255 other, ISO studio lights outside the table).
pub fn illuminant_temperature(id: u16) -> Option<f64> {
    let kelvin = match id {
        1 => 5500.0,  // Daylight
        2 => 4150.0,  // Fluorescent
        3 => 2850.0,  // Tungsten
        4 => 5500.0,  // Flash
        9 => 5500.0,  // Fine weather
        10 => 6500.0, // Cloudy weather
        11 => 7500.0, // Shade
        12 => 6430.0, // Daylight fluorescent (D 5700 - 7100K)
        13 => 5000.0, // Day white fluorescent (N 4600 - 5400K)
        14 => 4150.0, // Cool white fluorescent (W 3900 - 4500K)
        15 => 3450.0, // White fluorescent (WW 3200 - 3700K)
        16 => 2940.0, // Warm white fluorescent (L 2600 - 3250K)
        17 => 2856.0, // Standard light A
        18 => 4874.0, // Standard light B
        19 => 6774.0, // Standard light C
        20 => 5503.0, // D55
        21 => 6504.0, // D65
        22 => 7504.0, // D75
        23 => 5003.0, // D50
        24 => 3200.0, // ISO studio tungsten
        _ => return None,
    };
    Some(kelvin)
}

pub fn illuminant_name(id: u16) -> &'static str {
    match id {
        0 => "Unknown",
        1 => "Daylight",
        2 => "Fluorescent",
        3 => "Tungsten",
        4 => "Flash",
        9 => "Fine weather",
        10 => "Cloudy weather",
        11 => "Shade",
        12 => "Daylight fluorescent",
        13 => "Day white fluorescent",
        14 => "Cool white fluorescent",
        15 => "White fluorescent",
        16 => "Warm white fluorescent",
        17 => "Standard light A",
        18 => "Standard light B",
        19 => "Standard light C",
        20 => "D55",
        21 => "D65",
        22 => "D75",
        23 => "D50",
        24 => "ISO studio tungsten",
        255 => "Other",
        _ => "Reserved",
    }
}

pub fn required_temperature(id: u16) -> DngResult<f64> {
    illuminant_temperature(id).ok_or(DngError::UnknownIlluminant(id))
}

/// Weight of the first calibration for a target temperature
///
/// Interpolates linearly in inverse temperature and clamps to `[0, 1]`.
/// Equal illuminant temperatures select the first set.
pub fn interpolation_weight(temperature_k: f64, t1: f64, t2: f64) -> f64 {
    let denominator = 1.0 / t1 - 1.0 / t2;
    if denominator == 0.0 {
        return 1.0;
    }
    ((1.0 / temperature_k - 1.0 / t2) / denominator).clamp(0.0, 1.0)
}
