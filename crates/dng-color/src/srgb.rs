//! sRGB encoding of D50-relative XYZ

/// XYZ (D50) to linear sRGB, Bradford-adapted (Lindbloom)
pub const XYZ_D50_TO_LINEAR_SRGB: [[f32; 3]; 3] = [
    [3.1338561, -1.6168667, -0.4906146],
    [-0.9787684, 1.9161415, 0.0334540],
    [0.0719453, -0.2289914, 1.4052427],
];

/// Convert sRGB to linear RGB (gamma expansion)
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert linear RGB to sRGB (gamma compression)
///
/// Values above 1 follow the power curve; nothing is clamped.
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Gamma-encoded sRGB of an XYZ (D50) triple, unclamped
pub fn xyz_d50_to_srgb(xyz: [f32; 3]) -> [f32; 3] {
    let m = &XYZ_D50_TO_LINEAR_SRGB;
    let mut out = [0.0f32; 3];
    for (channel, row) in out.iter_mut().zip(m) {
        *channel = linear_to_srgb(row[0] * xyz[0] + row[1] * xyz[1] + row[2] * xyz[2]);
    }
    out
}
