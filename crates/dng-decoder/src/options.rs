//! Preview rendering options

use dng_core::consts;
use dng_core::DngError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DemosaicMode {
    /// Bilinear interpolation over a 2x2 Bayer tile
    #[default]
    RggbLinear,
    /// Each sample copied to all channels
    Grayscale,
    /// Average of each CFA tile
    Pixelate,
    /// Tile average keeping each site's own sample
    PixelatePunch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WhiteBalanceMode {
    AsShotNeutral,
    /// Calibrated conversion to XYZ for a target temperature, then sRGB
    #[default]
    Temperature,
    None,
}

/// What to do when one image segment fails to decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SegmentPolicy {
    /// Leave the segment black and record the failure
    #[default]
    Skip,
    /// Fail the whole preview
    Abort,
}

macro_rules! selector {
    ($ty:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = DngError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(DngError::InvalidParameter(format!(
                        concat!("unknown ", $what, " '{}' (expected one of: {})"),
                        other,
                        [$($name),+].join(", ")
                    ))),
                }
            }
        }
    };
}

selector!(DemosaicMode, "demosaic mode", {
    RggbLinear => "rggb-linear",
    Grayscale => "grayscale",
    Pixelate => "pixelate",
    PixelatePunch => "pixelate-punch",
});

selector!(WhiteBalanceMode, "white balance mode", {
    AsShotNeutral => "as-shot-neutral",
    Temperature => "temperature",
    None => "none",
});

selector!(SegmentPolicy, "segment policy", {
    Skip => "skip",
    Abort => "abort",
});

/// Options for [`crate::DngDecoder::render_preview`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOptions {
    /// Target white temperature in Kelvin
    pub temperature_k: f64,
    pub white_balance: WhiteBalanceMode,
    /// Apply CameraCalibration1/2
    pub use_camera_calibration: bool,
    pub demosaic: DemosaicMode,
    pub segment_policy: SegmentPolicy,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            temperature_k: consts::DEFAULT_TEMPERATURE_K,
            white_balance: WhiteBalanceMode::default(),
            use_camera_calibration: false,
            demosaic: DemosaicMode::default(),
            segment_policy: SegmentPolicy::default(),
        }
    }
}

impl PreviewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, kelvin: f64) -> Self {
        self.temperature_k = if kelvin.is_nan() {
            consts::DEFAULT_TEMPERATURE_K
        } else {
            kelvin.clamp(consts::MIN_TEMPERATURE_K, consts::MAX_TEMPERATURE_K)
        };
        self
    }

    pub fn white_balance(mut self, mode: WhiteBalanceMode) -> Self {
        self.white_balance = mode;
        self
    }

    pub fn use_camera_calibration(mut self, enabled: bool) -> Self {
        self.use_camera_calibration = enabled;
        self
    }

    pub fn demosaic(mut self, mode: DemosaicMode) -> Self {
        self.demosaic = mode;
        self
    }

    pub fn segment_policy(mut self, policy: SegmentPolicy) -> Self {
        self.segment_policy = policy;
        self
    }
}
