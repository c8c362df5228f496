//! TIFF 6 and DNG tag numbers and names

use lazy_static::lazy_static;
use std::collections::HashMap;

pub const NEW_SUBFILE_TYPE: u16 = 254;
pub const IMAGE_WIDTH: u16 = 256;
pub const IMAGE_LENGTH: u16 = 257;
pub const BITS_PER_SAMPLE: u16 = 258;
pub const COMPRESSION: u16 = 259;
pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
pub const MAKE: u16 = 271;
pub const MODEL: u16 = 272;
pub const STRIP_OFFSETS: u16 = 273;
pub const SAMPLES_PER_PIXEL: u16 = 277;
pub const ROWS_PER_STRIP: u16 = 278;
pub const STRIP_BYTE_COUNTS: u16 = 279;
pub const TILE_WIDTH: u16 = 322;
pub const TILE_LENGTH: u16 = 323;
pub const TILE_OFFSETS: u16 = 324;
pub const TILE_BYTE_COUNTS: u16 = 325;
pub const SUB_IFDS: u16 = 330;

pub const CFA_REPEAT_PATTERN_DIM: u16 = 33421;
pub const CFA_PATTERN: u16 = 33422;

pub const DNG_VERSION: u16 = 50706;
pub const UNIQUE_CAMERA_MODEL: u16 = 50708;
pub const BLACK_LEVEL_REPEAT_DIM: u16 = 50713;
pub const BLACK_LEVEL: u16 = 50714;
pub const BLACK_LEVEL_DELTA_H: u16 = 50715;
pub const BLACK_LEVEL_DELTA_V: u16 = 50716;
pub const WHITE_LEVEL: u16 = 50717;
pub const COLOR_MATRIX_1: u16 = 50721;
pub const COLOR_MATRIX_2: u16 = 50722;
pub const CAMERA_CALIBRATION_1: u16 = 50723;
pub const CAMERA_CALIBRATION_2: u16 = 50724;
pub const ANALOG_BALANCE: u16 = 50727;
pub const AS_SHOT_NEUTRAL: u16 = 50728;
pub const AS_SHOT_WHITE_XY: u16 = 50729;
pub const CALIBRATION_ILLUMINANT_1: u16 = 50778;
pub const CALIBRATION_ILLUMINANT_2: u16 = 50779;
pub const ACTIVE_AREA: u16 = 50829;
pub const FORWARD_MATRIX_1: u16 = 50964;
pub const FORWARD_MATRIX_2: u16 = 50965;

/// Compression value for lossless JPEG image data
pub const COMPRESSION_LOSSLESS_JPEG: i64 = 7;

/// NewSubfileType value of the full-resolution raw image
pub const SUBFILE_RAW: i64 = 0;

lazy_static! {
    static ref TAG_NAMES: HashMap<u16, &'static str> = {
        let mut m = HashMap::new();
        // TIFF 6.0 baseline and extensions
        m.insert(254, "NewSubfileType");
        m.insert(255, "SubfileType");
        m.insert(256, "ImageWidth");
        m.insert(257, "ImageLength");
        m.insert(258, "BitsPerSample");
        m.insert(259, "Compression");
        m.insert(262, "PhotometricInterpretation");
        m.insert(270, "ImageDescription");
        m.insert(271, "Make");
        m.insert(272, "Model");
        m.insert(273, "StripOffsets");
        m.insert(274, "Orientation");
        m.insert(277, "SamplesPerPixel");
        m.insert(278, "RowsPerStrip");
        m.insert(279, "StripByteCounts");
        m.insert(282, "XResolution");
        m.insert(283, "YResolution");
        m.insert(284, "PlanarConfiguration");
        m.insert(296, "ResolutionUnit");
        m.insert(305, "Software");
        m.insert(306, "DateTime");
        m.insert(315, "Artist");
        m.insert(317, "Predictor");
        m.insert(322, "TileWidth");
        m.insert(323, "TileLength");
        m.insert(324, "TileOffsets");
        m.insert(325, "TileByteCounts");
        m.insert(330, "SubIFDs");
        m.insert(339, "SampleFormat");
        m.insert(347, "JPEGTables");
        m.insert(529, "YCbCrCoefficients");
        m.insert(530, "YCbCrSubSampling");
        m.insert(531, "YCbCrPositioning");
        m.insert(532, "ReferenceBlackWhite");
        m.insert(700, "XMP");
        m.insert(33432, "Copyright");
        m.insert(33434, "ExposureTime");
        m.insert(33437, "FNumber");
        m.insert(34665, "ExifIFD");
        m.insert(34853, "GPSInfo");
        m.insert(37386, "FocalLength");
        // TIFF-EP
        m.insert(33421, "CFARepeatPatternDim");
        m.insert(33422, "CFAPattern");
        m.insert(37399, "SensingMethod");
        // DNG
        m.insert(50706, "DNGVersion");
        m.insert(50707, "DNGBackwardVersion");
        m.insert(50708, "UniqueCameraModel");
        m.insert(50709, "LocalizedCameraModel");
        m.insert(50710, "CFAPlaneColor");
        m.insert(50711, "CFALayout");
        m.insert(50712, "LinearizationTable");
        m.insert(50713, "BlackLevelRepeatDim");
        m.insert(50714, "BlackLevel");
        m.insert(50715, "BlackLevelDeltaH");
        m.insert(50716, "BlackLevelDeltaV");
        m.insert(50717, "WhiteLevel");
        m.insert(50718, "DefaultScale");
        m.insert(50719, "DefaultCropOrigin");
        m.insert(50720, "DefaultCropSize");
        m.insert(50721, "ColorMatrix1");
        m.insert(50722, "ColorMatrix2");
        m.insert(50723, "CameraCalibration1");
        m.insert(50724, "CameraCalibration2");
        m.insert(50725, "ReductionMatrix1");
        m.insert(50726, "ReductionMatrix2");
        m.insert(50727, "AnalogBalance");
        m.insert(50728, "AsShotNeutral");
        m.insert(50729, "AsShotWhiteXY");
        m.insert(50730, "BaselineExposure");
        m.insert(50731, "BaselineNoise");
        m.insert(50732, "BaselineSharpness");
        m.insert(50733, "BayerGreenSplit");
        m.insert(50734, "LinearResponseLimit");
        m.insert(50735, "CameraSerialNumber");
        m.insert(50736, "LensInfo");
        m.insert(50737, "ChromaBlurRadius");
        m.insert(50738, "AntiAliasStrength");
        m.insert(50739, "ShadowScale");
        m.insert(50740, "DNGPrivateData");
        m.insert(50741, "MakerNoteSafety");
        m.insert(50778, "CalibrationIlluminant1");
        m.insert(50779, "CalibrationIlluminant2");
        m.insert(50780, "BestQualityScale");
        m.insert(50781, "RawDataUniqueID");
        m.insert(50827, "OriginalRawFileName");
        m.insert(50828, "OriginalRawFileData");
        m.insert(50829, "ActiveArea");
        m.insert(50830, "MaskedAreas");
        m.insert(50831, "AsShotICCProfile");
        m.insert(50832, "AsShotPreProfileMatrix");
        m.insert(50833, "CurrentICCProfile");
        m.insert(50834, "CurrentPreProfileMatrix");
        m.insert(50879, "ColorimetricReference");
        m.insert(50931, "CameraCalibrationSignature");
        m.insert(50932, "ProfileCalibrationSignature");
        m.insert(50933, "ExtraCameraProfiles");
        m.insert(50934, "AsShotProfileName");
        m.insert(50935, "NoiseReductionApplied");
        m.insert(50936, "ProfileName");
        m.insert(50937, "ProfileHueSatMapDims");
        m.insert(50938, "ProfileHueSatMapData1");
        m.insert(50939, "ProfileHueSatMapData2");
        m.insert(50940, "ProfileToneCurve");
        m.insert(50941, "ProfileEmbedPolicy");
        m.insert(50942, "ProfileCopyright");
        m.insert(50964, "ForwardMatrix1");
        m.insert(50965, "ForwardMatrix2");
        m.insert(50966, "PreviewApplicationName");
        m.insert(50967, "PreviewApplicationVersion");
        m.insert(50968, "PreviewSettingsName");
        m.insert(50969, "PreviewSettingsDigest");
        m.insert(50970, "PreviewColorSpace");
        m.insert(50971, "PreviewDateTime");
        m.insert(50972, "RawImageDigest");
        m.insert(50973, "OriginalRawFileDigest");
        m.insert(50974, "SubTileBlockSize");
        m.insert(50975, "RowInterleaveFactor");
        m.insert(50981, "ProfileLookTableDims");
        m.insert(50982, "ProfileLookTableData");
        m.insert(51008, "OpcodeList1");
        m.insert(51009, "OpcodeList2");
        m.insert(51022, "OpcodeList3");
        m.insert(51041, "NoiseProfile");
        m.insert(51110, "DefaultBlackRender");
        m.insert(51111, "NewRawImageDigest");
        m.insert(51112, "RawToPreviewGain");
        m.insert(51125, "DefaultUserCrop");
        m
    };
}

/// Name of a known tag
pub fn tag_name(tag: u16) -> Option<&'static str> {
    TAG_NAMES.get(&tag).copied()
}

/// Name of a tag for messages, falling back to its number
pub fn display_name(tag: u16) -> String {
    match tag_name(tag) {
        Some(name) => name.to_string(),
        None => format!("Tag{tag}"),
    }
}
