//! Caller-owned cache of color calibrations

use dng_color::ColorCalibration;
use dng_container::TiffContainer;
use dng_core::{DngError, DngResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalibrationKey {
    pub directory: usize,
    temperature_bits: u64,
    pub use_camera_calibration: bool,
}

impl CalibrationKey {
    pub fn new(directory: usize, temperature_k: f64, use_camera_calibration: bool) -> Self {
        Self {
            directory,
            temperature_bits: temperature_k.to_bits(),
            use_camera_calibration,
        }
    }

    pub fn temperature_k(&self) -> f64 {
        f64::from_bits(self.temperature_bits)
    }
}

/// Calibrations keyed by (directory, temperature, camera-calibration flag)
///
/// Entries belong to one container; use a fresh cache per file.
#[derive(Debug, Default)]
pub struct CalibrationCache {
    entries: HashMap<CalibrationKey, Arc<ColorCalibration>>,
}

impl CalibrationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &CalibrationKey) -> Option<Arc<ColorCalibration>> {
        self.entries.get(key).cloned()
    }

    /// The cached calibration, building it from `container` on a miss
    pub fn get_or_build(
        &mut self,
        container: &TiffContainer<'_>,
        key: CalibrationKey,
    ) -> DngResult<Arc<ColorCalibration>> {
        if let Some(found) = self.entries.get(&key) {
            return Ok(Arc::clone(found));
        }
        let view = container.view(key.directory).ok_or_else(|| {
            DngError::InvalidParameter(format!("no directory {}", key.directory))
        })?;
        let calibration = Arc::new(ColorCalibration::from_directory(
            &view,
            key.temperature_k(),
            key.use_camera_calibration,
        )?);
        debug!(directory = key.directory, temperature_k = key.temperature_k(), "calibration cached");
        self.entries.insert(key, Arc::clone(&calibration));
        Ok(calibration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dng_container::tags;

    fn directory_with_color_matrix() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"II");
        data.extend_from_slice(&42u16.to_le_bytes());
        data.extend_from_slice(&8u32.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&tags::COLOR_MATRIX_1.to_le_bytes());
        data.extend_from_slice(&10u16.to_le_bytes());
        data.extend_from_slice(&9u32.to_le_bytes());
        data.extend_from_slice(&26u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        for numerator in [2i32, 0, 0, 0, 1, 0, 0, 0, 2] {
            data.extend_from_slice(&numerator.to_le_bytes());
            data.extend_from_slice(&1i32.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_reuses_entries() {
        let data = directory_with_color_matrix();
        let container = TiffContainer::parse(&data).unwrap();
        let mut cache = CalibrationCache::new();

        let a = cache.get_or_build(&container, CalibrationKey::new(0, 5000.0, false)).unwrap();
        let b = cache.get_or_build(&container, CalibrationKey::new(0, 5000.0, false)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        cache.get_or_build(&container, CalibrationKey::new(0, 6500.0, false)).unwrap();
        cache.get_or_build(&container, CalibrationKey::new(0, 6500.0, true)).unwrap();
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&CalibrationKey::new(0, 6500.0, true)).unwrap().temperature_k, 6500.0);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let data = directory_with_color_matrix();
        let container = TiffContainer::parse(&data).unwrap();
        let mut cache = CalibrationCache::new();
        assert!(cache.get_or_build(&container, CalibrationKey::new(3, 5000.0, false)).is_err());
        assert!(cache.is_empty());
    }
}
