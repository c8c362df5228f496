//! SOF3 frame header

use dng_core::consts::{MAX_JPEG_COMPONENTS, MAX_JPEG_PRECISION, MIN_JPEG_PRECISION};
use dng_core::{DngError, DngResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameComponent {
    pub id: u8,
    pub horizontal_sampling: u8,
    pub vertical_sampling: u8,
    pub quantization_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sample precision in bits
    pub precision: u8,
    /// Number of lines (Y)
    pub lines: u16,
    /// Samples per line (X)
    pub samples_per_line: u16,
    pub components: Vec<FrameComponent>,
}

impl FrameHeader {
    /// Parse a SOF3 body (the bytes after the length field)
    pub fn parse(body: &[u8]) -> DngResult<Self> {
        let invalid = |reason: String| DngError::invalid_header("SOF3", reason);

        if body.len() < 6 {
            return Err(invalid(format!("{} bytes is too short", body.len())));
        }
        let precision = body[0];
        let lines = u16::from_be_bytes([body[1], body[2]]);
        let samples_per_line = u16::from_be_bytes([body[3], body[4]]);
        let count = body[5] as usize;

        let declared = body.len() + 2;
        if declared != 8 + 3 * count {
            return Err(invalid(format!(
                "length {declared} does not match {count} components (expected {})",
                8 + 3 * count
            )));
        }
        if !(MIN_JPEG_PRECISION..=MAX_JPEG_PRECISION).contains(&precision) {
            return Err(invalid(format!("precision {precision} outside 2..=16")));
        }
        if count == 0 || count > MAX_JPEG_COMPONENTS {
            return Err(invalid(format!("{count} components")));
        }
        if lines == 0 {
            return Err(DngError::UnsupportedFeature(
                "frame with the line count defined by DNL".to_string(),
            ));
        }
        if samples_per_line == 0 {
            return Err(invalid("zero samples per line".to_string()));
        }

        let mut components = Vec::with_capacity(count);
        for chunk in body[6..].chunks_exact(3) {
            let component = FrameComponent {
                id: chunk[0],
                horizontal_sampling: chunk[1] >> 4,
                vertical_sampling: chunk[1] & 0x0F,
                quantization_table: chunk[2],
            };
            let (h, v) = (component.horizontal_sampling, component.vertical_sampling);
            if !(1..=4).contains(&h) || !(1..=4).contains(&v) {
                return Err(invalid(format!(
                    "component {} sampling factors {h}x{v} outside 1..=4",
                    component.id
                )));
            }
            if (h, v) != (1, 1) {
                return Err(DngError::UnsupportedFeature(format!(
                    "component {} sampling factors {h}x{v}",
                    component.id
                )));
            }
            if component.quantization_table != 0 {
                return Err(invalid(format!(
                    "component {} quantization table {} (must be 0)",
                    component.id, component.quantization_table
                )));
            }
            if components.iter().any(|c: &FrameComponent| c.id == component.id) {
                return Err(invalid(format!("duplicate component id {}", component.id)));
            }
            components.push(component);
        }

        Ok(Self {
            precision,
            lines,
            samples_per_line,
            components,
        })
    }

    /// Samples across all components
    pub fn sample_count(&self) -> usize {
        self.lines as usize * self.samples_per_line as usize * self.components.len()
    }
}
