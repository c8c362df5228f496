//! SOS scan header

use crate::{FrameHeader, HuffmanTables};
use dng_core::{DngError, DngResult};
use dng_transform::LosslessPredictor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    pub id: u8,
    /// DC table selector (Td)
    pub table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    /// Components in frame order
    pub components: Vec<ScanComponent>,
    pub predictor: LosslessPredictor,
    /// Point transform (Al)
    pub point_transform: u8,
}

impl ScanHeader {
    /// Parse a SOS body against the frame and the tables defined so far
    pub fn parse(body: &[u8], frame: &FrameHeader, tables: &HuffmanTables) -> DngResult<Self> {
        let invalid = |reason: String| DngError::invalid_header("SOS", reason);

        let count = *body.first().ok_or_else(|| invalid("empty segment".to_string()))? as usize;
        let declared = body.len() + 2;
        if declared != 6 + 2 * count {
            return Err(invalid(format!(
                "length {declared} does not match {count} components (expected {})",
                6 + 2 * count
            )));
        }
        if !(1..=4).contains(&count) {
            return Err(invalid(format!("{count} components outside 1..=4")));
        }
        if count != frame.components.len() {
            return Err(DngError::UnsupportedFeature(format!(
                "scan over {count} of {} frame components",
                frame.components.len()
            )));
        }

        let mut components = Vec::with_capacity(count);
        for (i, chunk) in body[1..1 + 2 * count].chunks_exact(2).enumerate() {
            let id = chunk[0];
            let table = chunk[1] >> 4;
            let ac_table = chunk[1] & 0x0F;
            if id != frame.components[i].id {
                return Err(invalid(format!(
                    "component {i} id {id} does not match frame id {}",
                    frame.components[i].id
                )));
            }
            if ac_table != 0 {
                return Err(invalid(format!("component {id} AC table {ac_table} (must be 0)")));
            }
            if tables.get(table).is_none() {
                return Err(DngError::MissingHuffmanTable { component: id, table });
            }
            components.push(ScanComponent { id, table });
        }

        let tail = &body[1 + 2 * count..];
        let (selection, end, approximation) = (tail[0], tail[1], tail[2]);
        if selection > 8 {
            return Err(invalid(format!("predictor selection {selection} outside 0..=8")));
        }
        if end != 0 {
            return Err(invalid(format!("spectral end {end} (must be 0)")));
        }
        let high = approximation >> 4;
        let point_transform = approximation & 0x0F;
        if high != 0 {
            return Err(invalid(format!("successive approximation high {high} (must be 0)")));
        }
        if point_transform >= frame.precision {
            return Err(invalid(format!(
                "point transform {point_transform} not below precision {}",
                frame.precision
            )));
        }
        let predictor = LosslessPredictor::from_selection(selection)?;

        Ok(Self {
            components,
            predictor,
            point_transform,
        })
    }
}
