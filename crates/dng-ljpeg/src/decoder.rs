//! Lossless JPEG stream decoder

use crate::entropy::{decode_differences, destuff};
use crate::markers::{self, expect_marker, read_marker, read_segment};
use crate::{FrameHeader, HuffmanTables, ScanHeader};
use dng_core::{DngError, DngResult, Plane};
use tracing::debug;

/// A decoded SOF3 stream before prediction is undone
#[derive(Debug, Clone)]
pub struct LosslessJpeg {
    pub frame: FrameHeader,
    pub scan: ScanHeader,
    /// One difference plane per frame component, in frame order
    pub differences: Vec<Plane<i32>>,
}

impl LosslessJpeg {
    /// Apply the scan's predictor to every component
    pub fn reconstruct(&self) -> DngResult<Vec<Plane<u16>>> {
        self.differences
            .iter()
            .map(|diffs| {
                dng_transform::reconstruct(
                    diffs,
                    self.scan.predictor,
                    self.frame.precision,
                    self.scan.point_transform,
                )
            })
            .collect()
    }

    pub fn width(&self) -> usize {
        self.frame.samples_per_line as usize
    }

    pub fn height(&self) -> usize {
        self.frame.lines as usize
    }

    pub fn component_count(&self) -> usize {
        self.frame.components.len()
    }
}

/// Decode a complete SOI ... EOI stream
pub fn decode(data: &[u8]) -> DngResult<LosslessJpeg> {
    let mut pos = expect_marker(data, 0, markers::SOI)?;

    pos = expect_marker(data, pos, markers::SOF3)?;
    let (body, next) = read_segment(data, pos, "SOF3")?;
    let frame = FrameHeader::parse(body)?;
    pos = next;
    debug!(
        precision = frame.precision,
        width = frame.samples_per_line,
        height = frame.lines,
        components = frame.components.len(),
        "SOF3 frame"
    );

    let mut tables = HuffmanTables::new();
    let mut table_segments = 0usize;
    let scan = loop {
        let (code, next) = read_marker(data, pos)?;
        match code {
            markers::DHT => {
                let (body, end) = read_segment(data, next, "DHT")?;
                tables.read_segment(body)?;
                table_segments += 1;
                pos = end;
            }
            markers::SOS if table_segments > 0 => {
                let (body, end) = read_segment(data, next, "SOS")?;
                pos = end;
                break ScanHeader::parse(body, &frame, &tables)?;
            }
            found => {
                return Err(DngError::UnexpectedMarker {
                    offset: pos,
                    expected: if table_segments == 0 { "DHT" } else { "DHT or SOS" },
                    found,
                });
            }
        }
    };

    let (entropy_coded, end) = destuff(data, pos);
    let differences = decode_differences(&entropy_coded, &frame, &scan, &tables)?;
    expect_marker(data, end, markers::EOI)?;

    Ok(LosslessJpeg {
        frame,
        scan,
        differences,
    })
}
