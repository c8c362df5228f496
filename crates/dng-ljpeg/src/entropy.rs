//! Entropy-coded segment decoding

use crate::{FrameHeader, HuffmanTables, ScanHeader};
use dng_bitstream::BitReader;
use dng_core::consts::SSSS16_DIFFERENCE;
use dng_core::{DngError, DngResult, Plane};

/// Remove byte stuffing from the entropy-coded data starting at `start`
///
/// `FF 00` becomes `FF`; `FF` followed by anything else ends the data. Returns
/// the destuffed bytes and the offset of the terminating marker (or the end
/// of `data` when no marker follows).
pub fn destuff(data: &[u8], start: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(data.len().saturating_sub(start));
    let mut pos = start;
    while pos < data.len() {
        let byte = data[pos];
        if byte == 0xFF {
            if data.get(pos + 1) == Some(&0x00) {
                out.push(0xFF);
                pos += 2;
                continue;
            }
            return (out, pos);
        }
        out.push(byte);
        pos += 1;
    }
    (out, pos)
}

/// Map a magnitude category and its additional bits to a difference
///
/// Category 0 is 0 and category 16 is 32768 with no additional bits. For
/// the rest, values with the top bit set are positive and smaller ones
/// encode `bits - 2^ssss + 1`.
#[inline]
pub fn magnitude_to_difference(ssss: u8, bits: u16) -> i32 {
    match ssss {
        0 => 0,
        16 => SSSS16_DIFFERENCE,
        _ => {
            let bits = bits as i32;
            if bits >= 1 << (ssss - 1) {
                bits
            } else {
                bits - (1 << ssss) + 1
            }
        }
    }
}

/// Decode per-component difference planes in raster order (line, sample, component)
pub fn decode_differences(
    data: &[u8],
    frame: &FrameHeader,
    scan: &ScanHeader,
    tables: &HuffmanTables,
) -> DngResult<Vec<Plane<i32>>> {
    let width = frame.samples_per_line as usize;
    let height = frame.lines as usize;

    let mut selected = Vec::with_capacity(scan.components.len());
    for component in &scan.components {
        selected.push(tables.get(component.table).ok_or(DngError::MissingHuffmanTable {
            component: component.id,
            table: component.table,
        })?);
    }

    let mut planes: Vec<Plane<i32>> = (0..selected.len()).map(|_| Plane::new(width, height)).collect();
    let mut reader = BitReader::new(data);

    for y in 0..height {
        for x in 0..width {
            for (plane, table) in planes.iter_mut().zip(&selected) {
                let ssss = table.decode(&mut reader)?;
                let bits = match ssss {
                    0 | 16 => 0,
                    n => reader.read_bits(n as usize)?,
                };
                plane.set(x, y, magnitude_to_difference(ssss, bits));
            }
        }
    }

    let consumed_bits = reader.byte_offset() * 8 + reader.bit_offset();
    if consumed_bits > data.len() * 8 {
        return Err(DngError::invalid_header(
            "SOS",
            format!(
                "entropy-coded data truncated: {} bytes hold fewer than the {consumed_bits} bits decoded",
                data.len()
            ),
        ));
    }

    Ok(planes)
}
