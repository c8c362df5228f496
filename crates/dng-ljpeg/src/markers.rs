//! Marker codes and segment framing

use dng_core::{DngError, DngResult};

pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOF3: u8 = 0xC3;
pub const DHT: u8 = 0xC4;
pub const SOS: u8 = 0xDA;

pub fn marker_name(code: u8) -> &'static str {
    match code {
        SOI => "SOI",
        EOI => "EOI",
        SOF3 => "SOF3",
        DHT => "DHT",
        SOS => "SOS",
        0xC0..=0xC2 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => "SOFn",
        0xCC => "DAC",
        0xD0..=0xD7 => "RSTn",
        0xDB => "DQT",
        0xDD => "DRI",
        0xE0..=0xEF => "APPn",
        0xFE => "COM",
        _ => "unknown",
    }
}

/// Code of the marker at `offset`, skipping `0xFF` fill bytes
///
/// Returns the marker code and the offset just past it.
pub fn read_marker(data: &[u8], offset: usize) -> DngResult<(u8, usize)> {
    let mut pos = offset;
    if data.get(pos) != Some(&0xFF) {
        return Err(DngError::UnexpectedMarker {
            offset,
            expected: "marker",
            found: data.get(pos).copied().unwrap_or(0),
        });
    }
    while data.get(pos + 1) == Some(&0xFF) {
        pos += 1;
    }
    match data.get(pos + 1) {
        Some(&code) => Ok((code, pos + 2)),
        None => Err(DngError::invalid_header("marker", format!("stream ends at offset {offset}"))),
    }
}

/// Require a specific marker at `offset`
pub fn expect_marker(data: &[u8], offset: usize, code: u8) -> DngResult<usize> {
    let (found, next) = read_marker(data, offset)?;
    if found != code {
        return Err(DngError::UnexpectedMarker {
            offset,
            expected: marker_name(code),
            found,
        });
    }
    Ok(next)
}

/// The body of a length-prefixed marker segment starting at `offset`
///
/// The returned body excludes the two length bytes. Also returns the offset
/// just past the segment.
pub fn read_segment<'a>(data: &'a [u8], offset: usize, name: &'static str) -> DngResult<(&'a [u8], usize)> {
    let header = data
        .get(offset..offset + 2)
        .ok_or_else(|| DngError::invalid_header(name, "missing length field"))?;
    let length = u16::from_be_bytes([header[0], header[1]]) as usize;
    if length < 2 {
        return Err(DngError::invalid_header(name, format!("length {length} is too short")));
    }
    let end = offset + length;
    let body = data.get(offset + 2..end).ok_or_else(|| {
        DngError::invalid_header(
            name,
            format!("length {length} at offset {offset} runs past the end of the data ({})", data.len()),
        )
    })?;
    Ok((body, end))
}
