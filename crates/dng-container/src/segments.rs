//! Strip and tile layouts

use crate::{tags, IfdView};
use dng_core::{DngError, DngResult};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One independently compressed piece of an image
///
/// `x1`/`y1` are exclusive. Strips are clipped to the image height; tiles
/// keep their full size and may extend past the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ImageSegment {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    pub offset: u64,
    pub byte_count: u64,
    pub tile_width: Option<u32>,
    pub tile_length: Option<u32>,
}

impl ImageSegment {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

fn positive(view: &IfdView<'_, '_>, tag: u16) -> DngResult<Option<u32>> {
    match view.int(tag)? {
        None => Ok(None),
        Some(v) if v > 0 && v <= u32::MAX as i64 => Ok(Some(v as u32)),
        Some(v) => Err(DngError::invalid_tag(
            tags::display_name(tag),
            format!("{v} is not a positive 32-bit value"),
        )),
    }
}

fn locations(view: &IfdView<'_, '_>, offsets_tag: u16, counts_tag: u16, expected: usize) -> DngResult<Vec<(u64, u64)>> {
    let offsets = view.required_ints(offsets_tag)?;
    let counts = view.required_ints(counts_tag)?;
    for (tag, values) in [(offsets_tag, &offsets), (counts_tag, &counts)] {
        if values.len() != expected {
            return Err(DngError::invalid_tag(
                tags::display_name(tag),
                format!("expected {expected} values, found {}", values.len()),
            ));
        }
    }
    let unsigned = |tag: u16, v: i64| {
        u64::try_from(v)
            .map_err(|_| DngError::invalid_tag(tags::display_name(tag), format!("negative value {v}")))
    };
    offsets
        .into_iter()
        .zip(counts)
        .map(|(o, c)| Ok((unsigned(offsets_tag, o)?, unsigned(counts_tag, c)?)))
        .collect()
}

/// Resolve the strip or tile layout of a directory
pub fn read_image_segments(view: &IfdView<'_, '_>) -> DngResult<Vec<ImageSegment>> {
    let width = positive(view, tags::IMAGE_WIDTH)?
        .ok_or_else(|| DngError::missing_tag("ImageWidth"))?;
    let height = positive(view, tags::IMAGE_LENGTH)?
        .ok_or_else(|| DngError::missing_tag("ImageLength"))?;

    let has_strips = view.has(tags::ROWS_PER_STRIP);
    let has_tiles = view.has(tags::TILE_WIDTH) || view.has(tags::TILE_LENGTH);

    match (has_strips, has_tiles) {
        (true, true) => Err(DngError::AmbiguousLayout),
        (false, false) => Err(DngError::NoSegmentLayout),
        (true, false) => {
            let rows_per_strip = positive(view, tags::ROWS_PER_STRIP)?
                .ok_or_else(|| DngError::missing_tag("RowsPerStrip"))?;
            let count = height.div_ceil(rows_per_strip) as usize;
            let places = locations(view, tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS, count)?;

            Ok(places
                .into_iter()
                .enumerate()
                .map(|(i, (offset, byte_count))| {
                    let y0 = i as u32 * rows_per_strip;
                    ImageSegment {
                        x0: 0,
                        y0,
                        x1: width,
                        y1: y0.saturating_add(rows_per_strip).min(height),
                        offset,
                        byte_count,
                        tile_width: None,
                        tile_length: None,
                    }
                })
                .collect())
        }
        (false, true) => {
            let tile_width = positive(view, tags::TILE_WIDTH)?
                .ok_or_else(|| DngError::missing_tag("TileWidth"))?;
            let tile_length = positive(view, tags::TILE_LENGTH)?
                .ok_or_else(|| DngError::missing_tag("TileLength"))?;
            let across = width.div_ceil(tile_width);
            let down = height.div_ceil(tile_length);
            let count = (across as usize) * (down as usize);
            let places = locations(view, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS, count)?;

            // Grid origins stay inside the image; the far edges may not fit
            let past_edge = |tag: u16, start: u32| {
                DngError::invalid_tag(
                    tags::display_name(tag),
                    format!("tile starting at {start} ends beyond 32-bit coordinates"),
                )
            };
            places
                .into_iter()
                .enumerate()
                .map(|(i, (offset, byte_count))| {
                    let x0 = (i as u32 % across) * tile_width;
                    let y0 = (i as u32 / across) * tile_length;
                    Ok(ImageSegment {
                        x0,
                        y0,
                        x1: x0
                            .checked_add(tile_width)
                            .ok_or_else(|| past_edge(tags::TILE_WIDTH, x0))?,
                        y1: y0
                            .checked_add(tile_length)
                            .ok_or_else(|| past_edge(tags::TILE_LENGTH, y0))?,
                        offset,
                        byte_count,
                        tile_width: Some(tile_width),
                        tile_length: Some(tile_length),
                    })
                })
                .collect()
        }
    }
}
