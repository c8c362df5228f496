//! Active area and CFA pattern tags

use crate::{tags, IfdView};
use dng_core::{ActiveArea, ActiveAreaPattern, DngError, DngResult, Plane};

fn dimension(view: &IfdView<'_, '_>, tag: u16) -> DngResult<u32> {
    let value = view.required_int(tag)?;
    u32::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| DngError::invalid_tag(tags::display_name(tag), format!("{value} is not a valid dimension")))
}

/// The ActiveArea of a directory, defaulting to the whole image
pub fn active_area(view: &IfdView<'_, '_>) -> DngResult<ActiveArea> {
    let width = dimension(view, tags::IMAGE_WIDTH)?;
    let height = dimension(view, tags::IMAGE_LENGTH)?;

    let Some(values) = view.ints(tags::ACTIVE_AREA)? else {
        return Ok(ActiveArea::full(width, height));
    };
    let bounds: Vec<u32> = values
        .iter()
        .map(|&v| u32::try_from(v).ok())
        .collect::<Option<Vec<_>>>()
        .filter(|b| b.len() == 4)
        .ok_or_else(|| {
            DngError::invalid_tag("ActiveArea", format!("expected 4 non-negative values, found {values:?}"))
        })?;

    ActiveArea::new(width, height, bounds[0], bounds[1], bounds[2], bounds[3])
}

/// Repeat dimensions `[rows, cols]` of a pattern tag, defaulting to 1x1
pub fn repeat_dim(view: &IfdView<'_, '_>, tag: u16) -> DngResult<(usize, usize)> {
    match view.ints(tag)? {
        None => Ok((1, 1)),
        Some(v) if v.len() == 2 && v[0] > 0 && v[1] > 0 && v[0] <= 64 && v[1] <= 64 => {
            Ok((v[0] as usize, v[1] as usize))
        }
        Some(v) => Err(DngError::invalid_tag(
            tags::display_name(tag),
            format!("expected two values in 1..=64, found {v:?}"),
        )),
    }
}

/// The CFA color pattern anchored at the active area origin
///
/// Colors use the TIFF-EP codes (0 red, 1 green, 2 blue, ...). `None` when
/// the directory carries no `CFAPattern`.
pub fn cfa_pattern(view: &IfdView<'_, '_>) -> DngResult<Option<ActiveAreaPattern<u8>>> {
    let Some(colors) = view.ints_or_bytes(tags::CFA_PATTERN)? else {
        return Ok(None);
    };
    let (rows, cols) = repeat_dim(view, tags::CFA_REPEAT_PATTERN_DIM)?;
    if colors.len() != rows * cols {
        return Err(DngError::invalid_tag(
            "CFAPattern",
            format!("expected {} values for a {rows}x{cols} pattern, found {}", rows * cols, colors.len()),
        ));
    }
    let colors: Vec<u8> = colors
        .into_iter()
        .map(|c| u8::try_from(c).map_err(|_| DngError::invalid_tag("CFAPattern", format!("color {c} out of range"))))
        .collect::<DngResult<_>>()?;

    let pattern = Plane::from_vec(cols, rows, colors)?;
    Ok(Some(ActiveAreaPattern::new(active_area(view)?, pattern)?))
}
