//! Active area geometry and repeating calibration patterns

use crate::{DngError, DngResult, Plane};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Rectangle of the sensor that carries valid image data
///
/// `top`/`left` are inclusive, `bottom`/`right` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ActiveArea {
    pub image_width: u32,
    pub image_height: u32,
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl ActiveArea {
    /// The whole image
    pub fn full(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            top: 0,
            left: 0,
            bottom: image_height,
            right: image_width,
        }
    }

    pub fn new(
        image_width: u32,
        image_height: u32,
        top: u32,
        left: u32,
        bottom: u32,
        right: u32,
    ) -> DngResult<Self> {
        if top >= bottom || left >= right || bottom > image_height || right > image_width {
            return Err(DngError::invalid_tag(
                "ActiveArea",
                format!(
                    "[{top}, {left}, {bottom}, {right}] does not fit a {image_width}x{image_height} image"
                ),
            ));
        }
        Ok(Self {
            image_width,
            image_height,
            top,
            left,
            bottom,
            right,
        })
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.top && row < self.bottom && col >= self.left && col < self.right
    }
}

/// A small tile repeated across the active area
///
/// Lookups use image coordinates and wrap relative to the active area
/// origin, so rows and columns above or left of it still map into the tile.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAreaPattern<T> {
    pub area: ActiveArea,
    pub pattern: Plane<T>,
}

impl<T: Copy + Default> ActiveAreaPattern<T> {
    pub fn new(area: ActiveArea, pattern: Plane<T>) -> DngResult<Self> {
        if pattern.width() == 0 || pattern.height() == 0 {
            return Err(DngError::InvalidDimensions {
                width: pattern.width(),
                height: pattern.height(),
            });
        }
        Ok(Self { area, pattern })
    }

    pub fn rows(&self) -> usize {
        self.pattern.height()
    }

    pub fn cols(&self) -> usize {
        self.pattern.width()
    }

    pub fn get(&self, row: u32, col: u32) -> T {
        let r = (row as i64 - self.area.top as i64).rem_euclid(self.rows() as i64);
        let c = (col as i64 - self.area.left as i64).rem_euclid(self.cols() as i64);
        self.pattern.get(c as usize, r as usize)
    }
}
