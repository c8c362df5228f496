//! Demosaic strategies
//!
//! Each strategy turns a block of linear CFA samples into a camera RGB
//! rectangle of the same size. The block's top-left sample sits at image
//! coordinates `(x0, y0)`; CFA patterns are anchored at the active area
//! origin, so the block must start on a pattern boundary and span a whole
//! number of pattern tiles.

use dng_core::{ActiveArea, ActiveAreaPattern, ColorSpace, DngError, DngResult, Plane, RgbRect};

/// TIFF-EP CFA color codes
pub const CFA_RED: u8 = 0;
pub const CFA_GREEN: u8 = 1;
pub const CFA_BLUE: u8 = 2;

/// CFA codes contributing to each of red, green and blue
///
/// Cyan (3), magenta (4), yellow (5) and white (6) contribute to every
/// primary they contain.
pub const CFA_CONTRIBUTORS: [&[u8]; 3] = [&[0, 4, 5, 6], &[1, 3, 5, 6], &[2, 3, 4, 6]];

pub trait Demosaic: Send + Sync {
    fn demosaic(&self, plane: &Plane<f32>, x0: u32, y0: u32) -> DngResult<RgbRect>;
}

fn check_alignment<T: Copy + Default>(
    pattern: &ActiveAreaPattern<T>,
    plane: &Plane<f32>,
    x0: u32,
    y0: u32,
) -> DngResult<()> {
    let (rows, cols) = (pattern.rows(), pattern.cols());
    if plane.height() % rows != 0 || plane.width() % cols != 0 {
        return Err(DngError::InvalidParameter(format!(
            "{}x{} block is not a multiple of the {cols}x{rows} CFA pattern",
            plane.width(),
            plane.height()
        )));
    }
    let dy = (y0 as i64 - pattern.area.top as i64).rem_euclid(rows as i64);
    let dx = (x0 as i64 - pattern.area.left as i64).rem_euclid(cols as i64);
    if dx != 0 || dy != 0 {
        return Err(DngError::InvalidParameter(format!(
            "block at ({x0}, {y0}) is not aligned with the CFA pattern"
        )));
    }
    Ok(())
}

/// Clamp a neighbour index into `0..len`
#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Bilinear interpolation for 2x2 Bayer patterns
///
/// At red and blue sites, green is the mean of the four orthogonal
/// neighbours and the opposite color the mean of the four diagonal ones. At
/// green sites each missing color is the mean of the two neighbours that
/// carry it, along the row or the column. Lookups past the block edge are
/// clamped to the nearest edge sample.
#[derive(Debug, Clone)]
pub struct BayerBilinear {
    pattern: ActiveAreaPattern<u8>,
}

impl BayerBilinear {
    pub fn new(pattern: ActiveAreaPattern<u8>) -> DngResult<Self> {
        if pattern.rows() != 2 || pattern.cols() != 2 {
            return Err(DngError::UnsupportedFeature(format!(
                "bilinear demosaic of a {}x{} CFA pattern",
                pattern.cols(),
                pattern.rows()
            )));
        }
        let mut colors = pattern.pattern.data().to_vec();
        colors.sort_unstable();
        let greens_diagonal = pattern.pattern.get(0, 0) == pattern.pattern.get(1, 1)
            || pattern.pattern.get(1, 0) == pattern.pattern.get(0, 1);
        if colors != [CFA_RED, CFA_GREEN, CFA_GREEN, CFA_BLUE] || !greens_diagonal {
            return Err(DngError::UnsupportedFeature(format!(
                "bilinear demosaic of CFA pattern {:?}",
                pattern.pattern.data()
            )));
        }
        Ok(Self { pattern })
    }

    /// The common RGGB layout anchored at the active area origin
    pub fn rggb(area: ActiveArea) -> Self {
        let mut tile = Plane::filled(2, 2, CFA_GREEN);
        tile.set(0, 0, CFA_RED);
        tile.set(1, 1, CFA_BLUE);
        Self {
            pattern: ActiveAreaPattern {
                area,
                pattern: tile,
            },
        }
    }
}

impl Demosaic for BayerBilinear {
    fn demosaic(&self, plane: &Plane<f32>, x0: u32, y0: u32) -> DngResult<RgbRect> {
        check_alignment(&self.pattern, plane, x0, y0)?;
        let (width, height) = (plane.width(), plane.height());
        let mut out = RgbRect::new(width, height, ColorSpace::CameraRgb);

        let at = |x: isize, y: isize| plane.get(clamp_index(x, width), clamp_index(y, height));
        let color = |x: usize, y: usize| self.pattern.get(y0 + y as u32, x0 + x as u32);

        for y in 0..height {
            for x in 0..width {
                let (xi, yi) = (x as isize, y as isize);
                let own = plane.get(x, y);
                let orthogonal =
                    (at(xi - 1, yi) + at(xi + 1, yi) + at(xi, yi - 1) + at(xi, yi + 1)) / 4.0;
                let diagonal = (at(xi - 1, yi - 1)
                    + at(xi + 1, yi - 1)
                    + at(xi - 1, yi + 1)
                    + at(xi + 1, yi + 1))
                    / 4.0;
                let horizontal = (at(xi - 1, yi) + at(xi + 1, yi)) / 2.0;
                let vertical = (at(xi, yi - 1) + at(xi, yi + 1)) / 2.0;

                let rgb = match color(x, y) {
                    CFA_RED => [own, orthogonal, diagonal],
                    CFA_BLUE => [diagonal, orthogonal, own],
                    _ => {
                        // The row neighbour's color decides which average is which
                        if color(x ^ 1, y) == CFA_RED {
                            [horizontal, own, vertical]
                        } else {
                            [vertical, own, horizontal]
                        }
                    }
                };
                out.set(x, y, rgb);
            }
        }

        Ok(out)
    }
}

/// Area average over each CFA tile
///
/// Every pixel of a tile receives the per-channel mean of the tile's
/// contributing samples; a channel with no contributor is 0. With `punch`,
/// a site keeps its own sample for the primary it measures.
#[derive(Debug, Clone)]
pub struct Pixelate {
    pattern: ActiveAreaPattern<u8>,
    punch: bool,
}

impl Pixelate {
    pub fn new(pattern: ActiveAreaPattern<u8>, punch: bool) -> Self {
        Self { pattern, punch }
    }
}

impl Demosaic for Pixelate {
    fn demosaic(&self, plane: &Plane<f32>, x0: u32, y0: u32) -> DngResult<RgbRect> {
        check_alignment(&self.pattern, plane, x0, y0)?;
        let (rows, cols) = (self.pattern.rows(), self.pattern.cols());
        let mut out = RgbRect::new(plane.width(), plane.height(), ColorSpace::CameraRgb);
        let color = |x: usize, y: usize| self.pattern.get(y0 + y as u32, x0 + x as u32);

        for ty in (0..plane.height()).step_by(rows) {
            for tx in (0..plane.width()).step_by(cols) {
                let mut sums = [0.0f32; 3];
                let mut counts = [0u32; 3];
                for y in ty..ty + rows {
                    for x in tx..tx + cols {
                        let site = color(x, y);
                        for (channel, members) in CFA_CONTRIBUTORS.iter().enumerate() {
                            if members.contains(&site) {
                                sums[channel] += plane.get(x, y);
                                counts[channel] += 1;
                            }
                        }
                    }
                }
                let mean: [f32; 3] = std::array::from_fn(|c| {
                    if counts[c] == 0 {
                        0.0
                    } else {
                        sums[c] / counts[c] as f32
                    }
                });

                for y in ty..ty + rows {
                    for x in tx..tx + cols {
                        let mut rgb = mean;
                        if self.punch {
                            let site = color(x, y);
                            if site <= CFA_BLUE {
                                rgb[site as usize] = plane.get(x, y);
                            }
                        }
                        out.set(x, y, rgb);
                    }
                }
            }
        }

        Ok(out)
    }
}

/// Broadcast each sample to all three channels
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl Demosaic for Grayscale {
    fn demosaic(&self, plane: &Plane<f32>, _x0: u32, _y0: u32) -> DngResult<RgbRect> {
        let data = plane.data().iter().flat_map(|&v| [v, v, v]).collect();
        RgbRect::from_vec(plane.width(), plane.height(), ColorSpace::CameraRgb, data)
    }
}
