//! Mapping raw samples to linear reference values
//!
//! Black levels combine a per-component repeating pattern (`BlackLevel`,
//! tiled by `BlackLevelRepeatDim`) with per-column and per-row offsets
//! (`BlackLevelDeltaH`, `BlackLevelDeltaV`), all anchored at the active area.
//! The white scaling of a component uses the largest black level found
//! anywhere in the active area, so it is the same for every pixel.

use dng_container::{active_area, repeat_dim, tags, IfdView, ImageSegment, TiffContainer};
use dng_core::consts::{MAX_BITS_PER_SAMPLE, MIN_BITS_PER_SAMPLE};
use dng_core::{ActiveArea, ActiveAreaPattern, DngError, DngResult, Plane};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Linearizer {
    pub active_area: ActiveArea,
    /// SamplesPerPixel
    pub component_count: usize,
    pub bits_per_sample: u32,
    black_level_by_component: Vec<ActiveAreaPattern<f64>>,
    /// One value per active-area row
    black_level_by_row: ActiveAreaPattern<f64>,
    /// One value per active-area column
    black_level_by_column: ActiveAreaPattern<f64>,
    white_level: Vec<f64>,
    max_black_level: Vec<f64>,
    white_level_scaling: Vec<f64>,
}

/// Real values of `tag`, exactly `count` of them, or `default` repeated
fn reals_or(view: &IfdView<'_, '_>, tag: u16, count: usize, default: f64) -> DngResult<Vec<f64>> {
    Ok(view
        .reals_exact(tag, count)?
        .unwrap_or_else(|| vec![default; count]))
}

/// Largest value of `curve` per residue class of its index modulo `period`
fn max_by_residue(curve: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; period];
    for (i, &v) in curve.iter().enumerate() {
        let slot = &mut out[i % period];
        *slot = Some(slot.map_or(v, |m: f64| m.max(v)));
    }
    out
}

impl Linearizer {
    pub fn from_directory(view: &IfdView<'_, '_>) -> DngResult<Self> {
        let component_count = match view.int(tags::SAMPLES_PER_PIXEL)? {
            None => 1,
            Some(n) if n > 0 && n <= u16::MAX as i64 => n as usize,
            Some(n) => {
                return Err(DngError::invalid_tag(
                    "SamplesPerPixel",
                    format!("{n} is not a positive count"),
                ))
            }
        };

        let bits = view.required_ints(tags::BITS_PER_SAMPLE)?;
        let bits_per_sample = match bits.split_first() {
            Some((&first, rest))
                if rest.iter().all(|&b| b == first)
                    && (MIN_BITS_PER_SAMPLE as i64..=MAX_BITS_PER_SAMPLE as i64).contains(&first) =>
            {
                first as u32
            }
            _ => {
                return Err(DngError::invalid_tag(
                    "BitsPerSample",
                    format!("expected one uniform value in 2..=32, found {bits:?}"),
                ))
            }
        };

        let active_area = active_area(view)?;
        let area_width = active_area.width() as usize;
        let area_height = active_area.height() as usize;

        let (repeat_rows, repeat_cols) = repeat_dim(view, tags::BLACK_LEVEL_REPEAT_DIM)?;
        let pattern = reals_or(
            view,
            tags::BLACK_LEVEL,
            repeat_rows * repeat_cols * component_count,
            0.0,
        )?;
        let black_level_by_component = (0..component_count)
            .map(|component| {
                // Stored as [row][col][component]
                let values = pattern
                    .iter()
                    .skip(component)
                    .step_by(component_count)
                    .copied()
                    .collect();
                ActiveAreaPattern::new(active_area, Plane::from_vec(repeat_cols, repeat_rows, values)?)
            })
            .collect::<DngResult<Vec<_>>>()?;

        let rows = reals_or(view, tags::BLACK_LEVEL_DELTA_V, area_height, 0.0)?;
        let columns = reals_or(view, tags::BLACK_LEVEL_DELTA_H, area_width, 0.0)?;

        let white_level = reals_or(
            view,
            tags::WHITE_LEVEL,
            component_count,
            ((1u64 << bits_per_sample) - 1) as f64,
        )?;
        if let Some(bad) = white_level.iter().find(|&&w| !(w.is_finite() && w > 0.0)) {
            return Err(DngError::invalid_tag("WhiteLevel", format!("{bad} is not positive")));
        }

        // The maximum over the area splits into the pattern cell plus the
        // largest row and column offsets that land on that cell.
        let row_max = max_by_residue(&rows, repeat_rows);
        let column_max = max_by_residue(&columns, repeat_cols);
        let max_black_level: Vec<f64> = black_level_by_component
            .iter()
            .map(|pattern| {
                let mut max = 0.0f64;
                for (r, row_offset) in row_max.iter().enumerate() {
                    for (c, column_offset) in column_max.iter().enumerate() {
                        if let (Some(dv), Some(dh)) = (row_offset, column_offset) {
                            max = max.max(pattern.pattern.get(c, r) + dv + dh);
                        }
                    }
                }
                max
            })
            .collect();

        let white_level_scaling: Vec<f64> = white_level
            .iter()
            .zip(&max_black_level)
            .map(|(w, b)| w - b)
            .collect();
        if let Some(component) = white_level_scaling.iter().position(|&s| s <= 0.0) {
            return Err(DngError::invalid_tag(
                "WhiteLevel",
                format!(
                    "component {component}: white level {} does not exceed black level {}",
                    white_level[component], max_black_level[component]
                ),
            ));
        }

        debug!(
            component_count,
            bits_per_sample,
            ?max_black_level,
            ?white_level,
            "linearizer"
        );

        Ok(Self {
            active_area,
            component_count,
            bits_per_sample,
            black_level_by_component,
            black_level_by_row: ActiveAreaPattern::new(active_area, Plane::from_vec(1, area_height, rows)?)?,
            black_level_by_column: ActiveAreaPattern::new(
                active_area,
                Plane::from_vec(area_width, 1, columns)?,
            )?,
            white_level,
            max_black_level,
            white_level_scaling,
        })
    }

    pub fn black_level(&self, component: usize, row: u32, col: u32) -> f64 {
        let pattern = self.black_level_by_component[component].get(row, col);
        let column = self.black_level_by_column.get(row, col);
        let row = self.black_level_by_row.get(row, col);
        pattern + column + row
    }

    pub fn max_black_level(&self) -> &[f64] {
        &self.max_black_level
    }

    pub fn white_level(&self) -> &[f64] {
        &self.white_level
    }

    pub fn white_level_scaling(&self) -> &[f64] {
        &self.white_level_scaling
    }

    /// `(sample - black) / scaling` for every sample, unclamped
    ///
    /// `top`/`left` are the image coordinates of the planes' first sample.
    pub fn linearize(&self, planes: &[Plane<u16>], top: u32, left: u32) -> DngResult<Vec<Plane<f32>>> {
        if planes.len() != self.component_count {
            return Err(DngError::InvalidParameter(format!(
                "{} planes for {} components",
                planes.len(),
                self.component_count
            )));
        }
        Ok(planes
            .iter()
            .enumerate()
            .map(|(component, plane)| {
                let scaling = self.white_level_scaling[component];
                plane.map(|x, y, sample| {
                    let black = self.black_level(component, top + y as u32, left + x as u32);
                    ((sample as f64 - black) / scaling) as f32
                })
            })
            .collect())
    }

    /// Decode one segment into `[component]` planes of the segment's size
    ///
    /// The JPEG components are read in (line, sample, component) order and
    /// regrouped by `SamplesPerPixel`, so a two-component stream of half
    /// width fills a single full-width plane.
    pub fn sample_image_segment(
        &self,
        container: &TiffContainer<'_>,
        segment: &ImageSegment,
    ) -> DngResult<Vec<Plane<u16>>> {
        let bytes = container
            .scanner
            .slice(segment.offset as usize, segment.byte_count as usize)?;
        let jpeg = dng_ljpeg::decode(bytes.data())?;
        let components = jpeg.reconstruct()?;

        let width = segment.width() as usize;
        let height = segment.height() as usize;
        let expected = width * height * self.component_count;
        let actual = jpeg.width() * jpeg.height() * components.len();
        if expected != actual {
            return Err(DngError::SampleCountMismatch { expected, actual });
        }

        let mut sequential = Vec::with_capacity(actual);
        for y in 0..jpeg.height() {
            for x in 0..jpeg.width() {
                sequential.extend(components.iter().map(|plane| plane.get(x, y)));
            }
        }

        let mut planes: Vec<Plane<u16>> = (0..self.component_count)
            .map(|_| Plane::new(width, height))
            .collect();
        for (i, value) in sequential.into_iter().enumerate() {
            let pixel = i / self.component_count;
            planes[i % self.component_count].set(pixel % width, pixel / width, value);
        }
        Ok(planes)
    }

    pub fn linearize_image_segment(
        &self,
        container: &TiffContainer<'_>,
        segment: &ImageSegment,
    ) -> DngResult<Vec<Plane<f32>>> {
        let samples = self.sample_image_segment(container, segment)?;
        self.linearize(&samples, segment.y0, segment.x0)
    }
}
