//! Image data structures

use crate::{ColorSpace, Dimensions, DngError, DngResult};

/// Dense row-major single-channel rectangle
///
/// Used for raw samples, linearized planes and calibration patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> Plane<T> {
    /// Create a plane filled with `T::default()`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap row-major data, which must hold exactly `width * height` samples
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> DngResult<Self> {
        if data.len() != width * height {
            return Err(DngError::SampleCountMismatch {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Produce a new plane of the same size by mapping every sample
    pub fn map<U, F>(&self, mut f: F) -> Plane<U>
    where
        F: FnMut(usize, usize, T) -> U,
    {
        let mut data = Vec::with_capacity(self.data.len());
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(f(x, y, self.get(x, y)));
            }
        }
        Plane {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Dense row-major three-channel `f32` rectangle tagged with its color space
#[derive(Debug, Clone, PartialEq)]
pub struct RgbRect {
    width: usize,
    height: usize,
    space: ColorSpace,
    data: Vec<f32>,
}

impl RgbRect {
    pub fn new(width: usize, height: usize, space: ColorSpace) -> Self {
        Self {
            width,
            height,
            space,
            data: vec![0.0; width * height * 3],
        }
    }

    pub fn from_vec(
        width: usize,
        height: usize,
        space: ColorSpace,
        data: Vec<f32>,
    ) -> DngResult<Self> {
        if data.len() != width * height * 3 {
            return Err(DngError::SampleCountMismatch {
                expected: width * height * 3,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            space,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) * 3
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        let i = self.index(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Produce a new rectangle in `space` by mapping every pixel
    pub fn map_pixels<F>(&self, space: ColorSpace, mut f: F) -> RgbRect
    where
        F: FnMut([f32; 3]) -> [f32; 3],
    {
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(3) {
            data.extend_from_slice(&f([px[0], px[1], px[2]]));
        }
        RgbRect {
            width: self.width,
            height: self.height,
            space,
            data,
        }
    }

    /// Quantize to 8-bit, clamping each channel to [0, 1]
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }
}

/// Full-frame 8-bit RGB image assembled from rendered segments
#[derive(Debug, Clone)]
pub struct Image {
    pub dimensions: Dimensions,
    pub buffer: Vec<u8>,
}

impl Image {
    pub fn new(dimensions: Dimensions) -> DngResult<Self> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(DngError::InvalidDimensions {
                width: dimensions.width as usize,
                height: dimensions.height as usize,
            });
        }

        Ok(Self {
            dimensions,
            buffer: vec![0; dimensions.pixel_count() * 3],
        })
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width() as usize) + x as usize) * 3;
        [self.buffer[i], self.buffer[i + 1], self.buffer[i + 2]]
    }

    /// Copy an interleaved RGB8 block to `(x0, y0)`
    ///
    /// Parts of the block that fall outside the image are dropped; unclipped
    /// tiles on the right and bottom edges rely on this.
    pub fn blit(&mut self, x0: u32, y0: u32, width: usize, height: usize, rgb: &[u8]) {
        let frame_w = self.width() as usize;
        let frame_h = self.height() as usize;
        let (x0, y0) = (x0 as usize, y0 as usize);
        if x0 >= frame_w || y0 >= frame_h {
            return;
        }
        let copy_w = width.min(frame_w - x0);
        let copy_h = height.min(frame_h - y0);

        for row in 0..copy_h {
            let src = row * width * 3;
            let dst = ((y0 + row) * frame_w + x0) * 3;
            self.buffer[dst..dst + copy_w * 3].copy_from_slice(&rgb[src..src + copy_w * 3]);
        }
    }
}
