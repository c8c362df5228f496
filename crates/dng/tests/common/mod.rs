//! Synthetic DNG files for integration tests
//!
//! [`DngBuilder`] writes a little-endian TIFF whose raw image is split into
//! strips or tiles, each compressed with [`encode_lossless_jpeg`].

#![allow(dead_code)]

use dng::tags;

/// A tag value as written to the file
#[derive(Debug, Clone)]
pub enum Value {
    Byte(Vec<u8>),
    Undefined(Vec<u8>),
    Ascii(&'static str),
    Short(Vec<u16>),
    Long(Vec<u32>),
    /// Written with a denominator of 10000
    Rational(Vec<f64>),
    /// Written with a denominator of 10000
    SRational(Vec<f64>),
}

impl Value {
    fn field_type(&self) -> u16 {
        match self {
            Value::Byte(_) => 1,
            Value::Ascii(_) => 2,
            Value::Short(_) => 3,
            Value::Long(_) => 4,
            Value::Rational(_) => 5,
            Value::Undefined(_) => 7,
            Value::SRational(_) => 10,
        }
    }

    fn count(&self) -> u32 {
        (match self {
            Value::Byte(v) | Value::Undefined(v) => v.len(),
            Value::Ascii(s) => s.len() + 1,
            Value::Short(v) => v.len(),
            Value::Long(v) => v.len(),
            Value::Rational(v) | Value::SRational(v) => v.len(),
        }) as u32
    }

    fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Value::Byte(v) | Value::Undefined(v) => out.extend_from_slice(v),
            Value::Ascii(s) => {
                out.extend_from_slice(s.as_bytes());
                out.push(0);
            }
            Value::Short(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
            Value::Long(v) => v.iter().for_each(|x| out.extend_from_slice(&x.to_le_bytes())),
            Value::Rational(v) => {
                for x in v {
                    out.extend_from_slice(&((x * 10000.0).round() as u32).to_le_bytes());
                    out.extend_from_slice(&10000u32.to_le_bytes());
                }
            }
            Value::SRational(v) => {
                for x in v {
                    out.extend_from_slice(&((x * 10000.0).round() as i32).to_le_bytes());
                    out.extend_from_slice(&10000i32.to_le_bytes());
                }
            }
        }
        out
    }
}

/// Bytes taken by a directory and its out-of-line values
fn directory_len(entries: &[(u16, Value)]) -> u32 {
    let values: usize = entries
        .iter()
        .map(|(_, v)| v.bytes().len())
        .filter(|&len| len > 4)
        .map(|len| len + len % 2)
        .sum();
    (2 + 12 * entries.len() + 4 + values) as u32
}

fn encode_directory(entries: &[(u16, Value)], offset: u32, next: u32) -> Vec<u8> {
    let mut sorted: Vec<&(u16, Value)> = entries.iter().collect();
    sorted.sort_by_key(|(tag, _)| *tag);

    let mut out = Vec::new();
    let mut values = Vec::new();
    let values_start = offset + 2 + 12 * entries.len() as u32 + 4;

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, value) in sorted {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&value.field_type().to_le_bytes());
        out.extend_from_slice(&value.count().to_le_bytes());
        let mut bytes = value.bytes();
        if bytes.len() <= 4 {
            bytes.resize(4, 0);
            out.extend_from_slice(&bytes);
        } else {
            let position = values_start + values.len() as u32;
            out.extend_from_slice(&position.to_le_bytes());
            values.extend_from_slice(&bytes);
            if values.len() % 2 == 1 {
                values.push(0);
            }
        }
    }
    out.extend_from_slice(&next.to_le_bytes());
    out.extend_from_slice(&values);
    out
}

/// MSB-first bit packing with 0xFF byte stuffing
#[derive(Default)]
struct BitWriter {
    out: Vec<u8>,
    acc: u32,
    bits: u32,
}

impl BitWriter {
    fn put(&mut self, value: u32, len: u32) {
        for i in (0..len).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1);
            self.bits += 1;
            if self.bits == 8 {
                let byte = self.acc as u8;
                self.out.push(byte);
                if byte == 0xFF {
                    self.out.push(0x00);
                }
                self.acc = 0;
                self.bits = 0;
            }
        }
    }

    fn finish(mut self) -> Vec<u8> {
        while self.bits != 0 {
            self.put(1, 1);
        }
        self.out
    }
}

fn predict(predictor: u8, ra: i32, rb: i32, rc: i32) -> i32 {
    match predictor {
        1 => ra,
        2 => rb,
        3 => rc,
        4 => ra + rb - rc,
        5 => ra + ((rb - rc) >> 1),
        6 => rb + ((ra - rc) >> 1),
        7 => (ra + rb) >> 1,
        other => panic!("predictor {other} not supported by the test encoder"),
    }
}

fn marker_segment(out: &mut Vec<u8>, marker: u8, body: &[u8]) {
    out.extend_from_slice(&[0xFF, marker]);
    out.extend_from_slice(&((body.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(body);
}

/// Encode samples given in (line, sample, component) order as a SOF3 stream
///
/// Every magnitude category uses a five-bit code equal to the category.
pub fn encode_lossless_jpeg(
    samples: &[u16],
    width: usize,
    height: usize,
    components: usize,
    precision: u8,
    predictor: u8,
) -> Vec<u8> {
    assert_eq!(samples.len(), width * height * components);
    let at = |x: usize, y: usize, c: usize| samples[(y * width + x) * components + c] as i32;

    let mut out = vec![0xFF, 0xD8];

    let mut frame = vec![precision];
    frame.extend_from_slice(&(height as u16).to_be_bytes());
    frame.extend_from_slice(&(width as u16).to_be_bytes());
    frame.push(components as u8);
    for c in 0..components {
        frame.extend_from_slice(&[c as u8 + 1, 0x11, 0]);
    }
    marker_segment(&mut out, 0xC3, &frame);

    let mut table = vec![0x00];
    let mut counts = [0u8; 16];
    counts[4] = 17;
    table.extend_from_slice(&counts);
    table.extend(0..=16u8);
    marker_segment(&mut out, 0xC4, &table);

    let mut scan = vec![components as u8];
    for c in 0..components {
        scan.extend_from_slice(&[c as u8 + 1, 0x00]);
    }
    scan.extend_from_slice(&[predictor, 0, 0]);
    marker_segment(&mut out, 0xDA, &scan);

    let seed = 1i32 << (precision - 1);
    let mut bits = BitWriter::default();
    for y in 0..height {
        for x in 0..width {
            for c in 0..components {
                let prediction = match (x, y) {
                    (0, 0) => seed,
                    (_, 0) => at(x - 1, 0, c),
                    (0, _) => at(0, y - 1, c),
                    _ => predict(predictor, at(x - 1, y, c), at(x, y - 1, c), at(x - 1, y - 1, c)),
                };
                let mut diff = (at(x, y, c) - prediction) & 0xFFFF;
                if diff > 32768 {
                    diff -= 65536;
                }
                let category = if diff == 0 { 0 } else { 32 - diff.unsigned_abs().leading_zeros() };
                bits.put(category, 5);
                if category > 0 && category < 16 {
                    let extra = if diff > 0 { diff } else { diff + (1 << category) - 1 };
                    bits.put(extra as u32, category);
                }
            }
        }
    }
    out.extend(bits.finish());
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Strips { rows_per_strip: u32 },
    Tiles { width: u32, length: u32 },
}

/// Writer for a minimal DNG holding one lossless JPEG raw image
#[derive(Debug, Clone)]
pub struct DngBuilder {
    pub width: u32,
    pub height: u32,
    pub bits: u8,
    pub samples_per_pixel: usize,
    /// JPEG components per segment; each JPEG line packs whole pixels
    pub jpeg_components: usize,
    pub predictor: u8,
    pub layout: Layout,
    /// Interleaved, `width * height * samples_per_pixel`
    pub samples: Vec<u16>,
    pub main_tags: Vec<(u16, Value)>,
    pub raw_tags: Vec<(u16, Value)>,
    pub raw_in_sub_ifd: bool,
    pub self_referential: bool,
    pub corrupt_segment: Option<usize>,
}

impl DngBuilder {
    /// A single-plane mosaic with an identity color matrix calibrated for D65
    pub fn mosaic(width: u32, height: u32, samples: Vec<u16>) -> Self {
        assert_eq!(samples.len(), (width * height) as usize);
        Self {
            width,
            height,
            bits: 12,
            samples_per_pixel: 1,
            jpeg_components: 1,
            predictor: 1,
            layout: Layout::Strips { rows_per_strip: height },
            samples,
            main_tags: vec![
                (tags::DNG_VERSION, Value::Byte(vec![1, 4, 0, 0])),
                (tags::MAKE, Value::Ascii("Synthetic")),
                (tags::UNIQUE_CAMERA_MODEL, Value::Ascii("Synthetic Test Camera")),
                (
                    tags::COLOR_MATRIX_1,
                    Value::SRational(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
                ),
                (tags::CALIBRATION_ILLUMINANT_1, Value::Short(vec![21])),
            ],
            raw_tags: vec![(tags::WHITE_LEVEL, Value::Short(vec![4095]))],
            raw_in_sub_ifd: true,
            self_referential: false,
            corrupt_segment: None,
        }
    }

    /// An RGGB mosaic whose red, green and blue sites hold fixed values
    pub fn flat_rggb(width: u32, height: u32, rgb: [u16; 3]) -> Self {
        let samples = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| match (y % 2, x % 2) {
                    (0, 0) => rgb[0],
                    (1, 1) => rgb[2],
                    _ => rgb[1],
                })
            })
            .collect();
        Self::mosaic(width, height, samples).raw_tag(tags::CFA_REPEAT_PATTERN_DIM, Value::Short(vec![2, 2]))
            .raw_tag(tags::CFA_PATTERN, Value::Byte(vec![0, 1, 1, 2]))
    }

    /// Replace or add a tag of the raw directory
    pub fn raw_tag(mut self, tag: u16, value: Value) -> Self {
        self.raw_tags.retain(|(t, _)| *t != tag);
        self.raw_tags.push((tag, value));
        self
    }

    /// Replace or add a tag of the main directory
    pub fn main_tag(mut self, tag: u16, value: Value) -> Self {
        self.main_tags.retain(|(t, _)| *t != tag);
        self.main_tags.push((tag, value));
        self
    }

    pub fn without_main_tag(mut self, tag: u16) -> Self {
        self.main_tags.retain(|(t, _)| *t != tag);
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn predictor(mut self, predictor: u8) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn jpeg_components(mut self, components: usize) -> Self {
        self.jpeg_components = components;
        self
    }

    pub fn raw_in_ifd0(mut self) -> Self {
        self.raw_in_sub_ifd = false;
        self
    }

    pub fn self_referential(mut self) -> Self {
        self.self_referential = true;
        self
    }

    pub fn corrupt_segment(mut self, index: usize) -> Self {
        self.corrupt_segment = Some(index);
        self
    }

    /// Segment rectangles `(x0, y0, width, height)` in file order
    pub fn segment_rects(&self) -> Vec<(u32, u32, u32, u32)> {
        match self.layout {
            Layout::Strips { rows_per_strip } => (0..self.height)
                .step_by(rows_per_strip as usize)
                .map(|y0| (0, y0, self.width, rows_per_strip.min(self.height - y0)))
                .collect(),
            Layout::Tiles { width, length } => {
                let mut rects = Vec::new();
                for y0 in (0..self.height).step_by(length as usize) {
                    for x0 in (0..self.width).step_by(width as usize) {
                        rects.push((x0, y0, width, length));
                    }
                }
                rects
            }
        }
    }

    /// Samples of one segment
    ///
    /// Tiles past the image edge repeat the last two columns and rows, which
    /// keeps a 2x2 CFA phase intact.
    fn segment_samples(&self, (x0, y0, w, h): (u32, u32, u32, u32)) -> Vec<u16> {
        let spp = self.samples_per_pixel;
        let fold = |v: u32, len: u32| {
            let mut v = v;
            while v >= len {
                v -= 2.min(len);
            }
            v
        };
        let mut out = Vec::with_capacity((w * h) as usize * spp);
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                let (sx, sy) = (fold(x, self.width), fold(y, self.height));
                let i = (sy * self.width + sx) as usize * spp;
                out.extend_from_slice(&self.samples[i..i + spp]);
            }
        }
        out
    }

    fn segment_stream(&self, index: usize, rect: (u32, u32, u32, u32)) -> Vec<u8> {
        if self.corrupt_segment == Some(index) {
            return vec![0x00, 0x01, 0x02, 0x03];
        }
        let samples = self.segment_samples(rect);
        let per_line = rect.2 as usize * self.samples_per_pixel;
        assert_eq!(per_line % self.jpeg_components, 0);
        encode_lossless_jpeg(
            &samples,
            per_line / self.jpeg_components,
            rect.3 as usize,
            self.jpeg_components,
            self.bits,
            self.predictor,
        )
    }

    fn raw_entries(&self, offsets: Vec<u32>, counts: Vec<u32>) -> Vec<(u16, Value)> {
        let spp = self.samples_per_pixel;
        let mut entries = vec![
            (tags::NEW_SUBFILE_TYPE, Value::Long(vec![0])),
            (tags::IMAGE_WIDTH, Value::Long(vec![self.width])),
            (tags::IMAGE_LENGTH, Value::Long(vec![self.height])),
            (tags::BITS_PER_SAMPLE, Value::Short(vec![self.bits as u16; spp])),
            (tags::COMPRESSION, Value::Short(vec![7])),
            (
                tags::PHOTOMETRIC_INTERPRETATION,
                Value::Short(vec![if spp == 1 { 32803 } else { 34892 }]),
            ),
            (tags::SAMPLES_PER_PIXEL, Value::Short(vec![spp as u16])),
        ];
        match self.layout {
            Layout::Strips { rows_per_strip } => {
                entries.push((tags::ROWS_PER_STRIP, Value::Long(vec![rows_per_strip])));
                entries.push((tags::STRIP_OFFSETS, Value::Long(offsets)));
                entries.push((tags::STRIP_BYTE_COUNTS, Value::Long(counts)));
            }
            Layout::Tiles { width, length } => {
                entries.push((tags::TILE_WIDTH, Value::Long(vec![width])));
                entries.push((tags::TILE_LENGTH, Value::Long(vec![length])));
                entries.push((tags::TILE_OFFSETS, Value::Long(offsets)));
                entries.push((tags::TILE_BYTE_COUNTS, Value::Long(counts)));
            }
        }
        for (tag, value) in &self.raw_tags {
            entries.retain(|(t, _)| t != tag);
            entries.push((*tag, value.clone()));
        }
        entries
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![b'I', b'I', 42, 0, 0, 0, 0, 0];
        let mut offsets = Vec::new();
        let mut counts = Vec::new();
        for (index, rect) in self.segment_rects().into_iter().enumerate() {
            let stream = self.segment_stream(index, rect);
            offsets.push(data.len() as u32);
            counts.push(stream.len() as u32);
            data.extend(stream);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }

        let first = data.len() as u32;
        let next = if self.self_referential { first } else { 0 };
        let raw = self.raw_entries(offsets, counts);

        if self.raw_in_sub_ifd {
            let mut main = self.main_tags.clone();
            main.push((tags::NEW_SUBFILE_TYPE, Value::Long(vec![1])));
            main.push((tags::SUB_IFDS, Value::Long(vec![0])));
            let child = first + directory_len(&main);
            main.pop();
            main.push((tags::SUB_IFDS, Value::Long(vec![child])));

            data.extend(encode_directory(&main, first, next));
            data.extend(encode_directory(&raw, child, 0));
        } else {
            let mut entries = raw;
            for (tag, value) in &self.main_tags {
                entries.retain(|(t, _)| t != tag);
                entries.push((*tag, value.clone()));
            }
            data.extend(encode_directory(&entries, first, next));
        }

        data[4..8].copy_from_slice(&first.to_le_bytes());
        data
    }
}

/// Linear value as the decoder computes it, quantized like the preview
pub fn quantize(sample: u16, black: f64, white: f64) -> u8 {
    let linear = ((sample as f64 - black) / (white - black)) as f32;
    (linear.clamp(0.0, 1.0) * 255.0).round() as u8
}
