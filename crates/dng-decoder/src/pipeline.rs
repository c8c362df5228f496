//! Raw decoding and preview rendering

use crate::{
    CalibrationCache, CalibrationKey, DemosaicMode, Linearizer, PreviewOptions, SegmentPolicy, WhiteBalanceMode,
};
use dng_color::{AsShotNeutralFilter, Filter, ScaleFilter, TemperatureFilter, XyzD50ToSrgb};
use dng_container::{
    cfa_pattern, read_image_segments, tags, DirectoryDump, IfdView, ImageSegment, ParseOptions, TiffContainer,
};
use dng_core::{ActiveAreaPattern, ColorSpace, Dimensions, DngError, DngResult, Image, Plane, RgbRect};
use dng_transform::{BayerBilinear, Demosaic, Grayscale, Pixelate};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

/// Directory holding the calibration tags
const MAIN_DIRECTORY: usize = 0;

/// A rendered full-frame preview
#[derive(Debug)]
pub struct Preview {
    pub image: Image,
    /// Segments left black under [`SegmentPolicy::Skip`]
    pub failures: Vec<SegmentFailure>,
}

#[derive(Debug)]
pub struct SegmentFailure {
    pub segment: ImageSegment,
    pub error: DngError,
}

/// Color stages applied after demosaicing
pub struct ColorStages {
    filters: Vec<Box<dyn Filter>>,
}

impl ColorStages {
    pub fn apply(&self, rect: RgbRect) -> DngResult<RgbRect> {
        self.filters.iter().try_fold(rect, |rect, filter| filter.apply(&rect))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Decoder for the raw image of one DNG buffer
pub struct DngDecoder<'a> {
    container: TiffContainer<'a>,
    raw_index: usize,
    linearizer: Linearizer,
    segments: Vec<ImageSegment>,
    cfa: Option<ActiveAreaPattern<u8>>,
}

impl<'a> DngDecoder<'a> {
    pub fn new(data: &'a [u8]) -> DngResult<Self> {
        Self::with_options(data, ParseOptions::default())
    }

    pub fn with_options(data: &'a [u8], options: ParseOptions) -> DngResult<Self> {
        let container = TiffContainer::parse_with(data, options)?;
        Self::from_container(container)
    }

    /// Select the raw directory (the last with `NewSubfileType = 0`) and
    /// read everything needed to decode its segments
    pub fn from_container(container: TiffContainer<'a>) -> DngResult<Self> {
        let raw_index = container.raw_directory_index().ok_or(DngError::NoRawDirectory)?;
        let view = container.view(raw_index).ok_or(DngError::NoRawDirectory)?;

        let compression = view.required_int(tags::COMPRESSION)?;
        if compression != tags::COMPRESSION_LOSSLESS_JPEG {
            return Err(DngError::UnsupportedFeature(format!(
                "raw image compression {compression} (only lossless JPEG is decoded)"
            )));
        }

        let linearizer = Linearizer::from_directory(&view)?;
        let segments = read_image_segments(&view)?;
        let cfa = cfa_pattern(&view)?;
        debug!(
            raw_index,
            segments = segments.len(),
            cfa = cfa.is_some(),
            "raw directory"
        );

        Ok(Self {
            container,
            raw_index,
            linearizer,
            segments,
            cfa,
        })
    }

    pub fn container(&self) -> &TiffContainer<'a> {
        &self.container
    }

    /// Recoverable problems found while parsing the container
    pub fn problems(&self) -> &[String] {
        &self.container.problems
    }

    pub fn raw_directory_index(&self) -> usize {
        self.raw_index
    }

    pub fn raw_directory(&self) -> IfdView<'_, 'a> {
        IfdView {
            container: &self.container,
            ifd: &self.container.directories[self.raw_index],
        }
    }

    pub fn linearizer(&self) -> &Linearizer {
        &self.linearizer
    }

    pub fn segments(&self) -> &[ImageSegment] {
        &self.segments
    }

    pub fn cfa_pattern(&self) -> Option<&ActiveAreaPattern<u8>> {
        self.cfa.as_ref()
    }

    pub fn dimensions(&self) -> Dimensions {
        let area = &self.linearizer.active_area;
        Dimensions::new(area.image_width, area.image_height)
    }

    pub fn tag_dump(&self) -> Vec<DirectoryDump> {
        self.container.dump()
    }

    /// Linearized planes of one segment
    #[instrument(level = "debug", skip(self), fields(x0 = segment.x0, y0 = segment.y0))]
    pub fn decode_segment(&self, segment: &ImageSegment) -> DngResult<Vec<Plane<f32>>> {
        self.linearizer
            .linearize_image_segment(&self.container, segment)
            .map_err(|err| err.in_segment(segment.x0, segment.y0))
    }

    pub fn demosaicer(&self, mode: DemosaicMode) -> DngResult<Box<dyn Demosaic>> {
        let area = self.linearizer.active_area;
        let demosaic: Box<dyn Demosaic> = match mode {
            DemosaicMode::RggbLinear => match &self.cfa {
                Some(pattern) => Box::new(BayerBilinear::new(pattern.clone())?),
                None => Box::new(BayerBilinear::rggb(area)),
            },
            DemosaicMode::Pixelate | DemosaicMode::PixelatePunch => {
                let pattern = self.cfa.clone().ok_or_else(|| DngError::missing_tag("CFAPattern"))?;
                Box::new(Pixelate::new(pattern, mode == DemosaicMode::PixelatePunch))
            }
            DemosaicMode::Grayscale => Box::new(Grayscale),
        };
        Ok(demosaic)
    }

    /// White balance and display conversion for `options`
    pub fn color_stages(&self, options: &PreviewOptions, cache: &mut CalibrationCache) -> DngResult<ColorStages> {
        let main = self
            .container
            .view(MAIN_DIRECTORY)
            .ok_or(DngError::NoRawDirectory)?;
        let filters: Vec<Box<dyn Filter>> = match options.white_balance {
            WhiteBalanceMode::AsShotNeutral => {
                vec![Box::new(AsShotNeutralFilter::from_directory(&main)?) as Box<dyn Filter>]
            }
            WhiteBalanceMode::Temperature => {
                let key = CalibrationKey::new(MAIN_DIRECTORY, options.temperature_k, options.use_camera_calibration);
                let calibration = cache.get_or_build(&self.container, key)?;
                vec![
                    Box::new(TemperatureFilter::new(&calibration)?) as Box<dyn Filter>,
                    Box::new(XyzD50ToSrgb),
                ]
            }
            WhiteBalanceMode::None => vec![Box::new(ScaleFilter::identity()) as Box<dyn Filter>],
        };
        Ok(ColorStages { filters })
    }

    /// Camera RGB of one segment, before any color stage
    pub fn demosaic_segment(&self, segment: &ImageSegment, demosaic: &dyn Demosaic) -> DngResult<RgbRect> {
        let planes = self.decode_segment(segment)?;
        let rect = match planes.as_slice() {
            [mosaic] => demosaic.demosaic(mosaic, segment.x0, segment.y0),
            [r, g, b] => {
                let data = r
                    .data()
                    .iter()
                    .zip(g.data())
                    .zip(b.data())
                    .flat_map(|((&r, &g), &b)| [r, g, b])
                    .collect();
                RgbRect::from_vec(r.width(), r.height(), ColorSpace::CameraRgb, data)
            }
            other => Err(DngError::UnsupportedFeature(format!(
                "rendering {} color planes",
                other.len()
            ))),
        };
        rect.map_err(|err| err.in_segment(segment.x0, segment.y0))
    }

    pub fn render_segment(
        &self,
        segment: &ImageSegment,
        demosaic: &dyn Demosaic,
        stages: &ColorStages,
    ) -> DngResult<RgbRect> {
        let camera = self.demosaic_segment(segment, demosaic)?;
        stages
            .apply(camera)
            .map_err(|err| err.in_segment(segment.x0, segment.y0))
    }

    /// Decode and render every segment in parallel into one 8-bit image
    #[instrument(skip_all, fields(segments = self.segments.len(), demosaic = %options.demosaic))]
    pub fn render_preview(&self, options: &PreviewOptions, cache: &mut CalibrationCache) -> DngResult<Preview> {
        let demosaic = self.demosaicer(options.demosaic)?;
        let stages = self.color_stages(options, cache)?;

        let rendered: Vec<(ImageSegment, DngResult<Vec<u8>>)> = self
            .segments
            .par_iter()
            .map(|segment| {
                let result = self
                    .render_segment(segment, demosaic.as_ref(), &stages)
                    .map(|rect| rect.to_rgb8());
                (*segment, result)
            })
            .collect();

        let mut image = Image::new(self.dimensions())?;
        let mut failures = Vec::new();
        for (segment, result) in rendered {
            match result {
                Ok(rgb) => image.blit(
                    segment.x0,
                    segment.y0,
                    segment.width() as usize,
                    segment.height() as usize,
                    &rgb,
                ),
                Err(error) if options.segment_policy == SegmentPolicy::Skip => {
                    warn!(x0 = segment.x0, y0 = segment.y0, %error, "skipping segment");
                    failures.push(SegmentFailure { segment, error });
                }
                Err(error) => return Err(error),
            }
        }

        debug!(failed = failures.len(), "preview rendered");
        Ok(Preview { image, failures })
    }
}
