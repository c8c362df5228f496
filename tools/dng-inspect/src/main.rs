//! Command line inspection of DNG files: tag dumps and PNG previews

mod logger;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dng::{
    as_shot_temperature, CalibrationCache, DemosaicMode, DngDecoder, PreviewOptions, SegmentPolicy, TiffContainer,
    WhiteBalanceMode,
};
use image::RgbImage;
use logger::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "dng-inspect")]
#[command(version, about = "Dump DNG tag directories and render raw previews", long_about = None)]
struct Args {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every directory with decoded tag values
    Dump {
        /// DNG or TIFF file
        input: PathBuf,
    },
    /// Decode the raw image and write an 8-bit sRGB PNG
    Render {
        /// DNG file
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,

        /// Target white temperature in Kelvin (default: as-shot estimate, else 5500)
        #[arg(short, long, value_name = "KELVIN")]
        temperature: Option<f64>,

        /// as-shot-neutral, temperature or none
        #[arg(short, long, default_value_t = WhiteBalanceMode::Temperature)]
        white_balance: WhiteBalanceMode,

        /// Apply CameraCalibration1/2
        #[arg(long)]
        use_camera_calibration: bool,

        /// rggb-linear, grayscale, pixelate or pixelate-punch
        #[arg(short, long, default_value_t = DemosaicMode::RggbLinear)]
        demosaic: DemosaicMode,

        /// skip (leave failed segments black) or abort
        #[arg(long, default_value_t = SegmentPolicy::Skip)]
        segment_policy: SegmentPolicy,
    },
}

fn dump(input: &PathBuf) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let container = TiffContainer::parse(&data).context("parsing TIFF container")?;

    println!("{} ({:?}, {} directories)", input.display(), container.byte_order, container.directories.len());
    for problem in &container.problems {
        println!("problem: {problem}");
    }
    for directory in container.dump() {
        print!("{directory}");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render(
    input: &PathBuf,
    output: &PathBuf,
    temperature: Option<f64>,
    white_balance: WhiteBalanceMode,
    use_camera_calibration: bool,
    demosaic: DemosaicMode,
    segment_policy: SegmentPolicy,
) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let decoder = DngDecoder::new(&data).context("opening raw image")?;

    let estimate = decoder
        .container()
        .view(0)
        .map(|main| as_shot_temperature(&main))
        .transpose()
        .context("reading AsShotWhiteXY")?
        .flatten();
    if let Some(kelvin) = estimate {
        info!(kelvin = kelvin.round(), "as-shot temperature estimate");
    }

    let mut options = PreviewOptions::new()
        .white_balance(white_balance)
        .use_camera_calibration(use_camera_calibration)
        .demosaic(demosaic)
        .segment_policy(segment_policy);
    if let Some(kelvin) = temperature.or(estimate) {
        options = options.temperature(kelvin);
    }

    let dimensions = decoder.dimensions();
    info!(
        width = dimensions.width,
        height = dimensions.height,
        segments = decoder.segments().len(),
        temperature = options.temperature_k,
        "decoding"
    );

    let start = Instant::now();
    let preview = decoder
        .render_preview(&options, &mut CalibrationCache::new())
        .context("rendering preview")?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "rendered");

    for failure in &preview.failures {
        warn!(x0 = failure.segment.x0, y0 = failure.segment.y0, "segment left black: {}", failure.error);
    }

    let image = RgbImage::from_raw(preview.image.width(), preview.image.height(), preview.image.buffer)
        .ok_or_else(|| anyhow!("preview buffer does not match its dimensions"))?;
    image
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), "wrote preview");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    match &args.command {
        Command::Dump { input } => dump(input),
        Command::Render {
            input,
            output,
            temperature,
            white_balance,
            use_camera_calibration,
            demosaic,
            segment_policy,
        } => render(
            input,
            output,
            *temperature,
            *white_balance,
            *use_camera_calibration,
            *demosaic,
            *segment_policy,
        ),
    }
}
