use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use face_sampler_core::capture::infrastructure::image_file_writer::ImageFileWriter;
use face_sampler_core::pipeline::inspect_samples_use_case::InspectSamplesUseCase;
use face_sampler_core::shared::settings::SamplerSettings;

/// Largest `inspect --scale`; a 64 px sample becomes 4096 px.
const MAX_INSPECT_SCALE: u32 = 64;

/// Capture normalized face samples from a camera or a recorded video.
#[derive(Parser)]
#[command(name = "face-sampler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive capture loop ('a' captures a sample, 'q' quits).
    Capture(CaptureArgs),
    /// Render stored samples to PNG files.
    Inspect(InspectArgs),
}

#[derive(Args)]
struct CaptureArgs {
    /// Replay a video file instead of opening a camera.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Camera device index.
    #[arg(long)]
    camera: Option<i32>,

    /// File that receives one line per captured sample.
    #[arg(long, default_value = "samples.csv")]
    output: PathBuf,

    /// Append to the output file instead of truncating it.
    #[arg(long)]
    append: bool,

    /// Haar cascade XML for faces.
    #[arg(long)]
    face_cascade: Option<PathBuf>,

    /// Haar cascade XML for eyes.
    #[arg(long)]
    eye_cascade: Option<PathBuf>,

    /// Side length of a stored sample in pixels.
    #[arg(long)]
    sample_size: Option<u32>,

    /// Settings JSON file (defaults to the per-user config file).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings back to the settings file before capturing.
    #[arg(long)]
    save_settings: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Samples file written by `capture`.
    samples: PathBuf,

    /// Directory for the rendered images.
    #[arg(long)]
    output_dir: PathBuf,

    /// Render at most this many samples.
    #[arg(long)]
    limit: Option<usize>,

    /// Integer upscale factor for the rendered images.
    #[arg(long, default_value = "4")]
    scale: u32,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Capture(args) => {
            validate_capture(&args)?;
            let settings = merged_settings(&args)?;
            if args.save_settings {
                save_settings(&args, &settings)?;
            }
            run_capture(&args, &settings)
        }
        Command::Inspect(args) => {
            validate_inspect(&args)?;
            run_inspect(&args)
        }
    }
}

fn run_inspect(args: &InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let use_case = InspectSamplesUseCase::new(Box::new(ImageFileWriter::new()), args.scale, args.limit);
    let written = use_case.execute(&args.samples, &args.output_dir)?;
    log::info!(
        "Rendered {} samples to {}",
        written.len(),
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(feature = "opencv")]
fn run_capture(
    args: &CaptureArgs,
    settings: &SamplerSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    use face_sampler_core::capture::domain::frame_source::FrameSource;
    use face_sampler_core::capture::domain::sample_writer::SampleWriter;
    use face_sampler_core::capture::infrastructure::csv_sample_writer::CsvSampleWriter;
    use face_sampler_core::capture::infrastructure::ffmpeg_frame_source::FfmpegFrameSource;
    use face_sampler_core::capture::infrastructure::highgui_display::{HighguiDisplay, HighguiKeys};
    use face_sampler_core::capture::infrastructure::opencv_camera::OpencvCamera;
    use face_sampler_core::detection::infrastructure::cascade_detector::{
        CascadeParams, HaarCascadeDetector,
    };
    use face_sampler_core::pipeline::capture_session_use_case::CaptureSessionUseCase;
    use face_sampler_core::pipeline::frame_processor::FrameProcessor;
    use face_sampler_core::pipeline::session_logger::LogSessionLogger;
    use face_sampler_core::shared::cascade_resolver;
    use face_sampler_core::shared::constants::{
        EYE_CASCADE_NAME, EYE_CASCADE_URL, FACE_CASCADE_NAME, FACE_CASCADE_URL,
    };

    let search_dirs = cascade_resolver::default_search_dirs();
    let face_path = cascade_resolver::resolve(
        FACE_CASCADE_NAME,
        settings.face_cascade.as_deref(),
        &search_dirs,
        FACE_CASCADE_URL,
        Some(Box::new(|d, t| download_progress("face", d, t))),
    )?;
    let eye_path = cascade_resolver::resolve(
        EYE_CASCADE_NAME,
        settings.eye_cascade.as_deref(),
        &search_dirs,
        EYE_CASCADE_URL,
        Some(Box::new(|d, t| download_progress("eye", d, t))),
    )?;

    let face_detector = HaarCascadeDetector::load(
        &face_path,
        CascadeParams::new(settings.face_scale_factor, settings.face_min_neighbors),
    )?;
    let eye_detector = HaarCascadeDetector::load(
        &eye_path,
        CascadeParams::new(settings.eye_scale_factor, settings.eye_min_neighbors),
    )?;
    log::info!(
        "Loaded cascades {} and {}",
        face_path.display(),
        eye_path.display()
    );

    let source: Box<dyn FrameSource> = match &args.input {
        Some(path) => Box::new(FfmpegFrameSource::open(path)?),
        None => Box::new(OpencvCamera::open(settings.camera_index)?),
    };

    let writer = if args.append {
        CsvSampleWriter::append_to(&args.output)
    } else {
        CsvSampleWriter::create(&args.output)
    }
    .map_err(|e| format!("Cannot open {}: {e}", args.output.display()))?;
    let writer: Box<dyn SampleWriter> = Box::new(writer);

    let mut use_case = CaptureSessionUseCase::new(
        source,
        FrameProcessor::new(Box::new(face_detector), Box::new(eye_detector)),
        Box::new(HighguiDisplay::new()),
        Box::new(HighguiKeys),
        writer,
        Box::new(LogSessionLogger::default()),
        settings.sample_size,
        settings.key_wait_ms,
    );

    log::info!("Press 'a' to capture a sample, 'q' to quit");
    let summary = use_case.run()?;
    log::info!(
        "Captured {} samples from {} frames into {}",
        summary.samples,
        summary.frames,
        args.output.display()
    );
    Ok(())
}

#[cfg(not(feature = "opencv"))]
fn run_capture(
    _args: &CaptureArgs,
    _settings: &SamplerSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("capture needs OpenCV; rebuild with `--features opencv`".into())
}

/// Settings file first, then command-line overrides.
fn merged_settings(args: &CaptureArgs) -> Result<SamplerSettings, Box<dyn std::error::Error>> {
    let mut settings = match &args.settings {
        Some(path) => SamplerSettings::load_from(path)?,
        None => SamplerSettings::load(),
    };
    if let Some(camera) = args.camera {
        settings.camera_index = camera;
    }
    if let Some(size) = args.sample_size {
        settings.sample_size = size;
    }
    if let Some(path) = &args.face_cascade {
        settings.face_cascade = Some(path.clone());
    }
    if let Some(path) = &args.eye_cascade {
        settings.eye_cascade = Some(path.clone());
    }
    if settings.sample_size == 0 {
        return Err("Sample size must be greater than 0".into());
    }
    Ok(settings)
}

fn save_settings(
    args: &CaptureArgs,
    settings: &SamplerSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = args
        .settings
        .clone()
        .or_else(SamplerSettings::config_path)
        .ok_or("Could not determine the settings directory")?;
    settings.save_to(&path)?;
    log::info!("Saved settings to {}", path.display());
    Ok(())
}

fn validate_capture(args: &CaptureArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = &args.input {
        require_file(input, "Input file")?;
        if args.camera.is_some() {
            return Err("--input and --camera are mutually exclusive".into());
        }
    }
    if args.sample_size == Some(0) {
        return Err("Sample size must be greater than 0".into());
    }
    if let Some(path) = &args.settings {
        require_file(path, "Settings file")?;
    }
    Ok(())
}

fn validate_inspect(args: &InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&args.samples, "Samples file")?;
    if !(1..=MAX_INSPECT_SCALE).contains(&args.scale) {
        return Err(format!(
            "Scale must be between 1 and {MAX_INSPECT_SCALE}, got {}",
            args.scale
        )
        .into());
    }
    if args.limit == Some(0) {
        return Err("Limit must be greater than 0".into());
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if path.is_file() {
        Ok(())
    } else {
        Err(format!("{what} not found: {}", path.display()).into())
    }
}

#[cfg(feature = "opencv")]
fn download_progress(which: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {which} cascade... {pct}%");
    } else {
        eprint!("\rDownloading {which} cascade... {downloaded} bytes");
    }
    if total > 0 && downloaded >= total {
        eprintln!();
    }
}
