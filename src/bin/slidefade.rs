use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Assemble a slideshow video from timed slide images and an audio track.
#[derive(Parser, Debug)]
#[command(name = "slidefade", version)]
struct Cli {
    /// Slide list JSON: `[{"path", "startTime", "endTime"}, ...]`.
    #[arg(long)]
    slides: PathBuf,

    /// Master audio track. Its duration bounds the video.
    #[arg(long)]
    audio: PathBuf,

    /// Output video path.
    #[arg(long)]
    output: PathBuf,

    /// Render config JSON overriding the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Crossfade length in seconds.
    #[arg(long, value_name = "SECS")]
    transition: Option<f64>,

    /// Audio duration in seconds (skips ffprobe).
    #[arg(long, value_name = "SECS")]
    audio_duration: Option<f64>,

    /// Do not look for the opening image and logo next to the slides.
    #[arg(long)]
    no_overlays: bool,

    /// Print the planned timeline and the ffmpeg command instead of encoding.
    #[arg(long)]
    dry_run: bool,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => slidefade::RenderConfig::from_path(path)?,
        None => slidefade::RenderConfig::default(),
    };
    if let Some(secs) = cli.transition {
        cfg.transition_secs = secs;
    }
    if cli.no_overwrite {
        cfg.overwrite = false;
    }
    let pipeline = slidefade::Pipeline::new(cfg)?;

    let req = slidefade::RenderRequest {
        audio_duration: cli.audio_duration,
        discover_overlays: !cli.no_overlays,
        ..slidefade::RenderRequest::new(&cli.slides, &cli.audio, &cli.output)
    };

    if cli.dry_run {
        let mut backend = slidefade::InMemoryBackend::new();
        pipeline.run(&req, &mut backend)?;
        let job = backend
            .jobs()
            .first()
            .context("dry run recorded no render job")?;
        println!("{}", job.timeline.to_json_pretty()?);
        println!(
            "{}",
            slidefade::display_command(std::path::Path::new("ffmpeg"), &job.args)
        );
        return Ok(());
    }

    let summary = pipeline.run(&req, &mut slidefade::FfmpegBackend::new())?;
    eprintln!(
        "wrote {} ({:.2}s, {} slides, {} transitions)",
        cli.output.display(),
        summary.duration,
        summary.slide_layers,
        summary.transition_layers
    );
    Ok(())
}
