#![forbid(unsafe_code)]
//! Slideshow video assembly.
//!
//! A JSON list of timed slide images and one audio track are planned into a layer
//! [`Timeline`] (slides, crossfades, an optional opening image and logo overlay over a
//! solid background) and encoded by a [`RenderBackend`], normally the system `ffmpeg`.
//!
//! ```no_run
//! use slidefade::{FfmpegBackend, Pipeline, RenderConfig, RenderRequest};
//!
//! let pipeline = Pipeline::new(RenderConfig::default())?;
//! let req = RenderRequest::new("slides.json", "narration.mp3", "out/video.mp4");
//! let summary = pipeline.run(&req, &mut FfmpegBackend::new())?;
//! println!("{:.2}s", summary.duration);
//! # Ok::<(), slidefade::SlideError>(())
//! ```

pub(crate) mod assets;
pub(crate) mod config;
pub(crate) mod foundation;
pub(crate) mod model;
pub(crate) mod pipeline;
pub(crate) mod plan;
pub(crate) mod render;

pub use assets::{
    PreparedImage, PreparedImages,
    media::{is_ffprobe_on_path, probe_audio_duration, probe_audio_track},
};
pub use config::{EncodeParams, RenderConfig};
pub use foundation::core::{Canvas, Fps, Rgb8, TimeSpan};
pub use foundation::error::{SlideError, SlideResult};
pub use model::{AudioTrack, Slide, SlideList};
pub use pipeline::{Pipeline, RenderRequest, RenderSummary};
pub use plan::{
    layer::{Layer, LayerKind, Position, SizePolicy},
    opacity::OpacityCurve,
    resources::OverlayResources,
    timeline::{Background, Timeline, plan, total_duration},
};
pub use render::{
    InMemoryBackend, RecordedJob, RenderBackend, RenderJob,
    ffmpeg::{
        FfmpegBackend, build_ffmpeg_args, build_filter_graph, display_command,
        ensure_parent_dir, is_ffmpeg_on_path,
    },
};
