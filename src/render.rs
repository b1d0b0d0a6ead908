//! Render back ends.
//!
//! A back end turns a prepared [`Timeline`] plus the master audio track into an encoded file.
//! All pixel and sample work happens outside this crate.

pub(crate) mod ffmpeg;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    assets::PreparedImages,
    config::EncodeParams,
    foundation::error::{SlideError, SlideResult},
    plan::timeline::Timeline,
};

/// Everything a back end needs for one render.
#[derive(Clone, Copy, Debug)]
pub struct RenderJob<'a> {
    /// Timeline to render, including canvas, frame rate, duration and audio.
    pub timeline: &'a Timeline,
    /// Images for every layer of `timeline`.
    pub images: &'a PreparedImages,
    pub output: &'a Path,
    pub encode: &'a EncodeParams,
    /// Replace `output` when it already exists.
    pub overwrite: bool,
}

impl RenderJob<'_> {
    pub fn validate(&self) -> SlideResult<()> {
        let tl = self.timeline;
        if tl.canvas.width == 0 || tl.canvas.height == 0 {
            return Err(SlideError::render("canvas width/height must be non-zero"));
        }
        if !tl.canvas.width.is_multiple_of(2) || !tl.canvas.height.is_multiple_of(2) {
            return Err(SlideError::render(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if tl.fps.num == 0 || tl.fps.den == 0 {
            return Err(SlideError::render("fps must be non-zero"));
        }
        if !tl.duration.is_finite() || tl.duration <= 0.0 {
            return Err(SlideError::render("timeline duration must be positive"));
        }
        if tl.duration > tl.audio.duration {
            return Err(SlideError::render(format!(
                "timeline ({:.3}s) is longer than its audio track ({:.3}s)",
                tl.duration, tl.audio.duration
            )));
        }
        Ok(())
    }
}

/// Renders a timeline to a file.
pub trait RenderBackend {
    /// Produce `job.output`. Must release every resource it opened before returning.
    fn render(&mut self, job: &RenderJob<'_>) -> SlideResult<()>;
}

/// A job captured by [`InMemoryBackend`].
#[derive(Clone, Debug)]
pub struct RecordedJob {
    pub output: PathBuf,
    pub timeline: Timeline,
    /// The ffmpeg argument vector that would have been run.
    pub args: Vec<OsString>,
}

/// Back end that records jobs instead of encoding. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    jobs: Vec<RecordedJob>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the recorded jobs in call order.
    pub fn jobs(&self) -> &[RecordedJob] {
        &self.jobs
    }
}

impl RenderBackend for InMemoryBackend {
    fn render(&mut self, job: &RenderJob<'_>) -> SlideResult<()> {
        job.validate()?;
        let args = ffmpeg::build_ffmpeg_args(job)?;
        self.jobs.push(RecordedJob {
            output: job.output.to_path_buf(),
            timeline: job.timeline.clone(),
            args,
        });
        Ok(())
    }
}
