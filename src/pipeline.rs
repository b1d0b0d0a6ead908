use std::path::{Path, PathBuf};

use crate::{
    assets::{PreparedImages, media},
    config::RenderConfig,
    foundation::error::{SlideError, SlideResult},
    model::{AudioTrack, SlideList},
    plan::{
        resources::OverlayResources,
        timeline::{Timeline, plan},
    },
    render::{RenderBackend, RenderJob},
};

/// Inputs of one render.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// JSON slide list.
    pub slides: PathBuf,
    /// Master audio track.
    pub audio: PathBuf,
    pub output: PathBuf,
    /// Known audio duration in seconds. Skips `ffprobe` when set.
    pub audio_duration: Option<f64>,
    /// Look for the opening image and logo next to the first slide.
    pub discover_overlays: bool,
}

impl RenderRequest {
    pub fn new(
        slides: impl Into<PathBuf>,
        audio: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            slides: slides.into(),
            audio: audio.into(),
            output: output.into(),
            audio_duration: None,
            discover_overlays: true,
        }
    }
}

/// What a successful render produced.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RenderSummary {
    pub duration: f64,
    pub slide_layers: usize,
    pub transition_layers: usize,
    pub has_opening: bool,
    pub has_logo: bool,
}

impl RenderSummary {
    fn of(timeline: &Timeline) -> Self {
        Self {
            duration: timeline.duration,
            slide_layers: timeline.slide_layers().count(),
            transition_layers: timeline.transitions().count(),
            has_opening: timeline.opening().is_some(),
            has_logo: timeline.logo().is_some(),
        }
    }
}

/// Load, plan, prepare and render with one configuration.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    pub cfg: RenderConfig,
}

impl Pipeline {
    pub fn new(cfg: RenderConfig) -> SlideResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    #[tracing::instrument(skip_all, fields(slides = %req.slides.display(), output = %req.output.display()))]
    pub fn run(
        &self,
        req: &RenderRequest,
        backend: &mut dyn RenderBackend,
    ) -> SlideResult<RenderSummary> {
        let slides = SlideList::from_path(&req.slides)?;
        tracing::info!(count = slides.len(), "loaded slides");

        let audio = self.audio_track(&req.audio, req.audio_duration)?;
        let resources = match slides.overlay_dir() {
            Some(dir) if req.discover_overlays => OverlayResources::discover(dir, &self.cfg),
            _ => OverlayResources::none(),
        };

        let timeline = plan(slides.slides(), &audio, &resources, &self.cfg)?;
        let (images, timeline) = PreparedImages::prepare(timeline)?;

        backend.render(&RenderJob {
            timeline: &timeline,
            images: &images,
            output: &req.output,
            encode: &self.cfg.encode,
            overwrite: self.cfg.overwrite,
        })?;

        let summary = RenderSummary::of(&timeline);
        tracing::info!(
            duration = summary.duration,
            slides = summary.slide_layers,
            transitions = summary.transition_layers,
            opening = summary.has_opening,
            logo = summary.has_logo,
            "render finished"
        );
        Ok(summary)
    }

    fn audio_track(&self, path: &Path, known: Option<f64>) -> SlideResult<AudioTrack> {
        match known {
            Some(d) if d.is_finite() && d > 0.0 => Ok(AudioTrack::new(path, d)),
            Some(d) => Err(SlideError::input_load(format!(
                "audio duration must be positive (got {d})"
            ))),
            None => media::probe_audio_track(path),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
