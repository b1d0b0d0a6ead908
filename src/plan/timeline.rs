use crate::{
    config::RenderConfig,
    foundation::{
        core::{Canvas, Fps, Rgb8, TimeSpan},
        error::{SlideError, SlideResult},
    },
    model::{AudioTrack, Slide},
    plan::{
        layer::{Layer, LayerKind, Position, SizePolicy},
        opacity::OpacityCurve,
        resources::OverlayResources,
    },
};

/// Full-canvas solid color beneath every layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Background {
    pub color: Rgb8,
    pub span: TimeSpan,
}

/// The composited visual timeline handed to a render back end.
///
/// `layers` are in composition order, bottom to top.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Output duration in seconds, never longer than the audio track.
    pub duration: f64,
    pub background: Background,
    pub layers: Vec<Layer>,
    pub audio: AudioTrack,
}

impl Timeline {
    pub fn layers_of<'a>(
        &'a self,
        pred: impl Fn(LayerKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Layer> + 'a {
        self.layers.iter().filter(move |l| pred(l.kind))
    }

    pub fn opening(&self) -> Option<&Layer> {
        self.layers_of(|k| k == LayerKind::Opening).next()
    }

    pub fn logo(&self) -> Option<&Layer> {
        self.layers_of(|k| k == LayerKind::Logo).next()
    }

    pub fn slide_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers_of(|k| matches!(k, LayerKind::Slide { .. }))
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Layer> {
        self.layers_of(|k| matches!(k, LayerKind::Transition { .. }))
    }

    /// Pretty JSON dump used by dry runs.
    pub fn to_json_pretty(&self) -> SlideResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SlideError::Other(anyhow::Error::new(e).context("serialize timeline")))
    }
}

/// Output duration: the last slide end plus half a crossfade (when there is more than one
/// slide), clamped to the audio duration. An empty slide list plays the whole track.
pub fn total_duration(slides: &[Slide], audio_duration: f64, transition_secs: f64) -> f64 {
    let Some(last_end) = slides.iter().map(|s| s.end_time).reduce(f64::max) else {
        return audio_duration;
    };
    let pad = if slides.len() > 1 {
        transition_secs / 2.0
    } else {
        0.0
    };
    audio_duration.min(last_end + pad)
}

/// Compute the layer timeline for `slides` over `audio`.
///
/// Pure: no filesystem or process access. Optional layers that cannot be built are logged and
/// omitted; only slide layers and the inputs themselves can make this fail.
#[tracing::instrument(skip_all, fields(slides = slides.len(), audio_duration = audio.duration))]
pub fn plan(
    slides: &[Slide],
    audio: &AudioTrack,
    resources: &OverlayResources,
    cfg: &RenderConfig,
) -> SlideResult<Timeline> {
    if !audio.duration.is_finite() || audio.duration <= 0.0 {
        return Err(SlideError::invalid_input(format!(
            "audio duration must be positive (got {})",
            audio.duration
        )));
    }
    let d = cfg.transition_secs;
    let total = total_duration(slides, audio.duration, d);
    if !total.is_finite() || total <= 0.0 {
        return Err(SlideError::invalid_input(
            "cannot derive a positive timeline duration",
        ));
    }
    tracing::debug!(total, "timeline duration");

    let fit_height = SizePolicy::FitHeight {
        px: cfg.canvas.height,
    };
    let mut layers = Vec::with_capacity(slides.len() * 2 + 2);

    let opening = plan_opening(slides, resources, cfg);
    let opening_end = opening.as_ref().map(Layer::end);
    layers.extend(opening);

    for (i, slide) in slides.iter().enumerate() {
        layers.push(Layer::new(
            LayerKind::Slide { index: i },
            &slide.path,
            slide.start_time,
            slide.end_time,
            fit_height,
            Position::Center,
            OpacityCurve::OPAQUE,
        )?);

        let Some(next) = slides.get(i + 1) else {
            continue;
        };
        if d <= 0.0 {
            // Zero-length crossfades are plain cuts.
            continue;
        }
        let transition = Layer::new(
            LayerKind::Transition {
                from: i,
                to: i + 1,
            },
            &next.path,
            slide.end_time - d / 2.0,
            next.start_time + d / 2.0,
            fit_height,
            Position::Center,
            OpacityCurve::Ramp,
        );
        match transition {
            Ok(layer) => layers.push(layer),
            Err(e) => tracing::warn!(error = %e, "skipping transition layer"),
        }
    }

    layers.extend(plan_logo(opening_end, total, resources, cfg));

    Ok(Timeline {
        canvas: cfg.canvas,
        fps: cfg.fps,
        duration: total,
        background: Background {
            color: cfg.background,
            span: TimeSpan::new(0.0, total)?,
        },
        layers,
        audio: audio.clone(),
    })
}

fn plan_opening(
    slides: &[Slide],
    resources: &OverlayResources,
    cfg: &RenderConfig,
) -> Option<Layer> {
    let first_start = slides.iter().map(|s| s.start_time).reduce(f64::min)?;
    let Some(image) = resources.opening.as_ref() else {
        tracing::debug!("no opening image available, skipping opening slide");
        return None;
    };
    if first_start <= 0.0 {
        tracing::info!(first_start, "no gap before first slide, skipping opening slide");
        return None;
    }

    let layer = Layer::new(
        LayerKind::Opening,
        image,
        0.0,
        first_start,
        SizePolicy::FitHeight {
            px: cfg.canvas.height,
        },
        Position::Center,
        OpacityCurve::FadeOut {
            over: cfg.transition_secs,
        },
    );
    match layer {
        Ok(layer) => {
            tracing::info!(duration = first_start, "opening slide fills gap before content");
            Some(layer)
        }
        Err(e) => {
            tracing::warn!(error = %e, "skipping opening slide");
            None
        }
    }
}

fn plan_logo(
    opening_end: Option<f64>,
    total: f64,
    resources: &OverlayResources,
    cfg: &RenderConfig,
) -> Option<Layer> {
    let Some(image) = resources.logo.as_ref() else {
        tracing::debug!("no logo overlay available");
        return None;
    };
    let Some(start) = opening_end else {
        tracing::info!("logo overlay skipped (no opening slide)");
        return None;
    };

    let layer = Layer::new(
        LayerKind::Logo,
        image,
        start,
        total,
        SizePolicy::FitWidth {
            px: cfg.logo_width_px(),
        },
        Position::BottomCenter {
            offset_frac: cfg.logo_bottom_frac,
        },
        OpacityCurve::FadeIn {
            over: cfg.transition_secs / 2.0,
        },
    );
    match layer {
        Ok(layer) => Some(layer),
        Err(e) => {
            tracing::warn!(error = %e, "skipping logo overlay");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/timeline.rs"]
mod tests;
