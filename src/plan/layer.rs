use std::path::PathBuf;

use crate::{
    foundation::{
        core::{Canvas, TimeSpan},
        error::{SlideError, SlideResult},
    },
    plan::opacity::OpacityCurve,
};

/// What a layer is for. Only slide layers are mandatory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerKind {
    /// Fills the gap before the first slide.
    Opening,
    /// The slide at `index` in the slide list.
    Slide { index: usize },
    /// Crossfade from slide `from` into slide `to` (always `from + 1`).
    Transition { from: usize, to: usize },
    /// Persistent logo after the opening.
    Logo,
}

impl LayerKind {
    pub fn is_optional(self) -> bool {
        !matches!(self, Self::Slide { .. })
    }

    /// Short human-readable label for logs.
    pub fn label(self) -> String {
        match self {
            Self::Opening => "opening".to_owned(),
            Self::Slide { index } => format!("slide {}", index + 1),
            Self::Transition { from, to } => format!("transition {}->{}", from + 1, to + 1),
            Self::Logo => "logo".to_owned(),
        }
    }
}

/// How an image is scaled onto the canvas. Aspect ratio is always preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "fit", rename_all = "snake_case")]
pub enum SizePolicy {
    FitHeight { px: u32 },
    FitWidth { px: u32 },
}

/// Where a scaled image is placed on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "anchor", rename_all = "snake_case")]
pub enum Position {
    Center,
    /// Horizontally centered; top edge `offset_frac * canvas height` above the bottom edge.
    BottomCenter { offset_frac: f64 },
}

impl Position {
    /// Top edge in pixels for anchors with a fixed vertical position.
    pub fn top_px(self, canvas: Canvas) -> Option<u32> {
        match self {
            Self::Center => None,
            Self::BottomCenter { offset_frac } => {
                let h = f64::from(canvas.height);
                Some((h - h * offset_frac).round() as u32)
            }
        }
    }
}

/// One positioned, timed image on the output timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub image: PathBuf,
    pub span: TimeSpan,
    pub size: SizePolicy,
    pub position: Position,
    pub opacity: OpacityCurve,
}

impl Layer {
    /// Build a layer spanning `[start, end)`.
    ///
    /// Failures on optional kinds are reported as [`SlideError::OptionalLayer`] so the planner
    /// can drop the layer; failures on slide layers are planning errors.
    pub fn new(
        kind: LayerKind,
        image: impl Into<PathBuf>,
        start: f64,
        end: f64,
        size: SizePolicy,
        position: Position,
        opacity: OpacityCurve,
    ) -> SlideResult<Self> {
        let image = image.into();
        let fail = |msg: String| {
            let msg = format!("{} ('{}'): {msg}", kind.label(), image.display());
            if kind.is_optional() {
                SlideError::optional_layer(msg)
            } else {
                SlideError::invalid_input(msg)
            }
        };

        let span = TimeSpan::new(start, end).map_err(|e| fail(e.to_string()))?;
        if span.is_empty() || start < 0.0 {
            return Err(fail(format!(
                "span {start:.3}s..{end:.3}s does not cover positive time"
            )));
        }
        let px = match size {
            SizePolicy::FitHeight { px } | SizePolicy::FitWidth { px } => px,
        };
        if px == 0 {
            return Err(fail("target size must be non-zero".to_owned()));
        }
        if let Position::BottomCenter { offset_frac } = position
            && !(0.0..=1.0).contains(&offset_frac)
        {
            return Err(fail(format!("offset {offset_frac} is outside [0, 1]")));
        }
        opacity.validate().map_err(|e| fail(e.to_string()))?;

        Ok(Self {
            kind,
            image,
            span,
            size,
            position,
            opacity,
        })
    }

    pub fn start(&self) -> f64 {
        self.span.start
    }

    pub fn end(&self) -> f64 {
        self.span.end
    }

    pub fn duration(&self) -> f64 {
        self.span.duration()
    }

    /// Opacity at absolute timeline time `t`, or `None` when the layer is not showing.
    pub fn opacity_at(&self, t: f64) -> Option<f64> {
        self.span
            .contains(t)
            .then(|| self.opacity.sample(t - self.start(), self.duration()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/layer.rs"]
mod tests;
