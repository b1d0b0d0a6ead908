use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::foundation::error::{SlideError, SlideResult};

/// One timed image shown on the output timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Image file to show.
    pub path: PathBuf,
    /// Start time in seconds, `>= 0`.
    pub start_time: f64,
    /// End time in seconds, `> start_time`.
    pub end_time: f64,
}

impl Slide {
    /// Create a slide without validation. Use [`Slide::validate`] before planning.
    pub fn new(path: impl Into<PathBuf>, start_time: f64, end_time: f64) -> Self {
        Self {
            path: path.into(),
            start_time,
            end_time,
        }
    }

    /// Seconds this slide is on screen.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Check the per-slide invariants.
    pub fn validate(&self) -> SlideResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(SlideError::input_load("slide path must be non-empty"));
        }
        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            return Err(SlideError::input_load(format!(
                "slide '{}' has non-finite timing",
                self.path.display()
            )));
        }
        if self.start_time < 0.0 {
            return Err(SlideError::input_load(format!(
                "slide '{}' starts before 0 ({:.3}s)",
                self.path.display(),
                self.start_time
            )));
        }
        if self.end_time <= self.start_time {
            return Err(SlideError::input_load(format!(
                "slide '{}' must end after it starts ({:.3}s..{:.3}s)",
                self.path.display(),
                self.start_time,
                self.end_time
            )));
        }
        Ok(())
    }
}

/// Ordered slide sequence as loaded from the slide-list JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SlideList {
    slides: Vec<Slide>,
}

impl SlideList {
    /// Build a validated list from already-parsed slides.
    pub fn new(slides: Vec<Slide>) -> SlideResult<Self> {
        let list = Self { slides };
        list.validate()?;
        Ok(list)
    }

    /// Parse a slide list from a JSON reader (a top-level array of slide objects).
    pub fn from_reader<R: std::io::Read>(r: R) -> SlideResult<Self> {
        let slides: Vec<Slide> = serde_json::from_reader(r)
            .map_err(|e| SlideError::input_load(format!("parse slide list JSON: {e}")))?;
        Self::new(slides)
    }

    /// Parse a slide list from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlideError::input_load(format!("open slide list '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate every slide and warn when the list is not ordered by start time.
    pub fn validate(&self) -> SlideResult<()> {
        for slide in &self.slides {
            slide.validate()?;
        }
        if !self.is_sorted() {
            tracing::warn!("slide list is not sorted by startTime; using it in file order");
        }
        Ok(())
    }

    /// Borrow the slides in file order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Return `true` when the list has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Return `true` when start times are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.slides
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time)
    }

    /// Directory of the first slide, where overlay resources are looked up.
    pub fn overlay_dir(&self) -> Option<&Path> {
        let first = self.slides.first()?;
        Some(first.path.parent().unwrap_or_else(|| Path::new("")))
    }
}

/// Master audio track. Its duration bounds the output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioTrack {
    pub path: PathBuf,
    /// Seconds.
    pub duration: f64,
}

impl AudioTrack {
    pub fn new(path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/model/slide.rs"]
mod tests;
