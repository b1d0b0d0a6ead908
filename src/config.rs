//! Render configuration.
//!
//! Every field has a default matching the stock output profile (1920x1080 at 30 fps, H.264
//! CRF 18, AAC 320k, 0.8 s crossfades), so a config file only needs the keys it overrides.

use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::{
    core::{Canvas, Fps, Rgb8},
    error::{SlideError, SlideResult},
};

/// Encoder parameters handed to the back end.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncodeParams {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub video_bitrate: String,
    pub profile: String,
    pub level: String,
    pub pix_fmt: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    /// Move the moov atom to the front of the file.
    pub faststart: bool,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_owned(),
            preset: "slow".to_owned(),
            crf: 18,
            video_bitrate: "8000k".to_owned(),
            profile: "high".to_owned(),
            level: "4.1".to_owned(),
            pix_fmt: "yuv420p".to_owned(),
            audio_codec: "aac".to_owned(),
            audio_bitrate: "320k".to_owned(),
            faststart: true,
        }
    }
}

/// Everything the planner and back end need besides the slides and the audio track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Crossfade length in seconds. Also drives the opening fade-out and logo fade-in.
    pub transition_secs: f64,
    pub background: Rgb8,
    /// Opening image names tried in order, relative to the first slide's directory.
    pub opening_candidates: Vec<String>,
    /// Logo overlay file name, relative to the first slide's directory.
    pub logo_file: String,
    /// Logo width as a fraction of the canvas width.
    pub logo_width_frac: f64,
    /// Distance of the logo's top edge from the bottom, as a fraction of canvas height.
    pub logo_bottom_frac: f64,
    pub overwrite: bool,
    pub encode: EncodeParams,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            transition_secs: 0.8,
            background: Rgb8::BLACK,
            opening_candidates: vec!["apu-slide.png".to_owned(), "apu-logo.svg".to_owned()],
            logo_file: "apu-logo.svg".to_owned(),
            logo_width_frac: 0.15,
            logo_bottom_frac: 0.10,
            overwrite: true,
            encode: EncodeParams::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a config from a JSON reader. Missing keys take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlideResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| SlideError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| SlideError::config(format!("open config '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> SlideResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SlideError::config("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            // yuv420p output needs even dimensions.
            return Err(SlideError::config("canvas width/height must be even"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.transition_secs.is_finite() || self.transition_secs < 0.0 {
            return Err(SlideError::config(
                "transition_secs must be finite and >= 0",
            ));
        }
        for (name, v) in [
            ("logo_width_frac", self.logo_width_frac),
            ("logo_bottom_frac", self.logo_bottom_frac),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(SlideError::config(format!("{name} must be within [0, 1]")));
            }
        }
        if self.encode.video_codec.trim().is_empty() || self.encode.audio_codec.trim().is_empty()
        {
            return Err(SlideError::config("encode codecs must be non-empty"));
        }
        Ok(())
    }

    /// Logo target width in pixels, rounded down to an even number.
    pub fn logo_width_px(&self) -> u32 {
        let w = (f64::from(self.canvas.width) * self.logo_width_frac).floor() as u32;
        (w / 2 * 2).max(2)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
