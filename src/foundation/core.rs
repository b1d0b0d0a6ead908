use std::fmt;

use crate::foundation::error::{SlideError, SlideResult};

/// Half-open time span `[start, end)` in seconds on the output timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    /// Inclusive start, seconds.
    pub start: f64,
    /// Exclusive end, seconds.
    pub end: f64,
}

impl TimeSpan {
    /// Create a validated span with finite bounds and `start <= end`.
    pub fn new(start: f64, end: f64) -> SlideResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SlideError::invalid_input(format!(
                "time span bounds must be finite (got {start}..{end})"
            )));
        }
        if start > end {
            return Err(SlideError::invalid_input(format!(
                "time span start must be <= end (got {start:.3}..{end:.3})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Span length in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Return `true` when the span covers no time.
    pub fn is_empty(self) -> bool {
        self.duration() <= 0.0
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> SlideResult<Self> {
        if den == 0 {
            return Err(SlideError::config("fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlideError::config("fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// `num/den` form accepted by ffmpeg rate options.
    pub fn as_ffmpeg_rate(self) -> String {
        format!("{}/{}", self.num, self.den)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Opaque 8-bit RGB color. Serialized as `"#rrggbb"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure black.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Parse `#RRGGBB` (the `#` is optional, case-insensitive).
    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        if s.len() != 6 || !s.is_ascii() {
            return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
        }
        Ok(Self {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
        })
    }

    /// `0xRRGGBB` form used by ffmpeg color options.
    pub fn to_ffmpeg(self) -> String {
        format!("0x{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
