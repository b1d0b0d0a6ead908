use crate::foundation::error::{SlideError, SlideResult};

/// Opacity as a function of the time elapsed since the layer started.
///
/// Curves are parameterized relative to the layer so that the same curve value can be sampled
/// for any layer duration. Samples are always clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpacityCurve {
    /// Fixed opacity for the whole layer.
    Constant { value: f64 },
    /// Linear rise from 0 to 1 over the first `over` seconds, then opaque.
    FadeIn { over: f64 },
    /// Opaque until `over` seconds before the layer ends, then linear decay to 0 at the end.
    FadeOut { over: f64 },
    /// Linear rise from 0 to 1 across the whole layer.
    Ramp,
}

impl OpacityCurve {
    /// Fully opaque constant curve.
    pub const OPAQUE: Self = Self::Constant { value: 1.0 };

    /// Sample the curve `t` seconds after a layer of `duration` seconds started.
    pub fn sample(self, t: f64, duration: f64) -> f64 {
        let v = match self {
            Self::Constant { value } => value,
            Self::FadeIn { over } => {
                if over <= 0.0 || t >= over {
                    1.0
                } else {
                    t / over
                }
            }
            Self::FadeOut { over } => {
                if over <= 0.0 || t <= duration - over {
                    1.0
                } else {
                    (duration - t) / over
                }
            }
            Self::Ramp => {
                if duration <= 0.0 {
                    1.0
                } else {
                    t / duration
                }
            }
        };
        v.clamp(0.0, 1.0)
    }

    pub fn validate(self) -> SlideResult<()> {
        match self {
            Self::Constant { value } if !(0.0..=1.0).contains(&value) => Err(
                SlideError::invalid_input(format!("constant opacity {value} is outside [0, 1]")),
            ),
            Self::FadeIn { over } | Self::FadeOut { over } if !over.is_finite() || over < 0.0 => {
                Err(SlideError::invalid_input(format!(
                    "fade length {over} must be finite and >= 0"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Return `true` when the curve never drops below 1.
    pub fn is_opaque(self) -> bool {
        match self {
            Self::Constant { value } => value >= 1.0,
            Self::FadeIn { over } | Self::FadeOut { over } => over <= 0.0,
            Self::Ramp => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/opacity.rs"]
mod tests;
