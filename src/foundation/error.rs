/// Convenience result type used across slidefade.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error taxonomy.
///
/// `OptionalLayer` never escapes the planner or asset preparation: those stages log it and drop
/// the affected layer. Every other variant is fatal for a render.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// Slide list, audio track or a mandatory image could not be loaded.
    #[error("input load error: {0}")]
    InputLoad(String),

    /// Planning invariant violated (invalid input).
    #[error("planning error: {0}")]
    Planning(String),

    /// An optional layer (opening, logo, transition) could not be built.
    #[error("optional layer error: {0}")]
    OptionalLayer(String),

    /// The render back end failed to produce output.
    #[error("render failure: {0}")]
    Render(String),

    /// Configuration could not be read or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::InputLoad`] value.
    pub fn input_load(msg: impl Into<String>) -> Self {
        Self::InputLoad(msg.into())
    }

    /// Build a [`SlideError::Planning`] value for rejected planner input.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::Planning(msg.into())
    }

    /// Build a [`SlideError::OptionalLayer`] value.
    pub fn optional_layer(msg: impl Into<String>) -> Self {
        Self::OptionalLayer(msg.into())
    }

    /// Build a [`SlideError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SlideError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Return `true` for errors a caller may recover from by omitting a layer.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::OptionalLayer(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
