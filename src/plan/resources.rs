use std::path::{Path, PathBuf};

use crate::config::RenderConfig;

/// Optional images found next to the slides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayResources {
    /// Image shown in the gap before the first slide.
    pub opening: Option<PathBuf>,
    /// Logo overlaid after the opening.
    pub logo: Option<PathBuf>,
}

impl OverlayResources {
    /// No opening and no logo.
    pub fn none() -> Self {
        Self::default()
    }

    /// Look up the configured opening candidates and logo file inside `dir`.
    ///
    /// Missing files are not errors; they are logged and left as `None`.
    pub fn discover(dir: &Path, cfg: &RenderConfig) -> Self {
        let opening = cfg
            .opening_candidates
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file());
        match &opening {
            Some(p) => tracing::debug!(path = %p.display(), "found opening image"),
            None => tracing::info!(
                dir = %dir.display(),
                candidates = ?cfg.opening_candidates,
                "no opening image found"
            ),
        }

        let logo = Some(dir.join(&cfg.logo_file)).filter(|p| p.is_file());
        match &logo {
            Some(p) => tracing::debug!(path = %p.display(), "found logo overlay"),
            None => tracing::info!(
                path = %dir.join(&cfg.logo_file).display(),
                "no logo overlay found"
            ),
        }

        Self { opening, logo }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/resources.rs"]
mod tests;
