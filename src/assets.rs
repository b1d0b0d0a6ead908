//! Layer image preparation.
//!
//! The back end only reads raster files. SVG layers are rasterized once per `(file, size)`
//! into a scratch directory owned by [`PreparedImages`]; the directory is removed when the
//! store is dropped.

pub(crate) mod decode;
pub(crate) mod media;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{SlideError, SlideResult},
    plan::{
        layer::{Layer, SizePolicy},
        timeline::Timeline,
    },
};

/// A layer image ready for the back end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Image path as referenced by the layer.
    pub source: PathBuf,
    /// File the back end should read. Differs from `source` for rasterized SVGs.
    pub path: PathBuf,
    /// Pixel size of `path`.
    pub width: u32,
    pub height: u32,
}

/// All layer images of one timeline, keyed by source path and target size.
#[derive(Debug, Default)]
pub struct PreparedImages {
    scratch: Option<tempfile::TempDir>,
    images: HashMap<(PathBuf, SizePolicy), PreparedImage>,
}

impl PreparedImages {
    /// Prepare every layer image of `timeline`.
    ///
    /// Returns the store and the timeline with optional layers whose image could not be
    /// prepared removed. A slide image that cannot be prepared is an input error.
    #[tracing::instrument(skip_all, fields(layers = timeline.layers.len()))]
    pub fn prepare(mut timeline: Timeline) -> SlideResult<(Self, Timeline)> {
        let mut store = Self::default();
        let mut kept = Vec::with_capacity(timeline.layers.len());

        for layer in std::mem::take(&mut timeline.layers) {
            let Err(e) = store.prepare_layer(&layer) else {
                kept.push(layer);
                continue;
            };
            let msg = format!(
                "{} image '{}': {e}",
                layer.kind.label(),
                layer.image.display()
            );
            let e = if layer.kind.is_optional() {
                SlideError::optional_layer(msg)
            } else {
                SlideError::input_load(msg)
            };
            if !e.is_recoverable() {
                return Err(e);
            }
            tracing::warn!(error = %e, "dropping layer");
        }

        timeline.layers = kept;
        Ok((store, timeline))
    }

    /// Prepared image for `layer`, if it was prepared.
    pub fn resolve(&self, layer: &Layer) -> Option<&PreparedImage> {
        self.images.get(&(layer.image.clone(), layer.size))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Scratch directory holding rasterized SVGs, once one was needed.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch.as_ref().map(tempfile::TempDir::path)
    }

    fn prepare_layer(&mut self, layer: &Layer) -> SlideResult<()> {
        let key = (layer.image.clone(), layer.size);
        if self.images.contains_key(&key) {
            return Ok(());
        }

        let prepared = if decode::is_svg(&layer.image) {
            self.rasterize(&layer.image, layer.size)?
        } else {
            let (width, height) = decode::probe_raster(&layer.image)?;
            PreparedImage {
                source: layer.image.clone(),
                path: layer.image.clone(),
                width,
                height,
            }
        };
        tracing::debug!(
            source = %prepared.source.display(),
            width = prepared.width,
            height = prepared.height,
            "prepared image"
        );
        self.images.insert(key, prepared);
        Ok(())
    }

    fn rasterize(&mut self, source: &Path, size: SizePolicy) -> SlideResult<PreparedImage> {
        let tree = decode::load_svg(source)?;
        let (width, height) =
            decode::fitted_size(tree.size().width(), tree.size().height(), size)?;
        let rgba = decode::rasterize_svg(&tree, width, height)?;

        let dir = match &self.scratch {
            Some(dir) => dir.path().to_path_buf(),
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("slidefade-")
                    .tempdir()
                    .context("create raster scratch directory")?;
                let path = dir.path().to_path_buf();
                self.scratch = Some(dir);
                path
            }
        };
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let path = dir.join(format!("{:03}-{stem}-{width}x{height}.png", self.images.len()));
        decode::write_png(&path, &rgba, width, height)?;

        Ok(PreparedImage {
            source: source.to_path_buf(),
            path,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/assets/store.rs"]
mod tests;
