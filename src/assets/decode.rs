use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{SlideError, SlideResult},
    plan::layer::SizePolicy,
};

const MAX_DIM: u32 = 16_384;

/// Decode only the header of a raster image and return its `(width, height)`.
pub fn probe_raster(path: &Path) -> SlideResult<(u32, u32)> {
    let dims = image::ImageReader::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("guess image format of '{}'", path.display()))?
        .into_dimensions()
        .with_context(|| format!("decode image header of '{}'", path.display()))?;
    if dims.0 == 0 || dims.1 == 0 {
        return Err(SlideError::input_load(format!(
            "image '{}' has zero size",
            path.display()
        )));
    }
    Ok(dims)
}

pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Parse an SVG file. Relative references and fonts resolve next to the file.
pub fn load_svg(path: &Path) -> SlideResult<usvg::Tree> {
    let bytes = std::fs::read(path).with_context(|| format!("read svg '{}'", path.display()))?;
    let resources_dir = path.parent().map(Path::to_path_buf);

    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = resources_dir.as_deref() {
        db.load_fonts_dir(dir.join("fonts"));
    }

    let opts = usvg::Options {
        resources_dir,
        fontdb: std::sync::Arc::new(db),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(&bytes, &opts)
        .with_context(|| format!("parse svg tree '{}'", path.display()))?;
    Ok(tree)
}

/// Pixel size an image of intrinsic size `(w, h)` takes under `size`, aspect preserved.
pub fn fitted_size(w: f32, h: f32, size: SizePolicy) -> SlideResult<(u32, u32)> {
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(SlideError::input_load("svg has invalid width/height"));
    }
    let (out_w, out_h) = match size {
        SizePolicy::FitHeight { px } => ((px as f32 * w / h).round() as u32, px),
        SizePolicy::FitWidth { px } => (px, (px as f32 * h / w).round() as u32),
    };
    let (out_w, out_h) = (out_w.max(1), out_h.max(1));
    if out_w > MAX_DIM || out_h > MAX_DIM {
        return Err(SlideError::input_load(format!(
            "svg raster size too large: {out_w}x{out_h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((out_w, out_h))
}

/// Rasterize `tree` stretched to `width` x `height`, returning straight-alpha RGBA8.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> SlideResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SlideError::input_load("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    let mut rgba = pixmap.take();
    demultiply_rgba8_in_place(&mut rgba);
    Ok(rgba)
}

pub fn write_png(path: &Path, rgba: &[u8], width: u32, height: u32) -> SlideResult<()> {
    image::save_buffer_with_format(
        path,
        rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = (((*c as u16) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
