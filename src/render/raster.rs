use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

use anyhow::Context;

use crate::{
    foundation::error::{CourseError, CourseResult},
    render::{scene::Scene, svg::to_svg},
};

const MAX_DIM: u32 = 16_384;

fn system_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTDB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTDB
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.faces().count(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Rasterize a scene at `scale` pixels per layout unit into straight-alpha RGBA.
pub fn rasterize(scene: &Scene, scale: f64) -> CourseResult<image::RgbaImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CourseError::render("scale must be finite and > 0"));
    }
    let width = to_px(scene.view_box.width() * scale)?;
    let height = to_px(scene.view_box.height() * scale)?;

    let svg = to_svg(scene);
    let opts = usvg::Options {
        fontdb: system_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts).context("parse generated svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CourseError::render("failed to allocate pixmap"))?;
    let sx = width as f32 / tree.size().width();
    let sy = height as f32 / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut rgba = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| CourseError::render("pixel buffer size mismatch"))
}

/// Rasterize and save as PNG.
pub fn write_png(scene: &Scene, path: &Path, scale: f64) -> CourseResult<()> {
    let img = rasterize(scene, scale)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn to_px(v: f64) -> CourseResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(CourseError::render("scene has empty view box"));
    }
    let px = v.ceil() as u32;
    if px > MAX_DIM {
        return Err(CourseError::render(format!(
            "raster size too large: {px} (max {MAX_DIM})"
        )));
    }
    Ok(px.max(1))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
