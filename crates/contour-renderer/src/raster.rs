//! Rasterization of rendered SVG through resvg.

use contour_common::{ContourError, ContourResult};

/// Rasterize an SVG document into a `width × height` pixmap.
///
/// The document is scaled to fill the target size.
pub fn rasterize(svg: &str, width: u32, height: u32) -> ContourResult<tiny_skia::Pixmap> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| ContourError::SvgError(format!("Failed to parse SVG: {}", e)))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        ContourError::RasterError(format!("Invalid pixmap size {}x{}", width, height))
    })?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    tracing::debug!(width, height, "Rasterized contour SVG");
    Ok(pixmap)
}

/// Rasterize an SVG document and encode it as PNG.
pub fn render_png(svg: &str, width: u32, height: u32) -> ContourResult<Vec<u8>> {
    rasterize(svg, width, height)?
        .encode_png()
        .map_err(|e| ContourError::RasterError(format!("PNG encoding failed: {}", e)))
}
