//! TTF/OTF outline fonts.
//!
//! Measures and rasterizes text with ab_glyph. Width is the sum of glyph
//! advances (no kerning); height is the scaled ascent minus descent, so a
//! line at `px` is about `px` tall.

use std::path::Path;

use ab_glyph::{Font, FontArc, ScaleFont};

use crate::canvas::Canvas;
use crate::error::WristbandError;

/// Load an outline font from disk.
pub fn load(path: &Path) -> Result<FontArc, WristbandError> {
    let bytes = std::fs::read(path)
        .map_err(|e| WristbandError::Font(format!("{}: {}", path.display(), e)))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| WristbandError::Font(format!("{}: {}", path.display(), e)))
}

/// Height of one line of text at `px`.
pub fn line_height(font: &FontArc, px: u32) -> u32 {
    let scaled = font.as_scaled(px.max(1) as f32);
    (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32
}

/// Bounding box of `text` at `px`.
pub fn measure(font: &FontArc, px: u32, text: &str) -> (u32, u32) {
    if text.is_empty() {
        return (0, 0);
    }
    let scaled = font.as_scaled(px.max(1) as f32);
    let width: f32 = text
        .chars()
        .map(|ch| scaled.h_advance(font.glyph_id(ch)))
        .sum();
    (width.ceil() as u32, line_height(font, px))
}

/// Draw `text` with the top of its line box at (x, y).
pub fn draw(font: &FontArc, px: u32, canvas: &mut Canvas, x: i64, y: i64, text: &str) {
    let pixel_height = px.max(1) as f32;
    let scaled = font.as_scaled(pixel_height);
    let baseline_y = scaled.ascent();

    let mut caret_x = 0.0f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph =
            glyph_id.with_scale_and_position(pixel_height, ab_glyph::point(caret_x, baseline_y));
        caret_x += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px_x = x + gx as i64 + bounds.min.x as i64;
                let px_y = y + gy as i64 + bounds.min.y as i64;
                canvas.cover(px_x, px_y, coverage);
            });
        }
    }
}
