//! # Logo
//!
//! The logo sits in the non-printable area right of the printable region.
//! It is only ever shrunk, never enlarged, and keeps its aspect ratio.

use std::path::Path;

use image::{DynamicImage, RgbaImage, imageops::FilterType};

use crate::geometry::{Geometry, Rect};

/// Size allowance over the padded logo area.
pub const LOGO_ALLOWANCE: f64 = 1.2;

/// Decode a logo file. Unreadable files are logged and skipped.
pub fn load(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(image) => Some(image.to_rgba8()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "logo unavailable, leaving area blank");
            None
        }
    }
}

/// Largest logo box: the area minus 0.2cm padding, times the allowance.
pub fn max_size(geometry: &Geometry) -> (u32, u32) {
    let padding = geometry.cm(0.2);
    let w = (geometry.logo_width() - padding) as f64 * LOGO_ALLOWANCE;
    let h = (geometry.height - padding) as f64 * LOGO_ALLOWANCE;
    (w as u32, h as u32)
}

/// Shrink `logo` to fit [`max_size`], preserving aspect ratio.
pub fn fit(logo: &RgbaImage, geometry: &Geometry) -> RgbaImage {
    let (max_w, max_h) = max_size(geometry);
    if logo.width() <= max_w && logo.height() <= max_h {
        return logo.clone();
    }
    DynamicImage::ImageRgba8(logo.clone())
        .resize(max_w, max_h, FilterType::Lanczos3)
        .to_rgba8()
}

/// Where a fitted logo of `size` is drawn: left-aligned just inside the
/// area, vertically centred. `y` may be negative for logos taller than the
/// band.
pub fn placement(size: (u32, u32), geometry: &Geometry) -> (i64, i64) {
    let x = (geometry.logo_left() + geometry.gap) as i64;
    let y = (geometry.height as i64 - size.1 as i64) / 2;
    (x, y)
}

/// Visible part of a placed logo.
pub fn visible_rect(size: (u32, u32), geometry: &Geometry) -> Rect {
    let (x, y) = placement(size, geometry);
    let top = y.max(0) as u32;
    let bottom = (y + size.1 as i64).min(geometry.height as i64).max(0) as u32;
    let right = (x + size.0 as i64).min(geometry.width as i64) as u32;
    Rect::new(x as u32, top, right.saturating_sub(x as u32), bottom - top)
}
