//! # Raster Canvas
//!
//! A thin drawing surface over an RGB buffer. Every primitive clips to the
//! canvas bounds, so callers can place partially visible elements (a logo
//! taller than the band, text past the right edge) without checks.

use image::{GrayImage, Rgb, RgbImage, RgbaImage};

use crate::geometry::Rect;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Drawing surface for one band.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    /// Set a pixel to black (no-op outside the canvas).
    #[inline]
    pub fn set_black(&mut self, x: i64, y: i64) {
        if self.in_bounds(x, y) {
            self.image.put_pixel(x as u32, y as u32, BLACK);
        }
    }

    /// Darken a pixel by an anti-aliasing coverage in `[0, 1]`.
    pub fn cover(&mut self, x: i64, y: i64, coverage: f32) {
        if !self.in_bounds(x, y) || coverage <= 0.0 {
            return;
        }
        let c = coverage.min(1.0);
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        for channel in px.0.iter_mut() {
            *channel = (*channel as f32 * (1.0 - c)).round() as u8;
        }
    }

    /// Outline a rectangle with a stroke of `stroke` pixels drawn inward.
    pub fn stroke_rect(&mut self, rect: Rect, stroke: u32) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let inside_x = x >= rect.x + stroke && x + stroke < rect.right();
                let inside_y = y >= rect.y + stroke && y + stroke < rect.bottom();
                if !(inside_x && inside_y) {
                    self.set_black(x as i64, y as i64);
                }
            }
        }
    }

    /// Copy a grayscale image with its top-left corner at (x, y).
    pub fn blit_gray(&mut self, src: &GrayImage, x: i64, y: i64) {
        for (sx, sy, px) in src.enumerate_pixels() {
            let (dx, dy) = (x + sx as i64, y + sy as i64);
            if self.in_bounds(dx, dy) {
                let v = px.0[0];
                self.image.put_pixel(dx as u32, dy as u32, Rgb([v, v, v]));
            }
        }
    }

    /// Alpha-blend an RGBA image with its top-left corner at (x, y).
    pub fn blit_rgba(&mut self, src: &RgbaImage, x: i64, y: i64) {
        for (sx, sy, px) in src.enumerate_pixels() {
            let (dx, dy) = (x + sx as i64, y + sy as i64);
            if !self.in_bounds(dx, dy) {
                continue;
            }
            let alpha = px.0[3] as f32 / 255.0;
            if alpha <= 0.0 {
                continue;
            }
            let dst = self.image.get_pixel_mut(dx as u32, dy as u32);
            for i in 0..3 {
                let blended = px.0[i] as f32 * alpha + dst.0[i] as f32 * (1.0 - alpha);
                dst.0[i] = blended.round() as u8;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Finish drawing and take the image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn test_new_canvas_is_white() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.pixel(0, 0), WHITE);
        assert_eq!(canvas.pixel(3, 2), WHITE);
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_black(-1, 0);
        canvas.set_black(4, 4);
        canvas.cover(10, 10, 1.0);
        assert!(canvas.into_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_rect(Rect::new(0, 0, 10, 10), 2);
        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.pixel(1, 5), BLACK);
        assert_eq!(canvas.pixel(8, 9), BLACK);
        assert_eq!(canvas.pixel(5, 5), WHITE);
        assert_eq!(canvas.pixel(2, 2), WHITE);
    }

    #[test]
    fn test_cover_partial() {
        let mut canvas = Canvas::new(1, 1);
        canvas.cover(0, 0, 0.5);
        let v = canvas.pixel(0, 0).0[0];
        assert!(v > 100 && v < 150);
    }

    #[test]
    fn test_blit_rgba_respects_alpha() {
        let mut canvas = Canvas::new(2, 1);
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        canvas.blit_rgba(&src, 0, 0);
        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.pixel(1, 0), WHITE);
    }

    #[test]
    fn test_blit_gray_negative_offset() {
        let mut canvas = Canvas::new(2, 2);
        let src = GrayImage::from_pixel(2, 2, Luma([0]));
        canvas.blit_gray(&src, -1, -1);
        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.pixel(1, 1), WHITE);
    }
}
