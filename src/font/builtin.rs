//! Built-in bitmap font.
//!
//! Uses the Spleen bitmap font family so a band can always be measured and
//! drawn, even when no system font is readable. Glyphs are scaled
//! nearest-neighbour into a `px/2 × px` cell: the 6×12 source below 19 px,
//! the 12×24 source above.

use std::collections::HashMap;

use spleen_font::{PSF2Font, FONT_12X24, FONT_6X12};

use crate::canvas::Canvas;

/// Pixel height of the built-in font when used as the process default.
pub const BUILTIN_SIZE: u32 = 12;

/// Largest size still drawn from the 6×12 source.
const SMALL_SOURCE_MAX: u32 = 18;

/// Horizontal advance of one character cell.
#[inline]
pub fn advance(px: u32) -> u32 {
    (px / 2).max(1)
}

#[inline]
pub fn line_height(px: u32) -> u32 {
    px.max(1)
}

/// Bounding box of `text`. Synthetic bold adds one pixel of width.
pub fn measure(text: &str, px: u32, bold: bool) -> (u32, u32) {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return (0, 0);
    }
    (chars * advance(px) + u32::from(bold), line_height(px))
}

/// A source glyph bitmap: 1 = ink.
struct SourceGlyph {
    width: usize,
    height: usize,
    bits: Vec<u8>,
}

fn source_glyph(ch: char, px: u32) -> SourceGlyph {
    let (data, width, height) = if px <= SMALL_SOURCE_MAX {
        (FONT_6X12, 6, 12)
    } else {
        (FONT_12X24, 12, 24)
    };
    let mut bits = vec![0u8; width * height];

    let found = match PSF2Font::new(data) {
        Ok(mut spleen) => {
            let utf8_bytes = ch.to_string();
            match spleen.glyph_for_utf8(utf8_bytes.as_bytes()) {
                Some(spleen_glyph) => {
                    for (row_y, row) in spleen_glyph.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            if row_y < height && col_x < width {
                                bits[row_y * width + col_x] = if on { 1 } else { 0 };
                            }
                        }
                    }
                    true
                }
                None => false,
            }
        }
        Err(_) => false,
    };

    if !found {
        draw_box(&mut bits, width, height);
    }

    SourceGlyph {
        width,
        height,
        bits,
    }
}

/// Draw a box outline in the glyph buffer (unknown characters).
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Draw `text` with its top-left corner at (x, y).
pub fn draw(canvas: &mut Canvas, x: i64, y: i64, text: &str, px: u32, bold: bool) {
    let cell_w = advance(px) as usize;
    let cell_h = line_height(px) as usize;
    let mut cache: HashMap<char, SourceGlyph> = HashMap::new();

    for (i, ch) in text.chars().enumerate() {
        if ch == ' ' {
            continue;
        }
        let glyph = cache.entry(ch).or_insert_with(|| source_glyph(ch, px));
        let cell_x = x + (i * cell_w) as i64;

        for dy in 0..cell_h {
            for dx in 0..cell_w {
                let sx = dx * glyph.width / cell_w;
                let sy = dy * glyph.height / cell_h;
                if glyph.bits[sy * glyph.width + sx] == 0 {
                    continue;
                }
                let (px_x, px_y) = (cell_x + dx as i64, y + dy as i64);
                canvas.set_black(px_x, px_y);
                if bold {
                    canvas.set_black(px_x + 1, px_y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BLACK;

    #[test]
    fn test_measure_is_monospace() {
        assert_eq!(measure("abc", 24, false), (36, 24));
        assert_eq!(measure("abc", 24, true), (37, 24));
        assert_eq!(measure("", 24, false), (0, 0));
    }

    #[test]
    fn test_tiny_sizes_keep_one_pixel_cells() {
        assert_eq!(advance(1), 1);
        assert_eq!(measure("ab", 0, false), (2, 1));
    }

    #[test]
    fn test_draw_inks_inside_cell() {
        let mut canvas = Canvas::new(40, 30);
        draw(&mut canvas, 0, 0, "H", 24, false);
        let image = canvas.into_image();
        let inked: Vec<_> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == BLACK)
            .collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|(x, y, _)| *x < 12 && *y < 24));
    }

    #[test]
    fn test_bold_draws_more_ink() {
        let count = |bold| {
            let mut canvas = Canvas::new(80, 20);
            draw(&mut canvas, 0, 0, "Hg", 16, bold);
            canvas
                .into_image()
                .pixels()
                .filter(|p| **p == BLACK)
                .count()
        };
        assert!(count(true) > count(false));
    }
}
