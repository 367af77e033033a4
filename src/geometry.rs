//! # Band Geometry
//!
//! Physical dimensions of the wristband label and their raster equivalents.
//!
//! ## Layout
//!
//! ```text
//! ├─ 3.5cm ─┼──────── 10cm printable ────────┼──────── 16cm logo area ────────┤
//! │         │ QR │ name / card / extra       │                                │ 2cm
//! │         │    │ field columns │ timestamp │                                │
//! └─────────┴────────────────────────────────┴────────────────────────────────┘
//!                          29.5cm total
//! ```
//!
//! ## Usage
//!
//! ```
//! use wristband::geometry::Geometry;
//!
//! let geometry = Geometry::default();
//! assert_eq!(geometry.width, 3484);
//! assert_eq!(geometry.height, 236);
//! ```

/// Default raster resolution for generated bands.
pub const DPI: u32 = 300;

/// Band width in centimetres.
pub const BAND_WIDTH_CM: f64 = 29.5;
/// Band height in centimetres.
pub const BAND_HEIGHT_CM: f64 = 2.0;
/// Left edge of the printable region in centimetres.
pub const PRINTABLE_START_CM: f64 = 3.5;
/// Printable region width in centimetres.
pub const PRINTABLE_WIDTH_CM: f64 = 10.0;
/// Horizontal spacing unit in centimetres.
pub const SPACING_CM: f64 = 0.5;
/// Inset used around the code, the text column and the logo area.
pub const MARGIN_CM: f64 = 0.1;
/// Top/bottom margin and vertical gap between stacked lines.
pub const GAP_CM: f64 = 0.05;

/// Convert centimetres to raster units at the given resolution.
///
/// ## Example
///
/// ```
/// use wristband::geometry::cm_to_px;
///
/// assert_eq!(cm_to_px(2.54, 300), 300);
/// assert_eq!(cm_to_px(0.5, 300), 59);
/// ```
#[inline]
pub fn cm_to_px(cm: f64, dpi: u32) -> u32 {
    (cm / 2.54 * dpi as f64).round() as u32
}

/// # Band Geometry
///
/// Derived raster constants for one band. Computed once and passed by value.
///
/// | Property | 300 DPI |
/// |----------|---------|
/// | Canvas | 3484 × 236 |
/// | Printable | x 413..1594 |
/// | Spacing | 59 |
/// | Margin | 12 |
/// | Gap | 6 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Resolution used to derive every other field
    pub dpi: u32,

    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Left edge of the printable region
    pub printable_left: u32,

    /// Width of the printable region
    pub printable_width: u32,

    /// Horizontal spacing between the code and the text column
    pub spacing: u32,

    /// Code inset, right text margin, column gap, logo padding
    pub margin: u32,

    /// Top/bottom margin and vertical gap between stacked lines
    pub gap: u32,
}

impl Geometry {
    /// Resolve the fixed physical band format at `dpi`.
    pub fn resolve(dpi: u32) -> Self {
        let geometry = Self {
            dpi,
            width: cm_to_px(BAND_WIDTH_CM, dpi),
            height: cm_to_px(BAND_HEIGHT_CM, dpi),
            printable_left: cm_to_px(PRINTABLE_START_CM, dpi),
            printable_width: cm_to_px(PRINTABLE_WIDTH_CM, dpi),
            spacing: cm_to_px(SPACING_CM, dpi),
            margin: cm_to_px(MARGIN_CM, dpi),
            gap: cm_to_px(GAP_CM, dpi),
        };
        debug_assert!(geometry.printable_right() < geometry.width);
        geometry
    }

    /// Right edge (exclusive) of the printable region.
    #[inline]
    pub fn printable_right(&self) -> u32 {
        self.printable_left + self.printable_width
    }

    /// Left edge of the non-printable logo area.
    #[inline]
    pub fn logo_left(&self) -> u32 {
        self.printable_right()
    }

    /// Width of the non-printable logo area.
    #[inline]
    pub fn logo_width(&self) -> u32 {
        self.width - self.logo_left()
    }

    /// Side of the square scannable code.
    #[inline]
    pub fn code_side(&self) -> u32 {
        self.height - 2 * self.margin
    }

    /// Top-left corner of the scannable code.
    #[inline]
    pub fn code_origin(&self) -> (u32, u32) {
        (
            self.printable_left + self.margin,
            (self.height - self.code_side()) / 2,
        )
    }

    /// Left edge of the text column (right of the code plus spacing).
    #[inline]
    pub fn text_left(&self) -> u32 {
        self.code_origin().0 + self.code_side() + self.spacing
    }

    /// Width of the text column.
    #[inline]
    pub fn text_width(&self) -> u32 {
        self.printable_right() - self.text_left() - self.margin
    }

    /// Width of one of the two field columns.
    #[inline]
    pub fn column_width(&self) -> u32 {
        (self.text_width() - self.margin) / 2
    }

    /// Lowest y (exclusive) that text may reach.
    #[inline]
    pub fn text_bottom(&self) -> u32 {
        self.height - self.gap
    }

    /// Convert centimetres to pixels at this geometry's resolution.
    #[inline]
    pub fn cm(&self, cm: f64) -> u32 {
        cm_to_px(cm, self.dpi)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::resolve(DPI)
    }
}

/// Axis-aligned pixel rectangle of a drawn element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
