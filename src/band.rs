//! # Band Compositor
//!
//! Draws one record onto a fresh canvas, in a fixed order:
//!
//! 1. White background, border around the printable region
//! 2. QR code of the card number
//! 3. Font size settled by [`layout::plan`]
//! 4. Name, card line and extra text, centred in the text column
//! 5. Packed field columns
//! 6. Logo in the non-printable area
//! 7. Generation timestamp, bottom right of the text column
//!
//! Every call is independent: nothing is cached between records.
//!
//! ## Example
//!
//! ```
//! use wristband::band::Compositor;
//! use wristband::font::{DefaultFontSet, FontSource};
//! use wristband::geometry::Geometry;
//! use wristband::record::{PatientRecord, RecordField};
//!
//! let defaults = DefaultFontSet::builtin();
//! let compositor = Compositor::new(Geometry::default(), &defaults);
//! let record = PatientRecord::new()
//!     .with(RecordField::PatientName, "Ana Lima")
//!     .with(RecordField::CardNumber, "1");
//! let fonts = FontSource::Builtin { base_size: 18, name_size: 18, auto_fit: true };
//!
//! let band = compositor.compose(&record, &fonts, None)?;
//! assert_eq!(band.image.dimensions(), (3484, 236));
//! # Ok::<(), wristband::WristbandError>(())
//! ```

use chrono::{Local, NaiveDateTime};
use image::{RgbImage, RgbaImage};

use crate::canvas::Canvas;
use crate::code;
use crate::error::WristbandError;
use crate::font::{DefaultFontSet, FontSource, SizedFont};
use crate::geometry::{Geometry, Rect};
use crate::layout::{self, BandContent, FitOutcome, MIN_FONT_SIZE, SearchStrategy};
use crate::logo;
use crate::record::PatientRecord;

/// Timestamp format stamped on every band.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Border stroke around the printable region.
const BORDER_WIDTH: u32 = 3;

/// What to do when fields do not fit on a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Draw what fits; the drop count is reported in [`FitOutcome`].
    #[default]
    Drop,
    /// Fail the composition with [`WristbandError::Overflow`].
    Reject,
}

/// Layout knobs for a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    pub strategy: SearchStrategy,
    pub min_size: u32,
    pub overflow: OverflowPolicy,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Linear,
            min_size: MIN_FONT_SIZE,
            overflow: OverflowPolicy::Drop,
        }
    }
}

/// A packed field line as drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnLine {
    pub column: usize,
    pub field: usize,
    pub rect: Rect,
    pub text: String,
}

/// Where everything landed on a band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandReport {
    pub outcome: FitOutcome,
    /// Regular text size used.
    pub size: u32,
    pub name_size: u32,
    pub line_height: u32,
    pub code: Option<Rect>,
    pub name: Rect,
    pub card: Option<Rect>,
    pub extra: Option<Rect>,
    pub fields_top: u32,
    pub lines: Vec<DrawnLine>,
    pub logo: Option<Rect>,
    pub timestamp: Rect,
}

impl BandReport {
    /// Drawn lines of one column, top to bottom.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &DrawnLine> {
        self.lines.iter().filter(move |l| l.column == column)
    }
}

/// A finished band image and its layout report.
#[derive(Debug, Clone)]
pub struct ComposedBand {
    pub image: RgbImage,
    pub report: BandReport,
}

/// Composes bands for a fixed geometry.
#[derive(Debug, Clone)]
pub struct Compositor<'a> {
    geometry: Geometry,
    defaults: &'a DefaultFontSet,
    options: ComposeOptions,
}

impl<'a> Compositor<'a> {
    pub fn new(geometry: Geometry, defaults: &'a DefaultFontSet) -> Self {
        Self {
            geometry,
            defaults,
            options: ComposeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Compose a band stamped with the current local time.
    pub fn compose(
        &self,
        record: &PatientRecord,
        fonts: &FontSource,
        logo: Option<&RgbaImage>,
    ) -> Result<ComposedBand, WristbandError> {
        self.compose_at(record, fonts, logo, Local::now().naive_local())
    }

    /// Compose a band stamped with `generated_at`.
    pub fn compose_at(
        &self,
        record: &PatientRecord,
        fonts: &FontSource,
        logo: Option<&RgbaImage>,
        generated_at: NaiveDateTime,
    ) -> Result<ComposedBand, WristbandError> {
        let g = &self.geometry;
        let mut canvas = Canvas::new(g.width, g.height);

        canvas.stroke_rect(
            Rect::new(g.printable_left, 0, g.printable_width, g.height),
            BORDER_WIDTH,
        );

        let code = self.draw_code(&mut canvas, record.card_number());

        let content = BandContent::from_record(record);
        let resolved = fonts.resolve();
        let plan = layout::plan(
            &content,
            &resolved,
            self.defaults,
            g,
            self.options.min_size,
            self.options.strategy,
        );

        let dropped = plan.outcome.dropped();
        if dropped > 0 {
            match self.options.overflow {
                OverflowPolicy::Drop => tracing::warn!(
                    card = record.card_number(),
                    dropped,
                    "fields dropped from band"
                ),
                OverflowPolicy::Reject => {
                    return Err(WristbandError::Overflow {
                        card: record.card_number().to_string(),
                        dropped,
                    });
                }
            }
        }

        let name = self.draw_centered(
            &mut canvas,
            &plan.fonts.name,
            &content.name,
            plan.stack.name.y,
            plan.stack.name.height,
        );
        let card = plan.stack.card.map(|span| {
            self.draw_centered(
                &mut canvas,
                &plan.fonts.bold,
                &content.card_line,
                span.y,
                span.height,
            )
        });
        let extra = match (&content.extra, plan.stack.extra) {
            (Some(text), Some(span)) => Some(self.draw_centered(
                &mut canvas,
                &plan.fonts.extra,
                text,
                span.y,
                span.height,
            )),
            _ => None,
        };

        let mut lines = Vec::new();
        let column_stride = g.column_width() + g.margin;
        for (column, placements) in plan.packing.layout().columns.iter().enumerate() {
            let x = g.text_left() + column as u32 * column_stride;
            for placement in placements {
                let y = plan.stack.fields_top + placement.y;
                plan.fonts.regular.draw(&mut canvas, x as i64, y as i64, &placement.text);
                lines.push(DrawnLine {
                    column,
                    field: placement.field,
                    rect: Rect::new(
                        x,
                        y,
                        plan.fonts.regular.text_width(&placement.text),
                        plan.fonts.regular.line_height(),
                    ),
                    text: placement.text.clone(),
                });
            }
        }

        let logo = logo.map(|image| {
            let fitted = logo::fit(image, g);
            let (x, y) = logo::placement(fitted.dimensions(), g);
            canvas.blit_rgba(&fitted, x, y);
            logo::visible_rect(fitted.dimensions(), g)
        });

        let stamp = generated_at.format(TIMESTAMP_FORMAT).to_string();
        let (stamp_w, stamp_h) = plan.fonts.regular.measure(&stamp);
        let stamp_x = (g.text_left() + g.text_width()).saturating_sub(stamp_w);
        let stamp_y = g.text_bottom().saturating_sub(stamp_h);
        plan.fonts
            .regular
            .draw(&mut canvas, stamp_x as i64, stamp_y as i64, &stamp);

        let report = BandReport {
            outcome: plan.outcome,
            size: plan.size(),
            name_size: plan.fonts.name.px(),
            line_height: plan.fonts.regular.line_height(),
            code,
            name,
            card,
            extra,
            fields_top: plan.stack.fields_top,
            lines,
            logo,
            timestamp: Rect::new(stamp_x, stamp_y, stamp_w, stamp_h),
        };
        tracing::debug!(
            card = record.card_number(),
            size = report.size,
            lines = report.lines.len(),
            "band composed"
        );

        Ok(ComposedBand {
            image: canvas.into_image(),
            report,
        })
    }

    /// Draw the QR code; a generator failure leaves the spot blank.
    fn draw_code(&self, canvas: &mut Canvas, payload: &str) -> Option<Rect> {
        let side = self.geometry.code_side();
        let (x, y) = self.geometry.code_origin();
        match code::qr_code(payload, side) {
            Ok(image) => {
                canvas.blit_gray(&image, x as i64, y as i64);
                Some(Rect::new(x, y, image.width(), image.height()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "scannable code omitted");
                None
            }
        }
    }

    /// Draw `text` centred in the text column; returns the reserved box.
    fn draw_centered(
        &self,
        canvas: &mut Canvas,
        font: &SizedFont,
        text: &str,
        y: u32,
        height: u32,
    ) -> Rect {
        let g = &self.geometry;
        let width = font.text_width(text);
        let x = g.text_left() + g.text_width().saturating_sub(width) / 2;
        font.draw(canvas, x as i64, y as i64, text);
        Rect::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BLACK, WHITE};
    use crate::record::RecordField;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record() -> PatientRecord {
        PatientRecord::new()
            .with(RecordField::PatientName, "Ana Lima")
            .with(RecordField::CardNumber, "1")
            .with(RecordField::Sex, "F")
    }

    fn builtin(base_size: u32, name_size: u32, auto_fit: bool) -> FontSource {
        FontSource::Builtin {
            base_size,
            name_size,
            auto_fit,
        }
    }

    #[test]
    fn test_canvas_size_and_border() {
        let defaults = DefaultFontSet::builtin();
        let compositor = Compositor::new(Geometry::default(), &defaults);
        let band = compositor
            .compose_at(&record(), &builtin(18, 18, true), None, at(8, 0, 0))
            .unwrap();
        assert_eq!(band.image.dimensions(), (3484, 236));
        assert_eq!(*band.image.get_pixel(413, 100), BLACK);
        assert_eq!(*band.image.get_pixel(1593, 100), BLACK);
        assert_eq!(*band.image.get_pixel(100, 100), WHITE);
        assert_eq!(*band.image.get_pixel(2000, 100), WHITE);
    }

    #[test]
    fn test_code_is_placed_inside_printable_region() {
        let defaults = DefaultFontSet::builtin();
        let compositor = Compositor::new(Geometry::default(), &defaults);
        let band = compositor
            .compose_at(&record(), &builtin(18, 18, true), None, at(8, 0, 0))
            .unwrap();
        assert_eq!(band.report.code, Some(Rect::new(425, 12, 212, 212)));
        assert_eq!(*band.image.get_pixel(425, 12), BLACK);
    }

    #[test]
    fn test_text_is_centered() {
        let defaults = DefaultFontSet::builtin();
        let compositor = Compositor::new(Geometry::default(), &defaults);
        let band = compositor
            .compose_at(&record(), &builtin(18, 20, true), None, at(8, 0, 0))
            .unwrap();
        // "Ana Lima": 8 cells of 10px, bold +1
        let name = band.report.name;
        assert_eq!(name.width, 81);
        assert_eq!(name.x, 696 + (886 - 81) / 2);
        assert_eq!(name.y, 6);
    }

    #[test]
    fn test_timestamp_bottom_right() {
        let defaults = DefaultFontSet::builtin();
        let compositor = Compositor::new(Geometry::default(), &defaults);
        let band = compositor
            .compose_at(&record(), &builtin(18, 18, true), None, at(14, 30, 5))
            .unwrap();
        let stamp = band.report.timestamp;
        assert_eq!(stamp.right(), 696 + 886);
        assert_eq!(stamp.bottom(), 230);
        // "15/10/2025 14:30:05" is 19 chars of 9px
        assert_eq!(stamp.width, 19 * 9);
    }

    #[test]
    fn test_reject_policy_fails_on_overflow() {
        let defaults = DefaultFontSet::builtin();
        let options = ComposeOptions {
            overflow: OverflowPolicy::Reject,
            ..Default::default()
        };
        let compositor = Compositor::new(Geometry::default(), &defaults).with_options(options);
        let err = compositor
            .compose_at(&record(), &builtin(50, 50, false), None, at(8, 0, 0))
            .unwrap_err();
        assert!(matches!(err, WristbandError::Overflow { ref card, dropped } if card == "1" && dropped > 0));
    }

    #[test]
    fn test_drop_policy_draws_partial_columns() {
        let defaults = DefaultFontSet::builtin();
        let compositor = Compositor::new(Geometry::default(), &defaults);
        let band = compositor
            .compose_at(&record(), &builtin(50, 50, false), None, at(8, 0, 0))
            .unwrap();
        assert_eq!(band.report.size, 50);
        assert_eq!(band.report.lines.len(), 4);
        assert_eq!(band.report.column(1).count(), 2);
        assert_eq!(band.report.outcome.dropped(), 3);
    }

    #[test]
    fn test_no_logo_leaves_area_blank() {
        let defaults = DefaultFontSet::builtin();
        let compositor = Compositor::new(Geometry::default(), &defaults);
        let band = compositor
            .compose_at(&record(), &builtin(18, 18, true), None, at(8, 0, 0))
            .unwrap();
        assert_eq!(band.report.logo, None);
        let g = Geometry::default();
        for y in 0..g.height {
            for x in (g.logo_left() + 1)..g.width {
                assert_eq!(*band.image.get_pixel(x, y), WHITE);
            }
        }
    }
}
