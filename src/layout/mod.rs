//! # Band Layout
//!
//! Decides where every piece of text goes before anything is drawn.
//!
//! ```text
//!   gap ┬
//!       │ NAME (name font, bold)
//!   gap ┤
//!       │ Card: 123456 (bold)
//!   gap ┤
//!       │ EXTRA TEXT (2× regular line height)
//!   gap ┤
//!       │ field columns (packer)            ┐ available
//!   gap ┴ bottom of band                    ┘
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`wrap`] | Greedy word wrap with truncation |
//! | [`pack`] | Two-column field packer |
//! | [`fit`] | Font size search |

pub mod fit;
pub mod pack;
pub mod wrap;

pub use fit::{FitOutcome, FitSearch, MIN_FONT_SIZE, SearchStrategy, find_fitting_size};
pub use pack::{LAYOUT_FIELDS, LayoutField, LinePlacement, PackParams, PackedLayout, PackingOutcome, pack};
pub use wrap::{ELLIPSIS, wrap};

use crate::font::{DefaultFontSet, ResolvedFonts, SizedFont};
use crate::geometry::Geometry;
use crate::record::PatientRecord;

/// Text drawn on one band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandContent {
    pub name: String,
    /// `Card: {number}`, empty when the record has no card number.
    pub card_line: String,
    pub extra: Option<String>,
    /// Formatted layout fields, in packing order.
    pub fields: Vec<String>,
}

impl BandContent {
    pub fn from_record(record: &PatientRecord) -> Self {
        let card = record.card_number();
        Self {
            name: record.patient_name().to_string(),
            card_line: if card.is_empty() {
                String::new()
            } else {
                format!("Card: {}", card)
            },
            extra: record.extra_text().map(str::to_string),
            fields: pack::field_texts(record),
        }
    }
}

/// Fonts for one candidate size.
#[derive(Debug, Clone)]
pub struct TrialFonts {
    pub regular: SizedFont,
    pub bold: SizedFont,
    /// Regular face at twice the regular size.
    pub extra: SizedFont,
    pub name: SizedFont,
}

impl TrialFonts {
    /// The resolved faces at `size`; the name keeps its own size.
    pub fn at(fonts: &ResolvedFonts, size: u32) -> Self {
        Self {
            regular: fonts.regular.resized(size),
            bold: fonts.bold.resized(size),
            extra: fonts.regular.resized(size * 2),
            name: fonts.name.clone(),
        }
    }

    /// The process defaults, keeping the requested name font.
    pub fn defaults(defaults: &DefaultFontSet, name: &SizedFont) -> Self {
        Self {
            regular: defaults.regular.clone(),
            bold: defaults.bold.clone(),
            extra: defaults.regular.resized(defaults.regular.px() * 2),
            name: name.clone(),
        }
    }
}

/// Vertical extent of one stacked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: u32,
    pub height: u32,
}

impl Span {
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Vertical positions of the mandatory stack and the room left below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackLayout {
    pub name: Span,
    pub card: Option<Span>,
    pub extra: Option<Span>,
    /// First y of the packed area.
    pub fields_top: u32,
    /// Height left for the packer; zero or negative when nothing fits.
    pub available: i64,
}

impl StackLayout {
    pub fn measure(content: &BandContent, fonts: &TrialFonts, geometry: &Geometry) -> Self {
        let gap = geometry.gap;
        let mut y = gap;

        let name = Span {
            y,
            height: fonts.name.measure(&content.name).1,
        };
        y = name.bottom() + gap;

        let card = (!content.card_line.is_empty()).then(|| Span {
            y,
            height: fonts.bold.line_height(),
        });
        if let Some(span) = card {
            y = span.bottom() + gap;
        }

        let extra = content.extra.as_ref().map(|_| Span {
            y,
            height: fonts.regular.line_height() * 2,
        });
        if let Some(span) = extra {
            y = span.bottom() + gap;
        }

        Self {
            name,
            card,
            extra,
            fields_top: y,
            available: geometry.text_bottom() as i64 - y as i64,
        }
    }
}

/// Everything the compositor needs to draw the text of one band.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    pub fonts: TrialFonts,
    pub stack: StackLayout,
    pub packing: PackingOutcome,
    pub outcome: FitOutcome,
}

impl LayoutPlan {
    /// Regular text size actually used.
    pub fn size(&self) -> u32 {
        self.fonts.regular.px()
    }
}

/// Settle fonts and positions for `content`.
///
/// With auto-fit off the base size is used verbatim, even if fields are
/// dropped. With auto-fit on, the largest fitting size wins; when none fits
/// the default fonts are used.
pub fn plan(
    content: &BandContent,
    fonts: &ResolvedFonts,
    defaults: &DefaultFontSet,
    geometry: &Geometry,
    min_size: u32,
    strategy: SearchStrategy,
) -> LayoutPlan {
    let base_size = fonts.base_size();
    let (trial, fitted) = if fonts.auto_fit {
        match FitSearch::new(content, fonts, geometry).find(base_size, min_size, strategy) {
            Some(size) => (TrialFonts::at(fonts, size), true),
            None => (TrialFonts::defaults(defaults, &fonts.name), false),
        }
    } else {
        (TrialFonts::at(fonts, base_size), true)
    };

    let stack = StackLayout::measure(content, &trial, geometry);
    let params = PackParams {
        column_width: geometry.column_width(),
        available_height: stack.available.max(0) as u32,
        line_height: trial.regular.line_height(),
        spacing: geometry.gap,
    };
    let packing = pack(&content.fields, &trial.regular, params);

    let size = trial.regular.px();
    let dropped = packing.dropped_fields();
    let outcome = match (fitted, dropped) {
        (false, dropped) => FitOutcome::DegradedDefault { dropped },
        (true, 0) => FitOutcome::Fit { size },
        (true, dropped) => FitOutcome::PartialOverflow { size, dropped },
    };
    tracing::debug!(size, name_size = trial.name.px(), ?outcome, "layout planned");

    LayoutPlan {
        fonts: trial,
        stack,
        packing,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontSource;
    use crate::record::RecordField;
    use pretty_assertions::assert_eq;

    fn builtin(base_size: u32, name_size: u32, auto_fit: bool) -> ResolvedFonts {
        FontSource::Builtin {
            base_size,
            name_size,
            auto_fit,
        }
        .resolve()
    }

    fn short_record() -> PatientRecord {
        PatientRecord::new()
            .with(RecordField::PatientName, "Ana Lima")
            .with(RecordField::CardNumber, "1")
            .with(RecordField::Sex, "F")
    }

    #[test]
    fn test_content_from_record() {
        let content = BandContent::from_record(&short_record());
        assert_eq!(content.name, "Ana Lima");
        assert_eq!(content.card_line, "Card: 1");
        assert_eq!(content.extra, None);
        assert_eq!(content.fields.len(), LAYOUT_FIELDS.len());
    }

    #[test]
    fn test_stack_positions() {
        let geometry = Geometry::default();
        let content = BandContent::from_record(&short_record());
        let fonts = TrialFonts::at(&builtin(18, 30, true), 18);
        let stack = StackLayout::measure(&content, &fonts, &geometry);
        assert_eq!(stack.name, Span { y: 6, height: 30 });
        assert_eq!(stack.card, Some(Span { y: 42, height: 18 }));
        assert_eq!(stack.extra, None);
        assert_eq!(stack.fields_top, 66);
        assert_eq!(stack.available, 230 - 66);
    }

    #[test]
    fn test_stack_skips_missing_card_and_name() {
        let geometry = Geometry::default();
        let content = BandContent::from_record(&PatientRecord::new());
        let fonts = TrialFonts::at(&builtin(18, 30, true), 18);
        let stack = StackLayout::measure(&content, &fonts, &geometry);
        assert_eq!(stack.name.height, 0);
        assert_eq!(stack.card, None);
        assert_eq!(stack.fields_top, 12);
    }

    #[test]
    fn test_extra_text_reserves_double_line() {
        let geometry = Geometry::default();
        let record = short_record().with(RecordField::ExtraText, "ALERGIA");
        let content = BandContent::from_record(&record);
        let fonts = TrialFonts::at(&builtin(14, 20, true), 14);
        let stack = StackLayout::measure(&content, &fonts, &geometry);
        let card = stack.card.unwrap();
        let extra = stack.extra.unwrap();
        assert_eq!(extra.height, 28);
        assert!(extra.y > card.bottom());
        assert!(stack.fields_top > extra.bottom());
    }

    #[test]
    fn test_plan_without_auto_fit_keeps_requested_size() {
        let content = BandContent::from_record(&short_record());
        let fonts = builtin(50, 50, false);
        let plan = plan(
            &content,
            &fonts,
            &DefaultFontSet::default(),
            &Geometry::default(),
            MIN_FONT_SIZE,
            SearchStrategy::Linear,
        );
        assert_eq!(plan.size(), 50);
        assert!(matches!(
            plan.outcome,
            FitOutcome::PartialOverflow { size: 50, dropped } if dropped > 0
        ));
    }

    #[test]
    fn test_plan_degrades_to_defaults() {
        let content = BandContent::from_record(&short_record());
        let fonts = builtin(50, 400, true);
        let defaults = DefaultFontSet::default();
        let plan = plan(
            &content,
            &fonts,
            &defaults,
            &Geometry::default(),
            MIN_FONT_SIZE,
            SearchStrategy::Linear,
        );
        assert_eq!(plan.size(), defaults.regular.px());
        assert_eq!(plan.fonts.name.px(), 400);
        assert_eq!(
            plan.outcome,
            FitOutcome::DegradedDefault {
                dropped: LAYOUT_FIELDS.len()
            }
        );
        assert_eq!(plan.packing.layout().line_count(), 0);
    }
}
