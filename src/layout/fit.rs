//! Auto-fit font size search.
//!
//! A size fits when the name, card and extra-text stack leaves a positive
//! height below it and the packer places every field line in two columns.
//! Smaller sizes never need more room (narrower glyphs wrap into no more
//! lines, shorter lines stack lower), so the predicate is monotone and the
//! first fit found scanning downward is the largest.

use super::pack::{PackParams, pack};
use super::{BandContent, StackLayout, TrialFonts};
use crate::font::ResolvedFonts;
use crate::geometry::Geometry;

/// Smallest size the search will try.
pub const MIN_FONT_SIZE: u32 = 6;

/// Narrowest column the packer is asked to fill.
const MIN_COLUMN_WIDTH: u32 = 20;

/// How candidate sizes are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Every size from the base down, one step at a time.
    #[default]
    Linear,
    /// Binary search over the monotone fit predicate.
    Bisect,
}

/// How a band's font size was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// Everything fits at `size`.
    Fit { size: u32 },
    /// No size down to the floor fit; the default fonts were used and
    /// `dropped` fields did not make it onto the band.
    DegradedDefault { dropped: usize },
    /// Auto-fit was off and the requested `size` dropped `dropped` fields.
    PartialOverflow { size: u32, dropped: usize },
}

impl FitOutcome {
    /// Fields left off the band.
    pub fn dropped(&self) -> usize {
        match self {
            FitOutcome::Fit { .. } => 0,
            FitOutcome::DegradedDefault { dropped } => *dropped,
            FitOutcome::PartialOverflow { dropped, .. } => *dropped,
        }
    }
}

/// Fit predicate over one record's content.
#[derive(Debug, Clone, Copy)]
pub struct FitSearch<'a> {
    pub content: &'a BandContent,
    pub fonts: &'a ResolvedFonts,
    pub geometry: &'a Geometry,
}

impl<'a> FitSearch<'a> {
    pub fn new(content: &'a BandContent, fonts: &'a ResolvedFonts, geometry: &'a Geometry) -> Self {
        Self {
            content,
            fonts,
            geometry,
        }
    }

    /// Whether every field fits at `size`.
    pub fn fits_at(&self, size: u32) -> bool {
        let trial = TrialFonts::at(self.fonts, size);
        let stack = StackLayout::measure(self.content, &trial, self.geometry);
        if stack.available <= 0 {
            return false;
        }
        let column_width = self.geometry.column_width();
        if column_width <= MIN_COLUMN_WIDTH {
            return false;
        }
        let params = PackParams {
            column_width,
            available_height: stack.available as u32,
            line_height: trial.regular.line_height(),
            spacing: self.geometry.gap,
        };
        pack(&self.content.fields, &trial.regular, params).fits()
    }

    /// Largest size in `min_size..=base_size` that fits.
    pub fn find(&self, base_size: u32, min_size: u32, strategy: SearchStrategy) -> Option<u32> {
        let found = match strategy {
            SearchStrategy::Linear => self.find_linear(base_size, min_size),
            SearchStrategy::Bisect => self.find_bisect(base_size, min_size),
        };
        match found {
            Some(size) => tracing::debug!(size, base_size, "auto-fit size found"),
            None => tracing::debug!(base_size, min_size, "no size fits"),
        }
        found
    }

    fn find_linear(&self, base_size: u32, min_size: u32) -> Option<u32> {
        (min_size..=base_size).rev().find(|&size| self.fits_at(size))
    }

    fn find_bisect(&self, base_size: u32, min_size: u32) -> Option<u32> {
        if min_size > base_size {
            return None;
        }
        if self.fits_at(base_size) {
            return Some(base_size);
        }
        if !self.fits_at(min_size) {
            return None;
        }
        // Invariant: lo fits, hi does not.
        let (mut lo, mut hi) = (min_size, base_size);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.fits_at(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(lo)
    }
}

/// Largest size from `base_size` down to `min_size` at which `content` fits.
pub fn find_fitting_size(
    base_size: u32,
    min_size: u32,
    content: &BandContent,
    fonts: &ResolvedFonts,
    geometry: &Geometry,
) -> Option<u32> {
    FitSearch::new(content, fonts, geometry).find(base_size, min_size, SearchStrategy::Linear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontSource;
    use crate::record::{PatientRecord, RecordField};

    fn fonts(base_size: u32, name_size: u32) -> ResolvedFonts {
        FontSource::Builtin {
            base_size,
            name_size,
            auto_fit: true,
        }
        .resolve()
    }

    fn long_mother_record() -> PatientRecord {
        PatientRecord::new()
            .with(RecordField::PatientName, "Ana Lima")
            .with(RecordField::CardNumber, "1")
            .with(
                RecordField::MotherName,
                "Maria Aparecida dos Santos Oliveira Pereira da Silva Conceição Albuquerque Ramos",
            )
    }

    #[test]
    fn test_huge_size_never_fits() {
        let content = BandContent::from_record(&long_mother_record());
        let fonts = fonts(50, 50);
        let geometry = Geometry::default();
        let search = FitSearch::new(&content, &fonts, &geometry);
        assert!(!search.fits_at(200));
    }

    #[test]
    fn test_fit_predicate_is_monotone() {
        let content = BandContent::from_record(&long_mother_record());
        let fonts = fonts(50, 50);
        let geometry = Geometry::default();
        let search = FitSearch::new(&content, &fonts, &geometry);
        for size in (MIN_FONT_SIZE + 1)..=60 {
            if search.fits_at(size) {
                assert!(search.fits_at(size - 1), "size {} fits but {} does not", size, size - 1);
            }
        }
    }

    #[test]
    fn test_bisect_matches_linear() {
        let geometry = Geometry::default();
        let fonts = fonts(50, 50);
        for record in [long_mother_record(), PatientRecord::new()] {
            let content = BandContent::from_record(&record);
            let search = FitSearch::new(&content, &fonts, &geometry);
            assert_eq!(
                search.find(50, MIN_FONT_SIZE, SearchStrategy::Linear),
                search.find(50, MIN_FONT_SIZE, SearchStrategy::Bisect)
            );
        }
    }

    #[test]
    fn test_name_too_tall_means_no_fit() {
        let record = long_mother_record();
        let content = BandContent::from_record(&record);
        let fonts = fonts(50, 400);
        assert_eq!(
            find_fitting_size(50, MIN_FONT_SIZE, &content, &fonts, &Geometry::default()),
            None
        );
    }

    #[test]
    fn test_empty_range() {
        let content = BandContent::from_record(&PatientRecord::new());
        let fonts = fonts(10, 10);
        let geometry = Geometry::default();
        let search = FitSearch::new(&content, &fonts, &geometry);
        assert_eq!(search.find(5, MIN_FONT_SIZE, SearchStrategy::Linear), None);
        assert_eq!(search.find(5, MIN_FONT_SIZE, SearchStrategy::Bisect), None);
    }

    #[test]
    fn test_dropped_counts() {
        assert_eq!(FitOutcome::Fit { size: 10 }.dropped(), 0);
        assert_eq!(FitOutcome::DegradedDefault { dropped: 2 }.dropped(), 2);
        assert_eq!(FitOutcome::PartialOverflow { size: 50, dropped: 3 }.dropped(), 3);
    }
}
