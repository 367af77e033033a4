//! Two-column field packer.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┐
//! │ Born: 1990-05-12     │ Sex: F               │  ← cursor_y = 0
//! │ Mother: Maria Silva  │ Admitted: 2025-10-15 │
//! │ Insurer: SUS         │ Time: 14:30          │
//! │ Physician: Dr. Bruno │                      │  available_height
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! Column 0 fills first; when the next line would cross `available_height`
//! the packer moves to column 1. A second crossing is an overflow.

use super::wrap::wrap;
use crate::font::SizedFont;
use crate::record::{PatientRecord, RecordField};

/// A labeled field in the packed area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutField {
    pub label: &'static str,
    pub key: RecordField,
}

/// Fields packed below the name/card/extra stack, in drawing order.
pub const LAYOUT_FIELDS: &[LayoutField] = &[
    LayoutField {
        label: "Born",
        key: RecordField::BirthDate,
    },
    LayoutField {
        label: "Mother",
        key: RecordField::MotherName,
    },
    LayoutField {
        label: "Insurer",
        key: RecordField::Insurer,
    },
    LayoutField {
        label: "Physician",
        key: RecordField::Physician,
    },
    LayoutField {
        label: "Sex",
        key: RecordField::Sex,
    },
    LayoutField {
        label: "Admitted",
        key: RecordField::AdmissionDate,
    },
    LayoutField {
        label: "Time",
        key: RecordField::AdmissionTime,
    },
];

/// Format every layout field of `record` as `"{label}: {value}"`.
pub fn field_texts(record: &PatientRecord) -> Vec<String> {
    LAYOUT_FIELDS
        .iter()
        .map(|f| format!("{}: {}", f.label, record.get(f.key)))
        .collect()
}

/// Packer inputs that do not depend on the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackParams {
    pub column_width: u32,
    pub available_height: u32,
    pub line_height: u32,
    pub spacing: u32,
}

/// One wrapped line placed in a column. `y` is relative to the top of the
/// packed area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePlacement {
    pub field: usize,
    pub y: u32,
    pub text: String,
}

/// Lines per column, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedLayout {
    pub columns: [Vec<LinePlacement>; 2],
}

impl PackedLayout {
    pub fn line_count(&self) -> usize {
        self.columns[0].len() + self.columns[1].len()
    }
}

/// Result of packing at one font size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackingOutcome {
    /// Every line of every field was placed.
    Fits(PackedLayout),
    /// The second column ran out. `placed` holds the lines up to that point;
    /// `dropped_fields` counts fields not placed in full.
    Overflow {
        placed: PackedLayout,
        dropped_fields: usize,
    },
}

impl PackingOutcome {
    pub fn fits(&self) -> bool {
        matches!(self, PackingOutcome::Fits(_))
    }

    pub fn layout(&self) -> &PackedLayout {
        match self {
            PackingOutcome::Fits(layout) => layout,
            PackingOutcome::Overflow { placed, .. } => placed,
        }
    }

    pub fn dropped_fields(&self) -> usize {
        match self {
            PackingOutcome::Fits(_) => 0,
            PackingOutcome::Overflow { dropped_fields, .. } => *dropped_fields,
        }
    }
}

/// Pack `fields` (already formatted) into two columns.
pub fn pack<S: AsRef<str>>(fields: &[S], font: &SizedFont, params: PackParams) -> PackingOutcome {
    let mut layout = PackedLayout::default();
    let mut column = 0usize;
    let mut cursor_y = 0u32;

    for (index, field) in fields.iter().enumerate() {
        for line in wrap(field.as_ref(), font, params.column_width) {
            while cursor_y + params.line_height > params.available_height {
                if column == 0 {
                    column = 1;
                    cursor_y = 0;
                } else {
                    return PackingOutcome::Overflow {
                        placed: layout,
                        dropped_fields: fields.len() - index,
                    };
                }
            }
            layout.columns[column].push(LinePlacement {
                field: index,
                y: cursor_y,
                text: line,
            });
            cursor_y += params.line_height + params.spacing;
        }
    }

    PackingOutcome::Fits(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // 10px cells, 20px lines
    fn font() -> SizedFont {
        SizedFont::builtin(20)
    }

    fn params(available_height: u32) -> PackParams {
        PackParams {
            column_width: 200,
            available_height,
            line_height: 20,
            spacing: 5,
        }
    }

    #[test]
    fn test_all_in_first_column() {
        let outcome = pack(&["A: 1", "B: 2", "C: 3"], &font(), params(100));
        let layout = outcome.layout();
        assert!(outcome.fits());
        assert_eq!(layout.columns[0].len(), 3);
        assert!(layout.columns[1].is_empty());
        let ys: Vec<u32> = layout.columns[0].iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![0, 25, 50]);
    }

    #[test]
    fn test_spills_into_second_column() {
        // 45px: two lines per column (0..20, 25..45)
        let outcome = pack(&["A: 1", "B: 2", "C: 3", "D: 4"], &font(), params(45));
        let layout = outcome.layout();
        assert!(outcome.fits());
        assert_eq!(layout.columns[0].len(), 2);
        assert_eq!(layout.columns[1].len(), 2);
        assert_eq!(layout.columns[1][0].y, 0);
        assert_eq!(layout.columns[1][0].text, "C: 3");
    }

    #[test]
    fn test_overflow_keeps_placed_lines() {
        let outcome = pack(&["A: 1", "B: 2", "C: 3", "D: 4", "E: 5"], &font(), params(45));
        match outcome {
            PackingOutcome::Overflow {
                placed,
                dropped_fields,
            } => {
                assert_eq!(placed.line_count(), 4);
                assert_eq!(dropped_fields, 1);
            }
            other => panic!("expected overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_height_below_line_height_overflows_immediately() {
        for available in [0, 1, 19] {
            let outcome = pack(&["A: 1"], &font(), params(available));
            assert!(!outcome.fits());
            assert_eq!(outcome.dropped_fields(), 1);
            assert_eq!(outcome.layout().line_count(), 0);
        }
    }

    #[test]
    fn test_empty_field_list_fits() {
        let fields: [&str; 0] = [];
        assert!(pack(&fields, &font(), params(0)).fits());
    }

    #[test]
    fn test_wrapped_field_keeps_order() {
        // "Mother: Ana Maria Souza" wraps at 10 chars/line
        let mut p = params(1000);
        p.column_width = 100;
        let outcome = pack(&["Mother: Ana Maria Souza", "Sex: F"], &font(), p);
        let texts: Vec<&str> = outcome.layout().columns[0]
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Mother:", "Ana Maria", "Souza", "Sex: F"]);
    }

    #[test]
    fn test_field_texts_follow_fixed_order() {
        let mut record = PatientRecord::default();
        record.set(RecordField::Sex, "F");
        let texts = field_texts(&record);
        assert_eq!(texts.len(), LAYOUT_FIELDS.len());
        assert_eq!(texts[0], "Born: ");
        assert_eq!(texts[4], "Sex: F");
    }
}
