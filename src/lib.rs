//! # Wristband - Patient Wristband Label Composer
//!
//! Wristband turns patient records into print-ready wristband images for a
//! thermal band printer. It provides:
//!
//! - **Geometry**: physical band dimensions resolved to pixels at a DPI
//! - **Layout**: word wrap, a two-column field packer and font auto-fit
//! - **Composition**: QR code, stacked headings, packed fields, logo, timestamp
//! - **Import/export**: CSV records in, PNG bands out
//!
//! ## Quick Start
//!
//! ```no_run
//! use wristband::{
//!     band::Compositor,
//!     font::{DefaultFontSet, FontSource},
//!     geometry::Geometry,
//!     record,
//! };
//!
//! // Fallback fonts are built once and shared by every composition
//! let defaults = DefaultFontSet::builtin();
//! let compositor = Compositor::new(Geometry::default(), &defaults);
//!
//! // Import records
//! let records = record::read_csv(std::fs::File::open("patients.csv")?)?;
//!
//! // Compose and save the first band
//! let fonts = FontSource::Builtin { base_size: 40, name_size: 50, auto_fit: true };
//! let band = compositor.compose(&records[0], &fonts, None)?;
//! band.image.save("band.png")?;
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | Band dimensions and derived regions |
//! | [`font`] | Font faces, measurement, system font discovery |
//! | [`layout`] | Wrap, pack and auto-fit |
//! | [`band`] | Band compositor |
//! | [`record`] | Patient records and CSV import |
//! | [`export`] | Batch composition and PNG output |
//! | [`prefs`] | Persisted font preferences |
//! | [`error`] | Error types |
//!
//! ## Band Format
//!
//! Tested against a 29.5cm × 2cm band at 300 DPI, printable between 3.5cm
//! and 13.5cm from the left edge. Other DPIs scale every region.

pub mod band;
pub mod canvas;
pub mod code;
pub mod error;
pub mod export;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod logo;
pub mod prefs;
pub mod record;

// Re-exports for convenience
pub use band::{ComposeOptions, ComposedBand, Compositor, OverflowPolicy};
pub use error::WristbandError;
pub use geometry::Geometry;
pub use layout::{FitOutcome, SearchStrategy};
pub use record::{PatientRecord, RecordField};
