//! # Error Types
//!
//! This module defines error types used throughout the wristband library.
//!
//! Resource failures inside a composition (unreadable font, undecodable logo,
//! QR encoding failure) are not errors: they degrade locally and are logged.
//! The variants here cover the I/O edges and the strict overflow policy.

use thiserror::Error;

/// Main error type for wristband operations
#[derive(Debug, Error)]
pub enum WristbandError {
    /// Font file could not be read or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// PDF document error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Record import error (missing columns, malformed rows)
    #[error("CSV error: {0}")]
    Csv(String),

    /// Preference file error
    #[error("Preferences error: {0}")]
    Prefs(String),

    /// Fields were dropped while `OverflowPolicy::Reject` was in effect
    #[error("Layout overflow: {dropped} field(s) did not fit on band for card '{card}'")]
    Overflow { card: String, dropped: usize },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for WristbandError {
    fn from(e: csv::Error) -> Self {
        WristbandError::Csv(e.to_string())
    }
}

impl From<image::ImageError> for WristbandError {
    fn from(e: image::ImageError) -> Self {
        WristbandError::Image(e.to_string())
    }
}

impl From<png::EncodingError> for WristbandError {
    fn from(e: png::EncodingError) -> Self {
        WristbandError::Image(e.to_string())
    }
}
