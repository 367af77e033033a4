//! # Preferences
//!
//! The font choice survives between runs in a small JSON file in the user's
//! home directory. A missing or unreadable file is never fatal: the defaults
//! are used and a warning is logged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WristbandError;
use crate::font::FontSelection;
use crate::geometry::{DPI, cm_to_px};

/// File name under `$HOME`.
pub const PREFS_FILE_NAME: &str = ".wristband_prefs.json";

/// Family name meaning "no system family, use the built-in font".
pub const DEFAULT_FAMILY: &str = "Default";

/// Default name size in pixels.
pub const DEFAULT_NAME_SIZE: u32 = 50;

/// Default regular size: 0.35cm at 300 DPI, scaled by 1.5.
pub fn default_font_size() -> u32 {
    (cm_to_px(0.35, DPI) as f64 * 1.5) as u32
}

/// Persisted font preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub font_family: String,
    pub font_size: u32,
    pub font_bold_flag: bool,
    pub font_italic_flag: bool,
    pub name_font_size: u32,
    pub auto_fit_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FAMILY.to_string(),
            font_size: default_font_size(),
            font_bold_flag: false,
            font_italic_flag: false,
            name_font_size: DEFAULT_NAME_SIZE,
            auto_fit_enabled: false,
        }
    }
}

impl Preferences {
    /// `$HOME/.wristband_prefs.json`, or the working directory without `HOME`.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(PREFS_FILE_NAME)
    }

    /// Read preferences; missing keys take their defaults.
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring preferences");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, WristbandError> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| WristbandError::Prefs(e.to_string()))
    }

    /// Write preferences as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), WristbandError> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| WristbandError::Prefs(e.to_string()))?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    pub fn selection(&self) -> FontSelection {
        FontSelection {
            family: self.font_family.clone(),
            bold: self.font_bold_flag,
            italic: self.font_italic_flag,
            base_size: self.font_size,
            name_size: self.name_font_size,
            auto_fit: self.auto_fit_enabled,
        }
    }

    pub fn from_selection(selection: &FontSelection) -> Self {
        Self {
            font_family: selection.family.clone(),
            font_size: selection.base_size,
            font_bold_flag: selection.bold,
            font_italic_flag: selection.italic,
            name_font_size: selection.name_size,
            auto_fit_enabled: selection.auto_fit,
        }
    }
}
