//! # Fonts and Text Measurement
//!
//! Every piece of text on a band is measured and drawn through a
//! [`SizedFont`]: a font face at a concrete pixel size.
//!
//! ## Faces
//!
//! | Face | Source | Bold |
//! |------|--------|------|
//! | `Outline` | TTF/OTF file via ab_glyph | separate bold file |
//! | `Builtin` | Spleen bitmap glyphs | synthetic (+1px stroke) |
//!
//! Loading a face never fails from the caller's point of view: an unreadable
//! file is logged and replaced with the built-in face.
//!
//! ## Resolution
//!
//! ```text
//! FontSelection ──(FontCatalog)──► FontSource ──resolve()──► ResolvedFonts
//! ```
//!
//! `ResolvedFonts` is what the layout engine consumes.

pub mod builtin;
pub mod discovery;
pub mod ttf;

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::error::WristbandError;

pub use builtin::BUILTIN_SIZE;
pub use discovery::FontCatalog;

/// A font face, independent of size.
#[derive(Clone)]
pub enum FontFace {
    Outline(FontArc),
    Builtin,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::Outline(_) => f.write_str("Outline"),
            FontFace::Builtin => f.write_str("Builtin"),
        }
    }
}

impl FontFace {
    /// Load an outline face from a TTF/OTF file.
    pub fn load(path: &Path) -> Result<Self, WristbandError> {
        ttf::load(path).map(FontFace::Outline)
    }

    /// Load an outline face, substituting the built-in face on failure.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(face) => face,
            Err(e) => {
                tracing::warn!(error = %e, "font unavailable, using built-in font");
                FontFace::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin)
    }

    /// This face at `px` pixels.
    pub fn at(&self, px: u32) -> SizedFont {
        SizedFont {
            face: self.clone(),
            px: px.max(1),
            embolden: false,
        }
    }
}

/// A face at a concrete pixel size.
#[derive(Debug, Clone)]
pub struct SizedFont {
    face: FontFace,
    px: u32,
    embolden: bool,
}

impl SizedFont {
    /// Built-in regular face at `px`.
    pub fn builtin(px: u32) -> Self {
        FontFace::Builtin.at(px)
    }

    /// Built-in face at `px` with synthetic bold.
    pub fn builtin_bold(px: u32) -> Self {
        Self::builtin(px).emboldened()
    }

    /// Request synthetic bold. Only the built-in face honours it; outline
    /// faces get their weight from the file.
    pub fn emboldened(mut self) -> Self {
        self.embolden = self.face.is_builtin();
        self
    }

    /// Same face and weight at another size.
    pub fn resized(&self, px: u32) -> Self {
        Self {
            face: self.face.clone(),
            px: px.max(1),
            embolden: self.embolden,
        }
    }

    pub fn px(&self) -> u32 {
        self.px
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// Bounding box of `text` in pixels; empty text measures `(0, 0)`.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match &self.face {
            FontFace::Outline(font) => ttf::measure(font, self.px, text),
            FontFace::Builtin => builtin::measure(text, self.px, self.embolden),
        }
    }

    pub fn text_width(&self, text: &str) -> u32 {
        self.measure(text).0
    }

    /// Height of a full line, independent of content.
    pub fn line_height(&self) -> u32 {
        match &self.face {
            FontFace::Outline(font) => ttf::line_height(font, self.px),
            FontFace::Builtin => builtin::line_height(self.px),
        }
    }

    /// Draw `text` with the top-left of its line box at (x, y).
    pub fn draw(&self, canvas: &mut Canvas, x: i64, y: i64, text: &str) {
        match &self.face {
            FontFace::Outline(font) => ttf::draw(font, self.px, canvas, x, y, text),
            FontFace::Builtin => builtin::draw(canvas, x, y, text, self.px, self.embolden),
        }
    }
}

/// Process-wide fallback fonts, created once at startup and passed by
/// reference into every composition.
#[derive(Debug, Clone)]
pub struct DefaultFontSet {
    pub regular: SizedFont,
    pub bold: SizedFont,
}

impl DefaultFontSet {
    /// The built-in bitmap font at [`BUILTIN_SIZE`].
    pub fn builtin() -> Self {
        Self {
            regular: SizedFont::builtin(BUILTIN_SIZE),
            bold: SizedFont::builtin_bold(BUILTIN_SIZE),
        }
    }

    /// Load default fonts from files; falls back per face to the built-in.
    pub fn load(regular: &Path, bold: Option<&Path>, px: u32) -> Self {
        let regular_face = FontFace::load_or_builtin(regular);
        let bold_face = bold.map_or_else(|| regular_face.clone(), FontFace::load_or_builtin);
        Self {
            regular: regular_face.at(px),
            bold: bold_face.at(px).emboldened(),
        }
    }
}

impl Default for DefaultFontSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The user's font choice, persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSelection {
    pub family: String,
    /// Use the bold style for regular text too.
    pub bold: bool,
    pub italic: bool,
    pub base_size: u32,
    pub name_size: u32,
    pub auto_fit: bool,
}

impl FontSelection {
    /// Resolve the family against the catalog. Unknown families use the
    /// built-in font with the same sizes.
    pub fn to_source(&self, catalog: &FontCatalog) -> FontSource {
        match catalog.choose(&self.family, self.bold, self.italic) {
            Some(regular) => FontSource::Paths {
                regular: regular.to_path_buf(),
                bold: catalog
                    .choose(&self.family, true, self.italic)
                    .map(Path::to_path_buf),
                base_size: self.base_size,
                name_size: self.name_size,
                auto_fit: self.auto_fit,
            },
            None => FontSource::Builtin {
                base_size: self.base_size,
                name_size: self.name_size,
                auto_fit: self.auto_fit,
            },
        }
    }
}

/// Where the fonts for one composition come from.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// Font files plus sizing; eligible for auto-fit.
    Paths {
        regular: PathBuf,
        bold: Option<PathBuf>,
        base_size: u32,
        name_size: u32,
        auto_fit: bool,
    },
    /// The built-in face with the given sizing.
    Builtin {
        base_size: u32,
        name_size: u32,
        auto_fit: bool,
    },
    /// Ready-made fonts, used verbatim. The name is drawn with `bold`.
    Prebuilt { regular: SizedFont, bold: SizedFont },
}

impl FontSource {
    /// Open the fonts once, at the start of a composition.
    pub fn resolve(&self) -> ResolvedFonts {
        match self {
            FontSource::Paths {
                regular,
                bold,
                base_size,
                name_size,
                auto_fit,
            } => {
                let regular_face = FontFace::load_or_builtin(regular);
                let bold_face = match bold {
                    Some(path) => FontFace::load_or_builtin(path),
                    None => regular_face.clone(),
                };
                ResolvedFonts {
                    regular: regular_face.at(*base_size),
                    bold: bold_face.at(*base_size).emboldened(),
                    name: bold_face.at(*name_size).emboldened(),
                    auto_fit: *auto_fit,
                }
            }
            FontSource::Builtin {
                base_size,
                name_size,
                auto_fit,
            } => ResolvedFonts {
                regular: SizedFont::builtin(*base_size),
                bold: SizedFont::builtin_bold(*base_size),
                name: SizedFont::builtin_bold(*name_size),
                auto_fit: *auto_fit,
            },
            FontSource::Prebuilt { regular, bold } => ResolvedFonts {
                regular: regular.clone(),
                bold: bold.clone(),
                name: bold.clone(),
                auto_fit: false,
            },
        }
    }
}

/// Fonts for one composition. `regular` and `bold` are at the base size;
/// the layout engine resizes them while searching.
#[derive(Debug, Clone)]
pub struct ResolvedFonts {
    pub regular: SizedFont,
    pub bold: SizedFont,
    pub name: SizedFont,
    pub auto_fit: bool,
}

impl ResolvedFonts {
    pub fn base_size(&self) -> u32 {
        self.regular.px()
    }
}
