//! # System Font Discovery
//!
//! Builds a family → files catalog from the system font database
//! (fontconfig directories on Linux, the platform font folders elsewhere).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fontdb::{Database, FaceInfo, Source, Style, Weight};

/// One font file of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    pub path: PathBuf,
    pub style: String,
}

/// Discovered fonts, keyed by family name.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    families: BTreeMap<String, Vec<FontEntry>>,
}

/// `Bold Italic`, `Bold`, `Italic`, `Oblique` or `Regular`.
fn style_name(face: &FaceInfo) -> String {
    let bold = face.weight.0 >= Weight::SEMIBOLD.0;
    let slant = match face.style {
        Style::Normal => None,
        Style::Italic => Some("Italic"),
        Style::Oblique => Some("Oblique"),
    };
    match (bold, slant) {
        (true, Some(slant)) => format!("Bold {}", slant),
        (true, None) => "Bold".to_string(),
        (false, Some(slant)) => slant.to_string(),
        (false, None) => "Regular".to_string(),
    }
}

impl FontCatalog {
    /// Discover system fonts. Never fails; an empty catalog means only the
    /// built-in font is available.
    pub fn discover() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        let catalog = Self::from_database(&db);
        tracing::debug!(
            faces = db.len(),
            families = catalog.len(),
            "system fonts discovered"
        );
        catalog
    }

    /// Register every file-backed face under each of its family names.
    /// In-memory faces have no path to hand to the loader and are skipped.
    pub fn from_database(db: &Database) -> Self {
        let mut catalog = Self::default();
        for face in db.faces() {
            let Source::File(path) = &face.source else {
                continue;
            };
            let style = style_name(face);
            for (family, _) in &face.families {
                let family = family.trim();
                if !family.is_empty() {
                    catalog.add(family, path.clone(), &style);
                }
            }
        }
        catalog
    }

    pub fn add(&mut self, family: &str, path: PathBuf, style: &str) {
        let entries = self.families.entry(family.to_string()).or_default();
        if entries.iter().any(|e| e.path == path && e.style == style) {
            return;
        }
        entries.push(FontEntry {
            path,
            style: style.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Family names in sorted order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    pub fn entries(&self, family: &str) -> &[FontEntry] {
        self.families.get(family).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pick a file for `family` matching the requested style, falling back to
    /// the family's first file. An exact style name wins over a partial one,
    /// so `Bold` is preferred to `Bold Italic` for plain bold.
    pub fn choose(&self, family: &str, bold: bool, italic: bool) -> Option<&Path> {
        let entries = self.entries(family);
        let targets: &[&str] = match (bold, italic) {
            (true, true) => &["bold italic", "bolditalic", "bold oblique"],
            (true, false) => &["bold"],
            (false, true) => &["italic", "oblique"],
            (false, false) => &["regular", "book"],
        };
        for target in targets {
            let style = |e: &&FontEntry| e.style.to_lowercase();
            let found = entries
                .iter()
                .find(|e| style(e) == *target)
                .or_else(|| entries.iter().find(|e| style(e).contains(target)));
            if let Some(entry) = found {
                return Some(&entry.path);
            }
        }
        entries.first().map(|e| e.path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/fonts")
            .join(name)
    }

    fn noto() -> FontCatalog {
        let mut catalog = FontCatalog::default();
        let dir = Path::new("/usr/share/fonts/noto");
        catalog.add("Noto Sans", dir.join("NotoSans-BoldItalic.ttf"), "Bold Italic");
        catalog.add("Noto Sans", dir.join("NotoSans-Bold.ttf"), "Bold");
        catalog.add("Noto Sans", dir.join("NotoSans-Italic.ttf"), "Italic");
        catalog.add("Noto Sans", dir.join("NotoSans-Regular.ttf"), "Regular");
        catalog.add("DejaVu Sans", dir.join("DejaVuSans.ttf"), "Book");
        catalog
    }

    fn file_name(path: Option<&Path>) -> Option<String> {
        path.and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }

    #[test]
    fn test_families_are_sorted() {
        let catalog = noto();
        let families: Vec<&str> = catalog.families().collect();
        assert_eq!(families, vec!["DejaVu Sans", "Noto Sans"]);
        assert_eq!(catalog.entries("Noto Sans").len(), 4);
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut catalog = noto();
        catalog.add(
            "Noto Sans",
            PathBuf::from("/usr/share/fonts/noto/NotoSans-Bold.ttf"),
            "Bold",
        );
        assert_eq!(catalog.entries("Noto Sans").len(), 4);
    }

    #[test]
    fn test_choose_by_style() {
        let catalog = noto();
        let pick = |bold, italic| file_name(catalog.choose("Noto Sans", bold, italic));
        assert_eq!(pick(false, false).as_deref(), Some("NotoSans-Regular.ttf"));
        assert_eq!(pick(true, false).as_deref(), Some("NotoSans-Bold.ttf"));
        assert_eq!(pick(false, true).as_deref(), Some("NotoSans-Italic.ttf"));
        assert_eq!(pick(true, true).as_deref(), Some("NotoSans-BoldItalic.ttf"));
    }

    #[test]
    fn test_choose_falls_back_to_first_file() {
        let catalog = noto();
        let path = catalog.choose("DejaVu Sans", true, false).unwrap();
        assert!(path.ends_with("DejaVuSans.ttf"));
        assert!(catalog.choose("Missing Family", false, false).is_none());
    }

    #[test]
    fn test_from_database_reads_family_and_weight() {
        let mut db = Database::new();
        db.load_font_file(fixture("DejaVuSans.ttf")).unwrap();
        db.load_font_file(fixture("DejaVuSans-Bold.ttf")).unwrap();

        let catalog = FontCatalog::from_database(&db);
        let mut styles: Vec<&str> = catalog
            .entries("DejaVu Sans")
            .iter()
            .map(|e| e.style.as_str())
            .collect();
        styles.sort();
        assert_eq!(styles, vec!["Bold", "Regular"]);

        let pick = |bold| file_name(catalog.choose("DejaVu Sans", bold, false));
        assert_eq!(pick(false).as_deref(), Some("DejaVuSans.ttf"));
        assert_eq!(pick(true).as_deref(), Some("DejaVuSans-Bold.ttf"));
    }

    #[test]
    fn test_empty_database_gives_empty_catalog() {
        let catalog = FontCatalog::from_database(&Database::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }
}
