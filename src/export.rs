//! # Export
//!
//! Batch composition and the band sinks:
//!
//! | Sink | Output |
//! |------|--------|
//! | [`save_each`] | `band_{n}_{card}.png`, one per band (n counts from 1) |
//! | [`save_stacked`] | `bands_all.png`, every band stacked top to bottom |
//! | [`save_pdf_each`] | `band_{n}_{card}.pdf`, one single-page PDF per band |
//! | [`save_pdf_single`] | `bands_all.pdf`, one page per band |
//!
//! PNGs carry a pHYs chunk and PDF pages are sized to the band, so both
//! print at the band's physical size.
//!
//! Compositions are independent, so a batch runs on rayon's pool. Output
//! order always matches input order.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{RgbImage, RgbaImage, imageops};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfLayerReference, Px,
};
use rayon::prelude::*;

use crate::band::{ComposedBand, Compositor};
use crate::canvas::WHITE;
use crate::error::WristbandError;
use crate::font::FontSource;
use crate::record::PatientRecord;

/// File name of the stacked PNG sheet.
pub const STACKED_PNG_NAME: &str = "bands_all.png";

/// File name of the multi-page PDF.
pub const STACKED_PDF_NAME: &str = "bands_all.pdf";

const MM_PER_INCH: f32 = 25.4;

/// One composed record of a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Position in the input, from 0.
    pub index: usize,
    pub card: String,
    pub band: Result<ComposedBand, WristbandError>,
}

/// Compose every record in parallel.
pub fn compose_batch(
    compositor: &Compositor<'_>,
    records: &[PatientRecord],
    fonts: &FontSource,
    logo: Option<&RgbaImage>,
) -> Vec<BatchItem> {
    records
        .par_iter()
        .enumerate()
        .map(|(index, record)| BatchItem {
            index,
            card: record.card_number().to_string(),
            band: compositor.compose(record, fonts, logo),
        })
        .collect()
}

/// File name for one band. Characters that are unsafe in a path become `_`.
pub fn band_file_name(index: usize, card: &str, extension: &str) -> String {
    let card: String = card
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("band_{}_{}.{}", index + 1, card, extension)
}

/// Bands of `items` that composed, logging the ones that did not.
fn composed(items: &[BatchItem]) -> Vec<(&BatchItem, &RgbImage)> {
    items
        .iter()
        .filter_map(|item| match &item.band {
            Ok(band) => Some((item, &band.image)),
            Err(e) => {
                tracing::warn!(index = item.index, card = %item.card, error = %e, "band skipped");
                None
            }
        })
        .collect()
}

// ============================================================================
// PNG
// ============================================================================

/// PNG resolution unit: pixels per metre at `dpi`.
pub fn pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}

/// Encode an image as PNG bytes tagged with `dpi`.
pub fn to_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>, WristbandError> {
    let mut png_bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut png_bytes, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let ppm = pixels_per_meter(dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;
    Ok(png_bytes)
}

/// Write each band to its own PNG in `dir`.
pub fn save_each(
    dir: &Path,
    items: &[BatchItem],
    dpi: u32,
) -> Result<Vec<PathBuf>, WristbandError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (item, image) in composed(items) {
        let path = dir.join(band_file_name(item.index, &item.card, "png"));
        std::fs::write(&path, to_png(image, dpi)?)?;
        written.push(path);
    }
    tracing::info!(count = written.len(), dir = %dir.display(), "bands exported");
    Ok(written)
}

/// Stack bands vertically on one white sheet as wide as the widest band.
pub fn stack(bands: &[&RgbImage]) -> RgbImage {
    let width = bands.iter().map(|b| b.width()).max().unwrap_or(0);
    let height = bands.iter().map(|b| b.height()).sum();
    let mut sheet = RgbImage::from_pixel(width, height, WHITE);
    let mut y = 0i64;
    for band in bands {
        imageops::replace(&mut sheet, *band, 0, y);
        y += band.height() as i64;
    }
    sheet
}

/// Write every composed band of `items` to `dir/bands_all.png`.
pub fn save_stacked(
    dir: &Path,
    items: &[BatchItem],
    dpi: u32,
) -> Result<PathBuf, WristbandError> {
    let bands: Vec<&RgbImage> = composed(items).into_iter().map(|(_, image)| image).collect();
    if bands.is_empty() {
        return Err(WristbandError::Image("no bands to export".to_string()));
    }
    std::fs::create_dir_all(dir)?;
    let path = dir.join(STACKED_PNG_NAME);
    std::fs::write(&path, to_png(&stack(&bands), dpi)?)?;
    tracing::info!(count = bands.len(), path = %path.display(), "stacked sheet exported");
    Ok(path)
}

// ============================================================================
// PDF
// ============================================================================

/// Physical page size of an image printed at `dpi`.
pub fn page_size(image: &RgbImage, dpi: u32) -> (Mm, Mm) {
    let mm = |px: u32| Mm(px as f32 * MM_PER_INCH / dpi as f32);
    (mm(image.width()), mm(image.height()))
}

/// Draw a band over the whole page.
fn place_band(layer: PdfLayerReference, band: &RgbImage, dpi: u32) {
    let image = Image::from(ImageXObject {
        width: Px(band.width() as usize),
        height: Px(band.height() as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: band.as_raw().clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });
    image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(dpi as f32),
            ..Default::default()
        },
    );
}

/// Write `bands` to `path`, one page each.
fn write_pdf(
    path: &Path,
    title: &str,
    bands: &[&RgbImage],
    dpi: u32,
) -> Result<(), WristbandError> {
    let Some((first, rest)) = bands.split_first() else {
        return Err(WristbandError::Pdf("no bands to export".to_string()));
    };

    let (width, height) = page_size(first, dpi);
    let (doc, page, layer) = PdfDocument::new(title, width, height, "Band");
    place_band(doc.get_page(page).get_layer(layer), first, dpi);

    for band in rest {
        let (width, height) = page_size(band, dpi);
        let (page, layer) = doc.add_page(width, height, "Band");
        place_band(doc.get_page(page).get_layer(layer), band, dpi);
    }

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer)
        .map_err(|e| WristbandError::Pdf(format!("{}: {}", path.display(), e)))
}

/// Write each band to its own single-page PDF in `dir`.
pub fn save_pdf_each(
    dir: &Path,
    items: &[BatchItem],
    dpi: u32,
) -> Result<Vec<PathBuf>, WristbandError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (item, image) in composed(items) {
        let path = dir.join(band_file_name(item.index, &item.card, "pdf"));
        write_pdf(&path, &format!("Band {}", item.card), &[image], dpi)?;
        written.push(path);
    }
    tracing::info!(count = written.len(), dir = %dir.display(), "band PDFs exported");
    Ok(written)
}

/// Write every composed band of `items` to `dir/bands_all.pdf`, one page each.
pub fn save_pdf_single(
    dir: &Path,
    items: &[BatchItem],
    dpi: u32,
) -> Result<PathBuf, WristbandError> {
    let bands: Vec<&RgbImage> = composed(items).into_iter().map(|(_, image)| image).collect();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(STACKED_PDF_NAME);
    write_pdf(&path, "Bands", &bands, dpi)?;
    tracing::info!(pages = bands.len(), path = %path.display(), "band PDF exported");
    Ok(path)
}
