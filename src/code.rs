//! # Scannable Code
//!
//! Renders the card number as a QR code (error correction level M, no quiet
//! zone), scaled nearest-neighbour to an exact square so modules stay sharp.

use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

use crate::error::WristbandError;

/// Render `payload` as a `side × side` QR code.
pub fn qr_code(payload: &str, side: u32) -> Result<GrayImage, WristbandError> {
    let code = QrCode::with_error_correction_level(payload, EcLevel::M)
        .map_err(|e| WristbandError::Image(format!("QR code generation failed: {}", e)))?;

    let modules = code.width();
    let side = side.max(modules as u32);
    let mut image = GrayImage::from_pixel(side, side, Luma([255]));

    for y in 0..side {
        let qy = y as usize * modules / side as usize;
        for x in 0..side {
            let qx = x as usize * modules / side as usize;
            if code[(qx, qy)] == qrcode::Color::Dark {
                image.put_pixel(x, y, Luma([0]));
            }
        }
    }

    Ok(image)
}
