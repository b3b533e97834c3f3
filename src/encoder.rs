use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use qrcode::{Color, QrCode};
use std::io::Cursor;

use crate::errors::{AppError, Result};

/// Output raster edge length in pixels.
const QR_SIZE: u32 = 400;
/// Quiet-zone width on each side, in modules.
const QUIET_ZONE_MODULES: u32 = 2;
/// Module color, indigo on white.
const DARK: Rgba<u8> = Rgba([0x4F, 0x46, 0xE5, 0xFF]);
const LIGHT: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

/// Renders `content` as a 400x400 PNG and returns it as a self-contained
/// data URL. Deterministic: identical input yields a bit-identical payload.
/// Fails when the content is empty or exceeds the QR symbol capacity.
pub fn encode(content: &str) -> Result<String> {
    if content.is_empty() {
        return Err(AppError::Encoding("content is empty".to_string()));
    }

    let code = QrCode::new(content.as_bytes())
        .map_err(|e| AppError::Encoding(format!("symbol generation failed: {}", e)))?;

    let width = code.width() as u32;
    let total = width + 2 * QUIET_ZONE_MODULES;
    let colors = code.into_colors();

    // Nearest-neighbor sampling over the module grid keeps the output at
    // exactly QR_SIZE regardless of symbol version.
    let mut img = RgbaImage::from_pixel(QR_SIZE, QR_SIZE, LIGHT);
    for y in 0..QR_SIZE {
        let my = y * total / QR_SIZE;
        for x in 0..QR_SIZE {
            let mx = x * total / QR_SIZE;
            let in_symbol = (QUIET_ZONE_MODULES..QUIET_ZONE_MODULES + width).contains(&mx)
                && (QUIET_ZONE_MODULES..QUIET_ZONE_MODULES + width).contains(&my);
            if in_symbol {
                let idx = ((my - QUIET_ZONE_MODULES) * width + (mx - QUIET_ZONE_MODULES)) as usize;
                if colors[idx] == Color::Dark {
                    img.put_pixel(x, y, DARK);
                }
            }
        }
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .map_err(|e| AppError::Encoding(format!("PNG encoding failed: {}", e)))?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
