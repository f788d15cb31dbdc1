use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::errors::{AppError, Result};

/// Pixel size of one QR module.
const MODULE_PIXELS: u32 = 10;

/// Encodes `data` as a PNG QR code (error correction L, quiet zone included).
pub fn render_png(data: &str) -> Result<Vec<u8>> {
    let qr_code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::QrEncoding(e.to_string()))?;

    let image = qr_code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AppError::QrEncoding(e.to_string()))?;

    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(png: &[u8]) -> String {
        let image = image::load_from_memory(png).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            image.width() as usize,
            image.height() as usize,
            |x, y| image.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_meta, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn png_scans_back_to_the_input() {
        let url = "http://localhost:5000/t/abcd1234";
        let png = render_png(url).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode(&png), url);
    }

    #[test]
    fn long_urls_still_scan() {
        let url = format!("https://example.com/{}", "a".repeat(500));
        assert_eq!(decode(&render_png(&url).unwrap()), url);
    }

    #[test]
    fn different_urls_produce_different_images() {
        let a = render_png("http://localhost/t/aaaaaaaa").unwrap();
        let b = render_png("http://localhost/t/bbbbbbbb").unwrap();
        assert_ne!(a, b);
    }
}
