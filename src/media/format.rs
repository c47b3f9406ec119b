//! Image format sniffing and conversion for reference uploads

use image::ImageFormat;
use std::io::Cursor;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// Media types the vision provider accepts as-is
pub const VISION_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Detect a media type from binary data using magic bytes
pub fn detect_media_type(data: &[u8]) -> Option<&'static str> {
    let head = &data[..data.len().min(32)];

    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if head.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if head.starts_with(b"BM") {
        return Some("image/bmp");
    }
    if head.starts_with(b"II*\x00") || head.starts_with(b"MM\x00*") {
        return Some("image/tiff");
    }
    if head.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return Some("image/x-icon");
    }
    if head.starts_with(b"<") {
        return Some("image/svg+xml");
    }

    // ISO-BMFF containers carry the brand right after "ftyp"
    let window = &head[..head.len().min(20)];
    if contains(window, b"ftyp") {
        if contains(window, b"avif") {
            return Some("image/avif");
        }
        if contains(window, b"heic") || contains(window, b"mif1") {
            return Some("image/heic");
        }
    }

    None
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Media type for raw bytes, defaulting to PNG when unknown
pub fn media_type_or_png(data: &[u8]) -> &'static str {
    detect_media_type(data).unwrap_or_else(|| {
        warn!("Unknown image type, defaulting to image/png");
        "image/png"
    })
}

/// Re-encode any decodable image as PNG, flattening transparency onto white
pub fn convert_to_png(data: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(data)
        .map_err(|e| AppError::InvalidRequest(format!("Unsupported image data: {}", e)))?;

    let rgba = decoded.to_rgba8();
    let mut flattened = image::RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        flattened.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }

    let mut out = Cursor::new(Vec::new());
    flattened
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("PNG encoding failed: {}", e)))?;

    let png = out.into_inner();
    debug!(size = png.len(), "Converted image to PNG");
    Ok(png)
}
