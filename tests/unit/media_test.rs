//! Unit tests for reference image handling and filename rules

use ad_studio::media::{base64, format, EncodedImage};
use ad_studio::storage::naming::{image_filename, is_safe_name, sanitize_category};
use image::ImageFormat;
use std::io::Cursor;

fn encoded(img_format: ImageFormat) -> String {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([200, 10, 10, 128]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, img_format)
        .unwrap();
    base64::encode(&out.into_inner())
}

#[test]
fn test_base64_decode_data_url() {
    let data_url = "data:image/png;base64,SGVsbG8s\nIFdvcmxkIQ==";
    let decoded = base64::decode(data_url).unwrap();

    assert_eq!(b"Hello, World!", decoded.as_slice());
}

#[test]
fn test_base64_is_valid() {
    assert!(base64::is_valid("SGVsbG8sIFdvcmxkIQ=="));
    assert!(base64::is_valid("data:image/png;base64,SGVsbG8sIFdvcmxkIQ=="));
    assert!(!base64::is_valid("not valid base64!!!"));
}

#[test]
fn test_png_upload_passes_through() {
    let png = encoded(ImageFormat::Png);
    let upload = format!("data:image/png;base64,{}", png);

    let image = EncodedImage::from_upload(&upload).unwrap();
    assert_eq!(image.media_type, "image/png");
    assert_eq!(image.data, png);
}

#[test]
fn test_bmp_upload_is_converted_to_png() {
    let bmp = encoded(ImageFormat::Bmp);

    let image = EncodedImage::from_upload(&bmp).unwrap();
    assert_eq!(image.media_type, "image/png");

    let bytes = base64::decode(&image.data).unwrap();
    assert_eq!(format::detect_media_type(&bytes), Some("image/png"));
    assert!(format::VISION_MEDIA_TYPES.contains(&image.media_type));
}

#[test]
fn test_garbage_upload_is_rejected() {
    assert!(EncodedImage::from_upload("%%%").is_err());
}

#[test]
fn test_category_sanitizer() {
    assert_eq!(sanitize_category("Real Estate"), "Real_Estate");
    assert_eq!(sanitize_category("Real Estate!"), "Real_Estate");
    assert_eq!(sanitize_category("a__b"), "a_b");
    assert_eq!(sanitize_category("  Food & Drink!! "), "Food_Drink");
    assert_eq!(sanitize_category("e-commerce"), "e-commerce");
    assert_eq!(sanitize_category("***"), "general");
    assert_eq!(sanitize_category(""), "general");
}

#[test]
fn test_generated_filenames() {
    let name = image_filename("acme", "Real Estate");
    assert!(name.starts_with("acme_Real_Estate_"));
    assert!(name.ends_with(".png"));

    let hex = &name["acme_Real_Estate_".len()..name.len() - 4];
    assert_eq!(hex.len(), 8);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(is_safe_name(&name));

    assert!(!is_safe_name("../etc/passwd"));
    assert!(!is_safe_name("a/b.png"));
}
