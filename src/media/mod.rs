//! Media helpers - base64 payloads, format sniffing and PNG conversion

pub mod base64;
pub mod format;

use crate::error::Result;

/// A reference image ready to send to a vision provider
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub media_type: &'static str,
    pub data: String,
}

impl EncodedImage {
    /// Prepare an uploaded base64 image: clean it, sniff its type, and convert
    /// formats the vision provider cannot read into PNG.
    pub fn from_upload(raw: &str) -> Result<Self> {
        let bytes = base64::decode(raw)?;
        let media_type = format::media_type_or_png(&bytes);

        if format::VISION_MEDIA_TYPES.contains(&media_type) {
            return Ok(Self {
                media_type,
                data: base64::clean(raw),
            });
        }

        tracing::info!(media_type, "Converting reference image to PNG");
        let png = format::convert_to_png(&bytes)?;
        Ok(Self {
            media_type: "image/png",
            data: base64::encode(&png),
        })
    }
}
