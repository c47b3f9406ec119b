//! Base64 encoding and decoding utilities

use base64::{engine::general_purpose::STANDARD, Engine};
use crate::error::{AppError, Result};

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Strip a `data:` URL prefix and any embedded whitespace from a base64 payload
pub fn clean(encoded: &str) -> String {
    let trimmed = encoded.trim();
    let payload = match trimmed.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => trimmed,
    };

    payload.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Decode base64 string (plain or data URL) to binary data
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(clean(encoded))
        .map_err(|e| AppError::InvalidRequest(format!("Invalid base64 data: {}", e)))
}

/// Check if a string is valid base64
pub fn is_valid(data: &str) -> bool {
    STANDARD.decode(clean(data)).is_ok()
}
