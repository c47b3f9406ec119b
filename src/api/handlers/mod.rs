//! HTTP handlers, grouped by the part of the studio they serve

pub mod assist;
pub mod gallery;
pub mod images;
pub mod prompts;
pub mod system;
pub mod users;

use crate::error::{AppError, Result};

/// Variations and images per request when the client does not say
pub const DEFAULT_BATCH: u32 = 3;

/// Resolve a client-supplied batch size against its configured ceiling
pub(crate) fn batch_size(requested: Option<u32>, max: u32, field: &str) -> Result<usize> {
    let count = requested.unwrap_or(DEFAULT_BATCH);
    if count == 0 || count > max {
        return Err(AppError::InvalidRequest(format!(
            "{} must be between 1 and {}",
            field, max
        )));
    }
    Ok(count as usize)
}

/// Model label shown to users for a subscription tier
pub(crate) fn model_label(is_paid: bool) -> &'static str {
    if is_paid {
        "Gemini 2.5 Flash Image"
    } else {
        "Azure FLUX"
    }
}
