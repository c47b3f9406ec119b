//! Variations built from a reference-image description plus user text overrides

use tracing::debug;

use crate::prompt::fields::{filled_text, Filled};
use crate::prompt::params::GenerationParams;

/// `label 'value'` for every overridable field the user filled, in display order
pub fn text_overrides(params: &GenerationParams) -> Vec<String> {
    let text_fields: [(&str, &Option<String>); 11] = [
        ("headline text", &params.headline),
        ("subheadline", &params.subheadline),
        ("brand name", &params.brand_name),
        ("product name", &params.product_name),
        ("price", &params.price),
        ("original price", &params.original_price),
        ("discount offer", &params.discount_text),
        ("offer badge", &params.offer_label),
        ("call-to-action button", &params.cta_text),
        ("description", &params.body_copy),
        ("contact information", &params.contact_info),
    ];
    let style_fields: [(&str, &Option<String>); 7] = [
        ("location", &params.location),
        ("phone color", &params.phone_color),
        ("product color", &params.product_color),
        ("color theme", &params.color_theme),
        ("background color", &params.background_color),
        ("text color", &params.text_color),
        ("accent color", &params.accent_color),
    ];

    let mut overrides: Vec<String> = Vec::new();

    // features sit between the call-to-action and the description
    push_labelled(&mut overrides, &text_fields[..9]);
    if let Some(features) = params.feature_list.as_ref().filter(|f| f.is_filled()) {
        overrides.push(format!("features '{}'", features.inline()));
    }
    push_labelled(&mut overrides, &text_fields[9..]);
    push_labelled(&mut overrides, &style_fields);

    overrides
}

fn push_labelled(out: &mut Vec<String>, fields: &[(&str, &Option<String>)]) {
    for (label, value) in fields {
        if let Some(value) = filled_text(value) {
            out.push(format!("{} '{}'", label, value));
        }
    }
}

/// Build `count` prompts that recreate a described reference image.
///
/// Without any overrides every variation is the bare description.
pub fn reference_variations(description: &str, params: &GenerationParams, count: usize) -> Vec<String> {
    let overrides = text_overrides(params);
    debug!(overrides = overrides.len(), count, "Building reference-image variations");

    if overrides.is_empty() {
        return vec![description.to_string(); count];
    }

    let all_text = overrides.join(", ");
    let templated = [
        format!(
            "{} IMPORTANT: Add these text overlays to the image: {}. Make sure all text is clearly visible and readable.",
            description, all_text
        ),
        format!(
            "Recreate this exact visual: {}. Include these text elements prominently: {}. Text should be clear and legible.",
            description, all_text
        ),
        format!(
            "{} Add the following text overlays in appropriate positions: {}. Ensure text is visible, well-positioned, and matches the image style.",
            description, all_text
        ),
    ];

    let mut variations: Vec<String> = templated.into_iter().take(count).collect();
    while variations.len() < count {
        variations.push(format!(
            "Exact visual recreation: {}. Text overlays to include: {}. Make text prominent and readable.",
            description, all_text
        ));
    }
    variations
}
