//! Deterministic base prompt built from the filled ad-copy fields

use tracing::debug;

use crate::prompt::fields::{filled_text, Filled};
use crate::prompt::params::GenerationParams;

const INTRO_SUFFIX: &str = "with a realistic and professional layout";

/// Composition, framing and content-safety rules appended to every base prompt
pub const COMPOSITION_RULES: &str = concat!(
    "Professional advertising poster composition featuring a confident, well-dressed ",
    "professional man or woman in category-appropriate business attire standing naturally ",
    "in the frame, visible from head down to at least the waist, occupying the right or left ",
    "third of the image with sharp focus on their upper body and face, while the main product ",
    "or service is prominently displayed in the remaining space, both subjects lit with studio ",
    "lighting and a subtle rim light on the edges, against a clean gradient background from deep ",
    "charcoal to midnight black, shallow depth of field, professional color grading, high-end ",
    "commercial aesthetic, 4K quality, and ample negative space so that no element overlaps the ",
    "model's face or shoulders, shot from a full-frame camera perspective. ",
    "CRITICAL: Full-bleed edge-to-edge composition with NO frames, NO borders, NO mockups, ",
    "NO device screens, NO containers - content must extend to all edges of the image canvas. ",
    "CONTENT SAFETY: All content must be family-friendly, professional and appropriate for all ",
    "ages, with modest attire suitable for the category (business suit, medical scrubs, chef ",
    "uniform, etc.) - absolutely NO revealing clothing, NO suggestive poses, NO 18+ content",
);

/// Build the base prompt for a set of params.
///
/// Only filled fields contribute a clause; the result is never empty.
pub fn compose(params: &GenerationParams) -> String {
    let category = filled_text(&params.category);
    let product_name = filled_text(&params.product_name);
    let subheadline = filled_text(&params.subheadline);

    let mut parts: Vec<String> = Vec::new();

    parts.push(match (category, product_name) {
        (Some(category), _) => format!(
            "Create a clean, modern {} advertising poster {}",
            category, INTRO_SUFFIX
        ),
        (None, Some(product)) => format!(
            "Create a clean, modern advertising poster for {} {}",
            product, INTRO_SUFFIX
        ),
        (None, None) => format!("Create a clean, modern advertising poster {}", INTRO_SUFFIX),
    });

    if let Some(brand) = filled_text(&params.brand_name) {
        parts.push(format!("Brand: {}", brand));
    }
    if let Some(product) = product_name.filter(|p| *p != "product") {
        parts.push(format!("Product/Service: {}", product));
    }

    if let Some(headline) = filled_text(&params.headline) {
        parts.push(format!("Main Headline (large, prominent): '{}'", headline));
    }
    if let Some(sub) = subheadline {
        parts.push(format!("Subheadline: '{}'", sub));
    }
    if let Some(body) = filled_text(&params.body_copy) {
        parts.push(format!("Description: '{}'", body));
    }

    if let Some(features) = params.feature_list.as_ref().filter(|f| f.is_filled()) {
        parts.push(format!(
            "Features Section (display exactly as written):\n{}",
            features.as_bullets()
        ));
    }

    let pricing = labelled(&[
        ("Price", &params.price),
        ("Original Price (crossed out)", &params.original_price),
        ("Discount/Offer", &params.discount_text),
        ("Offer Badge", &params.offer_label),
    ]);
    if !pricing.is_empty() {
        parts.push(format!("Pricing Section: {}", pricing.join(", ")));
    }

    let contact = labelled(&[
        ("Phone", &params.phone),
        ("Email", &params.email),
        ("Website", &params.website),
        ("Location", &params.location),
        ("Additional Contact", &params.contact_info),
    ]);
    if !contact.is_empty() {
        parts.push(format!("Contact Section: {}", contact.join(", ")));
    }

    if let Some(cta) = filled_text(&params.cta_text) {
        parts.push(format!("Call-to-Action Button: '{}'", cta));
    }

    if let Some(tagline) = filled_text(&params.tagline).filter(|t| Some(*t) != subheadline) {
        parts.push(format!("Tagline: '{}'", tagline));
    }

    let design: Vec<String> = [
        ("color theme", &params.color_theme),
        ("background", &params.background_color),
        ("text color", &params.text_color),
    ]
    .iter()
    .filter_map(|(label, value)| filled_text(value).map(|v| format!("{}: {}", label, v)))
    .collect();
    if !design.is_empty() {
        parts.push(format!("Design Style: {}", design.join(", ")));
    }

    parts.push(COMPOSITION_RULES.to_string());

    let prompt = format!("{}.", parts.join(". "));

    let filled = filled_fields(params);
    debug!(
        filled_count = filled.len(),
        filled_fields = %filled.join(", "),
        length = prompt.chars().count(),
        "Base prompt composed"
    );

    prompt
}

/// `Label: 'value'` for every filled field, in order
fn labelled(fields: &[(&str, &Option<String>)]) -> Vec<String> {
    fields
        .iter()
        .filter_map(|(label, value)| filled_text(value).map(|v| format!("{}: '{}'", label, v)))
        .collect()
}

fn filled_fields(params: &GenerationParams) -> Vec<&'static str> {
    let checks: [(&'static str, bool); 9] = [
        ("product_name", params.product_name.is_filled()),
        ("category", params.category.is_filled()),
        ("brand_name", params.brand_name.is_filled()),
        ("headline", params.headline.is_filled()),
        ("subheadline", params.subheadline.is_filled()),
        ("body_copy", params.body_copy.is_filled()),
        ("features", params.feature_list.is_filled()),
        ("price", params.price.is_filled()),
        ("cta", params.cta_text.is_filled()),
    ];

    checks
        .iter()
        .filter(|(_, filled)| *filled)
        .map(|(name, _)| *name)
        .collect()
}
