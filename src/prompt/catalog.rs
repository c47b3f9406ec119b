//! Option catalogs served to the client for its dropdowns

use serde::Serialize;
use std::collections::BTreeMap;

use crate::generation::size::AspectRatio;

type Catalog = &'static [(&'static str, &'static str)];

pub const AD_OBJECTIVES: Catalog = &[
    ("brand_awareness", "Brand Awareness"),
    ("sales_boost", "Sales Boost"),
    ("discount_promotion", "Discount Promotion"),
    ("product_launch", "Product Launch"),
    ("event_promotion", "Event Promotion"),
];

pub const VISUAL_STYLES: Catalog = &[
    ("minimal", "Minimal & Clean"),
    ("premium", "Premium & Luxury"),
    ("modern", "Modern & Sleek"),
    ("bold", "Bold & Vibrant"),
    ("cinematic", "Cinematic"),
];

pub const LIGHTING_STYLES: Catalog = &[
    ("studio", "Studio Lighting"),
    ("natural", "Natural Light"),
    ("dramatic", "Dramatic Lighting"),
    ("soft_diffused", "Soft Diffused"),
    ("golden_hour", "Golden Hour"),
];

pub const BACKGROUNDS: Catalog = &[
    ("solid_color", "Solid Color"),
    ("gradient", "Gradient"),
    ("studio_white", "Studio White"),
    ("studio_black", "Studio Black"),
    ("blurred_depth", "Blurred Background"),
];

pub const PRODUCT_ANGLES: Catalog = &[
    ("front_view", "Front View"),
    ("45_degree", "45° Angle"),
    ("top_view", "Top View"),
    ("floating", "Floating"),
];

pub const CTA_OPTIONS: Catalog = &[
    ("shop_now", "Shop Now"),
    ("order_now", "Order Now"),
    ("learn_more", "Learn More"),
    ("get_started", "Get Started"),
    ("claim_offer", "Claim Offer"),
];

/// Everything `/api/config` returns
#[derive(Debug, Clone, Serialize)]
pub struct ConfigOptions {
    pub ad_objectives: BTreeMap<&'static str, &'static str>,
    pub visual_styles: BTreeMap<&'static str, &'static str>,
    pub lighting_styles: BTreeMap<&'static str, &'static str>,
    pub backgrounds: BTreeMap<&'static str, &'static str>,
    pub product_angles: BTreeMap<&'static str, &'static str>,
    pub cta_options: BTreeMap<&'static str, &'static str>,
    pub aspect_ratios: BTreeMap<&'static str, &'static str>,
    pub workspace_id: String,
}

impl ConfigOptions {
    pub fn new(workspace_id: impl Into<String>) -> Self {
        let to_map = |catalog: Catalog| -> BTreeMap<&'static str, &'static str> {
            catalog.iter().copied().collect()
        };

        Self {
            ad_objectives: to_map(AD_OBJECTIVES),
            visual_styles: to_map(VISUAL_STYLES),
            lighting_styles: to_map(LIGHTING_STYLES),
            backgrounds: to_map(BACKGROUNDS),
            product_angles: to_map(PRODUCT_ANGLES),
            cta_options: to_map(CTA_OPTIONS),
            aspect_ratios: AspectRatio::ALL
                .iter()
                .map(|ratio| (ratio.key(), ratio.label()))
                .collect(),
            workspace_id: workspace_id.into(),
        }
    }
}
