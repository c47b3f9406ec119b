//! Instruction texts for the reference-image and autofill calls

pub const DESCRIBE_REFERENCE: &str = r#"You are an expert at describing images for AI image generation. Analyze this image in EXTREME detail so it can be recreated EXACTLY.

Describe EVERY visual element you see:

1. MAIN SUBJECT: what it is, exact position, size relative to the frame, orientation, shape, materials, textures and finish.
2. COLORS: specific color names for the subject, the background (solid or gradient, with start and end colors) and accents, plus the overall color temperature.
3. LIGHTING: light source position and quality, highlights, shadow direction and softness, rim or edge lighting and glow.
4. BACKGROUND: type, gradient direction and colors, texture, and any background shapes.
5. COMPOSITION: subject placement, negative space, depth and perspective.
6. SURFACE & MATERIALS: reflections, what the subject rests on, material properties and texture details.
7. STYLE & EFFECTS: photography style, post-processing, special effects and overall aesthetic.
8. TECHNICAL SPECS: depth of field, focus point, image quality and aspect ratio feel.

CRITICAL: be precise enough that someone could recreate the image without seeing it. Use percentages, exact color names and specific positions, in 8-12 sentences.

IGNORE any text in the image - describe only the visual elements, composition, colors, lighting and style."#;

pub const EXTRACT_FIELDS: &str = r#"You are an expert at analyzing advertising posters. Analyze this image and extract ALL information.

OUTPUT FORMAT (JSON):
{
  "visual_description": "Detailed description of the visual scene (person, product, background, lighting, composition) - 3-4 sentences",
  "headline": "Main headline text (if visible)",
  "subheadline": "Subheadline text (if visible)",
  "body_copy": "Body text or description (if visible)",
  "price": "Price (if visible)",
  "original_price": "Original/crossed-out price (if visible)",
  "discount_text": "Discount or offer text (if visible)",
  "offer_label": "Badge text like 'SALE', 'NEW', 'LIMITED' (if visible)",
  "phone": "Phone number (if visible)",
  "email": "Email address (if visible)",
  "website": "Website URL (if visible)",
  "location": "Location or address (if visible)",
  "cta_text": "Call-to-action button text (if visible)",
  "brand_name": "Brand or company name (if visible)",
  "features": ["Feature 1", "Feature 2", "Feature 3"],
  "color_theme": "Main colors used (e.g., 'Gold, Navy Blue')",
  "background_color": "Background color or gradient",
  "category": "Best category: Real Estate, Mobile, Fashion, Food, Education, Travel, or General"
}

INSTRUCTIONS:
1. Extract ALL visible text exactly as written
2. Describe the visual scene in detail (person, product, background, lighting)
3. Identify the main colors and design style
4. Suggest the best category for this type of ad
5. If a field has no visible text, use an empty string ""
6. For features, extract bullet points or key features if visible"#;

/// Copywriting request for short poster fields
pub fn autofill(product_description: &str, category: Option<&str>, brand_name: Option<&str>) -> String {
    format!(
        r#"You are a professional advertising copywriter. Generate SHORT, CONCISE content for an advertising poster. Keep ALL text very brief for better AI image generation.

PRODUCT INFORMATION:
- Description: {description}
- Category: {category}
- Brand: {brand}

CRITICAL: keep every field VERY SHORT (2-4 words) so the image model renders the text cleanly.

Generate these fields:
1. HEADLINE: 2-4 words
2. SUBHEADLINE: 3-5 words
3. BODY_COPY: 5-8 words
4. FEATURES: 3-4 features of 2-3 words each
5. PRICE: number with currency
6. ORIGINAL_PRICE: number with currency
7. DISCOUNT_TEXT: 2-3 words
8. OFFER_LABEL: 1-2 words
9. PHONE: standard format
10. EMAIL: simple address
11. WEBSITE: simple URL
12. LOCATION: city or area only
13. CTA_TEXT: 1-2 words
14. TAGLINE: 2-4 words
15. COLOR_THEME: 2 colors
16. BACKGROUND_COLOR: 1 color or a simple gradient

OUTPUT FORMAT (JSON):
{{
  "headline": "...",
  "subheadline": "...",
  "body_copy": "...",
  "features": ["...", "...", "...", "..."],
  "price": "...",
  "original_price": "...",
  "discount_text": "...",
  "offer_label": "...",
  "phone": "...",
  "email": "...",
  "website": "...",
  "location": "...",
  "cta_text": "...",
  "tagline": "...",
  "color_theme": "...",
  "background_color": "..."
}}

Generate the JSON now:"#,
        description = product_description,
        category = category.unwrap_or("general"),
        brand = brand_name.unwrap_or("not specified"),
    )
}
