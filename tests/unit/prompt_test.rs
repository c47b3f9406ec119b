//! Unit tests for the prompt pipeline

use ad_studio::prompt::composer::COMPOSITION_RULES;
use ad_studio::prompt::enhancer::{fallback_prompt, temperature_for, PromptEnhancer};
use ad_studio::prompt::rating::rate_lengths;
use ad_studio::prompt::reference::reference_variations;
use ad_studio::prompt::{build_variations, compose, is_filled, FeatureList, GenerationParams};
use serde_json::{json, Value};

fn params(value: Value) -> GenerationParams {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_empty_params_produce_generic_prompt() {
    let prompt = compose(&GenerationParams::default());

    assert!(prompt.starts_with(
        "Create a clean, modern advertising poster with a realistic and professional layout. "
    ));
    assert!(prompt.ends_with(&format!("{}.", COMPOSITION_RULES)));
    assert!(!prompt.contains("Brand:"));
    assert!(!prompt.contains("Pricing Section"));
}

#[test]
fn test_headline_clause() {
    let prompt = compose(&params(json!({
        "category": "Real Estate",
        "headline": "Luxury Living",
        "aspect_ratio": "instagram_post"
    })));

    assert!(prompt.starts_with("Create a clean, modern Real Estate advertising poster"));
    assert!(prompt.contains("Main Headline (large, prominent): 'Luxury Living'"));
}

#[test]
fn test_whitespace_fields_are_ignored() {
    let prompt = compose(&params(json!({
        "headline": "   ",
        "price": "",
        "phone": "+1 555 0100",
        "feature_list": ["", null, "  "]
    })));

    assert!(!prompt.contains("Main Headline"));
    assert!(!prompt.contains("Pricing Section"));
    assert!(!prompt.contains("Features Section"));
    assert!(prompt.contains("Contact Section: Phone: '+1 555 0100'"));
}

#[test]
fn test_is_filled_table() {
    assert!(!is_filled(&None::<String>));
    assert!(!is_filled(""));
    assert!(!is_filled("   "));
    assert!(is_filled("x"));
    assert!(!is_filled(&Vec::<String>::new()));
    assert!(!is_filled(&vec![String::new(), " ".to_string()]));
    assert!(is_filled(&vec![String::new(), "a".to_string()]));
    assert!(!is_filled(&FeatureList::Text("  ".to_string())));
    assert!(!is_filled(&json!(0)));
    assert!(is_filled(&json!(3)));
    assert!(!is_filled(&Value::Null));
}

#[test]
fn test_ratings_follow_relative_length() {
    assert_eq!(rate_lengths(&[10, 15, 20]), vec![3, 4, 5]);
    assert_eq!(rate_lengths(&[42, 42]), vec![4, 4]);
    assert_eq!(rate_lengths(&[7]), vec![4]);
    assert!(rate_lengths(&[]).is_empty());
}

#[test]
fn test_variations_are_numbered_and_previewed() {
    let long = "x".repeat(250);
    let variations = build_variations(vec!["short".to_string(), long.clone()]);

    assert_eq!(variations[0].id, 1);
    assert_eq!(variations[1].id, 2);
    assert_eq!(variations[0].preview, "short");
    assert_eq!(variations[1].preview, format!("{}...", "x".repeat(200)));
    assert_eq!(variations[1].length, 250);
    assert_eq!(variations[0].rating, 3);
    assert_eq!(variations[1].rating, 5);
    assert_eq!(variations[1].prompt, long);
}

#[tokio::test]
async fn test_enhancer_without_generator_uses_templates() {
    let enhancer = PromptEnhancer::new(None);
    let prompts = enhancer.enhance_all("BASE", 4).await;

    assert_eq!(prompts.len(), 4);
    assert_eq!(
        prompts[0],
        "confident professional man in category-appropriate business attire positioned on right third of the frame, product on left side. BASE"
    );
    assert_eq!(prompts[3], fallback_prompt("BASE", 0));
    assert_eq!(prompts[2], fallback_prompt("BASE", 2));
}

#[test]
fn test_temperature_is_clamped() {
    assert!((temperature_for(0) - 0.7).abs() < 1e-6);
    assert!((temperature_for(2) - 0.9).abs() < 1e-6);
    assert_eq!(temperature_for(9), 1.0);
}

#[test]
fn test_reference_variations_include_overrides() {
    let p = params(json!({
        "headline": "Summer Sale",
        "cta_text": "Shop Now",
        "feature_list": "Free shipping\nEasy returns"
    }));

    let prompts = reference_variations("A red sneaker on white", &p, 5);
    assert_eq!(prompts.len(), 5);
    for prompt in &prompts {
        assert!(prompt.contains("A red sneaker on white"));
        assert!(prompt.contains("'Summer Sale'"));
        assert!(prompt.contains("'Shop Now'"));
    }
    assert!(prompts[4].starts_with("Exact visual recreation: "));
}

#[test]
fn test_unknown_param_keys_survive() {
    let p = params(json!({ "aspect_ratio": "pinterest", "campaign": { "id": 7 } }));
    let back = serde_json::to_value(&p).unwrap();
    assert_eq!(back["campaign"]["id"], 7);
    assert_eq!(back["aspect_ratio"], "pinterest");
}
