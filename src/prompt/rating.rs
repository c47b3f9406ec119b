//! Relative-length star ratings and layout descriptions for variations

use serde::Serialize;

const PREVIEW_CHARS: usize = 200;

const LAYOUT_DESCRIPTIONS: [&str; 3] = [
    "Person: Right | Content: Left | Warm lighting, beige gradient",
    "Person: Left | Content: Right | Dramatic lighting, dark gradient",
    "Person: Left | Content: Right | Cool lighting, light gradient",
];

/// Rating plus layout blurb for one variation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariationMetadata {
    pub rating: u8,
    pub description: &'static str,
}

/// A rated prompt variation as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptVariation {
    pub id: usize,
    pub prompt: String,
    pub preview: String,
    pub length: usize,
    pub rating: u8,
    pub description: &'static str,
}

/// Layout description for a one-based variation number
pub fn describe_variation(number: usize) -> &'static str {
    LAYOUT_DESCRIPTIONS[number.saturating_sub(1) % LAYOUT_DESCRIPTIONS.len()]
}

/// Map lengths onto 3..=5 stars relative to the shortest and longest.
///
/// With fewer than two lengths, or when all are equal, every entry gets 4.
pub fn rate_lengths(lengths: &[usize]) -> Vec<u8> {
    let (min, max) = match (lengths.iter().min(), lengths.iter().max()) {
        (Some(&min), Some(&max)) if lengths.len() > 1 && max > min => (min, max),
        _ => return vec![4; lengths.len()],
    };

    let span = (max - min) as f64;
    lengths
        .iter()
        .map(|&len| {
            let ratio = (len - min) as f64 / span;
            if ratio >= 0.9 {
                5
            } else if ratio >= 0.5 {
                4
            } else {
                3
            }
        })
        .collect()
}

/// Rating and description for each prompt, in order
pub fn assign_ratings(prompts: &[String]) -> Vec<VariationMetadata> {
    let lengths: Vec<usize> = prompts.iter().map(|p| p.chars().count()).collect();

    rate_lengths(&lengths)
        .into_iter()
        .enumerate()
        .map(|(i, rating)| VariationMetadata {
            rating,
            description: describe_variation(i + 1),
        })
        .collect()
}

fn preview(prompt: &str) -> String {
    if prompt.chars().count() > PREVIEW_CHARS {
        let head: String = prompt.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        prompt.to_string()
    }
}

/// Wrap finished prompts into rated variations with one-based ids
pub fn build_variations(prompts: Vec<String>) -> Vec<PromptVariation> {
    let metadata = assign_ratings(&prompts);

    prompts
        .into_iter()
        .zip(metadata)
        .enumerate()
        .map(|(i, (prompt, meta))| PromptVariation {
            id: i + 1,
            preview: preview(&prompt),
            length: prompt.chars().count(),
            prompt,
            rating: meta.rating,
            description: meta.description,
        })
        .collect()
}
