//! Per-variation prompt enhancement with a deterministic template fallback

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::traits::TextGenerator;
use crate::error::{AppError, Result};

/// Model styling and placement assigned to a variation slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub model: &'static str,
    pub position: &'static str,
    pub product_position: &'static str,
}

pub const PERSONAS: [Persona; 3] = [
    Persona {
        model: "confident professional man in category-appropriate business attire",
        position: "right third of the frame",
        product_position: "left side",
    },
    Persona {
        model: "well-dressed professional man in category-appropriate formal attire",
        position: "left third of the frame",
        product_position: "right side",
    },
    Persona {
        model: "confident professional woman in elegant category-appropriate business attire",
        position: "left third of the frame",
        product_position: "right side",
    },
];

const MAX_ENHANCED_CHARS: usize = 1800;

/// Persona for a zero-based variation index, cycling every three
pub fn persona_for(index: usize) -> &'static Persona {
    &PERSONAS[index % PERSONAS.len()]
}

/// Sampling temperature for a variation, rising with the index
pub fn temperature_for(index: usize) -> f32 {
    (0.7 + 0.1 * index as f32).min(1.0)
}

/// Template used whenever the remote enhancement is unavailable
pub fn fallback_prompt(base_prompt: &str, index: usize) -> String {
    let persona = persona_for(index);
    format!(
        "{} positioned on {}, product on {}. {}",
        persona.model, persona.position, persona.product_position, base_prompt
    )
}

fn enhancement_instruction(base_prompt: &str, index: usize) -> String {
    let persona = persona_for(index);
    let opening = format!(
        "{} positioned on {}, product on {}.",
        persona.model, persona.position, persona.product_position
    );

    format!(
        r#"You are an expert at writing prompts for photorealistic advertising image models.

TASK: Rewrite the base advertising prompt below into a detailed, professional image prompt of at most {max} characters.

CRITICAL REQUIREMENTS:
1. COPY ALL USER TEXT EXACTLY - every quoted headline, price, feature and contact detail stays character-for-character
2. Keep the whole output under {max} characters
3. Use EXACTLY these specifications for VARIATION {number}:
   - Model: {model}
   - Model Position: {position}
   - Product Placement: {product_position}
4. FULL-BLEED COMPOSITION: content extends edge-to-edge with NO frames, NO borders, NO mockups, NO device screens, NO containers
5. CONTENT SAFETY: family-friendly and professional, appropriate for all ages (no 18+ content, no suggestive poses, no revealing clothing)
6. ATTIRE: dress the model for the category (medical scrubs for healthcare, chef uniform for food, business suit for corporate, smart casual for tech)

CREATIVE FREEDOM (make this variation distinct):
- lighting style
- background colors and gradients
- overall aesthetic
- photography details such as depth of field and camera angle

FORMAT:
Start with: "{opening}"
Then every text element with the EXACT user text.
Then your lighting, background and aesthetic choices.
End with: "Full-bleed edge-to-edge composition, no frames or borders, content extends to all edges."

BASE PROMPT (copy all text EXACTLY):
{base}

OUTPUT ENHANCED PROMPT:"#,
        max = MAX_ENHANCED_CHARS,
        number = index + 1,
        model = persona.model,
        position = persona.position,
        product_position = persona.product_position,
        opening = opening,
        base = base_prompt,
    )
}

/// Turns one base prompt into persona-specific variations
pub struct PromptEnhancer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl PromptEnhancer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_remote(&self) -> bool {
        self.generator.is_some()
    }

    /// Enhance one variation. Never fails: any remote problem yields the template.
    pub async fn enhance(&self, base_prompt: &str, index: usize, total: usize) -> String {
        match self.try_enhance(base_prompt, index).await {
            Ok(enhanced) => {
                debug!(
                    variation = index + 1,
                    total,
                    length = enhanced.chars().count(),
                    "Variation enhanced"
                );
                enhanced
            }
            Err(e) => {
                warn!(variation = index + 1, total, error = %e, "Enhancement failed, using template");
                fallback_prompt(base_prompt, index)
            }
        }
    }

    async fn try_enhance(&self, base_prompt: &str, index: usize) -> Result<String> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| AppError::ProviderNotConfigured("Text generator".to_string()))?;

        let reply = generator
            .complete(&enhancement_instruction(base_prompt, index), temperature_for(index))
            .await?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AppError::Provider(format!(
                "{} returned an empty enhancement",
                generator.name()
            )));
        }
        Ok(reply.to_string())
    }

    /// Enhance `count` variations in order
    pub async fn enhance_all(&self, base_prompt: &str, count: usize) -> Vec<String> {
        let mut variations = Vec::with_capacity(count);
        for index in 0..count {
            variations.push(self.enhance(base_prompt, index, count).await);
        }
        info!(count = variations.len(), remote = self.is_remote(), "Prompt variations ready");
        variations
    }
}
