const DRAFT_SCHEMA: &str = r#"{"name":"...","servings":4,"method":"...","ingredients":[{"rawText":"2 cups flour","quantity":2,"unitName":"cup","ingredientName":"flour"}]}"#;

pub const VISION_PROMPT: &str = concat!(
    "Extract the recipe from this image of a recipe book page and return ONLY a JSON object ",
    "with no prose or markdown fences. The JSON must have this exact structure: ",
    r#"{"name":"...","servings":4,"method":"...","ingredients":[{"rawText":"2 cups flour","quantity":2,"unitName":"cup","ingredientName":"flour"}]}"#
);

/// Prompt asking the text model for a JSON-only draft of `text`.
pub fn text_prompt(text: &str) -> String {
    format!(
        "Extract the recipe from the following text and return ONLY a JSON object \
         with no prose or markdown fences. The JSON must have this exact structure: \
         {DRAFT_SCHEMA}\n\nText:\n{text}"
    )
}
