//! Shared handling of generative-service replies: fence stripping and
//! lenient mapping of the JSON draft schema onto [`Draft`].

use crate::error::LlmError;
use crate::model::{Draft, ExtractionSource, ImportedLine};
use serde_json::Value;

/// Removes an optional surrounding markdown code fence (with or without a
/// language tag) from a model reply.
pub fn strip_markdown_fences(reply: &str) -> &str {
    let mut text = reply.trim();
    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(newline) => &text[newline + 1..],
            None => &text[3..],
        };
        if let Some(end) = text.rfind("```") {
            text = &text[..end];
        }
    }
    text.trim()
}

/// Parses a model reply into a draft. Fields of the wrong shape are dropped
/// rather than failing the whole reply; only a reply that is not a JSON
/// object is an error.
pub fn parse_draft(
    reply: &str,
    source: ExtractionSource,
    source_url: Option<String>,
) -> Result<Draft, LlmError> {
    let json: Value = serde_json::from_str(strip_markdown_fences(reply))?;
    if !json.is_object() {
        return Err(LlmError::ParseError("reply is not a JSON object".into()));
    }

    let mut draft = Draft::new(source, source_url);
    draft.name = text(&json["name"]);
    draft.servings = integer(&json["servings"]);
    draft.method = text(&json["method"]);

    if let Some(ingredients) = json["ingredients"].as_array() {
        draft.ingredient_lines = ingredients
            .iter()
            .filter(|item| item.is_object())
            .map(|item| {
                ImportedLine::new(
                    text(&item["rawText"]),
                    decimal(&item["quantity"]),
                    text(&item["unitName"]),
                    text(&item["ingredientName"]),
                )
            })
            .collect();
    }

    Ok(draft)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.split_whitespace().next()?.parse().ok(),
        _ => None,
    }
}
