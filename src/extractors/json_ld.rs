use crate::extractors::Extractor;
use crate::model::{Draft, ExtractionSource, ImportedLine};
use async_trait::async_trait;
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

/// Nesting deeper than this is not searched for a Recipe node
const MAX_DEPTH: usize = 32;

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

/// Reads schema.org `Recipe` markup embedded as JSON-LD.
pub struct JsonLdExtractor;

impl JsonLdExtractor {
    pub fn parse(&self, html: &str, source_url: &str) -> Option<Draft> {
        let document = Html::parse_document(html);

        for (index, script) in document.select(&SCRIPT_SELECTOR).enumerate() {
            let Some(json_ld) = parse_json_ld(&script.text().collect::<String>(), index) else {
                continue;
            };

            if let Some(recipe) = find_recipe(&json_ld, 0) {
                debug!("JsonLdExtractor: Found recipe in script {}", index);
                return Some(convert_to_draft(recipe, source_url));
            }
            debug!("JsonLdExtractor: No recipe found in JSON-LD {}", index);
        }

        None
    }
}

#[async_trait]
impl Extractor for JsonLdExtractor {
    fn name(&self) -> &str {
        "json-ld"
    }

    async fn extract(&self, html: &str, source_url: &str) -> Option<Draft> {
        self.parse(html, source_url)
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Depth-first search through arrays and `@graph` lists for the first Recipe node.
fn find_recipe(value: &Value, depth: usize) -> Option<&Value> {
    if depth > MAX_DEPTH {
        return None;
    }
    match value {
        Value::Array(items) => items.iter().find_map(|item| find_recipe(item, depth + 1)),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            map.get("@graph")
                .and_then(|graph| find_recipe(graph, depth + 1))
        }
        _ => None,
    }
}

fn convert_to_draft(recipe: &Value, source_url: &str) -> Draft {
    let mut draft = Draft::new(ExtractionSource::Structured, Some(source_url.to_string()));
    draft.name = recipe
        .get("name")
        .and_then(Value::as_str)
        .map(decode_html_symbols);
    draft.servings = recipe.get("recipeYield").and_then(parse_servings);
    draft.method = recipe.get("recipeInstructions").and_then(parse_instructions);
    draft.ingredient_lines = match recipe.get("recipeIngredient") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .map(|line| ImportedLine::from_raw_text(decode_html_symbols(&line)))
            .collect(),
        Some(Value::String(line)) => vec![ImportedLine::from_raw_text(decode_html_symbols(line))],
        _ => Vec::new(),
    };
    draft
}

/// Leading integer of the (first) yield value, e.g. "4 servings" -> 4.
fn parse_servings(recipe_yield: &Value) -> Option<i32> {
    let first = match recipe_yield {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let text = scalar_text(first)?;
    text.split_whitespace().next()?.parse().ok()
}

fn parse_instructions(instructions: &Value) -> Option<String> {
    let steps = match instructions {
        Value::String(text) => return Some(decode_html_symbols(text)),
        Value::Array(items) => items.iter().flat_map(step_texts).collect::<Vec<_>>(),
        Value::Object(_) => step_texts(instructions),
        _ => return None,
    };
    if steps.is_empty() {
        return None;
    }
    Some(steps.join("\n\n"))
}

/// Texts of a single instruction entry; a HowToSection yields one per step.
fn step_texts(step: &Value) -> Vec<String> {
    match step {
        Value::String(text) => non_empty(decode_html_symbols(text)).into_iter().collect(),
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("itemListElement") {
                return items.iter().flat_map(step_texts).collect();
            }
            map.get("text")
                .or_else(|| map.get("name"))
                .and_then(Value::as_str)
                .map(decode_html_symbols)
                .and_then(non_empty)
                .into_iter()
                .collect()
        }
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn decode_html_symbols(text: &str) -> String {
    // Some sites double-encode entities
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

/// Well-formed blocks are parsed as-is; only a block that fails to parse is
/// sanitized and retried.
fn parse_json_ld(raw_json: &str, index: usize) -> Option<Value> {
    if let Ok(json_ld) = serde_json::from_str::<Value>(raw_json) {
        return Some(json_ld);
    }
    match serde_json::from_str::<Value>(&sanitize_json(raw_json)) {
        Ok(json_ld) => Some(json_ld),
        Err(e) => {
            debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
            None
        }
    }
}

fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = json_str.trim().to_string();

    // Remove any HTML comments that might be present
    cleaned = cleaned.replace("<!--", "").replace("-->", "");

    // Remove any trailing comma followed by closing brace/bracket
    cleaned.replace(",]", "]").replace(",}", "}")
}
