use crate::extractors::{parse_draft, text_prompt, Extractor};
use crate::model::{Draft, ExtractionSource};
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::{debug, warn};
use scraper::{Html, Node};
use std::sync::Arc;

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Sends the readable page text to a generative text model and parses its
/// JSON reply.
pub struct TextLlmExtractor {
    provider: Arc<dyn LlmProvider>,
    max_text_length: usize,
}

impl TextLlmExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, max_text_length: usize) -> Self {
        Self {
            provider,
            max_text_length,
        }
    }
}

#[async_trait]
impl Extractor for TextLlmExtractor {
    fn name(&self) -> &str {
        "text-llm"
    }

    async fn extract(&self, html: &str, source_url: &str) -> Option<Draft> {
        if !self.provider.is_configured() {
            debug!(
                "TextLlmExtractor: no credential for {}, skipping",
                self.provider.provider_name()
            );
            return None;
        }

        let text = truncate(readable_text(html), self.max_text_length);
        let reply = match self.provider.generate_text(&text_prompt(&text)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    "TextLlmExtractor: request to {} failed: {}",
                    self.provider.provider_name(),
                    e
                );
                return None;
            }
        };

        match parse_draft(&reply, ExtractionSource::TextAi, Some(source_url.to_string())) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!("TextLlmExtractor: unusable reply: {}", e);
                None
            }
        }
    }
}

/// Visible text of an HTML document with whitespace collapsed.
pub fn readable_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

fn truncate(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text,
    }
}
