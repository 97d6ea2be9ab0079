use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::providers::{read_json, resolve_api_key, LlmProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_TEXT_MODEL: &str = "claude-haiku-4-5-20251001";
const DEFAULT_VISION_MODEL: &str = "claude-sonnet-4-6";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    vision_model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_deref(), "ANTHROPIC_API_KEY");

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(AnthropicProvider {
            client: Client::builder().timeout(config.timeout()).build()?,
            api_key,
            base_url,
            text_model: config
                .text_model
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            vision_model: config
                .vision_model
                .clone()
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            max_tokens: config.max_tokens,
        })
    }

    async fn send(&self, model: &str, content: Value) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&json!({
                "model": model,
                "max_tokens": self.max_tokens,
                "messages": [
                    {
                        "role": "user",
                        "content": content
                    }
                ]
            }))
            .send()
            .await?;

        let response_body = read_json(response).await?;
        debug!("{:?}", response_body);

        response_body["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::ParseError("Failed to extract content from Anthropic response".into())
            })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.send(&self.text_model, json!(prompt)).await
    }

    async fn generate_vision(
        &self,
        image: &[u8],
        media_type: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let content = json!([
            {
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": media_type,
                    "data": STANDARD.encode(image)
                }
            },
            {
                "type": "text",
                "text": prompt
            }
        ]);
        self.send(&self.vision_model, content).await
    }
}
