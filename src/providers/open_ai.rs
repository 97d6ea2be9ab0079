use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::providers::{read_json, resolve_api_key, LlmProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_VISION_MODEL: &str = "gpt-4o";

pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    vision_model: String,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        // Try config first, then fall back to environment variable
        let api_key = resolve_api_key(config.api_key.as_deref(), "OPENAI_API_KEY");

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
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

    async fn chat(&self, model: &str, content: Value) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "model": model,
                "messages": [
                    {"role": "user", "content": content}
                ],
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        let response_body = read_json(response).await?;
        debug!("{:?}", response_body);

        response_body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::ParseError("Failed to extract content from response".into()))
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.chat(&self.text_model, json!(prompt)).await
    }

    async fn generate_vision(
        &self,
        image: &[u8],
        media_type: &str,
        prompt: &str,
    ) -> Result<String, LlmError> {
        let data_url = format!("data:{};base64,{}", media_type, STANDARD.encode(image));
        let content = json!([
            {"type": "text", "text": prompt},
            {"type": "image_url", "image_url": {"url": data_url}}
        ]);
        self.chat(&self.vision_model, content).await
    }
}
