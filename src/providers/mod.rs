mod anthropic;
mod factory;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use open_ai::OpenAIProvider;

use crate::error::LlmError;
use async_trait::async_trait;
use serde_json::Value;

/// Unified trait for the generative services used by the AI extractors
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Whether a non-blank credential is available. Extractors skip
    /// unconfigured providers without making a call.
    fn is_configured(&self) -> bool;

    /// Send a single text prompt and return the reply text
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError>;

    /// Send an image together with a text prompt and return the reply text
    async fn generate_vision(
        &self,
        image: &[u8],
        media_type: &str,
        prompt: &str,
    ) -> Result<String, LlmError>;
}

/// Picks the configured key when present, otherwise the provider's
/// environment variable. Blank keys count as missing.
pub(crate) fn resolve_api_key(configured: Option<&str>, env_var: &str) -> Option<String> {
    let key = match configured {
        Some(key) => Some(key.to_string()),
        None => std::env::var(env_var).ok(),
    };
    key.filter(|k| !k.trim().is_empty())
}

/// Turns a non-2xx reply into [`LlmError::ApiError`], otherwise parses the body.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
