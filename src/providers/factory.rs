use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::providers::{AnthropicProvider, LlmProvider, OpenAIProvider};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the provider named in the configuration
    pub fn create(config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
        match config.provider.as_str() {
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config)?)),
            "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
            other => Err(LlmError::UnknownProvider(format!(
                "{} (available: {})",
                other,
                Self::available_providers().join(", ")
            ))),
        }
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["anthropic", "openai"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_create_anthropic_provider() {
        let provider = ProviderFactory::create(&config("anthropic")).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
        assert!(provider.is_configured());
    }

    #[test]
    fn test_create_openai_provider() {
        let provider = ProviderFactory::create(&config("openai")).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_unknown_provider() {
        match ProviderFactory::create(&config("unknown")) {
            Err(e) => assert_eq!(
                e.to_string(),
                "Unknown provider: unknown (available: anthropic, openai)"
            ),
            Ok(_) => panic!("expected unknown provider error"),
        }
    }

    #[test]
    fn test_available_providers() {
        let providers = ProviderFactory::available_providers();
        assert_eq!(providers.len(), 2);
        assert!(providers.contains(&"anthropic"));
        assert!(providers.contains(&"openai"));
    }
}
