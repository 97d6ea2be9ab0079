use crate::extractors::{parse_draft, VISION_PROMPT};
use crate::model::{Draft, ExtractionSource};
use crate::providers::LlmProvider;
use log::{debug, warn};
use std::sync::Arc;

/// Reads a photographed recipe page with a generative vision model.
///
/// Not part of the URL fallback chain; image imports call it directly.
pub struct VisionExtractor {
    provider: Arc<dyn LlmProvider>,
}

impl VisionExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn extract(&self, image: &[u8], media_type: &str) -> Option<Draft> {
        if !self.provider.is_configured() {
            debug!(
                "VisionExtractor: no credential for {}, skipping",
                self.provider.provider_name()
            );
            return None;
        }

        let reply = self
            .provider
            .generate_vision(image, media_type, VISION_PROMPT)
            .await
            .map_err(|e| warn!("VisionExtractor: request failed: {}", e))
            .ok()?;

        parse_draft(&reply, ExtractionSource::VisionAi, None)
            .map_err(|e| warn!("VisionExtractor: unusable reply: {}", e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::providers::AnthropicProvider;
    use mockito::Server;

    fn provider(base_url: String, api_key: &str) -> Arc<dyn LlmProvider> {
        let config = LlmConfig {
            api_key: Some(api_key.to_string()),
            base_url: Some(base_url),
            ..LlmConfig::default()
        };
        Arc::new(AnthropicProvider::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_extracts_draft_from_image() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(
                r#"{"content": [{"type": "text", "text": "{\"name\": \"Scones\", \"servings\": 12, \"ingredients\": [{\"rawText\": \"225 g flour\", \"quantity\": 225, \"unitName\": \"g\", \"ingredientName\": \"flour\"}]}"}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let extractor = VisionExtractor::new(provider(server.url(), "key"));
        let draft = extractor.extract(&[0xFF, 0xD8], "image/jpeg").await.unwrap();

        assert_eq!(draft.name.as_deref(), Some("Scones"));
        assert_eq!(draft.servings, Some(12));
        assert_eq!(draft.extraction_source, ExtractionSource::VisionAi);
        assert!(draft.source_url.is_none());
        assert_eq!(draft.ingredient_lines[0].unit_name_hint.as_deref(), Some("g"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_blank_credential_makes_no_call() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .expect(0)
            .create_async()
            .await;

        let extractor = VisionExtractor::new(provider(server.url(), ""));
        assert!(extractor.extract(&[1, 2, 3], "image/png").await.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_becomes_none() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .create_async()
            .await;

        let extractor = VisionExtractor::new(provider(server.url(), "key"));
        assert!(extractor.extract(&[1, 2, 3], "image/png").await.is_none());
    }
}
