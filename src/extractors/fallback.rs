use crate::extractors::Extractor;
use crate::model::Draft;
use async_trait::async_trait;
use log::{debug, info};

/// Tries extraction strategies strictly in list order and returns the first
/// draft. Strategies after a success are never invoked.
pub struct FallbackExtractor {
    extractors: Vec<Box<dyn Extractor>>,
}

impl FallbackExtractor {
    pub fn new(extractors: Vec<Box<dyn Extractor>>) -> Self {
        Self { extractors }
    }
}

#[async_trait]
impl Extractor for FallbackExtractor {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn extract(&self, html: &str, source_url: &str) -> Option<Draft> {
        for extractor in &self.extractors {
            debug!("Trying {} extractor for {}", extractor.name(), source_url);
            if let Some(draft) = extractor.extract(html, source_url).await {
                info!("Extracted {} with {} extractor", source_url, extractor.name());
                return Some(draft);
            }
            debug!("{} extractor found nothing", extractor.name());
        }
        None
    }
}
