pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod ingredient_line;
pub mod model;
pub mod pipelines;
pub mod providers;
pub mod resolver;
pub mod vocabulary;

use std::sync::Arc;

use crate::extractors::{FallbackExtractor, JsonLdExtractor, TextLlmExtractor, VisionExtractor};
use crate::fetch::RequestFetcher;
use crate::providers::{LlmProvider, ProviderFactory};

// Re-export main types
pub use builder::{media_type_for_path, Provider, RecipeImporter, RecipeImporterBuilder};
pub use config::ImportConfig;
pub use error::ImportError;
pub use model::{Alias, Draft, ExtractionSource, ImportedLine, Ingredient, Unit};
pub use vocabulary::{StaticVocabulary, Vocabulary, VocabularySource};

/// The URL extraction chain: embedded JSON-LD first, then the text model.
pub fn url_extractor(provider: Arc<dyn LlmProvider>, config: &ImportConfig) -> FallbackExtractor {
    FallbackExtractor::new(vec![
        Box::new(JsonLdExtractor),
        Box::new(TextLlmExtractor::new(provider, config.max_text_length)),
    ])
}

fn create_provider(config: &ImportConfig) -> Result<Arc<dyn LlmProvider>, ImportError> {
    Ok(Arc::from(ProviderFactory::create(&config.llm)?))
}

/// Import a recipe draft from a web page.
///
/// # Arguments
/// * `url` - The page to import
/// * `config` - Provider, timeout and fetch settings
/// * `vocabulary` - Canonical units, ingredients and aliases to resolve lines against
///
/// # Errors
/// * [`ImportError::Validation`] for a blank URL
/// * [`ImportError::ExtractionFailed`] when the page cannot be fetched or
///   neither strategy finds a recipe
///
/// # Example
/// ```no_run
/// use recipe_draft_import::{import_from_url, ImportConfig, StaticVocabulary};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let draft = import_from_url(
///     "https://example.com/recipe",
///     &ImportConfig::default(),
///     &StaticVocabulary::default(),
/// )
/// .await?;
/// println!("{:?}", draft.name);
/// # Ok(())
/// # }
/// ```
pub async fn import_from_url(
    url: &str,
    config: &ImportConfig,
    vocabulary: &dyn VocabularySource,
) -> Result<Draft, ImportError> {
    if url.trim().is_empty() {
        return Err(ImportError::Validation("URL must not be blank".to_string()));
    }
    let fetcher = RequestFetcher::new(&config.fetch).map_err(|e| {
        ImportError::ExtractionFailed(format!("HTTP client unavailable: {}", e))
    })?;
    let extractor = url_extractor(create_provider(config)?, config);

    pipelines::url::process(url, &fetcher, &extractor, vocabulary).await
}

/// Import a recipe draft from a photographed page.
///
/// `media_type` is the image's MIME type, e.g. `image/jpeg`.
pub async fn import_from_image(
    image: &[u8],
    media_type: &str,
    config: &ImportConfig,
    vocabulary: &dyn VocabularySource,
) -> Result<Draft, ImportError> {
    let extractor = VisionExtractor::new(create_provider(config)?);

    pipelines::image::process(image, media_type, &extractor, vocabulary).await
}
