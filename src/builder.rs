use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    import_from_image, import_from_url, Draft, ImportConfig, ImportError, StaticVocabulary,
    VocabularySource,
};

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
enum InputSource {
    /// Fetch recipe from a URL
    Url(String),
    /// Image bytes with their media type
    Image { bytes: Vec<u8>, media_type: String },
    /// Image file read at build time
    ImageFile {
        path: PathBuf,
        media_type: Option<String>,
    },
}

/// Generative service used by the AI extractors
#[derive(Debug, Clone, Copy)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl Provider {
    /// Convert to provider name string used by the factory
    fn as_str(&self) -> &str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAI => "openai",
        }
    }
}

/// Builder for configuring and executing recipe imports
#[derive(Default)]
pub struct RecipeImporterBuilder {
    source: Option<InputSource>,
    config: Option<ImportConfig>,
    provider: Option<Provider>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    vocabulary: Option<Arc<dyn VocabularySource>>,
}

impl RecipeImporterBuilder {
    /// Set the input source to a URL
    ///
    /// # Example
    /// ```
    /// use recipe_draft_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe");
    /// ```
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Set the input source to an in-memory image
    ///
    /// # Example
    /// ```
    /// use recipe_draft_import::RecipeImporter;
    ///
    /// let photo: Vec<u8> = std::fs::read("page.jpg").unwrap_or_default();
    /// let builder = RecipeImporter::builder()
    ///     .image(photo, "image/jpeg");
    /// ```
    pub fn image(mut self, bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        self.source = Some(InputSource::Image {
            bytes: bytes.into(),
            media_type: media_type.into(),
        });
        self
    }

    /// Set the input source to an image file
    ///
    /// The media type is inferred from the file extension unless given.
    pub fn image_file(mut self, path: impl AsRef<Path>, media_type: Option<&str>) -> Self {
        self.source = Some(InputSource::ImageFile {
            path: path.as_ref().to_path_buf(),
            media_type: media_type.map(str::to_string),
        });
        self
    }

    /// Use this configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the generative service
    ///
    /// # Example
    /// ```
    /// use recipe_draft_import::{Provider, RecipeImporter};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .provider(Provider::OpenAI);
    /// ```
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set a timeout for page fetches and generative service requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API key for the generative service
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files. A blank key disables both AI
    /// extractors.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the vocabulary ingredient lines are resolved against.
    /// Without one, every line is returned unresolved.
    pub fn vocabulary(mut self, vocabulary: Arc<dyn VocabularySource>) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Build and execute the import
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - No input source was specified, or it is blank or empty
    /// - An image file cannot be read or its media type cannot be inferred
    /// - No extraction strategy produced a draft
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_draft_import::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let draft = RecipeImporter::builder()
    ///     .url("https://example.com/recipe")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Draft, ImportError> {
        // Validate that source is set
        let source = self.source.ok_or_else(|| {
            ImportError::Validation(
                "No input source specified. Use .url(), .image() or .image_file()".to_string(),
            )
        })?;
        if matches!(&source, InputSource::Url(url) if url.trim().is_empty()) {
            return Err(ImportError::Validation("URL must not be blank".to_string()));
        }

        let mut config = match self.config {
            Some(config) => config,
            None => ImportConfig::load()?,
        };
        if let Some(provider) = self.provider {
            config.llm.provider = provider.as_str().to_string();
        }
        if let Some(api_key) = self.api_key {
            config.llm.api_key = Some(api_key);
        }
        if let Some(timeout) = self.timeout {
            let secs = timeout.as_secs().max(1);
            config.llm.timeout_secs = secs;
            config.fetch.timeout_secs = secs;
        }

        let vocabulary = self
            .vocabulary
            .unwrap_or_else(|| Arc::new(StaticVocabulary::default()));

        match source {
            InputSource::Url(url) => import_from_url(&url, &config, vocabulary.as_ref()).await,
            InputSource::Image { bytes, media_type } => {
                import_from_image(&bytes, &media_type, &config, vocabulary.as_ref()).await
            }
            InputSource::ImageFile { path, media_type } => {
                let media_type = match media_type {
                    Some(media_type) => media_type,
                    None => media_type_for_path(&path)
                        .ok_or_else(|| {
                            ImportError::Validation(format!(
                                "Cannot infer image type of {}; pass a media type",
                                path.display()
                            ))
                        })?
                        .to_string(),
                };
                let bytes = tokio::fs::read(&path).await?;
                import_from_image(&bytes, &media_type, &config, vocabulary.as_ref()).await
            }
        }
    }
}

/// Image MIME type for a file extension the vision services accept.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Main entry point for the builder API
pub struct RecipeImporter;

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_draft_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }
}
