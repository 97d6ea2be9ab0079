use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main import configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Generative service used by the text and vision extractors
    #[serde(default)]
    pub llm: LlmConfig,
    /// Source page retrieval
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Page text is cut to this many characters before it is sent to the text model
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            fetch: FetchConfig::default(),
            max_text_length: default_max_text_length(),
        }
    }
}

/// Configuration for the generative service
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "openai")
    #[serde(default = "default_provider")]
    pub provider: String,
    /// API key (can also be set via the provider's usual environment variable).
    /// A blank key disables both AI extractors.
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
    /// Model used for page text extraction (provider default when unset)
    pub text_model: Option<String>,
    /// Model used for photographed pages (provider default when unset)
    pub vision_model: Option<String>,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            base_url: None,
            text_model: None,
            vision_model: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for fetching recipe pages
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Default value functions
fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RecipeImporter/1.0)".to_string()
}

fn default_max_text_length() -> usize {
    8000
}

impl ImportConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_IMPORT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_IMPORT__LLM__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`ImportConfig::load`] for the priority order.
pub fn load_config() -> Result<ImportConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

// Use double underscore for nested: RECIPE_IMPORT__LLM__API_KEY
fn environment() -> Environment {
    Environment::with_prefix("RECIPE_IMPORT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
