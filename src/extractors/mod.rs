use crate::model::Draft;
use async_trait::async_trait;

mod fallback;
mod json_ld;
mod prompt;
mod response;
mod text_llm;
mod vision;

pub use self::fallback::FallbackExtractor;
pub use self::json_ld::JsonLdExtractor;
pub use self::prompt::{text_prompt, VISION_PROMPT};
pub use self::response::{parse_draft, strip_markdown_fences};
pub use self::text_llm::{readable_text, TextLlmExtractor};
pub use self::vision::VisionExtractor;

/// One way of turning a fetched page into a draft.
///
/// Implementations swallow their own failures and return `None`, so the
/// next strategy in a [`FallbackExtractor`] can run.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    async fn extract(&self, html: &str, source_url: &str) -> Option<Draft>;
}
