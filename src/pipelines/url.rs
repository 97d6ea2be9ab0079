use crate::error::ImportError;
use crate::extractors::Extractor;
use crate::fetch::PageFetcher;
use crate::model::Draft;
use crate::vocabulary::VocabularySource;
use log::{info, warn};

/// Import a recipe from a web page
///
/// This pipeline:
/// 1. Rejects a blank URL before doing anything else
/// 2. Fetches the page HTML
/// 3. Runs the extractor (normally a fallback chain of JSON-LD then text model)
/// 4. Resolves ingredient lines against the vocabulary
///
/// A fetch failure and an empty extraction both surface as
/// [`ImportError::ExtractionFailed`].
pub async fn process(
    url: &str,
    fetcher: &dyn PageFetcher,
    extractor: &dyn Extractor,
    vocabulary: &dyn VocabularySource,
) -> Result<Draft, ImportError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ImportError::Validation("URL must not be blank".to_string()));
    }

    info!("Importing recipe from {}", url);
    let html = fetcher.fetch(url).await.map_err(|e| {
        warn!("Failed to fetch {}: {}", url, e);
        extraction_failed(url)
    })?;

    let draft = extractor
        .extract(&html, url)
        .await
        .ok_or_else(|| extraction_failed(url))?;

    super::resolve(draft, vocabulary).await
}

fn extraction_failed(url: &str) -> ImportError {
    ImportError::ExtractionFailed(format!("Could not extract recipe from: {}", url))
}
