use crate::error::ImportError;
use crate::extractors::VisionExtractor;
use crate::model::Draft;
use crate::vocabulary::VocabularySource;
use log::info;

/// Import a recipe from a photographed page.
///
/// Empty image bytes or a blank media type are rejected before any call.
pub async fn process(
    image: &[u8],
    media_type: &str,
    extractor: &VisionExtractor,
    vocabulary: &dyn VocabularySource,
) -> Result<Draft, ImportError> {
    if image.is_empty() {
        return Err(ImportError::Validation("image must not be empty".to_string()));
    }
    let media_type = media_type.trim();
    if media_type.is_empty() {
        return Err(ImportError::Validation(
            "image media type must not be blank".to_string(),
        ));
    }

    info!("Importing recipe from {} byte {} image", image.len(), media_type);
    let draft = extractor.extract(image, media_type).await.ok_or_else(|| {
        ImportError::ExtractionFailed("Could not extract recipe from image".to_string())
    })?;

    super::resolve(draft, vocabulary).await
}
