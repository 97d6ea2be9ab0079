//! Control flow of the two import paths: fetch or decode the source, extract
//! a draft, then resolve its lines against a fresh vocabulary snapshot.

pub mod image;
pub mod url;

use crate::error::ImportError;
use crate::model::Draft;
use crate::resolver::resolve_draft;
use crate::vocabulary::{Vocabulary, VocabularySource};
use log::debug;

async fn resolve(mut draft: Draft, source: &dyn VocabularySource) -> Result<Draft, ImportError> {
    let vocabulary = Vocabulary::snapshot(source).await?;
    debug!(
        "Resolving {} lines against {} units, {} ingredients, {} aliases",
        draft.ingredient_lines.len(),
        vocabulary.units.len(),
        vocabulary.ingredients.len(),
        vocabulary.aliases.len()
    );
    resolve_draft(&mut draft, &vocabulary);
    Ok(draft)
}
