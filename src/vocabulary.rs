use crate::error::ImportError;
use crate::model::{normalize_alias, Alias, Ingredient, Unit};
use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use std::sync::RwLock;

/// Read access to the canonical vocabulary owned by the surrounding
/// application (its unit, ingredient and alias tables).
#[async_trait]
pub trait VocabularySource: Send + Sync {
    async fn list_units(&self) -> Result<Vec<Unit>, Box<dyn Error + Send + Sync>>;
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, Box<dyn Error + Send + Sync>>;
    async fn list_aliases(&self) -> Result<Vec<Alias>, Box<dyn Error + Send + Sync>>;
}

/// A read-only copy of the vocabulary, taken once per import request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    pub units: Vec<Unit>,
    pub ingredients: Vec<Ingredient>,
    pub aliases: Vec<Alias>,
}

impl Vocabulary {
    /// Fetch a fresh snapshot. Nothing is cached between requests.
    pub async fn snapshot(source: &dyn VocabularySource) -> Result<Self, ImportError> {
        let units = source
            .list_units()
            .await
            .map_err(|e| ImportError::Vocabulary(format!("units: {e}")))?;
        let ingredients = source
            .list_ingredients()
            .await
            .map_err(|e| ImportError::Vocabulary(format!("ingredients: {e}")))?;
        let aliases = source
            .list_aliases()
            .await
            .map_err(|e| ImportError::Vocabulary(format!("aliases: {e}")))?;

        Ok(Vocabulary {
            units,
            ingredients,
            aliases,
        })
    }
}

/// In-memory vocabulary, used by the command line tool and in tests.
#[derive(Debug, Default)]
pub struct StaticVocabulary {
    inner: RwLock<Vocabulary>,
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    units: Vec<Unit>,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    aliases: Vec<Alias>,
}

impl StaticVocabulary {
    pub fn new(units: Vec<Unit>, ingredients: Vec<Ingredient>) -> Self {
        StaticVocabulary {
            inner: RwLock::new(Vocabulary {
                units,
                ingredients,
                aliases: Vec::new(),
            }),
        }
    }

    /// Parse a vocabulary from JSON of the form
    /// `{"units": [...], "ingredients": [...], "aliases": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        let file: VocabularyFile = serde_json::from_str(json)
            .map_err(|e| ImportError::Vocabulary(format!("invalid vocabulary file: {e}")))?;

        let vocabulary = StaticVocabulary::new(file.units, file.ingredients);
        for alias in file.aliases {
            vocabulary.save_alias(alias);
        }
        Ok(vocabulary)
    }

    pub async fn from_file(path: &Path) -> Result<Self, ImportError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Stores an alias under its normalized text. An existing alias with the
    /// same normalized text is replaced, so the latest binding wins.
    pub fn save_alias(&self, mut alias: Alias) {
        alias.alias_text = normalize_alias(&alias.alias_text);
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match inner
            .aliases
            .iter_mut()
            .find(|existing| existing.alias_text == alias.alias_text)
        {
            Some(existing) => {
                existing.ingredient = alias.ingredient;
                existing.unit = alias.unit;
            }
            None => inner.aliases.push(alias),
        }
    }

    fn read(&self) -> Vocabulary {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl VocabularySource for StaticVocabulary {
    async fn list_units(&self) -> Result<Vec<Unit>, Box<dyn Error + Send + Sync>> {
        Ok(self.read().units)
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, Box<dyn Error + Send + Sync>> {
        Ok(self.read().ingredients)
    }

    async fn list_aliases(&self) -> Result<Vec<Alias>, Box<dyn Error + Send + Sync>> {
        Ok(self.read().aliases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_alias_last_write_wins() {
        let gram = Unit::new(1, "Gram", "g");
        let cup = Unit::new(2, "Cup", "cup");
        let vocabulary = StaticVocabulary::new(vec![gram.clone(), cup.clone()], vec![]);

        vocabulary.save_alias(Alias::new(1, "Plain Flour", Ingredient::new(1, "flour"), gram));
        vocabulary.save_alias(Alias {
            id: 2,
            alias_text: "  PLAIN flour ".to_string(),
            ingredient: Ingredient::new(1, "flour"),
            unit: cup.clone(),
        });

        let aliases = vocabulary.read().aliases;
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases[0].id, 1);
        assert_eq!(aliases[0].alias_text, "plain flour");
        assert_eq!(aliases[0].unit, cup);
    }

    #[test]
    fn test_from_json() {
        let vocabulary = StaticVocabulary::from_json(
            r#"{
                "units": [
                    {"id": 1, "name": "Gram", "abbreviation": "g"},
                    {"id": 2, "name": "Kilogram", "abbreviation": "kg",
                     "base": {"id": 1, "name": "Gram", "abbreviation": "g"}, "baseFactor": 1000.0}
                ],
                "ingredients": [{"id": 1, "name": "flour"}],
                "aliases": [{
                    "id": 1,
                    "aliasText": "Strong White Flour",
                    "ingredient": {"id": 1, "name": "flour"},
                    "unit": {"id": 1, "name": "Gram", "abbreviation": "g"}
                }]
            }"#,
        )
        .unwrap();

        let snapshot = vocabulary.read();
        assert_eq!(snapshot.units.len(), 2);
        assert_eq!(snapshot.units[1].base_conversion().unwrap().1, 1000.0);
        assert_eq!(snapshot.ingredients[0].name, "flour");
        assert_eq!(snapshot.aliases[0].alias_text, "strong white flour");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = StaticVocabulary::from_json("not json");
        assert!(matches!(result, Err(ImportError::Vocabulary(_))));
    }

    #[tokio::test]
    async fn test_snapshot_reads_current_state() {
        let vocabulary = StaticVocabulary::new(vec![Unit::new(1, "Gram", "g")], vec![]);
        let first = Vocabulary::snapshot(&vocabulary).await.unwrap();
        assert!(first.aliases.is_empty());

        vocabulary.save_alias(Alias::new(
            1,
            "flour",
            Ingredient::new(1, "flour"),
            Unit::new(1, "Gram", "g"),
        ));

        let second = Vocabulary::snapshot(&vocabulary).await.unwrap();
        assert_eq!(second.aliases.len(), 1);
        assert_eq!(second.units.len(), 1);
    }
}
