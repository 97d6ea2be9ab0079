use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Which extraction strategy produced a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionSource {
    /// Embedded schema.org JSON-LD markup
    Structured,
    /// Generative text model over the page text
    TextAi,
    /// Generative vision model over a photographed page
    VisionAi,
}

/// A transient, unpersisted recipe produced by the import pipeline.
///
/// Drafts are created per request and handed back to the caller for review;
/// nothing in this crate stores them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub name: Option<String>,
    pub servings: Option<i32>,
    pub method: Option<String>,
    pub source_url: Option<String>,
    pub extraction_source: ExtractionSource,
    pub ingredient_lines: Vec<ImportedLine>,
}

impl Draft {
    pub fn new(extraction_source: ExtractionSource, source_url: Option<String>) -> Self {
        Draft {
            name: None,
            servings: None,
            method: None,
            source_url,
            extraction_source,
            ingredient_lines: Vec::new(),
        }
    }
}

/// One ingredient line of a draft, with its free-text hints and, once
/// resolved, the canonical entities it refers to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedLine {
    pub raw_text: Option<String>,
    pub quantity: Option<f64>,
    pub ingredient_name_hint: Option<String>,
    pub unit_name_hint: Option<String>,
    resolved: Option<(Ingredient, Unit)>,
}

impl ImportedLine {
    pub fn new(
        raw_text: Option<String>,
        quantity: Option<f64>,
        unit_name_hint: Option<String>,
        ingredient_name_hint: Option<String>,
    ) -> Self {
        ImportedLine {
            raw_text,
            quantity,
            ingredient_name_hint,
            unit_name_hint,
            resolved: None,
        }
    }

    pub fn from_raw_text(raw_text: impl Into<String>) -> Self {
        ImportedLine {
            raw_text: Some(raw_text.into()),
            ..Default::default()
        }
    }

    pub fn has_no_hints(&self) -> bool {
        self.ingredient_name_hint.is_none() && self.unit_name_hint.is_none()
    }

    pub fn resolved_ingredient(&self) -> Option<&Ingredient> {
        self.resolved.as_ref().map(|(ingredient, _)| ingredient)
    }

    pub fn resolved_unit(&self) -> Option<&Unit> {
        self.resolved.as_ref().map(|(_, unit)| unit)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Both canonical references are always set together.
    pub fn resolve(&mut self, ingredient: Ingredient, unit: Unit) {
        self.resolved = Some((ingredient, unit));
    }
}

impl Serialize for ImportedLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImportedLine", 6)?;
        state.serialize_field("rawText", &self.raw_text)?;
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("ingredientNameHint", &self.ingredient_name_hint)?;
        state.serialize_field("unitNameHint", &self.unit_name_hint)?;
        state.serialize_field("resolvedIngredient", &self.resolved_ingredient())?;
        state.serialize_field("resolvedUnit", &self.resolved_unit())?;
        state.end()
    }
}

/// A canonical unit of measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub base: Option<Box<Unit>>,
    #[serde(default)]
    pub base_factor: Option<f64>,
}

impl Unit {
    pub fn new(id: i64, name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Unit {
            id,
            name: name.into(),
            abbreviation: abbreviation.into(),
            base: None,
            base_factor: None,
        }
    }

    pub fn with_base(mut self, base: Unit, factor: f64) -> Self {
        self.base = Some(Box::new(base));
        self.base_factor = Some(factor);
        self
    }

    /// The base unit and the factor converting one of `self` into it, when
    /// the vocabulary defines both.
    pub fn base_conversion(&self) -> Option<(&Unit, f64)> {
        match (&self.base, self.base_factor) {
            (Some(base), Some(factor)) => Some((base.as_ref(), factor)),
            _ => None,
        }
    }
}

/// A canonical ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub default_unit: Option<Unit>,
}

impl Ingredient {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Ingredient {
            id,
            name: name.into(),
            default_unit: None,
        }
    }
}

/// A normalized free-text string bound to one (ingredient, unit) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
    pub id: i64,
    pub alias_text: String,
    pub ingredient: Ingredient,
    pub unit: Unit,
}

impl Alias {
    pub fn new(id: i64, text: &str, ingredient: Ingredient, unit: Unit) -> Self {
        Alias {
            id,
            alias_text: normalize_alias(text),
            ingredient,
            unit,
        }
    }
}

/// Lowercases and trims alias text, the form aliases are stored and looked up in.
pub fn normalize_alias(text: &str) -> String {
    text.trim().to_lowercase()
}
