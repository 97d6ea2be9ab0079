//! Matches draft ingredient lines against the canonical vocabulary.

use crate::ingredient_line;
use crate::model::{normalize_alias, Alias, Draft, ImportedLine, Ingredient, Unit};
use crate::vocabulary::Vocabulary;
use log::debug;

/// Fills missing hints from raw text, then resolves every line of the draft.
pub fn resolve_draft(draft: &mut Draft, vocabulary: &Vocabulary) {
    for line in &mut draft.ingredient_lines {
        fill_hints(line);
        resolve_line(line, vocabulary);
    }
}

/// Lines extracted from structured markup carry only raw text; run them
/// through the line parser. Lines that already have a hint are left alone.
fn fill_hints(line: &mut ImportedLine) {
    if !line.has_no_hints() {
        return;
    }
    let Some(raw_text) = line.raw_text.as_deref() else {
        return;
    };

    let parsed = ingredient_line::parse(raw_text);
    if line.quantity.is_none() {
        line.quantity = parsed.quantity;
    }
    line.unit_name_hint = parsed.unit_hint;
    line.ingredient_name_hint = parsed.name_hint;
}

/// Resolves a line when both hints are present; quantity is not required.
/// The line ends up either fully resolved or untouched.
pub fn resolve_line(line: &mut ImportedLine, vocabulary: &Vocabulary) {
    let (Some(unit_hint), Some(ingredient_hint)) = (
        line.unit_name_hint.as_deref(),
        line.ingredient_name_hint.as_deref(),
    ) else {
        return;
    };

    let unit = find_unit(unit_hint, &vocabulary.units);
    let ingredient = find_ingredient(ingredient_hint, &vocabulary.ingredients);

    let pair = match (ingredient, unit) {
        (Some(ingredient), Some(unit)) => Some((ingredient.clone(), unit.clone())),
        // A partial direct match is discarded in favour of the alias binding
        _ => find_alias(ingredient_hint, &vocabulary.aliases)
            .map(|alias| (alias.ingredient.clone(), alias.unit.clone())),
    };

    match pair {
        Some((ingredient, unit)) => {
            debug!(
                "Resolved '{}' to ingredient {} / unit {}",
                line.raw_text.as_deref().unwrap_or(ingredient_hint),
                ingredient.id,
                unit.id
            );
            line.resolve(ingredient, unit);
        }
        None => debug!(
            "No match for ingredient '{}' with unit '{}'",
            ingredient_hint, unit_hint
        ),
    }
}

fn find_unit<'v>(hint: &str, units: &'v [Unit]) -> Option<&'v Unit> {
    let hint = hint.to_lowercase();
    units.iter().find(|unit| {
        unit.name.to_lowercase() == hint || unit.abbreviation.to_lowercase() == hint
    })
}

fn find_ingredient<'v>(hint: &str, ingredients: &'v [Ingredient]) -> Option<&'v Ingredient> {
    let hint = hint.to_lowercase();
    ingredients
        .iter()
        .find(|ingredient| ingredient.name.to_lowercase() == hint)
}

fn find_alias<'v>(hint: &str, aliases: &'v [Alias]) -> Option<&'v Alias> {
    let normalized = normalize_alias(hint);
    aliases.iter().find(|alias| alias.alias_text == normalized)
}
