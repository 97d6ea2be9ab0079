//! Ingredient line parsing.
//!
//! Splits a raw ingredient line such as "1½ cups flour" into a quantity, a
//! canonical unit hint and an ingredient name hint. Parsing is pure and never
//! fails; anything it cannot recognise is left as `None`.
//!
//! Stages, in order:
//! 1. normalise unicode fractions and whitespace
//! 2. read a leading quantity (glued fraction, glued decimal, decimal with an
//!    optional trailing fraction, bare fraction, or range)
//! 3. if a quantity was found, read a unit from the synonym table
//! 4. everything left over is the name hint

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Result of parsing one ingredient line. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLine {
    pub quantity: Option<f64>,
    pub unit_hint: Option<String>,
    pub name_hint: Option<String>,
}

const UNICODE_FRACTIONS: &[(char, &str)] = &[
    ('½', "1/2"),
    ('⅓', "1/3"),
    ('⅔', "2/3"),
    ('¼', "1/4"),
    ('¾', "3/4"),
    ('⅕', "1/5"),
    ('⅖', "2/5"),
    ('⅗', "3/5"),
    ('⅘', "4/5"),
    ('⅙', "1/6"),
];

/// Surface form (lowercase) to canonical unit hint. The canonical side is
/// what the resolver matches against unit names and abbreviations, so its
/// casing and the pinch/handful/dash/drop spellings must stay exactly as listed.
const UNIT_SYNONYMS: &[(&str, &str)] = &[
    ("g", "g"),
    ("gram", "g"),
    ("grams", "g"),
    ("kg", "kg"),
    ("kilogram", "kg"),
    ("kilograms", "kg"),
    ("oz", "oz"),
    ("ounce", "oz"),
    ("ounces", "oz"),
    ("lb", "lb"),
    ("lbs", "lb"),
    ("pound", "lb"),
    ("pounds", "lb"),
    ("ml", "ml"),
    ("millilitre", "ml"),
    ("millilitres", "ml"),
    ("milliliter", "ml"),
    ("milliliters", "ml"),
    ("cl", "cl"),
    ("centilitre", "cl"),
    ("centilitres", "cl"),
    ("centiliter", "cl"),
    ("centiliters", "cl"),
    ("l", "l"),
    ("litre", "l"),
    ("litres", "l"),
    ("liter", "l"),
    ("liters", "l"),
    ("tsp", "tsp"),
    ("teaspoon", "tsp"),
    ("teaspoons", "tsp"),
    ("tbsp", "tbsp"),
    ("tbs", "tbsp"),
    ("tablespoon", "tbsp"),
    ("tablespoons", "tbsp"),
    ("c", "cup"),
    ("cup", "cup"),
    ("cups", "cup"),
    ("pt", "pt"),
    ("pint", "pt"),
    ("pints", "pt"),
    ("pch", "pch"),
    ("pinch", "pinch"),
    ("pinches", "pinch"),
    ("hfl", "hfl"),
    ("handful", "handful"),
    ("handfuls", "handful"),
    ("dsh", "dsh"),
    ("dash", "dash"),
    ("dashes", "dash"),
    ("drp", "drp"),
    ("drop", "drop"),
    ("drops", "drop"),
    ("fl oz", "fl oz"),
    ("fluid ounce", "fl oz"),
    ("fluid ounces", "fl oz"),
    ("in", "in"),
    ("inch", "in"),
    ("inches", "in"),
    ("cm", "cm"),
    ("centimeter", "cm"),
    ("centimeters", "cm"),
    ("centimetre", "cm"),
    ("centimetres", "cm"),
    ("mm", "mm"),
    ("millimeter", "mm"),
    ("millimeters", "mm"),
    ("millimetre", "mm"),
    ("millimetres", "mm"),
];

static SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| UNIT_SYNONYMS.iter().copied().collect());

/// "1/2tsp"
static GLUED_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)/([0-9]+)([a-zA-Z].*)$").unwrap());

/// "200g", "1.5kg"
static GLUED_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+\.?[0-9]*)([a-zA-Z].*)$").unwrap());

/// "2", "1.5"
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap());

/// "1/2"
static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)/([0-9]+)$").unwrap());

/// "2-3" or "2–3"; the lower bound is used
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+\.?[0-9]*)[-–]([0-9]+\.?[0-9]*)$").unwrap());

/// Parse a raw ingredient line. Absent or blank input gives an all-`None` result.
pub fn parse<'a>(raw_text: impl Into<Option<&'a str>>) -> ParsedLine {
    let raw_text: Option<&str> = raw_text.into();
    let Some(raw_text) = raw_text.filter(|t| !t.trim().is_empty()) else {
        return ParsedLine::default();
    };

    let normalized = normalize(raw_text);
    let tokens: Vec<&str> = normalized.split(' ').collect();

    let Some((quantity, glued_unit, mut cursor)) = read_quantity(&tokens) else {
        return ParsedLine {
            quantity: None,
            unit_hint: None,
            name_hint: Some(normalized.clone()),
        };
    };

    let unit_hint = match glued_unit {
        // Glued text that isn't a known unit is dropped rather than kept as a name
        Some(glued) => lookup_unit(glued),
        None => {
            let (unit, consumed) = read_unit(&tokens[cursor..]);
            cursor += consumed;
            unit
        }
    };

    let name_hint = if cursor < tokens.len() {
        Some(tokens[cursor..].join(" "))
    } else {
        None
    };

    ParsedLine {
        quantity: Some(quantity),
        unit_hint,
        name_hint,
    }
}

/// Replaces unicode fraction glyphs with `n/d`, splitting "1½" into "1 1/2",
/// and collapses runs of whitespace.
fn normalize(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match UNICODE_FRACTIONS.iter().find(|(glyph, _)| *glyph == c) {
            Some((_, ascii)) => {
                if expanded.chars().last().is_some_and(|p| p.is_ascii_digit()) {
                    expanded.push(' ');
                }
                expanded.push_str(ascii);
            }
            None => expanded.push(c),
        }
    }
    expanded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads the leading quantity. Returns the value, any unit text glued to the
/// number, and the index of the first unconsumed token.
fn read_quantity<'t>(tokens: &[&'t str]) -> Option<(f64, Option<&'t str>, usize)> {
    let first = *tokens.first()?;

    if let Some(caps) = GLUED_FRACTION.captures(first) {
        let value = fraction(&caps[1], &caps[2])?;
        let unit = caps.get(3).map(|m| m.as_str());
        return Some((value, unit, 1));
    }

    if let Some(caps) = GLUED_DECIMAL.captures(first) {
        let value = caps[1].parse::<f64>().ok()?;
        let unit = caps.get(2).map(|m| m.as_str());
        return Some((value, unit, 1));
    }

    if DECIMAL.is_match(first) {
        let mut value = first.parse::<f64>().ok()?;
        let mut cursor = 1;
        // Mixed number, e.g. "1 1/2"
        if let Some(caps) = tokens.get(1).and_then(|next| FRACTION.captures(next)) {
            if let Some(part) = fraction(&caps[1], &caps[2]) {
                value += part;
                cursor += 1;
            }
        }
        return Some((value, None, cursor));
    }

    if let Some(caps) = FRACTION.captures(first) {
        return fraction(&caps[1], &caps[2]).map(|value| (value, None, 1));
    }

    if let Some(caps) = RANGE.captures(first) {
        return caps[1].parse::<f64>().ok().map(|value| (value, None, 1));
    }

    None
}

/// Zero denominators are not treated as quantities.
fn fraction(numerator: &str, denominator: &str) -> Option<f64> {
    let numerator = numerator.parse::<f64>().ok()?;
    let denominator = denominator.parse::<f64>().ok()?;
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Two-token units ("fl oz") are tried before single tokens. Returns the
/// canonical hint and how many tokens it used.
fn read_unit(tokens: &[&str]) -> (Option<String>, usize) {
    if let [first, second, ..] = tokens {
        if let Some(unit) = lookup_unit(&format!("{first} {second}")) {
            return (Some(unit), 2);
        }
    }
    match tokens.first().and_then(|token| lookup_unit(token)) {
        Some(unit) => (Some(unit), 1),
        None => (None, 0),
    }
}

fn lookup_unit(surface: &str) -> Option<String> {
    SYNONYMS
        .get(surface.to_lowercase().as_str())
        .map(|canonical| canonical.to_string())
}
