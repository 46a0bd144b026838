//! Ingredient line parsing.
//!
//! Splits a raw ingredient string ("2 tbsp olive oil (divided)") into an
//! amount, a unit and the remaining name text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::fraction_utils::{VULGAR_FRACTION_CLASS, parse_amount};

/// Result of parsing one ingredient line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedIngredient {
    /// Non-negative and finite when present
    pub amount: Option<f64>,
    /// Lowercased unit or size word
    pub unit: Option<String>,
    pub name_fragment: String,
}

impl ParsedIngredient {
    fn unparsed(raw: &str) -> Self {
        Self {
            amount: None,
            unit: None,
            name_fragment: raw.trim().to_string(),
        }
    }
}

/// Unit words recognized directly after a quantity.
/// Longer spellings first so "tablespoons" wins over "tablespoon".
const UNIT_WORDS: &[&str] = &[
    "tablespoons",
    "tablespoon",
    "teaspoons",
    "teaspoon",
    "milliliters",
    "milliliter",
    "millilitres",
    "millilitre",
    "kilograms",
    "kilogram",
    "packages",
    "package",
    "bunches",
    "bunch",
    "ounces",
    "ounce",
    "pounds",
    "pound",
    "liters",
    "liter",
    "litres",
    "litre",
    "grams",
    "gram",
    "cloves",
    "clove",
    "slices",
    "slice",
    "pinch",
    "cups",
    "cup",
    "tbsp",
    "tsp",
    "cans",
    "can",
    "lbs",
    "lb",
    "oz",
    "kg",
    "ml",
    "g",
    "l",
];

const SIZE_WORDS: &[&str] = &["large", "medium", "small"];

fn quantity_pattern() -> String {
    let fractions = VULGAR_FRACTION_CLASS;
    format!(
        r"(\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?\s*[{fractions}]|[{fractions}]|\d+(?:\.\d+)?)"
    )
}

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid parenthetical regex"));

/// Ordered patterns: quantity + unit, quantity + size, quantity alone.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let quantity = quantity_pattern();
    let units = UNIT_WORDS.join("|");
    let sizes = SIZE_WORDS.join("|");

    vec![
        Regex::new(&format!(r"(?i)^{quantity}\s*({units})\s+(.+)$"))
            .expect("valid unit pattern"),
        Regex::new(&format!(r"(?i)^{quantity}\s*({sizes})\s+(.+)$"))
            .expect("valid size pattern"),
        Regex::new(&format!(r"(?i)^{quantity}\s+(.+)$")).expect("valid bare quantity pattern"),
    ]
});

/// Remove parenthetical asides and collapse the whitespace they leave behind
pub fn strip_parentheticals(text: &str) -> String {
    PARENTHETICAL
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an ingredient line.
///
/// Never fails: text that matches no pattern comes back as the trimmed input
/// with no amount and no unit.
pub fn parse(raw: &str) -> ParsedIngredient {
    let text = strip_parentheticals(raw);

    for (index, pattern) in PATTERNS.iter().enumerate() {
        let Some(captures) = pattern.captures(&text) else {
            continue;
        };

        let Some(amount) = captures
            .get(1)
            .and_then(|m| parse_amount(m.as_str()).ok())
            .filter(|a| a.is_finite() && *a >= 0.0)
        else {
            return ParsedIngredient::unparsed(raw);
        };

        // The bare-quantity pattern has no unit group
        let (unit, rest) = if index == PATTERNS.len() - 1 {
            (None, captures.get(2))
        } else {
            (
                captures.get(2).map(|m| m.as_str().to_lowercase()),
                captures.get(3),
            )
        };

        return ParsedIngredient {
            amount: Some(amount),
            unit,
            name_fragment: rest.map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        };
    }

    ParsedIngredient::unparsed(raw)
}
