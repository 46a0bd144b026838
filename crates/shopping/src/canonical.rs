//! Canonical ingredient names for grocery aggregation.
//!
//! "1 tbsp extra-virgin olive oil (divided)" and "2 tbsp olive oil" both
//! become "Olive Oil", so the store can deduplicate them.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::strip_parentheticals;

/// Unit words dropped from the token stream
const UNIT_WORDS: &[&str] = &[
    "cup",
    "cups",
    "tbsp",
    "tablespoon",
    "tablespoons",
    "tsp",
    "teaspoon",
    "teaspoons",
    "lb",
    "lbs",
    "pound",
    "pounds",
    "oz",
    "ounce",
    "ounces",
    "g",
    "gram",
    "grams",
    "kg",
    "kilogram",
    "kilograms",
    "ml",
    "milliliter",
    "milliliters",
    "l",
    "liter",
    "liters",
    "pinch",
    "clove",
    "cloves",
    "slice",
    "slices",
    "can",
    "cans",
    "package",
    "packages",
];

/// Descriptor and filler words dropped from the token stream
const DESCRIPTOR_WORDS: &[&str] = &[
    "boneless",
    "skinless",
    "fresh",
    "ground",
    "dried",
    "chopped",
    "diced",
    "minced",
    "sliced",
    "grated",
    "shredded",
    "to",
    "taste",
    "of",
    "the",
    "and",
    "or",
    "for",
    "about",
    "plus",
    "divided",
    "optional",
];

/// Maps a matching remainder to one canonical name
pub struct AliasRule {
    pub pattern: Regex,
    pub canonical_name: &'static str,
}

impl AliasRule {
    fn new(pattern: &str, canonical_name: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid alias pattern"),
            canonical_name,
        }
    }
}

/// Evaluated top to bottom, first match wins: compound terms ("green onion")
/// must stay above the substrings they contain ("onion").
pub static ALIAS_RULES: LazyLock<Vec<AliasRule>> = LazyLock::new(|| {
    vec![
        AliasRule::new(r"(extra[-\s]?virgin\s+)?olive\s+oil", "olive oil"),
        AliasRule::new(r"vegetable\s+oil", "vegetable oil"),
        AliasRule::new(r"canola\s+oil", "canola oil"),
        AliasRule::new(r"soy\s*sauce", "soy sauce"),
        AliasRule::new(r"fish\s*sauce", "fish sauce"),
        AliasRule::new(r"chicken\s*breasts?", "chicken"),
        AliasRule::new(r"chicken\s*thighs?", "chicken"),
        AliasRule::new(r"beef\s+broth|beef\s+stock", "beef broth"),
        AliasRule::new(r"chicken\s+broth|chicken\s+stock", "chicken broth"),
        AliasRule::new(r"garlic\s+cloves?", "garlic"),
        AliasRule::new(r"green\s*onions?|scallions?", "green onion"),
        AliasRule::new(r"onions?", "onion"),
        AliasRule::new(r"tomatoes?", "tomato"),
        AliasRule::new(r"potatoes?", "potato"),
        AliasRule::new(r"bell\s*peppers?", "bell pepper"),
        AliasRule::new(r"spaghetti|pasta", "pasta"),
    ]
});

/// First alias whose pattern occurs anywhere in `text`
pub fn resolve_alias(text: &str) -> Option<&'static str> {
    ALIAS_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.canonical_name)
}

/// Canonical display name for a raw ingredient string.
///
/// Blank input yields an empty string. Input made only of units and
/// descriptors ("to taste") yields the trimmed input unchanged.
pub fn canonicalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let lower = strip_parentheticals(&raw.to_lowercase());

    let cleaned: String = lower
        .chars()
        .map(|c| {
            if c.is_alphabetic() || c == '-' || c.is_whitespace() {
                c
            } else {
                // digits, fractions and punctuation become separators
                ' '
            }
        })
        .collect();

    let base = cleaned
        .split_whitespace()
        .filter(|token| !UNIT_WORDS.contains(token))
        .filter(|token| !DESCRIPTOR_WORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ");

    let base = match resolve_alias(&base) {
        Some(alias) => alias.to_string(),
        None if base.is_empty() => return raw.trim().to_string(),
        None => base,
    };

    let first_two = base.split_whitespace().take(2).collect::<Vec<_>>().join(" ");
    title_case(&first_two)
}

/// Uppercase every letter that starts a word ("extra-virgin" → "Extra-Virgin")
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_boundary = true;

    for c in text.chars() {
        if at_boundary && c.is_lowercase() {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_boundary = !(c.is_alphanumeric() || c == '_');
    }

    result
}
