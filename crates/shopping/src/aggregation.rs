use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::fraction_utils::format_amount;
use crate::parser::{self, strip_parentheticals};
use crate::units::{canonical_unit, plural_unit, round_one_decimal};

/// Preparation words that don't change what you buy
static PREP_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(chopped|diced|minced|sliced|grated|shredded|fresh|dried|frozen|canned|whole|halved|quartered)\b",
    )
    .expect("valid prep word regex")
});

/// Ingredient name fragment, threshold, and what to buy instead
const BULK_SUGGESTIONS: &[(&str, f64, &str)] = &[
    ("tomato", 3.0, "bag of tomatoes"),
    ("onion", 3.0, "bag of onions"),
    ("potato", 3.0, "bag of potatoes"),
    ("apple", 4.0, "bag of apples"),
    ("orange", 4.0, "bag of oranges"),
    ("carrot", 5.0, "bag of carrots"),
    ("garlic", 5.0, "bulb of garlic"),
    ("bell pepper", 3.0, "multi-pack of bell peppers"),
    ("chicken", 2.0, "family pack of chicken"),
    ("ground beef", 2.0, "family pack of ground beef"),
];

/// Ingredient lines combined into one shopping line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedIngredient {
    /// "3 cups flour", "2 onions", "onion"
    pub text: String,
    pub originals: Vec<String>,
    /// Rounded to one decimal
    pub total_amount: f64,
    /// Canonical unit spelling
    pub unit: Option<String>,
    /// Name as written in the first contributing line
    pub ingredient: String,
    pub bulk_suggestion: Option<&'static str>,
    /// How many lines contributed
    pub count: usize,
}

struct Group {
    ingredient: String,
    unit: Option<String>,
    total: f64,
    originals: Vec<String>,
}

/// Ingredient Aggregation Service
///
/// Combines recipe ingredient lines that ask for the same thing in the same
/// unit and suggests bulk purchases:
/// - "1 cup flour" + "2 cups flour" = "3 cups flour"
/// - "2 onions" + "1 onions" = "3 onions (or bag of onions)"
/// - "1 cup milk" + "200 ml milk" = 2 separate lines (different units)
pub struct IngredientAggregationService;

impl IngredientAggregationService {
    /// Aggregate raw ingredient lines. Lines without a quantity count as 1;
    /// blank lines are skipped. Output is sorted by ingredient name.
    pub fn aggregate<I, S>(lines: I) -> Vec<AggregatedIngredient>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for line in lines {
            let original = line.as_ref().trim();
            if original.is_empty() {
                continue;
            }

            let parsed = parser::parse(original);
            let unit = parsed.unit.as_deref().map(canonical_unit);
            let key = (
                Self::normalize_name(&parsed.name_fragment),
                unit.clone().unwrap_or_default(),
            );

            let position = *index.entry(key).or_insert_with(|| {
                groups.push(Group {
                    ingredient: parsed.name_fragment.clone(),
                    unit,
                    total: 0.0,
                    originals: Vec::new(),
                });
                groups.len() - 1
            });

            let group = &mut groups[position];
            group.total += parsed.amount.unwrap_or(1.0);
            group.originals.push(original.to_string());
        }

        let mut aggregated: Vec<AggregatedIngredient> =
            groups.into_iter().map(Self::finish).collect();

        aggregated.sort_by_cached_key(|item| item.ingredient.to_lowercase());

        tracing::debug!(groups = aggregated.len(), "ingredients aggregated");
        aggregated
    }

    /// Lowercase, drop parentheticals and preparation words
    pub fn normalize_name(name: &str) -> String {
        let lower = strip_parentheticals(&name.to_lowercase());
        PREP_WORDS
            .replace_all(&lower, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Bulk purchase worth suggesting for this ingredient and total
    pub fn bulk_suggestion(ingredient: &str, total_amount: f64) -> Option<&'static str> {
        let normalized = Self::normalize_name(ingredient);

        BULK_SUGGESTIONS
            .iter()
            .find(|(key, threshold, _)| normalized.contains(key) && total_amount >= *threshold)
            .map(|(_, _, suggestion)| *suggestion)
    }

    fn finish(group: Group) -> AggregatedIngredient {
        let total = round_one_decimal(group.total);

        let text = match group.unit.as_deref() {
            Some(unit) => {
                let unit = match plural_unit(unit) {
                    Some(plural) if total != 1.0 => plural,
                    _ => unit,
                };
                format!("{} {} {}", format_amount(total), unit, group.ingredient)
            }
            None if total == 1.0 => group.ingredient.clone(),
            None => format!("{} {}", total.round(), group.ingredient),
        };

        AggregatedIngredient {
            text,
            bulk_suggestion: Self::bulk_suggestion(&group.ingredient, total),
            count: group.originals.len(),
            total_amount: total,
            unit: group.unit,
            ingredient: group.ingredient,
            originals: group.originals,
        }
    }
}

/// Shorthand for [`IngredientAggregationService::aggregate`]
pub fn aggregate_ingredients<I, S>(lines: I) -> Vec<AggregatedIngredient>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    IngredientAggregationService::aggregate(lines)
}

/// Display line with the bulk suggestion and contributing count
pub fn format_aggregated(item: &AggregatedIngredient) -> String {
    let mut display = item.text.clone();

    if let Some(suggestion) = item.bulk_suggestion {
        display.push_str(&format!(" (or {suggestion})"));
    }

    if item.count > 1 {
        display.push_str(&format!(" [from {} recipes]", item.count));
    }

    display
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_same_unit_spellings() {
        let result = aggregate_ingredients(["1 cup flour", "2 cups flour"]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "3 cups flour");
        assert_eq!(result[0].unit.as_deref(), Some("cup"));
        assert_eq!(result[0].total_amount, 3.0);
        assert_eq!(result[0].count, 2);
        assert_eq!(result[0].originals, vec!["1 cup flour", "2 cups flour"]);
    }

    #[test]
    fn test_different_units_stay_separate() {
        let result = aggregate_ingredients(["1 cup milk", "200 ml milk"]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_abbreviations_not_pluralized() {
        let result = aggregate_ingredients(["2 tbsp olive oil", "1 tbsp olive oil"]);
        assert_eq!(result[0].text, "3 tbsp olive oil");

        let result = aggregate_ingredients(["1 clove garlic", "2 cloves garlic"]);
        assert_eq!(result[0].text, "3 cloves garlic");
        assert_eq!(result[0].bulk_suggestion, None);
    }

    #[test]
    fn test_unitless_items() {
        let result = aggregate_ingredients(["2 onions", "1 onions"]);
        assert_eq!(result[0].text, "3 onions");
        assert_eq!(result[0].bulk_suggestion, Some("bag of onions"));

        let result = aggregate_ingredients(["onion"]);
        assert_eq!(result[0].text, "onion");
        assert_eq!(result[0].total_amount, 1.0);
    }

    #[test]
    fn test_prep_words_merge() {
        let result = aggregate_ingredients(["1 cup chopped onion", "1 cup diced onion"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "2 cups chopped onion");
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let result = aggregate_ingredients(["0.1 cup milk", "0.2 cup milk"]);
        assert_eq!(result[0].total_amount, 0.3);
        assert_eq!(result[0].text, "0.3 cups milk");
    }

    #[test]
    fn test_sorted_by_ingredient() {
        let result = aggregate_ingredients(["salt", "2 apples", "", "1 lb Beef"]);
        let names: Vec<_> = result.iter().map(|i| i.ingredient.as_str()).collect();
        assert_eq!(names, vec!["apples", "Beef", "salt"]);
    }

    #[test]
    fn test_format_aggregated() {
        let result = aggregate_ingredients(["1 lb chicken", "1 lb chicken"]);
        assert_eq!(
            format_aggregated(&result[0]),
            "2 lb chicken (or family pack of chicken) [from 2 recipes]"
        );

        let result = aggregate_ingredients(["1 cup rice"]);
        assert_eq!(format_aggregated(&result[0]), "1 cup rice");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(
            IngredientAggregationService::normalize_name("Fresh Basil (chopped)"),
            "basil"
        );
        assert_eq!(
            IngredientAggregationService::normalize_name("  whole  Tomatoes "),
            "tomatoes"
        );
    }

    #[test]
    fn test_oversized_quantities_count_as_one() {
        let result = aggregate_ingredients([
            "18446744073709551615½ cups flour",
            "18446744073709551615 1/2 cups flour",
        ]);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|item| item.total_amount == 1.0));
        assert!(result.iter().all(|item| item.unit.is_none()));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_ingredients(Vec::<String>::new()).is_empty());
    }
}
