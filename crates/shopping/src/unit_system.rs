use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Measurement system used when displaying ingredient text
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Us,
    Uk,
}

impl UnitSystem {
    pub fn label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric",
            UnitSystem::Us => "US",
            UnitSystem::Uk => "UK",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "🌍",
            UnitSystem::Us => "🇺🇸",
            UnitSystem::Uk => "🇬🇧",
        }
    }
}

struct Rewrite {
    pattern: Regex,
    metric: f64,
    uk: f64,
    target: &'static str,
}

impl Rewrite {
    fn new(pattern: &str, metric: f64, uk: f64, target: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid unit rewrite pattern"),
            metric,
            uk,
            target,
        }
    }
}

/// Applied in order; the text produced by one never matches a later one
static REWRITES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        Rewrite::new(r"(?i)(\d+(?:\.\d+)?)\s*cups?", 240.0, 284.0, "ml"),
        Rewrite::new(r"(?i)(\d+(?:\.\d+)?)\s*tbsp", 15.0, 17.758, "ml"),
        Rewrite::new(r"(?i)(\d+(?:\.\d+)?)\s*tsp", 5.0, 5.919, "ml"),
        Rewrite::new(r"(?i)(\d+(?:\.\d+)?)\s*oz", 28.35, 28.35, "g"),
        Rewrite::new(r"(?i)(\d+(?:\.\d+)?)\s*lbs?", 454.0, 454.0, "g"),
    ]
});

/// Rewrite US kitchen measures in free text for the given system.
///
/// `Us` returns the text untouched. Amounts are rounded to whole ml or g.
pub fn convert_ingredient_text(text: &str, system: UnitSystem) -> String {
    if system == UnitSystem::Us {
        return text.to_string();
    }

    REWRITES.iter().fold(text.to_string(), |current, rewrite| {
        let factor = match system {
            UnitSystem::Uk => rewrite.uk,
            _ => rewrite.metric,
        };

        rewrite
            .pattern
            .replace_all(&current, |caps: &Captures| {
                let amount: f64 = caps[1].parse().unwrap_or_default();
                format!("{} {}", (amount * factor).round(), rewrite.target)
            })
            .into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_is_untouched() {
        assert_eq!(
            convert_ingredient_text("2 cups flour", UnitSystem::Us),
            "2 cups flour"
        );
    }

    #[test]
    fn test_metric_rewrites() {
        assert_eq!(
            convert_ingredient_text("2 cups flour", UnitSystem::Metric),
            "480 ml flour"
        );
        assert_eq!(
            convert_ingredient_text("1.5 tbsp oil and 1 tsp salt", UnitSystem::Metric),
            "23 ml oil and 5 ml salt"
        );
        assert_eq!(
            convert_ingredient_text("8oz cheese, 2 lbs beef", UnitSystem::Metric),
            "227 g cheese, 908 g beef"
        );
    }

    #[test]
    fn test_uk_volumes() {
        assert_eq!(
            convert_ingredient_text("1 cup milk", UnitSystem::Uk),
            "284 ml milk"
        );
        assert_eq!(
            convert_ingredient_text("2 TBSP honey", UnitSystem::Uk),
            "36 ml honey"
        );
    }

    #[test]
    fn test_text_without_measures() {
        assert_eq!(
            convert_ingredient_text("salt to taste", UnitSystem::Metric),
            "salt to taste"
        );
    }

    #[test]
    fn test_parse_unit_system() {
        assert_eq!("UK".parse::<UnitSystem>().unwrap(), UnitSystem::Uk);
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert!("imperial".parse::<UnitSystem>().is_err());
        assert_eq!(UnitSystem::Us.to_string(), "us");
        assert_eq!(UnitSystem::Us.label(), "US");
    }
}
