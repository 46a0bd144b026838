use serde::Serialize;

use crate::parser;

/// Grams per ounce, used for every grams → ounces step.
pub const GRAMS_PER_OUNCE: f64 = 28.35;

/// Cross-family approximation: one milliliter weighs one gram.
///
/// Applied uniformly regardless of ingredient, so oil, flour and honey are
/// all treated as water-density.
pub const GRAMS_PER_MILLILITER: f64 = 1.0;

/// Measurement family a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    /// Reference unit: grams
    Mass,
    /// Reference unit: milliliters
    Volume,
}

/// A unit and the spellings that resolve to it
#[derive(Debug)]
pub struct ConversionFactor {
    pub spellings: &'static [&'static str],
    pub family: UnitFamily,
    /// Multiplier against the family's reference unit
    pub factor: f64,
}

impl ConversionFactor {
    /// Short display spelling ("g", "cup", "tbsp", ...)
    pub fn symbol(&self) -> &'static str {
        self.spellings[0]
    }
}

pub const CONVERSION_TABLE: &[ConversionFactor] = &[
    // Mass -> grams
    ConversionFactor {
        spellings: &["g", "gram", "grams", "gr"],
        family: UnitFamily::Mass,
        factor: 1.0,
    },
    ConversionFactor {
        spellings: &["oz", "ounce", "ounces"],
        family: UnitFamily::Mass,
        factor: GRAMS_PER_OUNCE,
    },
    ConversionFactor {
        spellings: &["lb", "lbs", "pound", "pounds"],
        family: UnitFamily::Mass,
        factor: 454.0,
    },
    ConversionFactor {
        spellings: &["kg", "kilogram", "kilograms", "kilo", "kilos"],
        family: UnitFamily::Mass,
        factor: 1000.0,
    },
    // Volume -> milliliters
    ConversionFactor {
        spellings: &["ml", "milliliter", "milliliters", "millilitre", "millilitres"],
        family: UnitFamily::Volume,
        factor: 1.0,
    },
    ConversionFactor {
        spellings: &["l", "liter", "liters", "litre", "litres"],
        family: UnitFamily::Volume,
        factor: 1000.0,
    },
    ConversionFactor {
        spellings: &["cup", "cups"],
        family: UnitFamily::Volume,
        factor: 240.0,
    },
    ConversionFactor {
        spellings: &["tbsp", "tablespoon", "tablespoons", "tbs"],
        family: UnitFamily::Volume,
        factor: 15.0,
    },
    ConversionFactor {
        spellings: &["tsp", "teaspoon", "teaspoons"],
        family: UnitFamily::Volume,
        factor: 5.0,
    },
];

/// Count-style units that never convert but still group by spelling
const COUNT_UNITS: &[&[&str]] = &[
    &["clove", "cloves"],
    &["slice", "slices"],
    &["can", "cans"],
    &["package", "packages"],
    &["bag", "bags"],
    &["bunch", "bunches"],
    &["head", "heads"],
    &["piece", "pieces"],
    &["pinch", "pinches"],
];

/// Look up a unit by any of its spellings (case-insensitive)
pub fn lookup_unit(unit: &str) -> Option<&'static ConversionFactor> {
    let unit = unit.trim().to_lowercase();
    CONVERSION_TABLE
        .iter()
        .find(|f| f.spellings.contains(&unit.as_str()))
}

/// Collapse spelling variants ("Tablespoons", "tbsp") to one canonical form.
///
/// Unknown units come back trimmed and lowercased.
pub fn canonical_unit(unit: &str) -> String {
    let lower = unit.trim().to_lowercase();

    if let Some(factor) = lookup_unit(&lower) {
        return factor.symbol().to_string();
    }

    COUNT_UNITS
        .iter()
        .find(|group| group.contains(&lower.as_str()))
        .map(|group| group[0].to_string())
        .unwrap_or(lower)
}

/// Plural spelling for units written out as words ("cup" → "cups").
///
/// Abbreviations and unknown units have none.
pub fn plural_unit(unit: &str) -> Option<&'static str> {
    let unit = canonical_unit(unit);
    if unit == "cup" {
        return Some("cups");
    }

    COUNT_UNITS
        .iter()
        .find(|group| group[0] == unit)
        .map(|group| group[1])
}

/// Reference-unit annotation for a quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceAmount {
    /// Rounded to the nearest gram
    pub grams: f64,
    /// Rounded to one decimal
    pub ounces: f64,
    /// True when the value went through the 1 ml ≈ 1 g approximation
    pub approximate: bool,
}

impl std::fmt::Display for ReferenceAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}g / {}oz", self.grams, self.ounces)?;
        if self.approximate {
            write!(f, " (approx.)")?;
        }
        Ok(())
    }
}

/// Convert an amount in any known unit to grams and ounces.
///
/// Returns `None` for unknown units and for amounts that are not finite or
/// not strictly positive. `None` means "no conversion available".
pub fn to_reference_units(amount: f64, unit: &str) -> Option<ReferenceAmount> {
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }

    let factor = lookup_unit(unit)?;

    let (grams, approximate) = match factor.family {
        UnitFamily::Mass => (amount * factor.factor, false),
        UnitFamily::Volume => (amount * factor.factor * GRAMS_PER_MILLILITER, true),
    };

    Some(ReferenceAmount {
        grams: grams.round(),
        ounces: round_one_decimal(grams / GRAMS_PER_OUNCE),
        approximate,
    })
}

/// Parse an ingredient line and render its conversion, e.g. "480g / 16.9oz (approx.)"
pub fn simple_conversion(ingredient_text: &str) -> Option<String> {
    let parsed = parser::parse(ingredient_text);
    let amount = parsed.amount?;
    let unit = parsed.unit?;

    to_reference_units(amount, &unit).map(|r| r.to_string())
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cups_to_reference() {
        let r = to_reference_units(2.0, "cup").unwrap();
        assert_eq!(r.grams, 480.0);
        assert_eq!(r.ounces, 16.9);
        assert!(r.approximate);
    }

    #[test]
    fn test_pound_to_reference() {
        let r = to_reference_units(1.0, "lb").unwrap();
        assert_eq!(r.grams, 454.0);
        assert_eq!(r.ounces, 16.0);
        assert!(!r.approximate);
    }

    #[test]
    fn test_spellings_and_case() {
        assert_eq!(
            to_reference_units(1.0, "Tablespoons"),
            to_reference_units(1.0, "tbsp")
        );
        assert_eq!(to_reference_units(2.0, "KG").unwrap().grams, 2000.0);
        assert_eq!(to_reference_units(1.0, "ounce").unwrap().grams, 28.0);
        assert_eq!(to_reference_units(1.0, "ounce").unwrap().ounces, 1.0);
    }

    #[test]
    fn test_unknown_unit_and_bad_amounts() {
        assert!(to_reference_units(1.0, "pinch").is_none());
        assert!(to_reference_units(1.0, "large").is_none());
        assert!(to_reference_units(0.0, "cup").is_none());
        assert!(to_reference_units(-1.0, "cup").is_none());
        assert!(to_reference_units(f64::NAN, "cup").is_none());
        assert!(to_reference_units(f64::INFINITY, "g").is_none());
    }

    #[test]
    fn test_canonical_unit() {
        assert_eq!(canonical_unit("Tablespoons"), "tbsp");
        assert_eq!(canonical_unit("lbs"), "lb");
        assert_eq!(canonical_unit("cloves"), "clove");
        assert_eq!(canonical_unit(" Sprigs "), "sprigs");
    }

    #[test]
    fn test_plural_unit() {
        assert_eq!(plural_unit("cup"), Some("cups"));
        assert_eq!(plural_unit("Cloves"), Some("cloves"));
        assert_eq!(plural_unit("bunch"), Some("bunches"));
        assert_eq!(plural_unit("tbsp"), None);
        assert_eq!(plural_unit("large"), None);
    }

    #[test]
    fn test_simple_conversion_labels_approximation() {
        assert_eq!(
            simple_conversion("2 cups milk").as_deref(),
            Some("480g / 16.9oz (approx.)")
        );
        assert_eq!(simple_conversion("1 lb beef").as_deref(), Some("454g / 16oz"));
        assert_eq!(simple_conversion("2 large eggs"), None);
        assert_eq!(simple_conversion("salt"), None);
    }
}
