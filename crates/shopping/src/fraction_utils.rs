use fraction::Fraction;

/// Unicode vulgar fractions recognized in ingredient text
pub const VULGAR_FRACTIONS: &[(char, u64, u64)] = &[
    ('¼', 1, 4),
    ('½', 1, 2),
    ('¾', 3, 4),
    ('⅓', 1, 3),
    ('⅔', 2, 3),
    ('⅛', 1, 8),
    ('⅜', 3, 8),
    ('⅝', 5, 8),
    ('⅞', 7, 8),
];

/// Character class matching any vulgar fraction, for use inside regexes
pub const VULGAR_FRACTION_CLASS: &str = "¼½¾⅓⅔⅛⅜⅝⅞";

pub fn is_vulgar_fraction(c: char) -> bool {
    VULGAR_FRACTIONS.iter().any(|(f, _, _)| *f == c)
}

fn vulgar_fraction(c: char) -> Option<(u64, u64)> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(f, _, _)| *f == c)
        .map(|(_, n, d)| (*n, *d))
}

/// Parse a quantity string into a Fraction
///
/// Supports formats:
/// - Whole numbers: "2" → 2/1
/// - Pure fractions: "1/2" → 1/2
/// - Mixed fractions: "1 1/2" → 3/2
/// - Decimals: "0.5" → 1/2
/// - Vulgar fractions: "½" → 1/2, "1½" and "1 ½" → 3/2
///
/// Mixed quantities whose whole part does not fit alongside the fraction
/// are rejected rather than wrapped.
pub fn parse_quantity(quantity_str: &str) -> Result<Fraction, String> {
    let trimmed = quantity_str.trim();

    if trimmed.is_empty() {
        return Err("Empty quantity".to_string());
    }

    if trimmed.starts_with('-') {
        return Err("Negative quantities are not allowed".to_string());
    }

    // Trailing vulgar fraction: "½", "1½", "1 ½"
    let last = trimmed.chars().last().unwrap_or_default();
    if let Some((numer, denom)) = vulgar_fraction(last) {
        let whole = trimmed[..trimmed.len() - last.len_utf8()].trim();
        if whole.is_empty() {
            return Ok(Fraction::new(numer, denom));
        }
        return mixed_fraction(parse_whole(whole)?, numer, denom, quantity_str);
    }

    // Mixed fractions: "1 1/2"
    if trimmed.contains(' ') && trimmed.contains('/') {
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(format!("Invalid mixed fraction format: {}", quantity_str));
        }

        let (numer, denom) = parse_slash_parts(parts[1])?;
        return mixed_fraction(parse_whole(parts[0])?, numer, denom, quantity_str);
    }

    // Pure fractions: "1/2"
    if trimmed.contains('/') {
        let (numer, denom) = parse_slash_parts(trimmed)?;
        return Ok(Fraction::new(numer, denom));
    }

    if let Ok(whole) = trimmed.parse::<u64>() {
        return Ok(Fraction::new(whole, 1u64));
    }

    Ok(Fraction::from(parse_decimal(trimmed)?))
}

/// Parse a quantity straight to its decimal value.
///
/// Plain numbers stay on the `f64` path so values too large for an exact
/// fraction ("100000000000000000000000.5") still come back as numbers.
pub fn parse_amount(quantity_str: &str) -> Result<f64, String> {
    let trimmed = quantity_str.trim();

    if trimmed.contains('/') || trimmed.chars().any(is_vulgar_fraction) {
        let quantity = parse_quantity(trimmed)?;
        return to_f64(&quantity).ok_or_else(|| format!("Quantity out of range: {}", quantity_str));
    }

    if trimmed.starts_with('-') {
        return Err("Negative quantities are not allowed".to_string());
    }

    parse_decimal(trimmed)
}

fn parse_decimal(decimal: &str) -> Result<f64, String> {
    let value: f64 = decimal
        .parse()
        .map_err(|_| format!("Invalid number format: {}", decimal))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!("Quantity out of range: {}", decimal));
    }

    Ok(value)
}

/// `whole + numer/denom` as one fraction, computed without overflow
fn mixed_fraction(whole: u64, numer: u64, denom: u64, original: &str) -> Result<Fraction, String> {
    whole
        .checked_mul(denom)
        .and_then(|scaled| scaled.checked_add(numer))
        .map(|total| Fraction::new(total, denom))
        .ok_or_else(|| format!("Quantity out of range: {}", original))
}

fn parse_whole(whole: &str) -> Result<u64, String> {
    whole
        .parse()
        .map_err(|_| format!("Invalid whole number: {}", whole))
}

fn parse_slash_parts(fraction: &str) -> Result<(u64, u64), String> {
    let parts: Vec<&str> = fraction.split('/').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid fraction format: {}", fraction));
    }

    let numerator: u64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("Invalid numerator: {}", parts[0]))?;
    let denominator: u64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("Invalid denominator: {}", parts[1]))?;

    if denominator == 0 {
        return Err("Denominator cannot be zero".to_string());
    }

    Ok((numerator, denominator))
}

/// Decimal value of a fraction, `None` for NaN or infinite fractions
pub fn to_f64(fraction: &Fraction) -> Option<f64> {
    match (fraction.numer(), fraction.denom()) {
        (Some(numer), Some(denom)) if *denom != 0 => Some(*numer as f64 / *denom as f64),
        _ => None,
    }
}

/// Format an amount the way it is shown on the list: "3", "1.5", "0.3"
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
