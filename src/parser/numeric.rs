//! Numeric coercion for the designated numeric columns
//!
//! Coercion never fails: whatever cannot be read as a finite number becomes 0.

use crate::config::CoercionRule;
use crate::types::CellValue;
use regex::Regex;
use std::sync::OnceLock;

/// "1.234" / "12.345.678" style thousands grouping without decimals
fn thousands_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[+-]?\d{1,3}(\.\d{3})+$").ok())
        .as_ref()
}

/// Coerce a cell to a number under `rule`; unparseable cells become 0.
pub fn coerce(cell: &CellValue, rule: CoercionRule) -> f64 {
    let parsed = match cell {
        CellValue::Number(n) => Some(*n),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Empty => None,
        CellValue::Text(s) => match rule {
            CoercionRule::Plain => parse_plain(s),
            CoercionRule::Locale => parse_locale(s),
        },
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Standard decimal notation ("800", "-12.5", "1e3"). Rejects grouped or
/// comma-decimal text and non-finite values.
pub fn parse_plain(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Turkish-formatted numbers: '.' groups thousands, ',' marks decimals.
///
/// Text without a comma is read as plain decimal unless it is shaped like
/// dot-grouped thousands ("1.234" is 1234, "12.5" stays 12.5).
pub fn parse_locale(text: &str) -> Option<f64> {
    let compact: String = text.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    if compact.contains(',') {
        let normalized = compact.replace('.', "").replace(',', ".");
        return parse_plain(&normalized);
    }

    if thousands_pattern().is_some_and(|re| re.is_match(&compact)) {
        return parse_plain(&compact.replace('.', ""));
    }

    parse_plain(&compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_plain_accepts_decimal_notation() {
        assert_eq!(coerce(&text("800"), CoercionRule::Plain), 800.0);
        assert_eq!(coerce(&text(" -12.5 "), CoercionRule::Plain), -12.5);
        assert_eq!(coerce(&text("1e3"), CoercionRule::Plain), 1000.0);
        assert_eq!(coerce(&CellValue::Number(42.0), CoercionRule::Plain), 42.0);
    }

    #[test]
    fn test_unparseable_becomes_zero() {
        assert_eq!(coerce(&text("abc"), CoercionRule::Plain), 0.0);
        assert_eq!(coerce(&CellValue::Empty, CoercionRule::Plain), 0.0);
        assert_eq!(coerce(&text("   "), CoercionRule::Plain), 0.0);
        assert_eq!(coerce(&text("abc"), CoercionRule::Locale), 0.0);
        assert_eq!(coerce(&CellValue::Empty, CoercionRule::Locale), 0.0);
    }

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(coerce(&text("inf"), CoercionRule::Plain), 0.0);
        assert_eq!(coerce(&text("NaN"), CoercionRule::Plain), 0.0);
        assert_eq!(coerce(&CellValue::Number(f64::NAN), CoercionRule::Plain), 0.0);
    }

    #[test]
    fn test_plain_rule_zeroes_locale_text() {
        assert_eq!(coerce(&text("1.234,56"), CoercionRule::Plain), 0.0);
    }

    #[test]
    fn test_locale_rule() {
        assert_eq!(coerce(&text("1.234,56"), CoercionRule::Locale), 1234.56);
        assert_eq!(coerce(&text("1.234"), CoercionRule::Locale), 1234.0);
        assert_eq!(coerce(&text("12.345.678"), CoercionRule::Locale), 12_345_678.0);
        assert_eq!(coerce(&text("12,5"), CoercionRule::Locale), 12.5);
        assert_eq!(coerce(&text("12.5"), CoercionRule::Locale), 12.5);
        assert_eq!(coerce(&text("1 250,00"), CoercionRule::Locale), 1250.0);
    }

    #[test]
    fn test_bool_cells() {
        assert_eq!(coerce(&CellValue::Bool(true), CoercionRule::Plain), 1.0);
        assert_eq!(coerce(&CellValue::Bool(false), CoercionRule::Plain), 0.0);
    }
}
