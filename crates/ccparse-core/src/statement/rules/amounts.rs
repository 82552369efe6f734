//! Currency amount normalization and formatting.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Default currency symbol for Indian issuers.
pub const RUPEE: &str = "₹";

lazy_static! {
    static ref NORMALIZED_AMOUNT: Regex = Regex::new(r"^\d+(?:\.\d+)?$").unwrap();
    static ref RUPEE_PREFIX: Regex = Regex::new(r"(?i)^(?:Rs\.?|INR)").unwrap();
}

/// Build a currency string from captured digits: grouping separators are
/// dropped and `symbol` prefixed.
///
/// Returns `None` when the capture holds no usable number (e.g. a lone
/// separator).
pub fn normalize_amount(digits: &str, symbol: &str) -> Option<String> {
    let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim_end_matches('.');

    if NORMALIZED_AMOUNT.is_match(cleaned) {
        Some(format!("{}{}", symbol, cleaned))
    } else {
        None
    }
}

/// Normalize a free-form currency value (e.g. from the AI service) into
/// `<symbol><digits>[.<digits>]`.
///
/// `Rs.`/`INR` prefixes and bare numbers become rupee amounts.
pub fn normalize_currency(value: &str) -> Option<String> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let compact = RUPEE_PREFIX.replace(&compact, RUPEE);

    let split = compact
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(compact.len());
    let (symbol, digits) = compact.split_at(split);
    let symbol = if symbol.is_empty() { RUPEE } else { symbol };

    if symbol.chars().any(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return None;
    }

    normalize_amount(digits, symbol)
}

/// Parse the numeric part of a currency string ("₹1,234.50" -> 1234.50).
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// The currency symbol a currency string starts with, if any.
pub fn currency_symbol(value: &str) -> Option<&str> {
    let end = value
        .find(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        .unwrap_or(value.len());
    let symbol = value[..end].trim();
    if symbol.is_empty() { None } else { Some(symbol) }
}

/// Format an amount with Indian digit grouping (12,34,567.5).
///
/// At most two fraction digits, trailing zeros dropped.
pub fn format_grouped(amount: Decimal) -> String {
    let rounded = amount.round_dp(2).normalize();
    let s = rounded.abs().to_string();
    let (integer_part, fraction) = match s.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (s.clone(), None),
    };

    let mut formatted = String::new();
    let len = integer_part.len();
    for (i, c) in integer_part.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            formatted.push(',');
        }
        formatted.push(c);
    }

    if let Some(fraction) = fraction {
        formatted.push('.');
        formatted.push_str(&fraction);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("12,345.00", RUPEE), Some("₹12345.00".to_string()));
        assert_eq!(normalize_amount("1,00,000", RUPEE), Some("₹100000".to_string()));
        assert_eq!(normalize_amount("250.", "$"), Some("$250".to_string()));
        assert_eq!(normalize_amount(",", RUPEE), None);
    }

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency("₹32,000"), Some("₹32000".to_string()));
        assert_eq!(normalize_currency("Rs. 1,234.50"), Some("₹1234.50".to_string()));
        assert_eq!(normalize_currency("45678.90"), Some("₹45678.90".to_string()));
        assert_eq!(normalize_currency("$ 99.99"), Some("$99.99".to_string()));
        assert_eq!(normalize_currency("not available"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("₹1,234.50"), Some(Decimal::from_str("1234.50").unwrap()));
        assert_eq!(parse_amount("$99"), Some(Decimal::from(99)));
        assert_eq!(parse_amount("₹"), None);
    }

    #[test]
    fn test_currency_symbol() {
        assert_eq!(currency_symbol("₹12345.00"), Some("₹"));
        assert_eq!(currency_symbol("$5"), Some("$"));
        assert_eq!(currency_symbol("12"), None);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(Decimal::from_str("12345.00").unwrap()), "12,345");
        assert_eq!(format_grouped(Decimal::from_str("1234567.5").unwrap()), "12,34,567.5");
        assert_eq!(format_grouped(Decimal::from_str("999").unwrap()), "999");
        assert_eq!(format_grouped(Decimal::from_str("-2500.25").unwrap()), "-2,500.25");
        assert_eq!(format_grouped(Decimal::ZERO), "0");
    }
}
