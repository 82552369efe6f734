//! Rule-based field extractors, one pattern table per issuer.
//!
//! Every field has an ordered list of candidate patterns. The first pattern
//! in list order that matches wins, even when a later one would match
//! "better".

pub mod amounts;
mod amex;
mod axis;
mod hdfc;
mod icici;
mod sbi;

pub use amex::AmexExtractor;
pub use axis::AxisExtractor;
pub use hdfc::HdfcExtractor;
pub use icici::IciciExtractor;
pub use sbi::SbiExtractor;

use regex::{Captures, Regex};

use crate::models::statement::{
    ExtractionMethod, MAX_TEXT_LEN, MAX_TRANSACTIONS, ParsedStatement, Transaction,
};

/// How an issuer's amounts get their currency symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyRule {
    /// Always this symbol.
    Fixed(&'static str),
    /// `$` if a dollar sign appears anywhere in the text, else the default.
    ///
    /// Heuristic: a statement mixing symbols is classified as USD.
    DollarOrDefault(&'static str),
}

impl CurrencyRule {
    pub fn resolve(&self, text: &str) -> &'static str {
        match self {
            Self::Fixed(symbol) => symbol,
            Self::DollarOrDefault(default) => {
                if text.contains('$') {
                    "$"
                } else {
                    default
                }
            }
        }
    }
}

/// Ordered candidate patterns for every statement field.
pub struct PatternSet {
    pub name: Vec<Regex>,
    pub card: Vec<Regex>,
    pub period: Vec<Regex>,
    pub total_due: Vec<Regex>,
    pub due_date: Vec<Regex>,
    pub previous_balance: Vec<Regex>,
    pub credit_limit: Vec<Regex>,
    pub reward_points: Vec<Regex>,
    /// Groups: 1 = date, 2 = description, 3 = amount.
    pub transactions: Vec<Regex>,
}

impl PatternSet {
    /// Apply every field's pattern list to `text`.
    ///
    /// Never fails: a field with no matching candidate is `None`.
    pub fn extract(&self, text: &str, currency: CurrencyRule, confidence: f64) -> ParsedStatement {
        let symbol = currency.resolve(text);
        let amount = |patterns: &[Regex]| {
            first_captures(patterns, text)
                .and_then(|caps| amounts::normalize_amount(&caps[1], symbol))
        };

        ParsedStatement {
            cardholder_name: first_captures(&self.name, text).and_then(|caps| clean_text(&caps[1])),
            card_last_four: first_captures(&self.card, text).and_then(|caps| last_four(&caps[1])),
            statement_period: first_captures(&self.period, text)
                .and_then(|caps| joined_groups(&caps)),
            total_amount_due: amount(&self.total_due),
            payment_due_date: first_captures(&self.due_date, text)
                .and_then(|caps| clean_text(&caps[1])),
            previous_balance: amount(&self.previous_balance),
            credit_limit: amount(&self.credit_limit),
            reward_points: first_captures(&self.reward_points, text)
                .map(|caps| caps[1].to_string()),
            transactions: self.extract_transactions(text, symbol),
            confidence,
            method: ExtractionMethod::RuleBased,
            error: None,
        }
    }

    /// Transactions from the first pattern that matches at least once.
    ///
    /// Patterns are never merged; the cap applies to the winning pattern.
    fn extract_transactions(&self, text: &str, symbol: &str) -> Vec<Transaction> {
        for pattern in &self.transactions {
            let transactions: Vec<Transaction> = pattern
                .captures_iter(text)
                .filter_map(|caps| {
                    let description = clean_text(&caps[2])?;
                    let amount = amounts::normalize_amount(&caps[3], symbol)?;
                    Some(Transaction::new(&caps[1], description, amount))
                })
                .take(MAX_TRANSACTIONS)
                .collect();

            if !transactions.is_empty() {
                return transactions;
            }
        }

        Vec::new()
    }
}

/// Compile a static pattern list.
pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid statement pattern"))
        .collect()
}

fn first_captures<'t>(patterns: &[Regex], text: &'t str) -> Option<Captures<'t>> {
    patterns.iter().find_map(|p| p.captures(text))
}

/// Trim and bound a free-text capture; blank captures count as missing.
pub(crate) fn clean_text(value: &str) -> Option<String> {
    let trimmed: String = value.trim().chars().take(MAX_TEXT_LEN).collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Last four digits of a card number capture.
pub(crate) fn last_four(value: &str) -> Option<String> {
    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    Some(digits[digits.len() - 4..].iter().collect())
}

/// All participating capture groups joined with " - ".
fn joined_groups(caps: &Captures<'_>) -> Option<String> {
    let parts: Vec<&str> = caps
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() { None } else { Some(parts.join(" - ")) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_pattern_in_list_wins() {
        let patterns = compile(&[r"(?i)Total\s+Due[\s:]+(\d+)", r"(\d{5})"]);
        let text = "ref 99999\nTotal Due: 120";

        let caps = first_captures(&patterns, text).unwrap();
        assert_eq!(&caps[1], "120");
    }

    #[test]
    fn test_clean_text_truncates() {
        let long = format!("  {}  ", "A".repeat(80));
        assert_eq!(clean_text(&long).unwrap().len(), MAX_TEXT_LEN);
        assert_eq!(clean_text("   "), None);
    }

    #[test]
    fn test_last_four() {
        assert_eq!(last_four("12345"), Some("2345".to_string()));
        assert_eq!(last_four("4321"), Some("4321".to_string()));
        assert_eq!(last_four("12"), None);
    }

    #[test]
    fn test_currency_rule() {
        assert_eq!(CurrencyRule::Fixed("₹").resolve("Total $5"), "₹");
        assert_eq!(CurrencyRule::DollarOrDefault("₹").resolve("Total $5"), "$");
        assert_eq!(CurrencyRule::DollarOrDefault("₹").resolve("Total 5"), "₹");
    }
}
