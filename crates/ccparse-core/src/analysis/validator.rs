//! Field-level plausibility checks. Diagnostic only: nothing here changes
//! the extracted record.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::ParsedStatement;
use crate::statement::rules::amounts::currency_symbol;

lazy_static! {
    static ref NAME: Regex = Regex::new(r"^[A-Za-z\s.]+$").unwrap();
    static ref CARD_LAST_FOUR: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref DATE_RANGE: Regex = Regex::new(r"\d{2}.+\d{4}.*-.*\d{2}.+\d{4}").unwrap();
    static ref DATE: Regex = Regex::new(r"\d{2}.+\d{4}").unwrap();
}

/// Outcome of one field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub valid: bool,
    pub message: &'static str,
}

impl FieldCheck {
    fn valid() -> Self {
        Self {
            valid: true,
            message: "Valid",
        }
    }

    fn invalid(message: &'static str) -> Self {
        Self {
            valid: false,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChecks {
    pub cardholder_name: FieldCheck,
    pub card_last_four: FieldCheck,
    pub statement_period: FieldCheck,
    pub total_amount_due: FieldCheck,
    pub payment_due_date: FieldCheck,
}

impl FieldChecks {
    fn named(&self) -> [(&'static str, &FieldCheck); 5] {
        [
            ("cardholderName", &self.cardholder_name),
            ("cardLastFour", &self.card_last_four),
            ("statementPeriod", &self.statement_period),
            ("totalAmountDue", &self.total_amount_due),
            ("paymentDueDate", &self.payment_due_date),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub fields: FieldChecks,
    /// Percentage of valid fields, rounded to an integer.
    pub overall_score: u32,
    pub is_complete: bool,
    pub missing_fields: Vec<&'static str>,
}

/// Check the five required fields of a statement.
pub fn validate_statement(statement: &ParsedStatement) -> ValidationReport {
    let fields = FieldChecks {
        cardholder_name: validate_name(statement.cardholder_name.as_deref()),
        card_last_four: validate_card(statement.card_last_four.as_deref()),
        statement_period: validate_period(statement.statement_period.as_deref()),
        total_amount_due: validate_amount(statement.total_amount_due.as_deref()),
        payment_due_date: validate_date(statement.payment_due_date.as_deref()),
    };

    let named = fields.named();
    let total = named.len();
    let valid = named.iter().filter(|(_, check)| check.valid).count();
    let missing_fields: Vec<&'static str> = named
        .iter()
        .filter(|(_, check)| !check.valid)
        .map(|(name, _)| *name)
        .collect();

    ValidationReport {
        fields,
        overall_score: ((valid as f64 / total as f64) * 100.0).round() as u32,
        is_complete: valid == total,
        missing_fields,
    }
}

fn validate_name(name: Option<&str>) -> FieldCheck {
    match name {
        None | Some("") => FieldCheck::invalid("Name is missing"),
        Some(n) if n.chars().count() < 3 => FieldCheck::invalid("Name too short"),
        Some(n) if !NAME.is_match(n) => FieldCheck::invalid("Invalid characters in name"),
        Some(_) => FieldCheck::valid(),
    }
}

fn validate_card(card: Option<&str>) -> FieldCheck {
    match card {
        None | Some("") => FieldCheck::invalid("Card number missing"),
        Some(c) if !CARD_LAST_FOUR.is_match(c) => FieldCheck::invalid("Must be 4 digits"),
        Some(_) => FieldCheck::valid(),
    }
}

fn validate_period(period: Option<&str>) -> FieldCheck {
    match period {
        None | Some("") => FieldCheck::invalid("Date range missing"),
        Some(p) if !DATE_RANGE.is_match(p) => FieldCheck::invalid("Invalid format"),
        Some(_) => FieldCheck::valid(),
    }
}

fn validate_amount(amount: Option<&str>) -> FieldCheck {
    let Some(amount) = amount.filter(|a| !a.is_empty()) else {
        return FieldCheck::invalid("Amount missing");
    };

    let digits = currency_symbol(amount)
        .map(|symbol| amount.trim_start().trim_start_matches(symbol))
        .unwrap_or(amount)
        .replace(',', "");

    match Decimal::from_str(digits.trim()) {
        Ok(value) if value > Decimal::ZERO => FieldCheck::valid(),
        _ => FieldCheck::invalid("Invalid amount"),
    }
}

fn validate_date(date: Option<&str>) -> FieldCheck {
    match date {
        None | Some("") => FieldCheck::invalid("Date missing"),
        Some(d) if !DATE.is_match(d) => FieldCheck::invalid("Invalid date format"),
        Some(_) => FieldCheck::valid(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionMethod;
    use pretty_assertions::assert_eq;

    fn complete() -> ParsedStatement {
        let mut statement = ParsedStatement::empty(1.0, ExtractionMethod::RuleBased);
        statement.cardholder_name = Some("RAHUL SHARMA".to_string());
        statement.card_last_four = Some("4821".to_string());
        statement.statement_period = Some("01 Sep 2024 - 30 Sep 2024".to_string());
        statement.total_amount_due = Some("₹12345.00".to_string());
        statement.payment_due_date = Some("20 Oct 2024".to_string());
        statement
    }

    #[test]
    fn test_complete_statement() {
        let report = validate_statement(&complete());

        assert_eq!(report.overall_score, 100);
        assert!(report.is_complete);
        assert!(report.missing_fields.is_empty());
        assert_eq!(report.fields.cardholder_name, FieldCheck::valid());
    }

    #[test]
    fn test_partial_statement() {
        let mut statement = complete();
        statement.cardholder_name = Some("J0HN".to_string());
        statement.total_amount_due = None;

        let report = validate_statement(&statement);

        assert_eq!(report.overall_score, 60);
        assert!(!report.is_complete);
        assert_eq!(report.missing_fields, vec!["cardholderName", "totalAmountDue"]);
        assert_eq!(report.fields.cardholder_name.message, "Invalid characters in name");
        assert_eq!(report.fields.total_amount_due.message, "Amount missing");
    }

    #[test]
    fn test_amount_checks() {
        assert!(validate_amount(Some("$1,234.56")).valid);
        assert!(validate_amount(Some("5000")).valid);
        assert!(!validate_amount(Some("₹0")).valid);
        assert!(!validate_amount(Some("₹")).valid);
        assert!(!validate_amount(Some("₹12abc")).valid);
    }

    #[test]
    fn test_name_and_period_checks() {
        assert_eq!(validate_name(Some("AB")).message, "Name too short");
        assert!(validate_name(Some("Dr. A. Rao")).valid);
        assert!(!validate_period(Some("September 15, 2024")).valid);
        assert!(validate_period(Some("01/08/2024 - 31/08/2024")).valid);
        assert!(!validate_card(Some("12345")).valid);
    }
}
