//! American Express statement layout.
//!
//! Amex statements may be issued in USD, so amounts take `$` whenever a
//! dollar sign appears anywhere in the document.

use lazy_static::lazy_static;

use super::amounts::RUPEE;
use super::{CurrencyRule, PatternSet, compile};
use crate::error::ExtractionError;
use crate::models::{Bank, ParsedStatement};
use crate::statement::StatementExtractor;

const CONFIDENCE: f64 = 0.85;

lazy_static! {
    static ref PATTERNS: PatternSet = PatternSet {
        name: compile(&[
            r"(?i)Card\s*Member[\s:]+([A-Z][A-Z\s]+?)(?:\n|Account)",
            r"(?i)Name[\s:]+([A-Z\s]{3,50})",
            r"(?i)([A-Z\s]{5,50})\s+American\s+Express",
        ]),
        card: compile(&[
            r"(?i)Card\s*ending\s+in[\s:]+(\d{4})",
            r"(?i)Account\s*ending\s+(\d{4})",
            r"\*+(\d{5})",
        ]),
        // A closing date alone stands in for the period.
        period: compile(&[
            r"(?i)Statement\s+Closing\s+Date[\s:]+(\w+\s+\d{1,2},\s+\d{4})",
            r"(?i)Billing\s+Period[\s:]+(\d{2}/\d{2}/\d{4})\s+to\s+(\d{2}/\d{2}/\d{4})",
        ]),
        total_due: compile(&[
            r"(?i)New\s+Balance[\s:]+\$?\s*([\d,]+\.?\d*)",
            r"(?i)Total\s+Amount\s+Due[\s:]+\$?\s*([\d,]+\.?\d*)",
            r"(?i)Payment\s+Due[\s:]+\$?\s*([\d,]+\.?\d*)",
        ]),
        due_date: compile(&[
            r"(?i)Payment\s+Due\s+Date[\s:]+(\w+\s+\d{1,2},\s+\d{4})",
            r"(?i)Due\s+Date[\s:]+(\d{2}/\d{2}/\d{4})",
        ]),
        previous_balance: compile(&[r"(?i)Previous\s+Balance[\s:]+\$?\s*([\d,]+\.?\d*)"]),
        credit_limit: compile(&[r"(?i)Credit\s+Limit[\s:]+\$?\s*([\d,]+\.?\d*)"]),
        reward_points: compile(&[r"(?i)Membership\s*Rewards[\s:]+(\d{1,10})\s*points"]),
        transactions: compile(&[
            r"(\w+\s+\d{1,2})\s+(.{10,60}?)\s+\$?\s*([\d,]+\.?\d*)",
            r"(\d{2}/\d{2})\s+(.{10,60}?)\s+\$?\s*([\d,]+\.?\d*)",
        ]),
    };
}

/// Extractor for American Express statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmexExtractor;

impl StatementExtractor for AmexExtractor {
    fn bank(&self) -> Bank {
        Bank::Amex
    }

    fn extract(&self, text: &str) -> Result<ParsedStatement, ExtractionError> {
        Ok(PATTERNS.extract(text, CurrencyRule::DollarOrDefault(RUPEE), CONFIDENCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "American Express Statement
Card Member: JOHN SMITH
Card ending in: 1005
Statement Closing Date: September 15, 2024
New Balance: $1,234.56
Payment Due Date: October 10, 2024
Previous Balance: $500.00
Credit Limit: $10,000
Membership Rewards: 15000 points
Sep 02 WHOLE FOODS MARKET $85.40
Sep 05 NETFLIX SUBSCRIPTION $15.99
";

    #[test]
    fn test_extract_usd_sample() {
        let statement = AmexExtractor.extract(SAMPLE).unwrap();

        assert_eq!(statement.cardholder_name.as_deref(), Some("JOHN SMITH"));
        assert_eq!(statement.card_last_four.as_deref(), Some("1005"));
        assert_eq!(statement.statement_period.as_deref(), Some("September 15, 2024"));
        assert_eq!(statement.total_amount_due.as_deref(), Some("$1234.56"));
        assert_eq!(statement.payment_due_date.as_deref(), Some("October 10, 2024"));
        assert_eq!(statement.previous_balance.as_deref(), Some("$500.00"));
        assert_eq!(statement.credit_limit.as_deref(), Some("$10000"));
        assert_eq!(statement.reward_points.as_deref(), Some("15000"));

        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(statement.transactions[0].date, "Sep 02");
        assert_eq!(statement.transactions[0].description, "WHOLE FOODS MARKET");
        assert_eq!(statement.transactions[0].amount, "$85.40");
    }

    #[test]
    fn test_rupee_when_no_dollar_sign() {
        let text = "AMEX\nTotal Amount Due: 5,000.00\n";
        let statement = AmexExtractor.extract(text).unwrap();
        assert_eq!(statement.total_amount_due.as_deref(), Some("₹5000.00"));
    }

    #[test]
    fn test_masked_card_keeps_last_four() {
        let text = "AMEX\nAccount **********71005\n";
        let statement = AmexExtractor.extract(text).unwrap();
        assert_eq!(statement.card_last_four.as_deref(), Some("1005"));
    }

    #[test]
    fn test_billing_period_range() {
        let text = "AMEX\nBilling Period: 01/08/2024 to 31/08/2024\n";
        let statement = AmexExtractor.extract(text).unwrap();
        assert_eq!(
            statement.statement_period.as_deref(),
            Some("01/08/2024 - 31/08/2024")
        );
    }
}
