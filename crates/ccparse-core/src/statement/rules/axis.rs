//! Axis Bank statement layout.

use lazy_static::lazy_static;

use super::amounts::RUPEE;
use super::{CurrencyRule, PatternSet, compile};
use crate::error::ExtractionError;
use crate::models::{Bank, ParsedStatement};
use crate::statement::StatementExtractor;

const CONFIDENCE: f64 = 0.84;

lazy_static! {
    static ref PATTERNS: PatternSet = PatternSet {
        name: compile(&[
            r"(?i)Primary\s+Card\s+Member[\s:]+([A-Z][A-Z\s]+?)(?:\n|Card)",
            r"(?i)Name[\s:]+([A-Z\s]{3,50})",
            r"(?i)Dear\s+([A-Z\s]+)",
        ]),
        card: compile(&[
            r"(?i)Card\s*Number[\s:]+\*+(\d{4})",
            r"(?i)ending\s+with\s+(\d{4})",
            r"(?i)XXXX\s*XXXX\s*XXXX\s*(\d{4})",
        ]),
        period: compile(&[
            r"(?i)Statement\s+Date[\s:]+(\d{2}\s+\w+\s+\d{4})\s+to\s+(\d{2}\s+\w+\s+\d{4})",
        ]),
        total_due: compile(&[
            r"(?i)Total\s*Amount\s*Due[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
            r"(?i)Minimum\s*Amount\s*Due[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
        ]),
        due_date: compile(&[r"(?i)Due\s*Date[\s:]+(\d{2}\s+\w+\s+\d{4})"]),
        previous_balance: compile(&[
            r"(?i)Previous\s*Outstanding[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
        ]),
        credit_limit: compile(&[r"(?i)Credit\s*Limit[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)"]),
        reward_points: compile(&[r"(?i)(?:EDGE\s*)?Reward\s*Points[\s:]+(\d{1,10})"]),
        transactions: compile(&[
            r"(\d{2}/\d{2}/\d{4})\s+(.{10,60}?)\s+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
        ]),
    };
}

/// Extractor for Axis Bank credit card statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisExtractor;

impl StatementExtractor for AxisExtractor {
    fn bank(&self) -> Bank {
        Bank::Axis
    }

    fn extract(&self, text: &str) -> Result<ParsedStatement, ExtractionError> {
        Ok(PATTERNS.extract(text, CurrencyRule::Fixed(RUPEE), CONFIDENCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "AXIS BANK Credit Card Statement
Primary Card Member: NEHA GUPTA
Card Number: ****9012
Statement Date: 05 Sep 2024 to 04 Oct 2024
Total Amount Due: ₹ 23,400.00
Due Date: 24 Oct 2024
Previous Outstanding: 10,000
Credit Limit: 3,00,000
EDGE Reward Points: 880
10/09/2024 INDIAN OIL FUEL STATION 1,500.00
";

    #[test]
    fn test_extract_sample() {
        let statement = AxisExtractor.extract(SAMPLE).unwrap();

        assert_eq!(statement.cardholder_name.as_deref(), Some("NEHA GUPTA"));
        assert_eq!(statement.card_last_four.as_deref(), Some("9012"));
        assert_eq!(
            statement.statement_period.as_deref(),
            Some("05 Sep 2024 - 04 Oct 2024")
        );
        assert_eq!(statement.total_amount_due.as_deref(), Some("₹23400.00"));
        assert_eq!(statement.payment_due_date.as_deref(), Some("24 Oct 2024"));
        assert_eq!(statement.previous_balance.as_deref(), Some("₹10000"));
        assert_eq!(statement.credit_limit.as_deref(), Some("₹300000"));
        assert_eq!(statement.reward_points.as_deref(), Some("880"));
        assert_eq!(statement.confidence, 0.84);

        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].description, "INDIAN OIL FUEL STATION");
        assert_eq!(statement.transactions[0].amount, "₹1500.00");
    }
}
