//! SBI Card statement layout.

use lazy_static::lazy_static;

use super::amounts::RUPEE;
use super::{CurrencyRule, PatternSet, compile};
use crate::error::ExtractionError;
use crate::models::{Bank, ParsedStatement};
use crate::statement::StatementExtractor;

const CONFIDENCE: f64 = 0.82;

lazy_static! {
    static ref PATTERNS: PatternSet = PatternSet {
        name: compile(&[
            r"(?i)Card\s*holder[\s:]+([A-Z][A-Z\s]+?)(?:\n|Card|SBI)",
            r"(?i)Name[\s:]+([A-Z\s]{3,50})",
            r"(?i)Dear\s+([A-Z\s]+),",
        ]),
        card: compile(&[
            r"(?i)Card\s*No[\s:.]+.*?(\d{4})",
            r"(?i)XXXX\s*(\d{4})",
            r"(?i)ending\s+(\d{4})",
        ]),
        period: compile(&[
            r"(?i)Statement\s+from[\s:]+(\d{2}\s+\w+\s+\d{4})\s+to\s+(\d{2}\s+\w+\s+\d{4})",
            r"(?i)Billing\s+Cycle[\s:]+(\d{2}[-/]\d{2}[-/]\d{4})\s*-\s*(\d{2}[-/]\d{2}[-/]\d{4})",
        ]),
        total_due: compile(&[
            r"(?i)Total\s*Amount\s*Due[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
            r"(?i)Amount\s*Due[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
        ]),
        due_date: compile(&[r"(?i)Payment\s*Due\s*Date[\s:]+(\d{2}[-/]\w+[-/]\d{4})"]),
        previous_balance: compile(&[r"(?i)Previous\s*Balance[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)"]),
        credit_limit: compile(&[r"(?i)Credit\s*Limit[\s:]+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)"]),
        reward_points: compile(&[r"(?i)(?:Reward|SimplyCLICK)\s*Points[\s:]+(\d{1,10})"]),
        transactions: compile(&[
            r"(\d{2}[-/]\d{2})\s+(.{10,60}?)\s+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
        ]),
    };
}

/// Extractor for SBI Card statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct SbiExtractor;

impl StatementExtractor for SbiExtractor {
    fn bank(&self) -> Bank {
        Bank::Sbi
    }

    fn extract(&self, text: &str) -> Result<ParsedStatement, ExtractionError> {
        Ok(PATTERNS.extract(text, CurrencyRule::Fixed(RUPEE), CONFIDENCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "SBI Card Statement
Cardholder: AMIT KUMAR
Card No: XXXX XXXX XXXX 5678
Statement from 01 Aug 2024 to 31 Aug 2024
Total Amount Due: Rs. 9,870.00
Payment Due Date: 15-Sep-2024
Previous Balance: Rs. 4,500.00
Credit Limit: Rs. 75,000
SimplyCLICK Points: 540
12/08 HPCL PETROL PUMP MUMBAI 2,000.00
";

    #[test]
    fn test_extract_sample() {
        let statement = SbiExtractor.extract(SAMPLE).unwrap();

        assert_eq!(statement.cardholder_name.as_deref(), Some("AMIT KUMAR"));
        assert_eq!(statement.card_last_four.as_deref(), Some("5678"));
        assert_eq!(
            statement.statement_period.as_deref(),
            Some("01 Aug 2024 - 31 Aug 2024")
        );
        assert_eq!(statement.total_amount_due.as_deref(), Some("₹9870.00"));
        assert_eq!(statement.payment_due_date.as_deref(), Some("15-Sep-2024"));
        assert_eq!(statement.previous_balance.as_deref(), Some("₹4500.00"));
        assert_eq!(statement.credit_limit.as_deref(), Some("₹75000"));
        assert_eq!(statement.reward_points.as_deref(), Some("540"));
        assert_eq!(statement.confidence, 0.82);

        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].date, "12/08");
        assert_eq!(statement.transactions[0].description, "HPCL PETROL PUMP MUMBAI");
        assert_eq!(statement.transactions[0].amount, "₹2000.00");
    }

    #[test]
    fn test_amount_due_fallback_pattern() {
        let text = "SBI Card\nAmount Due: 1,250\n";
        let statement = SbiExtractor.extract(text).unwrap();
        assert_eq!(statement.total_amount_due.as_deref(), Some("₹1250"));
    }
}
