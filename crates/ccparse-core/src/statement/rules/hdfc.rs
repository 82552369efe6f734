//! HDFC Bank statement layout.

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
            r"(?i)(?:Name|Card\s*Holder|Dear)[\s:]+([A-Z][A-Z\s]+?)(?:\n|Card|Account)",
            r"(?i)Dear\s+([A-Z\s]{3,})",
        ]),
        card: compile(&[
            r"(?i)(?:Card\s*(?:No|Number)[\s:]+)?(?:XXXX\s*){3}(\d{4})",
            r"(?i)ending\s+with\s+(\d{4})",
            r"\*+(\d{4})",
        ]),
        period: compile(&[
            r"(?i)(?:Statement\s*Period|Billing\s*Cycle)[\s:]+(\d{2}[\s/-]\w{3}[\s/-]\d{4})\s*(?:to|-|–)\s*(\d{2}[\s/-]\w{3}[\s/-]\d{4})",
            r"(?i)from\s+(\d{2}[\s/-]\w{3}[\s/-]\d{4})\s+to\s+(\d{2}[\s/-]\w{3}[\s/-]\d{4})",
        ]),
        total_due: compile(&[
            r"(?i)(?:Total\s*Amount\s*Due|Amount\s*Payable|Total\s*Due)[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
            r"(?i)(?:Payment\s*Due|Minimum\s*Amount\s*Due)[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
        ]),
        due_date: compile(&[
            r"(?i)(?:Payment\s*Due\s*Date|Due\s*Date|Pay\s*By)[\s:]+(\d{2}[\s/-]\w{3}[\s/-]\d{4})",
            r"(?i)due\s+on\s+(\d{2}[\s/-]\w{3}[\s/-]\d{4})",
        ]),
        previous_balance: compile(&[
            r"(?i)(?:Previous|Opening|Last)\s*Balance[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
        ]),
        credit_limit: compile(&[
            r"(?i)(?:Credit\s*Limit|Total\s*Limit|Available\s*Limit)[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
        ]),
        reward_points: compile(&[r"(?i)(?:Reward|Points?)[\s:]+(\d{1,10})"]),
        transactions: compile(&[
            r"(\d{2}/\d{2}/\d{4})\s+(.{10,60}?)\s+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
            r"(\d{2}\s\w{3}\s\d{4})\s+(.{10,60}?)\s+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
        ]),
    };
}

/// Extractor for HDFC Bank credit card statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct HdfcExtractor;

impl StatementExtractor for HdfcExtractor {
    fn bank(&self) -> Bank {
        Bank::Hdfc
    }

    fn extract(&self, text: &str) -> Result<ParsedStatement, ExtractionError> {
        Ok(PATTERNS.extract(text, CurrencyRule::Fixed(RUPEE), CONFIDENCE))
    }
}
