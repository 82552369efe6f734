//! ICICI Bank statement layout.

use lazy_static::lazy_static;

use super::amounts::RUPEE;
use super::{CurrencyRule, PatternSet, compile};
use crate::error::ExtractionError;
use crate::models::{Bank, ParsedStatement};
use crate::statement::StatementExtractor;

const CONFIDENCE: f64 = 0.83;

lazy_static! {
    static ref PATTERNS: PatternSet = PatternSet {
        name: compile(&[
            r"(?i)(?:Name|Card\s*Member)[\s:]+([A-Z][A-Z\s]+?)(?:\n|Card|ICICI)",
            r"(?i)Dear\s+([A-Z\s]{3,50})",
            r"(?i)Member\s+Name[\s:]+([A-Z\s]+)",
        ]),
        card: compile(&[
            r"(?i)Card\s*Number[\s:]+.*?(\d{4})",
            r"(?i)ending\s+(?:with\s+)?(\d{4})",
            r"(?i)XXXX\s*XXXX\s*XXXX\s*(\d{4})",
            r"\*{12}(\d{4})",
        ]),
        period: compile(&[
            r"(?i)Statement\s+Period[\s:]+(\d{2}[-/]\d{2}[-/]\d{4})\s+to\s+(\d{2}[-/]\d{2}[-/]\d{4})",
            r"(?i)Billing\s+Period[\s:]+(\d{2}\s+\w+\s+\d{4})\s+to\s+(\d{2}\s+\w+\s+\d{4})",
            r"(?i)from\s+(\d{2}[-/]\w{3}[-/]\d{4})\s+to\s+(\d{2}[-/]\w{3}[-/]\d{4})",
        ]),
        total_due: compile(&[
            r"(?i)Total\s*Amount\s*Due[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
            r"(?i)Payment\s*Due[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
            r"(?i)Amount\s*Payable[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
        ]),
        due_date: compile(&[
            r"(?i)Payment\s*Due\s*Date[\s:]+(\d{2}[-/]\d{2}[-/]\d{4})",
            r"(?i)Due\s*Date[\s:]+(\d{2}\s+\w+\s+\d{4})",
            r"(?i)Pay\s*by[\s:]+(\d{2}[-/]\w{3}[-/]\d{4})",
        ]),
        previous_balance: compile(&[
            r"(?i)(?:Previous|Opening|Last\s+Month)\s*Balance[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
        ]),
        credit_limit: compile(&[
            r"(?i)(?:Credit\s*Limit|Total\s*Credit\s*Limit)[\s:]+(?:Rs\.?|INR|₹)?\s*([\d,]+\.?\d*)",
        ]),
        reward_points: compile(&[r"(?i)(?:Reward|PAYBACK|Points?)[\s:]+(\d{1,10})"]),
        transactions: compile(&[
            r"(\d{2}[-/]\d{2}[-/]\d{4})\s+(.{10,60}?)\s+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
            r"(\d{2}\s\w{3})\s+(.{10,60}?)\s+(?:Rs\.?|₹)?\s*([\d,]+\.?\d*)",
        ]),
    };
}

/// Extractor for ICICI Bank credit card statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct IciciExtractor;

impl StatementExtractor for IciciExtractor {
    fn bank(&self) -> Bank {
        Bank::Icici
    }

    fn extract(&self, text: &str) -> Result<ParsedStatement, ExtractionError> {
        Ok(PATTERNS.extract(text, CurrencyRule::Fixed(RUPEE), CONFIDENCE))
    }
}
