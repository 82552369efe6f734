//! Post-extraction analysis: categories, analytics and validation.

pub mod analytics;
pub mod categorizer;
pub mod validator;

pub use analytics::{Insight, InsightKind, StatementAnalytics, generate_analytics};
pub use categorizer::{CategorySpending, categorize, categorize_transactions, category_spending};
pub use validator::{FieldCheck, ValidationReport, validate_statement};

use rust_decimal::{Decimal, RoundingStrategy};

/// Round half away from zero and pad to exactly `dp` fraction digits.
pub(crate) fn fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(Decimal::from_str("2.345").unwrap(), 2).to_string(), "2.35");
        assert_eq!(fixed(Decimal::from(12), 2).to_string(), "12.00");
        assert_eq!(fixed(Decimal::from_str("84.7405").unwrap(), 1).to_string(), "84.7");
    }
}
