//! Statement summary, spending breakdown and insights.

use rust_decimal::Decimal;
use serde::Serialize;

use super::categorizer::{CategorySpending, category_spending};
use super::fixed;
use crate::models::{ParsedStatement, Transaction};
use crate::statement::rules::amounts::{RUPEE, currency_symbol, format_grouped, parse_amount};

/// Utilization above this (percent) draws a warning.
const HIGH_UTILIZATION: i64 = 70;

/// Utilization below this (percent) is reported as healthy.
const HEALTHY_UTILIZATION: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementAnalytics {
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spending: Option<Spending>,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_due: String,
    pub previous_balance: String,
    pub new_spending: String,
    /// Percentage with one decimal and `%`, or `N/A` without a credit limit.
    pub credit_utilization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spending {
    pub total_transactions: usize,
    pub category_breakdown: Vec<CategorySpending>,
    pub average_transaction: String,
    pub highest_transaction: Option<Transaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
    Reminder,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Info => "info",
            Self::Reminder => "reminder",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

/// Build analytics for a statement.
///
/// Spending and insights are only produced when the statement carries
/// transactions.
pub fn generate_analytics(statement: &ParsedStatement) -> StatementAnalytics {
    let symbol = statement
        .total_amount_due
        .as_deref()
        .and_then(currency_symbol)
        .unwrap_or(RUPEE);
    let amount = |value: &Option<String>| {
        value
            .as_deref()
            .and_then(parse_amount)
            .unwrap_or_default()
    };

    let total_due = amount(&statement.total_amount_due);
    let previous_balance = amount(&statement.previous_balance);
    let credit_limit = amount(&statement.credit_limit);

    let utilization = utilization(total_due, credit_limit);

    let summary = Summary {
        total_due: format!("{}{}", symbol, format_grouped(total_due)),
        previous_balance: format!("{}{}", symbol, format_grouped(previous_balance)),
        new_spending: format!(
            "{}{}",
            symbol,
            format_grouped(total_due.saturating_sub(previous_balance))
        ),
        credit_utilization: utilization
            .map(|u| format!("{}%", u))
            .unwrap_or_else(|| "N/A".to_string()),
    };

    if statement.transactions.is_empty() {
        return StatementAnalytics {
            summary,
            spending: None,
            insights: Vec::new(),
        };
    }

    let breakdown = category_spending(&statement.transactions);
    let count = statement.transactions.len();
    let insights = insights(utilization, &breakdown, symbol);

    let spending = Spending {
        total_transactions: count,
        average_transaction: format!("{}{}", symbol, fixed(total_due / Decimal::from(count), 2)),
        highest_transaction: highest_transaction(&statement.transactions).cloned(),
        category_breakdown: breakdown,
    };

    StatementAnalytics {
        summary,
        spending: Some(spending),
        insights,
    }
}

/// Total due as a percentage of the credit limit, one decimal.
///
/// `None` without a positive limit or when the ratio is not representable.
fn utilization(total_due: Decimal, credit_limit: Decimal) -> Option<Decimal> {
    if credit_limit <= Decimal::ZERO {
        return None;
    }
    total_due
        .checked_div(credit_limit)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|u| fixed(u, 1))
}

/// The largest transaction; the earliest one wins ties.
fn highest_transaction(transactions: &[Transaction]) -> Option<&Transaction> {
    let value = |txn: &Transaction| parse_amount(&txn.amount).unwrap_or_default();

    transactions.iter().fold(None, |highest, current| match highest {
        Some(h) if value(current) <= value(h) => Some(h),
        _ => Some(current),
    })
}

fn insights(
    utilization: Option<Decimal>,
    breakdown: &[CategorySpending],
    symbol: &str,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(u) = utilization {
        if u > Decimal::from(HIGH_UTILIZATION) {
            insights.push(Insight::new(
                InsightKind::Warning,
                "High Credit Utilization",
                format!(
                    "Your credit utilization is {}%. Keep it below 30% for better credit score.",
                    u
                ),
            ));
        } else if u < Decimal::from(HEALTHY_UTILIZATION) {
            insights.push(Insight::new(
                InsightKind::Success,
                "Healthy Credit Usage",
                format!(
                    "Great! Your credit utilization is {}%, which is excellent for your credit score.",
                    u
                ),
            ));
        }
    }

    if let Some(top) = breakdown.first() {
        insights.push(Insight::new(
            InsightKind::Info,
            "Top Spending Category",
            format!(
                "{} accounts for {}% ({}{}) of your spending.",
                top.category, top.percentage, symbol, top.amount
            ),
        ));
    }

    insights.push(Insight::new(
        InsightKind::Reminder,
        "Payment Reminder",
        "Pay your credit card bill before the due date to avoid interest charges and maintain a good credit score."
            .to_string(),
    ));

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionMethod;
    use pretty_assertions::assert_eq;

    fn statement(due: &str, previous: Option<&str>, limit: Option<&str>) -> ParsedStatement {
        let mut statement = ParsedStatement::empty(0.85, ExtractionMethod::RuleBased);
        statement.total_amount_due = Some(due.to_string());
        statement.previous_balance = previous.map(String::from);
        statement.credit_limit = limit.map(String::from);
        statement
    }

    #[test]
    fn test_summary_formatting() {
        let analytics =
            generate_analytics(&statement("₹12345.00", Some("₹8200.50"), Some("₹150000")));

        assert_eq!(analytics.summary.total_due, "₹12,345");
        assert_eq!(analytics.summary.previous_balance, "₹8,200.5");
        assert_eq!(analytics.summary.new_spending, "₹4,144.5");
        assert_eq!(analytics.summary.credit_utilization, "8.2%");
        assert_eq!(analytics.spending, None);
        assert!(analytics.insights.is_empty());
    }

    #[test]
    fn test_missing_limit_is_na() {
        let analytics = generate_analytics(&statement("₹500", None, None));
        assert_eq!(analytics.summary.credit_utilization, "N/A");
        assert_eq!(analytics.summary.previous_balance, "₹0");
        assert_eq!(analytics.summary.new_spending, "₹500");
    }

    #[test]
    fn test_usd_statement_keeps_symbol() {
        let analytics = generate_analytics(&statement("$1234.56", Some("$500.00"), None));
        assert_eq!(analytics.summary.total_due, "$1,234.56");
        assert_eq!(analytics.summary.new_spending, "$734.56");
    }

    #[test]
    fn test_spending_and_insights() {
        let mut s = statement("₹12345.00", Some("₹8200.50"), Some("₹150000"));
        s.transactions = vec![
            Transaction::new("05/09/2024", "SWIGGY BANGALORE ORDER", "₹450.00"),
            Transaction::new("12/09/2024", "AMAZON PAY INDIA PVT", "₹2499.00"),
        ];

        let analytics = generate_analytics(&s);
        let spending = analytics.spending.unwrap();

        assert_eq!(spending.total_transactions, 2);
        assert_eq!(spending.average_transaction, "₹6172.50");
        assert_eq!(
            spending.highest_transaction.unwrap().description,
            "AMAZON PAY INDIA PVT"
        );
        assert_eq!(spending.category_breakdown.len(), 2);

        let kinds: Vec<InsightKind> = analytics.insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![InsightKind::Success, InsightKind::Info, InsightKind::Reminder]
        );
        assert_eq!(
            analytics.insights[0].message,
            "Great! Your credit utilization is 8.2%, which is excellent for your credit score."
        );
        assert_eq!(
            analytics.insights[1].message,
            "Shopping accounts for 84.7% (₹2499.00) of your spending."
        );
    }

    #[test]
    fn test_high_utilization_warning() {
        let mut s = statement("₹90000", None, Some("₹100000"));
        s.transactions = vec![Transaction::new("01/09/2024", "FLIPKART", "₹90000")];

        let analytics = generate_analytics(&s);
        assert_eq!(analytics.insights[0].kind, InsightKind::Warning);
        assert_eq!(analytics.insights[0].title, "High Credit Utilization");
    }

    #[test]
    fn test_moderate_utilization_has_no_note() {
        let mut s = statement("₹50000", None, Some("₹100000"));
        s.transactions = vec![Transaction::new("01/09/2024", "FLIPKART", "₹50000")];

        let analytics = generate_analytics(&s);
        assert_eq!(analytics.insights.len(), 2);
        assert_eq!(analytics.insights[0].kind, InsightKind::Info);
    }

    #[test]
    fn test_amounts_near_decimal_max() {
        let mut s = statement("₹79228162514264337593543950335", None, Some("₹1"));
        s.transactions = vec![
            Transaction::new("01/09/2024", "AMAZON", "₹50000000000000000000000000000"),
            Transaction::new("02/09/2024", "FLIPKART", "₹50000000000000000000000000000"),
        ];

        let analytics = generate_analytics(&s);

        assert_eq!(analytics.summary.credit_utilization, "N/A");
        assert_eq!(
            analytics.summary.total_due,
            "₹79,22,81,62,51,42,64,33,75,93,54,39,50,335"
        );
        let spending = analytics.spending.unwrap();
        assert_eq!(spending.category_breakdown.len(), 1);
        assert_eq!(spending.category_breakdown[0].percentage.to_string(), "100.0");

        let kinds: Vec<InsightKind> = analytics.insights.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![InsightKind::Info, InsightKind::Reminder]);
    }

    #[test]
    fn test_insight_kind_matches_serde() {
        for kind in [
            InsightKind::Warning,
            InsightKind::Success,
            InsightKind::Info,
            InsightKind::Reminder,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.to_string());
        }
    }

    #[test]
    fn test_utilization_bounds() {
        assert_eq!(utilization(Decimal::from(500), Decimal::ZERO), None);
        assert_eq!(utilization(Decimal::MAX, Decimal::ONE), None);
        assert_eq!(
            utilization(Decimal::from(90000), Decimal::from(100000)),
            Some(Decimal::new(900, 1))
        );
    }

    #[test]
    fn test_highest_transaction_tie_keeps_first() {
        let transactions = vec![
            Transaction::new("01", "FIRST STORE", "₹100"),
            Transaction::new("02", "SECOND STORE", "₹100"),
        ];
        assert_eq!(
            highest_transaction(&transactions).unwrap().description,
            "FIRST STORE"
        );
    }
}
