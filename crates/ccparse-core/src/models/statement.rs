//! Parsed statement data models.

use serde::{Deserialize, Serialize};

/// Maximum number of transactions kept per statement.
pub const MAX_TRANSACTIONS: usize = 15;

/// Maximum length of a cardholder name or transaction description.
pub const MAX_TEXT_LEN: usize = 50;

/// A normalized credit card statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStatement {
    /// Cardholder name as printed on the statement.
    pub cardholder_name: Option<String>,

    /// Last four digits of the card number.
    pub card_last_four: Option<String>,

    /// Billing period, two dates joined by " - ".
    pub statement_period: Option<String>,

    /// Total amount due (symbol + digits, no grouping separators).
    pub total_amount_due: Option<String>,

    /// Payment due date.
    pub payment_due_date: Option<String>,

    /// Previous balance.
    pub previous_balance: Option<String>,

    /// Credit limit.
    pub credit_limit: Option<String>,

    /// Reward points balance.
    pub reward_points: Option<String>,

    /// Transactions in document order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    /// Self-reported reliability score (0.0 - 1.0).
    pub confidence: f64,

    /// Extraction path that produced this record.
    pub method: ExtractionMethod,

    /// Cause of a degraded AI record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedStatement {
    /// A record with every field null.
    pub fn empty(confidence: f64, method: ExtractionMethod) -> Self {
        Self {
            cardholder_name: None,
            card_last_four: None,
            statement_period: None,
            total_amount_due: None,
            payment_due_date: None,
            previous_balance: None,
            credit_limit: None,
            reward_points: None,
            transactions: Vec::new(),
            confidence,
            method,
            error: None,
        }
    }

    /// The five fields that drive completeness, in a fixed order.
    pub fn required_fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("cardholderName", self.cardholder_name.as_deref()),
            ("cardLastFour", self.card_last_four.as_deref()),
            ("statementPeriod", self.statement_period.as_deref()),
            ("totalAmountDue", self.total_amount_due.as_deref()),
            ("paymentDueDate", self.payment_due_date.as_deref()),
        ]
    }
}

/// A single statement transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date as printed.
    pub date: String,

    /// Merchant/description text (at most 50 characters).
    pub description: String,

    /// Amount as a currency string.
    pub amount: String,

    /// Spending category, assigned after extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            category: None,
        }
    }
}

/// Which extraction path produced a statement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    #[serde(rename = "Rule-Based")]
    RuleBased,
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "AI-Enhanced")]
    AiEnhanced,
    #[serde(rename = "AI-Only")]
    AiOnly,
    #[serde(rename = "AI-Skipped")]
    AiSkipped,
    #[serde(rename = "AI-Failed")]
    AiFailed,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RuleBased => "Rule-Based",
            Self::Ai => "AI",
            Self::AiEnhanced => "AI-Enhanced",
            Self::AiOnly => "AI-Only",
            Self::AiSkipped => "AI-Skipped",
            Self::AiFailed => "AI-Failed",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spending category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Shopping,
    Groceries,
    Fuel,
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    Travel,
    Healthcare,
    Education,
    Insurance,
    Others,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Shopping => "Shopping",
            Self::Groceries => "Groceries",
            Self::Fuel => "Fuel",
            Self::Entertainment => "Entertainment",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Travel => "Travel",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Insurance => "Insurance",
            Self::Others => "Others",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
