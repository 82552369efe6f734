//! AI fallback extraction.
//!
//! The adapter never fails: a missing credential, an unreadable file or a
//! bad service reply all degrade into a null-field record with a low
//! confidence so the orchestrator can still merge.

mod openai;

pub use openai::OpenAiService;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::AiError;
use crate::models::config::AiConfig;
use crate::models::statement::{ExtractionMethod, MAX_TRANSACTIONS, ParsedStatement, Transaction};
use crate::statement::rules::{amounts, clean_text, last_four};

/// Confidence assigned to a successful AI extraction.
pub const AI_CONFIDENCE: f64 = 0.95;

/// Confidence of a record produced without calling the service.
pub const SKIPPED_CONFIDENCE: f64 = 0.5;

/// Confidence of a record from a failed service call.
pub const FAILED_CONFIDENCE: f64 = 0.3;

/// Instructions sent along with the statement PDF.
pub const EXTRACTION_PROMPT: &str = r#"You are an expert at extracting data from credit card statements. Extract the following information from this PDF:

REQUIRED FIELDS:
1. cardholderName - Full name of the cardholder
2. cardLastFour - Last 4 digits of card number
3. statementPeriod - Date range (format: DD MMM YYYY - DD MMM YYYY)
4. totalAmountDue - Total amount to be paid
5. paymentDueDate - Due date for payment
OPTIONAL FIELDS:
6. previousBalance - Previous outstanding balance
7. creditLimit - Total credit limit
8. rewardPoints - Reward/cashback points
9. transactions - Array of up to 10 transactions with: date, description, amount
Return ONLY valid JSON with this exact structure:
{
  "cardholderName": "JOHN DOE",
  "cardLastFour": "1234",
  "statementPeriod": "01 Sep 2024 - 30 Sep 2024",
  "totalAmountDue": "₹45678.90",
  "paymentDueDate": "20 Oct 2024",
  "previousBalance": "₹32000",
  "creditLimit": "₹200000",
  "rewardPoints": "3456",
  "transactions": [
    {"date": "05 Sep", "description": "Amazon.in", "amount": "₹2499"}
  ]
}
IMPORTANT:
- Always include ₹ symbol for amounts
- If a field is not found, use null
- Be precise and accurate"#;

/// External service that reads a statement document and returns its fields.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, document: &[u8], filename: &str) -> Result<StatementFields, AiError>;
}

/// Field set as returned by the service, before normalization.
///
/// Numbers are accepted wherever a string is expected; anything else that
/// is not a string reads as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatementFields {
    #[serde(deserialize_with = "lenient_string")]
    pub cardholder_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub card_last_four: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub statement_period: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub total_amount_due: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub payment_due_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub previous_balance: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub credit_limit: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reward_points: Option<String>,
    pub transactions: Option<Vec<TransactionFields>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransactionFields {
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub amount: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl StatementFields {
    /// Normalize into a statement record carrying the given score.
    pub fn into_statement(self, confidence: f64, method: ExtractionMethod) -> ParsedStatement {
        let amount = |value: Option<String>| value.and_then(|v| amounts::normalize_currency(&v));

        let transactions = self
            .transactions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|txn| {
                let date = non_blank(txn.date)?;
                let description = txn.description.and_then(|d| clean_text(&d))?;
                let amount = txn.amount.and_then(|a| amounts::normalize_currency(&a))?;
                Some(Transaction::new(date, description, amount))
            })
            .take(MAX_TRANSACTIONS)
            .collect();

        let reward_points = self
            .reward_points
            .map(|p| p.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
            .filter(|p| !p.is_empty());

        ParsedStatement {
            cardholder_name: self.cardholder_name.and_then(|n| clean_text(&n)),
            card_last_four: self.card_last_four.and_then(|c| last_four(&c)),
            statement_period: non_blank(self.statement_period),
            total_amount_due: amount(self.total_amount_due),
            payment_due_date: non_blank(self.payment_due_date),
            previous_balance: amount(self.previous_balance),
            credit_limit: amount(self.credit_limit),
            reward_points,
            transactions,
            confidence,
            method,
            error: None,
        }
    }
}

/// Adapter from the extraction service to statement records.
#[derive(Clone, Default)]
pub struct AiFallback {
    service: Option<Arc<dyn ExtractionService>>,
}

impl AiFallback {
    pub fn new(service: Arc<dyn ExtractionService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// An adapter that never calls out and always reports `AI-Skipped`.
    pub fn disabled() -> Self {
        Self { service: None }
    }

    /// Build from configuration; without a credential the adapter is
    /// disabled.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        match config.resolve_api_key() {
            Some(api_key) => Ok(Self::new(Arc::new(OpenAiService::new(config, api_key)?))),
            None => {
                info!(
                    "No API key in config or ${}, AI fallback disabled",
                    config.api_key_env
                );
                Ok(Self::disabled())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    /// Extract a statement record from the document at `path`.
    pub async fn extract(&self, path: &Path) -> ParsedStatement {
        let Some(service) = &self.service else {
            warn!("AI fallback requested but no service is configured");
            return ParsedStatement::empty(SKIPPED_CONFIDENCE, ExtractionMethod::AiSkipped);
        };

        match Self::call(service.as_ref(), path).await {
            Ok(fields) => {
                info!("AI extraction succeeded for {}", path.display());
                fields.into_statement(AI_CONFIDENCE, ExtractionMethod::Ai)
            }
            Err(e) => {
                error!("AI extraction failed for {}: {}", path.display(), e);
                let mut statement =
                    ParsedStatement::empty(FAILED_CONFIDENCE, ExtractionMethod::AiFailed);
                statement.error = Some(e.to_string());
                statement
            }
        }
    }

    async fn call(
        service: &dyn ExtractionService,
        path: &Path,
    ) -> Result<StatementFields, AiError> {
        let document = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "statement.pdf".to_string());

        service.extract(&document, &filename).await
    }
}

impl std::fmt::Debug for AiFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiFallback")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedService(StatementFields);

    #[async_trait]
    impl ExtractionService for FixedService {
        async fn extract(
            &self,
            document: &[u8],
            filename: &str,
        ) -> Result<StatementFields, AiError> {
            assert!(!document.is_empty());
            assert_eq!(filename, "statement.pdf");
            Ok(self.0.clone())
        }
    }

    struct FailingService;

    #[async_trait]
    impl ExtractionService for FailingService {
        async fn extract(
            &self,
            _document: &[u8],
            _filename: &str,
        ) -> Result<StatementFields, AiError> {
            Err(AiError::Provider {
                message: "rate limited".to_string(),
            })
        }
    }

    fn staged_pdf() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.pdf");
        std::fs::write(&path, b"%PDF-1.4 test").unwrap();
        (dir, path)
    }

    #[test]
    fn test_lenient_fields() {
        let fields: StatementFields = serde_json::from_str(
            r#"{
                "cardholderName": "JOHN DOE",
                "cardLastFour": 4321,
                "totalAmountDue": 45678.9,
                "creditLimit": true,
                "transactions": null
            }"#,
        )
        .unwrap();

        assert_eq!(fields.cardholder_name.as_deref(), Some("JOHN DOE"));
        assert_eq!(fields.card_last_four.as_deref(), Some("4321"));
        assert_eq!(fields.total_amount_due.as_deref(), Some("45678.9"));
        assert_eq!(fields.credit_limit, None);
        assert_eq!(fields.statement_period, None);
        assert_eq!(fields.transactions, None);
    }

    #[test]
    fn test_into_statement_normalizes() {
        let fields = StatementFields {
            cardholder_name: Some("  JOHN DOE ".to_string()),
            card_last_four: Some("XXXX-XXXX-XXXX-9876".to_string()),
            total_amount_due: Some("Rs. 45,678.90".to_string()),
            previous_balance: Some("₹32,000".to_string()),
            credit_limit: Some("n/a".to_string()),
            reward_points: Some("3,456".to_string()),
            transactions: Some(vec![
                TransactionFields {
                    date: Some("05 Sep".to_string()),
                    description: Some("Amazon.in".to_string()),
                    amount: Some("2,499".to_string()),
                },
                TransactionFields {
                    date: Some("06 Sep".to_string()),
                    description: None,
                    amount: Some("₹10".to_string()),
                },
            ]),
            ..StatementFields::default()
        };

        let statement = fields.into_statement(AI_CONFIDENCE, ExtractionMethod::Ai);

        assert_eq!(statement.cardholder_name.as_deref(), Some("JOHN DOE"));
        assert_eq!(statement.card_last_four.as_deref(), Some("9876"));
        assert_eq!(statement.total_amount_due.as_deref(), Some("₹45678.90"));
        assert_eq!(statement.previous_balance.as_deref(), Some("₹32000"));
        assert_eq!(statement.credit_limit, None);
        assert_eq!(statement.reward_points.as_deref(), Some("3456"));
        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].amount, "₹2499");
        assert_eq!(statement.method, ExtractionMethod::Ai);
    }

    #[test]
    fn test_into_statement_caps_transactions() {
        let txn = TransactionFields {
            date: Some("01 Sep".to_string()),
            description: Some("Coffee".to_string()),
            amount: Some("₹120".to_string()),
        };
        let fields = StatementFields {
            transactions: Some(vec![txn; 40]),
            ..StatementFields::default()
        };

        let statement = fields.into_statement(AI_CONFIDENCE, ExtractionMethod::Ai);
        assert_eq!(statement.transactions.len(), MAX_TRANSACTIONS);
    }

    #[tokio::test]
    async fn test_disabled_is_skipped() {
        let (_dir, path) = staged_pdf();
        let statement = AiFallback::disabled().extract(&path).await;

        assert_eq!(statement.method, ExtractionMethod::AiSkipped);
        assert_eq!(statement.confidence, SKIPPED_CONFIDENCE);
        assert_eq!(statement.total_amount_due, None);
    }

    #[tokio::test]
    async fn test_success_is_ai() {
        let (_dir, path) = staged_pdf();
        let fallback = AiFallback::new(Arc::new(FixedService(StatementFields {
            total_amount_due: Some("₹500".to_string()),
            ..StatementFields::default()
        })));

        let statement = fallback.extract(&path).await;
        assert_eq!(statement.method, ExtractionMethod::Ai);
        assert_eq!(statement.confidence, AI_CONFIDENCE);
        assert_eq!(statement.total_amount_due.as_deref(), Some("₹500"));
        assert_eq!(statement.error, None);
    }

    #[tokio::test]
    async fn test_service_failure_degrades() {
        let (_dir, path) = staged_pdf();
        let statement = AiFallback::new(Arc::new(FailingService)).extract(&path).await;

        assert_eq!(statement.method, ExtractionMethod::AiFailed);
        assert_eq!(statement.confidence, FAILED_CONFIDENCE);
        assert_eq!(statement.error.as_deref(), Some("AI provider error: rate limited"));
    }

    #[tokio::test]
    async fn test_unreadable_file_degrades() {
        let fallback = AiFallback::new(Arc::new(FailingService));
        let statement = fallback.extract(Path::new("/nonexistent/statement.pdf")).await;

        assert_eq!(statement.method, ExtractionMethod::AiFailed);
        assert!(statement.error.unwrap().starts_with("failed to read document"));
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let config = AiConfig {
            api_key: None,
            api_key_env: "CCPARSE_TEST_MISSING_KEY".to_string(),
            ..AiConfig::default()
        };
        assert!(!AiFallback::from_config(&config).unwrap().is_enabled());
    }
}
