//! Rule-based / AI-fallback orchestration.

use std::path::Path;

use tracing::{debug, info, warn};

use super::ExtractorRegistry;
use crate::ai::{AI_CONFIDENCE, AiFallback};
use crate::error::AiError;
use crate::models::statement::{ExtractionMethod, MAX_TRANSACTIONS, ParsedStatement};
use crate::models::{Bank, ParserConfig};

/// Chooses between the bank's extractor and the AI fallback and scores the
/// result.
#[derive(Debug)]
pub struct StatementParser {
    registry: ExtractorRegistry,
    ai: AiFallback,
    /// Completeness strictly below this triggers the fallback.
    completeness_threshold: f64,
    /// Extractor confidence strictly below this triggers the fallback.
    min_confidence: f64,
}

impl StatementParser {
    /// Create a parser with the built-in extractors and default thresholds.
    pub fn new(ai: AiFallback) -> Self {
        Self {
            registry: ExtractorRegistry::default(),
            ai,
            completeness_threshold: 0.6,
            min_confidence: 0.7,
        }
    }

    pub fn from_config(config: &ParserConfig) -> Result<Self, AiError> {
        Ok(Self::new(AiFallback::from_config(&config.ai)?)
            .with_completeness_threshold(config.extraction.completeness_threshold)
            .with_min_confidence(config.extraction.min_confidence))
    }

    /// Replace the extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the completeness threshold.
    pub fn with_completeness_threshold(mut self, threshold: f64) -> Self {
        self.completeness_threshold = threshold;
        self
    }

    /// Set the minimum extractor confidence.
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence;
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Whether a rule-based result must be complemented by the AI fallback.
    pub fn needs_fallback(&self, use_ai: bool, completeness: f64, confidence: f64) -> bool {
        use_ai || completeness < self.completeness_threshold || confidence < self.min_confidence
    }

    /// Parse statement `text` detected as `bank`.
    ///
    /// `source` is the original document, handed to the AI fallback when
    /// the rules are not enough.
    pub async fn parse(&self, text: &str, bank: Bank, source: &Path) -> ParsedStatement {
        let extractor = if bank.is_known() {
            self.registry.get(bank)
        } else {
            None
        };

        let (rule_based, use_ai) = match extractor {
            Some(extractor) => match extractor.extract(text) {
                Ok(statement) => (statement, false),
                Err(e) => {
                    warn!("{} extractor failed, falling back to AI only: {}", bank, e);
                    let mut statement = self.ai.extract(source).await;
                    statement.method = ExtractionMethod::AiOnly;
                    return statement;
                }
            },
            None => {
                info!("No extractor for {}, using AI fallback", bank);
                (ParsedStatement::empty(0.0, ExtractionMethod::RuleBased), true)
            }
        };

        let completeness = completeness(&rule_based);
        debug!(
            "Rule-based extraction: completeness {:.2}, confidence {:.2}",
            completeness, rule_based.confidence
        );

        if self.needs_fallback(use_ai, completeness, rule_based.confidence) {
            info!("Low confidence extraction, enhancing with AI");
            let ai = self.ai.extract(source).await;
            merge(rule_based, ai)
        } else {
            let mut statement = rule_based;
            statement.confidence = statement.confidence.max(completeness);
            statement.method = ExtractionMethod::RuleBased;
            statement
        }
    }
}

/// Share of the five required fields that are present.
pub fn completeness(statement: &ParsedStatement) -> f64 {
    let fields = statement.required_fields();
    let present = fields.iter().filter(|(_, value)| value.is_some()).count();
    present as f64 / fields.len() as f64
}

/// Merge a rule-based record with an AI record.
///
/// Rule values win when present and non-blank; the AI list is used only
/// when the rules found no transactions. Not commutative.
pub fn merge(rule_based: ParsedStatement, ai: ParsedStatement) -> ParsedStatement {
    let mut transactions = if rule_based.transactions.is_empty() {
        ai.transactions
    } else {
        rule_based.transactions
    };
    transactions.truncate(MAX_TRANSACTIONS);

    ParsedStatement {
        cardholder_name: pick(rule_based.cardholder_name, ai.cardholder_name),
        card_last_four: pick(rule_based.card_last_four, ai.card_last_four),
        statement_period: pick(rule_based.statement_period, ai.statement_period),
        total_amount_due: pick(rule_based.total_amount_due, ai.total_amount_due),
        payment_due_date: pick(rule_based.payment_due_date, ai.payment_due_date),
        previous_balance: pick(rule_based.previous_balance, ai.previous_balance),
        credit_limit: pick(rule_based.credit_limit, ai.credit_limit),
        reward_points: pick(rule_based.reward_points, ai.reward_points),
        transactions,
        confidence: AI_CONFIDENCE,
        method: ExtractionMethod::AiEnhanced,
        error: ai.error,
    }
}

fn pick(rule_based: Option<String>, ai: Option<String>) -> Option<String> {
    rule_based.filter(|value| !value.trim().is_empty()).or(ai)
}
