//! Statement field extraction: bank detection, per-bank rules and the
//! rule/AI orchestrator.

pub mod detector;
mod parser;
pub mod rules;

pub use detector::BankDetector;
pub use parser::{StatementParser, completeness, merge};

use std::collections::HashMap;

use crate::error::ExtractionError;
use crate::models::{Bank, ParsedStatement};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for bank-specific statement field extractors.
pub trait StatementExtractor: Send + Sync {
    /// The issuer this extractor understands.
    fn bank(&self) -> Bank;

    /// Extract statement fields from plain text.
    ///
    /// Missing fields are `None`; `Err` is reserved for extractor faults.
    fn extract(&self, text: &str) -> Result<ParsedStatement>;
}

/// Extractors keyed by issuer.
pub struct ExtractorRegistry {
    extractors: HashMap<Bank, Box<dyn StatementExtractor>>,
}

impl ExtractorRegistry {
    /// A registry with no extractors.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Add an extractor, replacing any previous one for the same bank.
    pub fn register(&mut self, extractor: Box<dyn StatementExtractor>) {
        self.extractors.insert(extractor.bank(), extractor);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, extractor: Box<dyn StatementExtractor>) -> Self {
        self.register(extractor);
        self
    }

    pub fn get(&self, bank: Bank) -> Option<&dyn StatementExtractor> {
        self.extractors.get(&bank).map(|e| e.as_ref())
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::empty()
            .with(Box::new(rules::HdfcExtractor))
            .with(Box::new(rules::IciciExtractor))
            .with(Box::new(rules::SbiExtractor))
            .with(Box::new(rules::AxisExtractor))
            .with(Box::new(rules::AmexExtractor))
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut banks: Vec<&str> = self.extractors.keys().map(|b| b.id()).collect();
        banks.sort_unstable();
        f.debug_struct("ExtractorRegistry").field("banks", &banks).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_supported_banks() {
        let registry = ExtractorRegistry::default();

        assert_eq!(registry.len(), Bank::SUPPORTED.len());
        for bank in Bank::SUPPORTED {
            assert_eq!(registry.get(bank).map(|e| e.bank()), Some(bank));
        }
        assert!(registry.get(Bank::Unknown).is_none());
    }

    #[test]
    fn test_extractors_are_null_safe() {
        let registry = ExtractorRegistry::default();
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

        for bank in Bank::SUPPORTED {
            let statement = registry.get(bank).unwrap().extract(text).unwrap();
            for (field, value) in statement.required_fields() {
                assert_eq!(value, None, "{} leaked {}", bank, field);
            }
            assert_eq!(statement.previous_balance, None);
            assert_eq!(statement.credit_limit, None);
            assert_eq!(statement.reward_points, None);
            assert!(statement.transactions.is_empty(), "{} found transactions", bank);
        }
    }

    struct Replacement;

    impl StatementExtractor for Replacement {
        fn bank(&self) -> Bank {
            Bank::Hdfc
        }

        fn extract(&self, _text: &str) -> Result<ParsedStatement> {
            Err(ExtractionError::Internal {
                bank: "HDFC".to_string(),
                reason: "replaced".to_string(),
            })
        }
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = ExtractorRegistry::default();
        registry.register(Box::new(Replacement));

        assert_eq!(registry.len(), 5);
        assert!(registry.get(Bank::Hdfc).unwrap().extract("HDFC").is_err());
    }
}
