//! Issuer detection from raw statement text.

use regex::Regex;
use tracing::debug;

use crate::models::Bank;

/// Classifies statement text by issuer.
///
/// Patterns are tried in priority order and the first hit wins, so a
/// statement that mentions several issuers resolves the same way every time.
#[derive(Debug, Clone)]
pub struct BankDetector {
    patterns: Vec<(Bank, Regex)>,
}

impl BankDetector {
    pub fn new() -> Self {
        let patterns = [
            (Bank::Hdfc, r"(?i)HDFC\s*BANK|hdfc"),
            (Bank::Icici, r"(?i)ICICI\s*BANK|icici"),
            (Bank::Sbi, r"(?i)SBI\s*CARD|STATE\s*BANK\s*OF\s*INDIA"),
            (Bank::Axis, r"(?i)AXIS\s*BANK|axis"),
            (Bank::Amex, r"(?i)AMERICAN\s*EXPRESS|amex"),
        ]
        .into_iter()
        .map(|(bank, pattern)| (bank, Regex::new(pattern).unwrap()))
        .collect();

        Self { patterns }
    }

    /// Detect the issuer, or [`Bank::Unknown`] when nothing matches.
    pub fn detect(&self, text: &str) -> Bank {
        let bank = self
            .patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(bank, _)| *bank)
            .unwrap_or(Bank::Unknown);

        debug!("Detected bank: {}", bank);
        bank
    }
}

impl Default for BankDetector {
    fn default() -> Self {
        Self::new()
    }
}
