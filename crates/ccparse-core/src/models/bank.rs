//! Card issuer identifiers.

use serde::{Deserialize, Serialize};

/// A statement issuer recognised by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bank {
    Hdfc,
    Icici,
    Sbi,
    Axis,
    Amex,
    Unknown,
}

impl Bank {
    /// Supported issuers, in detection priority order.
    pub const SUPPORTED: [Bank; 5] = [Bank::Hdfc, Bank::Icici, Bank::Sbi, Bank::Axis, Bank::Amex];

    /// Identifier used in responses ("HDFC", ..., "UNKNOWN").
    pub fn id(&self) -> &'static str {
        match self {
            Self::Hdfc => "HDFC",
            Self::Icici => "ICICI",
            Self::Sbi => "SBI",
            Self::Axis => "AXIS",
            Self::Amex => "AMEX",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable issuer name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hdfc => "HDFC Bank",
            Self::Icici => "ICICI Bank",
            Self::Sbi => "SBI Card",
            Self::Axis => "Axis Bank",
            Self::Amex => "American Express",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_ids_match_serde() {
        for bank in Bank::SUPPORTED.iter().chain(std::iter::once(&Bank::Unknown)) {
            let json = serde_json::to_value(bank).unwrap();
            assert_eq!(json, bank.id());
        }
    }
}
