use serde::{Deserialize, Serialize};
use std::fmt;

/// Swap direction relative to the base token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    /// Parse the provider's `transactionType` string (case-insensitive)
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buy" => Some(TransactionType::Buy),
            "sell" => Some(TransactionType::Sell),
            _ => None,
        }
    }

    /// Returns the opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            TransactionType::Buy => TransactionType::Sell,
            TransactionType::Sell => TransactionType::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        assert_eq!(TransactionType::from_raw("buy"), Some(TransactionType::Buy));
        assert_eq!(TransactionType::from_raw(" SELL "), Some(TransactionType::Sell));
        assert_eq!(TransactionType::from_raw("addLiquidity"), None);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(TransactionType::Buy.opposite(), TransactionType::Sell);
        assert_eq!(TransactionType::Sell.opposite(), TransactionType::Buy);
    }
}
