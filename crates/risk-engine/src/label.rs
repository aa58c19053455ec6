use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Banded interpretation of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
    /// Score outside [0, 100]
    Unknown,
}

impl RiskLabel {
    /// [0, 23] Low, (23, 50] Medium, (50, 100] High
    pub fn from_score(score: Decimal) -> Self {
        if score >= Decimal::ZERO && score <= dec!(23) {
            RiskLabel::Low
        } else if score > dec!(23) && score <= dec!(50) {
            RiskLabel::Medium
        } else if score > dec!(50) && score <= dec!(100) {
            RiskLabel::High
        } else {
            RiskLabel::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low Risk",
            RiskLabel::Medium => "Medium Risk",
            RiskLabel::High => "High Risk",
            RiskLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RiskLabel::from_score(dec!(0)), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(dec!(23.0)), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(dec!(23.01)), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(dec!(50.0)), RiskLabel::Medium);
        assert_eq!(RiskLabel::from_score(dec!(50.01)), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(dec!(100)), RiskLabel::High);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(RiskLabel::from_score(dec!(-0.01)), RiskLabel::Unknown);
        assert_eq!(RiskLabel::from_score(dec!(100.01)), RiskLabel::Unknown);
        assert_eq!(RiskLabel::Unknown.to_string(), "Unknown");
    }
}
