use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a liquidity manipulation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Minor risk - unusual but not necessarily malicious
    Low,
    /// Moderate risk - suspicious activity requiring monitoring
    Medium,
    /// Critical risk - large scale manipulation potentially affecting pool stability
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Severity::Low => "Minor risk - Unusual but not necessarily malicious activity",
            Severity::Medium => "Moderate risk - Suspicious activity requiring monitoring",
            Severity::High => {
                "Critical risk - Large scale manipulation potentially affecting pool stability"
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk level attached to a dominant pool participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
