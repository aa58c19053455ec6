use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{indicator, weighted};

/// Centralized control over the contract
#[derive(Debug, Clone, PartialEq)]
pub struct GovernanceRisk {
    is_proxy: bool,
    access_control: bool,
    upgradeable: bool,
    score: Decimal,
}

impl GovernanceRisk {
    pub fn new(is_proxy: bool, access_control: bool, upgradeable: bool) -> Self {
        let score = weighted(&[
            (dec!(0.5), indicator(access_control)),
            (dec!(0.4), indicator(is_proxy)),
            (dec!(0.3), indicator(upgradeable)),
        ]);
        Self {
            is_proxy,
            access_control,
            upgradeable,
            score,
        }
    }
}

impl RiskFactor for GovernanceRisk {
    fn name(&self) -> &'static str {
        "governance"
    }

    fn score(&self) -> Decimal {
        self.score
    }

    fn explain(&self) -> String {
        let mut reasons = Vec::new();
        if self.access_control {
            reasons.push("Contract ownership is controlled (centralized access).");
        }
        if self.is_proxy {
            reasons.push("Contract uses a proxy pattern (upgradeable).");
        }
        if self.upgradeable {
            reasons.push("Contract is upgradeable.");
        }
        if reasons.is_empty() {
            reasons.push("No major governance centralization risks found.");
        }
        reasons.join(" ")
    }
}
