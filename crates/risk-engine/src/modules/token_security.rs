use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{clamp_percent, indicator, weighted};

/// Token contract controls that can trap holders
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSecurityRisk {
    buy_tax: Decimal,
    transfer_pausable: bool,
    is_blacklisted: bool,
    is_trusted: bool,
    score: Decimal,
}

impl TokenSecurityRisk {
    pub fn new(buy_tax: Decimal, transfer_pausable: bool, is_blacklisted: bool, is_trusted: bool) -> Self {
        let score = weighted(&[
            (dec!(0.4), clamp_percent(buy_tax)),
            (dec!(0.2), indicator(transfer_pausable)),
            (dec!(0.3), indicator(is_blacklisted)),
            // untrusted tokens carry the full factor
            (dec!(0.1), indicator(!is_trusted)),
        ]);
        Self {
            buy_tax,
            transfer_pausable,
            is_blacklisted,
            is_trusted,
            score,
        }
    }
}

impl RiskFactor for TokenSecurityRisk {
    fn name(&self) -> &'static str {
        "token_security"
    }

    fn score(&self) -> Decimal {
        self.score
    }

    fn explain(&self) -> String {
        let mut reasons = vec![format!("Buy tax: {:.1}%.", self.buy_tax)];
        if self.transfer_pausable {
            reasons.push("Token transfers can be paused.".to_string());
        }
        if self.is_blacklisted {
            reasons.push("Token has blacklisting enabled.".to_string());
        }
        if self.is_trusted {
            reasons.push("Token is flagged as trusted.".to_string());
        }
        reasons.join(" ")
    }
}
