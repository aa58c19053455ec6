use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{indicator, weighted};

/// Known-bad associations of the address
#[derive(Debug, Clone, PartialEq)]
pub struct FraudRisk {
    hacker: bool,
    drainer: bool,
    mixers: bool,
    tornado: bool,
    score: Decimal,
}

impl FraudRisk {
    pub fn new(hacker: bool, drainer: bool, mixers: bool, tornado: bool) -> Self {
        let score = weighted(&[
            (dec!(1), indicator(hacker)),
            (dec!(1), indicator(drainer)),
            (dec!(1), indicator(mixers)),
            (dec!(1), indicator(tornado)),
        ]);
        Self {
            hacker,
            drainer,
            mixers,
            tornado,
            score,
        }
    }
}

impl RiskFactor for FraudRisk {
    fn name(&self) -> &'static str {
        "fraud"
    }

    fn score(&self) -> Decimal {
        self.score
    }

    fn explain(&self) -> String {
        let mut reasons = Vec::new();
        if self.hacker {
            reasons.push("Address is flagged as hacker.");
        }
        if self.drainer {
            reasons.push("Linked to drainer activity.");
        }
        if self.mixers {
            reasons.push("Mixer activity detected.");
        }
        if self.tornado {
            reasons.push("Involvement with Tornado Cash.");
        }
        if reasons.is_empty() {
            reasons.push("No fraud indicators found.");
        }
        reasons.join(" ")
    }
}
