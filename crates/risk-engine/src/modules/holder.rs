use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;

use super::clamp_percent;

/// Supply concentration in the top ten holders
#[derive(Debug, Clone, PartialEq)]
pub struct HolderRisk {
    top10_percent: Decimal,
    score: Decimal,
}

impl HolderRisk {
    pub fn new(top10_percent: Decimal) -> Self {
        Self {
            top10_percent,
            score: clamp_percent(top10_percent).round_dp(2),
        }
    }
}

impl RiskFactor for HolderRisk {
    fn name(&self) -> &'static str {
        "holder"
    }

    fn score(&self) -> Decimal {
        self.score
    }

    fn explain(&self) -> String {
        format!("Top 10 wallets hold {:.1}% of total supply.", self.top10_percent)
    }
}
