use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{clamp_percent, indicator, weighted};

/// Exit risk from unlocked or creator-held liquidity
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidityRisk {
    unlocked: bool,
    locked_percent: Decimal,
    creator_percent: Decimal,
    score: Decimal,
}

impl LiquidityRisk {
    pub fn new(unlocked: bool, locked_percent: Decimal, creator_percent: Decimal) -> Self {
        let score = weighted(&[
            (dec!(0.5), indicator(unlocked)),
            (dec!(0.3), clamp_percent(dec!(100) - locked_percent)),
            (dec!(0.2), clamp_percent(creator_percent)),
        ]);
        Self {
            unlocked,
            locked_percent,
            creator_percent,
            score,
        }
    }
}

impl RiskFactor for LiquidityRisk {
    fn name(&self) -> &'static str {
        "liquidity"
    }

    fn score(&self) -> Decimal {
        self.score
    }

    fn explain(&self) -> String {
        let mut reasons = Vec::new();
        if self.unlocked {
            reasons.push("Liquidity is unlocked, posing exit risk.".to_string());
        }
        reasons.push(format!("{:.1}% of liquidity is locked.", self.locked_percent));
        reasons.push(format!(
            "Creator controls {:.1}% of liquidity pool.",
            self.creator_percent
        ));
        reasons.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_locked_is_thirty() {
        // Only the locked factor contributes: 0.3 * 100 / 1.0
        assert_eq!(LiquidityRisk::new(false, Decimal::ZERO, Decimal::ZERO).score(), dec!(30));
    }

    #[test]
    fn test_fully_exposed() {
        let risk = LiquidityRisk::new(true, Decimal::ZERO, dec!(100));
        assert_eq!(risk.score(), dec!(100));
    }

    #[test]
    fn test_locked_over_hundred_clamps() {
        let risk = LiquidityRisk::new(false, dec!(120), dec!(10));
        assert_eq!(risk.score(), dec!(2));
    }

    #[test]
    fn test_explain() {
        let risk = LiquidityRisk::new(true, dec!(80), dec!(2.5));
        assert_eq!(
            risk.explain(),
            "Liquidity is unlocked, posing exit risk. 80.0% of liquidity is locked. Creator controls 2.5% of liquidity pool."
        );
    }
}
