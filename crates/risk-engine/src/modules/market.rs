use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{clamp_percent, weighted};

/// Price volatility and market standing
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRisk {
    volatility: Decimal,
    ath_change: Decimal,
    atl_change: Decimal,
    market_cap_rank: u64,
    score: Decimal,
}

impl MarketRisk {
    pub fn new(volatility: Decimal, ath_change: Decimal, atl_change: Decimal, market_cap_rank: u64) -> Self {
        // rank 1 scores 0, rank 1000 and beyond saturate at 100
        let rank_score = (Decimal::from(market_cap_rank) - Decimal::ONE)
            .checked_div(dec!(999))
            .map(|r| clamp_percent(r * dec!(100)))
            .unwrap_or(Decimal::ZERO);

        let score = weighted(&[
            (dec!(0.4), clamp_percent(volatility.abs())),
            (dec!(0.2), clamp_percent(ath_change.abs())),
            (dec!(0.2), clamp_percent(atl_change.abs())),
            (dec!(0.2), rank_score),
        ]);
        Self {
            volatility,
            ath_change,
            atl_change,
            market_cap_rank,
            score,
        }
    }
}

impl RiskFactor for MarketRisk {
    fn name(&self) -> &'static str {
        "market"
    }

    fn score(&self) -> Decimal {
        self.score
    }

    fn explain(&self) -> String {
        format!(
            "7d volatility: {:.1}%. ATH change: {:.1}%. ATL change: {:.1}%. Market cap rank: {}.",
            self.volatility, self.ath_change, self.atl_change, self.market_cap_rank
        )
    }
}
