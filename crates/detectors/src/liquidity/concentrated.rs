use chainwatch_core::grouping::by_wallet;
use chainwatch_core::window::relative_variance;
use chainwatch_core::{BlockNumber, SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::descending;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    PriceManipulation,
    LiquiditySniping,
}

impl AttackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackKind::PriceManipulation => "Price Manipulation",
            AttackKind::LiquiditySniping => "Liquidity Sniping",
        }
    }
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for concentrated liquidity attack detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcentratedAttackConfig {
    /// Trade value that must be exceeded for a price-impact finding
    pub impact_min_value: Usd,
    /// Price impact in percent that must be exceeded
    pub impact_min_pct: Decimal,
    /// Buys a wallet needs for a sniping finding
    pub sniping_min_buys: usize,
    /// Max price standard deviation as a fraction of the mean buy price
    pub sniping_price_band: Decimal,
    /// Combined buy value that must be exceeded
    pub sniping_min_value: Usd,
}

impl Default for ConcentratedAttackConfig {
    fn default() -> Self {
        Self {
            impact_min_value: dec!(5000),
            impact_min_pct: dec!(5),
            sniping_min_buys: 3,
            sniping_price_band: dec!(0.1),
            sniping_min_value: dec!(3000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentratedAttack {
    pub attacker: String,
    pub kind: AttackKind,
    pub block: BlockNumber,
    pub timestamp: Timestamp,
    pub transactions: Vec<String>,
    /// Percent; zero for sniping
    pub price_impact: Decimal,
    /// Not estimated without an exit trade
    pub profit_estimate: Usd,
    /// In [0, 100]
    pub confidence: Decimal,
}

#[derive(Default)]
pub struct ConcentratedAttackDetector {
    config: ConcentratedAttackConfig,
}

impl ConcentratedAttackDetector {
    pub fn new(config: ConcentratedAttackConfig) -> Self {
        Self { config }
    }

    /// Large trades whose price differs sharply from the next trade
    ///
    /// Events are compared in the order given (provider order, newest first).
    pub fn price_impacts(&self, events: &[SwapEvent]) -> Vec<ConcentratedAttack> {
        events
            .windows(2)
            .filter_map(|pair| {
                let (current, next) = (&pair[0], &pair[1]);
                let change = (current.base_quote_price - next.base_quote_price)
                    .checked_div(next.base_quote_price)?
                    .abs()
                    .checked_mul(dec!(100))
                    .unwrap_or(Decimal::MAX);

                if current.total_value_usd <= self.config.impact_min_value || change <= self.config.impact_min_pct {
                    return None;
                }

                let confidence = change
                    .checked_mul(dec!(10))
                    .and_then(|c| c.checked_add(current.total_value_usd / dec!(1000)))
                    .map_or(dec!(100), |c| c.min(dec!(100)));
                Some(ConcentratedAttack {
                    attacker: current.wallet_address.clone(),
                    kind: AttackKind::PriceManipulation,
                    block: current.block_number,
                    timestamp: current.block_timestamp,
                    transactions: vec![current.transaction_hash.clone()],
                    price_impact: change,
                    profit_estimate: Decimal::ZERO,
                    confidence,
                })
            })
            .collect()
    }

    /// Wallets buying repeatedly inside a tight price band
    pub fn sniping(&self, events: &[SwapEvent]) -> Vec<ConcentratedAttack> {
        let mut found = Vec::new();

        for (wallet, trades) in by_wallet(events) {
            let buys: Vec<&SwapEvent> = trades.into_iter().filter(|e| e.is_buy()).collect();
            if buys.len() < self.config.sniping_min_buys {
                continue;
            }

            // std-dev below `band` of the mean, compared on the mean-scaled prices
            let prices: Vec<Decimal> = buys.iter().map(|e| e.base_quote_price).collect();
            let band = self.config.sniping_price_band;
            let limit = band.checked_mul(band).unwrap_or(Decimal::MAX);
            match relative_variance(&prices) {
                Some(spread) if spread < limit => {}
                _ => continue,
            }

            let total: Usd = buys.iter().map(|e| e.total_value_usd).sum();
            if total <= self.config.sniping_min_value {
                continue;
            }

            found.push(ConcentratedAttack {
                attacker: wallet,
                kind: AttackKind::LiquiditySniping,
                block: buys[0].block_number,
                timestamp: buys[0].block_timestamp,
                transactions: buys.iter().map(|e| e.transaction_hash.clone()).collect(),
                price_impact: Decimal::ZERO,
                profit_estimate: Decimal::ZERO,
                confidence: (dec!(50) + Decimal::from(buys.len()) * dec!(10)).min(dec!(100)),
            });
        }

        found
    }
}

impl Detector for ConcentratedAttackDetector {
    type Report = Vec<ConcentratedAttack>;

    fn name(&self) -> &str {
        "concentrated_liquidity"
    }

    fn detect(&self, events: &[SwapEvent]) -> Vec<ConcentratedAttack> {
        let mut found = self.price_impacts(events);
        found.extend(self.sniping(events));
        found.sort_by(|a, b| descending(a.confidence, b.confidence));

        debug!("Concentrated liquidity: {} attacks", found.len());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_core::TransactionType;

    fn swap(hash: &str, wallet: &str, tx_type: TransactionType, price: Decimal, value: Decimal) -> SwapEvent {
        SwapEvent::new(hash, tx_type, 1, wallet)
            .with_pair("0xpool", "TKN/WETH")
            .with_price(price)
            .with_value(value)
    }

    #[test]
    fn test_price_impact() {
        let events = vec![
            swap("big", "0xwhale", TransactionType::Buy, dec!(1.1), dec!(8000)),
            swap("prev", "0xa", TransactionType::Buy, dec!(1), dec!(100)),
        ];
        let found = ConcentratedAttackDetector::default().price_impacts(&events);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attacker, "0xwhale");
        assert_eq!(found[0].price_impact, dec!(10));
        // min(100, 100 + 8)
        assert_eq!(found[0].confidence, dec!(100));
    }

    #[test]
    fn test_price_impact_thresholds_are_strict() {
        let events = vec![
            swap("big", "0xwhale", TransactionType::Buy, dec!(1.05), dec!(8000)),
            swap("prev", "0xa", TransactionType::Buy, dec!(1), dec!(100)),
        ];
        assert!(ConcentratedAttackDetector::default().price_impacts(&events).is_empty());

        let zero_next = vec![
            swap("big", "0xwhale", TransactionType::Buy, dec!(2), dec!(8000)),
            swap("prev", "0xa", TransactionType::Buy, dec!(0), dec!(100)),
        ];
        assert!(ConcentratedAttackDetector::default().price_impacts(&zero_next).is_empty());
    }

    #[test]
    fn test_sniping() {
        let events = vec![
            swap("a", "0xsniper", TransactionType::Buy, dec!(1.00), dec!(1500)),
            swap("b", "0xsniper", TransactionType::Buy, dec!(1.02), dec!(1500)),
            swap("c", "0xsniper", TransactionType::Buy, dec!(0.98), dec!(1500)),
            swap("d", "0xsniper", TransactionType::Sell, dec!(5), dec!(1500)),
        ];
        let found = ConcentratedAttackDetector::default().sniping(&events);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AttackKind::LiquiditySniping);
        assert_eq!(found[0].confidence, dec!(80));
        assert_eq!(found[0].transactions, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_scattered_buys_are_not_sniping() {
        let events = vec![
            swap("a", "0xw", TransactionType::Buy, dec!(1), dec!(1500)),
            swap("b", "0xw", TransactionType::Buy, dec!(2), dec!(1500)),
            swap("c", "0xw", TransactionType::Buy, dec!(3), dec!(1500)),
        ];
        assert!(ConcentratedAttackDetector::default().sniping(&events).is_empty());
    }

    #[test]
    fn test_sniping_at_memecoin_quotes() {
        let events = vec![
            swap("a", "0xsniper", TransactionType::Buy, dec!(10000000000000000), dec!(2000)),
            swap("b", "0xsniper", TransactionType::Buy, dec!(10100000000000000), dec!(2000)),
            swap("c", "0xsniper", TransactionType::Buy, dec!(9900000000000000), dec!(2000)),
        ];
        let found = ConcentratedAttackDetector::default().detect(&events);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AttackKind::LiquiditySniping);
    }

    #[test]
    fn test_price_impact_beyond_decimal_range() {
        // a 1e27x move: the percentage no longer fits and saturates
        let events = vec![
            swap("big", "0xwhale", TransactionType::Buy, dec!(1000000000000000000000000000), dec!(8000)),
            swap("prev", "0xa", TransactionType::Buy, dec!(1), dec!(100)),
        ];
        let found = ConcentratedAttackDetector::default().price_impacts(&events);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].price_impact, Decimal::MAX);
        assert_eq!(found[0].confidence, dec!(100));
    }

    #[test]
    fn test_detect_sorted_by_confidence() {
        let mut events = vec![
            swap("a", "0xs", TransactionType::Buy, dec!(1), dec!(1100)),
            swap("b", "0xs", TransactionType::Buy, dec!(1), dec!(1100)),
            swap("c", "0xs", TransactionType::Buy, dec!(1), dec!(1100)),
        ];
        events.push(swap("big", "0xwhale", TransactionType::Sell, dec!(1.06), dec!(6000)));
        events.push(swap("tail", "0xz", TransactionType::Buy, dec!(1), dec!(10)));

        let found = ConcentratedAttackDetector::default().detect(&events);
        assert_eq!(found.len(), 2);
        // sniping 80, impact min(100, 60 + 6) = 66
        assert_eq!(found[0].kind, AttackKind::LiquiditySniping);
        assert_eq!(found[1].confidence, dec!(66));
    }
}
