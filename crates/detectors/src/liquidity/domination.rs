use chainwatch_core::grouping::by_wallet;
use chainwatch_core::{RiskLevel, SwapEvent, Usd};
use chainwatch_ports::Detector;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::descending;

/// Dominant wallet's buy/sell mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingPattern {
    /// Mostly buying
    Accumulation,
    /// Mostly selling
    Distribution,
    Mixed,
}

impl TradingPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingPattern::Accumulation => "Accumulation (Heavy Buying)",
            TradingPattern::Distribution => "Distribution (Heavy Selling)",
            TradingPattern::Mixed => "Mixed Trading",
        }
    }
}

impl fmt::Display for TradingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for pool domination detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolDominationConfig {
    /// Share of transactions (percent) that must be exceeded
    pub max_tx_pct: Decimal,
    /// Share of volume (percent) that must be exceeded
    pub max_volume_pct: Decimal,
    /// Buy ratio above which the pattern is accumulation
    pub accumulation_ratio: Decimal,
    /// Buy ratio below which the pattern is distribution
    pub distribution_ratio: Decimal,
    /// Domination above which the level is CRITICAL
    pub critical_pct: Decimal,
    /// Domination above which the level is HIGH
    pub high_pct: Decimal,
}

impl Default for PoolDominationConfig {
    fn default() -> Self {
        Self {
            max_tx_pct: dec!(20),
            max_volume_pct: dec!(30),
            accumulation_ratio: dec!(0.8),
            distribution_ratio: dec!(0.2),
            critical_pct: dec!(50),
            high_pct: dec!(35),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDomination {
    pub dominant_wallet: String,
    /// Larger of the transaction and volume shares, percent
    pub domination_percentage: Decimal,
    pub total_transactions: usize,
    pub wallet_transactions: usize,
    pub total_volume_usd: Usd,
    pub wallet_volume_usd: Usd,
    pub tx_percentage: Decimal,
    pub volume_percentage: Decimal,
    pub pattern: TradingPattern,
    pub risk_level: RiskLevel,
    /// Percent
    pub manipulation_likelihood: u32,
}

#[derive(Default)]
pub struct PoolDominationDetector {
    config: PoolDominationConfig,
}

impl PoolDominationDetector {
    pub fn new(config: PoolDominationConfig) -> Self {
        Self { config }
    }

    fn pattern(&self, buys: usize, txs: usize) -> TradingPattern {
        let buy_ratio = Decimal::from(buys)
            .checked_div(Decimal::from(txs))
            .unwrap_or(Decimal::ZERO);
        if buy_ratio > self.config.accumulation_ratio {
            TradingPattern::Accumulation
        } else if buy_ratio < self.config.distribution_ratio {
            TradingPattern::Distribution
        } else {
            TradingPattern::Mixed
        }
    }

    fn level(&self, domination: Decimal) -> (RiskLevel, u32) {
        if domination > self.config.critical_pct {
            (RiskLevel::Critical, 80)
        } else if domination > self.config.high_pct {
            (RiskLevel::High, 60)
        } else {
            (RiskLevel::Medium, 40)
        }
    }
}

impl Detector for PoolDominationDetector {
    type Report = Vec<PoolDomination>;

    fn name(&self) -> &str {
        "pool_domination"
    }

    fn detect(&self, events: &[SwapEvent]) -> Vec<PoolDomination> {
        if events.is_empty() {
            return Vec::new();
        }

        let total_transactions = events.len();
        let total_volume: Usd = events.iter().map(|e| e.total_value_usd).sum();
        let hundred = dec!(100);
        let mut found = Vec::new();

        for (wallet, trades) in by_wallet(events) {
            let txs = trades.len();
            let volume: Usd = trades.iter().map(|e| e.total_value_usd).sum();
            let buys = trades.iter().filter(|e| e.is_buy()).count();

            let tx_percentage = Decimal::from(txs) / Decimal::from(total_transactions) * hundred;
            let volume_percentage = if total_volume > Decimal::ZERO {
                volume / total_volume * hundred
            } else {
                Decimal::ZERO
            };

            if tx_percentage <= self.config.max_tx_pct && volume_percentage <= self.config.max_volume_pct {
                continue;
            }

            let domination = tx_percentage.max(volume_percentage);
            let (risk_level, manipulation_likelihood) = self.level(domination);

            found.push(PoolDomination {
                dominant_wallet: wallet,
                domination_percentage: domination,
                total_transactions,
                wallet_transactions: txs,
                total_volume_usd: total_volume,
                wallet_volume_usd: volume,
                tx_percentage,
                volume_percentage,
                pattern: self.pattern(buys, txs),
                risk_level,
                manipulation_likelihood,
            });
        }

        found.sort_by(|a, b| descending(a.domination_percentage, b.domination_percentage));
        debug!("Pool domination: {} dominant wallets", found.len());
        found
    }
}
