use chainwatch_core::grouping::{by_block, by_wallet, unique_ordered};
use chainwatch_core::{BlockNumber, Severity, SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::descending;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManipulationKind {
    /// One wallet selling out heavily
    RugPull,
    /// Several wallets selling in the same block
    CoordinatedDump,
}

impl ManipulationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManipulationKind::RugPull => "Potential Rug Pull",
            ManipulationKind::CoordinatedDump => "Coordinated Dump",
        }
    }
}

impl fmt::Display for ManipulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for rug-pull and coordinated-dump detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityManipulationConfig {
    /// Sells a wallet needs before it is considered
    pub rug_min_sells: usize,
    /// Total sell value that must be exceeded
    pub rug_min_value: Usd,
    /// Most recent transactions inspected for the sell ratio
    pub rug_recent_window: usize,
    /// Sell ratio among recent transactions that must be exceeded
    pub rug_sell_ratio: Decimal,
    /// Sell value above which severity is HIGH
    pub rug_high_value: Usd,
    /// Evidence transactions kept per rug pull
    pub rug_max_evidence: usize,
    /// Sells in a block needed for a coordinated dump
    pub dump_min_sells: usize,
    /// Distinct selling wallets needed
    pub dump_min_wallets: usize,
    /// Combined sell value that must be exceeded
    pub dump_min_value: Usd,
    /// Value above which severity is HIGH
    pub dump_high_value: Usd,
}

impl Default for LiquidityManipulationConfig {
    fn default() -> Self {
        Self {
            rug_min_sells: 3,
            rug_min_value: dec!(10000),
            rug_recent_window: 5,
            rug_sell_ratio: dec!(0.7),
            rug_high_value: dec!(50000),
            rug_max_evidence: 5,
            dump_min_sells: 3,
            dump_min_wallets: 3,
            dump_min_value: dec!(5000),
            dump_high_value: dec!(20000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityManipulationEvent {
    pub kind: ManipulationKind,
    pub severity: Severity,
    pub timestamp: Timestamp,
    pub block: BlockNumber,
    pub involved_wallets: Vec<String>,
    pub total_value_usd: Usd,
    pub description: String,
    /// Transaction hashes backing the finding
    pub evidence: Vec<String>,
    /// In [0, 100]
    pub risk_score: Decimal,
}

#[derive(Default)]
pub struct LiquidityManipulationDetector {
    config: LiquidityManipulationConfig,
}

impl LiquidityManipulationDetector {
    pub fn new(config: LiquidityManipulationConfig) -> Self {
        Self { config }
    }

    /// Wallets selling hard, with their recent activity mostly sells
    pub fn rug_pulls(&self, events: &[SwapEvent]) -> Vec<LiquidityManipulationEvent> {
        let mut found = Vec::new();

        for (wallet, trades) in by_wallet(events) {
            let sells: Vec<&SwapEvent> = trades.iter().copied().filter(|e| e.is_sell()).collect();
            if sells.len() < self.config.rug_min_sells {
                continue;
            }

            let total: Usd = sells.iter().map(|e| e.total_value_usd).sum();
            if total <= self.config.rug_min_value {
                continue;
            }

            let mut recent = trades.clone();
            recent.sort_by(|a, b| b.block_number.cmp(&a.block_number));
            recent.truncate(self.config.rug_recent_window);
            let recent_sells = recent.iter().filter(|e| e.is_sell()).count();
            let sell_ratio = Decimal::from(recent_sells) / Decimal::from(recent.len());

            if sell_ratio <= self.config.rug_sell_ratio {
                continue;
            }

            let risk_score = (total / dec!(1000) + sell_ratio * dec!(50)).min(dec!(100));
            let severity = if total > self.config.rug_high_value {
                Severity::High
            } else {
                Severity::Medium
            };

            found.push(LiquidityManipulationEvent {
                kind: ManipulationKind::RugPull,
                severity,
                timestamp: sells[0].block_timestamp,
                block: sells[0].block_number,
                involved_wallets: vec![wallet],
                total_value_usd: total,
                description: format!(
                    "Wallet dumping large amounts: ${:.2} across {} transactions",
                    total,
                    sells.len()
                ),
                evidence: sells
                    .iter()
                    .take(self.config.rug_max_evidence)
                    .map(|e| e.transaction_hash.clone())
                    .collect(),
                risk_score,
            });
        }

        found
    }

    /// Blocks where several wallets sell together
    pub fn coordinated_dumps(&self, events: &[SwapEvent]) -> Vec<LiquidityManipulationEvent> {
        let mut found = Vec::new();

        for (block, trades) in by_block(events) {
            let sells: Vec<&SwapEvent> = trades.into_iter().filter(|e| e.is_sell()).collect();
            if sells.len() < self.config.dump_min_sells {
                continue;
            }

            let wallets = unique_ordered(sells.iter().map(|e| e.wallet_address.as_str()));
            let total: Usd = sells.iter().map(|e| e.total_value_usd).sum();
            if wallets.len() < self.config.dump_min_wallets || total <= self.config.dump_min_value {
                continue;
            }

            let risk_score = (Decimal::from(wallets.len()) * dec!(15) + total / dec!(500)).min(dec!(100));
            let severity = if total > self.config.dump_high_value {
                Severity::High
            } else {
                Severity::Medium
            };

            found.push(LiquidityManipulationEvent {
                kind: ManipulationKind::CoordinatedDump,
                severity,
                timestamp: sells[0].block_timestamp,
                block,
                description: format!(
                    "{} wallets coordinated selling ${:.2} in same block",
                    wallets.len(),
                    total
                ),
                involved_wallets: wallets,
                total_value_usd: total,
                evidence: sells.iter().map(|e| e.transaction_hash.clone()).collect(),
                risk_score,
            });
        }

        found
    }
}

impl Detector for LiquidityManipulationDetector {
    type Report = Vec<LiquidityManipulationEvent>;

    fn name(&self) -> &str {
        "liquidity_manipulation"
    }

    fn detect(&self, events: &[SwapEvent]) -> Vec<LiquidityManipulationEvent> {
        let mut found = self.rug_pulls(events);
        found.extend(self.coordinated_dumps(events));
        found.sort_by(|a, b| descending(a.risk_score, b.risk_score));

        debug!("Liquidity manipulation: {} events", found.len());
        found
    }
}
