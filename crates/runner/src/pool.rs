//! Liquidity-pool analysis: rug pulls and coordinated dumps, concentrated
//! attacks and pool domination over one pair's swaps.

use chainwatch_core::SwapEvent;
use chainwatch_detectors::finding::{self, Finding};
use chainwatch_detectors::{
    ConcentratedAttack, ConcentratedAttackDetector, LiquidityManipulationDetector, LiquidityManipulationEvent,
    PoolDomination, PoolDominationDetector,
};
use chainwatch_ports::Detector;
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolAnalysis {
    pub pair_label: String,
    pub total_transactions: usize,
    pub manipulation: Vec<LiquidityManipulationEvent>,
    pub concentrated_attacks: Vec<ConcentratedAttack>,
    pub dominations: Vec<PoolDomination>,
    pub message: String,
}

impl PoolAnalysis {
    pub fn run(events: &[SwapEvent], config: &AnalysisConfig) -> Self {
        let manipulation = LiquidityManipulationDetector::new(config.liquidity_manipulation.clone()).detect(events);
        let concentrated_attacks = ConcentratedAttackDetector::new(config.concentrated_attack.clone()).detect(events);
        let dominations = PoolDominationDetector::new(config.pool_domination.clone()).detect(events);

        let pair_label = events
            .iter()
            .map(|e| e.pair_label.as_str())
            .find(|label| !label.is_empty())
            .unwrap_or("unknown pair")
            .to_string();

        let message = domination_message(&dominations);
        info!(
            "Pool analysis of {}: {} manipulation events, {} concentrated attacks, {} dominant wallets",
            pair_label,
            manipulation.len(),
            concentrated_attacks.len(),
            dominations.len()
        );

        Self {
            pair_label,
            total_transactions: events.len(),
            manipulation,
            concentrated_attacks,
            dominations,
            message,
        }
    }

    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = finding::collect(self.manipulation.iter().cloned());
        findings.extend(finding::collect(self.concentrated_attacks.iter().cloned()));
        findings.extend(finding::collect(self.dominations.iter().cloned()));
        findings
    }
}

/// Summary of how much pool volume the dominant wallets control
pub fn domination_message(dominations: &[PoolDomination]) -> String {
    let Some(first) = dominations.first() else {
        return "No pool domination detected - Liquidity provider distribution is healthy with no single \
                entity controlling a significant portion"
            .to_string();
    };

    let dominant_volume: Decimal = dominations.iter().map(|d| d.wallet_volume_usd).sum();
    let share = (dominant_volume * dec!(100))
        .checked_div(first.total_volume_usd)
        .unwrap_or(Decimal::ZERO);

    format!(
        "Detected {} dominant entity(ies) controlling approximately {:.1}% of pool volume. \
         High concentration of trading power may indicate market manipulation risk.",
        dominations.len(),
        share.round_dp(1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_core::RiskLevel;
    use chainwatch_detectors::TradingPattern;

    fn domination(wallet: &str, wallet_volume: Decimal) -> PoolDomination {
        PoolDomination {
            dominant_wallet: wallet.to_string(),
            domination_percentage: dec!(40),
            total_transactions: 10,
            wallet_transactions: 4,
            total_volume_usd: dec!(10000),
            wallet_volume_usd: wallet_volume,
            tx_percentage: dec!(40),
            volume_percentage: dec!(30),
            pattern: TradingPattern::Mixed,
            risk_level: RiskLevel::High,
            manipulation_likelihood: 60,
        }
    }

    #[test]
    fn test_healthy_message() {
        assert!(domination_message(&[]).starts_with("No pool domination detected"));
    }

    #[test]
    fn test_dominant_share_message() {
        let doms = vec![domination("0xa", dec!(3000)), domination("0xb", dec!(2500))];
        assert_eq!(
            domination_message(&doms),
            "Detected 2 dominant entity(ies) controlling approximately 55.0% of pool volume. \
             High concentration of trading power may indicate market manipulation risk."
        );
    }

    #[test]
    fn test_zero_volume_share() {
        let mut dom = domination("0xa", Decimal::ZERO);
        dom.total_volume_usd = Decimal::ZERO;
        assert!(domination_message(&[dom]).contains("approximately 0.0%"));
    }

    #[test]
    fn test_empty_pool() {
        let analysis = PoolAnalysis::run(&[], &AnalysisConfig::default());
        assert_eq!(analysis.total_transactions, 0);
        assert_eq!(analysis.pair_label, "unknown pair");
        assert!(analysis.findings().is_empty());
    }
}
