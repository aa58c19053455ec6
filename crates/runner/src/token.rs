//! Token-level analysis: wash trading, price manipulation, pump and dump
//!
//! Folds the three detector reports into one composite 0-100 score.

use chainwatch_core::SwapEvent;
use chainwatch_detectors::finding::{self, Finding};
use chainwatch_detectors::{
    ActivityProfile, ActivityProfiler, PriceManipulationDetector, PriceManipulationReport, PumpDumpDetector,
    PumpDumpReport, WashTradingDetector, WashTradingReport,
};
use chainwatch_ports::Detector;
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AnalysisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenRiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl TokenRiskLevel {
    pub fn from_score(score: Decimal) -> Self {
        if score >= dec!(75) {
            TokenRiskLevel::Critical
        } else if score >= dec!(50) {
            TokenRiskLevel::High
        } else if score >= dec!(25) {
            TokenRiskLevel::Medium
        } else if score > Decimal::ZERO {
            TokenRiskLevel::Low
        } else {
            TokenRiskLevel::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRiskLevel::Minimal => "MINIMAL",
            TokenRiskLevel::Low => "LOW",
            TokenRiskLevel::Medium => "MEDIUM",
            TokenRiskLevel::High => "HIGH",
            TokenRiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for TokenRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score over the three token reports, capped at 100
pub fn composite_score(
    wash: &WashTradingReport,
    price: &PriceManipulationReport,
    pump: &PumpDumpReport,
) -> Decimal {
    let mut score = Decimal::ZERO;

    if wash.suspicious_wallets > 0 {
        score += (Decimal::from(wash.suspicious_wallets) * dec!(3)).min(dec!(25));
        score += (wash.total_suspicious_volume / dec!(100000)).min(Decimal::ONE) * dec!(10);
    }

    score += (Decimal::from(price.manipulation_events.len()) * dec!(10)).min(dec!(25));
    score += (Decimal::from(price.coordinated_trading.len()) * dec!(2)).min(dec!(10));

    if pump.high_confidence > 0 {
        score += (Decimal::from(pump.high_confidence) * dec!(15)).min(dec!(25));
    } else {
        score += (Decimal::from(pump.num_schemes) * dec!(5)).min(dec!(10));
    }

    score.min(dec!(100)).round_dp(2)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAnalysis {
    pub total_transactions: usize,
    pub wash_trading: WashTradingReport,
    pub price_manipulation: PriceManipulationReport,
    pub pump_dump: PumpDumpReport,
    pub activity: ActivityProfile,
    pub risk_score: Decimal,
    pub risk_level: TokenRiskLevel,
}

impl TokenAnalysis {
    pub fn run(events: &[SwapEvent], config: &AnalysisConfig) -> Self {
        let wash_trading = WashTradingDetector::new(config.wash_trading()).detect(events);
        let price_manipulation = PriceManipulationDetector::new(config.price_manipulation()).detect(events);
        let pump_dump = PumpDumpDetector::new(config.pump_dump()).detect(events);
        let activity = ActivityProfiler::new().detect(events);

        let risk_score = composite_score(&wash_trading, &price_manipulation, &pump_dump);
        let risk_level = TokenRiskLevel::from_score(risk_score);
        info!(
            "Token analysis over {} events ({} sensitivity): score {} {}",
            events.len(),
            config.sensitivity,
            risk_score,
            risk_level
        );

        Self {
            total_transactions: events.len(),
            wash_trading,
            price_manipulation,
            pump_dump,
            activity,
            risk_score,
            risk_level,
        }
    }

    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = finding::collect(self.wash_trading.wallets.iter().cloned());
        findings.extend(finding::collect(self.price_manipulation.manipulation_events.iter().cloned()));
        findings.extend(finding::collect(self.price_manipulation.coordinated_trading.iter().cloned()));
        findings.extend(finding::collect(self.pump_dump.schemes.iter().cloned()));
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_detectors::{CoordinatedBlock, PumpDumpScheme, WashTradingWallet};
    use chrono::DateTime;

    fn empty_reports() -> (WashTradingReport, PriceManipulationReport, PumpDumpReport) {
        let events: Vec<SwapEvent> = Vec::new();
        (
            WashTradingDetector::default().detect(&events),
            PriceManipulationDetector::default().detect(&events),
            PumpDumpDetector::default().detect(&events),
        )
    }

    fn wash_wallet(volume: Decimal) -> WashTradingWallet {
        WashTradingWallet {
            wallet: "0xw".to_string(),
            round_trips: 3,
            same_block_trades: 0,
            total_volume: volume,
            avg_trade_size: volume,
            num_trades: 6,
            avg_round_trip_secs: Decimal::ZERO,
            sample_round_trips: Vec::new(),
        }
    }

    fn scheme(confidence: Decimal) -> PumpDumpScheme {
        PumpDumpScheme {
            pump_time: DateTime::UNIX_EPOCH,
            pump_increase: dec!(0.6),
            dump_decrease: dec!(0.4),
            dump_wallets: 12,
            dump_volume: dec!(60000),
            confidence,
        }
    }

    #[test]
    fn test_clean_reports_score_minimal() {
        let (wash, price, pump) = empty_reports();
        let score = composite_score(&wash, &price, &pump);
        assert_eq!(score, Decimal::ZERO);
        assert_eq!(TokenRiskLevel::from_score(score), TokenRiskLevel::Minimal);
    }

    #[test]
    fn test_wash_component() {
        let (mut wash, price, pump) = empty_reports();
        wash.wallets = vec![wash_wallet(dec!(25000)), wash_wallet(dec!(25000))];
        wash.suspicious_wallets = 2;
        wash.total_suspicious_volume = dec!(50000);
        // 2*3 + 0.5*10
        assert_eq!(composite_score(&wash, &price, &pump), dec!(11));
    }

    #[test]
    fn test_components_saturate() {
        let (mut wash, mut price, pump) = empty_reports();
        wash.suspicious_wallets = 20;
        wash.total_suspicious_volume = dec!(5000000);
        price.coordinated_trading = (0..8)
            .map(|block| CoordinatedBlock {
                block,
                timestamp: DateTime::UNIX_EPOCH,
                unique_wallets: 5,
                total_value: dec!(20000),
                wallets: Vec::new(),
            })
            .collect();
        // 25 + 10 + 0 + 10
        assert_eq!(composite_score(&wash, &price, &pump), dec!(45));
    }

    #[test]
    fn test_high_confidence_schemes_outweigh_count() {
        let (wash, price, mut pump) = empty_reports();
        pump.schemes = vec![scheme(dec!(0.8)), scheme(dec!(0.3))];
        pump.num_schemes = 2;
        pump.high_confidence = 1;
        assert_eq!(composite_score(&wash, &price, &pump), dec!(15));

        pump.high_confidence = 0;
        assert_eq!(composite_score(&wash, &price, &pump), dec!(10));
    }

    #[test]
    fn test_level_bands() {
        assert_eq!(TokenRiskLevel::from_score(dec!(75)), TokenRiskLevel::Critical);
        assert_eq!(TokenRiskLevel::from_score(dec!(74.99)), TokenRiskLevel::High);
        assert_eq!(TokenRiskLevel::from_score(dec!(50)), TokenRiskLevel::High);
        assert_eq!(TokenRiskLevel::from_score(dec!(25)), TokenRiskLevel::Medium);
        assert_eq!(TokenRiskLevel::from_score(dec!(0.01)), TokenRiskLevel::Low);
        assert_eq!(TokenRiskLevel::Critical.to_string(), "CRITICAL");
    }
}
