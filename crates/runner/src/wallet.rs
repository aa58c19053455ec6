//! Wallet behaviour analysis: insider entries and sniping-bot profiles
//!
//! Without a wallet filter every wallet in the history is analyzed on its own.

use chainwatch_core::{SwapEvent, Timestamp};
use chainwatch_detectors::finding::{self, Finding};
use chainwatch_detectors::{InsiderTrade, InsiderTradingDetector, SnipingBotDetector, SnipingBotProfile};
use chainwatch_ports::Detector;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAnalysis {
    /// Address the history was filtered to, if any
    pub wallet: Option<String>,
    pub total_transactions: usize,
    pub insider_trades: Vec<InsiderTrade>,
    /// One profile per wallet with enough buys
    pub sniping: Vec<SnipingBotProfile>,
}

impl WalletAnalysis {
    /// Analyze `events`, optionally restricted to one wallet (case-insensitive)
    pub fn run(events: &[SwapEvent], wallet: Option<&str>, config: &AnalysisConfig, as_of: Timestamp) -> Self {
        let history: Vec<SwapEvent> = match wallet {
            Some(address) => events
                .iter()
                .filter(|e| e.wallet_address.eq_ignore_ascii_case(address))
                .cloned()
                .collect(),
            None => events.to_vec(),
        };

        let insider_trades = InsiderTradingDetector::new(config.insider.clone(), as_of).detect(&history);
        let sniping = SnipingBotDetector::new(config.sniping.clone()).detect(&history);

        info!(
            "Wallet analysis of {}: {} transactions, {} insider positions, {} sniping profiles",
            wallet.unwrap_or("all wallets"),
            history.len(),
            insider_trades.len(),
            sniping.len()
        );

        Self {
            wallet: wallet.map(str::to_string),
            total_transactions: history.len(),
            insider_trades,
            sniping,
        }
    }

    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = finding::collect(self.insider_trades.iter().cloned());
        findings.extend(finding::collect(self.sniping.iter().cloned()));
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_core::{SubCategory, TokenAmount, TransactionType};
    use chrono::{DateTime, Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn buy(hash: &str, wallet: &str, token: &str, block: u64, price: Decimal) -> SwapEvent {
        SwapEvent::new(hash, TransactionType::Buy, block, wallet)
            .with_index(1)
            .with_tokens(token, "0xweth")
            .with_amounts(TokenAmount::new(dec!(100), "TKN"), TokenAmount::new(dec!(1), "WETH"))
            .with_timestamp(DateTime::<Utc>::UNIX_EPOCH + Duration::hours(1))
            .with_price(price)
            .with_value(dec!(60000))
            .with_sub_category(SubCategory::NewPosition)
    }

    #[test]
    fn test_unfiltered_history_keeps_wallets_apart() {
        let mut events = Vec::new();
        for i in 0..5u64 {
            events.push(buy(&format!("a{i}"), "0xAlice", "0xtkn", 10 + i, dec!(1)));
            events.push(buy(&format!("b{i}"), "0xBob", "0xtkn", 20 + i, dec!(2)));
        }
        let as_of = DateTime::<Utc>::UNIX_EPOCH + Duration::hours(2);

        let analysis = WalletAnalysis::run(&events, None, &AnalysisConfig::default(), as_of);
        assert_eq!(analysis.total_transactions, 10);

        let wallets: Vec<&str> = analysis.sniping.iter().map(|p| p.wallet.as_str()).collect();
        assert_eq!(wallets, vec!["0xalice", "0xbob"]);
        assert!(analysis.sniping.iter().all(|p| p.total_snipes == 5));

        // each wallet's position is flat; merged they would show a 100% gain
        assert_eq!(analysis.insider_trades.len(), 2);
        assert!(analysis.insider_trades.iter().all(|t| t.price_change_pct == Decimal::ZERO));
        assert_eq!(analysis.findings().len(), 4);
    }
}
