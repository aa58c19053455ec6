//! Wash trading detection
//!
//! Flags wallets that repeatedly buy and sell the same token at near-identical
//! prices within a short window, or that trade several times in one block.
//! Tiny same-block traders are treated as MEV/arbitrage bots and filtered.

use chainwatch_core::grouping::by_wallet;
use chainwatch_core::{SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use chrono::Duration;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::sensitivity::Sensitivity;

/// Samples kept per flagged wallet
const MAX_SAMPLE_ROUND_TRIPS: usize = 5;

/// Configuration for wash trading detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WashTradingConfig {
    /// Max minutes between a buy and the sell that closes it
    pub time_window_minutes: i64,
    /// Round trips needed to flag a wallet
    pub min_round_trips: usize,
    /// Max |buy - sell| / buy for a round trip (0.02 = 2%)
    pub price_deviation_threshold: Decimal,
    /// Same-block trades needed to flag a wallet
    pub min_same_block_trades: usize,
    /// Minimum total USD volume to flag
    pub min_volume_usd: Usd,
    /// MEV filter: minimum same-block trades
    pub mev_min_same_block: usize,
    /// MEV filter: average trade size below this
    pub mev_max_avg_trade: Usd,
    /// MEV filter: total volume below this
    pub mev_max_volume: Usd,
}

impl Default for WashTradingConfig {
    fn default() -> Self {
        Self::for_sensitivity(Sensitivity::Medium)
    }
}

impl WashTradingConfig {
    pub fn for_sensitivity(sensitivity: Sensitivity) -> Self {
        let (min_round_trips, min_same_block_trades, min_volume_usd, time_window_minutes, deviation) =
            match sensitivity {
                Sensitivity::Low => (5, 10, dec!(5000), 30, dec!(0.01)),
                Sensitivity::Medium => (3, 5, dec!(1000), 60, dec!(0.02)),
                Sensitivity::High => (2, 3, dec!(500), 120, dec!(0.03)),
            };

        Self {
            time_window_minutes,
            min_round_trips,
            price_deviation_threshold: deviation,
            min_same_block_trades,
            min_volume_usd,
            mev_min_same_block: 2,
            mev_max_avg_trade: dec!(100),
            mev_max_volume: dec!(500),
        }
    }

    pub fn time_window(&self) -> Duration {
        Duration::minutes(self.time_window_minutes)
    }
}

/// A buy closed by a sell at near-identical price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    pub buy_time: Timestamp,
    pub sell_time: Timestamp,
    pub buy_value: Usd,
    pub sell_value: Usd,
    /// Relative price difference (fraction of the buy price)
    pub price_diff: Decimal,
    pub secs: i64,
}

/// Metrics for one flagged wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashTradingWallet {
    pub wallet: String,
    pub round_trips: usize,
    pub same_block_trades: usize,
    pub total_volume: Usd,
    pub avg_trade_size: Usd,
    pub num_trades: usize,
    /// Mean buy-to-sell time across round trips (0 when none)
    pub avg_round_trip_secs: Decimal,
    pub sample_round_trips: Vec<RoundTrip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WashTradingReport {
    pub suspicious_wallets: usize,
    pub wallets: Vec<WashTradingWallet>,
    pub total_suspicious_volume: Usd,
    pub filtered_mev_bots: usize,
    pub note: String,
}

impl WashTradingReport {
    fn empty() -> Self {
        Self {
            suspicious_wallets: 0,
            wallets: Vec::new(),
            total_suspicious_volume: Decimal::ZERO,
            filtered_mev_bots: 0,
            note: mev_note(0),
        }
    }

    /// Flagged wallets ordered by volume, largest first
    pub fn top_suspicious(&self, n: usize) -> Vec<&WashTradingWallet> {
        let mut wallets: Vec<&WashTradingWallet> = self.wallets.iter().collect();
        wallets.sort_by(|a, b| b.total_volume.cmp(&a.total_volume));
        wallets.truncate(n);
        wallets
    }
}

fn mev_note(filtered: usize) -> String {
    format!("Filtered out {filtered} likely MEV/arbitrage bots")
}

pub struct WashTradingDetector {
    config: WashTradingConfig,
}

impl WashTradingDetector {
    pub fn new(config: WashTradingConfig) -> Self {
        Self { config }
    }

    pub fn with_sensitivity(sensitivity: Sensitivity) -> Self {
        Self::new(WashTradingConfig::for_sensitivity(sensitivity))
    }

    pub fn config(&self) -> &WashTradingConfig {
        &self.config
    }

    /// Round trips in a wallet's events, in buy order
    fn round_trips(&self, events: &[&SwapEvent]) -> Vec<RoundTrip> {
        let mut ordered: Vec<&SwapEvent> = events.to_vec();
        ordered.sort_by_key(|e| e.block_timestamp);

        let window = self.config.time_window();
        let mut trips = Vec::new();

        for buy in ordered.iter().filter(|e| e.is_buy()) {
            if buy.base_quote_price.is_zero() {
                continue;
            }
            let deadline = buy.block_timestamp + window;

            for sell in ordered.iter().filter(|e| e.is_sell()) {
                if sell.block_timestamp < buy.block_timestamp || sell.block_timestamp > deadline {
                    continue;
                }
                let diff = ((buy.base_quote_price - sell.base_quote_price) / buy.base_quote_price).abs();
                if diff <= self.config.price_deviation_threshold {
                    trips.push(RoundTrip {
                        buy_time: buy.block_timestamp,
                        sell_time: sell.block_timestamp,
                        buy_value: buy.total_value_usd,
                        sell_value: sell.total_value_usd,
                        price_diff: diff,
                        secs: (sell.block_timestamp - buy.block_timestamp).num_seconds(),
                    });
                }
            }
        }

        trips
    }

    /// Trades of the wallet sharing a block with another of its trades
    fn same_block_trades(events: &[&SwapEvent]) -> usize {
        let mut per_block: HashMap<u64, usize> = HashMap::new();
        for event in events {
            *per_block.entry(event.block_number).or_default() += 1;
        }
        per_block.values().filter(|&&count| count >= 2).sum()
    }

    fn is_mev_bot(&self, same_block: usize, avg_trade: Usd, total: Usd) -> bool {
        same_block >= self.config.mev_min_same_block
            && avg_trade < self.config.mev_max_avg_trade
            && total < self.config.mev_max_volume
    }
}

impl Default for WashTradingDetector {
    fn default() -> Self {
        Self::new(WashTradingConfig::default())
    }
}

impl Detector for WashTradingDetector {
    type Report = WashTradingReport;

    fn name(&self) -> &str {
        "wash_trading"
    }

    fn detect(&self, events: &[SwapEvent]) -> WashTradingReport {
        if events.is_empty() {
            return WashTradingReport::empty();
        }

        let mut wallets = Vec::new();
        let mut filtered_mev_bots = 0;

        for (wallet, trades) in by_wallet(events) {
            let total_volume: Usd = trades.iter().map(|e| e.total_value_usd).sum();
            let num_trades = trades.len();
            let avg_trade_size = total_volume / Decimal::from(num_trades);
            let same_block_trades = Self::same_block_trades(&trades);

            let trips = self.round_trips(&trades);
            let enough_volume = total_volume >= self.config.min_volume_usd;
            let by_round_trips = trips.len() >= self.config.min_round_trips;
            let by_same_block = same_block_trades >= self.config.min_same_block_trades;

            if enough_volume && (by_round_trips || by_same_block) {
                // only suspicious wallets count toward the MEV filter
                if self.is_mev_bot(same_block_trades, avg_trade_size, total_volume) {
                    debug!("Wallet {} looks like an MEV bot, skipping", wallet);
                    filtered_mev_bots += 1;
                    continue;
                }

                let avg_round_trip_secs = if trips.is_empty() {
                    Decimal::ZERO
                } else {
                    let secs: i64 = trips.iter().map(|t| t.secs).sum();
                    Decimal::from(secs) / Decimal::from(trips.len())
                };

                wallets.push(WashTradingWallet {
                    wallet,
                    round_trips: trips.len(),
                    same_block_trades,
                    total_volume,
                    avg_trade_size,
                    num_trades,
                    avg_round_trip_secs,
                    sample_round_trips: trips.into_iter().take(MAX_SAMPLE_ROUND_TRIPS).collect(),
                });
            }
        }

        let total_suspicious_volume = wallets.iter().map(|w| w.total_volume).sum();
        debug!(
            "Wash trading: {} suspicious wallets, {} MEV bots filtered",
            wallets.len(),
            filtered_mev_bots
        );

        WashTradingReport {
            suspicious_wallets: wallets.len(),
            wallets,
            total_suspicious_volume,
            filtered_mev_bots,
            note: mev_note(filtered_mev_bots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_core::{TokenAmount, TransactionType};
    use chrono::{DateTime, Utc};

    fn at(minute: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::minutes(minute)
    }

    fn trade(
        wallet: &str,
        tx_type: TransactionType,
        block: u64,
        minute: i64,
        price: Decimal,
        value: Decimal,
    ) -> SwapEvent {
        SwapEvent::new(format!("{wallet}-{block}-{minute}-{tx_type}"), tx_type, block, wallet)
            .with_timestamp(at(minute))
            .with_pair("0xpair", "TKN/WETH")
            .with_amounts(TokenAmount::new(dec!(1), "TKN"), TokenAmount::new(dec!(1), "WETH"))
            .with_price(price)
            .with_value(value)
    }

    fn round_trips(wallet: &str, count: usize, value: Decimal, price_step: Decimal) -> Vec<SwapEvent> {
        let mut events = Vec::new();
        for i in 0..count as i64 {
            events.push(trade(wallet, TransactionType::Buy, 100 + (i as u64) * 10, i * 120, dec!(1), value));
            events.push(trade(
                wallet,
                TransactionType::Sell,
                105 + (i as u64) * 10,
                i * 120 + 10,
                dec!(1) + price_step,
                value,
            ));
        }
        events
    }

    #[test]
    fn test_empty_batch() {
        let report = WashTradingDetector::default().detect(&[]);
        assert_eq!(report.suspicious_wallets, 0);
        assert_eq!(report.total_suspicious_volume, dec!(0));
        assert_eq!(report.note, "Filtered out 0 likely MEV/arbitrage bots");
    }

    #[test]
    fn test_round_trips_flag_wallet() {
        let events = round_trips("0xwash", 3, dec!(400), dec!(0.01));
        let report = WashTradingDetector::default().detect(&events);

        assert_eq!(report.suspicious_wallets, 1);
        let wallet = &report.wallets[0];
        assert_eq!(wallet.wallet, "0xwash");
        assert_eq!(wallet.round_trips, 3);
        assert_eq!(wallet.total_volume, dec!(2400));
        assert_eq!(wallet.avg_trade_size, dec!(400));
        assert_eq!(wallet.avg_round_trip_secs, dec!(600));
        assert_eq!(wallet.sample_round_trips.len(), 3);
    }

    #[test]
    fn test_price_deviation_boundary() {
        // 2% exactly still counts, 2.1% does not
        let at_threshold = round_trips("0xa", 3, dec!(400), dec!(0.02));
        assert_eq!(WashTradingDetector::default().detect(&at_threshold).suspicious_wallets, 1);

        let over = round_trips("0xa", 3, dec!(400), dec!(0.021));
        assert_eq!(WashTradingDetector::default().detect(&over).suspicious_wallets, 0);
    }

    #[test]
    fn test_min_volume_boundary() {
        // 4 trips x 2 trades x value
        let below = round_trips("0xa", 4, dec!(124.99), dec!(0));
        assert_eq!(WashTradingDetector::default().detect(&below).suspicious_wallets, 0);

        let exact = round_trips("0xa", 4, dec!(125), dec!(0));
        let report = WashTradingDetector::default().detect(&exact);
        assert_eq!(report.suspicious_wallets, 1);
        assert_eq!(report.total_suspicious_volume, dec!(1000));
    }

    #[test]
    fn test_sell_outside_window_is_ignored() {
        let events = vec![
            trade("0xa", TransactionType::Buy, 1, 0, dec!(1), dec!(2000)),
            trade("0xa", TransactionType::Sell, 2, 61, dec!(1), dec!(2000)),
            // Sell before the buy never closes it
            trade("0xa", TransactionType::Sell, 3, -5, dec!(1), dec!(2000)),
        ];
        let detector = WashTradingDetector::default();
        let refs: Vec<&SwapEvent> = events.iter().collect();
        assert!(detector.round_trips(&refs).is_empty());
    }

    #[test]
    fn test_same_block_trades() {
        let mut events = Vec::new();
        for i in 0..5 {
            let tx_type = if i % 2 == 0 { TransactionType::Buy } else { TransactionType::Sell };
            events.push(trade("0xblock", tx_type, 500, i, dec!(1) + Decimal::from(i), dec!(300)));
        }
        let report = WashTradingDetector::default().detect(&events);
        assert_eq!(report.suspicious_wallets, 1);
        assert_eq!(report.wallets[0].same_block_trades, 5);
    }

    #[test]
    fn test_quiet_mev_shaped_wallet_is_not_counted() {
        let events = vec![
            trade("0xbot", TransactionType::Buy, 900, 0, dec!(1), dec!(40)),
            trade("0xbot", TransactionType::Sell, 900, 0, dec!(1), dec!(41)),
        ];
        let report = WashTradingDetector::default().detect(&events);
        assert_eq!(report.suspicious_wallets, 0);
        assert_eq!(report.filtered_mev_bots, 0);
        assert_eq!(report.note, "Filtered out 0 likely MEV/arbitrage bots");
    }

    #[test]
    fn test_suspicious_mev_bots_are_filtered() {
        let config = WashTradingConfig {
            min_volume_usd: dec!(50),
            ..WashTradingConfig::for_sensitivity(Sensitivity::High)
        };
        let events = vec![
            trade("0xbot", TransactionType::Buy, 900, 0, dec!(1), dec!(40)),
            trade("0xbot", TransactionType::Sell, 900, 0, dec!(1), dec!(41)),
            trade("0xbot", TransactionType::Buy, 900, 0, dec!(1), dec!(39)),
        ];
        let report = WashTradingDetector::new(config).detect(&events);
        assert_eq!(report.suspicious_wallets, 0);
        assert_eq!(report.filtered_mev_bots, 1);
        assert_eq!(report.note, "Filtered out 1 likely MEV/arbitrage bots");
    }

    #[test]
    fn test_top_suspicious_orders_by_volume() {
        let mut events = round_trips("0xsmall", 3, dec!(400), dec!(0));
        events.extend(round_trips("0xbig", 3, dec!(900), dec!(0)));
        let report = WashTradingDetector::default().detect(&events);

        let top = report.top_suspicious(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].wallet, "0xbig");
    }

    #[test]
    fn test_detect_is_idempotent() {
        let events = round_trips("0xwash", 4, dec!(500), dec!(0.005));
        let detector = WashTradingDetector::default();
        assert_eq!(detector.detect(&events), detector.detect(&events));
    }
}
