//! Pump and dump detection
//!
//! A pump is a trade whose price sits well above the pair's price a few trades
//! earlier. It becomes a scheme when, within the following hours, many wallets
//! exit their whole position for a large combined value and the price collapses.

use chainwatch_core::grouping::{count_unique, group_ordered};
use chainwatch_core::{SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use chrono::Duration;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::sensitivity::Sensitivity;

/// Configuration for pump-and-dump detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpDumpConfig {
    /// Price rise fraction that counts as a pump (0.5 = +50%)
    pub pump_threshold: Decimal,
    /// Price drop fraction that confirms the dump
    pub dump_threshold: Decimal,
    /// Unique wallets that must exit
    pub min_wallets: usize,
    /// Hours after the pump searched for the dump
    pub time_window_hours: i64,
    /// Batches smaller than this are not analysed
    pub min_events: usize,
    /// Max trades looked back for the pump baseline
    pub lookback_trades: usize,
    /// Dump USD volume that must be exceeded
    pub min_dump_volume: Usd,
}

impl Default for PumpDumpConfig {
    fn default() -> Self {
        Self::for_sensitivity(Sensitivity::Medium)
    }
}

impl PumpDumpConfig {
    pub fn for_sensitivity(sensitivity: Sensitivity) -> Self {
        let (pump_threshold, dump_threshold, min_wallets) = match sensitivity {
            Sensitivity::Low => (dec!(0.7), dec!(0.4), 15),
            Sensitivity::Medium => (dec!(0.5), dec!(0.3), 10),
            Sensitivity::High => (dec!(0.25), dec!(0.15), 5),
        };

        Self {
            pump_threshold,
            dump_threshold,
            min_wallets,
            time_window_hours: 4,
            min_events: 50,
            lookback_trades: 10,
            min_dump_volume: dec!(50000),
        }
    }

    pub fn time_window(&self) -> Duration {
        Duration::hours(self.time_window_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpDumpScheme {
    pub pump_time: Timestamp,
    /// Fractional rise at the pump trade
    pub pump_increase: Decimal,
    /// Fractional fall from the pump price to the end of the dump window
    pub dump_decrease: Decimal,
    pub dump_wallets: usize,
    pub dump_volume: Usd,
    /// In [0, 1]
    pub confidence: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpDumpReport {
    pub schemes: Vec<PumpDumpScheme>,
    pub num_schemes: usize,
    /// Schemes with confidence above 0.75
    pub high_confidence: usize,
    /// Batch was below the minimum size
    pub insufficient_data: bool,
}

impl PumpDumpReport {
    fn empty(insufficient_data: bool) -> Self {
        Self {
            schemes: Vec::new(),
            num_schemes: 0,
            high_confidence: 0,
            insufficient_data,
        }
    }

    pub fn high_confidence_schemes(&self) -> impl Iterator<Item = &PumpDumpScheme> {
        self.schemes.iter().filter(|s| s.confidence > HIGH_CONFIDENCE)
    }
}

const HIGH_CONFIDENCE: Decimal = dec!(0.75);

pub struct PumpDumpDetector {
    config: PumpDumpConfig,
}

impl PumpDumpDetector {
    pub fn new(config: PumpDumpConfig) -> Self {
        Self { config }
    }

    pub fn with_sensitivity(sensitivity: Sensitivity) -> Self {
        Self::new(PumpDumpConfig::for_sensitivity(sensitivity))
    }

    pub fn config(&self) -> &PumpDumpConfig {
        &self.config
    }

    /// Price change of each trade versus its pair `k` trades earlier,
    /// aligned with `ordered`. `k` shrinks for pairs with few trades.
    fn price_changes(&self, ordered: &[&SwapEvent]) -> Vec<Option<Decimal>> {
        let mut changes = vec![None; ordered.len()];
        let indexed: Vec<(usize, &SwapEvent)> = ordered.iter().copied().enumerate().collect();

        for (_, members) in group_ordered(&indexed, |(_, e)| e.pair_address.clone()) {
            let k = members.len().saturating_sub(1).min(self.config.lookback_trades);
            if k == 0 {
                continue;
            }
            for i in k..members.len() {
                let (slot, current) = *members[i];
                let (_, prior) = *members[i - k];
                changes[slot] = current
                    .base_quote_price
                    .checked_div(prior.base_quote_price)
                    .map(|ratio| ratio - Decimal::ONE);
            }
        }

        changes
    }

    /// Sum of four tiered sub-scores, clamped to [0, 1]
    pub fn confidence(&self, dumpers: usize, pump: Decimal, dump: Decimal, volume: Usd) -> Decimal {
        let full = dec!(0.25);
        let partial = dec!(0.15);
        let tier = |strong: bool, weak: bool| {
            if strong {
                full
            } else if weak {
                partial
            } else {
                Decimal::ZERO
            }
        };

        let score = tier(dumpers >= 20, dumpers >= self.config.min_wallets)
            + tier(pump >= Decimal::ONE, pump >= self.config.pump_threshold)
            + tier(dump >= dec!(0.5), dump >= self.config.dump_threshold)
            + tier(volume >= dec!(100000), volume >= self.config.min_dump_volume);

        score.clamp(Decimal::ZERO, Decimal::ONE)
    }

    fn scheme_at(&self, ordered: &[&SwapEvent], pump: &SwapEvent, increase: Decimal) -> Option<PumpDumpScheme> {
        let start = pump.block_timestamp;
        let end = start + self.config.time_window();
        let window: Vec<&SwapEvent> = ordered
            .iter()
            .copied()
            .filter(|e| e.block_timestamp > start && e.block_timestamp <= end)
            .collect();

        let sell_all: Vec<&SwapEvent> = window.iter().copied().filter(|e| e.sub_category.is_sell_all()).collect();
        let dump_wallets = count_unique(sell_all.iter().map(|e| e.wallet_address.as_str()));
        let dump_volume: Usd = sell_all.iter().map(|e| e.total_value_usd).sum();

        if dump_wallets < self.config.min_wallets || dump_volume <= self.config.min_dump_volume {
            return None;
        }

        let price_after = window.last()?.base_quote_price;
        let dump_decrease = (pump.base_quote_price - price_after).checked_div(pump.base_quote_price)?;
        if dump_decrease < self.config.dump_threshold {
            return None;
        }

        Some(PumpDumpScheme {
            pump_time: start,
            pump_increase: increase,
            dump_decrease,
            dump_wallets,
            dump_volume,
            confidence: self.confidence(dump_wallets, increase, dump_decrease, dump_volume),
        })
    }
}

impl Default for PumpDumpDetector {
    fn default() -> Self {
        Self::new(PumpDumpConfig::default())
    }
}

impl Detector for PumpDumpDetector {
    type Report = PumpDumpReport;

    fn name(&self) -> &str {
        "pump_and_dump"
    }

    fn detect(&self, events: &[SwapEvent]) -> PumpDumpReport {
        if events.len() < self.config.min_events {
            debug!(
                "Pump and dump skipped: {} events, need {}",
                events.len(),
                self.config.min_events
            );
            return PumpDumpReport::empty(true);
        }

        let mut ordered: Vec<&SwapEvent> = events.iter().collect();
        ordered.sort_by_key(|e| e.block_timestamp);

        let changes = self.price_changes(&ordered);
        let schemes: Vec<PumpDumpScheme> = ordered
            .iter()
            .zip(&changes)
            .filter_map(|(event, change)| {
                let increase = (*change)?;
                if increase > self.config.pump_threshold {
                    self.scheme_at(&ordered, event, increase)
                } else {
                    None
                }
            })
            .collect();

        let high_confidence = schemes.iter().filter(|s| s.confidence > HIGH_CONFIDENCE).count();
        debug!("Pump and dump: {} schemes, {} high confidence", schemes.len(), high_confidence);

        PumpDumpReport {
            num_schemes: schemes.len(),
            schemes,
            high_confidence,
            insufficient_data: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_core::{SubCategory, TransactionType};
    use chrono::{DateTime, Utc};

    fn at(minute: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_800) + Duration::minutes(minute)
    }

    fn trade(i: usize, wallet: &str, minute: i64, price: Decimal, value: Decimal) -> SwapEvent {
        SwapEvent::new(format!("tx{i}"), TransactionType::Buy, 1000 + i as u64, wallet)
            .with_timestamp(at(minute))
            .with_pair("0xpair", "MOON/WETH")
            .with_price(price)
            .with_value(value)
    }

    /// 30 flat trades, a pump to 2.0, then `dumpers` sellAll exits at 0.5
    fn scheme_batch(dumpers: usize, dump_value: Decimal) -> Vec<SwapEvent> {
        let mut events: Vec<SwapEvent> = (0..30)
            .map(|i| trade(i, &format!("0xflat{i}"), i as i64, dec!(1), dec!(100)))
            .collect();
        events.push(trade(30, "0xpumper", 40, dec!(2), dec!(20000)));
        for d in 0..dumpers {
            events.push(
                trade(31 + d, &format!("0xdump{d}"), 60 + d as i64, dec!(0.5), dump_value)
                    .with_sub_category(SubCategory::SellAll),
            );
        }
        while events.len() < 50 {
            let i = events.len();
            events.push(trade(i, "0xlate", 10_000 + i as i64, dec!(0.5), dec!(10)));
        }
        events
    }

    #[test]
    fn test_small_batch_is_insufficient() {
        let report = PumpDumpDetector::default().detect(&[]);
        assert!(report.insufficient_data);
        assert_eq!(report.num_schemes, 0);
    }

    #[test]
    fn test_scheme_detected() {
        let events = scheme_batch(12, dec!(5000));
        let report = PumpDumpDetector::default().detect(&events);

        assert_eq!(report.num_schemes, 1);
        let scheme = &report.schemes[0];
        assert_eq!(scheme.pump_increase, dec!(1));
        assert_eq!(scheme.dump_decrease, dec!(0.75));
        assert_eq!(scheme.dump_wallets, 12);
        assert_eq!(scheme.dump_volume, dec!(60000));
        // 0.15 wallets + 0.25 pump + 0.25 dump + 0.15 volume
        assert_eq!(scheme.confidence, dec!(0.80));
        assert_eq!(report.high_confidence, 1);
    }

    #[test]
    fn test_too_few_dumpers() {
        let events = scheme_batch(9, dec!(8000));
        assert_eq!(PumpDumpDetector::default().detect(&events).num_schemes, 0);
    }

    #[test]
    fn test_dump_volume_must_exceed_floor() {
        let events = scheme_batch(10, dec!(5000));
        assert_eq!(PumpDumpDetector::default().detect(&events).num_schemes, 0);
    }

    #[test]
    fn test_confidence_is_monotonic_and_bounded() {
        let detector = PumpDumpDetector::default();
        let mut previous = Decimal::ZERO;
        for dumpers in [0, 5, 10, 19, 20, 50] {
            let score = detector.confidence(dumpers, dec!(0.6), dec!(0.35), dec!(60000));
            assert!(score >= previous);
            assert!(score <= Decimal::ONE);
            previous = score;
        }

        let max = detector.confidence(100, dec!(5), dec!(0.9), dec!(1000000));
        assert_eq!(max, Decimal::ONE);
        assert_eq!(detector.confidence(0, dec!(0), dec!(0), dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_single_trade_pair_has_no_change() {
        let detector = PumpDumpDetector::default();
        let only = trade(0, "0xa", 0, dec!(9), dec!(1));
        let changes = detector.price_changes(&[&only]);
        assert_eq!(changes, vec![None]);
    }
}
