//! Activity profiling
//!
//! Buckets trades by USD size and by per-wallet hourly frequency, and flags
//! hours in which a wallet traded far more than it usually does.

use chainwatch_core::{SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use chrono::DateTime;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTier {
    /// Under $1k
    Retail,
    /// Under $10k
    SmallActive,
    /// Under $100k
    MidTier,
    /// Under $1M
    HighValue,
    Institutional,
}

impl ValueTier {
    pub fn classify(value: Usd) -> Self {
        if value < dec!(1000) {
            ValueTier::Retail
        } else if value < dec!(10000) {
            ValueTier::SmallActive
        } else if value < dec!(100000) {
            ValueTier::MidTier
        } else if value < dec!(1000000) {
            ValueTier::HighValue
        } else {
            ValueTier::Institutional
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyTier {
    /// At most 5 trades in the hour
    Dormant,
    /// At most 20
    Active,
    /// At most 100
    HighFrequencyBot,
    ExtremeAnomaly,
}

impl FrequencyTier {
    pub fn classify(trades_in_hour: usize) -> Self {
        match trades_in_hour {
            0..=5 => FrequencyTier::Dormant,
            6..=20 => FrequencyTier::Active,
            21..=100 => FrequencyTier::HighFrequencyBot,
            _ => FrequencyTier::ExtremeAnomaly,
        }
    }

    pub fn is_high_frequency(&self) -> bool {
        matches!(self, FrequencyTier::HighFrequencyBot | FrequencyTier::ExtremeAnomaly)
    }
}

/// Trades of one wallet within one UTC hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub wallet: String,
    pub hour: Timestamp,
    pub trades: usize,
    pub tier: FrequencyTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityProfile {
    pub value_tiers: BTreeMap<ValueTier, usize>,
    pub institutional_trades: usize,
    pub high_value_trades: usize,
    pub frequency_tiers: BTreeMap<FrequencyTier, usize>,
    /// Hourly buckets at bot frequency or above
    pub high_frequency_actors: usize,
    /// Wallets with at least one anomalous hour
    pub anomalous_wallets: usize,
    /// Buckets above the wallet's mean plus two sample standard deviations
    pub statistical_anomalies: Vec<HourlyBucket>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityProfiler;

impl ActivityProfiler {
    pub fn new() -> Self {
        Self
    }

    fn hour_of(ts: Timestamp) -> Timestamp {
        let secs = ts.timestamp();
        DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(ts)
    }

    /// Buckets whose count exceeds mean + 2 * sample std of the wallet's buckets
    fn outliers(buckets: &[HourlyBucket]) -> Vec<HourlyBucket> {
        if buckets.len() < 2 {
            return Vec::new();
        }

        let counts: Vec<Decimal> = buckets.iter().map(|b| Decimal::from(b.trades)).collect();
        let n = Decimal::from(counts.len());
        let mean = counts.iter().sum::<Decimal>() / n;
        let sample_variance =
            counts.iter().map(|c| (*c - mean) * (*c - mean)).sum::<Decimal>() / (n - Decimal::ONE);
        if sample_variance.is_zero() {
            return Vec::new();
        }

        // count > mean + 2 * std, compared on squares
        buckets
            .iter()
            .zip(&counts)
            .filter(|(_, count)| {
                let excess = **count - mean;
                excess > Decimal::ZERO && excess * excess > dec!(4) * sample_variance
            })
            .map(|(bucket, _)| bucket.clone())
            .collect()
    }
}

impl Detector for ActivityProfiler {
    type Report = ActivityProfile;

    fn name(&self) -> &str {
        "activity_profile"
    }

    fn detect(&self, events: &[SwapEvent]) -> ActivityProfile {
        let mut value_tiers: BTreeMap<ValueTier, usize> = BTreeMap::new();
        for event in events {
            *value_tiers.entry(ValueTier::classify(event.total_value_usd)).or_default() += 1;
        }

        let mut hourly: BTreeMap<(String, Timestamp), usize> = BTreeMap::new();
        for event in events {
            let key = (event.wallet_address.clone(), Self::hour_of(event.block_timestamp));
            *hourly.entry(key).or_default() += 1;
        }

        let mut per_wallet: BTreeMap<String, Vec<HourlyBucket>> = BTreeMap::new();
        let mut frequency_tiers: BTreeMap<FrequencyTier, usize> = BTreeMap::new();
        for ((wallet, hour), trades) in hourly {
            let tier = FrequencyTier::classify(trades);
            *frequency_tiers.entry(tier).or_default() += 1;
            per_wallet.entry(wallet.clone()).or_default().push(HourlyBucket {
                wallet,
                hour,
                trades,
                tier,
            });
        }

        let high_frequency_actors = per_wallet
            .values()
            .flatten()
            .filter(|b| b.tier.is_high_frequency())
            .count();

        let mut anomalous_wallets = 0;
        let mut statistical_anomalies = Vec::new();
        for buckets in per_wallet.values() {
            let outliers = Self::outliers(buckets);
            if !outliers.is_empty() {
                anomalous_wallets += 1;
                statistical_anomalies.extend(outliers);
            }
        }

        debug!(
            "Activity profile: {} hourly buckets, {} anomalous wallets",
            frequency_tiers.values().sum::<usize>(),
            anomalous_wallets
        );

        ActivityProfile {
            institutional_trades: value_tiers.get(&ValueTier::Institutional).copied().unwrap_or(0),
            high_value_trades: value_tiers.get(&ValueTier::HighValue).copied().unwrap_or(0),
            value_tiers,
            frequency_tiers,
            high_frequency_actors,
            anomalous_wallets,
            statistical_anomalies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_core::TransactionType;
    use chrono::{Duration, Utc};

    fn at_hour(hour: i64, minute: i64) -> Timestamp {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_000) + Duration::hours(hour) + Duration::minutes(minute)
    }

    fn trade(wallet: &str, hour: i64, minute: i64, value: Decimal) -> SwapEvent {
        SwapEvent::new(format!("{wallet}-{hour}-{minute}"), TransactionType::Buy, 1, wallet)
            .with_timestamp(at_hour(hour, minute))
            .with_value(value)
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ValueTier::classify(dec!(999.99)), ValueTier::Retail);
        assert_eq!(ValueTier::classify(dec!(1000)), ValueTier::SmallActive);
        assert_eq!(ValueTier::classify(dec!(1000000)), ValueTier::Institutional);
        assert_eq!(FrequencyTier::classify(5), FrequencyTier::Dormant);
        assert_eq!(FrequencyTier::classify(21), FrequencyTier::HighFrequencyBot);
        assert_eq!(FrequencyTier::classify(101), FrequencyTier::ExtremeAnomaly);
    }

    #[test]
    fn test_hourly_outlier() {
        let mut events = Vec::new();
        // One trade in each of six quiet hours, then a burst of 30
        for hour in 0..6 {
            events.push(trade("0xw", hour, 0, dec!(50)));
        }
        for minute in 0..30 {
            events.push(trade("0xw", 6, minute, dec!(50)));
        }

        let profile = ActivityProfiler::new().detect(&events);
        assert_eq!(profile.anomalous_wallets, 1);
        assert_eq!(profile.statistical_anomalies.len(), 1);
        assert_eq!(profile.statistical_anomalies[0].trades, 30);
        assert_eq!(profile.high_frequency_actors, 1);
        assert_eq!(profile.frequency_tiers.get(&FrequencyTier::Dormant), Some(&6));
        assert_eq!(profile.value_tiers.get(&ValueTier::Retail), Some(&36));
    }

    #[test]
    fn test_uniform_activity_has_no_outliers() {
        let events: Vec<SwapEvent> = (0..4).map(|h| trade("0xw", h, 0, dec!(2000000))).collect();
        let profile = ActivityProfiler::new().detect(&events);
        assert!(profile.statistical_anomalies.is_empty());
        assert_eq!(profile.institutional_trades, 4);
    }

    #[test]
    fn test_empty_batch() {
        let profile = ActivityProfiler::new().detect(&[]);
        assert!(profile.value_tiers.is_empty());
        assert_eq!(profile.anomalous_wallets, 0);
    }
}
