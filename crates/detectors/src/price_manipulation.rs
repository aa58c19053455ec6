//! Price manipulation detection
//!
//! Two independent signals over a batch:
//! - Trades moving a pair's price sharply while far above its recent trade size
//! - Blocks in which many distinct wallets trade a large combined value

use chainwatch_core::grouping::{by_block, count_unique};
use chainwatch_core::window::TrailingMean;
use chainwatch_core::{BlockNumber, SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::sensitivity::Sensitivity;

/// Trades whose wallets are listed per coordinated block
const MAX_BLOCK_WALLETS: usize = 10;

/// Configuration for price manipulation detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceManipulationConfig {
    /// Absolute price change fraction to flag (0.15 = 15%)
    pub price_spike_threshold: Decimal,
    /// Trade value over trailing mean to flag
    pub volume_multiplier: Decimal,
    /// Minimum trade USD value to flag
    pub min_value_usd: Usd,
    /// Trailing window of same-pair trades for the mean value
    pub rolling_window: usize,
    /// Unique wallets for a coordinated block
    pub coordinated_min_wallets: usize,
    /// Combined USD value a coordinated block must exceed
    pub coordinated_min_value: Usd,
}

impl Default for PriceManipulationConfig {
    fn default() -> Self {
        Self::for_sensitivity(Sensitivity::Medium)
    }
}

impl PriceManipulationConfig {
    pub fn for_sensitivity(sensitivity: Sensitivity) -> Self {
        let (price_spike_threshold, volume_multiplier, min_value_usd) = match sensitivity {
            Sensitivity::Low => (dec!(0.20), dec!(15), dec!(10000)),
            Sensitivity::Medium => (dec!(0.15), dec!(10), dec!(5000)),
            Sensitivity::High => (dec!(0.10), dec!(5), dec!(1000)),
        };

        Self {
            price_spike_threshold,
            volume_multiplier,
            min_value_usd,
            rolling_window: 20,
            coordinated_min_wallets: 5,
            coordinated_min_value: dec!(10000),
        }
    }
}

/// A trade with an abnormal price move on abnormal size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceManipulationEvent {
    pub timestamp: Timestamp,
    pub block: BlockNumber,
    /// Signed fraction versus the previous trade of the pair
    pub price_change: Decimal,
    /// Trade value over the trailing mean
    pub volume_spike: Decimal,
    pub wallet: String,
    pub value_usd: Usd,
    pub pair_label: String,
}

/// A block with many wallets moving a lot of value together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatedBlock {
    pub block: BlockNumber,
    pub timestamp: Timestamp,
    pub unique_wallets: usize,
    pub total_value: Usd,
    /// Trader of each of the block's first trades, one entry per trade
    pub wallets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceManipulationReport {
    pub manipulation_events: Vec<PriceManipulationEvent>,
    pub coordinated_trading: Vec<CoordinatedBlock>,
    pub total_events: usize,
    /// Largest absolute price change among manipulation events
    pub highest_spike: Decimal,
}

impl PriceManipulationReport {
    fn empty() -> Self {
        Self {
            manipulation_events: Vec::new(),
            coordinated_trading: Vec::new(),
            total_events: 0,
            highest_spike: Decimal::ZERO,
        }
    }
}

/// Per-trade metrics before thresholding
#[derive(Debug, Clone, Copy, PartialEq)]
struct TradeMetrics {
    price_change: Option<Decimal>,
    volume_spike: Option<Decimal>,
}

pub struct PriceManipulationDetector {
    config: PriceManipulationConfig,
}

impl PriceManipulationDetector {
    pub fn new(config: PriceManipulationConfig) -> Self {
        Self { config }
    }

    pub fn with_sensitivity(sensitivity: Sensitivity) -> Self {
        Self::new(PriceManipulationConfig::for_sensitivity(sensitivity))
    }

    pub fn config(&self) -> &PriceManipulationConfig {
        &self.config
    }

    /// Metrics per trade in block order, paired with the trade
    fn trade_metrics<'a>(&self, events: &'a [SwapEvent]) -> Vec<(&'a SwapEvent, TradeMetrics)> {
        let mut ordered: Vec<&SwapEvent> = events.iter().collect();
        ordered.sort_by_key(|e| e.block_number);

        let mut last_price: HashMap<&str, Decimal> = HashMap::new();
        let mut windows: HashMap<&str, TrailingMean> = HashMap::new();
        let mut metrics = Vec::with_capacity(ordered.len());

        for event in ordered {
            let pair = event.pair_address.as_str();

            let price_change = last_price
                .get(pair)
                .and_then(|prev| (event.base_quote_price - prev).checked_div(*prev));
            last_price.insert(pair, event.base_quote_price);

            let mean = windows
                .entry(pair)
                .or_insert_with(|| TrailingMean::new(self.config.rolling_window))
                .push(event.total_value_usd);
            let volume_spike = event.total_value_usd.checked_div(mean);

            metrics.push((
                event,
                TradeMetrics {
                    price_change,
                    volume_spike,
                },
            ));
        }

        metrics
    }

    fn is_manipulation(&self, event: &SwapEvent, metrics: &TradeMetrics) -> bool {
        let (Some(change), Some(spike)) = (metrics.price_change, metrics.volume_spike) else {
            return false;
        };
        change.abs() > self.config.price_spike_threshold
            && spike > self.config.volume_multiplier
            && event.total_value_usd > self.config.min_value_usd
    }

    fn coordinated_blocks(&self, events: &[SwapEvent]) -> Vec<CoordinatedBlock> {
        by_block(events)
            .into_iter()
            .filter_map(|(block, block_events)| {
                let unique_wallets = count_unique(block_events.iter().map(|e| e.wallet_address.as_str()));
                let total_value: Usd = block_events.iter().map(|e| e.total_value_usd).sum();

                if unique_wallets < self.config.coordinated_min_wallets
                    || total_value <= self.config.coordinated_min_value
                {
                    return None;
                }

                Some(CoordinatedBlock {
                    block,
                    timestamp: block_events[0].block_timestamp,
                    unique_wallets,
                    total_value,
                    wallets: block_events
                        .iter()
                        .take(MAX_BLOCK_WALLETS)
                        .map(|e| e.wallet_address.clone())
                        .collect(),
                })
            })
            .collect()
    }
}

impl Default for PriceManipulationDetector {
    fn default() -> Self {
        Self::new(PriceManipulationConfig::default())
    }
}

impl Detector for PriceManipulationDetector {
    type Report = PriceManipulationReport;

    fn name(&self) -> &str {
        "price_manipulation"
    }

    fn detect(&self, events: &[SwapEvent]) -> PriceManipulationReport {
        if events.is_empty() {
            return PriceManipulationReport::empty();
        }

        let manipulation_events: Vec<PriceManipulationEvent> = self
            .trade_metrics(events)
            .into_iter()
            .filter(|(event, metrics)| self.is_manipulation(event, metrics))
            .map(|(event, metrics)| PriceManipulationEvent {
                timestamp: event.block_timestamp,
                block: event.block_number,
                price_change: metrics.price_change.unwrap_or_default(),
                volume_spike: metrics.volume_spike.unwrap_or_default(),
                wallet: event.wallet_address.clone(),
                value_usd: event.total_value_usd,
                pair_label: event.pair_label.clone(),
            })
            .collect();

        let coordinated_trading = self.coordinated_blocks(events);

        let highest_spike = manipulation_events
            .iter()
            .map(|e| e.price_change.abs())
            .max()
            .unwrap_or(Decimal::ZERO);

        debug!(
            "Price manipulation: {} events, {} coordinated blocks",
            manipulation_events.len(),
            coordinated_trading.len()
        );

        PriceManipulationReport {
            total_events: manipulation_events.len() + coordinated_trading.len(),
            manipulation_events,
            coordinated_trading,
            highest_spike,
        }
    }
}
