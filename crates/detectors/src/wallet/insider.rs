use chainwatch_core::grouping::group_ordered;
use chainwatch_core::{Price, SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time between a position's entry and the analysis instant
///
/// Only the largest whole unit is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryAge {
    Days(i64),
    Hours(i64),
    Minutes(i64),
}

impl EntryAge {
    pub fn between(entry: Timestamp, as_of: Timestamp) -> Self {
        let elapsed = (as_of - entry).max(chrono::Duration::zero());
        if elapsed.num_days() > 0 {
            EntryAge::Days(elapsed.num_days())
        } else if elapsed.num_hours() > 0 {
            EntryAge::Hours(elapsed.num_hours())
        } else {
            EntryAge::Minutes(elapsed.num_minutes())
        }
    }

    /// Under a day old
    pub fn is_quick(&self) -> bool {
        !matches!(self, EntryAge::Days(_))
    }
}

impl fmt::Display for EntryAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryAge::Days(n) => write!(f, "{n} days"),
            EntryAge::Hours(n) => write!(f, "{n} hours"),
            EntryAge::Minutes(n) => write!(f, "{n} minutes"),
        }
    }
}

/// Configuration for insider trading detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsiderTradingConfig {
    /// Positions scoring below this are dropped
    pub min_suspicion_score: Decimal,
    /// Entry value above which the position is large
    pub large_position_usd: Usd,
    /// Entry value above which the position is significant
    pub significant_position_usd: Usd,
}

impl Default for InsiderTradingConfig {
    fn default() -> Self {
        Self {
            min_suspicion_score: dec!(30),
            large_position_usd: dec!(50000),
            significant_position_usd: dec!(10000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderTrade {
    pub wallet: String,
    pub token: String,
    pub token_symbol: String,
    pub entry: SwapEvent,
    /// Value of the latest buy
    pub current_position_value: Usd,
    pub entry_price: Price,
    pub current_price: Price,
    pub price_change_pct: Decimal,
    pub time_since_entry: EntryAge,
    /// In [0, 100]
    pub suspicion_score: Decimal,
    pub flags: Vec<String>,
}

pub struct InsiderTradingDetector {
    config: InsiderTradingConfig,
    as_of: DateTime<Utc>,
}

impl InsiderTradingDetector {
    /// `as_of` is the instant entry ages are measured against
    pub fn new(config: InsiderTradingConfig, as_of: Timestamp) -> Self {
        Self { config, as_of }
    }

    pub fn with_min_score(mut self, min_suspicion_score: Decimal) -> Self {
        self.config.min_suspicion_score = min_suspicion_score;
        self
    }

    fn score(&self, change_pct: Decimal, entry: &SwapEvent, age: EntryAge) -> (Decimal, Vec<String>) {
        let mut score = Decimal::ZERO;
        let mut flags = Vec::new();

        if change_pct > dec!(50) {
            score += dec!(30);
            flags.push("MASSIVE GAINS (>50%)".to_string());
        } else if change_pct > dec!(30) {
            score += dec!(20);
            flags.push("Large gains (>30%)".to_string());
        } else if change_pct > dec!(15) {
            score += dec!(10);
        }

        if entry.sub_category.is_new_position() {
            score += dec!(15);
            flags.push("New position entry".to_string());
        }

        if entry.total_value_usd > self.config.large_position_usd {
            score += dec!(20);
            flags.push("Large position (>$50k)".to_string());
        } else if entry.total_value_usd > self.config.significant_position_usd {
            score += dec!(10);
            flags.push("Significant position (>$10k)".to_string());
        }

        if age.is_quick() {
            score += dec!(15);
            flags.push("Quick profit".to_string());
        }

        (score.min(dec!(100)), flags)
    }
}

/// First event with the lowest block
fn earliest<'a>(buys: &[&'a SwapEvent]) -> Option<&'a SwapEvent> {
    buys.iter().copied().fold(None, |best: Option<&SwapEvent>, e| match best {
        Some(b) if b.block_number <= e.block_number => Some(b),
        _ => Some(e),
    })
}

/// First event with the highest block
fn latest<'a>(buys: &[&'a SwapEvent]) -> Option<&'a SwapEvent> {
    buys.iter().copied().fold(None, |best: Option<&SwapEvent>, e| match best {
        Some(b) if b.block_number >= e.block_number => Some(b),
        _ => Some(e),
    })
}

impl Detector for InsiderTradingDetector {
    type Report = Vec<InsiderTrade>;

    fn name(&self) -> &str {
        "insider_trading"
    }

    fn detect(&self, events: &[SwapEvent]) -> Vec<InsiderTrade> {
        let buys = events.iter().filter(|e| e.is_buy());
        let positions = group_ordered(buys, |e| {
            (e.wallet_address.clone(), e.base_token.clone(), e.bought.symbol.clone())
        });

        let mut trades = Vec::new();
        for ((wallet, token, token_symbol), position) in positions {
            let (Some(entry), Some(current)) = (earliest(&position), latest(&position)) else {
                continue;
            };

            let change_pct = (current.base_quote_price - entry.base_quote_price)
                .checked_div(entry.base_quote_price)
                .map(|ratio| ratio.checked_mul(dec!(100)).unwrap_or(Decimal::MAX))
                .unwrap_or(Decimal::ZERO);
            let age = EntryAge::between(entry.block_timestamp, self.as_of);
            let (suspicion_score, flags) = self.score(change_pct, entry, age);

            if suspicion_score < self.config.min_suspicion_score {
                continue;
            }

            trades.push(InsiderTrade {
                wallet,
                token,
                token_symbol,
                entry: entry.clone(),
                current_position_value: current.total_value_usd,
                entry_price: entry.base_quote_price,
                current_price: current.base_quote_price,
                price_change_pct: change_pct,
                time_since_entry: age,
                suspicion_score,
                flags,
            });
        }

        trades.sort_by(|a, b| b.suspicion_score.cmp(&a.suspicion_score));
        debug!("Insider trading: {} suspicious positions", trades.len());
        trades
    }
}
