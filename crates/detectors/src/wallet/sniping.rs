use chainwatch_core::grouping::{by_wallet, count_unique};
use chainwatch_core::{SwapEvent, Usd};
use chainwatch_ports::Detector;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence band of a sniping-bot profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BotClassification {
    Unlikely,
    Possible,
    Probable,
    HighlyLikely,
}

impl BotClassification {
    pub fn from_confidence(confidence: Decimal) -> Self {
        if confidence >= dec!(70) {
            BotClassification::HighlyLikely
        } else if confidence >= dec!(50) {
            BotClassification::Probable
        } else if confidence >= dec!(30) {
            BotClassification::Possible
        } else {
            BotClassification::Unlikely
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BotClassification::HighlyLikely => "HIGHLY LIKELY SNIPING BOT",
            BotClassification::Probable => "PROBABLE SNIPING BOT",
            BotClassification::Possible => "POSSIBLE SNIPING BOT",
            BotClassification::Unlikely => "UNLIKELY TO BE A BOT",
        }
    }
}

impl fmt::Display for BotClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for sniping bot detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipingBotConfig {
    /// Buys needed before a profile is built
    pub min_buys: usize,
    /// Most recent new positions checked for success
    pub success_sample: usize,
    /// Token symbols kept on the profile
    pub max_tokens_listed: usize,
    /// Recent snipes kept on the profile
    pub max_recent_snipes: usize,
}

impl Default for SnipingBotConfig {
    fn default() -> Self {
        Self {
            min_buys: 5,
            success_sample: 10,
            max_tokens_listed: 20,
            max_recent_snipes: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnipingBotProfile {
    pub wallet: String,
    /// New positions opened
    pub total_snipes: usize,
    pub successful_snipes: usize,
    /// Percent of sampled snipes that succeeded
    pub success_rate: Decimal,
    pub total_volume_usd: Usd,
    /// Mean transaction index of new positions; lower is earlier in the block
    pub avg_entry_speed: Decimal,
    pub unique_tokens: usize,
    pub new_position_ratio: Decimal,
    pub tokens_sniped: Vec<String>,
    pub recent_snipes: Vec<SwapEvent>,
    /// In [0, 100]
    pub bot_confidence: Decimal,
    pub classification: BotClassification,
}

#[derive(Default)]
pub struct SnipingBotDetector {
    config: SnipingBotConfig,
}

impl SnipingBotDetector {
    pub fn new(config: SnipingBotConfig) -> Self {
        Self { config }
    }

    /// Tiered bonuses, capped at 100
    pub fn confidence(
        &self,
        new_position_ratio: Decimal,
        unique_tokens: usize,
        total_snipes: usize,
        avg_entry_speed: Decimal,
    ) -> Decimal {
        let mut score = Decimal::ZERO;

        if new_position_ratio > dec!(0.7) {
            score += dec!(30);
        } else if new_position_ratio > dec!(0.5) {
            score += dec!(20);
        }

        if unique_tokens > 10 {
            score += dec!(25);
        } else if unique_tokens > 5 {
            score += dec!(15);
        }

        if total_snipes > 20 {
            score += dec!(20);
        } else if total_snipes > 10 {
            score += dec!(10);
        }

        if avg_entry_speed < dec!(50) {
            score += dec!(25);
        } else if avg_entry_speed < dec!(100) {
            score += dec!(15);
        }

        score.min(dec!(100))
    }

    /// A snipe succeeds if the wallet's latest sell of the token beat the
    /// entry price, or if the wallet still holds it
    fn is_successful(snipe: &SwapEvent, history: &[&SwapEvent]) -> bool {
        let latest_sell = history
            .iter()
            .copied()
            .filter(|e| e.is_sell() && e.base_token == snipe.base_token)
            .fold(None, |best: Option<&SwapEvent>, e| match best {
                Some(b) if b.block_number >= e.block_number => Some(b),
                _ => Some(e),
            });

        match latest_sell {
            Some(sell) => sell.base_quote_price > snipe.base_quote_price,
            None => true,
        }
    }

    /// Profile one wallet's history; `None` below the minimum buy count
    pub fn profile(&self, wallet: &str, history: &[&SwapEvent]) -> Option<SnipingBotProfile> {
        let buys: Vec<&SwapEvent> = history.iter().copied().filter(|e| e.is_buy()).collect();
        if buys.len() < self.config.min_buys {
            debug!("Sniping bot skipped for {}: {} buys, need {}", wallet, buys.len(), self.config.min_buys);
            return None;
        }

        let new_positions: Vec<&SwapEvent> = buys
            .iter()
            .copied()
            .filter(|e| e.sub_category.is_new_position())
            .collect();

        let unique_tokens = count_unique(new_positions.iter().map(|e| e.base_token.as_str()));
        let total_volume_usd: Usd = buys.iter().map(|e| e.total_value_usd).sum();
        let avg_entry_speed = if new_positions.is_empty() {
            Decimal::ZERO
        } else {
            let indices: u64 = new_positions.iter().map(|e| e.transaction_index).sum();
            Decimal::from(indices) / Decimal::from(new_positions.len())
        };
        let new_position_ratio = Decimal::from(new_positions.len()) / Decimal::from(buys.len());

        let sample: Vec<&SwapEvent> = new_positions.iter().copied().take(self.config.success_sample).collect();
        let successful_snipes = sample.iter().filter(|s| Self::is_successful(s, history)).count();
        let success_rate = Decimal::from(successful_snipes)
            .checked_div(Decimal::from(sample.len()))
            .map(|rate| rate * dec!(100))
            .unwrap_or(Decimal::ZERO);

        let bot_confidence = self.confidence(
            new_position_ratio,
            unique_tokens,
            new_positions.len(),
            avg_entry_speed,
        );

        Some(SnipingBotProfile {
            wallet: wallet.to_string(),
            total_snipes: new_positions.len(),
            successful_snipes,
            success_rate,
            total_volume_usd,
            avg_entry_speed,
            unique_tokens,
            new_position_ratio,
            tokens_sniped: new_positions
                .iter()
                .take(self.config.max_tokens_listed)
                .map(|e| e.bought.symbol.clone())
                .collect(),
            recent_snipes: new_positions
                .iter()
                .take(self.config.max_recent_snipes)
                .map(|e| (*e).clone())
                .collect(),
            bot_confidence,
            classification: BotClassification::from_confidence(bot_confidence),
        })
    }
}

impl Detector for SnipingBotDetector {
    /// One profile per wallet with enough buys, in first-appearance order
    type Report = Vec<SnipingBotProfile>;

    fn name(&self) -> &str {
        "sniping_bot"
    }

    fn detect(&self, events: &[SwapEvent]) -> Vec<SnipingBotProfile> {
        let profiles: Vec<SnipingBotProfile> = by_wallet(events)
            .into_iter()
            .filter_map(|(wallet, history)| self.profile(&wallet, &history))
            .collect();
        debug!("Sniping bot: {} wallets profiled", profiles.len());
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_core::{SubCategory, TokenAmount, TransactionType};

    fn snipe(i: u64, token: &str, index: u64, price: Decimal) -> SwapEvent {
        SwapEvent::new(format!("snipe{i}"), TransactionType::Buy, 100 + i, "0xbot")
            .with_index(index)
            .with_tokens(token, "0xweth")
            .with_amounts(TokenAmount::new(dec!(1000), token.to_uppercase()), TokenAmount::new(dec!(1), "WETH"))
            .with_price(price)
            .with_value(dec!(250))
            .with_sub_category(SubCategory::NewPosition)
    }

    fn sell(i: u64, token: &str, block: u64, price: Decimal) -> SwapEvent {
        SwapEvent::new(format!("sell{i}"), TransactionType::Sell, block, "0xbot")
            .with_tokens(token, "0xweth")
            .with_price(price)
    }

    #[test]
    fn test_needs_five_buys() {
        let events: Vec<SwapEvent> = (0..4).map(|i| snipe(i, &format!("0xt{i}"), 1, dec!(1))).collect();
        assert!(SnipingBotDetector::default().detect(&events).is_empty());
        assert!(SnipingBotDetector::default().detect(&[]).is_empty());
    }

    #[test]
    fn test_bot_profile() {
        let mut events: Vec<SwapEvent> = (0..12).map(|i| snipe(i, &format!("0xt{i}"), 2, dec!(1))).collect();
        // Sold token 0 at a loss, token 1 at a gain (latest sell decides)
        events.push(sell(0, "0xt0", 500, dec!(0.5)));
        events.push(sell(1, "0xt1", 400, dec!(0.5)));
        events.push(sell(2, "0xt1", 600, dec!(2)));

        let profiles = SnipingBotDetector::default().detect(&events);
        assert_eq!(profiles.len(), 1);
        let profile = &profiles[0];
        assert_eq!(profile.wallet, "0xbot");
        assert_eq!(profile.total_snipes, 12);
        assert_eq!(profile.unique_tokens, 12);
        assert_eq!(profile.new_position_ratio, dec!(1));
        assert_eq!(profile.avg_entry_speed, dec!(2));
        // 9 of the first 10 snipes succeeded
        assert_eq!(profile.successful_snipes, 9);
        assert_eq!(profile.success_rate, dec!(90));
        assert_eq!(profile.total_volume_usd, dec!(3000));
        // 30 + 25 + 10 + 25
        assert_eq!(profile.bot_confidence, dec!(90));
        assert_eq!(profile.classification, BotClassification::HighlyLikely);
        assert_eq!(profile.tokens_sniped.len(), 12);
        assert_eq!(profile.recent_snipes.len(), 5);
    }

    #[test]
    fn test_regular_trader() {
        let events: Vec<SwapEvent> = (0..6)
            .map(|i| snipe(i, "0xsame", 150, dec!(1)).with_sub_category(SubCategory::None))
            .collect();
        let profiles = SnipingBotDetector::default().detect(&events);
        let profile = &profiles[0];
        assert_eq!(profile.total_snipes, 0);
        assert_eq!(profile.success_rate, dec!(0));
        // only avg entry speed 0 < 50 scores
        assert_eq!(profile.bot_confidence, dec!(25));
        assert_eq!(profile.classification, BotClassification::Unlikely);
    }

    #[test]
    fn test_wallets_are_profiled_separately() {
        let mut events: Vec<SwapEvent> = (0..6).map(|i| snipe(i, &format!("0xt{i}"), 2, dec!(1))).collect();
        events.extend((0..6).map(|i| {
            let mut e = snipe(10 + i, "0xt0", 180, dec!(1)).with_sub_category(SubCategory::None);
            e.wallet_address = "0xholder".to_string();
            e
        }));
        // the holder's sell must not decide the bot's snipe of the same token
        let mut dump = sell(0, "0xt0", 900, dec!(0.1));
        dump.wallet_address = "0xholder".to_string();
        events.push(dump);

        let profiles = SnipingBotDetector::default().detect(&events);
        assert_eq!(profiles.len(), 2);

        let bot = &profiles[0];
        assert_eq!(bot.wallet, "0xbot");
        assert_eq!(bot.total_snipes, 6);
        assert_eq!(bot.new_position_ratio, dec!(1));
        assert_eq!(bot.success_rate, dec!(100));

        let holder = &profiles[1];
        assert_eq!(holder.wallet, "0xholder");
        assert_eq!(holder.total_snipes, 0);
        assert_eq!(holder.total_volume_usd, dec!(1500));
    }

    #[test]
    fn test_classification_bands() {
        assert_eq!(BotClassification::from_confidence(dec!(70)), BotClassification::HighlyLikely);
        assert_eq!(BotClassification::from_confidence(dec!(69.99)), BotClassification::Probable);
        assert_eq!(BotClassification::from_confidence(dec!(30)), BotClassification::Possible);
        assert_eq!(BotClassification::from_confidence(dec!(29)), BotClassification::Unlikely);
    }
}
