//! Wallet behaviour analyzers
//!
//! Run over the swap history of a single wallet.

mod insider;
mod sniping;

pub use insider::{EntryAge, InsiderTrade, InsiderTradingConfig, InsiderTradingDetector};
pub use sniping::{BotClassification, SnipingBotConfig, SnipingBotDetector, SnipingBotProfile};
