//! Chainwatch Detectors
//!
//! Stateless detectors over batches of canonical swap events. Each implements
//! [`chainwatch_ports::Detector`]: the same input always yields the same
//! report, and an empty batch yields an empty report.
//!
//! - **Token activity**: wash trading, price manipulation, pump and dump
//! - **Block ordering**: sandwich attacks
//! - **Liquidity pools**: rug pulls, coordinated dumps, concentrated attacks, domination
//! - **Wallets**: insider trading, sniping bots
//! - **Activity**: value and frequency tiers with hourly outliers

pub mod activity;
pub mod finding;
pub mod liquidity;
pub mod price_manipulation;
pub mod pump_dump;
pub mod sandwich;
pub mod sensitivity;
pub mod wallet;
pub mod wash_trading;

pub use activity::{ActivityProfile, ActivityProfiler, FrequencyTier, HourlyBucket, ValueTier};
pub use finding::Finding;
pub use liquidity::{
    AttackKind, ConcentratedAttack, ConcentratedAttackConfig, ConcentratedAttackDetector,
    LiquidityManipulationConfig, LiquidityManipulationDetector, LiquidityManipulationEvent, ManipulationKind,
    PoolDomination, PoolDominationConfig, PoolDominationDetector, TradingPattern,
};
pub use price_manipulation::{
    CoordinatedBlock, PriceManipulationConfig, PriceManipulationDetector, PriceManipulationEvent,
    PriceManipulationReport,
};
pub use pump_dump::{PumpDumpConfig, PumpDumpDetector, PumpDumpReport, PumpDumpScheme};
pub use sandwich::{SandwichAttack, SandwichDetector, SandwichReport};
pub use sensitivity::Sensitivity;
pub use wallet::{
    BotClassification, EntryAge, InsiderTrade, InsiderTradingConfig, InsiderTradingDetector, SnipingBotConfig,
    SnipingBotDetector, SnipingBotProfile,
};
pub use wash_trading::{RoundTrip, WashTradingConfig, WashTradingDetector, WashTradingReport, WashTradingWallet};
