//! Uniform view over every detector's findings

use serde::{Deserialize, Serialize};

use crate::liquidity::{ConcentratedAttack, LiquidityManipulationEvent, PoolDomination};
use crate::price_manipulation::{CoordinatedBlock, PriceManipulationEvent};
use crate::pump_dump::PumpDumpScheme;
use crate::sandwich::SandwichAttack;
use crate::wallet::{InsiderTrade, SnipingBotProfile};
use crate::wash_trading::WashTradingWallet;

/// One finding from any detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    WashTradingWallet(WashTradingWallet),
    PriceManipulationEvent(PriceManipulationEvent),
    CoordinatedBlock(CoordinatedBlock),
    PumpDumpScheme(PumpDumpScheme),
    SandwichAttack(SandwichAttack),
    LiquidityManipulationEvent(LiquidityManipulationEvent),
    ConcentratedAttack(ConcentratedAttack),
    PoolDomination(PoolDomination),
    InsiderTrade(InsiderTrade),
    SnipingBotProfile(SnipingBotProfile),
}

impl Finding {
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::WashTradingWallet(_) => "wash_trading_wallet",
            Finding::PriceManipulationEvent(_) => "price_manipulation_event",
            Finding::CoordinatedBlock(_) => "coordinated_block",
            Finding::PumpDumpScheme(_) => "pump_dump_scheme",
            Finding::SandwichAttack(_) => "sandwich_attack",
            Finding::LiquidityManipulationEvent(_) => "liquidity_manipulation_event",
            Finding::ConcentratedAttack(_) => "concentrated_attack",
            Finding::PoolDomination(_) => "pool_domination",
            Finding::InsiderTrade(_) => "insider_trade",
            Finding::SnipingBotProfile(_) => "sniping_bot_profile",
        }
    }

    /// Primary wallet the finding is about, if it names one
    pub fn subject(&self) -> Option<&str> {
        match self {
            Finding::WashTradingWallet(f) => Some(&f.wallet),
            Finding::PriceManipulationEvent(f) => Some(&f.wallet),
            Finding::CoordinatedBlock(_) | Finding::PumpDumpScheme(_) => None,
            Finding::SandwichAttack(f) => Some(&f.attacker),
            Finding::LiquidityManipulationEvent(f) => f.involved_wallets.first().map(String::as_str),
            Finding::ConcentratedAttack(f) => Some(&f.attacker),
            Finding::PoolDomination(f) => Some(&f.dominant_wallet),
            Finding::InsiderTrade(f) => Some(&f.wallet),
            Finding::SnipingBotProfile(f) => Some(&f.wallet),
        }
    }
}

impl From<WashTradingWallet> for Finding {
    fn from(finding: WashTradingWallet) -> Self {
        Finding::WashTradingWallet(finding)
    }
}

impl From<PriceManipulationEvent> for Finding {
    fn from(finding: PriceManipulationEvent) -> Self {
        Finding::PriceManipulationEvent(finding)
    }
}

impl From<CoordinatedBlock> for Finding {
    fn from(finding: CoordinatedBlock) -> Self {
        Finding::CoordinatedBlock(finding)
    }
}

impl From<PumpDumpScheme> for Finding {
    fn from(finding: PumpDumpScheme) -> Self {
        Finding::PumpDumpScheme(finding)
    }
}

impl From<SandwichAttack> for Finding {
    fn from(finding: SandwichAttack) -> Self {
        Finding::SandwichAttack(finding)
    }
}

impl From<LiquidityManipulationEvent> for Finding {
    fn from(finding: LiquidityManipulationEvent) -> Self {
        Finding::LiquidityManipulationEvent(finding)
    }
}

impl From<ConcentratedAttack> for Finding {
    fn from(finding: ConcentratedAttack) -> Self {
        Finding::ConcentratedAttack(finding)
    }
}

impl From<PoolDomination> for Finding {
    fn from(finding: PoolDomination) -> Self {
        Finding::PoolDomination(finding)
    }
}

impl From<InsiderTrade> for Finding {
    fn from(finding: InsiderTrade) -> Self {
        Finding::InsiderTrade(finding)
    }
}

impl From<SnipingBotProfile> for Finding {
    fn from(finding: SnipingBotProfile) -> Self {
        Finding::SnipingBotProfile(finding)
    }
}

/// Convert a list of detector findings into the uniform view
pub fn collect<T: Into<Finding>>(findings: impl IntoIterator<Item = T>) -> Vec<Finding> {
    findings.into_iter().map(Into::into).collect()
}
