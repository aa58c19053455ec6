//! Chainwatch Risk Engine
//!
//! Scores an address or contract from a risk-flags document. Six independent
//! modules each produce a weighted percentage; the engine averages them and
//! bands the result.
//!
//! ```text
//! document ──► RiskFlags ──► [governance, liquidity, holder,
//!                             token_security, market, fraud] ──► RiskEngine
//! ```

pub mod assessment;
pub mod engine;
pub mod flags;
pub mod label;
pub mod modules;

pub use assessment::{Contributor, ModuleScore, ThreatAssessment};
pub use engine::RiskEngine;
pub use flags::{RiskFlags, TokenMetadata};
pub use label::RiskLabel;
pub use modules::{
    FraudRisk, GovernanceRisk, HolderRisk, LiquidityRisk, MarketRisk, RiskModule, TokenSecurityRisk,
};
