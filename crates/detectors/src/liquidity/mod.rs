//! Liquidity pool analyzers
//!
//! Run over the swaps of a single pair:
//! - [`LiquidityManipulationDetector`]: rug-pull selling and coordinated dumps
//! - [`ConcentratedAttackDetector`]: price-moving trades and concentrated sniping
//! - [`PoolDominationDetector`]: wallets holding an outsized share of activity

mod concentrated;
mod domination;
mod manipulation;

pub use concentrated::{AttackKind, ConcentratedAttack, ConcentratedAttackConfig, ConcentratedAttackDetector};
pub use domination::{PoolDomination, PoolDominationConfig, PoolDominationDetector, TradingPattern};
pub use manipulation::{
    LiquidityManipulationConfig, LiquidityManipulationDetector, LiquidityManipulationEvent, ManipulationKind,
};

use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Descending comparison for stable "largest first" sorts
pub(crate) fn descending(a: Decimal, b: Decimal) -> Ordering {
    b.cmp(&a)
}
