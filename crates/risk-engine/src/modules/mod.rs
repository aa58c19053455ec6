//! The six scored risk dimensions
//!
//! Each module owns only its inputs and computes its score once at
//! construction. [`RiskModule`] is the closed set the engine aggregates.

mod fraud;
mod governance;
mod holder;
mod liquidity;
mod market;
mod token_security;

pub use fraud::FraudRisk;
pub use governance::GovernanceRisk;
pub use holder::HolderRisk;
pub use liquidity::LiquidityRisk;
pub use market::MarketRisk;
pub use token_security::TokenSecurityRisk;

use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// One risk dimension
#[derive(Debug, Clone, PartialEq)]
pub enum RiskModule {
    Governance(GovernanceRisk),
    Liquidity(LiquidityRisk),
    Holder(HolderRisk),
    TokenSecurity(TokenSecurityRisk),
    Market(MarketRisk),
    Fraud(FraudRisk),
}

impl RiskModule {
    fn factor(&self) -> &dyn RiskFactor {
        match self {
            RiskModule::Governance(m) => m,
            RiskModule::Liquidity(m) => m,
            RiskModule::Holder(m) => m,
            RiskModule::TokenSecurity(m) => m,
            RiskModule::Market(m) => m,
            RiskModule::Fraud(m) => m,
        }
    }
}

impl RiskFactor for RiskModule {
    fn name(&self) -> &'static str {
        self.factor().name()
    }

    fn score(&self) -> Decimal {
        self.factor().score()
    }

    fn explain(&self) -> String {
        self.factor().explain()
    }
}

/// 100 when set, 0 otherwise
pub(crate) fn indicator(set: bool) -> Decimal {
    if set { dec!(100) } else { Decimal::ZERO }
}

pub(crate) fn clamp_percent(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(dec!(100))
}

/// `Σ(weight · factor) / Σ weight`, rounded to 2 dp
pub(crate) fn weighted(parts: &[(Decimal, Decimal)]) -> Decimal {
    let total_weight: Decimal = parts.iter().map(|(w, _)| *w).sum();
    let total: Decimal = parts.iter().map(|(w, f)| *w * *f).sum();
    total
        .checked_div(total_weight)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_average() {
        let parts = [(dec!(0.5), dec!(100)), (dec!(0.5), Decimal::ZERO)];
        assert_eq!(weighted(&parts), dec!(50));
        assert_eq!(weighted(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(dec!(-5)), Decimal::ZERO);
        assert_eq!(clamp_percent(dec!(150)), dec!(100));
        assert_eq!(clamp_percent(dec!(42.5)), dec!(42.5));
    }

    #[test]
    fn test_enum_delegates() {
        let module = RiskModule::Holder(HolderRisk::new(dec!(61.234)));
        assert_eq!(module.name(), "holder");
        assert_eq!(module.score(), dec!(61.23));
        assert_eq!(module.explain(), "Top 10 wallets hold 61.2% of total supply.");
    }
}
