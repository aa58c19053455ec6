use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::assessment::{Contributor, ThreatAssessment};
use crate::flags::{RiskFlags, TokenMetadata};
use crate::label::RiskLabel;
use crate::modules::{
    FraudRisk, GovernanceRisk, HolderRisk, LiquidityRisk, MarketRisk, RiskModule, TokenSecurityRisk,
};

/// Number of modules surfaced as top contributors
pub const TOP_CONTRIBUTORS: usize = 3;

/// Averages independent risk modules into one score
///
/// Module order is fixed at construction and is the order used for reports
/// and for breaking ties between equal scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskEngine {
    modules: Vec<RiskModule>,
}

impl RiskEngine {
    pub fn new(modules: Vec<RiskModule>) -> Self {
        Self { modules }
    }

    /// Build the six standard modules from extracted flags
    pub fn from_flags(flags: &RiskFlags) -> Self {
        Self::new(vec![
            RiskModule::Governance(GovernanceRisk::new(
                flags.has("is_proxy"),
                flags.access_control,
                flags.has("upgradeable_contract"),
            )),
            RiskModule::Liquidity(LiquidityRisk::new(
                flags.has("unlocked-liquidity"),
                flags.locked_liquidity_percent,
                flags.creator_percent,
            )),
            RiskModule::Holder(HolderRisk::new(flags.top10_holder_percent)),
            RiskModule::TokenSecurity(TokenSecurityRisk::new(
                flags.buy_tax_percentage,
                flags.has("transfer_pausable"),
                flags.is_blacklisted,
                flags.is_trusted,
            )),
            RiskModule::Market(MarketRisk::new(
                flags.price_change_7d,
                flags.ath_change,
                flags.atl_change,
                flags.market_cap_rank,
            )),
            RiskModule::Fraud(FraudRisk::new(
                flags.has("hacker"),
                flags.has("drainer"),
                flags.has("mixers"),
                flags.has("tornado"),
            )),
        ])
    }

    pub fn modules(&self) -> &[RiskModule] {
        &self.modules
    }

    /// Mean of module scores, 2 dp; zero with no modules
    pub fn overall_score(&self) -> Decimal {
        let total: Decimal = self.modules.iter().map(RiskFactor::score).sum();
        total
            .checked_div(Decimal::from(self.modules.len()))
            .unwrap_or(Decimal::ZERO)
            .round_dp(2)
    }

    pub fn overall_risk(&self) -> (Decimal, RiskLabel) {
        let score = self.overall_score();
        (score, RiskLabel::from_score(score))
    }

    /// Highest-scoring modules; equal scores keep module order
    pub fn top_contributors(&self, n: usize) -> Vec<Contributor> {
        let mut ranked: Vec<Contributor> = self
            .modules
            .iter()
            .map(|m| Contributor {
                module: m.name().to_string(),
                score: m.score(),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(n);
        ranked
    }

    /// Score a risk-flags document for `address`
    pub fn assess(address: &str, doc: &Value) -> ThreatAssessment {
        let flags = RiskFlags::from_value(doc);
        let engine = Self::from_flags(&flags);
        let assessment = ThreatAssessment::build(address, TokenMetadata::from_value(doc), &engine);
        log::info!(
            "Threat assessment for {}: {} ({})",
            address,
            assessment.overall_risk_score,
            assessment.overall_risk_level
        );
        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_empty_engine_scores_zero() {
        let engine = RiskEngine::new(Vec::new());
        assert_eq!(engine.overall_risk(), (Decimal::ZERO, RiskLabel::Low));
        assert!(engine.top_contributors(TOP_CONTRIBUTORS).is_empty());
    }

    #[test]
    fn test_clean_document_baseline() {
        // liquidity 30 (nothing locked), token_security 10 (untrusted), market 20 (unranked)
        let engine = RiskEngine::from_flags(&RiskFlags::default());
        assert_eq!(engine.modules().len(), 6);
        assert_eq!(engine.overall_score(), dec!(10));
        assert_eq!(engine.overall_risk().1, RiskLabel::Low);
    }

    #[test]
    fn test_top_contributors_stable_on_ties() {
        let engine = RiskEngine::new(vec![
            RiskModule::Holder(HolderRisk::new(dec!(40))),
            RiskModule::Fraud(FraudRisk::new(true, true, false, false)),
            RiskModule::Governance(GovernanceRisk::new(false, false, false)),
            RiskModule::Market(MarketRisk::new(dec!(100), dec!(100), dec!(100), 1000)),
        ]);
        let top = engine.top_contributors(3);
        let names: Vec<&str> = top.iter().map(|c| c.module.as_str()).collect();
        assert_eq!(names, vec!["market", "fraud", "holder"]);

        let tied = RiskEngine::new(vec![
            RiskModule::Holder(HolderRisk::new(dec!(25))),
            RiskModule::Fraud(FraudRisk::new(true, false, false, false)),
        ]);
        let names: Vec<String> = tied.top_contributors(3).into_iter().map(|c| c.module).collect();
        assert_eq!(names, vec!["holder", "fraud"]);
    }

    #[test]
    fn test_overall_rounds_to_two_places() {
        let engine = RiskEngine::new(vec![
            RiskModule::Holder(HolderRisk::new(dec!(10))),
            RiskModule::Holder(HolderRisk::new(dec!(10))),
            RiskModule::Holder(HolderRisk::new(dec!(11))),
        ]);
        assert_eq!(engine.overall_score(), dec!(10.33));
    }

    #[test]
    fn test_assess_flagged_document() {
        let doc = json!({
            "issues": [{"tags": [{"key": "hacker"}, {"key": "mixers"}, {"key": "is_proxy"}]}],
            "details": {"marketData": {"name": "Bad Coin", "symbol": "BAD", "market_cap_rank": 1}}
        });
        let assessment = RiskEngine::assess("0xbad", &doc);
        assert_eq!(assessment.address, "0xbad");
        assert_eq!(assessment.token_name, "Bad Coin");
        assert_eq!(assessment.risk_modules["fraud"].score, dec!(50));
        assert_eq!(assessment.risk_modules["governance"].score, dec!(33.33));
    }
}
