use chainwatch_ports::RiskFactor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::{RiskEngine, TOP_CONTRIBUTORS};
use crate::flags::TokenMetadata;
use crate::label::RiskLabel;

/// Score, label and reasoning of one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleScore {
    pub score: Decimal,
    pub label: RiskLabel,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub module: String,
    pub score: Decimal,
}

/// Full threat-assessment document for an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    pub address: String,
    pub token_name: String,
    pub token_symbol: String,
    pub market_cap: Option<Decimal>,
    pub current_price: Option<Decimal>,
    pub overall_risk_score: Decimal,
    pub overall_risk_level: RiskLabel,
    pub risk_modules: BTreeMap<String, ModuleScore>,
    pub top_risk_contributors: Vec<Contributor>,
    pub message: String,
}

impl ThreatAssessment {
    pub fn build(address: &str, metadata: TokenMetadata, engine: &RiskEngine) -> Self {
        let (overall_risk_score, overall_risk_level) = engine.overall_risk();
        let risk_modules = engine
            .modules()
            .iter()
            .map(|m| {
                let score = m.score();
                let entry = ModuleScore {
                    score,
                    label: RiskLabel::from_score(score),
                    explanation: m.explain(),
                };
                (m.name().to_string(), entry)
            })
            .collect();

        Self {
            address: address.to_string(),
            token_name: metadata.name,
            token_symbol: metadata.symbol,
            market_cap: metadata.market_cap,
            current_price: metadata.current_price,
            overall_risk_score,
            overall_risk_level,
            risk_modules,
            top_risk_contributors: engine.top_contributors(TOP_CONTRIBUTORS),
            message: format!("Threat assessment completed - Overall Risk: {overall_risk_level}"),
        }
    }
}
