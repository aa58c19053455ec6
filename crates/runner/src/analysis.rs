//! Dispatch from a provider document to one analysis

use chainwatch_core::Timestamp;
use chainwatch_detectors::finding::Finding;
use chainwatch_detectors::{SandwichDetector, SandwichReport};
use chainwatch_ports::{Detector, normalize_events};
use chainwatch_risk_engine::{RiskEngine, ThreatAssessment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::config::AnalysisConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::pool::PoolAnalysis;
use crate::token::TokenAnalysis;
use crate::wallet::WalletAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Token,
    Sandwich,
    Pool,
    Wallet,
    Threat,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Token => "token",
            AnalysisKind::Sandwich => "sandwich",
            AnalysisKind::Pool => "pool",
            AnalysisKind::Wallet => "wallet",
            AnalysisKind::Threat => "threat",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "token" => Ok(AnalysisKind::Token),
            "sandwich" => Ok(AnalysisKind::Sandwich),
            "pool" => Ok(AnalysisKind::Pool),
            "wallet" => Ok(AnalysisKind::Wallet),
            "threat" => Ok(AnalysisKind::Threat),
            other => Err(RunnerError::UnknownAnalysis(other.to_string())),
        }
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analysis", rename_all = "lowercase")]
pub enum Analysis {
    Token(TokenAnalysis),
    Sandwich(SandwichReport),
    Pool(PoolAnalysis),
    Wallet(WalletAnalysis),
    Threat(ThreatAssessment),
}

impl Analysis {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Analysis::Token(_) => AnalysisKind::Token,
            Analysis::Sandwich(_) => AnalysisKind::Sandwich,
            Analysis::Pool(_) => AnalysisKind::Pool,
            Analysis::Wallet(_) => AnalysisKind::Wallet,
            Analysis::Threat(_) => AnalysisKind::Threat,
        }
    }

    /// Detector findings; empty for threat assessments
    pub fn findings(&self) -> Vec<Finding> {
        match self {
            Analysis::Token(a) => a.findings(),
            Analysis::Sandwich(r) => r.attacks.iter().cloned().map(Finding::from).collect(),
            Analysis::Pool(a) => a.findings(),
            Analysis::Wallet(a) => a.findings(),
            Analysis::Threat(_) => Vec::new(),
        }
    }
}

/// Options that only some analyses read
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Wallet filter for wallet analysis; address for threat assessment
    pub subject: Option<String>,
    /// Reference instant for entry ages; defaults to the latest event
    pub as_of: Option<Timestamp>,
}

/// Run one analysis over a provider document
///
/// Event analyses fail only when a non-empty batch yields no valid record.
pub fn run(kind: AnalysisKind, doc: &Value, config: &AnalysisConfig, options: &RunOptions) -> RunnerResult<Analysis> {
    let analysis = match kind {
        AnalysisKind::Threat => Analysis::Threat(RiskEngine::assess(&threat_address(doc, options), doc)),
        AnalysisKind::Token => Analysis::Token(TokenAnalysis::run(&normalize_events(doc)?.events, config)),
        AnalysisKind::Sandwich => Analysis::Sandwich(SandwichDetector::new().detect(&normalize_events(doc)?.events)),
        AnalysisKind::Pool => Analysis::Pool(PoolAnalysis::run(&normalize_events(doc)?.events, config)),
        AnalysisKind::Wallet => {
            let events = normalize_events(doc)?.events;
            let as_of = options
                .as_of
                .or_else(|| events.iter().map(|e| e.block_timestamp).max())
                .unwrap_or_default();
            Analysis::Wallet(WalletAnalysis::run(&events, options.subject.as_deref(), config, as_of))
        }
    };

    Ok(analysis)
}

fn threat_address(doc: &Value, options: &RunOptions) -> String {
    options
        .subject
        .clone()
        .or_else(|| doc.get("address").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Token".parse::<AnalysisKind>().unwrap(), AnalysisKind::Token);
        assert_eq!("threat".parse::<AnalysisKind>().unwrap(), AnalysisKind::Threat);
        assert!(matches!(
            "portfolio".parse::<AnalysisKind>(),
            Err(RunnerError::UnknownAnalysis(_))
        ));
    }

    #[test]
    fn test_empty_document_yields_empty_reports() {
        let config = AnalysisConfig::default();
        let analysis = run(AnalysisKind::Sandwich, &json!([]), &config, &RunOptions::default()).unwrap();
        assert_eq!(analysis.kind(), AnalysisKind::Sandwich);
        assert!(analysis.findings().is_empty());
    }

    #[test]
    fn test_total_loss_is_an_error() {
        let config = AnalysisConfig::default();
        let doc = json!([{"transactionType": "buy"}]);
        let err = run(AnalysisKind::Token, &doc, &config, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, RunnerError::Analysis(_)));
    }

    #[test]
    fn test_threat_address_from_options() {
        let options = RunOptions {
            subject: Some("0xfeed".to_string()),
            as_of: None,
        };
        let analysis = run(AnalysisKind::Threat, &json!({}), &AnalysisConfig::default(), &options).unwrap();
        match analysis {
            Analysis::Threat(assessment) => assert_eq!(assessment.address, "0xfeed"),
            other => panic!("expected threat assessment, got {:?}", other.kind()),
        }
    }
}
