//! Chainwatch Runner - Analysis Orchestration
//!
//! Wires provider documents through normalization, the detectors and the risk
//! engine, and renders the results.
//!
//! - **Config**: JSON-loaded thresholds with sensitivity presets
//! - **Token**: wash trading, price manipulation and pump & dump with a composite score
//! - **Pool**: liquidity manipulation, concentrated attacks and domination
//! - **Wallet**: insider entries and sniping-bot profile
//! - **Report**: plain-text and JSON output
//!
//! ## Flow
//!
//! ```text
//!  provider JSON ──► normalize_events ──► detectors ──► Analysis ──► report
//!        │                                                 ▲
//!        └──────────── risk-flags doc ──► RiskEngine ──────┘
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod pool;
pub mod report;
pub mod token;
pub mod wallet;

pub use analysis::{Analysis, AnalysisKind, RunOptions, run};
pub use config::{AnalysisConfig, ReportLimits};
pub use error::{ConfigError, RunnerError, RunnerResult};
pub use pool::PoolAnalysis;
pub use token::{TokenAnalysis, TokenRiskLevel, composite_score};
pub use wallet::WalletAnalysis;
