//! Chainwatch Ports
//!
//! Trait definitions for the Chainwatch detection engine.
//! These define the boundaries between detectors, risk modules and the
//! orchestration layer that feeds them.

mod detector;
mod error;
mod risk;

pub use detector::{Detector, normalize_events};
pub use error::{AnalysisError, AnalysisResult};
pub use risk::RiskFactor;
