//! Sensitivity presets
//!
//! One knob that scales the wash-trading, price-manipulation and
//! pump-and-dump thresholds together.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::price_manipulation::PriceManipulationConfig;
use crate::pump_dump::PumpDumpConfig;
use crate::wash_trading::WashTradingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Fewer, stronger findings
    Low,
    #[default]
    Medium,
    /// More findings, more false positives
    High,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "low",
            Sensitivity::Medium => "medium",
            Sensitivity::High => "high",
        }
    }

    pub fn wash_trading(&self) -> WashTradingConfig {
        WashTradingConfig::for_sensitivity(*self)
    }

    pub fn price_manipulation(&self) -> PriceManipulationConfig {
        PriceManipulationConfig::for_sensitivity(*self)
    }

    pub fn pump_dump(&self) -> PumpDumpConfig {
        PumpDumpConfig::for_sensitivity(*self)
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Sensitivity::Low),
            "medium" => Ok(Sensitivity::Medium),
            "high" => Ok(Sensitivity::High),
            other => Err(format!("unknown sensitivity '{other}' (expected low, medium or high)")),
        }
    }
}
