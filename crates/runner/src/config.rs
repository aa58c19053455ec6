//! Analysis configuration
//!
//! Loaded from JSON. Every section is optional: the sensitivity preset fills
//! in wash/price/pump thresholds unless an explicit section overrides them.
//!
//! ```json
//! {
//!   "sensitivity": "high",
//!   "pump_dump": { "min_events": 20 },
//!   "insider": { "min_suspicion_score": "40" },
//!   "report": { "top_wallets": 5 }
//! }
//! ```

use chainwatch_detectors::{
    ConcentratedAttackConfig, InsiderTradingConfig, LiquidityManipulationConfig, PoolDominationConfig,
    PriceManipulationConfig, PumpDumpConfig, Sensitivity, SnipingBotConfig, WashTradingConfig,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// How much of each finding list the text report prints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLimits {
    pub top_wallets: usize,
    pub max_events: usize,
    pub max_schemes: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            top_wallets: 10,
            max_events: 10,
            max_schemes: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sensitivity: Sensitivity,

    /// Overrides the sensitivity preset when present
    pub wash_trading: Option<WashTradingConfig>,
    pub price_manipulation: Option<PriceManipulationConfig>,
    pub pump_dump: Option<PumpDumpConfig>,

    pub liquidity_manipulation: LiquidityManipulationConfig,
    pub concentrated_attack: ConcentratedAttackConfig,
    pub pool_domination: PoolDominationConfig,

    pub insider: InsiderTradingConfig,
    pub sniping: SnipingBotConfig,

    pub report: ReportLimits,
}

impl AnalysisConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_sensitivity(sensitivity: Sensitivity) -> Self {
        Self {
            sensitivity,
            ..Default::default()
        }
    }

    pub fn wash_trading(&self) -> WashTradingConfig {
        self.wash_trading
            .clone()
            .unwrap_or_else(|| self.sensitivity.wash_trading())
    }

    pub fn price_manipulation(&self) -> PriceManipulationConfig {
        self.price_manipulation
            .clone()
            .unwrap_or_else(|| self.sensitivity.price_manipulation())
    }

    pub fn pump_dump(&self) -> PumpDumpConfig {
        self.pump_dump
            .clone()
            .unwrap_or_else(|| self.sensitivity.pump_dump())
    }

    /// Reject negative thresholds and empty windows
    pub fn validate(&self) -> Result<(), ConfigError> {
        let wash = self.wash_trading();
        if wash.time_window_minutes <= 0 {
            return Err(invalid("wash_trading.time_window_minutes must be positive"));
        }
        non_negative("wash_trading.price_deviation_threshold", wash.price_deviation_threshold)?;
        non_negative("wash_trading.min_volume_usd", wash.min_volume_usd)?;

        let price = self.price_manipulation();
        if price.rolling_window == 0 {
            return Err(invalid("price_manipulation.rolling_window must be positive"));
        }
        non_negative("price_manipulation.price_spike_threshold", price.price_spike_threshold)?;
        non_negative("price_manipulation.volume_multiplier", price.volume_multiplier)?;
        non_negative("price_manipulation.min_value_usd", price.min_value_usd)?;

        let pump = self.pump_dump();
        if pump.time_window_hours <= 0 {
            return Err(invalid("pump_dump.time_window_hours must be positive"));
        }
        if pump.lookback_trades == 0 {
            return Err(invalid("pump_dump.lookback_trades must be positive"));
        }
        non_negative("pump_dump.pump_threshold", pump.pump_threshold)?;
        non_negative("pump_dump.dump_threshold", pump.dump_threshold)?;
        non_negative("pump_dump.min_dump_volume", pump.min_dump_volume)?;

        if self.liquidity_manipulation.rug_recent_window == 0 {
            return Err(invalid("liquidity_manipulation.rug_recent_window must be positive"));
        }
        non_negative("liquidity_manipulation.rug_min_value", self.liquidity_manipulation.rug_min_value)?;
        non_negative("liquidity_manipulation.dump_min_value", self.liquidity_manipulation.dump_min_value)?;

        non_negative("pool_domination.max_tx_pct", self.pool_domination.max_tx_pct)?;
        non_negative("pool_domination.max_volume_pct", self.pool_domination.max_volume_pct)?;

        non_negative("insider.min_suspicion_score", self.insider.min_suspicion_score)?;

        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}

fn non_negative(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::Invalid(format!("{field} must not be negative")));
    }
    Ok(())
}
