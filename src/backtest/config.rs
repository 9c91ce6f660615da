// src/backtest/config.rs
// Backtest configuration with TOML loading and validation

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backtest::error::ConfigError;

/// All tunables for a backtest run. Every field has a default, so a partial
/// TOML file (or none at all) is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Starting cash per ticker
    pub initial_balance: f64,
    /// Stop distance as a fraction of ATR-scaled risk per share
    pub stop_loss_percent: f64,
    pub take_profit_percent: f64,
    /// Commission charged on notional, both sides
    pub commission_percent: f64,
    /// Adverse fill adjustment applied on entry
    pub slippage_percent: f64,
    /// Fraction of cash put at risk per entry
    pub risk_percent: f64,
    /// Bars to sit out after the loss streak trips
    pub cooling_off_period: u32,
    /// Consecutive stop-loss exits that trigger the cooling-off window
    pub max_loss_count: u32,
    /// Hard cap on shares per position
    pub max_shares: u64,
    /// Buy votes needed for a BUY signal
    pub buy_threshold: u32,
    /// Sell votes needed for a SELL signal
    pub sell_threshold: u32,
    /// Per-bar risk-free rate subtracted in the Sharpe numerator
    pub risk_free_rate: f64,
    /// When true, exits are also suppressed while cooling off
    pub cooling_off_blocks_exits: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            stop_loss_percent: 0.03,
            take_profit_percent: 0.05,
            commission_percent: 0.001,
            slippage_percent: 0.0005,
            risk_percent: 0.02,
            cooling_off_period: 5,
            max_loss_count: 3,
            max_shares: 1_000,
            buy_threshold: 3,
            sell_threshold: 3,
            risk_free_rate: 0.0,
            cooling_off_blocks_exits: true,
        }
    }
}

impl BacktestConfig {
    /// Load from a TOML file, falling back to defaults for missing fields
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.initial_balance > 0.0) {
            return Err(invalid("initial_balance", "must be positive"));
        }
        if !(self.risk_percent > 0.0 && self.risk_percent <= 1.0) {
            return Err(invalid("risk_percent", "must be in (0, 1]"));
        }
        if !(self.stop_loss_percent > 0.0) {
            return Err(invalid("stop_loss_percent", "must be positive"));
        }
        if !(self.take_profit_percent > 0.0) {
            return Err(invalid("take_profit_percent", "must be positive"));
        }
        if !(self.commission_percent >= 0.0) {
            return Err(invalid("commission_percent", "must be non-negative"));
        }
        if !(self.slippage_percent >= 0.0) {
            return Err(invalid("slippage_percent", "must be non-negative"));
        }
        if self.max_shares == 0 {
            return Err(invalid("max_shares", "must be at least 1"));
        }
        if self.buy_threshold == 0 {
            return Err(invalid("buy_threshold", "must be at least 1"));
        }
        if self.sell_threshold == 0 {
            return Err(invalid("sell_threshold", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BacktestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_balance() {
        let config = BacktestConfig {
            initial_balance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "initial_balance",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan_risk() {
        let config = BacktestConfig {
            risk_percent: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_balance = 50000.0\nbuy_threshold = 4").unwrap();

        let config = BacktestConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.initial_balance, 50_000.0);
        assert_eq!(config.buy_threshold, 4);
        assert_eq!(config.sell_threshold, 3);
        assert_eq!(config.cooling_off_period, 5);
    }

    #[test]
    fn test_invalid_toml_field_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_shares = 0").unwrap();
        assert!(BacktestConfig::from_toml_file(file.path()).is_err());
    }
}
