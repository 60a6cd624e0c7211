//! Serializable run configuration.
//!
//! A `RunConfig` captures everything needed to reproduce a backtest: the
//! instrument, the date range, and the full engine configuration. Its
//! blake3 hash is the run ID, so identical configs always map to the
//! same report name.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use scalplab_core::EngineConfig;

/// Content-addressable identifier for one run.
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid run config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Engine(#[from] scalplab_core::EngineError),
}

/// Complete, reproducible description of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Instrument label carried onto reports (e.g. "MES", "MNQ").
    pub symbol: String,
    /// First session date the run covers (inclusive).
    pub start_date: NaiveDate,
    /// Last session date the run covers (inclusive).
    pub end_date: NaiveDate,
    /// Full engine configuration: strategy, account, session, stops.
    pub engine: EngineConfig,
}

impl RunConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: RunConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs no simulation could honor. The future-date check
    /// guards against a fat-fingered year requesting bars that cannot
    /// exist yet.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::Invalid(
                "start_date must not be after end_date".into(),
            ));
        }
        let today = Utc::now().date_naive();
        if self.start_date > today {
            return Err(ConfigError::Invalid(format!(
                "start_date {} is in the future",
                self.start_date
            )));
        }
        self.engine.validate()?;
        Ok(())
    }

    /// Deterministic hash ID for this configuration. Two identical
    /// configs produce the same ID and can share cached reports.
    pub fn run_id(&self) -> RunId {
        // RunConfig is a closed serde tree, serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalplab_core::config::{MaCrossoverParams, StrategyKind};

    fn sample_config() -> RunConfig {
        RunConfig {
            symbol: "MES".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 10, 4).unwrap(),
            engine: EngineConfig::new(StrategyKind::MaCrossover(MaCrossoverParams::default())),
        }
    }

    #[test]
    fn run_id_is_deterministic() {
        let config = sample_config();
        assert_eq!(config.run_id(), config.run_id());
        assert_eq!(config.run_id().len(), 64);
    }

    #[test]
    fn run_id_changes_with_params() {
        let a = sample_config();
        let mut b = sample_config();
        b.engine.account.risk_budget = 2_000.0;
        assert_ne!(a.run_id(), b.run_id());
    }

    #[test]
    fn future_start_date_is_rejected() {
        let mut config = sample_config();
        config.start_date = Utc::now().date_naive() + chrono::Duration::days(30);
        config.end_date = config.start_date;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let mut config = sample_config();
        config.end_date = config.start_date - chrono::Duration::days(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn degenerate_engine_config_is_rejected() {
        let mut config = sample_config();
        config.engine.account.risk_budget = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Engine(_))));
    }

    #[test]
    fn toml_roundtrip() {
        let config = sample_config();
        let text = toml::to_string(&config).unwrap();
        let back: RunConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
