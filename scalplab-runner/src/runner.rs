//! Single-run orchestration.

use serde::Serialize;
use thiserror::Error;

use scalplab_core::engine::run_backtest;
use scalplab_core::{Bar, EngineError, RunResult};

use crate::config::{RunConfig, RunId};
use crate::data::{BarProvider, LoadError};
use crate::metrics::Summary;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Everything a run produces, ready for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub run_id: RunId,
    pub symbol: String,
    pub result: RunResult,
    pub summary: Summary,
}

/// Run one backtest over bars already in memory.
pub fn run_single_backtest(config: &RunConfig, bars: &[Bar]) -> Result<BacktestReport, RunnerError> {
    config.validate()?;
    let result = run_backtest(bars, &config.engine)?;
    let summary = Summary::compute(&result.trades, result.account.initial_balance());
    Ok(BacktestReport {
        run_id: config.run_id(),
        symbol: config.symbol.clone(),
        result,
        summary,
    })
}

/// Fetch bars through a provider and run.
pub fn run_from_provider(
    config: &RunConfig,
    provider: &dyn BarProvider,
) -> Result<BacktestReport, RunnerError> {
    config.validate()?;
    let bars = provider.fetch(&config.symbol, config.start_date, config.end_date)?;
    run_single_backtest(config, &bars)
}
