//! Backtest engine: indicator precomputation plus the bar loop.

pub mod ledger;
pub mod simulator;

pub use ledger::Halt;
pub use simulator::{Simulator, SkipCounts};

use serde::Serialize;

use crate::config::{EngineConfig, IndicatorParams};
use crate::domain::{validate_series, AccountState, Bar, Trade};
use crate::error::EngineError;
use crate::indicators::{Atr, Bollinger, Ema, Indicator, IndicatorValues, Rsi, Vwap};

/// Outcome of one complete backtest.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub strategy: String,
    pub bar_count: usize,
    /// Signals the strategy fired, whether or not they became positions.
    pub signal_count: u64,
    pub trades: Vec<Trade>,
    pub account: AccountState,
    pub halt: Option<Halt>,
    pub skips: SkipCounts,
}

/// The indicator set every strategy draws from, built once per run.
pub fn build_indicators(params: &IndicatorParams) -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Ema::new(params.ema_fast)),
        Box::new(Ema::new(params.ema_slow)),
        Box::new(Rsi::new(params.rsi_period)),
        Box::new(Atr::new(params.atr_period)),
        Box::new(Bollinger::upper(params.bollinger_period, params.bollinger_mult)),
        Box::new(Bollinger::middle(params.bollinger_period, params.bollinger_mult)),
        Box::new(Bollinger::lower(params.bollinger_period, params.bollinger_mult)),
        Box::new(Vwap::new()),
    ]
}

/// Run the configured strategy over a bar series.
///
/// Deterministic: the same bars and configuration always produce the same
/// result.
pub fn run_backtest(bars: &[Bar], config: &EngineConfig) -> Result<RunResult, EngineError> {
    if bars.is_empty() {
        return Err(EngineError::NoData);
    }
    validate_series(bars).map_err(EngineError::MalformedSeries)?;

    let mut simulator = Simulator::new(config.clone())?;
    let indicators = build_indicators(&config.indicators);
    let values = IndicatorValues::compute_all(&indicators, bars);
    for index in 0..bars.len() {
        simulator.step(bars, index, &values);
    }
    simulator.finish(bars);

    let (trades, account, halt, signal_count, skips) = simulator.into_parts();
    Ok(RunResult {
        strategy: config.strategy.name().to_string(),
        bar_count: bars.len(),
        signal_count,
        trades,
        account,
        halt,
        skips,
    })
}
