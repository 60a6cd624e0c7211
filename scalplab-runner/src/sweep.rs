//! Parallel strategy sweeps.
//!
//! Runs several configurations over the same bar series, one rayon task
//! per run. Each simulation stays single-threaded so its bar loop keeps
//! strict ordering; parallelism exists only across independent runs.

use rayon::prelude::*;

use scalplab_core::Bar;

use crate::config::RunConfig;
use crate::runner::{run_single_backtest, BacktestReport, RunnerError};

/// Run every config against the same bars and rank the survivors by net
/// profit, best first. Failed runs are returned separately with their
/// config's run ID, not silently dropped.
pub fn run_sweep(
    configs: &[RunConfig],
    bars: &[Bar],
) -> (Vec<BacktestReport>, Vec<(String, RunnerError)>) {
    let outcomes: Vec<Result<BacktestReport, (String, RunnerError)>> = configs
        .par_iter()
        .map(|config| run_single_backtest(config, bars).map_err(|e| (config.run_id(), e)))
        .collect();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(failure) => failures.push(failure),
        }
    }
    reports.sort_by(|a, b| b.summary.net_profit.total_cmp(&a.summary.net_profit));
    (reports, failures)
}
