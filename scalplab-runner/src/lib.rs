//! Backtest orchestration around the scalplab engine.
//!
//! The runner owns everything outside the simulation itself: loading bar
//! series from CSV feeds, reproducible run configuration with
//! content-addressed IDs, performance summaries, report export, and
//! rayon-parallel sweeps across independent configurations.

pub mod config;
pub mod data;
pub mod export;
pub mod metrics;
pub mod runner;
pub mod sweep;

pub use config::{ConfigError, RunConfig, RunId};
pub use data::{load_bars_csv, BarProvider, CsvBarProvider, LoadError};
pub use export::{write_report_json, write_trades_csv, ExportError};
pub use metrics::Summary;
pub use runner::{run_from_provider, run_single_backtest, BacktestReport, RunnerError};
pub use sweep::run_sweep;
