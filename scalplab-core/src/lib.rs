//! Bar-driven strategy evaluation and trade simulation.
//!
//! The crate walks OHLCV bar series through rolling indicators, ICT-style
//! pattern detectors, and pluggable signal strategies, then simulates a
//! single-position account with break-even and trailing stop management
//! under a session and risk policy. Everything is deterministic: the same
//! bars and configuration always yield the same trades.
//!
//! `engine::run_backtest` is the main entry point; `engine::Simulator`
//! exposes the same state machine one bar at a time for live use.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod patterns;
pub mod risk;
pub mod signals;

pub use config::{EngineConfig, StopModel, StrategyKind};
pub use domain::{AccountState, Bar, Direction, ExitReason, Position, RuleTag, Signal, Trade};
pub use engine::{run_backtest, Halt, RunResult, Simulator};
pub use error::EngineError;
