//! Signal — a directional entry decision emitted by a signal generator.
//!
//! Signals are account-agnostic: generators receive bar history, indicator
//! values, and pattern snapshots, never position or account state. A signal
//! describes a market event; whether it becomes a trade is the simulator's
//! and risk policy's decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional intent of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// +1.0 for Buy, -1.0 for Sell. Multiplied into P&L.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
        }
    }
}

/// The rule that originated a signal. Closed set so strategies can be
/// matched exhaustively in reports and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTag {
    IctComposite,
    OpeningRangeBreakout,
    BreakoutPullback,
    VwapEmaBounce,
    MeanReversion,
    OrderBlockBreak,
    MaCrossover,
    BollingerSqueeze,
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleTag::IctComposite => "ict_composite",
            RuleTag::OpeningRangeBreakout => "opening_range_breakout",
            RuleTag::BreakoutPullback => "breakout_pullback",
            RuleTag::VwapEmaBounce => "vwap_ema_bounce",
            RuleTag::MeanReversion => "mean_reversion",
            RuleTag::OrderBlockBreak => "order_block_break",
            RuleTag::MaCrossover => "ma_crossover",
            RuleTag::BollingerSqueeze => "bollinger_squeeze",
        };
        f.write_str(s)
    }
}

/// An entry decision for one bar. At most one signal per bar is realized
/// into a trade under the single-position constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub rule: RuleTag,
    /// Human-readable confluence description carried onto the trade record.
    pub reason: String,
}
