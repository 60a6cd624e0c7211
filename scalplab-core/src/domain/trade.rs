//! Trade — a completed round-trip, immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::{Direction, RuleTag};

/// Why a position closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Stop hit after it had been moved to (or beyond) break-even.
    TrailingStop,
    /// Force-closed at the end of the bar series.
    DataEnd,
}

/// A complete round-trip trade record: entry to exit.
///
/// Created exactly once per closed position. The ledger consumes these;
/// nothing else mutates account state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,
    pub entry_bar: usize,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_bar: usize,
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,
    pub units: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Realized P&L in account currency: points * direction * units * tick value.
    pub profit_loss: f64,
    pub exit: ExitReason,
    pub rule: RuleTag,
    /// Confluence description from the originating signal.
    pub reason: String,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.profit_loss > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }

    /// Points captured, signed in the trade's favor.
    pub fn points(&self) -> f64 {
        (self.exit_price - self.entry_price) * self.direction.sign()
    }
}
