//! AccountState — the balance and daily bookkeeping one simulation owns.
//!
//! The state is an explicit value owned by a single simulation, so
//! independent runs cannot observe each other.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Running account state, mutated only by the ledger after each trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    pub balance: f64,
    /// Monotone non-decreasing. Drawdown = peak_balance - balance.
    pub peak_balance: f64,
    /// Sum of winning trades' P&L for the current session day.
    pub daily_profit: f64,
    /// Sum of losing trades' P&L magnitudes for the current session day (>= 0).
    pub daily_loss: f64,
    pub trades_today: u32,
    /// Session day the daily counters belong to. None until the first bar.
    pub last_trading_day: Option<NaiveDate>,
    /// Set once cumulative profit over the starting balance crosses the
    /// evaluation target; never cleared.
    pub evaluation_passed: bool,
    initial_balance: f64,
}

impl AccountState {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance,
            peak_balance: initial_balance,
            daily_profit: 0.0,
            daily_loss: 0.0,
            trades_today: 0,
            last_trading_day: None,
            evaluation_passed: false,
            initial_balance,
        }
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    pub fn drawdown(&self) -> f64 {
        self.peak_balance - self.balance
    }

    /// Cumulative profit over the starting balance.
    pub fn cumulative_profit(&self) -> f64 {
        self.balance - self.initial_balance
    }

    /// Reset the daily counters if `day` differs from the recorded session
    /// day. Returns true when a reset happened. Idempotent within a day.
    pub fn roll_day(&mut self, day: NaiveDate) -> bool {
        if self.last_trading_day == Some(day) {
            return false;
        }
        self.last_trading_day = Some(day);
        self.daily_profit = 0.0;
        self.daily_loss = 0.0;
        self.trades_today = 0;
        true
    }
}
