//! Account ledger.
//!
//! The single place where trades touch account state. Applies realized
//! P&L, maintains the peak-balance watermark and daily counters, latches
//! the evaluation flag, and reports a halt when the drawdown budget is
//! exhausted.

use serde::{Deserialize, Serialize};

use crate::config::AccountParams;
use crate::domain::{AccountState, Trade};

/// Simulation-ending condition raised by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Halt {
    /// Peak-to-trough drawdown reached the account budget. No further
    /// entries are taken after this.
    DrawdownBreached,
}

/// Apply one closed trade to the account. Returns a halt if the trade
/// pushed drawdown through the budget.
pub fn apply_trade(
    state: &mut AccountState,
    params: &AccountParams,
    trade: &Trade,
) -> Option<Halt> {
    state.balance += trade.profit_loss;
    if state.balance > state.peak_balance {
        state.peak_balance = state.balance;
    }
    if trade.profit_loss >= 0.0 {
        state.daily_profit += trade.profit_loss;
    } else {
        state.daily_loss += -trade.profit_loss;
    }
    state.trades_today += 1;
    if state.cumulative_profit() >= params.profit_target {
        state.evaluation_passed = true;
    }
    if state.drawdown() >= params.max_drawdown {
        Some(Halt::DrawdownBreached)
    } else {
        None
    }
}
