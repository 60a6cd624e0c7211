//! Performance metrics — pure functions over the trade list.
//!
//! Every metric takes trades (and the starting balance) and returns a
//! scalar. Nothing here touches the engine or the data layer.

use serde::{Deserialize, Serialize};

use scalplab_core::Trade;

/// Aggregate statistics for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub net_profit: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    /// Largest peak-to-trough equity drop over the trade sequence, in
    /// account currency (non-negative).
    pub max_drawdown: f64,
}

impl Summary {
    pub fn compute(trades: &[Trade], initial_balance: f64) -> Self {
        Self {
            total_trades: trades.len(),
            wins: wins(trades),
            losses: losses(trades),
            win_rate: win_rate(trades),
            net_profit: net_profit(trades),
            gross_profit: gross_profit(trades),
            gross_loss: gross_loss(trades),
            profit_factor: profit_factor(trades),
            max_drawdown: max_drawdown(trades, initial_balance),
        }
    }
}

pub fn wins(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.profit_loss > 0.0).count()
}

pub fn losses(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.profit_loss < 0.0).count()
}

/// Fraction of trades that made money. Zero for an empty list.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    wins(trades) as f64 / trades.len() as f64
}

pub fn net_profit(trades: &[Trade]) -> f64 {
    trades.iter().map(|t| t.profit_loss).sum()
}

pub fn gross_profit(trades: &[Trade]) -> f64 {
    trades
        .iter()
        .filter(|t| t.profit_loss > 0.0)
        .map(|t| t.profit_loss)
        .sum()
}

/// Sum of losing trades' magnitudes (non-negative).
pub fn gross_loss(trades: &[Trade]) -> f64 {
    trades
        .iter()
        .filter(|t| t.profit_loss < 0.0)
        .map(|t| -t.profit_loss)
        .sum()
}

/// Gross profit over gross loss, capped at 100 when there are no losses.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let profit = gross_profit(trades);
    let loss = gross_loss(trades);
    if loss < 1e-10 {
        return if profit > 0.0 { 100.0 } else { 0.0 };
    }
    (profit / loss).min(100.0)
}

/// Maximum peak-to-trough drop of the post-trade equity sequence, in
/// dollars.
pub fn max_drawdown(trades: &[Trade], initial_balance: f64) -> f64 {
    let mut equity = initial_balance;
    let mut peak = initial_balance;
    let mut worst = 0.0f64;
    for trade in trades {
        equity += trade.profit_loss;
        if equity > peak {
            peak = equity;
        }
        worst = worst.max(peak - equity);
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scalplab_core::{Direction, ExitReason, RuleTag};

    fn trade(profit_loss: f64) -> Trade {
        let entry = chrono::Utc.with_ymd_and_hms(2024, 10, 1, 14, 0, 0).unwrap();
        Trade {
            direction: Direction::Buy,
            entry_bar: 0,
            entry_time: entry,
            entry_price: 100.0,
            exit_bar: 1,
            exit_time: entry + chrono::Duration::minutes(5),
            exit_price: 101.0,
            units: 1.0,
            stop_loss: 98.0,
            take_profit: 106.0,
            profit_loss,
            exit: ExitReason::TakeProfit,
            rule: RuleTag::MaCrossover,
            reason: "test".into(),
        }
    }

    #[test]
    fn empty_trade_list_summary_is_flat() {
        let summary = Summary::compute(&[], 150_000.0);
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.profit_factor, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
    }

    #[test]
    fn summary_aggregates_wins_and_losses() {
        let trades = vec![trade(500.0), trade(-200.0), trade(300.0), trade(-100.0)];
        let summary = Summary::compute(&trades, 150_000.0);
        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 2);
        assert_eq!(summary.win_rate, 0.5);
        assert_eq!(summary.net_profit, 500.0);
        assert_eq!(summary.gross_profit, 800.0);
        assert_eq!(summary.gross_loss, 300.0);
        assert!((summary.profit_factor - 800.0 / 300.0).abs() < 1e-10);
    }

    #[test]
    fn profit_factor_capped_without_losses() {
        let trades = vec![trade(500.0), trade(300.0)];
        assert_eq!(profit_factor(&trades), 100.0);
    }

    #[test]
    fn drawdown_is_peak_to_trough() {
        // Up 1000, down 1500, up 200: worst gap is 1500 from the peak.
        let trades = vec![trade(1_000.0), trade(-1_500.0), trade(200.0)];
        assert_eq!(max_drawdown(&trades, 150_000.0), 1_500.0);
    }

    #[test]
    fn breakeven_trades_count_as_neither() {
        let trades = vec![trade(0.0), trade(100.0)];
        assert_eq!(wins(&trades), 1);
        assert_eq!(losses(&trades), 0);
        assert_eq!(win_rate(&trades), 0.5);
    }
}
