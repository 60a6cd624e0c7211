//! Property tests over randomized bar series.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use scalplab_core::config::MaCrossoverParams;
use scalplab_core::engine::run_backtest;
use scalplab_core::indicators::{Atr, Ema, Indicator, Rsi};
use scalplab_core::risk::{SessionConfig, TradingWindow};
use scalplab_core::{Bar, EngineConfig, ExitReason, StrategyKind};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 13, 45, 0).unwrap()
}

/// Build a plausible bar series from close prices: open chains from the
/// previous close, extremes pad the body by one point.
fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base_time() + chrono::Duration::minutes(5 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(1.0),
                close,
                volume: 1_000.0 + (i % 7) as f64 * 250.0,
            }
        })
        .collect()
}

fn close_series() -> impl Strategy<Value = Vec<f64>> {
    // A random walk that stays well away from zero.
    proptest::collection::vec(-3.0f64..3.0, 30..120).prop_map(|deltas| {
        let mut price = 100.0;
        deltas
            .into_iter()
            .map(|d| {
                price = (price + d).max(20.0);
                price
            })
            .collect()
    })
}

fn test_config() -> EngineConfig {
    let mut config = EngineConfig::new(StrategyKind::MaCrossover(MaCrossoverParams::default()));
    // All-day window so entries depend only on the tape.
    config.session = SessionConfig {
        utc_offset_hours: -4,
        windows: vec![TradingWindow::new(
            chrono::NaiveTime::MIN,
            chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
        )],
    };
    config
}

proptest! {
    /// Indicator values over a prefix equal the truncated full-series
    /// values: nothing at bar t depends on bars after t.
    #[test]
    fn indicators_are_causal(closes in close_series(), cut in 20usize..30) {
        let bars = bars_from_closes(&closes);
        prop_assume!(cut < bars.len());
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Ema::new(5)),
            Box::new(Ema::new(20)),
            Box::new(Rsi::new(9)),
            Box::new(Atr::new(14)),
        ];
        for ind in &indicators {
            let full = ind.compute(&bars);
            let prefix = ind.compute(&bars[..cut]);
            for (i, (a, b)) in prefix.iter().zip(full.iter()).enumerate() {
                prop_assert!(
                    (a.is_nan() && b.is_nan()) || (a - b).abs() < 1e-9,
                    "{} diverges at bar {i}: prefix {a}, full {b}",
                    ind.name()
                );
            }
        }
    }

    /// Trades never overlap: the account holds one position at a time and
    /// every exit is at or after its entry.
    #[test]
    fn at_most_one_open_position(closes in close_series()) {
        let bars = bars_from_closes(&closes);
        let result = run_backtest(&bars, &test_config()).unwrap();
        let mut last_exit = 0usize;
        for trade in &result.trades {
            prop_assert!(trade.exit_bar >= trade.entry_bar);
            prop_assert!(trade.entry_bar >= last_exit);
            last_exit = trade.exit_bar;
        }
    }

    /// Realized P&L is exactly points times units times tick value.
    #[test]
    fn profit_matches_points(closes in close_series()) {
        let bars = bars_from_closes(&closes);
        let config = test_config();
        let result = run_backtest(&bars, &config).unwrap();
        for trade in &result.trades {
            let expected = trade.points() * trade.units * config.account.tick_value;
            prop_assert!((trade.profit_loss - expected).abs() < 1e-6);
            prop_assert!(trade.units >= 1.0);
            prop_assert!(trade.units <= config.account.max_units);
        }
    }

    /// Exit reasons agree with the money: stops before break-even never
    /// profit, targets always do, trailing stops never lose.
    #[test]
    fn exit_reasons_match_outcomes(closes in close_series()) {
        let bars = bars_from_closes(&closes);
        let result = run_backtest(&bars, &test_config()).unwrap();
        for trade in &result.trades {
            match trade.exit {
                ExitReason::StopLoss => prop_assert!(trade.profit_loss < 0.0),
                ExitReason::TakeProfit => prop_assert!(trade.profit_loss > 0.0),
                ExitReason::TrailingStop => prop_assert!(trade.profit_loss >= -1e-6),
                ExitReason::DataEnd => {
                    let lo = trade.stop_loss.min(trade.take_profit);
                    let hi = trade.stop_loss.max(trade.take_profit);
                    prop_assert!(trade.exit_price >= lo && trade.exit_price <= hi);
                }
            }
        }
    }

    /// Account arithmetic: final balance is the start plus the sum of all
    /// trade P&L, and the peak never drops below the balance.
    #[test]
    fn ledger_balances(closes in close_series()) {
        let bars = bars_from_closes(&closes);
        let result = run_backtest(&bars, &test_config()).unwrap();
        let total: f64 = result.trades.iter().map(|t| t.profit_loss).sum();
        let expected = result.account.initial_balance() + total;
        prop_assert!((result.account.balance - expected).abs() < 1e-6);
        prop_assert!(result.account.peak_balance >= result.account.balance);
        prop_assert!(result.account.daily_loss >= 0.0);
        prop_assert!(result.account.daily_profit >= 0.0);
    }

    /// Same bars, same configuration, same outcome.
    #[test]
    fn runs_are_deterministic(closes in close_series()) {
        let bars = bars_from_closes(&closes);
        let config = test_config();
        let a = run_backtest(&bars, &config).unwrap();
        let b = run_backtest(&bars, &config).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
