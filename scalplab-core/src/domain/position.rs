//! Position — the single open position the simulator may hold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::{Direction, RuleTag};

/// An open position. The simulator holds at most one at any instant —
/// no pyramiding, no hedging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub direction: Direction,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub units: f64,
    pub entry_time: DateTime<Utc>,
    pub entry_bar: usize,
    /// Entry-to-initial-stop distance, in points. Break-even triggers once
    /// favorable excursion reaches this.
    pub initial_risk: f64,
    /// Most favorable price reached since entry (highest for longs,
    /// lowest for shorts). Anchors the trailing stop.
    pub best_price: f64,
    /// Rule that opened the position, carried onto the trade record.
    pub rule: RuleTag,
    pub reason: String,
}

impl Position {
    pub fn new(
        direction: Direction,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
        units: f64,
        entry_time: DateTime<Utc>,
        entry_bar: usize,
        rule: RuleTag,
        reason: String,
    ) -> Self {
        let initial_risk = (entry_price - stop_loss).abs();
        Self {
            direction,
            entry_price,
            stop_loss,
            take_profit,
            units,
            entry_time,
            entry_bar,
            initial_risk,
            best_price: entry_price,
            rule,
            reason,
        }
    }

    /// Favorable excursion in points: how far the best price has moved in
    /// the position's direction since entry. Never negative.
    pub fn favorable_excursion(&self) -> f64 {
        ((self.best_price - self.entry_price) * self.direction.sign()).max(0.0)
    }

    /// Update the excursion anchor from a bar's extremes.
    pub fn track_excursion(&mut self, high: f64, low: f64) {
        match self.direction {
            Direction::Buy => {
                if high > self.best_price {
                    self.best_price = high;
                }
            }
            Direction::Sell => {
                if low < self.best_price {
                    self.best_price = low;
                }
            }
        }
    }

    /// Whether the stop already sits at or beyond break-even.
    pub fn at_breakeven(&self) -> bool {
        match self.direction {
            Direction::Buy => self.stop_loss >= self.entry_price - 1e-10,
            Direction::Sell => self.stop_loss <= self.entry_price + 1e-10,
        }
    }

    /// Tighten the stop, never loosen it (ratchet invariant).
    ///
    /// For longs stops only move up; for shorts only down. Returns the stop
    /// actually applied.
    pub fn ratchet_stop(&mut self, proposed: f64) -> f64 {
        let clamped = match self.direction {
            Direction::Buy => proposed.max(self.stop_loss),
            Direction::Sell => proposed.min(self.stop_loss),
        };
        self.stop_loss = clamped;
        clamped
    }

    /// Unrealized P&L in points at a given price.
    pub fn unrealized_points(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.direction.sign()
    }
}
