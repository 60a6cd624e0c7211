//! Bar-by-bar trade simulator.
//!
//! Holds at most one open position. Each `step` processes one bar in a
//! fixed order: roll the session day, manage the open position (exits
//! before stop management), then consider a new entry. Exits use the
//! bar's extremes with the stop checked before the target, so a bar that
//! touches both resolves against the position. A backtest drives `step`
//! over a full series; a live session feeds it one closing bar at a time.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, StopModel};
use crate::domain::{Bar, Direction, ExitReason, Position, Trade};
use crate::domain::AccountState;
use crate::engine::ledger::{self, Halt};
use crate::error::EngineError;
use crate::indicators::IndicatorValues;
use crate::patterns;
use crate::risk::{self, EntryBlock, GoldenContext};
use crate::signals::{self, SignalGenerator};

/// Why signals did not become positions, tallied per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    /// Signal fired outside the trading windows.
    pub out_of_window: u32,
    /// Daily loss cap lockout.
    pub loss_capped: u32,
    /// Daily trade throttle, setup not golden.
    pub throttled: u32,
    /// No valid stop distance or the risk budget bought less than one unit.
    pub not_sized: u32,
}

pub struct Simulator {
    config: EngineConfig,
    generator: Box<dyn SignalGenerator>,
    atr_key: String,
    rsi_key: String,
    ema_slow_key: String,
    state: AccountState,
    position: Option<Position>,
    trades: Vec<Trade>,
    halt: Option<Halt>,
    signal_count: u64,
    skips: SkipCounts,
}

impl Simulator {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let generator = signals::build(&config);
        let state = AccountState::new(config.account.initial_balance);
        Ok(Self {
            atr_key: format!("atr_{}", config.indicators.atr_period),
            rsi_key: format!("rsi_{}", config.indicators.rsi_period),
            ema_slow_key: format!("ema_{}", config.indicators.ema_slow),
            state,
            generator,
            config,
            position: None,
            trades: Vec::new(),
            halt: None,
            signal_count: 0,
            skips: SkipCounts::default(),
        })
    }

    pub fn warmup_bars(&self) -> usize {
        self.generator.warmup_bars()
    }

    pub fn state(&self) -> &AccountState {
        &self.state
    }

    pub fn open_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn halt(&self) -> Option<Halt> {
        self.halt
    }

    pub fn signal_count(&self) -> u64 {
        self.signal_count
    }

    pub fn skips(&self) -> SkipCounts {
        self.skips
    }

    /// Process the bar at `index`. May close the open position, open a
    /// new one, or do nothing.
    pub fn step(&mut self, bars: &[Bar], index: usize, indicators: &IndicatorValues) {
        let Some(bar) = bars.get(index) else { return };
        self.state
            .roll_day(self.config.session.session_day(bar.timestamp));

        let atr = indicators.get_valid(&self.atr_key, index);
        self.manage_position(bars, index, atr);

        if self.position.is_some() || self.halt.is_some() {
            return;
        }
        if index < self.generator.warmup_bars() {
            return;
        }
        self.consider_entry(bars, index, indicators, atr);
    }

    /// Force-close any open position at the end of the series. The exit
    /// price is the last close clamped into the stop/target band, since
    /// either level would already have closed the trade intrabar.
    pub fn finish(&mut self, bars: &[Bar]) {
        let Some(last) = bars.last() else { return };
        let index = bars.len() - 1;
        let clamped = match self.position.as_ref() {
            Some(pos) => {
                let lo = pos.stop_loss.min(pos.take_profit);
                let hi = pos.stop_loss.max(pos.take_profit);
                last.close.max(lo).min(hi)
            }
            None => return,
        };
        self.close_position(index, last, clamped, ExitReason::DataEnd);
    }

    /// Tear down into the final trade list and account state.
    pub fn into_parts(self) -> (Vec<Trade>, AccountState, Option<Halt>, u64, SkipCounts) {
        (
            self.trades,
            self.state,
            self.halt,
            self.signal_count,
            self.skips,
        )
    }

    fn manage_position(&mut self, bars: &[Bar], index: usize, atr: Option<f64>) {
        let exit = {
            let Some(pos) = self.position.as_ref() else {
                return;
            };
            // Exits begin on the bar after entry; the entry bar's extremes
            // predate the fill at its close.
            if index <= pos.entry_bar {
                return;
            }
            let bar = &bars[index];
            let (hit_stop, hit_target) = match pos.direction {
                Direction::Buy => (bar.low <= pos.stop_loss, bar.high >= pos.take_profit),
                Direction::Sell => (bar.high >= pos.stop_loss, bar.low <= pos.take_profit),
            };
            if hit_stop {
                // A bar touching both levels resolves as a stop.
                let reason = if pos.at_breakeven() {
                    ExitReason::TrailingStop
                } else {
                    ExitReason::StopLoss
                };
                Some((pos.stop_loss, reason))
            } else if hit_target {
                Some((pos.take_profit, ExitReason::TakeProfit))
            } else {
                None
            }
        };

        if let Some((price, reason)) = exit {
            self.close_position(index, &bars[index], price, reason);
            return;
        }

        let trail_mult = self.config.trail_atr_mult;
        if let Some(pos) = self.position.as_mut() {
            let bar = &bars[index];
            pos.track_excursion(bar.high, bar.low);
            if !pos.at_breakeven() {
                // Excursion equal to the initial risk earns a free trade.
                if pos.favorable_excursion() >= pos.initial_risk {
                    let entry = pos.entry_price;
                    pos.ratchet_stop(entry);
                }
            } else if let Some(atr) = atr {
                if atr > 0.0 {
                    let proposed = pos.best_price - pos.direction.sign() * trail_mult * atr;
                    pos.ratchet_stop(proposed);
                }
            }
        }
    }

    fn consider_entry(
        &mut self,
        bars: &[Bar],
        index: usize,
        indicators: &IndicatorValues,
        atr: Option<f64>,
    ) {
        let bar = &bars[index];
        let ema_slow = indicators.get_valid(&self.ema_slow_key, index);
        let snapshot = patterns::scan(
            bars,
            index,
            &self.config.patterns,
            &self.config.session,
            self.config.indicators.atr_period,
            ema_slow,
            atr,
        );
        let Some(signal) = self.generator.evaluate(bars, index, indicators, &snapshot) else {
            return;
        };
        self.signal_count += 1;

        if !self.config.session.in_window(bar.timestamp) {
            self.skips.out_of_window += 1;
            return;
        }

        let golden = match (indicators.get_valid(&self.rsi_key, index), atr) {
            (Some(rsi), Some(atr)) => {
                let aligned = |dir: Direction| {
                    snapshot.sweep.as_ref().is_some_and(|s| s.kind == dir)
                        || snapshot.gap.as_ref().is_some_and(|g| g.kind == dir)
                };
                let ctx = GoldenContext {
                    rsi,
                    volume: bar.volume,
                    average_volume: snapshot.average_volume,
                    near_key_level: snapshot.near_key_level(bar.close, atr),
                    sweep_or_gap: aligned(signal.direction),
                };
                risk::is_golden(&self.config.golden, signal.direction, &ctx)
            }
            _ => false,
        };
        match risk::check_entry(&self.config.account, &self.state, golden) {
            Err(EntryBlock::DailyLossCap) => {
                self.skips.loss_capped += 1;
                return;
            }
            Err(EntryBlock::TradeThrottle) => {
                self.skips.throttled += 1;
                return;
            }
            Ok(()) => {}
        }

        let (stop_distance, target_distance) = match self.config.stop_model {
            StopModel::AtrMultiple {
                stop_mult,
                target_mult,
            } => match atr {
                Some(atr) if atr > 0.0 => (stop_mult * atr, target_mult * atr),
                _ => {
                    self.skips.not_sized += 1;
                    return;
                }
            },
            StopModel::FixedPoints { stop, target } => (stop, target),
        };
        let Some(units) = risk::units_for_trade(&self.config.account, stop_distance) else {
            self.skips.not_sized += 1;
            return;
        };

        let sign = signal.direction.sign();
        let entry = bar.close;
        self.position = Some(Position::new(
            signal.direction,
            entry,
            entry - sign * stop_distance,
            entry + sign * target_distance,
            units,
            bar.timestamp,
            index,
            signal.rule,
            signal.reason,
        ));
    }

    fn close_position(&mut self, index: usize, bar: &Bar, exit_price: f64, exit: ExitReason) {
        let Some(pos) = self.position.take() else {
            return;
        };
        let points = (exit_price - pos.entry_price) * pos.direction.sign();
        let profit_loss = points * pos.units * self.config.account.tick_value;
        let trade = Trade {
            direction: pos.direction,
            entry_bar: pos.entry_bar,
            entry_time: pos.entry_time,
            entry_price: pos.entry_price,
            exit_bar: index,
            exit_time: bar.timestamp,
            exit_price,
            units: pos.units,
            stop_loss: pos.stop_loss,
            take_profit: pos.take_profit,
            profit_loss,
            exit,
            rule: pos.rule,
            reason: pos.reason,
        };
        let halt = ledger::apply_trade(&mut self.state, &self.config.account, &trade);
        self.trades.push(trade);
        if self.halt.is_none() {
            self.halt = halt;
        }
    }
}
