//! Daily loss cap and trade throttle.

use crate::config::{AccountParams, GoldenTradeParams};
use crate::domain::{AccountState, Direction};

/// Why an otherwise valid signal was not turned into a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryBlock {
    /// Daily realized losses have reached the cap; locked out until the
    /// next session day.
    DailyLossCap,
    /// Trade count for the day is exhausted and the setup is not golden.
    TradeThrottle,
}

/// Inputs the golden-trade test needs beyond the account state. All are
/// observed at the signal bar.
#[derive(Debug, Clone, Copy)]
pub struct GoldenContext {
    pub rsi: f64,
    pub volume: f64,
    pub average_volume: f64,
    /// Price is within one ATR of a session level or swing extreme.
    pub near_key_level: bool,
    /// A liquidity sweep or fair value gap is active in the signal direction.
    pub sweep_or_gap: bool,
}

/// An exceptional setup that may bypass the daily trade throttle (never
/// the loss cap): RSI at a directional extreme, volume expansion, price at
/// a key level, and sweep or gap confluence, all at once.
pub fn is_golden(params: &GoldenTradeParams, direction: Direction, ctx: &GoldenContext) -> bool {
    let rsi_extreme = match direction {
        Direction::Buy => ctx.rsi <= params.rsi_low,
        Direction::Sell => ctx.rsi >= params.rsi_high,
    };
    let volume_expansion =
        ctx.average_volume > 0.0 && ctx.volume >= params.volume_mult * ctx.average_volume;
    rsi_extreme && volume_expansion && ctx.near_key_level && ctx.sweep_or_gap
}

/// Gate a new entry against the daily limits. The loss cap is absolute;
/// the throttle yields to a golden setup.
pub fn check_entry(
    account: &AccountParams,
    state: &AccountState,
    golden: bool,
) -> Result<(), EntryBlock> {
    if state.daily_loss >= account.daily_loss_cap {
        return Err(EntryBlock::DailyLossCap);
    }
    if state.trades_today >= account.max_trades_per_day && !golden {
        return Err(EntryBlock::TradeThrottle);
    }
    Ok(())
}
