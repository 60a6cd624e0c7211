//! Order-block detection.
//!
//! An impulsive close-to-close move (larger than a multiple of the recent
//! average range) marks the bar before the impulse as an order block: the
//! zone institutions are assumed to have accumulated in. A bullish block
//! precedes an up impulse and acts as demand; a bearish block precedes a
//! down impulse and acts as supply.

use crate::config::PatternParams;
use crate::domain::{Bar, Direction};
use crate::indicators::range_atr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderBlock {
    /// Index of the zone bar (the one before the impulse).
    pub bar_index: usize,
    pub low: f64,
    pub high: f64,
    /// Buy for demand zones, Sell for supply zones.
    pub kind: Direction,
}

impl OrderBlock {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }
}

/// Detect an order block formed by the impulse ending at `index`.
pub fn detect_at(
    bars: &[Bar],
    index: usize,
    atr_period: usize,
    atr_mult: f64,
) -> Option<OrderBlock> {
    if index < 1 || index >= bars.len() {
        return None;
    }
    let atr = range_atr(bars, index, atr_period)?;
    if atr <= 0.0 {
        return None;
    }
    let delta = bars[index].close - bars[index - 1].close;
    if delta.abs() <= atr_mult * atr {
        return None;
    }
    let zone = &bars[index - 1];
    Some(OrderBlock {
        bar_index: index - 1,
        low: zone.low,
        high: zone.high,
        kind: if delta > 0.0 {
            Direction::Buy
        } else {
            Direction::Sell
        },
    })
}

/// Most recent order block formed at or before `index`, scanning back no
/// further than the configured lookback.
pub fn most_recent(
    bars: &[Bar],
    index: usize,
    params: &PatternParams,
    atr_period: usize,
) -> Option<OrderBlock> {
    let floor = index.saturating_sub(params.order_block_lookback);
    let mut i = index;
    loop {
        if let Some(block) = detect_at(bars, i, atr_period, params.order_block_atr_mult) {
            return Some(block);
        }
        if i <= floor {
            return None;
        }
        i -= 1;
    }
}
