//! Liquidity sweeps.
//!
//! Resting stops cluster just beyond recent extremes. The detector builds
//! a short liquidity channel from the typical price and the extreme two
//! bars back, then looks for a wick that pierces the channel while the
//! close reverses back inside. A sweep of the lows hints at a long, a
//! sweep of the highs at a short.

use crate::domain::{Bar, Direction};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquiditySweep {
    pub bar_index: usize,
    /// Channel edge that was pierced.
    pub level: f64,
    /// Direction the sweep supports: Buy after the lows are raided,
    /// Sell after the highs.
    pub kind: Direction,
}

/// Detect a sweep at `index`. Needs two prior bars to anchor the channel.
pub fn detect_at(bars: &[Bar], index: usize) -> Option<LiquiditySweep> {
    if index < 2 || index >= bars.len() {
        return None;
    }
    let anchor = &bars[index - 2];
    let cur = &bars[index];
    let typical = cur.typical_price();
    let upper = typical.max(anchor.high);
    let lower = typical.min(anchor.low);

    // Pierce beyond the channel, close back inside on the opposing side
    // of the bar body.
    if cur.high > upper && cur.close < upper && !cur.is_bullish() {
        return Some(LiquiditySweep {
            bar_index: index,
            level: upper,
            kind: Direction::Sell,
        });
    }
    if cur.low < lower && cur.close > lower && cur.is_bullish() {
        return Some(LiquiditySweep {
            bar_index: index,
            level: lower,
            kind: Direction::Buy,
        });
    }
    None
}
