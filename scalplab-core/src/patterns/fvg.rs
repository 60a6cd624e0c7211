//! Fair value gaps.
//!
//! A gap exists when consecutive bars leave untraded space between them:
//! the current low prints entirely above the previous high (bullish) or
//! the current high entirely below the previous low (bearish). Price is
//! assumed to be drawn back to fill the gap, so an open gap supports
//! continuation in its direction.

use crate::domain::{Bar, Direction};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FairValueGap {
    /// Index of the bar that completed the gap.
    pub bar_index: usize,
    /// Lower edge of the untraded region.
    pub low: f64,
    /// Upper edge of the untraded region.
    pub high: f64,
    pub kind: Direction,
}

/// Detect a gap completed at `index`.
pub fn detect_at(bars: &[Bar], index: usize) -> Option<FairValueGap> {
    if index < 1 || index >= bars.len() {
        return None;
    }
    let prev = &bars[index - 1];
    let cur = &bars[index];
    if cur.low > prev.high {
        return Some(FairValueGap {
            bar_index: index,
            low: prev.high,
            high: cur.low,
            kind: Direction::Buy,
        });
    }
    if cur.high < prev.low {
        return Some(FairValueGap {
            bar_index: index,
            low: cur.high,
            high: prev.low,
            kind: Direction::Sell,
        });
    }
    None
}
