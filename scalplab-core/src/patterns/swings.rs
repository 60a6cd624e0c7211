//! Swing highs and lows.
//!
//! Local extremes over a trailing window, kept as support/resistance
//! candidates. A swing only confirms once the bar after it has printed,
//! so the scan at bar `i` never reads past `i`.

use crate::config::PatternParams;
use crate::domain::Bar;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwingLevels {
    /// Confirmed swing highs, strongest (highest) first.
    pub highs: Vec<f64>,
    /// Confirmed swing lows, strongest (lowest) first.
    pub lows: Vec<f64>,
}

impl SwingLevels {
    /// Closest swing high at or above `price`.
    pub fn nearest_resistance(&self, price: f64) -> Option<f64> {
        self.highs
            .iter()
            .copied()
            .filter(|h| *h >= price)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Closest swing low at or below `price`.
    pub fn nearest_support(&self, price: f64) -> Option<f64> {
        self.lows
            .iter()
            .copied()
            .filter(|l| *l <= price)
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Whether `price` is within `tolerance` of any confirmed swing.
    pub fn is_near(&self, price: f64, tolerance: f64) -> bool {
        if tolerance <= 0.0 {
            return false;
        }
        self.highs
            .iter()
            .chain(self.lows.iter())
            .any(|l| (price - l).abs() <= tolerance)
    }
}

/// Scan the trailing window ending at `index` for confirmed swings and
/// keep the strongest `swing_top_n` per side.
pub fn scan(bars: &[Bar], index: usize, params: &PatternParams) -> SwingLevels {
    let mut levels = SwingLevels::default();
    if index >= bars.len() || index < 2 {
        return levels;
    }
    let start = index.saturating_sub(params.swing_lookback).max(1);
    // Last confirmable pivot is index - 1 (needs bar `index` to its right).
    for j in start..index {
        let (prev, cur, next) = (&bars[j - 1], &bars[j], &bars[j + 1]);
        if cur.high > prev.high && cur.high > next.high {
            levels.highs.push(cur.high);
        }
        if cur.low < prev.low && cur.low < next.low {
            levels.lows.push(cur.low);
        }
    }
    levels.highs.sort_by(|a, b| b.total_cmp(a));
    levels.highs.truncate(params.swing_top_n);
    levels.lows.sort_by(|a, b| a.total_cmp(b));
    levels.lows.truncate(params.swing_top_n);
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn finds_confirmed_pivots() {
        let mut bars = make_bars(&[100.0; 6]);
        bars[2].high = 105.0;
        bars[3].low = 94.0;
        let levels = scan(&bars, 5, &PatternParams::default());
        assert!(levels.highs.contains(&105.0));
        assert!(levels.lows.contains(&94.0));
    }

    #[test]
    fn unconfirmed_pivot_at_the_current_bar_is_excluded() {
        let mut bars = make_bars(&[100.0; 4]);
        bars[3].high = 110.0;
        let levels = scan(&bars, 3, &PatternParams::default());
        assert!(levels.highs.is_empty());
    }

    #[test]
    fn keeps_only_the_strongest_per_side() {
        let mut bars = make_bars(&[100.0; 10]);
        bars[1].high = 105.0;
        bars[3].high = 106.0;
        bars[5].high = 107.0;
        bars[7].high = 108.0;
        let params = PatternParams {
            swing_top_n: 2,
            ..PatternParams::default()
        };
        let levels = scan(&bars, 9, &params);
        assert_eq!(levels.highs, vec![108.0, 107.0]);
    }

    #[test]
    fn nearest_levels_bracket_the_price() {
        let levels = SwingLevels {
            highs: vec![110.0, 106.0],
            lows: vec![95.0, 99.0],
        };
        assert_eq!(levels.nearest_resistance(100.0), Some(106.0));
        assert_eq!(levels.nearest_support(100.0), Some(99.0));
        assert_eq!(levels.nearest_resistance(111.0), None);
    }
}
