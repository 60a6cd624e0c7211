//! Average True Range (ATR).
//!
//! Two variants, both causal, both used:
//! - `Atr`: Wilder-smoothed true range. Drives stop/target placement.
//! - `range_atr`: mean of plain high-low ranges over up to `period` bars,
//!   using whatever bars exist (partial windows degrade silently rather
//!   than failing). The source prototypes used this for pattern thresholds.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high-low, |high-prev_close|, |low-prev_close|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    if n == 0 {
        return tr;
    }

    let h = bars[0].high;
    let l = bars[0].low;
    if !h.is_nan() && !l.is_nan() {
        tr[0] = h - l;
    }

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            tr[i] = f64::NAN;
        } else {
            tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
        }
    }

    tr
}

/// Mean high-low range over the last `period` bars ending at `index`,
/// shrinking to however many bars exist. Returns None only for an empty
/// prefix.
pub fn range_atr(bars: &[Bar], index: usize, period: usize) -> Option<f64> {
    if bars.is_empty() || index >= bars.len() || period == 0 {
        return None;
    }
    let start = (index + 1).saturating_sub(period);
    let window = &bars[start..=index];
    let sum: f64 = window.iter().map(|b| b.high - b.low).sum();
    Some(sum / window.len() as f64)
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let tr = true_range(bars);
        let n = tr.len();
        let mut result = vec![f64::NAN; n];

        // Seed uses TR[1..=period]: TR[0] is only high-low, not a proper
        // true range, so the warm-up is `period` bars.
        if n < self.period + 1 {
            return result;
        }

        let mut seed = 0.0;
        for &v in &tr[1..=self.period] {
            if v.is_nan() {
                return result;
            }
            seed += v;
        }
        seed /= self.period as f64;
        result[self.period] = seed;

        let alpha = 1.0 / self.period as f64;
        let mut prev = seed;
        for i in (self.period + 1)..n {
            if tr[i].is_nan() {
                for val in result.iter_mut().skip(i) {
                    *val = f64::NAN;
                }
                return result;
            }
            let smoothed = alpha * tr[i] + (1.0 - alpha) * prev;
            result[i] = smoothed;
            prev = smoothed;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::TimeZone;

    fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let base = chrono::Utc
            .with_ymd_and_hms(2024, 10, 1, 13, 45, 0)
            .unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                timestamp: base + chrono::Duration::minutes(5 * i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, 6, 2) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, 1, 8) = 9
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Prev close 100, current bar 110-115-108: TR = |115-100| = 15
        let bars = make_ohlc_bars(&[(98.0, 102.0, 97.0, 100.0), (110.0, 115.0, 108.0, 112.0)]);
        let tr = true_range(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = Atr::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[2].is_nan());
        // Seed uses TR[1..=3] = [8, 9, 6]: ATR[3] = 23/3
        // ATR[4] = (1/3)*6 + (2/3)*(23/3) = 64/9
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn range_atr_partial_window() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // range 10
            (102.0, 108.0, 100.0, 106.0), // range 8
        ]);
        // period 14, only 2 bars: mean of available ranges
        assert_approx(range_atr(&bars, 1, 14).unwrap(), 9.0, DEFAULT_EPSILON);
        assert_approx(range_atr(&bars, 0, 14).unwrap(), 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn range_atr_empty_prefix() {
        assert!(range_atr(&[], 0, 14).is_none());
    }

    #[test]
    fn atr_lookback() {
        assert_eq!(Atr::new(14).lookback(), 14);
    }
}
