//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single instrument over one fixed interval, typically
/// 5 minutes.
///
/// Bars are immutable once produced. A series is ordered by strictly
/// increasing timestamp; `validate_series` checks that at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Closed above its open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Full bar range, high minus low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Typical price (H+L+C)/3, the per-bar VWAP proxy.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Returns true if any OHLCV field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// Basic OHLCV sanity check: high >= low, high bounds open/close, positive prices.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Check a bar series for strictly increasing timestamps and sane bars.
///
/// Returns the index of the first offending bar, or `Ok(())`.
pub fn validate_series(bars: &[Bar]) -> Result<(), usize> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            return Err(i);
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(i);
        }
    }
    Ok(())
}
