//! VWAP proxy — per-bar typical price (H+L+C)/3.
//!
//! Stands in for a true volume-weighted average when the feed carries no
//! per-trade data. The liquidity-channel and bounce rules are calibrated
//! against it.
//! Lookback: 0.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Vwap {
    name: String,
}

impl Vwap {
    pub fn new() -> Self {
        Self {
            name: "vwap".to_string(),
        }
    }
}

impl Default for Vwap {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        bars.iter()
            .map(|b| {
                if b.high.is_nan() || b.low.is_nan() || b.close.is_nan() {
                    f64::NAN
                } else {
                    b.typical_price()
                }
            })
            .collect()
    }
}
