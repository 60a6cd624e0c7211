//! Bar-pattern detectors.
//!
//! Each detector is a pure function over the bar series prefix ending at
//! the bar under evaluation; none reads past its index. `scan` bundles
//! one bar's worth of detections into a `PatternSnapshot` for the signal
//! generators.

pub mod breaker;
pub mod fvg;
pub mod levels;
pub mod order_block;
pub mod sweep;
pub mod swings;
pub mod zone;

pub use breaker::BreakerBlock;
pub use fvg::FairValueGap;
pub use levels::SessionLevels;
pub use order_block::OrderBlock;
pub use sweep::LiquiditySweep;
pub use swings::SwingLevels;
pub use zone::ZoneClass;

use crate::config::PatternParams;
use crate::domain::Bar;
use crate::risk::session::SessionConfig;

/// Everything the pattern detectors saw at one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSnapshot {
    /// Most recent order block within the lookback, if any.
    pub order_block: Option<OrderBlock>,
    /// Fair value gap completed at this bar.
    pub gap: Option<FairValueGap>,
    /// Liquidity sweep at this bar.
    pub sweep: Option<LiquiditySweep>,
    /// Breaker flip of the current order block at this bar.
    pub breaker: Option<BreakerBlock>,
    /// Premium/discount classification of the close.
    pub zone: ZoneClass,
    /// Session-day high/low and retracements up to this bar.
    pub session: Option<SessionLevels>,
    /// Confirmed swing extremes in the trailing window.
    pub swings: SwingLevels,
    /// Trailing average volume used by the volume-expansion checks.
    pub average_volume: f64,
}

impl PatternSnapshot {
    /// Whether `price` sits within `tolerance` of a session level or a
    /// confirmed swing.
    pub fn near_key_level(&self, price: f64, tolerance: f64) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.is_near(price, tolerance))
            || self.swings.is_near(price, tolerance)
    }
}

/// Trailing average volume over the `period` bars ending at `index`.
/// Partial windows early in the series average what exists.
pub fn average_volume(bars: &[Bar], index: usize, period: usize) -> f64 {
    if index >= bars.len() || period == 0 {
        return 0.0;
    }
    let start = index.saturating_sub(period - 1);
    let window = &bars[start..=index];
    window.iter().map(|b| b.volume).sum::<f64>() / window.len() as f64
}

/// Run every detector against the bar at `index`.
pub fn scan(
    bars: &[Bar],
    index: usize,
    params: &PatternParams,
    session_cfg: &SessionConfig,
    atr_period: usize,
    ema_slow: Option<f64>,
    atr: Option<f64>,
) -> PatternSnapshot {
    let avg_volume = average_volume(bars, index, params.volume_avg_period);
    let order_block = order_block::most_recent(bars, index, params, atr_period);
    let breaker = order_block.as_ref().and_then(|block| {
        breaker::detect_at(bars, index, block, avg_volume, params.breaker_volume_mult)
    });
    PatternSnapshot {
        order_block,
        gap: fvg::detect_at(bars, index),
        sweep: sweep::detect_at(bars, index),
        breaker,
        zone: zone::classify(bars[index].close, ema_slow, atr),
        session: levels::session_levels(bars, index, session_cfg),
        swings: swings::scan(bars, index, params),
        average_volume: avg_volume,
    }
}
