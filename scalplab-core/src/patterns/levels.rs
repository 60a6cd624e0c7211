//! Session levels.
//!
//! Running high and low of the current session day, plus the standard
//! retracement levels of that range. Updated bar by bar, so the levels a
//! rule sees at bar `i` only reflect bars up to and including `i`.

use crate::domain::Bar;
use crate::risk::session::SessionConfig;

const RETRACE_RATIOS: [f64; 4] = [0.236, 0.382, 0.5, 0.618];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionLevels {
    pub high: f64,
    pub low: f64,
    /// Retracements of the session range, measured down from the high.
    pub retracements: [f64; 4],
}

impl SessionLevels {
    /// Whether `price` sits within `tolerance` of the session high, low,
    /// or any retracement level.
    pub fn is_near(&self, price: f64, tolerance: f64) -> bool {
        if tolerance <= 0.0 {
            return false;
        }
        let mut levels = vec![self.high, self.low];
        levels.extend_from_slice(&self.retracements);
        levels.iter().any(|l| (price - l).abs() <= tolerance)
    }
}

/// Levels of the session day containing bar `index`, built from every
/// bar of that day up to `index`.
pub fn session_levels(bars: &[Bar], index: usize, session: &SessionConfig) -> Option<SessionLevels> {
    if index >= bars.len() {
        return None;
    }
    let day = session.session_day(bars[index].timestamp);
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut i = index;
    loop {
        if session.session_day(bars[i].timestamp) != day {
            break;
        }
        high = high.max(bars[i].high);
        low = low.min(bars[i].low);
        if i == 0 {
            break;
        }
        i -= 1;
    }
    if !high.is_finite() || !low.is_finite() {
        return None;
    }
    let range = high - low;
    let mut retracements = [0.0; 4];
    for (slot, ratio) in retracements.iter_mut().zip(RETRACE_RATIOS) {
        *slot = high - ratio * range;
    }
    Some(SessionLevels {
        high,
        low,
        retracements,
    })
}
