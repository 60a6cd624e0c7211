//! Trading-session clock.
//!
//! Bar timestamps are UTC; the exchange day and the intraday windows are
//! defined in a local market time derived by a fixed hour offset. The
//! offset is configurable but does not track daylight-saving transitions.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One intraday window in local market time, inclusive of both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TradingWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Session clock configuration. Defaults are the New York morning and
/// afternoon scalping windows at a fixed UTC-4 offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Signed hours added to UTC to obtain local market time.
    pub utc_offset_hours: i64,
    pub windows: Vec<TradingWindow>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: -4,
            windows: vec![
                TradingWindow::new(hm(9, 45), hm(11, 30)),
                TradingWindow::new(hm(13, 30), hm(15, 30)),
            ],
        }
    }
}

impl SessionConfig {
    fn local(&self, timestamp: DateTime<Utc>) -> chrono::NaiveDateTime {
        (timestamp + Duration::hours(self.utc_offset_hours)).naive_utc()
    }

    /// Calendar date the bar belongs to in local market time. Daily
    /// counters reset when this changes.
    pub fn session_day(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        self.local(timestamp).date()
    }

    /// Whether the bar's local time falls inside any trading window.
    pub fn in_window(&self, timestamp: DateTime<Utc>) -> bool {
        let time = self.local(timestamp).time();
        self.windows.iter().any(|w| w.contains(time))
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    // Static literals, in range by construction.
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
