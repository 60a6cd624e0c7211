//! Risk policy: session clock, daily limits, and position sizing.

pub mod limits;
pub mod session;
pub mod sizing;

pub use limits::{check_entry, is_golden, EntryBlock, GoldenContext};
pub use session::{SessionConfig, TradingWindow};
pub use sizing::units_for_trade;
