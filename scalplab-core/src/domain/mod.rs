//! Domain types: bars, signals, positions, trades, account state.

pub mod account;
pub mod bar;
pub mod position;
pub mod signal;
pub mod trade;

pub use account::AccountState;
pub use bar::{validate_series, Bar};
pub use position::Position;
pub use signal::{Direction, RuleTag, Signal};
pub use trade::{ExitReason, Trade};
