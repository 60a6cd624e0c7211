//! Position sizing.

use crate::config::AccountParams;

/// Units (contracts) for a trade with the given stop distance in points.
///
/// `risk_budget / (stop_distance * tick_value)`, floored to whole units and
/// capped at `max_units`. Returns `None` when the stop distance is not a
/// positive finite number or the budget buys less than one unit, meaning
/// the entry should be skipped rather than forced to a minimum size.
pub fn units_for_trade(account: &AccountParams, stop_distance: f64) -> Option<f64> {
    if !stop_distance.is_finite() || stop_distance <= 0.0 {
        return None;
    }
    let per_unit_risk = stop_distance * account.tick_value;
    let units = (account.risk_budget / per_unit_risk).floor();
    if units < 1.0 {
        return None;
    }
    Some(units.min(account.max_units))
}
