//! Breaker blocks.
//!
//! When price closes through an order block on expanded volume, the zone
//! fails and flips polarity: a broken demand zone becomes resistance and
//! favors shorts, a broken supply zone becomes support and favors longs.

use crate::domain::{Bar, Direction};
use crate::patterns::order_block::OrderBlock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakerBlock {
    /// Bar that broke the zone.
    pub bar_index: usize,
    /// The failed order block.
    pub origin: OrderBlock,
    /// Direction the flipped zone now favors.
    pub kind: Direction,
}

/// Check whether the bar at `index` breaks `block` with volume above
/// `volume_mult` times the trailing average.
pub fn detect_at(
    bars: &[Bar],
    index: usize,
    block: &OrderBlock,
    average_volume: f64,
    volume_mult: f64,
) -> Option<BreakerBlock> {
    if index >= bars.len() || index <= block.bar_index {
        return None;
    }
    if average_volume <= 0.0 || bars[index].volume < volume_mult * average_volume {
        return None;
    }
    let close = bars[index].close;
    let broken = match block.kind {
        Direction::Buy => close < block.low,
        Direction::Sell => close > block.high,
    };
    if !broken {
        return None;
    }
    Some(BreakerBlock {
        bar_index: index,
        origin: *block,
        kind: match block.kind {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn demand_block() -> OrderBlock {
        OrderBlock {
            bar_index: 0,
            low: 99.0,
            high: 101.0,
            kind: Direction::Buy,
        }
    }

    #[test]
    fn close_through_demand_on_volume_flips_to_sell() {
        let mut bars = make_bars(&[100.0, 100.5, 97.0]);
        bars[2].volume = 2_000.0;
        let breaker = detect_at(&bars, 2, &demand_block(), 1_000.0, 1.2)
            .expect("break on volume should flip the zone");
        assert_eq!(breaker.kind, Direction::Sell);
        assert_eq!(breaker.bar_index, 2);
    }

    #[test]
    fn break_without_volume_does_not_count() {
        let bars = make_bars(&[100.0, 100.5, 97.0]);
        // make_bars volumes are 1000, under the 1.2x bar.
        assert!(detect_at(&bars, 2, &demand_block(), 1_000.0, 1.2).is_none());
    }

    #[test]
    fn close_inside_the_zone_is_not_a_break() {
        let mut bars = make_bars(&[100.0, 100.5, 100.0]);
        bars[2].volume = 2_000.0;
        assert!(detect_at(&bars, 2, &demand_block(), 1_000.0, 1.2).is_none());
    }

    #[test]
    fn supply_break_flips_to_buy() {
        let block = OrderBlock {
            bar_index: 0,
            low: 99.0,
            high: 101.0,
            kind: Direction::Sell,
        };
        let mut bars = make_bars(&[100.0, 100.5, 103.0]);
        bars[2].volume = 2_000.0;
        let breaker = detect_at(&bars, 2, &block, 1_000.0, 1.2).unwrap();
        assert_eq!(breaker.kind, Direction::Buy);
    }
}
