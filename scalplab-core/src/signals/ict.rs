//! Composite confluence strategy.
//!
//! Fires only when four independent reads agree on the same bar: a
//! liquidity sweep in the trade direction, price retesting an aligned
//! order block, RSI inside the directional band, and a fair value gap in
//! the trade direction. Each leg alone is noise; the stack is the edge.

use crate::config::{IctParams, IndicatorParams};
use crate::domain::{Bar, Direction, RuleTag, Signal};
use crate::indicators::IndicatorValues;
use crate::patterns::PatternSnapshot;
use crate::signals::SignalGenerator;

pub struct IctSignal {
    params: IctParams,
    rsi_key: String,
    warmup: usize,
}

impl IctSignal {
    pub fn new(params: IctParams, indicators: &IndicatorParams) -> Self {
        Self {
            params,
            rsi_key: format!("rsi_{}", indicators.rsi_period),
            warmup: indicators.rsi_period.max(indicators.atr_period) + 1,
        }
    }

    fn confluence(&self, patterns: &PatternSnapshot, close: f64, rsi: f64) -> Option<Direction> {
        let sweep = patterns.sweep.as_ref()?;
        let gap = patterns.gap.as_ref()?;
        let block = patterns.order_block.as_ref()?;
        let direction = sweep.kind;
        if gap.kind != direction || block.kind != direction || !block.contains(close) {
            return None;
        }
        let rsi_ok = match direction {
            Direction::Buy => rsi >= self.params.buy_rsi_min && rsi <= self.params.buy_rsi_max,
            Direction::Sell => rsi >= self.params.sell_rsi_min && rsi <= self.params.sell_rsi_max,
        };
        rsi_ok.then_some(direction)
    }
}

impl SignalGenerator for IctSignal {
    fn name(&self) -> &str {
        "ict"
    }

    fn warmup_bars(&self) -> usize {
        self.warmup
    }

    fn evaluate(
        &self,
        bars: &[Bar],
        index: usize,
        indicators: &IndicatorValues,
        patterns: &PatternSnapshot,
    ) -> Option<Signal> {
        let bar = bars.get(index)?;
        let rsi = indicators.get_valid(&self.rsi_key, index)?;
        let direction = self.confluence(patterns, bar.close, rsi)?;
        Some(Signal {
            bar_index: index,
            timestamp: bar.timestamp,
            direction,
            rule: RuleTag::IctComposite,
            reason: format!(
                "sweep + order block retest + rsi {rsi:.1} + gap, all {}",
                match direction {
                    Direction::Buy => "bullish",
                    Direction::Sell => "bearish",
                }
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorParams;
    use crate::indicators::make_bars;
    use crate::patterns::{FairValueGap, LiquiditySweep, OrderBlock, SwingLevels, ZoneClass};

    fn generator() -> IctSignal {
        IctSignal::new(IctParams::default(), &IndicatorParams::default())
    }

    fn bullish_snapshot(close: f64) -> PatternSnapshot {
        PatternSnapshot {
            order_block: Some(OrderBlock {
                bar_index: 5,
                low: close - 2.0,
                high: close + 2.0,
                kind: Direction::Buy,
            }),
            gap: Some(FairValueGap {
                bar_index: 9,
                low: close - 3.0,
                high: close - 1.0,
                kind: Direction::Buy,
            }),
            sweep: Some(LiquiditySweep {
                bar_index: 9,
                level: close - 2.5,
                kind: Direction::Buy,
            }),
            breaker: None,
            zone: ZoneClass::Discount,
            session: None,
            swings: SwingLevels::default(),
            average_volume: 1_000.0,
        }
    }

    fn rsi_values(index: usize, rsi: f64) -> IndicatorValues {
        let mut values = IndicatorValues::new();
        let mut series = vec![f64::NAN; index + 1];
        series[index] = rsi;
        values.insert("rsi_9", series);
        values
    }

    #[test]
    fn full_confluence_fires_a_buy() {
        let bars = make_bars(&[100.0; 10]);
        let signal = generator()
            .evaluate(&bars, 9, &rsi_values(9, 60.0), &bullish_snapshot(100.0))
            .expect("confluence should fire");
        assert_eq!(signal.direction, Direction::Buy);
        assert_eq!(signal.rule, RuleTag::IctComposite);
        assert_eq!(signal.bar_index, 9);
    }

    #[test]
    fn rsi_outside_the_band_blocks_the_signal() {
        let bars = make_bars(&[100.0; 10]);
        let gen = generator();
        assert!(gen
            .evaluate(&bars, 9, &rsi_values(9, 45.0), &bullish_snapshot(100.0))
            .is_none());
        assert!(gen
            .evaluate(&bars, 9, &rsi_values(9, 75.0), &bullish_snapshot(100.0))
            .is_none());
    }

    #[test]
    fn any_missing_leg_blocks_the_signal() {
        let bars = make_bars(&[100.0; 10]);
        let gen = generator();
        let values = rsi_values(9, 60.0);

        let mut snap = bullish_snapshot(100.0);
        snap.sweep = None;
        assert!(gen.evaluate(&bars, 9, &values, &snap).is_none());

        let mut snap = bullish_snapshot(100.0);
        snap.gap = None;
        assert!(gen.evaluate(&bars, 9, &values, &snap).is_none());

        let mut snap = bullish_snapshot(100.0);
        snap.order_block = None;
        assert!(gen.evaluate(&bars, 9, &values, &snap).is_none());
    }

    #[test]
    fn misaligned_block_direction_blocks_the_signal() {
        let bars = make_bars(&[100.0; 10]);
        let mut snap = bullish_snapshot(100.0);
        if let Some(block) = snap.order_block.as_mut() {
            block.kind = Direction::Sell;
        }
        assert!(generator()
            .evaluate(&bars, 9, &rsi_values(9, 60.0), &snap)
            .is_none());
    }

    #[test]
    fn close_outside_the_block_is_not_a_retest() {
        let bars = make_bars(&[100.0; 10]);
        // Zone sits far below the close.
        let snap = bullish_snapshot(90.0);
        assert!(generator()
            .evaluate(&bars, 9, &rsi_values(9, 60.0), &snap)
            .is_none());
    }

    #[test]
    fn warmup_during_nan_rsi_yields_nothing() {
        let bars = make_bars(&[100.0; 10]);
        assert!(generator()
            .evaluate(&bars, 5, &rsi_values(9, 60.0), &bullish_snapshot(100.0))
            .is_none());
    }
}
