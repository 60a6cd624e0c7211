//! EMA crossover strategy.

use crate::config::MaCrossoverParams;
use crate::domain::{Bar, Direction, RuleTag, Signal};
use crate::indicators::IndicatorValues;
use crate::patterns::PatternSnapshot;
use crate::signals::SignalGenerator;

pub struct MaCrossoverSignal {
    fast_key: String,
    slow_key: String,
    warmup: usize,
}

impl MaCrossoverSignal {
    pub fn new(params: MaCrossoverParams) -> Self {
        Self {
            fast_key: format!("ema_{}", params.fast_period),
            slow_key: format!("ema_{}", params.slow_period),
            warmup: params.slow_period,
        }
    }
}

impl SignalGenerator for MaCrossoverSignal {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.warmup
    }

    fn evaluate(
        &self,
        bars: &[Bar],
        index: usize,
        indicators: &IndicatorValues,
        _patterns: &PatternSnapshot,
    ) -> Option<Signal> {
        if index == 0 {
            return None;
        }
        let bar = bars.get(index)?;
        let fast_prev = indicators.get_valid(&self.fast_key, index - 1)?;
        let slow_prev = indicators.get_valid(&self.slow_key, index - 1)?;
        let fast = indicators.get_valid(&self.fast_key, index)?;
        let slow = indicators.get_valid(&self.slow_key, index)?;

        let direction = if fast_prev <= slow_prev && fast > slow {
            Direction::Buy
        } else if fast_prev >= slow_prev && fast < slow {
            Direction::Sell
        } else {
            return None;
        };
        Some(Signal {
            bar_index: index,
            timestamp: bar.timestamp,
            direction,
            rule: RuleTag::MaCrossover,
            reason: format!(
                "{} crossed {} {}",
                self.fast_key,
                self.slow_key,
                match direction {
                    Direction::Buy => "upward",
                    Direction::Sell => "downward",
                }
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, IndicatorValues};
    use crate::patterns::{PatternSnapshot, SwingLevels, ZoneClass};

    fn empty_snapshot() -> PatternSnapshot {
        PatternSnapshot {
            order_block: None,
            gap: None,
            sweep: None,
            breaker: None,
            zone: ZoneClass::Neutral,
            session: None,
            swings: SwingLevels::default(),
            average_volume: 1_000.0,
        }
    }

    fn values(fast: &[f64], slow: &[f64]) -> IndicatorValues {
        let mut iv = IndicatorValues::new();
        iv.insert("ema_5", fast.to_vec());
        iv.insert("ema_20", slow.to_vec());
        iv
    }

    #[test]
    fn upward_cross_is_a_buy() {
        let bars = make_bars(&[100.0, 101.0]);
        let iv = values(&[99.0, 101.0], &[100.0, 100.0]);
        let signal = MaCrossoverSignal::new(MaCrossoverParams::default())
            .evaluate(&bars, 1, &iv, &empty_snapshot())
            .expect("cross up should fire");
        assert_eq!(signal.direction, Direction::Buy);
        assert_eq!(signal.rule, RuleTag::MaCrossover);
    }

    #[test]
    fn downward_cross_is_a_sell() {
        let bars = make_bars(&[100.0, 99.0]);
        let iv = values(&[101.0, 99.0], &[100.0, 100.0]);
        let signal = MaCrossoverSignal::new(MaCrossoverParams::default())
            .evaluate(&bars, 1, &iv, &empty_snapshot())
            .expect("cross down should fire");
        assert_eq!(signal.direction, Direction::Sell);
    }

    #[test]
    fn no_cross_no_signal() {
        let bars = make_bars(&[100.0, 101.0]);
        let iv = values(&[101.0, 102.0], &[100.0, 100.0]);
        assert!(MaCrossoverSignal::new(MaCrossoverParams::default())
            .evaluate(&bars, 1, &iv, &empty_snapshot())
            .is_none());
    }

    #[test]
    fn touch_then_resume_counts_as_a_cross() {
        // Equality on the previous bar still arms the cross.
        let bars = make_bars(&[100.0, 101.0]);
        let iv = values(&[100.0, 101.0], &[100.0, 100.0]);
        let signal = MaCrossoverSignal::new(MaCrossoverParams::default())
            .evaluate(&bars, 1, &iv, &empty_snapshot())
            .unwrap();
        assert_eq!(signal.direction, Direction::Buy);
    }

    #[test]
    fn warmup_nan_blocks_evaluation() {
        let bars = make_bars(&[100.0, 101.0]);
        let iv = values(&[f64::NAN, 101.0], &[100.0, 100.0]);
        assert!(MaCrossoverSignal::new(MaCrossoverParams::default())
            .evaluate(&bars, 1, &iv, &empty_snapshot())
            .is_none());
    }
}
