//! Bollinger squeeze breakout strategy.
//!
//! Volatility contraction then expansion: when the previous bar's band
//! width (relative to the middle band) sits below the threshold and this
//! bar closes outside a band, trade the breakout in the band's direction.

use crate::config::{IndicatorParams, SqueezeParams};
use crate::domain::{Bar, Direction, RuleTag, Signal};
use crate::indicators::IndicatorValues;
use crate::patterns::PatternSnapshot;
use crate::signals::SignalGenerator;

pub struct BollingerSqueezeSignal {
    params: SqueezeParams,
    upper_key: String,
    middle_key: String,
    lower_key: String,
    warmup: usize,
}

impl BollingerSqueezeSignal {
    pub fn new(params: SqueezeParams, indicators: &IndicatorParams) -> Self {
        let period = indicators.bollinger_period;
        Self {
            params,
            upper_key: format!("bollinger_upper_{period}"),
            middle_key: format!("bollinger_middle_{period}"),
            lower_key: format!("bollinger_lower_{period}"),
            warmup: period,
        }
    }
}

impl SignalGenerator for BollingerSqueezeSignal {
    fn name(&self) -> &str {
        "bollinger_squeeze"
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
        let upper_prev = indicators.get_valid(&self.upper_key, index - 1)?;
        let middle_prev = indicators.get_valid(&self.middle_key, index - 1)?;
        let lower_prev = indicators.get_valid(&self.lower_key, index - 1)?;
        if middle_prev <= 0.0 {
            return None;
        }
        let bandwidth = (upper_prev - lower_prev) / middle_prev;
        if bandwidth >= self.params.bandwidth_threshold {
            return None;
        }

        let upper = indicators.get_valid(&self.upper_key, index)?;
        let lower = indicators.get_valid(&self.lower_key, index)?;
        let direction = if bar.close > upper {
            Direction::Buy
        } else if bar.close < lower {
            Direction::Sell
        } else {
            return None;
        };
        Some(Signal {
            bar_index: index,
            timestamp: bar.timestamp,
            direction,
            rule: RuleTag::BollingerSqueeze,
            reason: format!("squeeze {bandwidth:.3} broke the {} band", match direction {
                Direction::Buy => "upper",
                Direction::Sell => "lower",
            }),
        })
    }
}
