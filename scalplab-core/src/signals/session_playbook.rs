//! Prioritized intraday playbook.
//!
//! Five rules checked in a fixed order; the first full match wins the
//! bar and the rest are not consulted:
//!
//! 1. opening range breakout on expanded volume
//! 2. pullback to a freshly broken swing level
//! 3. trend-side bounce off VWAP or the slow EMA
//! 4. RSI mean reversion from a premium/discount extreme
//! 5. order-block break (breaker flip)

use crate::config::{IndicatorParams, PlaybookParams};
use crate::domain::{Bar, Direction, RuleTag, Signal};
use crate::indicators::IndicatorValues;
use crate::patterns::{PatternSnapshot, ZoneClass};
use crate::risk::session::SessionConfig;
use crate::signals::SignalGenerator;

pub struct SessionPlaybookSignal {
    params: PlaybookParams,
    session: SessionConfig,
    ema_fast_key: String,
    ema_slow_key: String,
    rsi_key: String,
    atr_key: String,
    warmup: usize,
}

struct Match {
    direction: Direction,
    rule: RuleTag,
    reason: String,
}

impl SessionPlaybookSignal {
    pub fn new(
        params: PlaybookParams,
        indicators: &IndicatorParams,
        session: SessionConfig,
    ) -> Self {
        Self {
            params,
            session,
            ema_fast_key: format!("ema_{}", indicators.ema_fast),
            ema_slow_key: format!("ema_{}", indicators.ema_slow),
            rsi_key: format!("rsi_{}", indicators.rsi_period),
            atr_key: format!("atr_{}", indicators.atr_period),
            warmup: indicators
                .ema_slow
                .max(indicators.rsi_period)
                .max(indicators.atr_period),
        }
    }

    /// First bar index of the session day containing `index`.
    fn day_start(&self, bars: &[Bar], index: usize) -> usize {
        let day = self.session.session_day(bars[index].timestamp);
        let mut start = index;
        while start > 0 && self.session.session_day(bars[start - 1].timestamp) == day {
            start -= 1;
        }
        start
    }

    fn opening_range_breakout(
        &self,
        bars: &[Bar],
        index: usize,
        patterns: &PatternSnapshot,
    ) -> Option<Match> {
        let start = self.day_start(bars, index);
        let range_end = start + self.params.opening_range_bars;
        // The range must be complete and the current bar past it.
        if index < range_end {
            return None;
        }
        let range = &bars[start..range_end];
        let range_high = range.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let range_low = range.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        let bar = &bars[index];
        if patterns.average_volume <= 0.0
            || bar.volume < self.params.breakout_volume_mult * patterns.average_volume
        {
            return None;
        }
        let direction = if bar.close > range_high {
            Direction::Buy
        } else if bar.close < range_low {
            Direction::Sell
        } else {
            return None;
        };
        Some(Match {
            direction,
            rule: RuleTag::OpeningRangeBreakout,
            reason: format!("opening range {range_low:.2}-{range_high:.2} broken on volume"),
        })
    }

    fn breakout_pullback(&self, bar: &Bar, patterns: &PatternSnapshot, atr: f64) -> Option<Match> {
        let tolerance = self.params.pullback_atr_frac * atr;
        // Resistance already cleared, price dipping back to it.
        let broken_resistance = patterns
            .swings
            .highs
            .iter()
            .copied()
            .filter(|h| *h < bar.close)
            .max_by(|a, b| a.total_cmp(b));
        if let Some(level) = broken_resistance {
            if bar.is_bullish() && (bar.low - level).abs() <= tolerance {
                return Some(Match {
                    direction: Direction::Buy,
                    rule: RuleTag::BreakoutPullback,
                    reason: format!("pullback to broken resistance {level:.2}"),
                });
            }
        }
        let broken_support = patterns
            .swings
            .lows
            .iter()
            .copied()
            .filter(|l| *l > bar.close)
            .min_by(|a, b| a.total_cmp(b));
        if let Some(level) = broken_support {
            if !bar.is_bullish() && (bar.high - level).abs() <= tolerance {
                return Some(Match {
                    direction: Direction::Sell,
                    rule: RuleTag::BreakoutPullback,
                    reason: format!("pullback to broken support {level:.2}"),
                });
            }
        }
        None
    }

    fn vwap_ema_bounce(
        &self,
        bar: &Bar,
        atr: f64,
        vwap: Option<f64>,
        ema_fast: f64,
        ema_slow: f64,
    ) -> Option<Match> {
        let tolerance = self.params.bounce_atr_frac * atr;
        let uptrend = ema_fast > ema_slow;
        for (label, level) in [("vwap", vwap), ("slow ema", Some(ema_slow))] {
            let level = match level {
                Some(l) => l,
                None => continue,
            };
            if uptrend && bar.is_bullish() && bar.close > level && (bar.low - level).abs() <= tolerance
            {
                return Some(Match {
                    direction: Direction::Buy,
                    rule: RuleTag::VwapEmaBounce,
                    reason: format!("bounce off {label} {level:.2} with trend"),
                });
            }
            if !uptrend
                && !bar.is_bullish()
                && bar.close < level
                && (bar.high - level).abs() <= tolerance
            {
                return Some(Match {
                    direction: Direction::Sell,
                    rule: RuleTag::VwapEmaBounce,
                    reason: format!("rejection at {label} {level:.2} with trend"),
                });
            }
        }
        None
    }

    fn mean_reversion(&self, patterns: &PatternSnapshot, rsi: f64) -> Option<Match> {
        if rsi < self.params.oversold_rsi && patterns.zone == ZoneClass::Discount {
            return Some(Match {
                direction: Direction::Buy,
                rule: RuleTag::MeanReversion,
                reason: format!("rsi {rsi:.1} oversold in discount"),
            });
        }
        if rsi > self.params.overbought_rsi && patterns.zone == ZoneClass::Premium {
            return Some(Match {
                direction: Direction::Sell,
                rule: RuleTag::MeanReversion,
                reason: format!("rsi {rsi:.1} overbought in premium"),
            });
        }
        None
    }

    fn order_block_break(&self, patterns: &PatternSnapshot) -> Option<Match> {
        patterns.breaker.as_ref().map(|breaker| Match {
            direction: breaker.kind,
            rule: RuleTag::OrderBlockBreak,
            reason: format!(
                "order block {:.2}-{:.2} failed and flipped",
                breaker.origin.low, breaker.origin.high
            ),
        })
    }
}

impl SignalGenerator for SessionPlaybookSignal {
    fn name(&self) -> &str {
        "session_playbook"
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
        let atr = indicators.get_valid(&self.atr_key, index)?;
        let rsi = indicators.get_valid(&self.rsi_key, index)?;
        let ema_fast = indicators.get_valid(&self.ema_fast_key, index)?;
        let ema_slow = indicators.get_valid(&self.ema_slow_key, index)?;
        let vwap = indicators.get_valid("vwap", index);

        let hit = self
            .opening_range_breakout(bars, index, patterns)
            .or_else(|| self.breakout_pullback(bar, patterns, atr))
            .or_else(|| self.vwap_ema_bounce(bar, atr, vwap, ema_fast, ema_slow))
            .or_else(|| self.mean_reversion(patterns, rsi))
            .or_else(|| self.order_block_break(patterns))?;

        Some(Signal {
            bar_index: index,
            timestamp: bar.timestamp,
            direction: hit.direction,
            rule: hit.rule,
            reason: hit.reason,
        })
    }
}
