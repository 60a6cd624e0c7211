//! Engine configuration.
//!
//! Every threshold the rules use lives here under a named field with a
//! sensible default, instead of inline literals. Configs
//! are plain serde structs so the runner can read them from TOML and hash
//! them into run IDs.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::risk::session::SessionConfig;

/// Which strategy evaluates entries. Closed set — selected at construction
/// time, matched exhaustively by the factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// ICT composite: sweep + order-block retest + RSI band + FVG.
    Ict(IctParams),
    /// Five prioritized intraday rules, first full match wins.
    SessionPlaybook(PlaybookParams),
    /// EMA(fast) x EMA(slow) crossover.
    MaCrossover(MaCrossoverParams),
    /// Bollinger bandwidth squeeze then band break.
    BollingerSqueeze(SqueezeParams),
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Ict(_) => "ict",
            StrategyKind::SessionPlaybook(_) => "session_playbook",
            StrategyKind::MaCrossover(_) => "ma_crossover",
            StrategyKind::BollingerSqueeze(_) => "bollinger_squeeze",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IctParams {
    /// RSI band for longs: (buy_rsi_min, buy_rsi_max).
    pub buy_rsi_min: f64,
    pub buy_rsi_max: f64,
    /// RSI band for shorts.
    pub sell_rsi_min: f64,
    pub sell_rsi_max: f64,
}

impl Default for IctParams {
    fn default() -> Self {
        Self {
            buy_rsi_min: 50.0,
            buy_rsi_max: 70.0,
            sell_rsi_min: 30.0,
            sell_rsi_max: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybookParams {
    /// Bars forming the opening range (3 x 5min = first 15 minutes).
    pub opening_range_bars: usize,
    /// Volume multiple over the trailing average required for breakouts.
    pub breakout_volume_mult: f64,
    /// Pullback proximity to a broken level, in ATRs.
    pub pullback_atr_frac: f64,
    /// Bounce proximity to VWAP/EMA, in ATRs.
    pub bounce_atr_frac: f64,
    /// RSI thresholds for the mean-reversion rule.
    pub oversold_rsi: f64,
    pub overbought_rsi: f64,
}

impl Default for PlaybookParams {
    fn default() -> Self {
        Self {
            opening_range_bars: 3,
            breakout_volume_mult: 1.2,
            pullback_atr_frac: 1.0,
            bounce_atr_frac: 0.5,
            oversold_rsi: 30.0,
            overbought_rsi: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaCrossoverParams {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self {
            fast_period: 5,
            slow_period: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqueezeParams {
    /// Bandwidth threshold: (upper - lower) / middle below this is a squeeze.
    pub bandwidth_threshold: f64,
}

impl Default for SqueezeParams {
    fn default() -> Self {
        Self {
            bandwidth_threshold: 0.1,
        }
    }
}

/// How the initial stop and target are placed at entry. Both source
/// prototype variants are preserved; `AtrMultiple` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum StopModel {
    /// Stop at entry -/+ stop_mult * ATR, target at entry +/- target_mult * ATR.
    AtrMultiple { stop_mult: f64, target_mult: f64 },
    /// Fixed point distances (the 10-point stop / 20-point target variant).
    FixedPoints { stop: f64, target: f64 },
}

impl Default for StopModel {
    fn default() -> Self {
        StopModel::AtrMultiple {
            stop_mult: 1.0,
            target_mult: 3.0,
        }
    }
}

/// Account and risk-budget parameters. Defaults model a funded-account
/// evaluation: $150k balance, $5k drawdown budget, $9k target, MES
/// $5/point tick value, 20-contract cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountParams {
    pub initial_balance: f64,
    /// Dollar risk allotted to one trade; sizing divides this by the
    /// stop distance in dollars.
    pub risk_budget: f64,
    pub max_units: f64,
    /// Dollars per point per unit.
    pub tick_value: f64,
    pub daily_loss_cap: f64,
    pub max_drawdown: f64,
    pub profit_target: f64,
    pub max_trades_per_day: u32,
}

impl Default for AccountParams {
    fn default() -> Self {
        Self {
            initial_balance: 150_000.0,
            risk_budget: 1_000.0,
            max_units: 20.0,
            tick_value: 5.0,
            daily_loss_cap: 5_000.0,
            max_drawdown: 5_000.0,
            profit_target: 9_000.0,
            max_trades_per_day: 5,
        }
    }
}

/// Shared indicator periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 5,
            ema_slow: 20,
            rsi_period: 9,
            atr_period: 14,
            bollinger_period: 20,
            bollinger_mult: 2.0,
        }
    }
}

/// Pattern-detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParams {
    /// Close-to-close change must exceed this many ATRs to flag an order block.
    pub order_block_atr_mult: f64,
    /// How far back to look for the most recent order block.
    pub order_block_lookback: usize,
    /// Volume multiple over the trailing average for a breaker block.
    pub breaker_volume_mult: f64,
    /// Trailing window for swing highs/lows.
    pub swing_lookback: usize,
    /// How many extremes per side the swing scan keeps.
    pub swing_top_n: usize,
    /// Trailing window for the average-volume baseline.
    pub volume_avg_period: usize,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            order_block_atr_mult: 2.0,
            order_block_lookback: 50,
            breaker_volume_mult: 1.2,
            swing_lookback: 50,
            swing_top_n: 3,
            volume_avg_period: 20,
        }
    }
}

/// Thresholds for the golden-trade override of the daily trade throttle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenTradeParams {
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub volume_mult: f64,
}

impl Default for GoldenTradeParams {
    fn default() -> Self {
        Self {
            rsi_low: 25.0,
            rsi_high: 75.0,
            volume_mult: 1.5,
        }
    }
}

/// Complete configuration bundle for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub strategy: StrategyKind,
    #[serde(default)]
    pub stop_model: StopModel,
    /// Once a position reaches break-even, the stop trails this many ATRs
    /// behind the best price seen.
    #[serde(default = "default_trail_atr_mult")]
    pub trail_atr_mult: f64,
    #[serde(default)]
    pub account: AccountParams,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub indicators: IndicatorParams,
    #[serde(default)]
    pub patterns: PatternParams,
    #[serde(default)]
    pub golden: GoldenTradeParams,
}

fn default_trail_atr_mult() -> f64 {
    2.0
}

impl EngineConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            stop_model: StopModel::default(),
            trail_atr_mult: default_trail_atr_mult(),
            account: AccountParams::default(),
            session: SessionConfig::default(),
            indicators: IndicatorParams::default(),
            patterns: PatternParams::default(),
            golden: GoldenTradeParams::default(),
        }
    }

    /// Reject degenerate configurations before any simulation starts.
    pub fn validate(&self) -> Result<(), EngineError> {
        let bad = |msg: &str| Err(EngineError::InvalidConfiguration(msg.to_string()));
        let bad_risk = |msg: &str| Err(EngineError::InvalidRiskParameters(msg.to_string()));

        if self.account.initial_balance <= 0.0 {
            return bad_risk("initial_balance must be positive");
        }
        if self.account.risk_budget <= 0.0 {
            return bad_risk("risk_budget must be positive");
        }
        if self.account.tick_value <= 0.0 {
            return bad_risk("tick_value must be positive");
        }
        if self.account.max_units < 1.0 {
            return bad_risk("max_units must be at least 1");
        }
        if self.account.daily_loss_cap <= 0.0 {
            return bad_risk("daily_loss_cap must be positive");
        }
        if self.account.max_drawdown <= 0.0 {
            return bad_risk("max_drawdown must be positive");
        }
        if self.trail_atr_mult <= 0.0 {
            return bad_risk("trail_atr_mult must be positive");
        }
        if self.indicators.ema_fast == 0 || self.indicators.ema_slow == 0 {
            return bad("EMA periods must be >= 1");
        }
        if self.indicators.ema_fast >= self.indicators.ema_slow {
            return bad("ema_fast must be shorter than ema_slow");
        }
        if self.indicators.rsi_period == 0 || self.indicators.atr_period == 0 {
            return bad("RSI and ATR periods must be >= 1");
        }
        if self.session.windows.is_empty() {
            return bad("at least one trading window is required");
        }
        for w in &self.session.windows {
            if w.start >= w.end {
                return bad("trading window start must precede its end");
            }
        }
        match self.stop_model {
            StopModel::AtrMultiple {
                stop_mult,
                target_mult,
            } => {
                if stop_mult <= 0.0 || target_mult <= 0.0 {
                    return bad_risk("ATR stop/target multipliers must be positive");
                }
            }
            StopModel::FixedPoints { stop, target } => {
                if stop <= 0.0 || target <= 0.0 {
                    return bad_risk("fixed stop/target distances must be positive");
                }
            }
        }
        match &self.strategy {
            StrategyKind::Ict(p) => {
                if p.buy_rsi_min >= p.buy_rsi_max || p.sell_rsi_min >= p.sell_rsi_max {
                    return bad("ICT RSI bands must be non-empty ranges");
                }
            }
            StrategyKind::SessionPlaybook(p) => {
                if p.opening_range_bars == 0 {
                    return bad("opening_range_bars must be >= 1");
                }
            }
            StrategyKind::MaCrossover(p) => {
                if p.fast_period == 0 || p.fast_period >= p.slow_period {
                    return bad("MA crossover needs 0 < fast_period < slow_period");
                }
            }
            StrategyKind::BollingerSqueeze(p) => {
                if p.bandwidth_threshold <= 0.0 {
                    return bad("bandwidth_threshold must be positive");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = EngineConfig::new(StrategyKind::Ict(IctParams::default()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_ema_periods() {
        let mut config = EngineConfig::new(StrategyKind::MaCrossover(MaCrossoverParams::default()));
        config.indicators.ema_fast = 30;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_zero_risk_budget() {
        let mut config = EngineConfig::new(StrategyKind::Ict(IctParams::default()));
        config.account.risk_budget = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_windows() {
        let mut config = EngineConfig::new(StrategyKind::Ict(IctParams::default()));
        config.session.windows.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_stop_model() {
        let mut config = EngineConfig::new(StrategyKind::Ict(IctParams::default()));
        config.stop_model = StopModel::FixedPoints {
            stop: 0.0,
            target: 20.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn strategy_kind_names() {
        assert_eq!(StrategyKind::Ict(IctParams::default()).name(), "ict");
        assert_eq!(
            StrategyKind::BollingerSqueeze(SqueezeParams::default()).name(),
            "bollinger_squeeze"
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = EngineConfig::new(StrategyKind::SessionPlaybook(PlaybookParams::default()));
        let text = toml::to_string(&config).unwrap();
        let back: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
