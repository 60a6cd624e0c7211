//! Signal generation.
//!
//! A `SignalGenerator` looks at one bar plus precomputed indicators and
//! patterns and optionally proposes an entry. Generators are portfolio
//! agnostic: whether a signal becomes a position is the simulator's call,
//! after the risk policy has its say.

pub mod bollinger_squeeze;
pub mod ict;
pub mod ma_crossover;
pub mod session_playbook;

pub use bollinger_squeeze::BollingerSqueezeSignal;
pub use ict::IctSignal;
pub use ma_crossover::MaCrossoverSignal;
pub use session_playbook::SessionPlaybookSignal;

use crate::config::EngineConfig;
use crate::config::StrategyKind;
use crate::domain::{Bar, Signal};
use crate::indicators::IndicatorValues;
use crate::patterns::PatternSnapshot;

/// Strategy interface. `evaluate` may read `bars[..=index]` and the
/// snapshot for `index`, never anything later.
pub trait SignalGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Bars to skip at the start of the series before evaluation begins.
    fn warmup_bars(&self) -> usize;

    fn evaluate(
        &self,
        bars: &[Bar],
        index: usize,
        indicators: &IndicatorValues,
        patterns: &PatternSnapshot,
    ) -> Option<Signal>;
}

/// Instantiate the generator the configuration selects.
pub fn build(config: &EngineConfig) -> Box<dyn SignalGenerator> {
    match &config.strategy {
        StrategyKind::Ict(params) => Box::new(IctSignal::new(params.clone(), &config.indicators)),
        StrategyKind::SessionPlaybook(params) => Box::new(SessionPlaybookSignal::new(
            params.clone(),
            &config.indicators,
            config.session.clone(),
        )),
        StrategyKind::MaCrossover(params) => Box::new(MaCrossoverSignal::new(params.clone())),
        StrategyKind::BollingerSqueeze(params) => Box::new(BollingerSqueezeSignal::new(
            params.clone(),
            &config.indicators,
        )),
    }
}
