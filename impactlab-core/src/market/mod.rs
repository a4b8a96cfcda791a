//! Market model: stochastic volatility, regime classification, scenarios and
//! the intraday simulator that composes them.

pub mod regime;
pub mod scenario;
pub mod simulator;
pub mod volatility;

pub use regime::{RegimeClassifier, RegimeConfig, RollingWindow, Thresholds};
pub use scenario::{ActiveScenario, ParseScenarioError, Scenario, ScenarioProfile};
pub use simulator::{MarketParams, MarketSimulator, PERIODS_PER_DAY, PERIOD_DT};
pub use volatility::{StochasticVolatility, VolatilityParams};

use thiserror::Error;

/// Errors raised while advancing the market.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// A state variable left the finite reals. The trial cannot continue.
    #[error("numerical fault: {quantity} became {value}")]
    NumericalFault { quantity: &'static str, value: f64 },
}
