//! Execution strategies: turn a parent order into a per-period schedule.
//!
//! The set of strategies is closed: [`ExecutionStrategy`] enumerates them and
//! dispatches to the concrete [`TrajectoryGenerator`] of each variant.

pub mod almgren_chriss;
pub mod driver;
pub mod naive;
pub mod twap;
pub mod vwap;

pub use almgren_chriss::AlmgrenChriss;
pub use driver::{execute, ExecutionError};
pub use naive::Naive;
pub use twap::Twap;
pub use vwap::Vwap;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ExecutionResult;
use crate::impact::CostModel;
use crate::market::MarketSimulator;

/// Absolute tolerance on `sum(trajectory) − total_size`.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Schedule generation.
///
/// # Contract
/// The returned trajectory has `horizon` entries of signed sizes whose sum
/// equals `total_size` within [`SUM_TOLERANCE`].
pub trait TrajectoryGenerator: Send + Sync {
    fn generate_trajectory(&self, total_size: f64, horizon: usize) -> Vec<f64>;

    /// Display name, also the key of this strategy in batch results.
    fn name(&self) -> &'static str;
}

/// Scale `trajectory` in place so that it sums to `total_size`.
///
/// Leaves it untouched when the current sum is zero.
pub(crate) fn rescale_to_total(trajectory: &mut [f64], total_size: f64) {
    let actual: f64 = trajectory.iter().sum();
    if actual == 0.0 {
        return;
    }
    for n in trajectory.iter_mut() {
        *n = *n * total_size / actual;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionStrategy {
    Naive,
    Twap,
    Vwap,
    AlmgrenChriss(AlmgrenChriss),
}

impl ExecutionStrategy {
    /// The four standard strategies, Almgren-Chriss at default urgency.
    pub fn standard_set() -> Vec<ExecutionStrategy> {
        vec![
            Self::Naive,
            Self::Twap,
            Self::Vwap,
            Self::AlmgrenChriss(AlmgrenChriss::default()),
        ]
    }

    fn generator(&self) -> &dyn TrajectoryGenerator {
        match self {
            Self::Naive => &Naive,
            Self::Twap => &Twap,
            Self::Vwap => &Vwap,
            Self::AlmgrenChriss(ac) => ac,
        }
    }

    pub fn name(&self) -> &'static str {
        self.generator().name()
    }

    pub fn is_benchmark(&self) -> bool {
        matches!(self, Self::Twap)
    }

    pub fn generate_trajectory(&self, total_size: f64, horizon: usize) -> Vec<f64> {
        self.generator().generate_trajectory(total_size, horizon)
    }

    /// Run this strategy against `simulator`; see [`driver::execute`].
    pub fn execute(
        &self,
        total_size: f64,
        horizon: usize,
        simulator: &mut MarketSimulator,
        cost_model: &CostModel,
        trial_id: usize,
    ) -> Result<ExecutionResult, ExecutionError> {
        execute(self, total_size, horizon, simulator, cost_model, trial_id)
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseStrategyError {
    #[error("unknown strategy '{0}' (expected naive, twap, vwap or almgren_chriss[:urgency])")]
    Unknown(String),
    #[error("invalid urgency '{0}'")]
    InvalidUrgency(String),
}

impl FromStr for ExecutionStrategy {
    type Err = ParseStrategyError;

    /// Accepts `naive`, `twap`, `vwap`, `almgren_chriss` (alias `ac`), the
    /// latter optionally suffixed with `:<urgency>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (kind, arg) = match lowered.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (lowered.as_str(), None),
        };
        match (kind, arg) {
            ("naive", None) => Ok(Self::Naive),
            ("twap", None) => Ok(Self::Twap),
            ("vwap", None) => Ok(Self::Vwap),
            ("almgren_chriss" | "almgren-chriss" | "ac", None) => {
                Ok(Self::AlmgrenChriss(AlmgrenChriss::default()))
            }
            ("almgren_chriss" | "almgren-chriss" | "ac", Some(arg)) => arg
                .parse::<f64>()
                .map(|u| Self::AlmgrenChriss(AlmgrenChriss::new(u)))
                .map_err(|_| ParseStrategyError::InvalidUrgency(arg.to_string())),
            _ => Err(ParseStrategyError::Unknown(s.to_string())),
        }
    }
}
