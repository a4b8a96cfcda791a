//! Domain types for ImpactLab

pub mod costs;
pub mod execution;
pub mod market_state;

pub use costs::{to_bps, CostBreakdown};
pub use execution::{ExecutionMetrics, ExecutionResult};
pub use market_state::{MarketState, Regime, SpreadLevel, VolatilityLevel, VolumeLevel};
