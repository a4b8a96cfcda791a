//! ImpactLab Runner: Monte Carlo orchestration over the core simulator.
//!
//! This crate builds on `impactlab-core` to provide:
//! - Serializable simulation configuration with TOML loading and validation
//! - Per-trial market perturbation with common random numbers across strategies
//! - Sequential or rayon-parallel batch execution
//! - Cost statistics and TWAP-relative risk-adjusted savings
//! - Order-size and scenario sweeps
//! - JSON/CSV artifact export

pub mod config;
pub mod export;
pub mod monte_carlo;
pub mod results;
pub mod stats;
pub mod sweep;

pub use config::{
    ConfigError, MarketConfig, OrderConfig, PerturbationConfig, SimulationConfig, SimulationCounts,
};
pub use export::{export_batch, summary_json, trial_costs_csv, ExportPaths};
pub use monte_carlo::{perturb_market_params, McError, MonteCarloEngine, ProgressFn};
pub use results::{BatchResults, MonteCarloResults, BENCHMARK_STRATEGY};
pub use sweep::{sweep_order_sizes, sweep_scenarios};
