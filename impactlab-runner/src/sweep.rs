//! Sensitivity sweeps over order size and scenario.
//!
//! Each point gets its own configuration copy; the base configuration is never
//! modified.

use tracing::info;

use impactlab_core::market::Scenario;
use impactlab_core::strategy::ExecutionStrategy;

use crate::config::SimulationConfig;
use crate::monte_carlo::{McError, MonteCarloEngine};
use crate::results::BatchResults;

/// One batch per order size, in the order given.
pub fn sweep_order_sizes(
    config: &SimulationConfig,
    strategies: &[ExecutionStrategy],
    sizes: &[f64],
    n_simulations: usize,
    scenario: Scenario,
    parallel: bool,
) -> Result<Vec<(f64, BatchResults)>, McError> {
    sizes
        .iter()
        .map(|&size| {
            info!(order_size = size, "sweep point");
            let engine =
                MonteCarloEngine::new(config.with_order_size(size))?.with_parallelism(parallel);
            let batch = engine.run_batch(strategies, n_simulations, scenario, None)?;
            Ok((size, batch))
        })
        .collect()
}

/// One batch per scenario, in the order given.
pub fn sweep_scenarios(
    config: &SimulationConfig,
    strategies: &[ExecutionStrategy],
    scenarios: &[Scenario],
    n_simulations: usize,
    parallel: bool,
) -> Result<Vec<(Scenario, BatchResults)>, McError> {
    let engine = MonteCarloEngine::new(config.clone())?.with_parallelism(parallel);
    scenarios
        .iter()
        .map(|&scenario| {
            info!(%scenario, "sweep point");
            engine
                .run_batch(strategies, n_simulations, scenario, None)
                .map(|batch| (scenario, batch))
        })
        .collect()
}
