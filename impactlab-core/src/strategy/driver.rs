//! Runs a strategy's trajectory through a market simulator and prices it.

use thiserror::Error;
use tracing::debug;

use crate::domain::{ExecutionMetrics, ExecutionResult, MarketState};
use crate::impact::CostModel;
use crate::market::{MarketError, MarketSimulator, PERIOD_DT};
use crate::strategy::ExecutionStrategy;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("{strategy} trial {trial}: market fault at period {period}")]
    Market {
        strategy: &'static str,
        trial: usize,
        period: usize,
        #[source]
        source: MarketError,
    },
}

/// Execute `total_size` shares over `horizon` periods.
///
/// The arrival price is the simulator's price before the first step. Each
/// period steps the simulator once with that period's trade; the resulting
/// states are priced by `cost_model`.
pub fn execute(
    strategy: &ExecutionStrategy,
    total_size: f64,
    horizon: usize,
    simulator: &mut MarketSimulator,
    cost_model: &CostModel,
    trial_id: usize,
) -> Result<ExecutionResult, ExecutionError> {
    let arrival_price = simulator.price();
    let trajectory = strategy.generate_trajectory(total_size, horizon);

    let mut market_states = Vec::with_capacity(trajectory.len());
    for (period, &size) in trajectory.iter().enumerate() {
        let state = simulator
            .step(PERIOD_DT, size)
            .map_err(|source| ExecutionError::Market {
                strategy: strategy.name(),
                trial: trial_id,
                period,
                source,
            })?;
        market_states.push(state);
    }

    let costs = cost_model.compute_costs(&trajectory, &market_states, arrival_price);
    let final_price = market_states.last().map_or(arrival_price, |s| s.mid_price);
    let total_cost_bps = costs.total_bps(arrival_price * total_size);

    let metrics = ExecutionMetrics {
        participation_rate: participation_rate(&trajectory, &market_states),
        active_periods: trajectory.iter().filter(|&&n| n != 0.0).count(),
        arrival_price,
        final_price,
        total_cost_bps,
    };

    debug!(
        strategy = strategy.name(),
        trial = trial_id,
        total_cost_bps,
        final_price,
        "execution complete"
    );

    Ok(ExecutionResult {
        strategy: strategy.name().to_string(),
        trajectory,
        market_states,
        costs,
        metrics,
        trial_id,
        arrival_price,
    })
}

/// Mean `|n| / volume` over the periods that traded against positive volume.
fn participation_rate(trajectory: &[f64], states: &[MarketState]) -> f64 {
    let rates: Vec<f64> = trajectory
        .iter()
        .zip(states)
        .filter(|(n, s)| **n != 0.0 && s.volume > 0.0)
        .map(|(n, s)| n.abs() / s.volume)
        .collect();
    if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    }
}
