//! Monte Carlo engine: seeded trials per strategy over perturbed markets.
//!
//! Trial `i` of every strategy in a batch sees the same perturbed market
//! parameters and the same simulator noise (common random numbers), so
//! cross-strategy differences are not drowned out by market noise.

use std::collections::HashSet;

use rand::Rng;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use impactlab_core::domain::ExecutionResult;
use impactlab_core::impact::CostModel;
use impactlab_core::market::{MarketParams, MarketSimulator, Scenario};
use impactlab_core::rng::{RngHierarchy, RngStream};
use impactlab_core::strategy::{ExecutionError, ExecutionStrategy};

use crate::config::{ConfigError, SimulationConfig};
use crate::results::{BatchResults, MonteCarloResults};

/// Progress callback: `(strategy, completed_trials, total_trials)`.
pub type ProgressFn<'a> = dyn Fn(&str, usize, usize) + Sync + 'a;

/// Errors from a Monte Carlo batch.
#[derive(Debug, Error)]
pub enum McError {
    #[error("trial {trial} of {strategy} failed: {source}")]
    TrialFailed {
        strategy: String,
        trial: usize,
        #[source]
        source: ExecutionError,
    },
    #[error("strategy '{0}' appears more than once in the batch")]
    DuplicateStrategy(String),
    #[error("no strategies to simulate")]
    NoStrategies,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Baseline market parameters with trial `trial`'s uniform perturbations
/// applied to volatility, spread and depth.
///
/// Price, average daily volume and impact coefficients are never perturbed.
/// Bounds outside `[0, 1)` are rejected.
pub fn perturb_market_params(
    config: &SimulationConfig,
    trial: usize,
) -> Result<MarketParams, ConfigError> {
    config.perturbation.validate()?;
    let mut rng = RngHierarchy::new(config.base_seed).rng_for(trial, RngStream::Perturbation);
    let bounds = &config.perturbation;
    let mut draw = |bound: f64| 1.0 + rng.gen_range(-bound..=bound);

    let vol_mult = draw(bounds.vol);
    let spread_mult = draw(bounds.spread);
    let depth_mult = draw(bounds.depth);

    let base = config.market_params();
    Ok(MarketParams {
        base_vol: base.base_vol * vol_mult,
        base_spread: base.base_spread * spread_mult,
        base_depth: base.base_depth * depth_mult,
        ..base
    })
}

/// Runs batches of trials for a fixed configuration.
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    config: SimulationConfig,
    cost_model: CostModel,
    parallel: bool,
}

impl MonteCarloEngine {
    /// Validates `config`; an engine never holds an invalid configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let cost_model = CostModel::from_params(config.impact);
        Ok(Self {
            config,
            cost_model,
            parallel: true,
        })
    }

    /// Enables or disables running trials on the rayon pool.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Run one trial of one strategy. Deterministic in `(strategy, trial, scenario, config)`.
    pub fn run_single_trial(
        &self,
        strategy: &ExecutionStrategy,
        trial: usize,
        scenario: Scenario,
    ) -> Result<ExecutionResult, McError> {
        let params = perturb_market_params(&self.config, trial)?;
        let seed = RngHierarchy::new(self.config.base_seed).stream_seed(trial, RngStream::Market);
        let mut simulator = MarketSimulator::new(params, seed);
        simulator.inject_scenario(scenario);

        strategy
            .execute(
                self.config.order.size,
                self.config.order.horizon,
                &mut simulator,
                &self.cost_model,
                trial,
            )
            .map_err(|source| McError::TrialFailed {
                strategy: strategy.name().to_string(),
                trial,
                source,
            })
    }

    /// Run `n_simulations` trials of every strategy and aggregate them.
    ///
    /// Strategies are aggregated in submission order; once all are done,
    /// risk-adjusted savings are computed against TWAP if it is present.
    pub fn run_batch(
        &self,
        strategies: &[ExecutionStrategy],
        n_simulations: usize,
        scenario: Scenario,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<BatchResults, McError> {
        if strategies.is_empty() {
            return Err(McError::NoStrategies);
        }
        let mut seen = HashSet::new();
        for s in strategies {
            if !seen.insert(s.name()) {
                return Err(McError::DuplicateStrategy(s.name().to_string()));
            }
        }

        info!(
            strategies = strategies.len(),
            n_simulations,
            %scenario,
            parallel = self.parallel,
            "starting Monte Carlo batch"
        );

        let mut entries = Vec::with_capacity(strategies.len());
        for strategy in strategies {
            let trials = self.run_trials(strategy, n_simulations, scenario)?;
            let aggregate = MonteCarloResults::aggregate(strategy.name(), self.config.order.size, trials);
            info!(
                strategy = strategy.name(),
                mean_bps = aggregate.mean_cost,
                std_bps = aggregate.std_cost,
                "strategy aggregated"
            );
            if let Some(report) = progress {
                report(strategy.name(), n_simulations, n_simulations);
            }
            entries.push(aggregate);
        }

        let mut batch = BatchResults::new(entries);
        batch.apply_benchmark();
        Ok(batch)
    }

    /// Trials `0..n` of one strategy, in trial order.
    fn run_trials(
        &self,
        strategy: &ExecutionStrategy,
        n_simulations: usize,
        scenario: Scenario,
    ) -> Result<Vec<ExecutionResult>, McError> {
        debug!(strategy = strategy.name(), n_simulations, "running trials");
        if self.parallel {
            (0..n_simulations)
                .into_par_iter()
                .map(|trial| self.run_single_trial(strategy, trial, scenario))
                .collect()
        } else {
            (0..n_simulations)
                .map(|trial| self.run_single_trial(strategy, trial, scenario))
                .collect()
        }
    }
}
