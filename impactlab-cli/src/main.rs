//! ImpactLab CLI: Monte Carlo execution-cost batches and sweeps.
//!
//! Commands:
//! - `run`: simulate a strategy set under one scenario and export artifacts
//! - `sweep`: repeat the batch across order sizes or scenarios

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::prelude::*;

use impactlab_core::market::Scenario;
use impactlab_core::strategy::ExecutionStrategy;
use impactlab_runner::{
    export_batch, sweep_order_sizes, sweep_scenarios, BatchResults, MonteCarloEngine,
    SimulationConfig,
};

#[derive(Parser)]
#[command(
    name = "impactlab",
    about = "ImpactLab CLI: Monte Carlo transaction-cost simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one Monte Carlo batch and write summary.json / trial_costs.csv.
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Scenario: none, flash_crash, momentum, liquidity_drought.
        #[arg(long, default_value = "none")]
        scenario: Scenario,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output: PathBuf,
    },
    /// Repeat the batch over several order sizes or every scenario.
    Sweep {
        #[command(flatten)]
        common: CommonArgs,

        /// Comma-separated order sizes. Without it, sweeps all scenarios.
        #[arg(long, value_delimiter = ',')]
        sizes: Vec<f64>,

        /// Scenario for order-size sweeps.
        #[arg(long, default_value = "none")]
        scenario: Scenario,

        /// Output directory; one subdirectory per sweep point.
        #[arg(long, default_value = "results/sweep")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to a TOML config file. Defaults to the reference calibration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trials per strategy. Defaults to the config's full count.
    #[arg(long)]
    simulations: Option<usize>,

    /// Use the config's quick trial count.
    #[arg(long, default_value_t = false, conflicts_with = "simulations")]
    quick: bool,

    /// Comma-separated strategies: naive, twap, vwap, almgren_chriss[:urgency].
    #[arg(long, value_delimiter = ',', default_value = "naive,twap,vwap,almgren_chriss")]
    strategies: Vec<ExecutionStrategy>,

    /// Override the order size (signed shares; positive buys).
    #[arg(long)]
    order_size: Option<f64>,

    /// Override the execution horizon (periods).
    #[arg(long)]
    horizon: Option<usize>,

    /// Override the base seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Run trials on one thread.
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

impl CommonArgs {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                SimulationConfig::from_toml_str(&content)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };
        if let Some(size) = self.order_size {
            config = config.with_order_size(size);
        }
        if let Some(horizon) = self.horizon {
            config = config.with_horizon(horizon);
        }
        if let Some(seed) = self.seed {
            config = config.with_base_seed(seed);
        }
        config.validate()?;
        Ok(config)
    }

    fn n_simulations(&self, config: &SimulationConfig) -> usize {
        match self.simulations {
            Some(n) => n,
            None if self.quick => config.simulations.quick,
            None => config.simulations.full,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            common,
            scenario,
            output,
        } => run_batch_cmd(&common, scenario, &output),
        Commands::Sweep {
            common,
            sizes,
            scenario,
            output,
        } => run_sweep_cmd(&common, &sizes, scenario, &output),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "impactlab=info,impactlab_core=info,impactlab_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run_batch_cmd(common: &CommonArgs, scenario: Scenario, output: &Path) -> Result<()> {
    let config = common.load_config()?;
    let n = common.n_simulations(&config);
    if n == 0 {
        bail!("--simulations must be at least 1");
    }

    let engine = MonteCarloEngine::new(config.clone())?.with_parallelism(!common.sequential);
    let progress = |name: &str, done: usize, total: usize| {
        info!(strategy = name, done, total, "strategy finished");
    };
    let batch = engine.run_batch(&common.strategies, n, scenario, Some(&progress))?;

    log_batch(&batch);
    let paths = export_batch(output, &config, scenario.as_str(), &batch)?;
    info!(
        summary = %paths.summary.display(),
        trial_costs = %paths.trial_costs.display(),
        "artifacts written"
    );
    Ok(())
}

fn run_sweep_cmd(
    common: &CommonArgs,
    sizes: &[f64],
    scenario: Scenario,
    output: &Path,
) -> Result<()> {
    let config = common.load_config()?;
    let n = common.n_simulations(&config);
    if n == 0 {
        bail!("--simulations must be at least 1");
    }
    let parallel = !common.sequential;

    if sizes.is_empty() {
        let points = sweep_scenarios(&config, &common.strategies, &Scenario::ALL, n, parallel)?;
        for (point, batch) in &points {
            info!(scenario = %point, "sweep point done");
            log_batch(batch);
            export_batch(&output.join(point.as_str()), &config, point.as_str(), batch)?;
        }
    } else {
        let points = sweep_order_sizes(&config, &common.strategies, sizes, n, scenario, parallel)?;
        for (size, batch) in &points {
            info!(order_size = size, "sweep point done");
            log_batch(batch);
            let point_config = config.with_order_size(*size);
            let dir = output.join(format!("size_{size}"));
            export_batch(&dir, &point_config, scenario.as_str(), batch)?;
        }
    }
    Ok(())
}

fn log_batch(batch: &BatchResults) {
    for entry in batch {
        info!(
            strategy = %entry.strategy,
            mean_bps = format_args!("{:.2}", entry.mean_cost),
            std_bps = format_args!("{:.2}", entry.std_cost),
            var95_bps = format_args!("{:.2}", entry.value_at_risk_95),
            risk_adjusted_savings = format_args!("{:.3}", entry.risk_adjusted_savings),
            "strategy summary"
        );
    }
}
