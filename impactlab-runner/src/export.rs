//! Raw-data export of batch results (JSON summary and per-trial CSV).
//!
//! Output is meant for external reporting tools; nothing here formats tables
//! for humans.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::results::{BatchResults, MonteCarloResults};

/// Current schema version for exported artifacts.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    schema_version: u32,
    config_hash: String,
    config: &'a SimulationConfig,
    scenario: &'a str,
    strategies: Vec<&'a MonteCarloResults>,
}

/// Paths of the files written by [`export_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub summary: PathBuf,
    pub trial_costs: PathBuf,
}

/// Serialize per-strategy aggregates (without raw trials) to pretty JSON.
pub fn summary_json(config: &SimulationConfig, scenario: &str, batch: &BatchResults) -> Result<String> {
    let doc = SummaryDocument {
        schema_version: SCHEMA_VERSION,
        config_hash: config.config_hash(),
        config,
        scenario,
        strategies: batch.iter().collect(),
    };
    serde_json::to_string_pretty(&doc).context("failed to serialize batch summary to JSON")
}

/// One row per strategy × trial with the cost components in currency and
/// the total in bps.
pub fn trial_costs_csv(batch: &BatchResults) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "strategy",
        "trial",
        "arrival_price",
        "spread",
        "temporary",
        "permanent",
        "opportunity",
        "adverse_selection",
        "total_bps",
    ])?;

    for entry in batch {
        for (result, bps) in entry.all_results.iter().zip(&entry.costs_bps) {
            let c = &result.costs;
            wtr.write_record([
                &entry.strategy,
                &result.trial_id.to_string(),
                &format!("{:.6}", result.arrival_price),
                &format!("{:.6}", c.spread),
                &format!("{:.6}", c.temporary),
                &format!("{:.6}", c.permanent),
                &format!("{:.6}", c.opportunity),
                &format!("{:.6}", c.adverse_selection),
                &format!("{:.6}", bps),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write `summary.json` and `trial_costs.csv` under `output_dir`, creating it if needed.
pub fn export_batch(
    output_dir: &Path,
    config: &SimulationConfig,
    scenario: &str,
    batch: &BatchResults,
) -> Result<ExportPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let summary = output_dir.join("summary.json");
    std::fs::write(&summary, summary_json(config, scenario, batch)?)
        .with_context(|| format!("failed to write {}", summary.display()))?;

    let trial_costs = output_dir.join("trial_costs.csv");
    std::fs::write(&trial_costs, trial_costs_csv(batch)?)
        .with_context(|| format!("failed to write {}", trial_costs.display()))?;

    Ok(ExportPaths {
        summary,
        trial_costs,
    })
}
