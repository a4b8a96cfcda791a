//! Integration tests for Monte Carlo batches.
//!
//! Covers reproducibility, parallel/sequential equivalence, the common
//! random number pairing across strategies, aggregate identities, and
//! artifact export.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use impactlab_core::market::Scenario;
use impactlab_core::strategy::ExecutionStrategy;
use impactlab_runner::{export_batch, BatchResults, MonteCarloEngine, SimulationConfig};

const TRIALS: usize = 12;

// ─── Helpers ──────────────────────────────────────────────────────────

fn config() -> SimulationConfig {
    SimulationConfig::default()
        .with_order_size(50_000.0)
        .with_horizon(40)
}

fn run(parallel: bool, scenario: Scenario) -> BatchResults {
    MonteCarloEngine::new(config())
        .unwrap()
        .with_parallelism(parallel)
        .run_batch(&ExecutionStrategy::standard_set(), TRIALS, scenario, None)
        .unwrap()
}

// ─── Reproducibility ──────────────────────────────────────────────────

#[test]
fn batches_are_reproducible() {
    assert_eq!(run(false, Scenario::None), run(false, Scenario::None));
}

#[test]
fn parallel_matches_sequential() {
    let seq = run(false, Scenario::FlashCrash);
    let par = run(true, Scenario::FlashCrash);
    // Equality covers every retained ExecutionResult.
    assert_eq!(seq, par);
}

#[test]
fn different_base_seed_changes_costs() {
    let a = run(false, Scenario::None);
    let b = MonteCarloEngine::new(config().with_base_seed(43))
        .unwrap()
        .with_parallelism(false)
        .run_batch(&ExecutionStrategy::standard_set(), TRIALS, Scenario::None, None)
        .unwrap();
    assert_ne!(a.get("TWAP").unwrap().costs_bps, b.get("TWAP").unwrap().costs_bps);
}

// ─── Common random numbers ────────────────────────────────────────────

#[test]
fn strategies_share_market_paths_per_trial() {
    // With zero orders every strategy leaves the market untouched, so trial i
    // must produce the identical path whichever strategy ran it.
    let engine = MonteCarloEngine::new(config().with_order_size(0.0))
        .unwrap()
        .with_parallelism(false);
    let batch = engine
        .run_batch(&ExecutionStrategy::standard_set(), 5, Scenario::Momentum, None)
        .unwrap();
    let naive = batch.get("Naive").unwrap();
    for entry in batch.iter() {
        for (a, b) in naive.all_results.iter().zip(&entry.all_results) {
            assert_eq!(a.trial_id, b.trial_id);
            assert_eq!(a.market_states, b.market_states, "{}", entry.strategy);
        }
    }
}

#[test]
fn same_trial_sees_same_market_baseline() {
    // Expected volume and the volatility process do not react to orders.
    let engine = MonteCarloEngine::new(config()).unwrap().with_parallelism(false);
    let vwap = engine
        .run_single_trial(&ExecutionStrategy::Vwap, 4, Scenario::None)
        .unwrap();
    let twap = engine
        .run_single_trial(&ExecutionStrategy::Twap, 4, Scenario::None)
        .unwrap();
    assert_eq!(vwap.arrival_price, twap.arrival_price);
    assert_eq!(vwap.market_states[0].volume, twap.market_states[0].volume);
    assert_eq!(vwap.market_states[0].volatility, twap.market_states[0].volatility);
}

// ─── Aggregates ───────────────────────────────────────────────────────

#[test]
fn aggregates_are_consistent() {
    let batch = run(false, Scenario::None);
    assert_eq!(
        batch.names().collect::<Vec<_>>(),
        vec!["Naive", "TWAP", "VWAP", "Almgren-Chriss"]
    );
    for entry in batch.iter() {
        assert_eq!(entry.n_simulations, TRIALS);
        assert_eq!(entry.costs_bps.len(), TRIALS);
        assert_eq!(entry.all_results.len(), TRIALS);
        let mean = entry.costs_bps.iter().sum::<f64>() / TRIALS as f64;
        assert!((entry.mean_cost - mean).abs() < 1e-9);
        assert_eq!(entry.value_at_risk_95, entry.percentile_95);
        assert!(entry.percentile_5 <= entry.median_cost);
        assert!(entry.median_cost <= entry.percentile_95);
        for (i, r) in entry.all_results.iter().enumerate() {
            assert_eq!(r.trial_id, i);
            assert_eq!(r.strategy, entry.strategy);
        }
    }
}

#[test]
fn twap_savings_are_zero_and_others_follow_formula() {
    let batch = run(false, Scenario::None);
    let twap = batch.get("TWAP").unwrap();
    assert_eq!(twap.risk_adjusted_savings, 0.0);
    for entry in batch.iter().filter(|e| e.strategy != "TWAP") {
        let expected = if entry.std_cost > 0.0 {
            (twap.mean_cost - entry.mean_cost) / entry.std_cost
        } else {
            0.0
        };
        assert!((entry.risk_adjusted_savings - expected).abs() < 1e-12);
    }
}

#[test]
fn sell_batch_reports_zero_bps() {
    let batch = MonteCarloEngine::new(config().with_order_size(-50_000.0))
        .unwrap()
        .with_parallelism(false)
        .run_batch(&[ExecutionStrategy::Twap], 4, Scenario::None, None)
        .unwrap();
    let twap = batch.get("TWAP").unwrap();
    assert!(twap.costs_bps.iter().all(|&bps| bps == 0.0));
    assert_eq!(twap.mean_cost, 0.0);
    assert_eq!(twap.percentile_95, 0.0);
    // Currency costs are still recorded per trial.
    assert!(twap.all_results.iter().all(|r| r.costs.spread > 0.0));
}

#[test]
fn invalid_perturbation_is_rejected_before_any_trial() {
    let mut bad = config();
    bad.perturbation.vol = -0.1;
    assert!(MonteCarloEngine::new(bad.clone()).is_err());
    let err = impactlab_runner::sweep_scenarios(
        &bad,
        &[ExecutionStrategy::Twap],
        &[Scenario::None],
        2,
        false,
    )
    .unwrap_err();
    assert!(matches!(err, impactlab_runner::McError::Config(_)));
}

#[test]
fn batch_without_twap_has_no_savings() {
    let batch = MonteCarloEngine::new(config())
        .unwrap()
        .run_batch(&[ExecutionStrategy::Naive, ExecutionStrategy::Vwap], 4, Scenario::None, None)
        .unwrap();
    assert!(batch.iter().all(|e| e.risk_adjusted_savings == 0.0));
}

#[test]
fn progress_reports_each_strategy_in_order() {
    let calls = Mutex::new(Vec::new());
    let count = AtomicUsize::new(0);
    let progress = |name: &str, done: usize, total: usize| {
        count.fetch_add(1, Ordering::SeqCst);
        calls.lock().unwrap().push((name.to_string(), done, total));
    };
    MonteCarloEngine::new(config())
        .unwrap()
        .run_batch(&ExecutionStrategy::standard_set(), 3, Scenario::None, Some(&progress))
        .unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 4);
    let calls = calls.into_inner().unwrap();
    assert_eq!(calls[0], ("Naive".to_string(), 3, 3));
    assert_eq!(calls[3].0, "Almgren-Chriss");
}

// ─── Export ───────────────────────────────────────────────────────────

#[test]
fn export_writes_summary_and_trial_rows() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out = temp_dir.path().join("run");
    let batch = run(false, Scenario::LiquidityDrought);

    let paths = export_batch(&out, &config(), "liquidity_drought", &batch).unwrap();
    assert!(paths.summary.exists());
    assert!(paths.trial_costs.exists());

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.summary).unwrap()).unwrap();
    assert_eq!(summary["schema_version"], 1);
    assert_eq!(summary["scenario"], "liquidity_drought");
    assert_eq!(summary["config_hash"], config().config_hash());
    let strategies = summary["strategies"].as_array().unwrap();
    assert_eq!(strategies.len(), 4);
    assert_eq!(strategies[1]["strategy"], "TWAP");
    assert!(strategies[0].get("all_results").is_none());

    let csv = std::fs::read_to_string(&paths.trial_costs).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "strategy,trial,arrival_price,spread,temporary,permanent,opportunity,adverse_selection,total_bps"
    );
    assert_eq!(lines.count(), 4 * TRIALS);
}
