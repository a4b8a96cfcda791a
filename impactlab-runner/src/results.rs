//! Aggregated Monte Carlo results.

use serde::{Deserialize, Serialize};
use tracing::warn;

use impactlab_core::domain::{to_bps, ExecutionResult};

use crate::stats::Summary;

/// Name under which the benchmark strategy appears in a batch.
pub const BENCHMARK_STRATEGY: &str = "TWAP";

/// Per-strategy aggregate over all trials of one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResults {
    pub strategy: String,
    pub n_simulations: usize,
    /// Total cost of each trial in bps of arrival notional, in trial order.
    pub costs_bps: Vec<f64>,
    pub mean_cost: f64,
    /// Population standard deviation of `costs_bps`.
    pub std_cost: f64,
    pub median_cost: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
    /// `(benchmark mean − mean) / std`; 0 for the benchmark and when std is 0.
    pub risk_adjusted_savings: f64,
    pub value_at_risk_95: f64,
    pub mean_spread: f64,
    pub mean_temp_impact: f64,
    pub mean_perm_impact: f64,
    pub mean_opportunity: f64,
    pub mean_adverse: f64,
    #[serde(skip)]
    pub all_results: Vec<ExecutionResult>,
}

impl MonteCarloResults {
    /// Aggregate the trials of one strategy. `order_size` (signed) fixes the
    /// notional each trial's costs are expressed against; a sell order has a
    /// negative notional and therefore reports 0 bps.
    pub fn aggregate(strategy: &str, order_size: f64, all_results: Vec<ExecutionResult>) -> Self {
        let notional = |r: &ExecutionResult| r.notional(order_size);
        let costs_bps: Vec<f64> = all_results
            .iter()
            .map(|r| r.costs.total_bps(notional(r)))
            .collect();
        let component_mean = |component: fn(&ExecutionResult) -> f64| {
            let bps: Vec<f64> = all_results
                .iter()
                .map(|r| to_bps(component(r), notional(r)))
                .collect();
            crate::stats::mean(&bps)
        };

        let summary = Summary::of(&costs_bps);
        Self {
            strategy: strategy.to_string(),
            n_simulations: all_results.len(),
            mean_cost: summary.mean,
            std_cost: summary.std,
            median_cost: summary.median,
            percentile_5: summary.p5,
            percentile_95: summary.p95,
            risk_adjusted_savings: 0.0,
            value_at_risk_95: summary.p95,
            mean_spread: component_mean(|r| r.costs.spread),
            mean_temp_impact: component_mean(|r| r.costs.temporary),
            mean_perm_impact: component_mean(|r| r.costs.permanent),
            mean_opportunity: component_mean(|r| r.costs.opportunity),
            mean_adverse: component_mean(|r| r.costs.adverse_selection),
            costs_bps,
            all_results,
        }
    }
}

/// Ordered strategy name → aggregate mapping for one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResults {
    entries: Vec<MonteCarloResults>,
}

impl BatchResults {
    pub(crate) fn new(entries: Vec<MonteCarloResults>) -> Self {
        Self { entries }
    }

    pub fn get(&self, strategy: &str) -> Option<&MonteCarloResults> {
        self.entries.iter().find(|r| r.strategy == strategy)
    }

    pub fn contains(&self, strategy: &str) -> bool {
        self.get(strategy).is_some()
    }

    /// Aggregates in strategy submission order.
    pub fn iter(&self) -> impl Iterator<Item = &MonteCarloResults> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.strategy.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest mean cost, if any strategy ran.
    pub fn best_by_mean(&self) -> Option<&MonteCarloResults> {
        self.entries
            .iter()
            .min_by(|a, b| a.mean_cost.total_cmp(&b.mean_cost))
    }

    /// Set every non-benchmark entry's risk-adjusted savings against TWAP.
    ///
    /// Without a TWAP entry nothing changes.
    pub(crate) fn apply_benchmark(&mut self) {
        let Some(benchmark_mean) = self.get(BENCHMARK_STRATEGY).map(|r| r.mean_cost) else {
            warn!("no {BENCHMARK_STRATEGY} entry in batch; risk-adjusted savings left at 0");
            return;
        };
        for entry in self.entries.iter_mut() {
            let is_benchmark = entry.strategy == BENCHMARK_STRATEGY;
            entry.risk_adjusted_savings = if is_benchmark || entry.std_cost <= 0.0 {
                0.0
            } else {
                (benchmark_mean - entry.mean_cost) / entry.std_cost
            };
        }
    }
}

impl IntoIterator for BatchResults {
    type Item = MonteCarloResults;
    type IntoIter = std::vec::IntoIter<MonteCarloResults>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResults {
    type Item = &'a MonteCarloResults;
    type IntoIter = std::slice::Iter<'a, MonteCarloResults>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impactlab_core::domain::{CostBreakdown, ExecutionMetrics};

    fn trial(strategy: &str, trial_id: usize, spread: f64, temporary: f64) -> ExecutionResult {
        ExecutionResult {
            strategy: strategy.to_string(),
            trajectory: vec![100.0],
            market_states: Vec::new(),
            costs: CostBreakdown {
                spread,
                temporary,
                permanent: 0.0,
                opportunity: 1.0,
                adverse_selection: 0.0,
            },
            metrics: ExecutionMetrics {
                participation_rate: 0.0,
                active_periods: 1,
                arrival_price: 100.0,
                final_price: 100.0,
                total_cost_bps: 0.0,
            },
            trial_id,
            arrival_price: 100.0,
        }
    }

    fn entry(strategy: &str, costs: &[(f64, f64)]) -> MonteCarloResults {
        let trials = costs
            .iter()
            .enumerate()
            .map(|(i, &(s, t))| trial(strategy, i, s, t))
            .collect();
        MonteCarloResults::aggregate(strategy, 100.0, trials)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn aggregate_converts_to_bps_of_order_notional() {
        // notional = 100 × 100 = 10_000; 1.0 currency = 1 bps
        let r = entry("VWAP", &[(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(r.n_simulations, 2);
        assert_eq!(r.costs_bps.len(), 2);
        assert_close(r.costs_bps[0], 3.0);
        assert_close(r.costs_bps[1], 7.0);
        assert_close(r.mean_cost, 5.0);
        assert_close(r.std_cost, 2.0);
        assert_close(r.median_cost, 5.0);
        assert_eq!(r.value_at_risk_95, r.percentile_95);
        assert_close(r.mean_spread, 2.0);
        assert_close(r.mean_temp_impact, 3.0);
        // opportunity is reported but not part of the total
        assert_close(r.mean_opportunity, 1.0);
        assert_eq!(r.risk_adjusted_savings, 0.0);
    }

    #[test]
    fn sell_order_has_negative_notional_and_zero_bps() {
        let trials = vec![trial("TWAP", 0, 1.0, 2.0), trial("TWAP", 1, 3.0, 4.0)];
        let r = MonteCarloResults::aggregate("TWAP", -100.0, trials);
        assert_eq!(r.costs_bps, vec![0.0, 0.0]);
        assert_eq!(r.mean_cost, 0.0);
        assert_eq!(r.std_cost, 0.0);
        assert_eq!(r.mean_spread, 0.0);
        assert_eq!(r.mean_opportunity, 0.0);
    }

    #[test]
    fn benchmark_savings() {
        let mut batch = BatchResults::new(vec![
            entry("TWAP", &[(5.0, 5.0), (5.0, 5.0)]),
            entry("VWAP", &[(1.0, 2.0), (3.0, 4.0)]),
            entry("Naive", &[(4.0, 4.0), (4.0, 4.0)]),
        ]);
        batch.apply_benchmark();
        assert_eq!(batch.get("TWAP").unwrap().risk_adjusted_savings, 0.0);
        // (10 − 5) / 2
        assert_close(batch.get("VWAP").unwrap().risk_adjusted_savings, 2.5);
        // zero std stays at 0
        assert_eq!(batch.get("Naive").unwrap().risk_adjusted_savings, 0.0);
    }

    #[test]
    fn no_benchmark_leaves_savings_untouched() {
        let mut batch = BatchResults::new(vec![entry("VWAP", &[(1.0, 2.0), (3.0, 4.0)])]);
        batch.apply_benchmark();
        assert_eq!(batch.get("VWAP").unwrap().risk_adjusted_savings, 0.0);
    }

    #[test]
    fn preserves_submission_order() {
        let batch = BatchResults::new(vec![
            entry("VWAP", &[(1.0, 0.0)]),
            entry("TWAP", &[(2.0, 0.0)]),
        ]);
        assert_eq!(batch.names().collect::<Vec<_>>(), vec!["VWAP", "TWAP"]);
        assert_eq!(batch.best_by_mean().unwrap().strategy, "VWAP");
        assert!(batch.contains("TWAP"));
        assert!(!batch.contains("Naive"));
    }
}
