use crate::domain::costs::CostBreakdown;
use crate::domain::market_state::MarketState;
use serde::{Deserialize, Serialize};

/// Summary metrics of one simulated execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Mean of |size| / volume over the periods that traded.
    pub participation_rate: f64,
    /// Number of periods with a nonzero trade.
    pub active_periods: usize,
    pub arrival_price: f64,
    pub final_price: f64,
    /// Total cost in bps of arrival notional.
    pub total_cost_bps: f64,
}

/// One simulated trial of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub strategy: String,
    /// Signed per-period trade sizes.
    pub trajectory: Vec<f64>,
    /// One state per trajectory period.
    pub market_states: Vec<MarketState>,
    pub costs: CostBreakdown,
    pub metrics: ExecutionMetrics,
    pub trial_id: usize,
    pub arrival_price: f64,
}

impl ExecutionResult {
    pub fn total_size(&self) -> f64 {
        self.trajectory.iter().sum()
    }

    /// Arrival notional for `order_size` shares.
    pub fn notional(&self, order_size: f64) -> f64 {
        self.arrival_price * order_size
    }
}
