use serde::{Deserialize, Serialize};

/// Cost decomposition of one execution, in currency units.
///
/// Every component is non-negative. `opportunity` (implementation shortfall)
/// is reported alongside the others but is not part of [`CostBreakdown::total`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub spread: f64,
    pub temporary: f64,
    pub permanent: f64,
    pub opportunity: f64,
    pub adverse_selection: f64,
}

impl CostBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    /// spread + temporary + permanent + adverse selection.
    pub fn total(&self) -> f64 {
        self.spread + self.temporary + self.permanent + self.adverse_selection
    }

    /// Total cost in basis points of `notional`; 0 when notional is not positive.
    pub fn total_bps(&self, notional: f64) -> f64 {
        to_bps(self.total(), notional)
    }
}

/// `amount / notional * 10_000`, or 0 when notional is not positive.
pub fn to_bps(amount: f64, notional: f64) -> f64 {
    if notional > 0.0 {
        amount / notional * 10_000.0
    } else {
        0.0
    }
}
