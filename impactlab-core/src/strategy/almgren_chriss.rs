//! Almgren-Chriss risk-averse liquidation schedule.
//!
//! Remaining inventory follows `X_t = X · sinh(κ(T − t)) / sinh(κT)` with
//! `κT` equal to the urgency. Higher urgency front-loads more aggressively.

use serde::{Deserialize, Serialize};

use crate::strategy::{rescale_to_total, TrajectoryGenerator, SUM_TOLERANCE};

pub const MIN_URGENCY: f64 = 0.1;
pub const MAX_URGENCY: f64 = 10.0;
pub const DEFAULT_URGENCY: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlmgrenChriss {
    /// κ·T. Clamped to `[0.1, 10]` when the trajectory is built.
    pub urgency: f64,
}

impl AlmgrenChriss {
    pub fn new(urgency: f64) -> Self {
        Self { urgency }
    }

    pub fn effective_urgency(&self) -> f64 {
        if self.urgency.is_nan() {
            return MIN_URGENCY;
        }
        self.urgency.clamp(MIN_URGENCY, MAX_URGENCY)
    }
}

impl Default for AlmgrenChriss {
    fn default() -> Self {
        Self::new(DEFAULT_URGENCY)
    }
}

impl TrajectoryGenerator for AlmgrenChriss {
    fn generate_trajectory(&self, total_size: f64, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }

        let urgency = self.effective_urgency();
        let kappa = urgency / horizon as f64;
        let sinh_urgency = urgency.sinh();
        let inventory = |t: usize| total_size * (kappa * (horizon - t) as f64).sinh() / sinh_urgency;

        let mut trajectory = Vec::with_capacity(horizon);
        for t in 0..horizon - 1 {
            trajectory.push((inventory(t) - inventory(t + 1)).max(0.0));
        }
        let allocated: f64 = trajectory.iter().sum();
        trajectory.push(total_size - allocated);

        let actual: f64 = trajectory.iter().sum();
        if (actual - total_size).abs() > SUM_TOLERANCE && actual > 0.0 {
            rescale_to_total(&mut trajectory, total_size);
        }
        trajectory
    }

    fn name(&self) -> &'static str {
        "Almgren-Chriss"
    }
}
