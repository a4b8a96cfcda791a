use serde::{Deserialize, Serialize};

use crate::strategy::{rescale_to_total, TrajectoryGenerator, SUM_TOLERANCE};

/// Trades in proportion to a U-shaped intraday volume forecast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vwap;

impl Vwap {
    /// `1 + |t − 0.5|` over `horizon` evenly spaced points of `[0, 1]`.
    pub fn forecast_volume_profile(horizon: usize) -> Vec<f64> {
        let step = if horizon > 1 {
            1.0 / (horizon - 1) as f64
        } else {
            0.0
        };
        (0..horizon)
            .map(|i| 1.0 + (i as f64 * step - 0.5).abs())
            .collect()
    }
}

impl TrajectoryGenerator for Vwap {
    fn generate_trajectory(&self, total_size: f64, horizon: usize) -> Vec<f64> {
        let profile = Self::forecast_volume_profile(horizon);
        let weight_sum: f64 = profile.iter().sum();
        if weight_sum == 0.0 {
            return profile;
        }

        let mut trajectory: Vec<f64> = profile
            .iter()
            .map(|w| total_size * w / weight_sum)
            .collect();

        let actual: f64 = trajectory.iter().sum();
        if (actual - total_size).abs() > SUM_TOLERANCE {
            rescale_to_total(&mut trajectory, total_size);
        }
        trajectory
    }

    fn name(&self) -> &'static str {
        "VWAP"
    }
}
