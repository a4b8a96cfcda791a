use serde::{Deserialize, Serialize};

use crate::strategy::TrajectoryGenerator;

/// Trades the whole order in the first period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Naive;

impl TrajectoryGenerator for Naive {
    fn generate_trajectory(&self, total_size: f64, horizon: usize) -> Vec<f64> {
        let mut trajectory = vec![0.0; horizon];
        if let Some(first) = trajectory.first_mut() {
            *first = total_size;
        }
        trajectory
    }

    fn name(&self) -> &'static str {
        "Naive"
    }
}
