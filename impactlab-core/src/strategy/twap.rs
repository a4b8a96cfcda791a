use serde::{Deserialize, Serialize};

use crate::strategy::TrajectoryGenerator;

/// Equal size every period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twap;

impl TrajectoryGenerator for Twap {
    fn generate_trajectory(&self, total_size: f64, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }
        vec![total_size / horizon as f64; horizon]
    }

    fn name(&self) -> &'static str {
        "TWAP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_slices() {
        let t = Twap.generate_trajectory(100_000.0, 120);
        assert_eq!(t.len(), 120);
        let expected = 100_000.0 / 120.0;
        assert!(t.iter().all(|&n| (n - expected).abs() < 1e-12));
        assert!((expected - 833.333_333).abs() < 1e-3);
    }

    #[test]
    fn sells_are_negative() {
        let t = Twap.generate_trajectory(-600.0, 3);
        assert_eq!(t, vec![-200.0, -200.0, -200.0]);
    }
}
