//! Mean-reverting stochastic variance (Heston-style, full truncation).
//!
//! `v⁺ = max(v, 0)`, `v ← max(v⁺ + κ(θ − v⁺)dt + σᵥ√v⁺·dW, 0)`.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::market::MarketError;

/// Parameters of the variance process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityParams {
    pub initial_variance: f64,
    /// Mean-reversion speed κ.
    pub mean_reversion: f64,
    /// Long-run variance θ.
    pub long_run_variance: f64,
    /// Volatility of variance σᵥ.
    pub vol_of_vol: f64,
    /// Price/variance correlation ρ. Carried for configuration compatibility;
    /// price and variance innovations are drawn independently.
    pub correlation: f64,
}

impl VolatilityParams {
    /// Calibration used by the simulator for a per-period volatility `sigma`.
    pub fn for_period_volatility(sigma: f64) -> Self {
        let variance = sigma * sigma;
        Self {
            initial_variance: variance,
            mean_reversion: 3.0,
            long_run_variance: variance,
            vol_of_vol: 0.3,
            correlation: -0.7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StochasticVolatility {
    params: VolatilityParams,
    variance: f64,
}

impl StochasticVolatility {
    pub fn new(params: VolatilityParams) -> Self {
        Self {
            params,
            variance: params.initial_variance,
        }
    }

    pub fn params(&self) -> &VolatilityParams {
        &self.params
    }

    /// Current variance; never negative.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Instantaneous volatility without advancing the process.
    pub fn volatility(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }

    /// Advance one step of length `dt` and return the new volatility.
    ///
    /// A non-finite update is reported instead of being floored to zero.
    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Result<f64, MarketError> {
        let z: f64 = rng.sample(StandardNormal);
        let dw = z * dt.sqrt();

        let v_plus = self.variance.max(0.0);
        let p = &self.params;
        let next = v_plus + p.mean_reversion * (p.long_run_variance - v_plus) * dt
            + p.vol_of_vol * v_plus.sqrt() * dw;

        if !next.is_finite() {
            return Err(MarketError::NumericalFault {
                quantity: "variance",
                value: next,
            });
        }

        self.variance = next.max(0.0);
        Ok(self.variance.sqrt())
    }

    pub fn reset(&mut self) {
        self.variance = self.params.initial_variance;
    }
}
