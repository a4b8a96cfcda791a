//! Power-law market impact.
//!
//! Temporary impact per share is `γ · (|n|/V)^α · σ · P`; over a trajectory it
//! is scaled by the time-averaged fraction still active at the end of the
//! window under exponential decay. Permanent impact per share is
//! `η · (|X|/ADV)^β · P` on the whole order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactParams {
    /// Temporary impact coefficient γ (dimensionless).
    pub temp_gamma: f64,
    /// Temporary impact concavity α.
    pub temp_alpha: f64,
    /// Permanent impact coefficient η.
    pub perm_eta: f64,
    /// Permanent impact concavity β.
    pub perm_beta: f64,
    /// Half-life of temporary impact in periods. Non-positive disables decay.
    pub temp_half_life: f64,
}

impl Default for ImpactParams {
    fn default() -> Self {
        Self {
            temp_gamma: 0.1,
            temp_alpha: 0.65,
            perm_eta: 0.03,
            perm_beta: 0.42,
            temp_half_life: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImpactModel {
    params: ImpactParams,
    decay_rate: f64,
}

impl ImpactModel {
    pub fn new(params: ImpactParams) -> Self {
        let decay_rate = if params.temp_half_life > 0.0 {
            std::f64::consts::LN_2 / params.temp_half_life
        } else {
            f64::INFINITY
        };
        Self { params, decay_rate }
    }

    pub fn params(&self) -> &ImpactParams {
        &self.params
    }

    /// Decay rate `ln 2 / half_life`; infinite when decay is disabled.
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Temporary impact cost of one period's trade, in currency.
    pub fn temporary_instantaneous(
        &self,
        trade_size: f64,
        volume: f64,
        volatility: f64,
        price: f64,
    ) -> f64 {
        if trade_size == 0.0 || volume == 0.0 {
            return 0.0;
        }
        let participation = trade_size.abs() / volume;
        let per_share =
            self.params.temp_gamma * participation.powf(self.params.temp_alpha) * volatility * price;
        per_share * trade_size.abs()
    }

    /// Average fraction of impact still active over `remaining` periods.
    ///
    /// `(1 − e^(−r·m)) / (r·m)`, or 1 when the rate is infinite or `m` is zero.
    pub fn decay_factor(&self, remaining: usize) -> f64 {
        if self.decay_rate.is_finite() && remaining > 0 {
            let x = self.decay_rate * remaining as f64;
            (1.0 - (-x).exp()) / x
        } else {
            1.0
        }
    }

    /// Decayed temporary impact summed over a trajectory.
    ///
    /// All slices are indexed by period; the horizon is `trade_sizes.len()`.
    pub fn temporary_with_decay(
        &self,
        trade_sizes: &[f64],
        volumes: &[f64],
        volatilities: &[f64],
        prices: &[f64],
    ) -> f64 {
        let horizon = trade_sizes.len();
        let mut total = 0.0;
        for (t, &size) in trade_sizes.iter().enumerate() {
            if size == 0.0 {
                continue;
            }
            let (Some(&volume), Some(&vol), Some(&price)) =
                (volumes.get(t), volatilities.get(t), prices.get(t))
            else {
                break;
            };
            total += self.temporary_instantaneous(size, volume, vol, price)
                * self.decay_factor(horizon - t);
        }
        total
    }

    /// Permanent impact cost of the whole order, in currency.
    pub fn permanent(&self, total_size: f64, daily_volume: f64, price: f64) -> f64 {
        if total_size == 0.0 || daily_volume == 0.0 {
            return 0.0;
        }
        let participation = total_size.abs() / daily_volume;
        let per_share = self.params.perm_eta * participation.powf(self.params.perm_beta) * price;
        per_share * total_size.abs()
    }
}

impl Default for ImpactModel {
    fn default() -> Self {
        Self::new(ImpactParams::default())
    }
}
