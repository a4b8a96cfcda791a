//! Cost model: decomposes the cost of an executed trajectory.
//!
//! Spread cost is half the quoted spread per share. Temporary and permanent
//! impact come from the [`ImpactModel`]. Opportunity cost and adverse
//! selection are measured from the realized fill VWAP: buys fill at the ask,
//! sells at the bid, in whole shares.

use crate::domain::{CostBreakdown, MarketState};
use crate::impact::model::{ImpactModel, ImpactParams};

#[derive(Debug, Clone, Default)]
pub struct CostModel {
    impact: ImpactModel,
}

impl CostModel {
    pub fn new(impact: ImpactModel) -> Self {
        Self { impact }
    }

    pub fn from_params(params: ImpactParams) -> Self {
        Self::new(ImpactModel::new(params))
    }

    pub fn impact(&self) -> &ImpactModel {
        &self.impact
    }

    /// Compute the cost breakdown of `trajectory` executed against `states`.
    ///
    /// `states[t]` is the market state produced while trading `trajectory[t]`.
    pub fn compute_costs(
        &self,
        trajectory: &[f64],
        states: &[MarketState],
        arrival_price: f64,
    ) -> CostBreakdown {
        debug_assert_eq!(trajectory.len(), states.len(), "one state per period");

        let total_shares: f64 = trajectory.iter().sum();
        if total_shares == 0.0 {
            return CostBreakdown::zero();
        }

        let spread: f64 = trajectory
            .iter()
            .zip(states)
            .map(|(n, s)| 0.5 * s.spread() * n.abs())
            .sum();

        let volumes: Vec<f64> = states.iter().map(|s| s.volume).collect();
        let volatilities: Vec<f64> = states.iter().map(|s| s.volatility).collect();
        let prices: Vec<f64> = states.iter().map(|s| s.mid_price).collect();
        let temporary = self
            .impact
            .temporary_with_decay(trajectory, &volumes, &volatilities, &prices);

        let daily_volume = if volumes.is_empty() {
            0.0
        } else {
            let mean = volumes.iter().sum::<f64>() / volumes.len() as f64;
            mean * volumes.len() as f64
        };
        let permanent = self
            .impact
            .permanent(total_shares, daily_volume, arrival_price);

        let vwap = fill_vwap(trajectory, states).unwrap_or(arrival_price);

        let opportunity = ((vwap - arrival_price) * total_shares).max(0.0);

        let final_price = states.last().map_or(arrival_price, |s| s.mid_price);
        let post_trade_drift = (final_price - vwap) * total_shares;
        let adverse_selection = if total_shares > 0.0 {
            (-post_trade_drift).max(0.0)
        } else {
            post_trade_drift.max(0.0)
        };

        CostBreakdown {
            spread,
            temporary,
            permanent,
            opportunity,
            adverse_selection,
        }
    }
}

/// Average fill price over whole shares: ask for buys, bid for sells.
///
/// Fractional shares are truncated per period. `None` when no whole share traded.
pub fn fill_vwap(trajectory: &[f64], states: &[MarketState]) -> Option<f64> {
    let mut notional = 0.0;
    let mut shares = 0.0;
    for (&n, state) in trajectory.iter().zip(states) {
        let whole = n.abs().trunc();
        if whole == 0.0 {
            continue;
        }
        let price = if n > 0.0 { state.ask } else { state.bid };
        notional += price * whole;
        shares += whole;
    }
    if shares > 0.0 {
        Some(notional / shares)
    } else {
        None
    }
}
