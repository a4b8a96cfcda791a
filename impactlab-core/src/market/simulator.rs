//! Intraday market simulator.
//!
//! One `step` is one trading period (a minute of a 390-minute session). Price
//! mean-reverts around the initial price with stochastic volatility; expected
//! volume and spread follow intraday seasonal curves; external orders push the
//! price by a power-law temporary impact and widen the spread.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::MarketState;
use crate::market::regime::{RegimeClassifier, RegimeConfig};
use crate::market::scenario::{ActiveScenario, Scenario};
use crate::market::volatility::{StochasticVolatility, VolatilityParams};
use crate::market::MarketError;

/// Trading periods in one session.
pub const PERIODS_PER_DAY: u32 = 390;

/// Length of one period in trading days.
pub const PERIOD_DT: f64 = 1.0 / PERIODS_PER_DAY as f64;

/// Mean-reversion speed of price toward the initial price.
const PRICE_MEAN_REVERSION: f64 = 0.5;

/// Spread widening per unit of volatility relative to baseline.
const SPREAD_VOL_SENSITIVITY: f64 = 1.5;

/// Baseline market parameters for one simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketParams {
    pub initial_price: f64,
    /// Daily volatility; the per-period figure is `base_vol / √390`.
    pub base_vol: f64,
    /// Quoted spread in price units before seasonality.
    pub base_spread: f64,
    pub base_depth: f64,
    /// Average daily volume.
    pub base_adv: f64,
    /// Temporary price impact coefficient γ.
    pub impact_gamma: f64,
    /// Temporary price impact exponent α.
    pub impact_alpha: f64,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            base_vol: 0.02,
            base_spread: 0.02,
            base_depth: 10_000.0,
            base_adv: 1_000_000.0,
            impact_gamma: 0.1,
            impact_alpha: 0.65,
        }
    }
}

impl MarketParams {
    pub fn vol_per_period(&self) -> f64 {
        self.base_vol / (PERIODS_PER_DAY as f64).sqrt()
    }
}

/// Fraction of the session elapsed at `minute_of_day`.
fn session_fraction(minute_of_day: u32) -> f64 {
    minute_of_day as f64 / PERIODS_PER_DAY as f64
}

#[derive(Debug, Clone)]
pub struct MarketSimulator {
    params: MarketParams,
    regime_config: RegimeConfig,
    seed: u64,
    rng: StdRng,
    price: f64,
    time: f64,
    minute: u32,
    vol_per_period: f64,
    volatility: StochasticVolatility,
    regime: RegimeClassifier,
    scenario: Option<ActiveScenario>,
}

impl MarketSimulator {
    /// Build a simulator whose randomness comes only from `seed`.
    pub fn new(params: MarketParams, seed: u64) -> Self {
        Self::with_regime_config(params, RegimeConfig::default(), seed)
    }

    pub fn with_regime_config(params: MarketParams, regime_config: RegimeConfig, seed: u64) -> Self {
        let vol_per_period = params.vol_per_period();
        Self {
            params,
            regime_config,
            seed,
            rng: StdRng::seed_from_u64(seed),
            price: params.initial_price,
            time: 0.0,
            minute: 0,
            vol_per_period,
            volatility: StochasticVolatility::new(VolatilityParams::for_period_volatility(
                vol_per_period,
            )),
            regime: RegimeClassifier::new(regime_config),
            scenario: None,
        }
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Periods simulated so far.
    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn active_scenario(&self) -> Option<&ActiveScenario> {
        self.scenario.as_ref()
    }

    /// U-shaped expected volume: heavier near the open and close.
    pub fn seasonal_volume(&self, minute_of_day: u32) -> f64 {
        let t = session_fraction(minute_of_day);
        self.params.base_adv / PERIODS_PER_DAY as f64 * (1.0 + (t - 0.5).abs())
    }

    /// Spread seasonality: widest at midday.
    pub fn seasonal_spread(&self, minute_of_day: u32) -> f64 {
        let t = session_fraction(minute_of_day);
        self.params.base_spread * (1.2 - 0.4 * (t - 0.5).abs())
    }

    /// Advance one period, trading `external_order_size` (signed) against the book.
    pub fn step(&mut self, dt: f64, external_order_size: f64) -> Result<MarketState, MarketError> {
        self.time += dt;
        self.minute += 1;
        let minute_of_day = self.minute % PERIODS_PER_DAY;

        let mut expected_volume = self.seasonal_volume(minute_of_day);
        let mut spread = self.seasonal_spread(minute_of_day);

        let process_vol = self.volatility.step(dt, &mut self.rng)?;
        let mut current_vol = process_vol;

        let mut drift_rate = 0.0;
        if let Some(active) = self.scenario.as_mut() {
            if active.tick() {
                current_vol *= active.profile.vol_multiplier;
                spread *= active.profile.spread_multiplier;
                expected_volume *= active.profile.volume_multiplier;
                drift_rate = active.profile.drift_rate;
            }
        }

        let z: f64 = self.rng.sample(StandardNormal);
        let dw = z * dt.sqrt();
        let drift = drift_rate * self.price * dt;
        let dp = PRICE_MEAN_REVERSION * (self.params.initial_price - self.price) * dt
            + current_vol * self.price * dw
            + drift;
        self.price += dp;

        let order_size = external_order_size.abs();
        let participation = order_size / expected_volume.max(1.0);
        if external_order_size != 0.0 {
            let impact = self.params.impact_gamma
                * participation.powf(self.params.impact_alpha)
                * current_vol
                * self.price;
            self.price += external_order_size.signum() * impact;
        }

        if !self.price.is_finite() {
            return Err(MarketError::NumericalFault {
                quantity: "price",
                value: self.price,
            });
        }

        let vol_ratio = if self.vol_per_period > 0.0 {
            process_vol / self.vol_per_period
        } else {
            0.0
        };
        spread *= 1.0 + SPREAD_VOL_SENSITIVITY * vol_ratio;
        if external_order_size != 0.0 {
            spread *= 1.0 + 0.5 * participation;
        }

        let depth = self.params.base_depth / (1.0 + 0.5 * participation);

        let relative_spread = if self.price != 0.0 {
            spread / self.price
        } else {
            0.0
        };
        let regime = self
            .regime
            .classify(current_vol, relative_spread, expected_volume);

        Ok(MarketState {
            time: self.time,
            mid_price: self.price,
            bid: self.price - spread / 2.0,
            ask: self.price + spread / 2.0,
            bid_depth: depth,
            ask_depth: depth,
            volume: expected_volume,
            volatility: current_vol,
            regime,
        })
    }

    /// Start a stress scenario; `Scenario::None` clears any active one.
    pub fn inject_scenario(&mut self, scenario: Scenario) {
        debug!(%scenario, minute = self.minute, "scenario injected");
        self.scenario = ActiveScenario::start(scenario);
    }

    /// Return to construction-time state, including the random stream.
    pub fn reset(&mut self) {
        *self = Self::with_regime_config(self.params, self.regime_config, self.seed);
    }
}
