//! Serializable simulation configuration.
//!
//! A `SimulationConfig` is an immutable value: sweeps and CLI overrides build
//! modified copies through the `with_*` builders rather than mutating a shared
//! instance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use impactlab_core::impact::ImpactParams;
use impactlab_core::market::MarketParams;

/// Errors from configuration parsing and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Baseline market calibration shared by all trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub initial_price: f64,
    pub base_vol: f64,
    pub base_spread: f64,
    pub base_depth: f64,
    pub base_adv: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        let params = MarketParams::default();
        Self {
            initial_price: params.initial_price,
            base_vol: params.base_vol,
            base_spread: params.base_spread,
            base_depth: params.base_depth,
            base_adv: params.base_adv,
        }
    }
}

/// The parent order being worked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Signed share count; positive buys.
    pub size: f64,
    /// Execution horizon in periods.
    pub horizon: usize,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            size: 100_000.0,
            horizon: 120,
        }
    }
}

/// Half-widths of the uniform multiplicative perturbations applied per trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerturbationConfig {
    pub vol: f64,
    pub spread: f64,
    pub depth: f64,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            vol: 0.3,
            spread: 0.5,
            depth: 0.4,
        }
    }
}

impl PerturbationConfig {
    /// Every bound must lie in `[0, 1)`; larger bounds could flip a baseline's sign.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, bound) in [
            ("perturbation.vol", self.vol),
            ("perturbation.spread", self.spread),
            ("perturbation.depth", self.depth),
        ] {
            if !(0.0..1.0).contains(&bound) {
                return Err(invalid(field, format!("{bound} is outside [0, 1)")));
            }
        }
        Ok(())
    }
}

/// Trial counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationCounts {
    pub full: usize,
    pub quick: usize,
}

impl Default for SimulationCounts {
    fn default() -> Self {
        Self {
            full: 1000,
            quick: 300,
        }
    }
}

/// Complete configuration for a Monte Carlo batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub market: MarketConfig,
    pub impact: ImpactParams,
    pub order: OrderConfig,
    pub perturbation: PerturbationConfig,
    pub simulations: SimulationCounts,
    pub base_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            impact: ImpactParams::default(),
            order: OrderConfig::default(),
            perturbation: PerturbationConfig::default(),
            simulations: SimulationCounts::default(),
            base_seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Parse from TOML; missing sections and fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.market;
        require_positive("market.initial_price", m.initial_price)?;
        require_non_negative("market.base_vol", m.base_vol)?;
        require_non_negative("market.base_spread", m.base_spread)?;
        require_non_negative("market.base_depth", m.base_depth)?;
        require_positive("market.base_adv", m.base_adv)?;

        let i = &self.impact;
        require_non_negative("impact.temp_gamma", i.temp_gamma)?;
        require_non_negative("impact.temp_alpha", i.temp_alpha)?;
        require_non_negative("impact.perm_eta", i.perm_eta)?;
        require_non_negative("impact.perm_beta", i.perm_beta)?;
        if i.temp_half_life.is_nan() {
            return Err(invalid("impact.temp_half_life", "must not be NaN"));
        }

        if !self.order.size.is_finite() {
            return Err(invalid("order.size", "must be finite"));
        }
        if self.order.horizon == 0 {
            return Err(invalid("order.horizon", "must be at least one period"));
        }

        self.perturbation.validate()
    }

    /// Unperturbed simulator parameters. Temporary impact coefficients come
    /// from the impact section so the market and the cost model agree.
    pub fn market_params(&self) -> MarketParams {
        MarketParams {
            initial_price: self.market.initial_price,
            base_vol: self.market.base_vol,
            base_spread: self.market.base_spread,
            base_depth: self.market.base_depth,
            base_adv: self.market.base_adv,
            impact_gamma: self.impact.temp_gamma,
            impact_alpha: self.impact.temp_alpha,
        }
    }

    pub fn with_order_size(&self, size: f64) -> Self {
        let mut config = self.clone();
        config.order.size = size;
        config
    }

    pub fn with_horizon(&self, horizon: usize) -> Self {
        let mut config = self.clone();
        config.order.horizon = horizon;
        config
    }

    pub fn with_base_seed(&self, base_seed: u64) -> Self {
        let mut config = self.clone();
        config.base_seed = base_seed;
        config
    }

    /// Content hash identifying this configuration in exported artifacts.
    pub fn config_hash(&self) -> String {
        // Serializing plain numeric structs cannot fail; fall back to Debug anyway.
        let json = serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be positive and finite")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be non-negative and finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_calibration() {
        let c = SimulationConfig::default();
        assert_eq!(c.market.initial_price, 100.0);
        assert_eq!(c.market.base_vol, 0.02);
        assert_eq!(c.market.base_spread, 0.02);
        assert_eq!(c.market.base_depth, 10_000.0);
        assert_eq!(c.market.base_adv, 1_000_000.0);
        assert_eq!(c.impact.temp_gamma, 0.1);
        assert_eq!(c.impact.temp_alpha, 0.65);
        assert_eq!(c.impact.perm_eta, 0.03);
        assert_eq!(c.impact.perm_beta, 0.42);
        assert_eq!(c.impact.temp_half_life, 10.0);
        assert_eq!(c.order.size, 100_000.0);
        assert_eq!(c.order.horizon, 120);
        assert_eq!(c.perturbation, PerturbationConfig { vol: 0.3, spread: 0.5, depth: 0.4 });
        assert_eq!(c.simulations, SimulationCounts { full: 1000, quick: 300 });
        assert_eq!(c.base_seed, 42);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = SimulationConfig::from_toml_str(
            r#"
            base_seed = 7

            [order]
            size = 50000.0

            [impact]
            temp_alpha = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(c.base_seed, 7);
        assert_eq!(c.order.size, 50_000.0);
        assert_eq!(c.order.horizon, 120);
        assert_eq!(c.impact.temp_alpha, 0.5);
        assert_eq!(c.impact.temp_gamma, 0.1);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SimulationConfig::from_toml_str("[order\nsize = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = SimulationConfig::from_toml_str("[order]\nhorizon = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "order.horizon", .. }));

        let mut c = SimulationConfig::default();
        c.perturbation.spread = 1.5;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Invalid { field: "perturbation.spread", .. })
        ));

        let mut c = SimulationConfig::default();
        c.market.initial_price = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn builders_leave_original_untouched() {
        let base = SimulationConfig::default();
        let bigger = base.with_order_size(250_000.0);
        assert_eq!(base.order.size, 100_000.0);
        assert_eq!(bigger.order.size, 250_000.0);
        assert_eq!(base.with_horizon(60).order.horizon, 60);
        assert_eq!(base.with_base_seed(9).base_seed, 9);
    }

    #[test]
    fn market_params_take_impact_coefficients() {
        let mut c = SimulationConfig::default();
        c.impact.temp_gamma = 0.2;
        c.impact.temp_alpha = 0.5;
        let p = c.market_params();
        assert_eq!(p.impact_gamma, 0.2);
        assert_eq!(p.impact_alpha, 0.5);
        assert_eq!(p.initial_price, 100.0);
    }

    #[test]
    fn config_hash_is_content_addressed() {
        let a = SimulationConfig::default();
        let b = SimulationConfig::default();
        assert_eq!(a.config_hash(), b.config_hash());
        assert_eq!(a.config_hash().len(), 64);
        assert_ne!(a.config_hash(), a.with_order_size(1.0).config_hash());
    }
}
