use serde::{Deserialize, Serialize};
use std::fmt;

/// Volatility axis of a regime label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

/// Spread axis of a regime label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadLevel {
    Tight,
    Normal,
    Wide,
}

/// Volume axis of a regime label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeLevel {
    Thin,
    Normal,
    Heavy,
}

impl VolatilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl SpreadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tight => "tight",
            Self::Normal => "normal",
            Self::Wide => "wide",
        }
    }
}

impl VolumeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thin => "thin",
            Self::Normal => "normal",
            Self::Heavy => "heavy",
        }
    }
}

/// Categorical market regime: where the current volatility, spread and
/// volume sit relative to their recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Regime {
    pub volatility: VolatilityLevel,
    pub spread: SpreadLevel,
    pub volume: VolumeLevel,
}

impl Regime {
    pub fn new(volatility: VolatilityLevel, spread: SpreadLevel, volume: VolumeLevel) -> Self {
        Self {
            volatility,
            spread,
            volume,
        }
    }

    /// Composite label, e.g. `"high_wide_thin"`.
    pub fn composite(&self) -> String {
        format!(
            "{}_{}_{}",
            self.volatility.as_str(),
            self.spread.as_str(),
            self.volume.as_str()
        )
    }
}

impl Default for Regime {
    fn default() -> Self {
        Self::new(VolatilityLevel::Medium, SpreadLevel::Normal, VolumeLevel::Normal)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composite())
    }
}

/// Snapshot of the simulated market after one period.
///
/// The spread is always derived from the quotes; it is never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Elapsed simulated time in trading days.
    pub time: f64,
    pub mid_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub bid_depth: f64,
    pub ask_depth: f64,
    /// Expected volume available in the period.
    pub volume: f64,
    /// Per-period volatility after any scenario multiplier.
    pub volatility: f64,
    pub regime: Regime,
}

impl MarketState {
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    pub fn regime_label(&self) -> String {
        self.regime.composite()
    }
}
