//! Regime classification from trailing-window percentiles.
//!
//! Each observation is ranked against the last `capacity` observations of the
//! same series and binned against a (low, high) percentile pair.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::{Regime, SpreadLevel, VolatilityLevel, VolumeLevel};

/// Observations required before the classifier leaves the default regime.
pub const MIN_OBSERVATIONS: usize = 5;

/// Percentile thresholds for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: 25.0,
            high: 75.0,
        }
    }
}

/// Position of a percentile relative to a threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Below,
    Within,
    Above,
}

impl Thresholds {
    fn band(&self, percentile: f64) -> Band {
        if percentile < self.low {
            Band::Below
        } else if percentile > self.high {
            Band::Above
        } else {
            Band::Within
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub window: usize,
    pub volatility: Thresholds,
    pub spread: Thresholds,
    pub volume: Thresholds,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            window: 20,
            volatility: Thresholds::default(),
            spread: Thresholds::default(),
            volume: Thresholds::default(),
        }
    }
}

/// Fixed-capacity FIFO of the most recent observations.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Percentile rank of `value` within the window, average-rank convention
    /// for ties. Returns 50 for an empty window.
    pub fn percentile_of(&self, value: f64) -> f64 {
        let n = self.values.len();
        if n == 0 {
            return 50.0;
        }
        let left = self.values.iter().filter(|&&v| v < value).count();
        let right = self.values.iter().filter(|&&v| v <= value).count();
        let plus_one = usize::from(left < right);
        (left + right + plus_one) as f64 * (50.0 / n as f64)
    }
}

#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    config: RegimeConfig,
    volatility: RollingWindow,
    spread: RollingWindow,
    volume: RollingWindow,
    observed: usize,
}

impl RegimeClassifier {
    pub fn new(config: RegimeConfig) -> Self {
        Self {
            config,
            volatility: RollingWindow::new(config.window),
            spread: RollingWindow::new(config.window),
            volume: RollingWindow::new(config.window),
            observed: 0,
        }
    }

    /// Total observations seen since construction or the last reset.
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Record one observation per series and label it.
    pub fn classify(&mut self, volatility: f64, spread: f64, volume: f64) -> Regime {
        self.volatility.push(volatility);
        self.spread.push(spread);
        self.volume.push(volume);
        self.observed += 1;

        if self.observed < MIN_OBSERVATIONS {
            return Regime::default();
        }

        let vol_level = match self
            .config
            .volatility
            .band(self.volatility.percentile_of(volatility))
        {
            Band::Below => VolatilityLevel::Low,
            Band::Within => VolatilityLevel::Medium,
            Band::Above => VolatilityLevel::High,
        };
        let spread_level = match self.config.spread.band(self.spread.percentile_of(spread)) {
            Band::Below => SpreadLevel::Tight,
            Band::Within => SpreadLevel::Normal,
            Band::Above => SpreadLevel::Wide,
        };
        let volume_level = match self.config.volume.band(self.volume.percentile_of(volume)) {
            Band::Below => VolumeLevel::Thin,
            Band::Within => VolumeLevel::Normal,
            Band::Above => VolumeLevel::Heavy,
        };

        Regime::new(vol_level, spread_level, volume_level)
    }

    pub fn reset(&mut self) {
        self.volatility.clear();
        self.spread.clear();
        self.volume.clear();
        self.observed = 0;
    }
}

impl Default for RegimeClassifier {
    fn default() -> Self {
        Self::new(RegimeConfig::default())
    }
}
