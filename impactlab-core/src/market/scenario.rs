//! Stress scenarios injected into the market simulator.
//!
//! Each scenario kind maps to one fixed [`ScenarioProfile`]. The numbers are
//! part of the model calibration and must not drift.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    #[default]
    None,
    FlashCrash,
    Momentum,
    LiquidityDrought,
}

/// Multipliers and drift applied while a scenario is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProfile {
    pub vol_multiplier: f64,
    pub spread_multiplier: f64,
    pub volume_multiplier: f64,
    /// Price drift per unit time as a fraction of price (`rate · P · dt`).
    pub drift_rate: f64,
    /// Number of periods the scenario stays active.
    pub duration: u32,
}

const FLASH_CRASH: ScenarioProfile = ScenarioProfile {
    vol_multiplier: 10.0,
    spread_multiplier: 5.0,
    volume_multiplier: 0.3,
    drift_rate: 0.0,
    duration: 10,
};

// 9999 periods outlasts any realistic horizon.
const MOMENTUM: ScenarioProfile = ScenarioProfile {
    vol_multiplier: 1.0,
    spread_multiplier: 1.0,
    volume_multiplier: 1.0,
    drift_rate: 0.0005,
    duration: 9999,
};

const LIQUIDITY_DROUGHT: ScenarioProfile = ScenarioProfile {
    vol_multiplier: 1.0,
    spread_multiplier: 2.0,
    volume_multiplier: 0.1,
    drift_rate: 0.0,
    duration: 30,
};

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::None,
        Scenario::FlashCrash,
        Scenario::Momentum,
        Scenario::LiquidityDrought,
    ];

    /// Fixed profile for this scenario; `None` has no profile.
    pub fn profile(&self) -> Option<ScenarioProfile> {
        match self {
            Self::None => None,
            Self::FlashCrash => Some(FLASH_CRASH),
            Self::Momentum => Some(MOMENTUM),
            Self::LiquidityDrought => Some(LIQUIDITY_DROUGHT),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FlashCrash => "flash_crash",
            Self::Momentum => "momentum",
            Self::LiquidityDrought => "liquidity_drought",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scenario '{0}' (expected none, flash_crash, momentum or liquidity_drought)")]
pub struct ParseScenarioError(pub String);

impl FromStr for Scenario {
    type Err = ParseScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "normal" => Ok(Self::None),
            "flash_crash" => Ok(Self::FlashCrash),
            "momentum" => Ok(Self::Momentum),
            "liquidity_drought" => Ok(Self::LiquidityDrought),
            _ => Err(ParseScenarioError(s.to_string())),
        }
    }
}

/// A scenario in progress inside a simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveScenario {
    pub kind: Scenario,
    pub profile: ScenarioProfile,
    pub remaining: u32,
}

impl ActiveScenario {
    pub fn start(kind: Scenario) -> Option<Self> {
        kind.profile().map(|profile| Self {
            kind,
            profile,
            remaining: profile.duration,
        })
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Consume one period. Returns whether the scenario applied to it.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }
}
