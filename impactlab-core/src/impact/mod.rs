//! Market impact and execution cost decomposition.

pub mod cost_model;
pub mod model;

pub use cost_model::{fill_vwap, CostModel};
pub use model::{ImpactModel, ImpactParams};
