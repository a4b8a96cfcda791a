//! ImpactLab Core: market simulator, impact model, execution strategies.
//!
//! This crate contains everything needed to simulate one execution:
//! - Domain types (market states, regimes, cost breakdowns, execution results)
//! - Intraday market simulator with Heston-style volatility and stress scenarios
//! - Rolling-percentile regime classification
//! - Power-law temporary impact with exponential decay, square-root permanent impact
//! - Four trajectory generators (Naive, TWAP, VWAP, Almgren-Chriss)
//! - Deterministic per-trial RNG streams

pub mod domain;
pub mod impact;
pub mod market;
pub mod rng;
pub mod strategy;
