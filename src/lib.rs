//! Gatekeeper - gate evaluation engine for trade signals
//!
//! Computes technical indicators over OHLC series, turns each reading into a
//! long/short gate verdict and combines the gates into one trade decision
//! per asset.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{Config, GateSettings, MarketHours};
pub use error::{GateError, Result};
pub use services::{
    evaluate, evaluate_with_inputs, GateEngine, MarketInputs, SeriesSource, SeriesStore,
};
pub use types::*;
