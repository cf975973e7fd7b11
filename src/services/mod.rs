pub mod engine;
pub mod gates;
pub mod runner;
pub mod series_store;
pub mod signals;

pub use engine::{evaluate, evaluate_with_inputs, GateEngine};
pub use gates::{GateContext, MarketInputs};
pub use runner::{load_watchlist, AssetOutcome, CycleReport, Runner};
pub use series_store::{SeriesSource, SeriesStore};
