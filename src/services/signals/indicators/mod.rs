//! Technical indicator implementations.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod extreme;
pub mod ichimoku;
pub mod macd;
pub mod momentum;
pub mod rsi;
pub mod trend;
pub mod vortex;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::{BollingerBands, BollingerReading};
pub use cci::{Cci, CciReading};
pub use ema::{EmaDema, EmaDemaReading};
pub use extreme::{ExtremeReading, RecentExtreme};
pub use ichimoku::{Ichimoku, IchimokuReading};
pub use macd::{Macd, MacdReading};
pub use momentum::{Momentum, MomentumReading};
pub use rsi::Rsi;
pub use trend::{TrendBias, TrendReading};
pub use vortex::{Vortex, VortexReading};
