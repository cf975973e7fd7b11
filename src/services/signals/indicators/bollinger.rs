//! Bollinger Bands indicator.

use crate::error::Result;
use crate::services::signals::window::{rolling_mean, rolling_std};
use crate::services::signals::{closes, last_defined, Indicator};
use crate::types::OhlcBar;
use serde::Serialize;

/// Bollinger Bands indicator.
///
/// - Basis = SMA(close, 20)
/// - Upper = Basis + 2 * StdDev(close, 20)
/// - Lower = Basis - 2 * StdDev(close, 20)
pub struct BollingerBands {
    period: usize,
    std_dev_mult: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_mult: 2.0,
        }
    }
}

/// Band values at the newest bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerReading {
    pub basis: f64,
    pub upper: f64,
    pub lower: f64,
}

impl Indicator for BollingerBands {
    type Output = BollingerReading;

    fn id(&self) -> &'static str {
        "bollinger"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<BollingerReading> {
        self.ensure_periods(bars)?;

        let closes = closes(bars);
        let basis = last_defined(self.id(), &rolling_mean(&closes, self.period))?;
        let dev = last_defined(self.id(), &rolling_std(&closes, self.period))?;

        Ok(BollingerReading {
            basis,
            upper: basis + self.std_dev_mult * dev,
            lower: basis - self.std_dev_mult * dev,
        })
    }
}
