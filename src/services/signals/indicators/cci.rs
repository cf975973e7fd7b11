//! Commodity Channel Index (CCI) indicator.

use crate::error::Result;
use crate::services::signals::window::{rolling_mean, rolling_std};
use crate::services::signals::{closes, last_defined, Indicator};
use crate::types::OhlcBar;
use serde::Serialize;

/// CCI (Commodity Channel Index) indicator.
///
/// CCI = (Close - SMA(close, 20)) / (0.015 * StdDev(close, 20))
///
/// The deviation is the sample standard deviation of the close over the
/// same window. A window with no variation reads as 0.
///
/// Signals:
/// - Above +100: strong upward move
/// - Below -100: strong downward move
pub struct Cci {
    period: usize,
}

impl Default for Cci {
    fn default() -> Self {
        Self { period: 20 }
    }
}

const SCALE: f64 = 0.015;

/// Current CCI reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CciReading {
    pub cci: f64,
    pub sma: f64,
    pub std_dev: f64,
}

impl Indicator for Cci {
    type Output = CciReading;

    fn id(&self) -> &'static str {
        "cci"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<CciReading> {
        self.ensure_periods(bars)?;

        let closes = closes(bars);
        let sma = last_defined(self.id(), &rolling_mean(&closes, self.period))?;
        let std_dev = last_defined(self.id(), &rolling_std(&closes, self.period))?;
        let close = bars[bars.len() - 1].close;

        let cci = if std_dev == 0.0 {
            0.0
        } else {
            (close - sma) / (SCALE * std_dev)
        };

        Ok(CciReading { cci, sma, std_dev })
    }
}
