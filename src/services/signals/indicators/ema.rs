//! Exponential Moving Average (EMA) and Double EMA (DEMA) indicator.

use crate::error::Result;
use crate::services::signals::window::ewm_mean;
use crate::services::signals::{last_defined, opens, Indicator};
use crate::types::OhlcBar;
use serde::Serialize;

/// EMA / DEMA over the open price.
///
/// - EMA = EMA(open, 200)
/// - DEMA = 2 * EMA(open, 200) - EMA(EMA(open, 200), 200)
///
/// Price above the EMA marks a long bias, below a short bias.
pub struct EmaDema {
    period: usize,
}

impl Default for EmaDema {
    fn default() -> Self {
        Self { period: 200 }
    }
}

impl EmaDema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// EMA of the open price for every bar.
    pub fn ema_line(&self, bars: &[OhlcBar]) -> Vec<f64> {
        ewm_mean(&opens(bars), self.period)
    }
}

/// Current EMA / DEMA reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmaDemaReading {
    pub ema: f64,
    pub dema: f64,
}

impl Indicator for EmaDema {
    type Output = EmaDemaReading;

    fn id(&self) -> &'static str {
        "ema"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<EmaDemaReading> {
        self.ensure_periods(bars)?;

        let ema1 = self.ema_line(bars);
        let ema2 = ewm_mean(&ema1, self.period);
        let ema = last_defined(self.id(), &ema1)?;
        let smoothed = last_defined(self.id(), &ema2)?;

        Ok(EmaDemaReading {
            ema,
            dema: 2.0 * ema - smoothed,
        })
    }
}
