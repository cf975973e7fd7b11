//! Relative Strength Index (RSI) indicator.

use crate::error::Result;
use crate::services::signals::window::{diff, rolling_mean};
use crate::services::signals::{closes, last_defined, Indicator};
use crate::types::OhlcBar;

/// RSI (Relative Strength Index) indicator.
///
/// Average gain and average loss are simple means of the close-to-close
/// changes over `period` bars. RSI = 100 - 100 / (1 + gain / loss).
/// Values range from 0-100; with no losses in the window RSI is 100.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn id(&self) -> &'static str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<f64> {
        self.ensure_periods(bars)?;

        let changes = diff(&closes(bars));
        let gains: Vec<f64> = changes
            .iter()
            .map(|c| if c.is_nan() { *c } else { c.max(0.0) })
            .collect();
        let losses: Vec<f64> = changes
            .iter()
            .map(|c| if c.is_nan() { *c } else { (-c).max(0.0) })
            .collect();

        let avg_gain = last_defined(self.id(), &rolling_mean(&gains, self.period))?;
        let avg_loss = last_defined(self.id(), &rolling_mean(&losses, self.period))?;

        Ok(Self::from_averages(avg_gain, avg_loss))
    }
}
