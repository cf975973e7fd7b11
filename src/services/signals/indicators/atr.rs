//! Average True Range (ATR) indicator.

use crate::error::Result;
use crate::services::signals::window::rolling_mean;
use crate::services::signals::{bar_range, last_defined, Indicator};
use crate::types::OhlcBar;

/// ATR (Average True Range) indicator.
///
/// The true range of a bar is the spread between the largest and smallest
/// of its high, low and close; ATR is the simple mean of that range over
/// the last `period` bars.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 12 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn id(&self) -> &'static str {
        "atr"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<f64> {
        self.ensure_periods(bars)?;
        let ranges: Vec<f64> = bars.iter().map(bar_range).collect();
        last_defined(self.id(), &rolling_mean(&ranges, self.period))
    }
}
