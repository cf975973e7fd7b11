//! Trend bias: how many recent closes sit above or below the 200-bar EMA.

use crate::error::Result;
use crate::services::signals::indicators::ema::EmaDema;
use crate::services::signals::Indicator;
use crate::types::OhlcBar;
use serde::Serialize;

/// Counts closes above and below EMA(open, 200), growing the window back
/// from the newest bar one bar at a time.
///
/// The window stops growing once it spans at least `min_window` bars and the
/// two counts differ by at least `imbalance_pct` percent of the "above" count.
/// If that never happens the whole history (minus the first bar) is counted.
pub struct TrendBias {
    ema: EmaDema,
    min_window: usize,
    imbalance_pct: f64,
}

impl Default for TrendBias {
    fn default() -> Self {
        Self {
            ema: EmaDema::default(),
            min_window: 200,
            imbalance_pct: 50.0,
        }
    }
}

/// Result of the trend-bias scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendReading {
    /// Number of bars in the final window.
    pub window: usize,
    pub greater_count: usize,
    pub less_count: usize,
}

impl Indicator for TrendBias {
    type Output = TrendReading;

    fn id(&self) -> &'static str {
        "trend"
    }

    fn min_periods(&self) -> usize {
        self.min_window
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<TrendReading> {
        self.ensure_periods(bars)?;

        let ema = self.ema.ema_line(bars);
        let len = bars.len();
        let mut reading = TrendReading {
            window: 0,
            greater_count: 0,
            less_count: 0,
        };

        for window in 1..len {
            let i = len - window;
            if bars[i].close > ema[i] {
                reading.greater_count += 1;
            } else if bars[i].close < ema[i] {
                reading.less_count += 1;
            }
            reading.window = window;

            let (g, l) = (reading.greater_count, reading.less_count);
            if g > 0 && l > 0 {
                let imbalance = g.abs_diff(l) as f64 / g as f64 * 100.0;
                if imbalance >= self.imbalance_pct && window >= self.min_window {
                    break;
                }
            }
        }

        Ok(reading)
    }
}
