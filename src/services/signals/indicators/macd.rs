//! MACD (Moving Average Convergence Divergence) indicator.

use crate::error::Result;
use crate::services::signals::window::{ewm_mean, tail_mean_abs};
use crate::services::signals::{closes, last_defined, Indicator};
use crate::types::{OhlcBar, OrderType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// MACD indicator.
///
/// - MACD Line = EMA(12) - EMA(26) of close
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// Also tracks which side of the signal line the MACD is on, when it last
/// crossed, and the MACD values seen on the current side since that cross.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    average_window: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            average_window: 200,
        }
    }
}

/// Current MACD reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// `Long` while MACD >= signal, `Short` otherwise.
    pub direction: OrderType,
    /// Bar at which the current direction began.
    pub turn_time: DateTime<Utc>,
    /// MACD values after the turn bar, oldest first.
    pub values: Vec<f64>,
    /// Mean |MACD| over the trailing average window.
    pub avg_abs_macd: f64,
    /// Mean |histogram| over the trailing average window.
    pub avg_abs_histogram: f64,
}

impl Macd {
    /// MACD line and signal line for every bar.
    fn lines(&self, bars: &[OhlcBar]) -> (Vec<f64>, Vec<f64>) {
        let closes = closes(bars);
        let fast = ewm_mean(&closes, self.fast_period);
        let slow = ewm_mean(&closes, self.slow_period);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ewm_mean(&macd, self.signal_period);
        (macd, signal)
    }
}

impl Indicator for Macd {
    type Output = MacdReading;

    fn id(&self) -> &'static str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<MacdReading> {
        self.ensure_periods(bars)?;

        let (macd_line, signal_line) = self.lines(bars);
        let histogram_line: Vec<f64> = macd_line
            .iter()
            .zip(&signal_line)
            .map(|(m, s)| m - s)
            .collect();

        let mut direction: Option<OrderType> = None;
        let mut turn_time = bars[0].time;
        let mut values = Vec::new();

        for ((bar, macd), signal) in bars.iter().zip(&macd_line).zip(&signal_line) {
            let side = if macd >= signal {
                OrderType::Long
            } else {
                OrderType::Short
            };
            if direction == Some(side) {
                values.push(*macd);
            } else {
                direction = Some(side);
                turn_time = bar.time;
                values.clear();
            }
        }

        let macd = last_defined(self.id(), &macd_line)?;
        let signal = last_defined(self.id(), &signal_line)?;

        Ok(MacdReading {
            macd,
            signal,
            histogram: macd - signal,
            direction: direction.unwrap_or(OrderType::Long),
            turn_time,
            values,
            avg_abs_macd: tail_mean_abs(&macd_line, self.average_window),
            avg_abs_histogram: tail_mean_abs(&histogram_line, self.average_window),
        })
    }
}
