//! Technical indicator library.
//!
//! Each indicator consumes the full bar history of one series and reports
//! its reading at the most recent bar. Indicators never mutate the bars and
//! never perform I/O, so identical input always yields identical output.

pub mod indicators;
pub mod window;

use crate::error::{GateError, Result};
use crate::types::OhlcBar;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Reading produced at the last bar.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &'static str;

    /// Minimum number of bars required for a defined reading.
    fn min_periods(&self) -> usize;

    /// Calculate the current reading.
    /// Returns an error if there is not enough data or the input is degenerate.
    fn calculate(&self, bars: &[OhlcBar]) -> Result<Self::Output>;

    /// Fail early when the series is too short.
    fn ensure_periods(&self, bars: &[OhlcBar]) -> Result<()> {
        if bars.len() < self.min_periods() {
            return Err(GateError::insufficient(
                self.id(),
                self.min_periods(),
                bars.len(),
            ));
        }
        Ok(())
    }
}

/// Last element of a derived column, rejecting undefined values.
pub(crate) fn last_defined(indicator: &'static str, values: &[f64]) -> Result<f64> {
    match values.last() {
        Some(v) if v.is_finite() => Ok(*v),
        Some(_) => Err(GateError::degenerate(indicator, "last value is undefined")),
        None => Err(GateError::insufficient(indicator, 1, 0)),
    }
}

pub(crate) fn closes(bars: &[OhlcBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub(crate) fn opens(bars: &[OhlcBar]) -> Vec<f64> {
    bars.iter().map(|b| b.open).collect()
}

pub(crate) fn highs(bars: &[OhlcBar]) -> Vec<f64> {
    bars.iter().map(|b| b.high).collect()
}

pub(crate) fn lows(bars: &[OhlcBar]) -> Vec<f64> {
    bars.iter().map(|b| b.low).collect()
}

/// Spread between the largest and smallest of high, low and close.
pub(crate) fn bar_range(bar: &OhlcBar) -> f64 {
    let max = bar.high.max(bar.low).max(bar.close);
    let min = bar.high.min(bar.low).min(bar.close);
    max - min
}
