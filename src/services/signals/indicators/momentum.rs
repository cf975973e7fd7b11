//! Momentum indicator.

use crate::error::Result;
use crate::services::signals::window::{shift, tail_mean_abs};
use crate::services::signals::{closes, last_defined, Indicator};
use crate::types::OhlcBar;
use serde::Serialize;

/// Momentum over a fixed lookback.
///
/// `mom = close[t - 10] - close[t]`, so a rising market reads negative.
/// Only the magnitude is compared against its trailing average, which makes
/// the sign irrelevant to the gate.
pub struct Momentum {
    lookback: usize,
    average_window: usize,
}

impl Default for Momentum {
    fn default() -> Self {
        Self {
            lookback: 10,
            average_window: 200,
        }
    }
}

/// Current momentum and the trailing mean of its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomentumReading {
    pub mom: f64,
    pub avg_abs_mom: f64,
}

impl Indicator for Momentum {
    type Output = MomentumReading;

    fn id(&self) -> &'static str {
        "momentum"
    }

    fn min_periods(&self) -> usize {
        self.lookback + 1
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<MomentumReading> {
        self.ensure_periods(bars)?;

        let closes = closes(bars);
        let mom: Vec<f64> = shift(&closes, self.lookback)
            .iter()
            .zip(&closes)
            .map(|(past, now)| past - now)
            .collect();

        Ok(MomentumReading {
            mom: last_defined(self.id(), &mom)?,
            avg_abs_mom: tail_mean_abs(&mom, self.average_window),
        })
    }
}
