//! Vortex indicator.

use crate::error::Result;
use crate::services::signals::window::{rolling_mean, rolling_sum, shift};
use crate::services::signals::{closes, highs, last_defined, lows, Indicator};
use crate::types::OhlcBar;
use serde::Serialize;

/// Vortex indicator (VI+ / VI-).
///
/// - VM+ = sum(|high - previous low|, 7)
/// - VM- = sum(|low - previous high|, 7)
/// - STR = mean(|high - low| + |close - previous high| + |close - previous low|, 7)
/// - VI+ = VM+ / STR, VI- = VM- / STR
///
/// Terms that need a previous bar count as zero in STR. A window with no
/// range at all reports both lines as 0.
pub struct Vortex {
    period: usize,
}

impl Default for Vortex {
    fn default() -> Self {
        Self { period: 7 }
    }
}

/// VI+ and VI- at the newest bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VortexReading {
    pub vip: f64,
    pub vim: f64,
}

fn zero_if_nan(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

impl Indicator for Vortex {
    type Output = VortexReading;

    fn id(&self) -> &'static str {
        "vortex"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<VortexReading> {
        self.ensure_periods(bars)?;

        let highs = highs(bars);
        let lows = lows(bars);
        let closes = closes(bars);
        let prev_highs = shift(&highs, 1);
        let prev_lows = shift(&lows, 1);

        let plus_moves: Vec<f64> = (0..bars.len())
            .map(|i| (highs[i] - prev_lows[i]).abs())
            .collect();
        let minus_moves: Vec<f64> = (0..bars.len())
            .map(|i| (lows[i] - prev_highs[i]).abs())
            .collect();
        let true_ranges: Vec<f64> = (0..bars.len())
            .map(|i| {
                (highs[i] - lows[i]).abs()
                    + zero_if_nan((closes[i] - prev_highs[i]).abs())
                    + zero_if_nan((closes[i] - prev_lows[i]).abs())
            })
            .collect();

        let vm_plus = last_defined(self.id(), &rolling_sum(&plus_moves, self.period))?;
        let vm_minus = last_defined(self.id(), &rolling_sum(&minus_moves, self.period))?;
        let str_avg = last_defined(self.id(), &rolling_mean(&true_ranges, self.period))?;

        if str_avg == 0.0 {
            return Ok(VortexReading { vip: 0.0, vim: 0.0 });
        }

        Ok(VortexReading {
            vip: vm_plus / str_avg,
            vim: vm_minus / str_avg,
        })
    }
}
