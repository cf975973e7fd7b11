//! Ichimoku cloud indicator.

use crate::error::Result;
use crate::services::signals::window::{rolling_max, rolling_min, shift};
use crate::services::signals::{highs, last_defined, lows, Indicator};
use crate::types::OhlcBar;
use serde::Serialize;

/// Ichimoku Kinko Hyo.
///
/// - Tenkan-sen = (9-bar high + 9-bar low) / 2
/// - Kijun-sen = (26-bar high + 26-bar low) / 2
/// - Senkou span A = (Tenkan + Kijun) / 2, displaced 26 bars forward
/// - Senkou span B = (52-bar high + 52-bar low) / 2, displaced 26 bars forward
///
/// The spans read at the newest bar are therefore the values projected
/// 26 bars ago, which needs 52 + 26 bars of history.
pub struct Ichimoku {
    conversion_period: usize,
    base_period: usize,
    span_b_period: usize,
    displacement: usize,
}

impl Default for Ichimoku {
    fn default() -> Self {
        Self {
            conversion_period: 9,
            base_period: 26,
            span_b_period: 52,
            displacement: 26,
        }
    }
}

/// Ichimoku values at the newest bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IchimokuReading {
    pub tenkan: f64,
    pub kijun: f64,
    pub senkou_a: f64,
    pub senkou_b: f64,
    /// Width of the cloud, |span A - span B|.
    pub cloud_size: f64,
}

fn midpoint(highs: &[f64], lows: &[f64], period: usize) -> Vec<f64> {
    rolling_max(highs, period)
        .iter()
        .zip(rolling_min(lows, period))
        .map(|(h, l)| (h + l) / 2.0)
        .collect()
}

impl Indicator for Ichimoku {
    type Output = IchimokuReading;

    fn id(&self) -> &'static str {
        "ichimoku"
    }

    fn min_periods(&self) -> usize {
        self.span_b_period + self.displacement
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<IchimokuReading> {
        self.ensure_periods(bars)?;

        let highs = highs(bars);
        let lows = lows(bars);
        let tenkan = midpoint(&highs, &lows, self.conversion_period);
        let kijun = midpoint(&highs, &lows, self.base_period);
        let span_a: Vec<f64> = tenkan
            .iter()
            .zip(&kijun)
            .map(|(t, k)| (t + k) / 2.0)
            .collect();
        let span_b = midpoint(&highs, &lows, self.span_b_period);

        let senkou_a = last_defined(self.id(), &shift(&span_a, self.displacement))?;
        let senkou_b = last_defined(self.id(), &shift(&span_b, self.displacement))?;

        Ok(IchimokuReading {
            tenkan: last_defined(self.id(), &tenkan)?,
            kijun: last_defined(self.id(), &kijun)?,
            senkou_a,
            senkou_b,
            cloud_size: (senkou_a - senkou_b).abs(),
        })
    }
}
