//! Average Directional Index (ADX) indicator.

use crate::error::Result;
use crate::services::signals::window::{diff, rolling_mean};
use crate::services::signals::{bar_range, highs, last_defined, lows, Indicator};
use crate::types::OhlcBar;

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength regardless of direction:
/// - up = high - previous high, down = low - previous low
/// - +DM = up where up > down and up > 0, else 0 (-DM mirrored)
/// - +DI = 100 * SMA(+DM, 14) / SMA(range, 14), -DI likewise
/// - ADX = 100 * SMA(|+DI - -DI|, 14) / SMA(+DI + -DI, 14)
///
/// A zero range window gives DI = 0, and a zero DI sum counts as 1 in the
/// ADX denominator, so the reading is always finite.
pub struct Adx {
    di_period: usize,
    adx_period: usize,
}

impl Default for Adx {
    fn default() -> Self {
        Self {
            di_period: 14,
            adx_period: 14,
        }
    }
}

impl Adx {
    /// Directional movement pair for one bar.
    fn directional_movement(up: f64, down: f64) -> (f64, f64) {
        let plus = if up > down && up > 0.0 { up } else { 0.0 };
        let minus = if down > up && down > 0.0 { down } else { 0.0 };
        (plus, minus)
    }

    fn directional_index(movement: &[f64], range: &[f64]) -> Vec<f64> {
        movement
            .iter()
            .zip(range)
            .map(|(m, r)| {
                if m.is_nan() || r.is_nan() {
                    f64::NAN
                } else if *r == 0.0 {
                    0.0
                } else {
                    100.0 * m / r
                }
            })
            .collect()
    }
}

impl Indicator for Adx {
    type Output = f64;

    fn id(&self) -> &'static str {
        "adx"
    }

    fn min_periods(&self) -> usize {
        self.di_period + self.adx_period - 1
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<f64> {
        self.ensure_periods(bars)?;

        let up = diff(&highs(bars));
        let down = diff(&lows(bars));
        let (plus_dm, minus_dm): (Vec<f64>, Vec<f64>) = up
            .iter()
            .zip(&down)
            .map(|(u, d)| Self::directional_movement(*u, *d))
            .unzip();
        let ranges: Vec<f64> = bars.iter().map(bar_range).collect();

        let range_avg = rolling_mean(&ranges, self.di_period);
        let plus = Self::directional_index(&rolling_mean(&plus_dm, self.di_period), &range_avg);
        let minus = Self::directional_index(&rolling_mean(&minus_dm, self.di_period), &range_avg);

        let spread: Vec<f64> = plus.iter().zip(&minus).map(|(p, m)| (p - m).abs()).collect();
        let total: Vec<f64> = plus
            .iter()
            .zip(&minus)
            .map(|(p, m)| if p + m == 0.0 { 1.0 } else { p + m })
            .collect();

        let spread_avg = last_defined(self.id(), &rolling_mean(&spread, self.adx_period))?;
        let total_avg = last_defined(self.id(), &rolling_mean(&total, self.adx_period))?;

        Ok(100.0 * spread_avg / total_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_support::*;

    #[test]
    fn test_adx_min_periods() {
        assert_eq!(Adx::default().min_periods(), 27);
        assert!(Adx::default().calculate(&create_uptrend_candles(26)).is_err());
        assert!(Adx::default().calculate(&create_uptrend_candles(27)).is_ok());
    }

    #[test]
    fn test_adx_flat_is_zero() {
        let adx = Adx::default()
            .calculate(&create_flat_candles(60, 15.0))
            .unwrap();
        assert_eq!(adx, 0.0);
    }

    #[test]
    fn test_adx_one_sided_movement_is_strong() {
        // Highs climb while lows stay put: only +DM accumulates.
        let bars: Vec<OhlcBar> = (0..80)
            .map(|i| {
                let high = 100.0 + i as f64;
                OhlcBar::new(
                    start() + chrono::Duration::hours(i),
                    75.0,
                    high,
                    50.0,
                    high - 1.0,
                )
            })
            .collect();
        let adx = Adx::default().calculate(&bars).unwrap();
        assert!(approx(adx, 100.0));
    }

    #[test]
    fn test_adx_parallel_moves_cancel() {
        // High and low rising by the same step produce no directional movement.
        let adx = Adx::default()
            .calculate(&create_uptrend_candles(80))
            .unwrap();
        assert_eq!(adx, 0.0);
    }

    #[test]
    fn test_adx_bounded() {
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0)
            .collect();
        let adx = Adx::default().calculate(&bars_from_closes(&closes)).unwrap();
        assert!((0.0..=100.0).contains(&adx));
    }
}
