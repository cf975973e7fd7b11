//! Recent extreme: is the newest close the high or low of the recent window?

use crate::error::Result;
use crate::services::signals::Indicator;
use crate::types::OhlcBar;
use serde::Serialize;

/// Locates the highest and lowest close among the last `window` bars.
///
/// Ties resolve to the earliest bar, so a newest close that only equals an
/// older extreme is not a new extreme.
pub struct RecentExtreme {
    window: usize,
}

impl Default for RecentExtreme {
    fn default() -> Self {
        Self { window: 30 }
    }
}

/// Bar indices (into the full series) of the window extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtremeReading {
    pub max_index: usize,
    pub min_index: usize,
    pub current_index: usize,
}

impl ExtremeReading {
    pub fn is_new_high(&self) -> bool {
        self.max_index == self.current_index
    }

    pub fn is_new_low(&self) -> bool {
        self.min_index == self.current_index
    }
}

impl Indicator for RecentExtreme {
    type Output = ExtremeReading;

    fn id(&self) -> &'static str {
        "extreme"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, bars: &[OhlcBar]) -> Result<ExtremeReading> {
        self.ensure_periods(bars)?;

        let current_index = bars.len() - 1;
        let start = bars.len().saturating_sub(self.window);
        let mut max_index = start;
        let mut min_index = start;

        for (i, bar) in bars.iter().enumerate().skip(start) {
            if bar.close > bars[max_index].close {
                max_index = i;
            }
            if bar.close < bars[min_index].close {
                min_index = i;
            }
        }

        Ok(ExtremeReading {
            max_index,
            min_index,
            current_index,
        })
    }
}
