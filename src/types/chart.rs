use crate::error::{GateError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sampling period of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timeframe {
    /// Get the timeframe from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Some(Timeframe::OneMinute),
            "1h" => Some(Timeframe::OneHour),
            "1d" => Some(Timeframe::OneDay),
            _ => None,
        }
    }

    /// Short label used in keys and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::OneHour => "1h",
            Timeframe::OneDay => "1d",
        }
    }

    /// Get the bucket size in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Timeframe::OneMinute => 60,
            Timeframe::OneHour => 3600,
            Timeframe::OneDay => 86400,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLC (Open, High, Low, Close) bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// A bar where every price equals `price`, as produced by a single tick.
    pub fn flat(time: DateTime<Utc>, price: f64) -> Self {
        Self::new(time, price, price, price, price)
    }

    fn merge(&mut self, next: &OhlcBar) {
        self.high = self.high.max(next.high);
        self.low = self.low.min(next.low);
        self.close = next.close;
    }
}

/// Ordered OHLC bars for one (asset, timeframe) pair.
///
/// Timestamps are strictly increasing; every constructor enforces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OhlcBar>", into = "Vec<OhlcBar>")]
pub struct Series {
    bars: Vec<OhlcBar>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from bars, rejecting duplicate or unordered timestamps.
    pub fn from_bars(bars: Vec<OhlcBar>) -> Result<Self> {
        for pair in bars.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(GateError::OutOfOrder {
                    last: pair[0].time,
                    got: pair[1].time,
                });
            }
        }
        Ok(Self { bars })
    }

    /// Append a bar to the end of the series.
    pub fn push(&mut self, bar: OhlcBar) -> Result<()> {
        if let Some(last) = self.bars.last() {
            if bar.time <= last.time {
                return Err(GateError::OutOfOrder {
                    last: last.time,
                    got: bar.time,
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    pub fn bars(&self) -> &[OhlcBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&OhlcBar> {
        self.bars.last()
    }

    /// Fold a price tick into the bar of its `timeframe` bucket, opening a
    /// new bar when the tick starts a later bucket.
    pub fn record_price(
        &mut self,
        timeframe: Timeframe,
        price: f64,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let size = timeframe.seconds();
        let key = at.timestamp().div_euclid(size) * size;
        let start = DateTime::from_timestamp(key, 0).unwrap_or(at);
        let tick = OhlcBar::flat(start, price);

        match self.bars.last_mut() {
            Some(last) if last.time == start => {
                last.merge(&tick);
                Ok(())
            }
            _ => self.push(tick),
        }
    }

    /// Aggregate contiguous bars into coarser buckets aligned to the epoch.
    ///
    /// open = first, close = last, high = max, low = min. Buckets without
    /// bars are not emitted. Used by series sources that keep finer bars
    /// than the timeframe an asset is evaluated on.
    pub fn rebucket(&self, timeframe: Timeframe) -> Series {
        let size = timeframe.seconds();
        let mut out: Vec<OhlcBar> = Vec::new();
        let mut current_key: Option<i64> = None;

        for bar in &self.bars {
            let key = bar.time.timestamp().div_euclid(size) * size;
            match (current_key, out.last_mut()) {
                (Some(k), Some(bucket)) if k == key => bucket.merge(bar),
                _ => {
                    let start = DateTime::from_timestamp(key, 0).unwrap_or(bar.time);
                    out.push(OhlcBar { time: start, ..*bar });
                    current_key = Some(key);
                }
            }
        }

        Series { bars: out }
    }
}

impl TryFrom<Vec<OhlcBar>> for Series {
    type Error = GateError;

    fn try_from(bars: Vec<OhlcBar>) -> Result<Self> {
        Series::from_bars(bars)
    }
}

impl From<Series> for Vec<OhlcBar> {
    fn from(series: Series) -> Self {
        series.bars
    }
}
