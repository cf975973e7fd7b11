//! In-memory OHLC series storage.

use crate::error::{GateError, Result};
use crate::types::{OhlcBar, Series, Timeframe};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Read/append access to per-asset bar series.
///
/// Readers always receive an owned snapshot, so evaluation never observes a
/// partially applied write.
pub trait SeriesSource: Send + Sync {
    /// Snapshot of the series for an asset and timeframe.
    fn read_series(&self, asset: &str, timeframe: Timeframe) -> Result<Series>;

    /// Append a bar after the last one.
    fn append_bar(&self, asset: &str, timeframe: Timeframe, bar: OhlcBar) -> Result<()>;
}

/// DashMap-backed series store keyed by `SYMBOL:timeframe`.
#[derive(Debug, Default)]
pub struct SeriesStore {
    data: DashMap<String, Series>,
}

impl SeriesStore {
    /// Create a new series store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn key(asset: &str, timeframe: Timeframe) -> String {
        format!("{}:{}", asset.to_uppercase(), timeframe)
    }

    /// Replace the series for an asset.
    pub fn insert(&self, asset: &str, timeframe: Timeframe, series: Series) {
        self.data.insert(Self::key(asset, timeframe), series);
    }

    /// Load a JSON array of bars from disk, replacing any stored series.
    /// Returns the number of bars loaded.
    pub fn load_json_file(
        &self,
        asset: &str,
        timeframe: Timeframe,
        path: impl AsRef<Path>,
    ) -> Result<usize> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let series: Series = serde_json::from_str(&raw)?;
        let count = series.len();
        debug!(
            "Loaded {} bars for {} {} from {}",
            count,
            asset,
            timeframe,
            path.as_ref().display()
        );
        self.insert(asset, timeframe, series);
        Ok(count)
    }

    /// Record a price tick into the bar of its timeframe bucket.
    pub fn append_price(
        &self,
        asset: &str,
        timeframe: Timeframe,
        price: f64,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut entry = self.data.entry(Self::key(asset, timeframe)).or_default();
        entry.value_mut().record_price(timeframe, price, at)
    }

    /// Drop an asset's series.
    pub fn remove(&self, asset: &str, timeframe: Timeframe) -> Option<Series> {
        self.data
            .remove(&Self::key(asset, timeframe))
            .map(|(_, series)| series)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl SeriesSource for SeriesStore {
    fn read_series(&self, asset: &str, timeframe: Timeframe) -> Result<Series> {
        self.data
            .get(&Self::key(asset, timeframe))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| GateError::MissingInput(format!("series {} {}", asset, timeframe)))
    }

    fn append_bar(&self, asset: &str, timeframe: Timeframe, bar: OhlcBar) -> Result<()> {
        let mut entry = self.data.entry(Self::key(asset, timeframe)).or_default();
        entry.value_mut().push(bar)
    }
}
