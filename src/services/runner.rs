//! Evaluation cycle over a watchlist.
//!
//! Every asset is evaluated against its own series snapshot on a blocking
//! worker; assets share nothing mutable, so they run side by side up to the
//! configured concurrency.

use crate::config::MarketHours;
use crate::error::{GateError, Result};
use crate::services::engine::GateEngine;
use crate::services::gates::MarketInputs;
use crate::services::series_store::{SeriesSource, SeriesStore};
use crate::types::{AssetType, BypassSet, Decision, FundamentalFields, Series, WatchedAsset};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Load the watchlist JSON (an array of assets).
pub fn load_watchlist(path: impl AsRef<Path>) -> Result<Vec<WatchedAsset>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// What happened to one asset in a cycle.
#[derive(Debug, Clone)]
pub enum AssetOutcome {
    Decided(Decision),
    /// Stock evaluated outside the trading session.
    MarketClosed,
    Failed(String),
}

/// Per-asset outcomes of one cycle, in watchlist order.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub outcomes: Vec<(String, AssetOutcome)>,
}

impl CycleReport {
    pub fn decisions(&self) -> impl Iterator<Item = &Decision> {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            AssetOutcome::Decided(decision) => Some(decision),
            _ => None,
        })
    }

    /// Decisions that survive the short veto.
    pub fn actionable(&self) -> impl Iterator<Item = &Decision> {
        self.decisions().filter(|d| d.actionable())
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, AssetOutcome::Failed(_)))
            .count()
    }
}

/// Runs evaluation cycles.
pub struct Runner {
    engine: Arc<GateEngine>,
    store: Arc<SeriesStore>,
    market_hours: MarketHours,
    semaphore: Arc<Semaphore>,
}

enum Pending {
    Ready(AssetOutcome),
    Running(tokio::task::JoinHandle<Decision>),
}

impl Runner {
    pub fn new(
        engine: Arc<GateEngine>,
        store: Arc<SeriesStore>,
        market_hours: MarketHours,
        concurrency: usize,
    ) -> Self {
        Self {
            engine,
            store,
            market_hours,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub fn store(&self) -> &Arc<SeriesStore> {
        &self.store
    }

    /// Reload every asset's series file into the store.
    /// Returns the number of assets loaded.
    pub fn refresh_series(&self, assets: &[WatchedAsset]) -> usize {
        let mut loaded = 0;
        for asset in assets {
            match self
                .store
                .load_json_file(&asset.symbol, asset.timeframe, &asset.series_file)
            {
                Ok(_) => loaded += 1,
                Err(e) => warn!(
                    "Failed to load series for {} from {}: {}",
                    asset.symbol,
                    asset.series_file.display(),
                    e
                ),
            }
        }
        loaded
    }

    /// Evaluate every asset once.
    pub async fn run_cycle(&self, assets: &[WatchedAsset], now: DateTime<Utc>) -> CycleReport {
        let mut pending = Vec::with_capacity(assets.len());

        for asset in assets {
            let job = match self.prepare(asset, now) {
                Ok(Some(job)) => job,
                Ok(None) => {
                    pending.push((asset.symbol.clone(), Pending::Ready(AssetOutcome::MarketClosed)));
                    continue;
                }
                Err(e) => {
                    warn!("{}: not evaluated: {}", asset.symbol, e);
                    pending.push((
                        asset.symbol.clone(),
                        Pending::Ready(AssetOutcome::Failed(e.to_string())),
                    ));
                    continue;
                }
            };

            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("Evaluation pool closed: {}", e);
                    break;
                }
            };
            let engine = self.engine.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                engine.evaluate(
                    &job.symbol,
                    job.asset_type,
                    job.series.bars(),
                    job.price,
                    &job.bypass,
                    &job.market,
                )
            });
            pending.push((asset.symbol.clone(), Pending::Running(handle)));
        }

        let mut report = CycleReport::default();
        for (symbol, item) in pending {
            let outcome = match item {
                Pending::Ready(outcome) => outcome,
                Pending::Running(handle) => match handle.await {
                    Ok(decision) => {
                        log_decision(&decision);
                        AssetOutcome::Decided(decision)
                    }
                    Err(e) => {
                        error!("{}: evaluation task failed: {}", symbol, e);
                        AssetOutcome::Failed(e.to_string())
                    }
                },
            };
            report.outcomes.push((symbol, outcome));
        }

        info!(
            "Cycle complete: {} assets, {} actionable, {} failed",
            report.outcomes.len(),
            report.actionable().count(),
            report.failures()
        );
        report
    }

    /// Gather the inputs for one asset; `None` when its market is closed.
    fn prepare(&self, asset: &WatchedAsset, now: DateTime<Utc>) -> Result<Option<Job>> {
        if asset.asset_type.follows_market_hours() && !self.market_hours.is_open(now) {
            debug!("{}: market closed", asset.symbol);
            return Ok(None);
        }

        let bypass = BypassSet::parse(&asset.gate_bypass)?;
        let series = self.store.read_series(&asset.symbol, asset.timeframe)?;
        let price = asset
            .current_price
            .or_else(|| series.last().map(|b| b.close))
            .ok_or_else(|| GateError::MissingInput(format!("price for {}", asset.symbol)))?;
        let market = MarketInputs {
            fear_and_greed: asset.fear_and_greed.clone(),
            fundamentals: asset.fundamentals.as_ref().map(FundamentalFields::from_raw),
        };

        Ok(Some(Job {
            symbol: asset.symbol.clone(),
            asset_type: asset.asset_type,
            series,
            price,
            bypass,
            market,
        }))
    }
}

struct Job {
    symbol: String,
    asset_type: AssetType,
    series: Series,
    price: f64,
    bypass: BypassSet,
    market: MarketInputs,
}

fn log_decision(decision: &Decision) {
    if decision.decision && !decision.actionable() {
        info!(
            "{}: {} signal vetoed, {} cannot be shorted",
            decision.asset,
            decision.order_type.map(|o| o.as_str()).unwrap_or("none"),
            decision.asset_type.as_str()
        );
    }
    match serde_json::to_string(decision) {
        Ok(json) => debug!("{}", json),
        Err(e) => warn!("Failed to serialize decision for {}: {}", decision.asset, e),
    }
}
