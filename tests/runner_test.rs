//! Watchlist cycle tests against series files on disk

use chrono::{DateTime, Duration, TimeZone, Utc};
use gatekeeper::services::{load_watchlist, AssetOutcome, Runner};
use gatekeeper::types::*;
use gatekeeper::{GateEngine, GateSettings, MarketHours, SeriesSource, SeriesStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Saturday afternoon.
fn weekend() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 6, 15, 0, 0).unwrap()
}

/// Monday, 10:00 New York standard time.
fn session() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap()
}

fn trend_series(count: usize, first: f64, step: f64) -> Series {
    let mut prev = first;
    let bars = (0..count)
        .map(|i| {
            let close = first + step * i as f64;
            let bar = OhlcBar::new(
                start() + Duration::hours(i as i64),
                prev,
                prev.max(close) + 1.0,
                prev.min(close) - 1.0,
                close,
            );
            prev = close;
            bar
        })
        .collect();
    Series::from_bars(bars).unwrap()
}

fn write_series(dir: &Path, name: &str, series: &Series) -> PathBuf {
    let path = dir.join(format!("{}.json", name));
    std::fs::write(&path, serde_json::to_string(series).unwrap()).unwrap();
    path
}

fn watched(symbol: &str, asset_type: AssetType, series_file: PathBuf) -> WatchedAsset {
    WatchedAsset {
        symbol: symbol.to_string(),
        asset_type,
        timeframe: Timeframe::OneHour,
        gate_bypass: String::new(),
        series_file,
        current_price: None,
        fundamentals: None,
        fear_and_greed: None,
    }
}

fn ema_only_runner() -> Runner {
    let settings = GateSettings {
        enabled_gates: vec![GateKind::Ema],
        ..GateSettings::default()
    };
    Runner::new(
        Arc::new(GateEngine::new(Arc::new(settings))),
        SeriesStore::new(),
        MarketHours::default(),
        4,
    )
}

fn outcome<'a>(report: &'a gatekeeper::services::CycleReport, symbol: &str) -> &'a AssetOutcome {
    report
        .outcomes
        .iter()
        .find(|(s, _)| s == symbol)
        .map(|(_, o)| o)
        .unwrap()
}

#[tokio::test]
async fn test_cycle_decides_crypto_uptrend() {
    let dir = TempDir::new().unwrap();
    let path = write_series(dir.path(), "btc", &trend_series(300, 100.0, 0.5));
    let assets = vec![watched("BTC", AssetType::Crypto, path)];

    let runner = ema_only_runner();
    assert_eq!(runner.refresh_series(&assets), 1);

    let report = runner.run_cycle(&assets, weekend()).await;
    match outcome(&report, "BTC") {
        AssetOutcome::Decided(decision) => {
            assert_eq!(decision.order_type, Some(OrderType::Long));
            assert_eq!(decision.price, 249.5);
            assert!(decision.decision);
            assert!(decision.actionable());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(report.actionable().count(), 1);
    assert_eq!(report.failures(), 0);
}

#[tokio::test]
async fn test_stock_skipped_outside_market_hours() {
    let dir = TempDir::new().unwrap();
    let series = trend_series(300, 100.0, 0.5);
    let assets = vec![
        watched("AAPL", AssetType::Stock, write_series(dir.path(), "aapl", &series)),
        watched("ETH", AssetType::Crypto, write_series(dir.path(), "eth", &series)),
    ];

    let runner = ema_only_runner();
    runner.refresh_series(&assets);

    let closed = runner.run_cycle(&assets, weekend()).await;
    assert!(matches!(outcome(&closed, "AAPL"), AssetOutcome::MarketClosed));
    assert!(matches!(outcome(&closed, "ETH"), AssetOutcome::Decided(_)));

    let open = runner.run_cycle(&assets, session()).await;
    assert!(matches!(outcome(&open, "AAPL"), AssetOutcome::Decided(_)));
    assert_eq!(open.decisions().count(), 2);
}

#[tokio::test]
async fn test_short_signal_vetoed_for_stock_only() {
    let dir = TempDir::new().unwrap();
    let series = trend_series(300, 400.0, -0.5);
    let assets = vec![
        watched("TSLA", AssetType::Stock, write_series(dir.path(), "tsla", &series)),
        watched("SOL", AssetType::Crypto, write_series(dir.path(), "sol", &series)),
    ];

    let runner = ema_only_runner();
    runner.refresh_series(&assets);
    let report = runner.run_cycle(&assets, session()).await;

    for (symbol, outcome) in &report.outcomes {
        match outcome {
            AssetOutcome::Decided(decision) => {
                assert_eq!(decision.order_type, Some(OrderType::Short), "{}", symbol);
                assert!(decision.decision, "{}", symbol);
            }
            other => panic!("{}: unexpected outcome {:?}", symbol, other),
        }
    }

    let actionable: Vec<&str> = report.actionable().map(|d| d.asset.as_str()).collect();
    assert_eq!(actionable, vec!["SOL"]);
}

#[tokio::test]
async fn test_bad_assets_fail_without_stopping_cycle() {
    let dir = TempDir::new().unwrap();
    let series = trend_series(300, 100.0, 0.5);

    let mut typo = watched("BTC", AssetType::Crypto, write_series(dir.path(), "btc", &series));
    typo.gate_bypass = "rsi_gate,volume_gate".to_string();
    let missing = watched("DOGE", AssetType::Crypto, dir.path().join("doge.json"));
    let good = watched("ETH", AssetType::Crypto, write_series(dir.path(), "eth", &series));
    let assets = vec![typo, missing, good];

    let runner = ema_only_runner();
    assert_eq!(runner.refresh_series(&assets), 2);

    let report = runner.run_cycle(&assets, weekend()).await;
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.failures(), 2);
    match outcome(&report, "BTC") {
        AssetOutcome::Failed(reason) => assert!(reason.contains("volume_gate")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(matches!(outcome(&report, "DOGE"), AssetOutcome::Failed(_)));
    assert!(matches!(outcome(&report, "ETH"), AssetOutcome::Decided(_)));

    // Outcomes keep watchlist order.
    let order: Vec<&str> = report.outcomes.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(order, vec!["BTC", "DOGE", "ETH"]);
}

#[tokio::test]
async fn test_current_price_overrides_last_close() {
    let dir = TempDir::new().unwrap();
    let mut asset = watched(
        "BTC",
        AssetType::Crypto,
        write_series(dir.path(), "btc", &trend_series(300, 100.0, 0.5)),
    );
    // Far below the EMA, so the long entry no longer holds.
    asset.current_price = Some(120.0);
    let assets = vec![asset];

    let runner = ema_only_runner();
    runner.refresh_series(&assets);
    let report = runner.run_cycle(&assets, weekend()).await;

    match outcome(&report, "BTC") {
        AssetOutcome::Decided(decision) => {
            assert_eq!(decision.price, 120.0);
            assert!(!decision.decision);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_watchlist_roundtrip_through_store() {
    let dir = TempDir::new().unwrap();
    let series = trend_series(50, 10.0, 0.5);
    let series_path = write_series(dir.path(), "ada", &series);
    let watchlist = vec![watched("ada", AssetType::Crypto, series_path)];
    let watchlist_path = dir.path().join("watchlist.json");
    std::fs::write(&watchlist_path, serde_json::to_string(&watchlist).unwrap()).unwrap();

    let assets = load_watchlist(&watchlist_path).unwrap();
    assert_eq!(assets.len(), 1);

    let runner = ema_only_runner();
    assert_eq!(runner.refresh_series(&assets), 1);
    let stored = runner.store().read_series("ADA", Timeframe::OneHour).unwrap();
    assert_eq!(stored, series);

    // 50 bars resolve a direction but not the 200-bar EMA.
    let report = tokio_test::block_on(runner.run_cycle(&assets, weekend()));
    match outcome(&report, "ada") {
        AssetOutcome::Decided(decision) => {
            assert!(decision.gate(GateKind::Ema).unwrap().outcome.is_skipped());
            assert!(!decision.decision);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_load_watchlist_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(load_watchlist(dir.path().join("nope.json")).is_err());
}
