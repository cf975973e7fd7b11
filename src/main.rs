use chrono::Utc;
use gatekeeper::config::Config;
use gatekeeper::services::{load_watchlist, GateEngine, Runner, SeriesStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatekeeper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    let settings = Arc::new(config.gate_settings()?);
    info!(
        "Starting gatekeeper: watchlist {}, {} gates enabled, every {}s",
        config.watchlist_path.display(),
        settings.enabled_gates.len(),
        config.interval_secs
    );

    let engine = Arc::new(GateEngine::new(settings));
    let runner = Runner::new(
        engine,
        SeriesStore::new(),
        config.market_hours,
        config.concurrency,
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs.max(1)));

    loop {
        interval.tick().await;

        // Watchlist and series files are re-read every cycle
        match load_watchlist(&config.watchlist_path) {
            Ok(assets) => {
                runner.refresh_series(&assets);
                runner.run_cycle(&assets, Utc::now()).await;
            }
            Err(e) => warn!(
                "Failed to load watchlist {}: {}",
                config.watchlist_path.display(),
                e
            ),
        }

        if config.run_once {
            break;
        }
    }

    Ok(())
}
