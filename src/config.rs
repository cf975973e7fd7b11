use crate::error::Result;
use crate::services::gates::FundamentalCheck;
use crate::types::GateKind;
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Long/short thresholds of a numeric gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub long_criteria: f64,
    pub short_criteria: f64,
}

impl Criteria {
    pub const fn new(long_criteria: f64, short_criteria: f64) -> Self {
        Self {
            long_criteria,
            short_criteria,
        }
    }
}

/// EMA gate settings: whether the ATR band is added around the EMA per side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaGateSettings {
    pub long_criteria: bool,
    pub short_criteria: bool,
}

impl Default for EmaGateSettings {
    fn default() -> Self {
        Self {
            long_criteria: true,
            short_criteria: true,
        }
    }
}

/// Crypto sentiment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoFundamentals {
    /// Fear & greed classifications under which crypto entries are allowed.
    pub allowed_fear_and_greed: Vec<String>,
}

impl Default for CryptoFundamentals {
    fn default() -> Self {
        Self {
            allowed_fear_and_greed: vec![
                "Fear".to_string(),
                "Extreme Fear".to_string(),
                "Neutral".to_string(),
            ],
        }
    }
}

/// Bounds used by the stock fundamental sub-checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockThresholds {
    pub pe: f64,
    pub min_forward_pe: f64,
    pub max_forward_pe: f64,
    pub eps_ttm: f64,
    pub eps_this_y: f64,
    pub eps_next_q: f64,
    pub eps_next_y: f64,
    pub eps_growth_next_y: f64,
    pub eps_next_5y: f64,
    pub eps_past_5y: f64,
    pub eps_q_q: f64,
    pub sales_past_5y: f64,
    pub sales: f64,
    pub ps: f64,
    pub book_sh: f64,
    pub pb_min: f64,
    pub pb_max: f64,
    pub roa: f64,
    pub roe: f64,
    pub roi: f64,
    pub cash_sh: f64,
    pub pc: f64,
    pub pfcf: f64,
    pub quick_ratio: f64,
    pub current_ratio: f64,
    pub operating_margin: f64,
    pub profit_margin: f64,
    pub gross_margin: f64,
    pub debt_eq: f64,
    pub lt_debt_eq: f64,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            pe: 20.0,
            min_forward_pe: 10.0,
            max_forward_pe: 20.0,
            eps_ttm: 0.0,
            eps_this_y: 0.0,
            eps_next_q: 0.0,
            eps_next_y: 0.0,
            eps_growth_next_y: 0.0,
            eps_next_5y: 0.0,
            eps_past_5y: 0.0,
            eps_q_q: 0.0,
            sales_past_5y: 0.0,
            sales: 0.0,
            ps: 4.0,
            book_sh: 0.0,
            pb_min: 0.0,
            pb_max: 3.0,
            roa: 5.0,
            roe: 15.0,
            roi: 10.0,
            cash_sh: 1.0,
            pc: 10.0,
            pfcf: 15.0,
            quick_ratio: 1.0,
            current_ratio: 1.0,
            operating_margin: 0.0,
            profit_margin: 0.0,
            gross_margin: 0.0,
            debt_eq: 1.0,
            lt_debt_eq: 1.0,
        }
    }
}

/// Stock fundamental settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockFundamentals {
    /// Sub-checks that must all pass.
    pub checks: Vec<FundamentalCheck>,
    pub thresholds: StockThresholds,
}

impl Default for StockFundamentals {
    fn default() -> Self {
        Self {
            checks: FundamentalCheck::ALL.to_vec(),
            thresholds: StockThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundamentalSettings {
    pub crypto: CryptoFundamentals,
    pub stocks: StockFundamentals,
}

/// Immutable gate configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    /// Gates taking part in the decision; evaluation always follows registry order.
    pub enabled_gates: Vec<GateKind>,
    pub ema_gate: EmaGateSettings,
    pub cci_gate: Criteria,
    pub rsi_gate: Criteria,
    /// Ratio (in tenths) one side's count must reach against the other.
    pub trend_gate: Criteria,
    /// Minimum cloud width as a percentage of price.
    pub cloud_gate: Criteria,
    pub fundamental_gate: FundamentalSettings,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            enabled_gates: GateKind::ALL.to_vec(),
            ema_gate: EmaGateSettings::default(),
            cci_gate: Criteria::new(100.0, -100.0),
            rsi_gate: Criteria::new(65.0, 35.0),
            trend_gate: Criteria::new(30.0, 30.0),
            cloud_gate: Criteria::new(0.1, 0.1),
            fundamental_gate: FundamentalSettings::default(),
        }
    }
}

impl GateSettings {
    /// Load settings from a JSON file; omitted keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn is_enabled(&self, gate: GateKind) -> bool {
        self.enabled_gates.contains(&gate)
    }
}

/// Regular trading session for stocks, expressed in the exchange's offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketHours {
    pub open_hour: u32,
    pub open_minute: u32,
    pub close_hour: u32,
    pub close_minute: u32,
    /// Exchange offset from UTC in minutes (US Eastern standard time by default).
    pub utc_offset_minutes: i32,
}

impl Default for MarketHours {
    fn default() -> Self {
        Self {
            open_hour: 9,
            open_minute: 30,
            close_hour: 16,
            close_minute: 0,
            utc_offset_minutes: -300,
        }
    }
}

impl MarketHours {
    /// Whether the session is open at `at`: weekdays, open <= time < close.
    pub fn is_open(&self, at: DateTime<Utc>) -> bool {
        let Some(offset) = FixedOffset::east_opt(self.utc_offset_minutes * 60) else {
            return false;
        };
        let local = at.with_timezone(&offset);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let minute_of_day = local.hour() * 60 + local.minute();
        let open = self.open_hour * 60 + self.open_minute;
        let close = self.close_hour * 60 + self.close_minute;
        minute_of_day >= open && minute_of_day < close
    }
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional JSON file overriding the default gate settings.
    pub gate_config_path: Option<PathBuf>,
    /// JSON watchlist of assets to evaluate.
    pub watchlist_path: PathBuf,
    /// Seconds between evaluation cycles.
    pub interval_secs: u64,
    /// Run a single cycle and exit.
    pub run_once: bool,
    /// Maximum number of assets evaluated at the same time.
    pub concurrency: usize,
    pub market_hours: MarketHours,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let market_hours = MarketHours {
            utc_offset_minutes: env::var("GATEKEEPER_MARKET_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(-300),
            ..MarketHours::default()
        };

        Self {
            gate_config_path: env::var("GATEKEEPER_GATE_CONFIG").ok().map(PathBuf::from),
            watchlist_path: env::var("GATEKEEPER_WATCHLIST")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("watchlist.json")),
            interval_secs: env::var("GATEKEEPER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            run_once: env::var("GATEKEEPER_RUN_ONCE")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            concurrency: env::var("GATEKEEPER_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(8),
            market_hours,
        }
    }

    /// Gate settings from the configured file, or the defaults.
    pub fn gate_settings(&self) -> Result<GateSettings> {
        match &self.gate_config_path {
            Some(path) => GateSettings::from_json_file(path),
            None => Ok(GateSettings::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
