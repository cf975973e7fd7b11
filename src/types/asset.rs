use super::{FearGreedData, Timeframe};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Kind of tradable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Stock,
    Crypto,
}

impl AssetType {
    /// Get the asset type from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stock" | "stocks" | "equity" => Some(AssetType::Stock),
            "crypto" | "cryptocurrency" => Some(AssetType::Crypto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Crypto => "crypto",
        }
    }

    /// Whether short positions can be opened on this asset type.
    pub fn can_short(&self) -> bool {
        matches!(self, AssetType::Crypto)
    }

    /// Whether this asset only trades during exchange hours.
    pub fn follows_market_hours(&self) -> bool {
        matches!(self, AssetType::Stock)
    }
}

/// An asset entry in the runner's watchlist.
///
/// The series file holds a JSON array of bars; fundamentals are the raw
/// screener strings keyed by field name (e.g. `"P/E": "14.2"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedAsset {
    pub symbol: String,
    pub asset_type: AssetType,
    pub timeframe: Timeframe,
    /// Comma-separated gate names to skip for this asset.
    #[serde(default)]
    pub gate_bypass: String,
    pub series_file: PathBuf,
    /// Price to evaluate against; falls back to the last close when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundamentals: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fear_and_greed: Option<FearGreedData>,
}

impl WatchedAsset {
    /// Key identifying this asset's series in a store.
    pub fn series_key(&self) -> String {
        format!("{}:{}", self.symbol.to_uppercase(), self.timeframe)
    }
}
