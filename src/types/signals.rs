use super::AssetType;
use crate::error::{GateError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Trade direction a decision is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Long,
    Short,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Long => "long",
            OrderType::Short => "short",
        }
    }

    /// Caller-side veto: shorts cannot be opened on assets that cannot be shorted.
    pub fn allowed_for(&self, asset_type: AssetType) -> bool {
        match self {
            OrderType::Long => true,
            OrderType::Short => asset_type.can_short(),
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a gate in the registry.
///
/// Variant order is the evaluation order used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GateKind {
    #[serde(rename = "ema_gate")]
    Ema,
    #[serde(rename = "ichimoku_gate")]
    Ichimoku,
    #[serde(rename = "cci_gate")]
    Cci,
    #[serde(rename = "rsi_gate")]
    Rsi,
    #[serde(rename = "trend_gate")]
    Trend,
    #[serde(rename = "momentum_gate")]
    Momentum,
    #[serde(rename = "macd_gate")]
    Macd,
    #[serde(rename = "extreme_gate")]
    Extreme,
    #[serde(rename = "adx_gate")]
    Adx,
    #[serde(rename = "bollinger_gate")]
    Bollinger,
    #[serde(rename = "vortex_gate")]
    Vortex,
    #[serde(rename = "cloud_gate")]
    Cloud,
    #[serde(rename = "fundamental_gate")]
    Fundamental,
}

impl GateKind {
    /// Every gate, in evaluation order.
    pub const ALL: [GateKind; 13] = [
        GateKind::Ema,
        GateKind::Ichimoku,
        GateKind::Cci,
        GateKind::Rsi,
        GateKind::Trend,
        GateKind::Momentum,
        GateKind::Macd,
        GateKind::Extreme,
        GateKind::Adx,
        GateKind::Bollinger,
        GateKind::Vortex,
        GateKind::Cloud,
        GateKind::Fundamental,
    ];

    /// Configuration name of this gate.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Ema => "ema_gate",
            GateKind::Ichimoku => "ichimoku_gate",
            GateKind::Cci => "cci_gate",
            GateKind::Rsi => "rsi_gate",
            GateKind::Trend => "trend_gate",
            GateKind::Momentum => "momentum_gate",
            GateKind::Macd => "macd_gate",
            GateKind::Extreme => "extreme_gate",
            GateKind::Adx => "adx_gate",
            GateKind::Bollinger => "bollinger_gate",
            GateKind::Vortex => "vortex_gate",
            GateKind::Cloud => "cloud_gate",
            GateKind::Fundamental => "fundamental_gate",
        }
    }

    /// Look up a gate by its configuration name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|g| g.name() == name)
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-asset set of gates skipped during aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassSet(BTreeSet<GateKind>);

impl BypassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated bypass list such as `"rsi_gate,momentum_gate"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut set = BTreeSet::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let gate =
                GateKind::from_name(part).ok_or_else(|| GateError::UnknownGate(part.to_string()))?;
            set.insert(gate);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, gate: GateKind) -> bool {
        self.0.contains(&gate)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GateKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<GateKind> for BypassSet {
    fn from_iter<I: IntoIterator<Item = GateKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Long/short verdict of a single gate plus the raw values behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub long: bool,
    pub short: bool,
    pub data: Map<String, Value>,
}

impl GateResult {
    pub fn new(long: bool, short: bool, data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self { long, short, data }
    }

    /// Verdict for one direction.
    pub fn for_order(&self, order_type: OrderType) -> bool {
        match order_type {
            OrderType::Long => self.long,
            OrderType::Short => self.short,
        }
    }
}

/// What happened to one gate during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateOutcome {
    /// The gate ran; `output` is its verdict for the resolved order type.
    Evaluated { output: bool, result: GateResult },
    /// The gate could not be computed and counts as a failed vote.
    Skipped { reason: String },
}

impl GateOutcome {
    /// Contribution of this gate to the running `buy` flag.
    pub fn passed(&self) -> bool {
        matches!(self, GateOutcome::Evaluated { output: true, .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, GateOutcome::Skipped { .. })
    }
}

/// Diagnostic entry for one gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateReport {
    pub gate: GateKind,
    #[serde(flatten)]
    pub outcome: GateOutcome,
}

/// Result of one evaluation cycle for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub asset: String,
    pub asset_type: AssetType,
    /// Direction resolved from the MACD sign, `None` when no direction could be found.
    pub order_type: Option<OrderType>,
    /// When the MACD last crossed its signal line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_time: Option<DateTime<Utc>>,
    pub price: f64,
    /// Timestamp of the last bar in the evaluated snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<DateTime<Utc>>,
    pub gates: Vec<GateReport>,
    pub decision: bool,
}

impl Decision {
    /// A terminal "no trade" decision for when no direction could be resolved.
    pub fn no_direction(asset: &str, asset_type: AssetType, price: f64) -> Self {
        Self {
            asset: asset.to_string(),
            asset_type,
            order_type: None,
            turn_time: None,
            price,
            evaluated_at: None,
            gates: Vec::new(),
            decision: false,
        }
    }

    /// Diagnostic entry for a gate, if it was evaluated this cycle.
    pub fn gate(&self, gate: GateKind) -> Option<&GateReport> {
        self.gates.iter().find(|r| r.gate == gate)
    }

    /// Number of gates that could not be computed.
    pub fn skipped_count(&self) -> usize {
        self.gates.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    /// The decision after the caller-side short veto for this asset type.
    pub fn actionable(&self) -> bool {
        self.decision
            && self
                .order_type
                .is_some_and(|order| order.allowed_for(self.asset_type))
    }
}
