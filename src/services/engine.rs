//! Decision aggregator.
//!
//! One evaluation runs in three steps:
//! 1. resolve the trade direction from the MACD sign; without one the
//!    evaluation ends with no decision,
//! 2. run every enabled, non-bypassed gate in registry order for that
//!    direction, recording each result even after the decision turned false,
//! 3. report the AND of all gate verdicts.
//!
//! A gate that fails to compute is recorded as skipped and counts as false.

use crate::config::GateSettings;
use crate::services::gates::{evaluate_gate, GateContext, MarketInputs};
use crate::services::signals::indicators::Macd;
use crate::services::signals::Indicator;
use crate::types::{
    AssetType, BypassSet, Decision, GateKind, GateOutcome, GateReport, OhlcBar, OrderType,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Evaluates assets against a fixed gate configuration.
#[derive(Debug, Clone)]
pub struct GateEngine {
    settings: Arc<GateSettings>,
}

impl GateEngine {
    pub fn new(settings: Arc<GateSettings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    /// Gates that take part for an asset with the given bypass set, in evaluation order.
    pub fn active_gates(&self, bypass: &BypassSet) -> Vec<GateKind> {
        active_gates(&self.settings, bypass)
    }

    pub fn evaluate(
        &self,
        asset: &str,
        asset_type: AssetType,
        bars: &[OhlcBar],
        price: f64,
        bypass: &BypassSet,
        market: &MarketInputs,
    ) -> Decision {
        evaluate_with_inputs(asset, asset_type, bars, price, &self.settings, bypass, market)
    }
}

fn active_gates(settings: &GateSettings, bypass: &BypassSet) -> Vec<GateKind> {
    GateKind::ALL
        .into_iter()
        .filter(|gate| settings.is_enabled(*gate) && !bypass.contains(*gate))
        .collect()
}

/// Evaluate one asset snapshot without external market inputs.
///
/// The fundamental gate, if enabled, is then recorded as skipped.
pub fn evaluate(
    asset: &str,
    asset_type: AssetType,
    bars: &[OhlcBar],
    price: f64,
    settings: &GateSettings,
    bypass: &BypassSet,
) -> Decision {
    evaluate_with_inputs(
        asset,
        asset_type,
        bars,
        price,
        settings,
        bypass,
        &MarketInputs::default(),
    )
}

/// Evaluate one asset snapshot.
pub fn evaluate_with_inputs(
    asset: &str,
    asset_type: AssetType,
    bars: &[OhlcBar],
    price: f64,
    settings: &GateSettings,
    bypass: &BypassSet,
    market: &MarketInputs,
) -> Decision {
    let direction = match Macd::default().calculate(bars) {
        Ok(reading) => reading,
        Err(e) => {
            warn!("{}: no trade direction: {}", asset, e);
            return Decision::no_direction(asset, asset_type, price);
        }
    };
    let order_type = direction.direction;

    let ctx = GateContext {
        bars,
        price,
        asset_type,
        settings,
        market,
    };

    let mut buy = true;
    let mut gates = Vec::new();

    for gate in active_gates(settings, bypass) {
        let outcome = match evaluate_gate(gate, &ctx) {
            Ok(result) => GateOutcome::Evaluated {
                output: result.for_order(order_type),
                result,
            },
            Err(e) => {
                warn!("{}: {} skipped: {}", asset, gate, e);
                GateOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        };
        debug!("{}: {} -> {}", asset, gate, outcome.passed());
        buy = buy && outcome.passed();
        gates.push(GateReport { gate, outcome });
    }

    let decision = Decision {
        asset: asset.to_string(),
        asset_type,
        order_type: Some(order_type),
        turn_time: Some(direction.turn_time),
        price,
        evaluated_at: bars.last().map(|b| b.time),
        gates,
        decision: buy,
    };

    info!(
        "{} ({}) {}: decision={} ({} gates, {} skipped)",
        asset,
        asset_type.as_str(),
        order_type,
        decision.decision,
        decision.gates.len(),
        decision.skipped_count()
    );

    decision
}

/// Direction implied by the latest MACD cross, if one can be computed.
pub fn resolve_direction(bars: &[OhlcBar]) -> Option<OrderType> {
    Macd::default().calculate(bars).ok().map(|r| r.direction)
}
