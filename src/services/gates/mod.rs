//! Gate set.
//!
//! A gate turns one indicator reading (or one external input) into a
//! long/short verdict plus the raw values behind it. Gates are looked up by
//! [`GateKind`] through [`evaluator`]; none of them mutate the series.

pub mod fundamental;
pub mod technical;

pub use fundamental::FundamentalCheck;

use crate::config::GateSettings;
use crate::error::Result;
use crate::types::{AssetType, FearGreedData, FundamentalFields, GateKind, GateResult, OhlcBar};

/// Externally sourced inputs used by the fundamental gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketInputs {
    pub fear_and_greed: Option<FearGreedData>,
    pub fundamentals: Option<FundamentalFields>,
}

/// Everything a gate may look at for one asset in one cycle.
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub bars: &'a [OhlcBar],
    pub price: f64,
    pub asset_type: AssetType,
    pub settings: &'a GateSettings,
    pub market: &'a MarketInputs,
}

/// Signature shared by every gate.
pub type GateFn = fn(&GateContext<'_>) -> Result<GateResult>;

/// Registry lookup: the evaluator behind a gate identifier.
pub fn evaluator(gate: GateKind) -> GateFn {
    match gate {
        GateKind::Ema => technical::ema_gate,
        GateKind::Ichimoku => technical::ichimoku_gate,
        GateKind::Cci => technical::cci_gate,
        GateKind::Rsi => technical::rsi_gate,
        GateKind::Trend => technical::trend_gate,
        GateKind::Momentum => technical::momentum_gate,
        GateKind::Macd => technical::macd_gate,
        GateKind::Extreme => technical::extreme_gate,
        GateKind::Adx => technical::adx_gate,
        GateKind::Bollinger => technical::bollinger_gate,
        GateKind::Vortex => technical::vortex_gate,
        GateKind::Cloud => technical::cloud_gate,
        GateKind::Fundamental => fundamental::fundamental_gate,
    }
}

/// Evaluate a single gate.
pub fn evaluate_gate(gate: GateKind, ctx: &GateContext<'_>) -> Result<GateResult> {
    evaluator(gate)(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_support::*;

    #[test]
    fn test_every_gate_evaluates_on_long_history() {
        let bars = create_uptrend_candles(300);
        let settings = GateSettings::default();
        let market = MarketInputs {
            fear_and_greed: Some(FearGreedData::from_value(30)),
            fundamentals: None,
        };
        let ctx = GateContext {
            bars: &bars,
            price: 250.0,
            asset_type: AssetType::Crypto,
            settings: &settings,
            market: &market,
        };

        for gate in GateKind::ALL {
            assert!(evaluate_gate(gate, &ctx).is_ok(), "{} failed", gate);
        }
    }

    #[test]
    fn test_gates_reject_missing_inputs() {
        let settings = GateSettings::default();
        let market = MarketInputs::default();
        let ctx = GateContext {
            bars: &[],
            price: 1.0,
            asset_type: AssetType::Stock,
            settings: &settings,
            market: &market,
        };

        for gate in GateKind::ALL {
            assert!(evaluate_gate(gate, &ctx).is_err(), "{} accepted missing input", gate);
        }
    }
}
