//! Unit tests for types module

use gatekeeper::types::*;
use gatekeeper::GateError;
use serde_json::json;

#[test]
fn test_series_serialization() {
    let json = r#"[
        {"time":"2024-01-01T00:00:00Z","open":10,"high":12,"low":9,"close":11},
        {"time":"2024-01-01T01:00:00Z","open":11,"high":13,"low":10,"close":12.5}
    ]"#;
    let series: Series = serde_json::from_str(json).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.last().unwrap().close, 12.5);

    let encoded = serde_json::to_value(&series).unwrap();
    assert!(encoded.is_array());
    assert_eq!(encoded[1]["high"], json!(13.0));
}

#[test]
fn test_series_rejects_duplicate_timestamps() {
    let json = r#"[
        {"time":"2024-01-01T00:00:00Z","open":1,"high":1,"low":1,"close":1},
        {"time":"2024-01-01T00:00:00Z","open":2,"high":2,"low":2,"close":2}
    ]"#;
    assert!(serde_json::from_str::<Series>(json).is_err());
}

#[test]
fn test_timeframe_serialization() {
    assert_eq!(serde_json::to_string(&Timeframe::OneHour).unwrap(), "\"1h\"");
    let parsed: Timeframe = serde_json::from_str("\"1d\"").unwrap();
    assert_eq!(parsed, Timeframe::OneDay);
    assert_eq!(Timeframe::OneMinute.seconds(), 60);
    assert_eq!(format!("{}", Timeframe::OneDay), "1d");
}

#[test]
fn test_asset_type_from_str() {
    assert_eq!(AssetType::from_str("Crypto"), Some(AssetType::Crypto));
    assert_eq!(AssetType::from_str("stocks"), Some(AssetType::Stock));
    assert_eq!(AssetType::from_str("forex"), None);
    assert!(AssetType::Crypto.can_short());
    assert!(!AssetType::Stock.can_short());
    assert!(AssetType::Stock.follows_market_hours());
}

#[test]
fn test_bypass_set_from_config_string() {
    let bypass = BypassSet::parse("rsi_gate,momentum_gate").unwrap();
    assert_eq!(bypass.len(), 2);
    assert_eq!(
        bypass.iter().collect::<Vec<_>>(),
        vec![GateKind::Rsi, GateKind::Momentum]
    );
    assert!(!bypass.contains(GateKind::Ema));
}

#[test]
fn test_bypass_set_unknown_gate() {
    let err = BypassSet::parse("ema_gate,volume_gate").unwrap_err();
    assert!(matches!(err, GateError::UnknownGate(ref name) if name == "volume_gate"));
    assert!(err.to_string().contains("volume_gate"));
}

#[test]
fn test_fear_greed_classify() {
    assert_eq!(FearGreedData::classify(0), "Extreme Fear");
    assert_eq!(FearGreedData::classify(24), "Extreme Fear");
    assert_eq!(FearGreedData::classify(25), "Fear");
    assert_eq!(FearGreedData::classify(50), "Neutral");
    assert_eq!(FearGreedData::classify(56), "Greed");
    assert_eq!(FearGreedData::classify(100), "Extreme Greed");
}

#[test]
fn test_fear_greed_defaults() {
    let data: FearGreedData = serde_json::from_str("{}").unwrap();
    assert_eq!(data.value, 50);
    assert_eq!(data.classification, "Neutral");
}

#[test]
fn test_sanitize_number() {
    assert_eq!(sanitize_number("22.31"), Some(22.31));
    assert_eq!(sanitize_number("-12.40%"), Some(-12.4));
    assert_eq!(sanitize_number("2.5M"), Some(2.5e6));
    assert_eq!(sanitize_number("-"), None);
    assert_eq!(sanitize_number("n/a"), None);
}

#[test]
fn test_decision_json_shape() {
    let decision = Decision {
        asset: "BTC".to_string(),
        asset_type: AssetType::Crypto,
        order_type: Some(OrderType::Short),
        turn_time: None,
        price: 42000.0,
        evaluated_at: None,
        gates: vec![
            GateReport {
                gate: GateKind::Rsi,
                outcome: GateOutcome::Evaluated {
                    output: true,
                    result: GateResult::new(false, true, json!({ "rsi": 30.0 })),
                },
            },
            GateReport {
                gate: GateKind::Fundamental,
                outcome: GateOutcome::Skipped {
                    reason: "missing input: fear and greed index".to_string(),
                },
            },
        ],
        decision: false,
    };

    let value = serde_json::to_value(&decision).unwrap();
    assert_eq!(value["orderType"], "short");
    assert_eq!(value["assetType"], "crypto");
    assert!(value.get("turnTime").is_none());
    assert_eq!(value["gates"][0]["gate"], "rsi_gate");
    assert_eq!(value["gates"][0]["status"], "evaluated");
    assert_eq!(value["gates"][0]["output"], true);
    assert_eq!(value["gates"][0]["result"]["data"]["rsi"], 30.0);
    assert_eq!(value["gates"][1]["status"], "skipped");

    let back: Decision = serde_json::from_value(value).unwrap();
    assert_eq!(back, decision);
    assert_eq!(back.skipped_count(), 1);
    assert!(!back.actionable());
}

#[test]
fn test_no_direction_decision() {
    let decision = Decision::no_direction("AAPL", AssetType::Stock, 190.0);
    assert_eq!(decision.order_type, None);
    assert!(!decision.decision);
    assert!(!decision.actionable());
    assert!(decision.gate(GateKind::Ema).is_none());
}

#[test]
fn test_watched_asset_deserialize() {
    let json = r#"{
        "symbol": "AAPL",
        "asset_type": "stock",
        "timeframe": "1d",
        "gate_bypass": "momentum_gate",
        "series_file": "data/aapl.json",
        "fundamentals": { "P/E": "28.1", "Debt/Eq": "-" }
    }"#;
    let asset: WatchedAsset = serde_json::from_str(json).unwrap();
    assert_eq!(asset.asset_type, AssetType::Stock);
    assert_eq!(asset.timeframe, Timeframe::OneDay);
    assert_eq!(asset.series_key(), "AAPL:1d");
    assert!(asset.current_price.is_none());
    assert!(asset.fear_and_greed.is_none());

    let fields = FundamentalFields::from_raw(asset.fundamentals.as_ref().unwrap());
    assert_eq!(fields.get("P/E"), Some(28.1));
    assert_eq!(fields.get("Debt/Eq"), None);
}

#[test]
fn test_watched_asset_minimal() {
    let json = r#"{"symbol":"ETH","asset_type":"crypto","timeframe":"1h","series_file":"eth.json"}"#;
    let asset: WatchedAsset = serde_json::from_str(json).unwrap();
    assert!(asset.gate_bypass.is_empty());
    assert!(BypassSet::parse(&asset.gate_bypass).unwrap().is_empty());
}
