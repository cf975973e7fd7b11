//! Technical gates: one long/short verdict per indicator reading.

use super::GateContext;
use crate::error::Result;
use crate::services::signals::indicators::{
    Adx, Atr, BollingerBands, Cci, EmaDema, Ichimoku, Macd, Momentum, RecentExtreme, Rsi,
    TrendBias, Vortex,
};
use crate::services::signals::Indicator;
use crate::types::GateResult;
use serde_json::json;

/// Minimum ADX for a trend to count as strong.
const ADX_THRESHOLD: f64 = 25.0;

/// Price beyond the EMA, optionally by at least one ATR.
pub fn ema_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let criteria = ctx.settings.ema_gate;
    let atr = if criteria.long_criteria || criteria.short_criteria {
        Atr::default().calculate(ctx.bars)?
    } else {
        0.0
    };
    let long_atr = if criteria.long_criteria { atr } else { 0.0 };
    let short_atr = if criteria.short_criteria { atr } else { 0.0 };
    let reading = EmaDema::default().calculate(ctx.bars)?;

    Ok(GateResult::new(
        ctx.price > reading.ema + long_atr,
        ctx.price < reading.ema - short_atr,
        json!({
            "ema": reading.ema,
            "dema": reading.dema,
            "long_atr": long_atr,
            "short_atr": short_atr,
        }),
    ))
}

/// Price above (long) or below (short) both leading spans.
pub fn ichimoku_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let cloud = Ichimoku::default().calculate(ctx.bars)?;
    let price = ctx.price;

    Ok(GateResult::new(
        price > cloud.senkou_a && price > cloud.senkou_b,
        price < cloud.senkou_a && price < cloud.senkou_b,
        json!({
            "senkou_span_a": cloud.senkou_a,
            "senkou_span_b": cloud.senkou_b,
        }),
    ))
}

pub fn cci_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let criteria = ctx.settings.cci_gate;
    let reading = Cci::default().calculate(ctx.bars)?;

    Ok(GateResult::new(
        reading.cci > criteria.long_criteria,
        reading.cci < criteria.short_criteria,
        json!({
            "cci": reading.cci,
            "sma": reading.sma,
            "std_dev": reading.std_dev,
        }),
    ))
}

pub fn rsi_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let criteria = ctx.settings.rsi_gate;
    let rsi = Rsi::default().calculate(ctx.bars)?;

    Ok(GateResult::new(
        rsi > criteria.long_criteria,
        rsi < criteria.short_criteria,
        json!({ "rsi": rsi }),
    ))
}

/// One side's count, scaled by `criteria / 10`, must reach the other side's.
pub fn trend_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let criteria = ctx.settings.trend_gate;
    let reading = TrendBias::default().calculate(ctx.bars)?;
    let greater = reading.greater_count as f64;
    let less = reading.less_count as f64;

    Ok(GateResult::new(
        greater * criteria.long_criteria / 10.0 >= less,
        less * criteria.short_criteria / 10.0 >= greater,
        json!({
            "greater_count": reading.greater_count,
            "less_count": reading.less_count,
            "window": reading.window,
        }),
    ))
}

/// Unusually large move in either direction; long and short always agree.
pub fn momentum_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let reading = Momentum::default().calculate(ctx.bars)?;
    let strong = reading.mom.abs() > reading.avg_abs_mom;

    Ok(GateResult::new(
        strong,
        strong,
        json!({
            "momentum": reading.mom.abs(),
            "avg_momentum": reading.avg_abs_mom,
        }),
    ))
}

/// Histogram on the trade side and both histogram and MACD above their
/// trailing averages.
pub fn macd_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let reading = Macd::default().calculate(ctx.bars)?;
    let strong = reading.histogram.abs() > reading.avg_abs_histogram
        && reading.macd.abs() >= reading.avg_abs_macd;

    Ok(GateResult::new(
        reading.histogram > 0.0 && strong,
        reading.histogram < 0.0 && strong,
        json!({
            "macd": reading.macd,
            "histogram": reading.histogram,
            "avg_macd": reading.avg_abs_macd,
            "avg_hist": reading.avg_abs_histogram,
        }),
    ))
}

/// Newest close is the 30-bar high (long) or low (short).
pub fn extreme_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let reading = RecentExtreme::default().calculate(ctx.bars)?;

    Ok(GateResult::new(
        reading.is_new_high(),
        reading.is_new_low(),
        json!({
            "max_index": reading.max_index,
            "min_index": reading.min_index,
            "current_index": reading.current_index,
        }),
    ))
}

/// Trend-strength filter, not directional.
pub fn adx_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let adx = Adx::default().calculate(ctx.bars)?;
    let strong = adx >= ADX_THRESHOLD;

    Ok(GateResult::new(strong, strong, json!({ "adx": adx })))
}

/// Price outside the bands: above both (long) or below both (short).
pub fn bollinger_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let bands = BollingerBands::default().calculate(ctx.bars)?;
    let price = ctx.price;

    Ok(GateResult::new(
        price > bands.lower && price > bands.upper,
        price < bands.lower && price < bands.upper,
        json!({
            "lower": bands.lower,
            "upper": bands.upper,
            "basis": bands.basis,
        }),
    ))
}

pub fn vortex_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let reading = Vortex::default().calculate(ctx.bars)?;

    Ok(GateResult::new(
        reading.vip > reading.vim,
        reading.vip < reading.vim,
        json!({
            "vip": reading.vip,
            "vim": reading.vim,
        }),
    ))
}

/// Cloud wider than a percentage of price. Width filter, not directional.
pub fn cloud_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let criteria = ctx.settings.cloud_gate;
    let cloud = Ichimoku::default().calculate(ctx.bars)?;

    Ok(GateResult::new(
        cloud.cloud_size > criteria.long_criteria * ctx.price / 100.0,
        cloud.cloud_size > criteria.short_criteria * ctx.price / 100.0,
        json!({ "cloud_size": cloud.cloud_size }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateSettings;
    use crate::services::gates::MarketInputs;
    use crate::services::signals::test_support::*;
    use crate::types::{AssetType, OhlcBar};

    fn context<'a>(
        bars: &'a [OhlcBar],
        price: f64,
        settings: &'a GateSettings,
        market: &'a MarketInputs,
    ) -> GateContext<'a> {
        GateContext {
            bars,
            price,
            asset_type: AssetType::Crypto,
            settings,
            market,
        }
    }

    #[test]
    fn test_ema_gate_uptrend_long() {
        let bars = create_uptrend_candles(300);
        let settings = GateSettings::default();
        let market = MarketInputs::default();
        let price = bars.last().unwrap().close;

        let result = ema_gate(&context(&bars, price, &settings, &market)).unwrap();
        assert!(result.long);
        assert!(!result.short);
        assert!(result.data["long_atr"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_ema_gate_without_atr_band() {
        let bars = create_flat_candles(250, 50.0);
        let mut settings = GateSettings::default();
        settings.ema_gate.long_criteria = false;
        let market = MarketInputs::default();

        let result = ema_gate(&context(&bars, 50.5, &settings, &market)).unwrap();
        assert!(result.long);
        assert_eq!(result.data["long_atr"], json!(0.0));
    }

    #[test]
    fn test_cci_gate_flat_neither_side() {
        let bars = create_flat_candles(250, 50.0);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let result = cci_gate(&context(&bars, 50.0, &settings, &market)).unwrap();
        assert_eq!(result.data["cci"], json!(0.0));
        assert!(!result.long && !result.short);
    }

    #[test]
    fn test_rsi_gate_thresholds() {
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let up = create_uptrend_candles(40);
        let result = rsi_gate(&context(&up, 120.0, &settings, &market)).unwrap();
        assert!(result.long && !result.short);

        let down = create_downtrend_candles(40);
        let result = rsi_gate(&context(&down, 280.0, &settings, &market)).unwrap();
        assert!(!result.long && result.short);
    }

    #[test]
    fn test_trend_gate_uptrend() {
        let bars = create_uptrend_candles(300);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let result = trend_gate(&context(&bars, 250.0, &settings, &market)).unwrap();
        assert!(result.long);
        assert!(!result.short);
    }

    #[test]
    fn test_momentum_gate_is_symmetric() {
        let mut closes = vec![100.0; 60];
        closes.push(80.0);
        let bars = bars_from_closes(&closes);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let result = momentum_gate(&context(&bars, 80.0, &settings, &market)).unwrap();
        assert!(result.long && result.short);
    }

    #[test]
    fn test_adx_gate_flat_is_weak() {
        let bars = create_flat_candles(60, 10.0);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let result = adx_gate(&context(&bars, 10.0, &settings, &market)).unwrap();
        assert!(!result.long && !result.short);
    }

    #[test]
    fn test_bollinger_gate_breakout() {
        let bars = create_flat_candles(30, 10.0);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let above = bollinger_gate(&context(&bars, 11.0, &settings, &market)).unwrap();
        assert!(above.long && !above.short);
        let below = bollinger_gate(&context(&bars, 9.0, &settings, &market)).unwrap();
        assert!(!below.long && below.short);
        let inside = bollinger_gate(&context(&bars, 10.0, &settings, &market)).unwrap();
        assert!(!inside.long && !inside.short);
    }

    #[test]
    fn test_cloud_gate_flat_has_no_width() {
        let bars = create_flat_candles(100, 10.0);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let result = cloud_gate(&context(&bars, 10.0, &settings, &market)).unwrap();
        assert!(!result.long && !result.short);
    }

    #[test]
    fn test_extreme_gate_new_low() {
        let bars = create_downtrend_candles(40);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        let result = extreme_gate(&context(&bars, 280.0, &settings, &market)).unwrap();
        assert!(!result.long && result.short);
    }

    #[test]
    fn test_gate_propagates_insufficient_data() {
        let bars = create_uptrend_candles(10);
        let settings = GateSettings::default();
        let market = MarketInputs::default();

        assert!(macd_gate(&context(&bars, 105.0, &settings, &market)).is_err());
        assert!(vortex_gate(&context(&bars, 105.0, &settings, &market)).is_ok());
    }
}
