//! Fundamental gate: company ratios for stocks, market sentiment for crypto.

use super::GateContext;
use crate::config::{CryptoFundamentals, StockFundamentals, StockThresholds};
use crate::error::{GateError, Result};
use crate::types::{AssetType, FearGreedData, FundamentalFields, GateResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Stock fundamental sub-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundamentalCheck {
    #[serde(alias = "pe_gate")]
    PriceEarnings,
    #[serde(alias = "eps_gate")]
    Earnings,
    #[serde(alias = "sales_gate")]
    Sales,
    #[serde(alias = "book_gate")]
    Book,
    #[serde(alias = "return_gate")]
    Returns,
    #[serde(alias = "cash_gate")]
    Cash,
    #[serde(alias = "qc_ratio_gate")]
    Liquidity,
    #[serde(alias = "margin_gate")]
    Margins,
    #[serde(alias = "debt_gate")]
    Debt,
}

impl FundamentalCheck {
    pub const ALL: [FundamentalCheck; 9] = [
        FundamentalCheck::PriceEarnings,
        FundamentalCheck::Earnings,
        FundamentalCheck::Sales,
        FundamentalCheck::Book,
        FundamentalCheck::Returns,
        FundamentalCheck::Cash,
        FundamentalCheck::Liquidity,
        FundamentalCheck::Margins,
        FundamentalCheck::Debt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FundamentalCheck::PriceEarnings => "price_earnings",
            FundamentalCheck::Earnings => "earnings",
            FundamentalCheck::Sales => "sales",
            FundamentalCheck::Book => "book",
            FundamentalCheck::Returns => "returns",
            FundamentalCheck::Cash => "cash",
            FundamentalCheck::Liquidity => "liquidity",
            FundamentalCheck::Margins => "margins",
            FundamentalCheck::Debt => "debt",
        }
    }

    /// Screener fields the check reads, in argument order.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            FundamentalCheck::PriceEarnings => &["P/E", "Forward P/E"],
            FundamentalCheck::Earnings => &[
                "EPS (ttm)",
                "EPS this Y",
                "EPS next Q",
                "EPS next Y",
                "EPS growth next Y",
                "EPS next 5Y",
                "EPS past 5Y",
                "EPS Q/Q",
            ],
            FundamentalCheck::Sales => &["Sales past 5Y", "Sales", "P/S"],
            FundamentalCheck::Book => &["Book/sh", "P/B"],
            FundamentalCheck::Returns => &["ROA", "ROE", "ROI"],
            FundamentalCheck::Cash => &["Cash/sh", "P/C", "P/FCF"],
            FundamentalCheck::Liquidity => &["Quick Ratio", "Current Ratio"],
            FundamentalCheck::Margins => &["Oper. Margin", "Profit Margin", "Gross Margin"],
            FundamentalCheck::Debt => &["Debt/Eq", "LT Debt/Eq"],
        }
    }

    /// Run the check. `None` when any required field is missing or unparsable.
    pub fn evaluate(&self, fields: &FundamentalFields, t: &StockThresholds) -> Option<bool> {
        let values = self
            .required_fields()
            .iter()
            .map(|name| fields.get(name))
            .collect::<Option<Vec<f64>>>()?;

        let passed = match (self, values.as_slice()) {
            (FundamentalCheck::PriceEarnings, [pe, fpe]) => {
                *pe < t.pe && *fpe > t.min_forward_pe && *fpe < t.max_forward_pe
            }
            (
                FundamentalCheck::Earnings,
                [ttm, this_y, next_q, next_y, growth_next_y, next_5y, past_5y, q_q],
            ) => {
                *ttm > t.eps_ttm
                    && *this_y > t.eps_this_y
                    && *next_q > t.eps_next_q
                    && *next_y > t.eps_next_y
                    && *growth_next_y > t.eps_growth_next_y
                    && *next_5y > t.eps_next_5y
                    && *past_5y > t.eps_past_5y
                    && *q_q > t.eps_q_q
            }
            (FundamentalCheck::Sales, [past_5y, sales, ps]) => {
                *past_5y > t.sales_past_5y && *sales > t.sales && *ps < t.ps
            }
            (FundamentalCheck::Book, [book_sh, pb]) => {
                *book_sh > t.book_sh && *pb > t.pb_min && *pb < t.pb_max
            }
            (FundamentalCheck::Returns, [roa, roe, roi]) => {
                *roa > t.roa && *roe > t.roe && *roi > t.roi
            }
            (FundamentalCheck::Cash, [cash_sh, pc, pfcf]) => {
                *cash_sh > t.cash_sh && *pc < t.pc && *pfcf < t.pfcf
            }
            (FundamentalCheck::Liquidity, [quick, current]) => {
                *quick > t.quick_ratio && *current > t.current_ratio
            }
            (FundamentalCheck::Margins, [operating, profit, gross]) => {
                *operating > t.operating_margin
                    && *profit > t.profit_margin
                    && *gross > t.gross_margin
            }
            (FundamentalCheck::Debt, [debt_eq, lt_debt_eq]) => {
                *debt_eq < t.debt_eq && *lt_debt_eq < t.lt_debt_eq
            }
            _ => return None,
        };
        Some(passed)
    }
}

/// Crypto: the sentiment classification must be in the allow-list.
pub fn sentiment_check(reading: &FearGreedData, settings: &CryptoFundamentals) -> GateResult {
    let classification = reading.effective_classification();
    let allowed = settings
        .allowed_fear_and_greed
        .iter()
        .any(|c| c.eq_ignore_ascii_case(classification));

    GateResult::new(
        allowed,
        allowed,
        json!({
            "value": reading.value,
            "classification": classification,
        }),
    )
}

/// Stocks: every configured sub-check must be evaluable and pass.
pub fn stock_check(fields: &FundamentalFields, settings: &StockFundamentals) -> GateResult {
    let mut checks = Map::new();
    let mut passed = !settings.checks.is_empty();

    for check in &settings.checks {
        let status = match check.evaluate(fields, &settings.thresholds) {
            Some(true) => "pass",
            Some(false) => {
                passed = false;
                "fail"
            }
            None => {
                debug!("Fundamental check {} skipped: field unavailable", check.name());
                passed = false;
                "skipped"
            }
        };
        checks.insert(check.name().to_string(), Value::from(status));
    }

    GateResult::new(passed, passed, json!({ "checks": checks }))
}

pub fn fundamental_gate(ctx: &GateContext<'_>) -> Result<GateResult> {
    let settings = &ctx.settings.fundamental_gate;
    match ctx.asset_type {
        AssetType::Crypto => {
            let reading = ctx
                .market
                .fear_and_greed
                .as_ref()
                .ok_or_else(|| GateError::MissingInput("fear and greed index".to_string()))?;
            Ok(sentiment_check(reading, &settings.crypto))
        }
        AssetType::Stock => {
            let fields = ctx
                .market
                .fundamentals
                .as_ref()
                .ok_or_else(|| GateError::MissingInput("fundamental fields".to_string()))?;
            Ok(stock_check(fields, &settings.stocks))
        }
    }
}
