use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Original period key of a bar in the raw payload.
pub type Period = i64;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Raw backtest result as it arrives from the service: four parallel sparse
/// maps keyed by period index (numeric strings), optional moving-average
/// maps in the same shape, an optional trade list, and summary figures.
///
/// Values are kept as `serde_json::Value` on purpose: a malformed cell
/// degrades through the coercion policy below instead of rejecting the
/// whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSeriesPayload {
    #[serde(rename = "Open", default)]
    pub open: HashMap<String, Value>,
    #[serde(rename = "High", default)]
    pub high: HashMap<String, Value>,
    #[serde(rename = "Low", default)]
    pub low: HashMap<String, Value>,
    #[serde(rename = "Close", default)]
    pub close: HashMap<String, Value>,
    #[serde(rename = "SMA_10", default)]
    pub sma_10: Option<HashMap<String, Value>>,
    #[serde(rename = "SMA_20", default)]
    pub sma_20: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub trades: Option<Vec<RawTrade>>,
    #[serde(default)]
    pub total_return: Option<f64>,
    #[serde(default)]
    pub metrics: Option<BacktestMetrics>,
}

impl RawSeriesPayload {
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One trade entry as serialized by the backtest service. Every field is
/// optional so a malformed entry degrades on its own rather than taking the
/// rest of the list with it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrade {
    #[serde(default)]
    pub period: Option<Value>,
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(rename = "return", default)]
    pub return_abs: Option<Value>,
    #[serde(rename = "return_pct", default)]
    pub return_pct: Option<Value>,
    #[serde(rename = "trade_type", default)]
    pub trade_type: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Trade direction. The wire encodes action `1` for an entry; anything else
/// is an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Entry,
    Exit,
}

impl TradeAction {
    fn from_code(code: f64) -> Self {
        if code == 1.0 {
            TradeAction::Entry
        } else {
            TradeAction::Exit
        }
    }

    pub fn is_entry(self) -> bool {
        matches!(self, TradeAction::Entry)
    }
}

/// A trade with all numeric fields already coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub period: Period,
    pub action: TradeAction,
    pub price: f64,
    pub return_abs: f64,
    pub return_pct: f64,
    pub trade_type: String,
    pub explanation: Option<String>,
}

/// Aggregate strategy statistics reported alongside the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub total_profit: f64,
    pub total_loss: f64,
    pub max_profit: f64,
    pub max_loss: f64,
    pub avg_profit: f64,
    pub avg_loss: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
}

/// One bar of the dense, render-ready series.
///
/// `display_index` is the x-coordinate: 0-based, contiguous, strictly
/// increasing regardless of gaps in the source period keys.
/// `source_period` keeps the original key for readouts and trade detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub display_index: usize,
    pub source_period: Period,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// `None` when the source cell is absent or non-numeric. Never defaulted
    /// to 0: a zero here would draw as a real overlay value.
    pub sma10: Option<f64>,
    pub sma20: Option<f64>,
    pub trade: Option<TradeEvent>,
}

// --- coercion boundary ------------------------------------------------------

/// Lenient numeric coercion applied to every raw cell: finite JSON numbers,
/// numeric strings, and booleans coerce; anything else is `None`.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Coerce a sparse-map key into a period index. Period keys are integral in
/// this protocol; keys that parse to a non-integral number are discarded
/// exactly like non-numeric ones.
pub fn parse_period(key: &str) -> Option<Period> {
    let v = key.trim().parse::<f64>().ok()?;
    if !v.is_finite() || v.fract() != 0.0 {
        return None;
    }
    if v < i64::MIN as f64 || v > i64::MAX as f64 {
        return None;
    }
    Some(v as Period)
}

fn coerce_value_period(value: Option<&Value>) -> Option<Period> {
    let v = value.and_then(as_number)?;
    if v.fract() != 0.0 || v < i64::MIN as f64 || v > i64::MAX as f64 {
        return None;
    }
    Some(v as Period)
}

/// Re-key a sparse string map by coerced period, dropping cells whose key or
/// value fails coercion.
fn numeric_series(map: &HashMap<String, Value>) -> HashMap<Period, f64> {
    map.iter()
        .filter_map(|(key, value)| Some((parse_period(key)?, as_number(value)?)))
        .collect()
}

fn trade_lookup(trades: Option<&[RawTrade]>) -> HashMap<Period, TradeEvent> {
    let mut lookup = HashMap::new();
    for raw in trades.unwrap_or_default() {
        // Entries without a usable period cannot be placed on the chart.
        let Some(period) = coerce_value_period(raw.period.as_ref()) else {
            continue;
        };
        let action = raw.action.as_ref().and_then(as_number).unwrap_or(0.0);
        let event = TradeEvent {
            period,
            action: TradeAction::from_code(action),
            price: raw.price.as_ref().and_then(as_number).unwrap_or(0.0),
            return_abs: raw.return_abs.as_ref().and_then(as_number).unwrap_or(0.0),
            return_pct: raw.return_pct.as_ref().and_then(as_number).unwrap_or(0.0),
            trade_type: raw.trade_type.clone().unwrap_or_default(),
            explanation: raw.explanation.clone(),
        };
        // Later entries overwrite earlier ones for the same period.
        lookup.insert(period, event);
    }
    lookup
}

// --- normalizer -------------------------------------------------------------

/// Turn a raw payload into a dense, index-ordered series.
///
/// The canonical period ordering is the key set of `Open`, filtered to
/// parseable integers and sorted ascending; `display_index` is the position
/// in that ordering. OHLC cells fall back to 0 on missing/non-numeric,
/// moving-average cells stay absent instead. An absent or empty `Open` map
/// yields an empty series.
pub fn normalize(payload: &RawSeriesPayload) -> Vec<NormalizedPoint> {
    if payload.open.is_empty() {
        return Vec::new();
    }

    let mut periods: Vec<Period> = payload.open.keys().filter_map(|k| parse_period(k)).collect();
    periods.sort_unstable();
    periods.dedup();
    if periods.is_empty() {
        return Vec::new();
    }

    let open = numeric_series(&payload.open);
    let high = numeric_series(&payload.high);
    let low = numeric_series(&payload.low);
    let close = numeric_series(&payload.close);
    let sma10 = payload.sma_10.as_ref().map(numeric_series);
    let sma20 = payload.sma_20.as_ref().map(numeric_series);
    let mut trades = trade_lookup(payload.trades.as_deref());

    periods
        .into_iter()
        .enumerate()
        .map(|(display_index, period)| NormalizedPoint {
            display_index,
            source_period: period,
            open: open.get(&period).copied().unwrap_or(0.0),
            high: high.get(&period).copied().unwrap_or(0.0),
            low: low.get(&period).copied().unwrap_or(0.0),
            close: close.get(&period).copied().unwrap_or(0.0),
            sma10: sma10.as_ref().and_then(|s| s.get(&period)).copied(),
            sma20: sma20.as_ref().and_then(|s| s.get(&period)).copied(),
            trade: trades.remove(&period),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> RawSeriesPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_and_absent_open_yield_empty_series() {
        assert!(normalize(&payload(json!({}))).is_empty());
        assert!(normalize(&payload(json!({ "Open": {} }))).is_empty());
    }

    #[test]
    fn non_numeric_keys_are_discarded() {
        let p = payload(json!({ "Open": { "a": 100 } }));
        assert!(normalize(&p).is_empty());

        let p = payload(json!({ "Open": { "a": 100, "3": 101 } }));
        let points = normalize(&p);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].source_period, 3);
    }

    #[test]
    fn display_index_is_contiguous_over_gappy_periods() {
        let p = payload(json!({
            "Open": { "100": 3.0, "5": 1.0, "9": 2.0 }
        }));
        let points = normalize(&p);
        let indices: Vec<usize> = points.iter().map(|p| p.display_index).collect();
        let periods: Vec<Period> = points.iter().map(|p| p.source_period).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(periods, vec![5, 9, 100]);
        assert_eq!(points[0].open, 1.0);
        assert_eq!(points[2].open, 3.0);
    }

    #[test]
    fn length_matches_parseable_key_count() {
        let p = payload(json!({
            "Open": { "0": 1, "1": 2, "x": 3, "2.5": 4, "7": 5 }
        }));
        assert_eq!(normalize(&p).len(), 3);
    }

    #[test]
    fn missing_close_cell_defaults_to_zero() {
        let p = payload(json!({
            "Open": { "0": 100, "1": 105 },
            "Close": { "0": 102 }
        }));
        let points = normalize(&p);
        assert_eq!(points[0].close, 102.0);
        assert_eq!(points[1].close, 0.0);
    }

    #[test]
    fn non_numeric_price_cell_defaults_to_zero() {
        let p = payload(json!({
            "Open": { "0": "oops" },
            "High": { "0": null }
        }));
        let points = normalize(&p);
        assert_eq!(points[0].open, 0.0);
        assert_eq!(points[0].high, 0.0);
    }

    #[test]
    fn numeric_strings_coerce() {
        let p = payload(json!({
            "Open": { "0": "100.5" },
            "SMA_10": { "0": " 99.25 " }
        }));
        let points = normalize(&p);
        assert_eq!(points[0].open, 100.5);
        assert_eq!(points[0].sma10, Some(99.25));
    }

    #[test]
    fn absent_sma_map_leaves_every_point_without_overlay_value() {
        let p = payload(json!({
            "Open": { "0": 1, "1": 2 }
        }));
        for point in normalize(&p) {
            assert_eq!(point.sma10, None);
            assert_eq!(point.sma20, None);
        }
    }

    #[test]
    fn sma_zero_is_a_real_value_but_garbage_is_absent() {
        let p = payload(json!({
            "Open": { "0": 1, "1": 2 },
            "SMA_20": { "0": 0.0, "1": "n/a" }
        }));
        let points = normalize(&p);
        assert_eq!(points[0].sma20, Some(0.0));
        assert_eq!(points[1].sma20, None);
    }

    #[test]
    fn trade_attaches_to_its_period_only() {
        let p = payload(json!({
            "Open": { "0": 100, "1": 105 },
            "High": { "0": 110, "1": 108 },
            "Low": { "0": 95, "1": 100 },
            "Close": { "0": 102, "1": 103 },
            "trades": [{
                "period": 1, "action": 1, "price": 105,
                "return": 0.03, "return_pct": 3, "trade_type": "BUY"
            }]
        }));
        let points = normalize(&p);
        assert_eq!(points.len(), 2);
        assert!(points[0].trade.is_none());

        let trade = points[1].trade.as_ref().unwrap();
        assert_eq!(trade.trade_type, "BUY");
        assert_eq!(trade.action, TradeAction::Entry);
        assert_eq!(trade.price, 105.0);
        assert_eq!(trade.return_pct, 3.0);
        // close < open at display index 1: this bar colors as a down bar
        assert!(points[1].close < points[1].open);
    }

    #[test]
    fn duplicate_trade_periods_keep_the_later_entry() {
        let p = payload(json!({
            "Open": { "4": 10 },
            "trades": [
                { "period": 4, "action": 1, "price": 10, "trade_type": "BUY" },
                { "period": 4, "action": 0, "price": 11, "trade_type": "SELL" }
            ]
        }));
        let trade = normalize(&p)[0].trade.clone().unwrap();
        assert_eq!(trade.trade_type, "SELL");
        assert_eq!(trade.action, TradeAction::Exit);
    }

    #[test]
    fn trade_without_numeric_period_is_skipped() {
        let p = payload(json!({
            "Open": { "0": 10 },
            "trades": [
                { "period": "first", "action": 1, "price": 10 },
                { "action": 1, "price": 10 }
            ]
        }));
        assert!(normalize(&p)[0].trade.is_none());
    }

    #[test]
    fn trade_numeric_fields_coerce_with_zero_fallback() {
        let p = payload(json!({
            "Open": { "2": 10 },
            "trades": [{ "period": "2", "action": "1", "price": "10.5" }]
        }));
        let trade = normalize(&p)[0].trade.clone().unwrap();
        assert_eq!(trade.action, TradeAction::Entry);
        assert_eq!(trade.price, 10.5);
        assert_eq!(trade.return_abs, 0.0);
        assert_eq!(trade.return_pct, 0.0);
        assert_eq!(trade.trade_type, "");
    }

    #[test]
    fn payload_decodes_from_service_json() {
        let json = r#"{
            "Open": { "0": 100.0 },
            "High": { "0": 110.0 },
            "Low": { "0": 95.0 },
            "Close": { "0": 102.0 },
            "total_return": 0.034,
            "metrics": {
                "total_trades": 4, "winning_trades": 3, "losing_trades": 1,
                "total_profit": 12.0, "total_loss": 3.0,
                "max_profit": 6.0, "max_loss": 3.0,
                "avg_profit": 4.0, "avg_loss": 3.0,
                "win_rate": 0.75, "profit_factor": 4.0
            }
        }"#;
        let p = RawSeriesPayload::from_json(json).unwrap();
        assert_eq!(p.total_return, Some(0.034));
        assert_eq!(p.metrics.unwrap().total_trades, 4);
        assert_eq!(normalize(&p).len(), 1);
    }

    #[test]
    fn bad_json_is_a_decode_error() {
        assert!(RawSeriesPayload::from_json("{ not json").is_err());
    }
}
