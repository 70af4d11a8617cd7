//! Raw response envelope of the Yahoo Finance `v8/finance/chart` endpoint.
//!
//! Only the fields the clients read are modeled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Provider-side error, e.g. `{"code":"Not Found","description":"No data found, symbol may be delisted"}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Bar open times, unix seconds. Absent when the range has no sessions.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub previous_close: Option<f64>,
    pub regular_market_volume: Option<u64>,
}

impl ChartMeta {
    /// Name reported by the provider: short name, then long name.
    pub fn listed_name(&self) -> Option<&str> {
        [self.short_name.as_deref(), self.long_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Display name: the listed name, or the symbol itself.
    pub fn display_name(&self) -> String {
        self.listed_name().unwrap_or(&self.symbol).to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuoteBars>,
}

/// Parallel OHLCV series. Entries are `null` for sessions without trades.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ChartQuoteBars {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(short_name: Option<&str>, long_name: Option<&str>) -> ChartMeta {
        ChartMeta {
            symbol: "005930.KS".to_string(),
            currency: None,
            exchange_name: None,
            short_name: short_name.map(str::to_string),
            long_name: long_name.map(str::to_string),
            regular_market_price: None,
            chart_previous_close: None,
            previous_close: None,
            regular_market_volume: None,
        }
    }

    #[test]
    fn blank_short_name_falls_back_to_long_name() {
        let m = meta(Some("  "), Some("Samsung Electronics"));
        assert_eq!(m.listed_name(), Some("Samsung Electronics"));
    }

    #[test]
    fn symbol_is_last_resort() {
        let m = meta(None, None);
        assert_eq!(m.listed_name(), None);
        assert_eq!(m.display_name(), "005930.KS");
    }
}
