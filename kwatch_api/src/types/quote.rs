//! Quote and daily bar types exposed by [`crate::Client`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Latest price snapshot for a ticker.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    /// Six-digit KRX code without the Yahoo suffix.
    pub code: String,
    pub name: String,
    /// Last traded price in KRW. Zero when the provider reported none.
    pub price: f64,
    /// Absolute change against the previous close.
    pub change: f64,
    /// Percent change against the previous close.
    pub change_percent: f64,
    pub volume: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl StockQuote {
    /// A quote with no positive price carries no signal.
    pub fn has_price(&self) -> bool {
        self.price > 0.0
    }
}

/// One daily bar of price history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StockHistory {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}
