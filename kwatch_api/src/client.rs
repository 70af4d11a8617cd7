//! HTTP client for the Yahoo Finance chart endpoint, the quote and history provider.

use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::{
    query::{ChartQuery, Query},
    types::{strip_yahoo_suffix, ChartEnvelope, ChartResult, StockHistory, StockQuote},
    user_agent::get_user_agent,
    Error,
};

/// Production host of the chart endpoint.
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com";

/// HTTP client for the Yahoo Finance `v8/finance/chart` endpoint.
///
/// Each request builds a fresh `reqwest::Client` with a randomized desktop
/// user agent and a 30-second timeout. Nothing is cached: every call hits
/// the provider.
pub struct Client {
    /// Base URL for the API. Defaults to `https://query1.finance.yahoo.com`.
    base_api_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production Yahoo Finance host.
    pub fn new() -> Self {
        Self {
            base_api_url: YAHOO_CHART_URL.to_string(),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_url(&self, symbol: &str, query: &ChartQuery) -> Result<Url, Error> {
        let raw = format!("{}/v8/finance/chart/{}", &self.base_api_url, symbol);
        let url = Url::parse(&raw).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(query.add_to_url(&url))
    }

    /// Fetches the raw chart result for `symbol` (e.g. `005930.KS`).
    pub async fn get_chart(&self, symbol: &str, query: &ChartQuery) -> Result<ChartResult, Error> {
        let url = self.get_url(symbol, query)?;
        tracing::debug!("GET {}", url);
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "ko-KR,ko;q=0.9,en-US;q=0.8")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get chart for {}: {}", symbol, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            // Yahoo reports unknown symbols as 404 with a structured error body.
            if status == reqwest::StatusCode::NOT_FOUND {
                if let Ok(envelope) = serde_json::from_str::<ChartEnvelope>(&body) {
                    if let Some(err) = envelope.chart.error {
                        return Err(Error::NoData {
                            symbol: symbol.to_string(),
                            description: err.description,
                        });
                    }
                }
            }
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let envelope = serde_json::from_str::<ChartEnvelope>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse chart: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        let description = envelope
            .chart
            .error
            .map(|e| e.description)
            .unwrap_or_else(|| "empty result".to_string());
        envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| Error::NoData {
                symbol: symbol.to_string(),
                description,
            })
    }

    /// Fetches the latest quote for `symbol`.
    pub async fn get_quote(&self, symbol: &str) -> Result<StockQuote, Error> {
        let chart = self.get_chart(symbol, &ChartQuery::quote()).await?;
        Ok(quote_from_chart(&chart, Utc::now()))
    }

    /// Fetches the trailing month of daily bars for `symbol`, oldest first.
    pub async fn get_history(&self, symbol: &str) -> Result<Vec<StockHistory>, Error> {
        let chart = self.get_chart(symbol, &ChartQuery::history()).await?;
        Ok(history_from_chart(&chart))
    }
}

/// Builds a [`StockQuote`] from chart metadata.
pub(crate) fn quote_from_chart(chart: &ChartResult, now: DateTime<Utc>) -> StockQuote {
    let meta = &chart.meta;
    let price = meta.regular_market_price.unwrap_or(0.0);
    let previous = meta
        .chart_previous_close
        .or(meta.previous_close)
        .unwrap_or(0.0);
    let (change, change_percent) = if previous > 0.0 && price > 0.0 {
        let change = price - previous;
        (change, change / previous * 100.0)
    } else {
        (0.0, 0.0)
    };
    let volume = meta.regular_market_volume.unwrap_or_else(|| {
        chart
            .indicators
            .quote
            .first()
            .and_then(|bars| bars.volume.iter().rev().flatten().next().copied())
            .unwrap_or(0)
    });

    StockQuote {
        code: strip_yahoo_suffix(&meta.symbol).to_string(),
        name: meta.display_name(),
        price,
        change,
        change_percent,
        volume,
        market_cap: None,
        updated_at: now,
    }
}

/// Zips the parallel OHLCV series into daily bars. Sessions without a close are dropped.
pub(crate) fn history_from_chart(chart: &ChartResult) -> Vec<StockHistory> {
    let Some(bars) = chart.indicators.quote.first() else {
        return Vec::new();
    };
    let mut history: Vec<StockHistory> = chart
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let close = bars.close.get(i).copied().flatten()?;
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some(StockHistory {
                date,
                open: value_at(&bars.open, i),
                high: value_at(&bars.high, i),
                low: value_at(&bars.low, i),
                close,
                volume: bars.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect();
    history.sort_by_key(|h| h.date);
    history
}

fn value_at(series: &[Option<f64>], i: usize) -> f64 {
    series.get(i).copied().flatten().unwrap_or(0.0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartIndicators, ChartMeta, ChartQuoteBars};
    use chrono::NaiveDate;

    fn meta(price: Option<f64>, prev: Option<f64>) -> ChartMeta {
        ChartMeta {
            symbol: "005930.KS".to_string(),
            currency: Some("KRW".to_string()),
            exchange_name: Some("KSC".to_string()),
            short_name: Some("SamsungElec".to_string()),
            long_name: Some("Samsung Electronics Co., Ltd.".to_string()),
            regular_market_price: price,
            chart_previous_close: prev,
            previous_close: None,
            regular_market_volume: Some(1_000),
        }
    }

    fn chart(meta: ChartMeta, timestamp: Vec<i64>, bars: ChartQuoteBars) -> ChartResult {
        ChartResult {
            meta,
            timestamp,
            indicators: ChartIndicators { quote: vec![bars] },
        }
    }

    #[test]
    fn quote_change_against_previous_close() {
        let c = chart(meta(Some(71_000.0), Some(70_000.0)), vec![], ChartQuoteBars::default());
        let q = quote_from_chart(&c, Utc::now());
        assert_eq!(q.code, "005930");
        assert_eq!(q.name, "SamsungElec");
        assert_eq!(q.price, 71_000.0);
        assert_eq!(q.change, 1_000.0);
        assert!((q.change_percent - 1.428_571).abs() < 1e-4);
        assert_eq!(q.volume, 1_000);
        assert!(q.market_cap.is_none());
    }

    #[test]
    fn quote_without_price_is_zeroed() {
        let c = chart(meta(None, Some(70_000.0)), vec![], ChartQuoteBars::default());
        let q = quote_from_chart(&c, Utc::now());
        assert_eq!(q.price, 0.0);
        assert_eq!(q.change, 0.0);
        assert_eq!(q.change_percent, 0.0);
        assert!(!q.has_price());
    }

    #[test]
    fn quote_name_falls_back_to_symbol() {
        let mut m = meta(Some(1.0), None);
        m.short_name = None;
        m.long_name = Some("   ".to_string());
        let c = chart(m, vec![], ChartQuoteBars::default());
        assert_eq!(quote_from_chart(&c, Utc::now()).name, "005930.KS");
    }

    #[test]
    fn history_skips_null_closes() {
        // 2024-06-03, 2024-06-04, 2024-06-05 at 00:00 UTC
        let bars = ChartQuoteBars {
            open: vec![Some(1.0), None, Some(3.0)],
            high: vec![Some(1.5), None, Some(3.5)],
            low: vec![Some(0.5), None, Some(2.5)],
            close: vec![Some(1.2), None, Some(3.2)],
            volume: vec![Some(10), None, None],
        };
        let c = chart(meta(Some(3.2), Some(1.2)), vec![1717372800, 1717459200, 1717545600], bars);
        let history = history_from_chart(&c);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(history[0].volume, 10);
        assert_eq!(history[1].date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
        assert_eq!(history[1].close, 3.2);
        assert_eq!(history[1].volume, 0);
    }

    #[test]
    fn history_without_bars_is_empty() {
        let c = ChartResult {
            meta: meta(Some(1.0), None),
            timestamp: vec![1717372800],
            indicators: ChartIndicators::default(),
        };
        assert!(history_from_chart(&c).is_empty());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "가".repeat(1000);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
    }
}
