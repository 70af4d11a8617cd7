//! Per-ticker views assembled from the quote, history and news providers.
//!
//! Each provider call degrades on its own: a missing quote only removes the
//! timing signals, a failed history leaves an empty chart, failed news leaves
//! an empty analysis. Only the pure timing and sentiment functions run on the
//! fetched data.

use chrono::{DateTime, Utc};
use kwatch_api::types::{Market, NewsItem, StockHistory, StockQuote};
use kwatch_api::{Client, NewsClient};
use serde::Serialize;

use crate::config::DEFAULT_NEWS_LIMIT;
use crate::db::WatchlistItem;
use crate::directory::ListedStock;
use crate::sentiment::{analyze_news, NewsAnalysis, Outlook};
use crate::timing::{evaluate, TimingSignals};

/// Direction of the trailing-month chart.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// `Up` when the last close is at or above the first, `None` for an empty series.
    pub fn of(history: &[StockHistory]) -> Option<Trend> {
        let first = history.first()?;
        let last = history.last()?;
        Some(if last.close >= first.close {
            Trend::Up
        } else {
            Trend::Down
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
        }
    }
}

/// Full detail view of one stock.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub code: String,
    pub name: String,
    pub market: Market,
    pub quote: Option<StockQuote>,
    pub history: Vec<StockHistory>,
    pub avg_price: Option<f64>,
    pub signals: Option<TimingSignals>,
    pub news: NewsAnalysis,
    pub outlook: String,
    pub outlook_band: Outlook,
    pub trend: Option<Trend>,
    pub generated_at: DateTime<Utc>,
}

/// Watchlist card view: no news.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub code: String,
    pub name: String,
    pub market: Market,
    pub quote: Option<StockQuote>,
    pub history: Vec<StockHistory>,
    pub avg_price: Option<f64>,
    pub signals: Option<TimingSignals>,
    pub trend: Option<Trend>,
}

pub struct ReportBuilder {
    client: Client,
    news: NewsClient,
    news_limit: usize,
}

impl ReportBuilder {
    pub fn new(client: Client, news: NewsClient) -> Self {
        Self {
            client,
            news,
            news_limit: DEFAULT_NEWS_LIMIT,
        }
    }

    pub fn with_news_limit(mut self, limit: usize) -> Self {
        self.news_limit = limit;
        self
    }

    /// Report for a watched item, using its recorded cost basis.
    pub async fn report(&self, item: &WatchlistItem) -> StockReport {
        self.build(&item.code, &item.name, item.market, item.avg_price)
            .await
    }

    /// Report for a listing that may not be on the watchlist.
    pub async fn report_for(&self, stock: &ListedStock, avg_price: Option<f64>) -> StockReport {
        self.build(&stock.code, &stock.name, stock.market, avg_price)
            .await
    }

    pub async fn build(
        &self,
        code: &str,
        name: &str,
        market: Market,
        avg_price: Option<f64>,
    ) -> StockReport {
        let symbol = market.to_yahoo_code(code);
        let news_name = Some(name).filter(|n| !n.trim().is_empty());

        let (quote, history, news) = tokio::join!(
            self.fetch_quote(&symbol),
            self.fetch_history(&symbol),
            self.fetch_news(code, news_name),
        );

        let signals = signals_for(quote.as_ref(), avg_price, &history);
        let trend = Trend::of(&history);
        let analysis = analyze_news(&news);
        let outlook = analysis.outlook_text();
        let outlook_band = analysis.outlook();

        StockReport {
            code: code.to_string(),
            name: name.to_string(),
            market,
            quote,
            history,
            avg_price,
            signals,
            news: analysis,
            outlook,
            outlook_band,
            trend,
            generated_at: Utc::now(),
        }
    }

    /// Card view for a watched item: quote, history and timing only.
    pub async fn summary(&self, item: &WatchlistItem) -> StockSummary {
        let (quote, history) = tokio::join!(
            self.fetch_quote(&item.yahoo_code),
            self.fetch_history(&item.yahoo_code),
        );
        let signals = signals_for(quote.as_ref(), item.avg_price, &history);
        let trend = Trend::of(&history);

        StockSummary {
            code: item.code.clone(),
            name: item.name.clone(),
            market: item.market,
            quote,
            history,
            avg_price: item.avg_price,
            signals,
            trend,
        }
    }

    pub async fn fetch_quote(&self, symbol: &str) -> Option<StockQuote> {
        match self.client.get_quote(symbol).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!("Quote unavailable for {}: {}", symbol, e);
                None
            }
        }
    }

    pub async fn fetch_history(&self, symbol: &str) -> Vec<StockHistory> {
        self.client.get_history(symbol).await.unwrap_or_else(|e| {
            tracing::warn!("History unavailable for {}: {}", symbol, e);
            Vec::new()
        })
    }

    async fn fetch_news(&self, code: &str, name: Option<&str>) -> Vec<NewsItem> {
        self.news
            .fetch_stock_news(code, name, self.news_limit)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("News unavailable for {}: {}", code, e);
                Vec::new()
            })
    }
}

fn signals_for(
    quote: Option<&StockQuote>,
    avg_price: Option<f64>,
    history: &[StockHistory],
) -> Option<TimingSignals> {
    evaluate(quote?.price, avg_price, history)
}
