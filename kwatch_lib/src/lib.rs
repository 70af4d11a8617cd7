//! Library layer for kwatch: timing signals, news sentiment, the watchlist
//! store, stock search and per-ticker reports.
//!
//! Wraps the `kwatch_api` provider clients. The timing and sentiment modules
//! are pure; everything that touches the network or disk lives in `search`,
//! `report` and `db`.

pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod report;
pub mod search;
pub mod sentiment;
pub mod timing;
pub mod validation;

pub use kwatch_api;
pub use kwatch_api::types;
pub use kwatch_api::{Client, NewsClient};

pub use config::Settings;
pub use db::{Db, DbError, WatchlistItem};
pub use directory::{load_directory, DirectoryError, ListedStock, StockDirectory};
pub use error::KwatchError;
pub use report::{ReportBuilder, StockReport, StockSummary, Trend};
pub use search::StockSearcher;
pub use sentiment::{analyze_item, analyze_news, outlook_text, AnalyzedNews, NewsAnalysis, Outlook, Sentiment};
pub use timing::{evaluate, TimingLevel, TimingResult, TimingSignals};
