mod client;
mod errors;
mod feed;
mod query;
pub mod types;
mod user_agent;
pub use self::client::{Client, YAHOO_CHART_URL};
pub use self::errors::Error;
pub use self::feed::{
    clean_title, extract_source, parse_rss, strip_html, FallbackFeed, NewsClient, RssItem,
    GOOGLE_NEWS_SEARCH_URL,
};
pub use self::query::{ChartInterval, ChartQuery, ChartRange, Query};
