//! Runtime settings read from the environment.

use std::path::PathBuf;

use kwatch_api::{
    Client, Error as ApiError, FallbackFeed, NewsClient, GOOGLE_NEWS_SEARCH_URL, YAHOO_CHART_URL,
};

pub const DEFAULT_DB_PATH: &str = "kwatch.db";
pub const DEFAULT_NEWS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `KWATCH_DB`
    pub db_path: PathBuf,
    /// `KWATCH_NEWS_LIMIT`
    pub news_limit: usize,
    /// `KWATCH_CHART_URL`
    pub chart_url: String,
    /// `KWATCH_NEWS_SEARCH_URL`
    pub news_search_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            news_limit: DEFAULT_NEWS_LIMIT,
            chart_url: YAHOO_CHART_URL.to_string(),
            news_search_url: GOOGLE_NEWS_SEARCH_URL.to_string(),
        }
    }
}

impl Settings {
    /// Reads `KWATCH_*` variables. Missing or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            db_path: env_string(&lookup, "KWATCH_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            news_limit: env_usize(&lookup, "KWATCH_NEWS_LIMIT", defaults.news_limit),
            chart_url: env_string(&lookup, "KWATCH_CHART_URL").unwrap_or(defaults.chart_url),
            news_search_url: env_string(&lookup, "KWATCH_NEWS_SEARCH_URL")
                .unwrap_or(defaults.news_search_url),
        }
    }

    pub fn chart_client(&self) -> Client {
        Client::with_base_url(&self.chart_url)
    }

    pub fn news_client(&self) -> Result<NewsClient, ApiError> {
        NewsClient::with_urls(&self.news_search_url, FallbackFeed::defaults())
    }
}

fn env_string(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    lookup(key)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let settings = settings_from(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.db_path, PathBuf::from("kwatch.db"));
        assert_eq!(settings.news_limit, 10);
        assert_eq!(settings.chart_url, "https://query1.finance.yahoo.com");
        assert_eq!(settings.news_search_url, "https://news.google.com/rss/search");
    }

    #[test]
    fn overrides_are_applied() {
        let settings = settings_from(&[
            ("KWATCH_DB", "/tmp/watch.db"),
            ("KWATCH_NEWS_LIMIT", " 5 "),
            ("KWATCH_CHART_URL", "http://127.0.0.1:9000"),
            ("KWATCH_NEWS_SEARCH_URL", "http://127.0.0.1:9001/rss"),
        ]);
        assert_eq!(settings.db_path, PathBuf::from("/tmp/watch.db"));
        assert_eq!(settings.news_limit, 5);
        assert_eq!(settings.chart_url, "http://127.0.0.1:9000");
        assert_eq!(settings.news_search_url, "http://127.0.0.1:9001/rss");
    }

    #[test]
    fn unparseable_numbers_fall_back() {
        assert_eq!(settings_from(&[("KWATCH_NEWS_LIMIT", "ten")]).news_limit, 10);
        assert_eq!(settings_from(&[("KWATCH_NEWS_LIMIT", "0")]).news_limit, 10);
        assert_eq!(settings_from(&[("KWATCH_DB", "  ")]).db_path, PathBuf::from("kwatch.db"));
    }
}
