//! Stock search: embedded directory first, then a live lookup for numeric codes.

use std::collections::HashSet;

use kwatch_api::types::Market;
use kwatch_api::{ChartQuery, Client};

use crate::directory::{ListedStock, StockDirectory};
use crate::error::KwatchError;
use crate::validation::{is_korean_code, validate_code, validate_search};

/// Maximum number of suggestions returned by a search.
pub const MAX_RESULTS: usize = 8;

pub struct StockSearcher {
    client: Client,
    directory: StockDirectory,
}

impl StockSearcher {
    pub fn new(client: Client, directory: StockDirectory) -> Self {
        Self { client, directory }
    }

    pub fn directory(&self) -> &StockDirectory {
        &self.directory
    }

    /// Returns up to [`MAX_RESULTS`] listings for `query`.
    ///
    /// Directory matches come first. A 5-6 digit code is additionally looked up
    /// on both KOSPI and KOSDAQ; live hits already in the directory results are
    /// dropped. A failed lookup on one market is skipped, never an error.
    pub async fn search(&self, query: &str) -> Result<Vec<ListedStock>, KwatchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let query = validate_search(query)?;

        let mut results = self.directory.search_local(&query, MAX_RESULTS);

        if is_korean_code(&query) {
            let code = validate_code(&query)?;
            let local_codes: HashSet<String> = results.iter().map(|s| s.code.clone()).collect();
            let remote = self.lookup_code(&code).await;
            results.extend(
                remote
                    .into_iter()
                    .filter(|stock| !local_codes.contains(&stock.code)),
            );
            results.truncate(MAX_RESULTS);
        }

        tracing::debug!("search '{}' -> {} result(s)", query, results.len());
        Ok(results)
    }

    /// Looks `code` up on KOSPI and KOSDAQ concurrently, KOSPI first in the result.
    pub async fn lookup_code(&self, code: &str) -> Vec<ListedStock> {
        let (kospi, kosdaq) = tokio::join!(
            self.lookup_market(code, Market::Kospi),
            self.lookup_market(code, Market::Kosdaq)
        );
        kospi.into_iter().chain(kosdaq).collect()
    }

    /// Resolves a code to a listing: the directory when it knows the code,
    /// otherwise a live lookup. With `market` given only that market is tried.
    pub async fn resolve(
        &self,
        code: &str,
        market: Option<Market>,
    ) -> Result<ListedStock, KwatchError> {
        if let Some(stock) = self
            .directory
            .find(code)
            .filter(|s| market.map_or(true, |m| m == s.market))
        {
            return Ok(stock.clone());
        }

        let found = match market {
            Some(m) => self.lookup_market(code, m).await.into_iter().next(),
            None => self.lookup_code(code).await.into_iter().next(),
        };
        found.ok_or_else(|| KwatchError::NotFound(format!("no KOSPI/KOSDAQ listing for {}", code)))
    }

    async fn lookup_market(&self, code: &str, market: Market) -> Option<ListedStock> {
        let symbol = market.to_yahoo_code(code);
        let chart = match self.client.get_chart(&symbol, &ChartQuery::quote()).await {
            Ok(chart) => chart,
            Err(e) => {
                tracing::debug!("lookup {} skipped: {}", symbol, e);
                return None;
            }
        };

        let price = chart.meta.regular_market_price.unwrap_or(0.0);
        let name = chart.meta.listed_name()?;
        // Names with commas are placeholder records, not real listings.
        if !(price > 0.0) || name.contains(',') {
            return None;
        }
        Some(ListedStock {
            code: code.to_string(),
            name: name.to_string(),
            market,
        })
    }
}
