//! Embedded directory of well-known KOSPI/KOSDAQ listings.
//!
//! Loaded from `seed_data/stocks.yml` at compile time and used for instant,
//! offline search suggestions and for resolving a code's name and market
//! without a network round trip.

use std::collections::HashSet;

use kwatch_api::types::Market;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::is_korean_code;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to parse stock directory YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Duplicate code in stock directory: {0}")]
    DuplicateCode(String),
    #[error("Invalid code in stock directory: {0}")]
    InvalidCode(String),
}

/// A listed stock: 6-digit code, display name and market.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListedStock {
    pub code: String,
    pub name: String,
    pub market: Market,
}

impl ListedStock {
    pub fn yahoo_code(&self) -> String {
        self.market.to_yahoo_code(&self.code)
    }
}

#[derive(Deserialize, Debug)]
struct DirectoryFile {
    stocks: Vec<ListedStock>,
}

#[derive(Debug, Clone, Default)]
pub struct StockDirectory {
    stocks: Vec<ListedStock>,
}

/// Parse a directory from YAML content. Codes must be unique 6-digit strings.
pub fn parse_directory(yaml_content: &str) -> Result<StockDirectory, DirectoryError> {
    let file: DirectoryFile = serde_yml::from_str(yaml_content)?;

    let mut seen = HashSet::new();
    for stock in &file.stocks {
        if stock.code.len() != 6 || !is_korean_code(&stock.code) {
            return Err(DirectoryError::InvalidCode(stock.code.clone()));
        }
        if !seen.insert(stock.code.as_str()) {
            return Err(DirectoryError::DuplicateCode(stock.code.clone()));
        }
    }

    Ok(StockDirectory { stocks: file.stocks })
}

/// Load the directory embedded at compile time.
pub fn load_directory() -> Result<StockDirectory, DirectoryError> {
    let yaml_content = include_str!("../../seed_data/stocks.yml");
    parse_directory(yaml_content)
}

impl StockDirectory {
    pub fn new(stocks: Vec<ListedStock>) -> Self {
        Self { stocks }
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn stocks(&self) -> &[ListedStock] {
        &self.stocks
    }

    pub fn find(&self, code: &str) -> Option<&ListedStock> {
        self.stocks.iter().find(|s| s.code == code)
    }

    /// Listings whose name or code contains `query`, in directory order.
    ///
    /// ASCII letters match case-insensitively so `naver` finds `NAVER`.
    pub fn search_local(&self, query: &str, limit: usize) -> Vec<ListedStock> {
        let q = query.trim().to_ascii_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.stocks
            .iter()
            .filter(|s| s.name.to_ascii_lowercase().contains(&q) || s.code.contains(&q))
            .take(limit)
            .cloned()
            .collect()
    }
}
