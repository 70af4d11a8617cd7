//! Error types for the library layer.

use std::fmt;

use crate::db::DbError;

/// Errors produced by the library layer, wrapping provider and storage
/// errors and adding input validation and lookup failures.
#[derive(Debug)]
pub enum KwatchError {
    /// An error from the quote, history or news provider.
    Api(kwatch_api::Error),
    /// A watchlist store operation failed.
    Db(DbError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// A stock code could not be resolved to a listing.
    NotFound(String),
}

impl fmt::Display for KwatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Db(e) => write!(f, "Database error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for KwatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Db(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<kwatch_api::Error> for KwatchError {
    fn from(e: kwatch_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<DbError> for KwatchError {
    fn from(e: DbError) -> Self {
        Self::Db(e)
    }
}

impl From<serde_json::Error> for KwatchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
