//! Error types for the provider clients.

/// Errors that can occur when talking to the quote, history, or news providers.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unexpected response).
    #[error("Request failed")]
    RequestFailed,
    /// The provider returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The provider answered but has nothing for this symbol.
    #[error("No data for {symbol}: {description}")]
    NoData { symbol: String, description: String },
    /// An RSS document could not be parsed.
    #[error("Feed error: {0}")]
    Feed(String),
}
