//! API error types

use crate::data::DataError;
use thiserror::Error;

/// Errors that can occur while retrieving market data
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("no history available for {0}")]
    NoData(String),

    #[error("invalid history for {symbol}: {source}")]
    InvalidHistory { symbol: String, source: DataError },
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
