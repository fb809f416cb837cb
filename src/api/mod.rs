//! Market data retrieval
//!
//! Async client for fetching daily price history. A symbol with no
//! retrievable history surfaces as `ApiError::NoData`; callers skip the
//! symbol and continue the batch.

mod client;
mod error;

pub use client::StooqClient;
pub use error::{ApiError, ApiResult};
