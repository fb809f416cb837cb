//! Stooq market data client
//!
//! Fetches full daily OHLCV history as CSV from stooq.com's public
//! download endpoint. No authentication; plain tickers are treated as US
//! listings (`AAPL` -> `aapl.us`).

use super::error::{ApiError, ApiResult};
use crate::data::{PriceBar, PriceSeries};
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

const BASE_URL: &str = "https://stooq.com";

/// HTTP client for daily price history
pub struct StooqClient {
    client: Client,
    base_url: String,
}

impl Default for StooqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StooqClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Client against a custom endpoint (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the full daily history for a symbol.
    pub async fn daily_history(&self, symbol: &str) -> ApiResult<PriceSeries> {
        let url = format!(
            "{}/q/d/l/?s={}&i=d",
            self.base_url,
            normalize_symbol(symbol)
        );
        debug!(%url, "requesting daily history");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let series = parse_history_csv(symbol, &body)?;
        info!(symbol, bars = series.len(), "fetched daily history");
        Ok(series)
    }
}

fn normalize_symbol(symbol: &str) -> String {
    let lower = symbol.trim().to_ascii_lowercase();
    if lower.contains('.') {
        lower
    } else {
        format!("{lower}.us")
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    // absent for indices
    #[serde(rename = "Volume")]
    volume: Option<f64>,
}

fn parse_history_csv(symbol: &str, body: &str) -> ApiResult<PriceSeries> {
    // unknown symbols come back as a short "No data" page, not a CSV
    if !body.trim_start().starts_with("Date") {
        return Err(ApiError::NoData(symbol.to_string()));
    }

    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: HistoryRecord =
            result.map_err(|e| ApiError::MalformedPayload(e.to_string()))?;
        let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|e| {
            ApiError::MalformedPayload(format!("bad date {}: {e}", record.date))
        })?;
        bars.push(PriceBar::new(
            date.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume.unwrap_or(0.0),
        ));
    }

    if bars.is_empty() {
        return Err(ApiError::NoData(symbol.to_string()));
    }
    PriceSeries::from_bars(bars).map_err(|source| ApiError::InvalidHistory {
        symbol: symbol.to_string(),
        source,
    })
}
