//! Core market data types

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors raised while validating market data inputs.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("bars out of timestamp order at index {0}")]
    OutOfOrder(usize),

    #[error("duplicate bar timestamp {0}")]
    DuplicateTimestamp(i64),

    #[error("bar at index {0} violates low <= open/close <= high or has negative fields")]
    InvalidBar(usize),
}

/// One time step of OHLCV market data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar timestamp as a UTC datetime.
    pub fn datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .unwrap_or_default()
    }

    /// High-low span of the bar.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    fn is_well_formed(&self) -> bool {
        self.low <= self.open.min(self.close)
            && self.open.max(self.close) <= self.high
            && self.low >= 0.0
            && self.volume >= 0.0
    }
}

/// Time-ordered OHLCV history with strictly increasing, unique timestamps.
///
/// Construction validates ordering and per-bar price bounds; all downstream
/// feature and label computation relies on these invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn from_bars(bars: Vec<PriceBar>) -> Result<Self, DataError> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_well_formed() {
                return Err(DataError::InvalidBar(i));
            }
            if i > 0 {
                match bars[i - 1].timestamp.cmp(&bar.timestamp) {
                    Ordering::Less => {}
                    Ordering::Equal => return Err(DataError::DuplicateTimestamp(bar.timestamp)),
                    Ordering::Greater => return Err(DataError::OutOfOrder(i)),
                }
            }
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Close of the most recent bar.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}
