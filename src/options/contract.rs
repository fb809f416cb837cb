//! Option contract types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contract side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    #[serde(rename = "CALL")]
    Call,
    #[serde(rename = "PUT")]
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        }
    }
}

/// One listed contract from an options chain. Read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    pub symbol: String,
    pub option_type: OptionType,
    pub strike: f64,
    pub ask: f64,
    pub expiration: DateTime<Utc>,
}

impl OptionContract {
    pub fn new(
        symbol: impl Into<String>,
        option_type: OptionType,
        strike: f64,
        ask: f64,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            option_type,
            strike,
            ask,
            expiration,
        }
    }

    /// Whole calendar days until expiry, truncated; negative once expired.
    pub fn days_to_expiry(&self, as_of: DateTime<Utc>) -> i64 {
        self.expiration.signed_duration_since(as_of).num_days()
    }
}

/// A contract that passed the forecast screen, annotated with the
/// forecast it was evaluated against.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedOption {
    pub contract: OptionContract,
    pub predicted_high: f64,
    pub predicted_low: f64,
    pub current_price: f64,
    pub horizon_days: usize,
}
