//! CSV persistence for option chains and run artifacts
//!
//! Chain files use brokerage-export column names (`Option Type`,
//! `Strike Price`, `Ask`, `Expiration Date`, `Symbol`); output files carry
//! the forecast context alongside each selected contract.

use crate::options::{OptionContract, OptionType, SelectedOption};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// One row of the forecast summary table.
#[derive(Debug, Serialize)]
pub struct ForecastRow {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Current Price")]
    pub current_price: f64,
    #[serde(rename = "Predicted High")]
    pub predicted_high: f64,
    #[serde(rename = "Predicted Low")]
    pub predicted_low: f64,
    #[serde(rename = "High Change %")]
    pub high_change_pct: f64,
    #[serde(rename = "Low Change %")]
    pub low_change_pct: f64,
    #[serde(rename = "Options Analyzed")]
    pub options_analyzed: bool,
    #[serde(rename = "Potential Options")]
    pub potential_options: usize,
}

#[derive(Debug, Deserialize)]
struct ChainRecord {
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Option Type")]
    option_type: String,
    #[serde(rename = "Strike Price")]
    strike: f64,
    #[serde(rename = "Ask")]
    ask: f64,
    #[serde(rename = "Expiration Date")]
    expiration: String,
}

impl ChainRecord {
    fn into_contract(self) -> Result<OptionContract> {
        let option_type = match self.option_type.trim().to_ascii_uppercase().as_str() {
            "CALL" => OptionType::Call,
            "PUT" => OptionType::Put,
            other => bail!("unknown option type: {other}"),
        };
        Ok(OptionContract {
            symbol: self.symbol,
            option_type,
            strike: self.strike,
            ask: self.ask,
            expiration: parse_expiration(&self.expiration)?,
        })
    }
}

#[derive(Debug, Serialize)]
struct SelectionRecord<'a> {
    #[serde(rename = "Symbol")]
    symbol: &'a str,
    #[serde(rename = "Option Type")]
    option_type: &'a str,
    #[serde(rename = "Strike Price")]
    strike: f64,
    #[serde(rename = "Ask")]
    ask: f64,
    #[serde(rename = "Expiration Date")]
    expiration: String,
    #[serde(rename = "Predicted Max")]
    predicted_max: f64,
    #[serde(rename = "Predicted Min")]
    predicted_min: f64,
    #[serde(rename = "Current Price")]
    current_price: f64,
    #[serde(rename = "Analysis Period")]
    analysis_period: usize,
}

/// CSV load/save entry points.
pub struct CsvStore;

impl CsvStore {
    /// Load an options chain exported as CSV.
    pub fn load_option_chain<P: AsRef<Path>>(path: P) -> Result<Vec<OptionContract>> {
        let file = File::open(&path)
            .with_context(|| format!("failed to open option chain {:?}", path.as_ref()))?;
        let mut reader = Reader::from_reader(file);

        let mut contracts = Vec::new();
        for (i, result) in reader.deserialize().enumerate() {
            let record: ChainRecord =
                result.with_context(|| format!("malformed chain record {i}"))?;
            let contract = record
                .into_contract()
                .with_context(|| format!("malformed chain record {i}"))?;
            contracts.push(contract);
        }
        Ok(contracts)
    }

    /// Write the forecast summary table.
    pub fn write_forecasts<P: AsRef<Path>>(path: P, rows: &[ForecastRow]) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {:?}", path.as_ref()))?;
        let mut writer = Writer::from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write selected contracts with their forecast context.
    pub fn write_selected_options<P: AsRef<Path>>(
        path: P,
        selections: &[SelectedOption],
    ) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {:?}", path.as_ref()))?;
        let mut writer = Writer::from_writer(file);
        for selection in selections {
            let contract = &selection.contract;
            writer.serialize(SelectionRecord {
                symbol: &contract.symbol,
                option_type: contract.option_type.as_str(),
                strike: contract.strike,
                ask: contract.ask,
                expiration: contract.expiration.format("%Y-%m-%d").to_string(),
                predicted_max: selection.predicted_high,
                predicted_min: selection.predicted_low,
                current_price: selection.current_price,
                analysis_period: selection.horizon_days,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn parse_expiration(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .with_context(|| format!("unparseable expiration date: {raw}"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
