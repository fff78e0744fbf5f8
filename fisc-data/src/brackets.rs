use std::io::Read;

use fisc_core::{BracketTable, BracketTableError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketLoaderError {
    #[error("CSV parse error on row {row}: {message}")]
    CsvParse { row: usize, message: String },

    #[error("invalid bracket table: {0}")]
    InvalidTable(#[from] BracketTableError),
}

/// A single record from a bracket CSV file.
///
/// - `lower_bound`: where the bracket starts
/// - `upper_bound`: where it ends (empty for the open-ended top bracket)
/// - `rate`: marginal rate as a decimal (e.g. `0.11` for 11%)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BracketRecord {
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl From<BracketRecord> for TaxBracket {
    fn from(record: BracketRecord) -> Self {
        TaxBracket::new(record.lower_bound, record.upper_bound, record.rate)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for quotient-familial bracket tables stored as CSV.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader, in file order.
    ///
    /// Rows are numbered from 1, the header excluded.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (idx, result) in csv_reader.deserialize().enumerate() {
            let record: BracketRecord = result.map_err(|e| BracketLoaderError::CsvParse {
                row: idx + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and validate a complete table.
    pub fn load_table<R: Read>(reader: R) -> Result<BracketTable, BracketLoaderError> {
        let records = Self::parse(reader)?;
        debug!(brackets = records.len(), "Parsed bracket records");

        let brackets = records.into_iter().map(TaxBracket::from).collect();
        Ok(BracketTable::new(brackets)?)
    }
}
