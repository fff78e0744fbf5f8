//! CSV loader for income tax simulation scenarios.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column                      | Required | Type    | Notes |
//! |-----------------------------|----------|---------|-------|
//! | `slot`                      | yes      | string  | `simulation1`, `simulation2` or `current` |
//! | `salary`                    | yes      | decimal | annual salaried income |
//! | `auto_entrepreneur_revenue` | yes      | decimal | annual revenue before abatement |
//! | `parts`                     | yes      | decimal | at least 1, in steps of 0.5 |
//! | `standard_deduction`        | no       | bool    | empty means `false` |
//! | `family_aid`                | no       | decimal | empty means zero |
//! | `childcare_cost`            | no       | decimal | empty means zero |
//! | `couple`                    | no       | bool    | empty means `false` |
//!
//! Booleans accept `true/false`, `yes/no` and `1/0`, case-insensitively.
//!
//! ### Example
//!
//! ```csv
//! slot,salary,auto_entrepreneur_revenue,parts,standard_deduction,couple
//! simulation1,30000,0,1,no,no
//! simulation2,42000,8000,2.5,yes,yes
//! ```

use std::io::Read;

use fisc_core::{TaxInputs, TaxInputsError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Simulation slots
// ---------------------------------------------------------------------------

/// Named slot a simulation result is stored under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SimulationSlot {
    Simulation1,
    Simulation2,
    Current,
}

impl SimulationSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulation1 => "simulation1",
            Self::Simulation2 => "simulation2",
            Self::Current => "current",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Simulation1 => "Simulation 1",
            Self::Simulation2 => "Simulation 2",
            Self::Current => "Current simulation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simulation1" | "sim1" | "1" => Some(Self::Simulation1),
            "simulation2" | "sim2" | "2" => Some(Self::Simulation2),
            "current" => Some(Self::Current),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    slot: String,
    salary: Decimal,
    auto_entrepreneur_revenue: Decimal,
    parts: Decimal,
    standard_deduction: Option<String>,
    family_aid: Option<Decimal>,
    childcare_cost: Option<Decimal>,
    couple: Option<String>,
}

/// One scenario row: the slot it fills and the inputs to compute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub slot: SimulationSlot,
    pub inputs: TaxInputs,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors raised while loading scenarios. Row numbers are 1-based, the
/// header excluded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioLoadError {
    #[error("CSV parse error on row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("unrecognised slot '{value}' on row {row}")]
    InvalidSlot { value: String, row: usize },

    #[error("column '{column}' on row {row} is not a boolean: '{value}'")]
    InvalidFlag {
        column: &'static str,
        value: String,
        row: usize,
    },

    #[error("invalid inputs on row {row}: {source}")]
    InvalidInputs {
        row: usize,
        #[source]
        source: TaxInputsError,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_flag(
    column: &'static str,
    value: Option<String>,
    row: usize,
) -> Result<bool, ScenarioLoadError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        _ => Err(ScenarioLoadError::InvalidFlag { column, value, row }),
    }
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Scenario, ScenarioLoadError> {
    let slot = SimulationSlot::parse(row.slot.trim()).ok_or_else(|| {
        ScenarioLoadError::InvalidSlot {
            value: row.slot.clone(),
            row: row_number,
        }
    })?;

    let inputs = TaxInputs {
        salary: row.salary,
        auto_entrepreneur_revenue: row.auto_entrepreneur_revenue,
        parts: row.parts,
        standard_deduction: parse_flag("standard_deduction", row.standard_deduction, row_number)?,
        family_aid: row.family_aid.unwrap_or_default(),
        childcare_cost: row.childcare_cost.unwrap_or_default(),
        is_couple: parse_flag("couple", row.couple, row_number)?,
    };
    inputs
        .validate()
        .map_err(|source| ScenarioLoadError::InvalidInputs {
            row: row_number,
            source,
        })?;

    Ok(Scenario { slot, inputs })
}

pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Parse scenarios from a CSV reader, in file order.
    ///
    /// # Errors
    ///
    /// * [`ScenarioLoadError::Parse`] if the CSV is malformed or a required
    ///   column is missing.
    /// * [`ScenarioLoadError::InvalidSlot`] or
    ///   [`ScenarioLoadError::InvalidFlag`] for unrecognised values.
    /// * [`ScenarioLoadError::InvalidInputs`] when a row fails
    ///   [`TaxInputs::validate`].
    pub fn parse<R: Read>(reader: R) -> Result<Vec<Scenario>, ScenarioLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row_number = idx + 1;
                let row = result.map_err(|e| ScenarioLoadError::Parse {
                    row: row_number,
                    message: e.to_string(),
                })?;
                convert_row(row, row_number)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
