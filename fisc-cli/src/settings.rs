//! Optional TOML settings file.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "fisc.log"
//! rate_table = "income_tax"
//!
//! [parameters.borrowing]
//! debt_to_income_ceiling = "0.33"
//! ```
//!
//! Every key is optional; missing parameters keep their 2025 defaults.

use std::path::{Path, PathBuf};

use fisc_core::{BracketTable, FiscalParameters, IncomeTaxParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which bracket table drives the `rates` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTable {
    #[default]
    Visualization,
    IncomeTax,
}

impl RateTable {
    pub fn select<'a>(
        &self,
        params: &'a IncomeTaxParameters,
    ) -> &'a BracketTable {
        match self {
            Self::Visualization => &params.visualization_brackets,
            Self::IncomeTax => &params.brackets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub rate_table: RateTable,
    pub parameters: FiscalParameters,
}

impl Settings {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    /// for this layout.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed TOML, unknown keys or
    /// an invalid bracket table.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}
