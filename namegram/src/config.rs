//! Tuning knobs for matching and indexing.
//!
//! Loading the file is up to the caller; this module only parses and
//! validates the JSON document.

use crate::database::{validate_table_name, DatabaseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TABLE_NAME: &str = "fuzzydb";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Query features a candidate word may miss and still match.
    pub tolerance: usize,
    /// Bigrams a document may miss and still be returned by the on-disk index.
    pub iter_slack: usize,
    /// Terms starting with any of these are left out of the on-disk index.
    pub excluded_term_prefixes: Vec<String>,
    pub table_name: String,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            tolerance: 2,
            iter_slack: 2,
            excluded_term_prefixes: vec!["F".to_string()],
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl FuzzyConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FuzzyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_table_name(&self.table_name).map_err(|e| match e {
            DatabaseError::InvalidTableName(name) => {
                ConfigError::Invalid(format!("table_name {name:?} is not an identifier"))
            }
            other => ConfigError::Invalid(other.to_string()),
        })?;
        if self.excluded_term_prefixes.iter().any(String::is_empty) {
            // an empty prefix would exclude every term
            return Err(ConfigError::Invalid(
                "excluded_term_prefixes contains an empty prefix".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_excluded(&self, term: &str) -> bool {
        self.excluded_term_prefixes
            .iter()
            .any(|prefix| term.starts_with(prefix.as_str()))
    }
}
