//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax tables
//! from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    FederalTaxTables, FicaConfig, FilingStatus, GarnishmentLimits, StateTaxTables, TaxBracket,
    TaxTables,
};

/// Loads and provides access to tax table configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a tax-year
/// directory and provides methods to query brackets and rates.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/us-2024/
/// ├── federal.yaml       # Federal brackets + supplemental rates
/// ├── fica.yaml          # Social Security / Medicare parameters
/// ├── states.yaml        # Flat state withholding rates
/// └── garnishments.yaml  # Disposable-income ceilings by garnishment type
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::{ConfigLoader, FilingStatus};
///
/// let loader = ConfigLoader::load("./config/us-2024").unwrap();
/// let brackets = loader.federal_brackets(FilingStatus::Single).unwrap();
/// println!("{} brackets for single filers", brackets.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: TaxTables,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/us-2024")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let federal = Self::load_yaml::<FederalTaxTables>(&path.join("federal.yaml"))?;
        let fica = Self::load_yaml::<FicaConfig>(&path.join("fica.yaml"))?;
        let states = Self::load_yaml::<StateTaxTables>(&path.join("states.yaml"))?;
        let garnishments = Self::load_yaml::<GarnishmentLimits>(&path.join("garnishments.yaml"))?;

        Ok(Self {
            tables: TaxTables::new(federal, fica, states, garnishments),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying tax tables.
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    /// Gets the marginal bracket table for a filing status.
    ///
    /// # Returns
    ///
    /// Returns the bracket table if configured, or `BracketTableNotFound`.
    pub fn federal_brackets(&self, filing_status: FilingStatus) -> EngineResult<&[TaxBracket]> {
        self.tables
            .federal()
            .brackets
            .get(&filing_status)
            .map(Vec::as_slice)
            .ok_or_else(|| EngineError::BracketTableNotFound {
                filing_status: filing_status.as_str().to_string(),
            })
    }

    /// Gets the flat withholding rate for a state code.
    ///
    /// States with no income tax are configured with a rate of zero; an
    /// absent state code is a configuration error.
    pub fn state_rate(&self, state: &str) -> EngineResult<Decimal> {
        self.tables
            .states()
            .rates
            .get(state)
            .copied()
            .ok_or_else(|| EngineError::StateRateNotFound {
                state: state.to_string(),
            })
    }
}
