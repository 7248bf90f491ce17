//! Benchmark settings loaded via OrthoConfig.
//!
//! Values come from `LLM_OBSERVER_*` environment variables and configuration
//! files. Every field is optional; accessors fall back to the notebook
//! defaults.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::error::SettingsError;
use crate::generator::{DEFAULT_BASE_DEMAND, DEFAULT_DAY_RANGE, DEFAULT_SEED};
use crate::holidays::FixedHolidayCalendar;
use crate::table_name::TableName;

const DEFAULT_CATALOG: &str = "llm_observer";
const DEFAULT_SCHEMA: &str = "default";
const DEFAULT_SAMPLE_DATASET_SIZES: &str = "100,200";
const LIST_SEPARATOR: char = ',';

/// Configuration values for benchmark data generation.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LLM_OBSERVER")]
pub struct ObserverSettings {
    /// Catalog holding benchmark output tables.
    pub catalog: Option<String>,
    /// Schema holding benchmark output tables.
    pub schema: Option<String>,
    /// Comma-separated row counts for generated sample datasets.
    pub sample_dataset_sizes: Option<String>,
    /// Upper bound for sampled demand.
    pub base_demand: Option<u32>,
    /// Look-back window in days.
    pub day_range: Option<u32>,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Comma-separated ISO holiday dates.
    pub holidays: Option<String>,
}

impl ObserverSettings {
    /// Loads settings from the environment and configuration files only,
    /// ignoring the process command line.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] if a configuration layer is invalid.
    pub fn load_without_cli(program: &str) -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from(program)]).map_err(|err| SettingsError::Load {
            message: err.to_string(),
        })
    }

    /// Return the configured catalog, falling back to the default.
    #[must_use]
    pub fn catalog(&self) -> &str {
        self.catalog.as_deref().unwrap_or(DEFAULT_CATALOG)
    }

    /// Return the configured schema, falling back to the default.
    #[must_use]
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    /// Return the configured demand ceiling, falling back to the default.
    #[must_use]
    pub fn base_demand(&self) -> u32 {
        self.base_demand.unwrap_or(DEFAULT_BASE_DEMAND)
    }

    /// Return the configured look-back window, falling back to the default.
    #[must_use]
    pub fn day_range(&self) -> u32 {
        self.day_range.unwrap_or(DEFAULT_DAY_RANGE)
    }

    /// Return the configured seed, falling back to the default.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Parses the sample dataset sizes. Blank entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidDatasetSize`] for the first entry that
    /// is not a non-negative integer.
    pub fn dataset_sizes(&self) -> Result<Vec<usize>, SettingsError> {
        let raw = self
            .sample_dataset_sizes
            .as_deref()
            .unwrap_or(DEFAULT_SAMPLE_DATASET_SIZES);
        list_entries(raw)
            .map(|entry| {
                entry
                    .parse::<usize>()
                    .map_err(|err| SettingsError::InvalidDatasetSize {
                        value: entry.to_owned(),
                        message: err.to_string(),
                    })
            })
            .collect()
    }

    /// Builds a holiday calendar from the configured dates.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHolidayDate`] for an invalid date.
    pub fn holiday_calendar(&self) -> Result<FixedHolidayCalendar, SettingsError> {
        FixedHolidayCalendar::from_iso_dates(list_entries(self.holidays.as_deref().unwrap_or("")))
    }

    /// Builds a destination table name in the configured catalog and schema.
    #[must_use]
    pub fn table_name(&self, raw_table: &str) -> TableName {
        TableName::sanitized(self.catalog(), self.schema(), raw_table)
    }
}

fn list_entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}
