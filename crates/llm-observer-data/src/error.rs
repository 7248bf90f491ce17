//! Error types for the llm-observer-data crate.
//!
//! This module defines semantic error enums for record generation, settings
//! parsing, and output writing, following the project's error handling
//! conventions with `thiserror`. Query engine failures are not wrapped here:
//! they surface as the engine's own error type.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during sales record generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A generation parameter is outside its accepted range.
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the accepted range.
        message: String,
    },
}

/// Errors that can occur while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A sample dataset size is not a non-negative integer.
    #[error("invalid sample dataset size '{value}': {message}")]
    InvalidDatasetSize {
        /// The raw list entry.
        value: String,
        /// Parser error message.
        message: String,
    },

    /// A configured holiday is not an ISO `YYYY-MM-DD` date.
    #[error("invalid holiday date '{value}': {message}")]
    InvalidHolidayDate {
        /// The raw list entry.
        value: String,
        /// Parser error message.
        message: String,
    },

    /// The configuration layers could not be loaded.
    #[error("failed to load settings: {message}")]
    Load {
        /// Description of the loader failure.
        message: String,
    },
}

/// Errors that can occur while writing generated output files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// The output file could not be written.
    #[error("failed to write '{path}': {message}")]
    Write {
        /// Path of the file being written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// Records could not be serialized to JSON.
    #[error("failed to serialize records: {message}")]
    Serialize {
        /// Serializer error message.
        message: String,
    },
}
