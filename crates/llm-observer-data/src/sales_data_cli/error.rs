//! Error types for the sales data CLI.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::error::{GenerationError, OutputError, SettingsError};

/// Errors surfaced by the CLI parsing and generation flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// Output directory was not supplied.
    #[error("missing required flag: --output-dir")]
    MissingOutputDir,
    /// A flag expected a value but none was provided.
    #[error("missing value for {flag}")]
    MissingValue {
        /// Flag that was missing its value.
        flag: &'static str,
    },
    /// An unsupported argument was supplied.
    #[error("unknown argument: {value}")]
    UnknownArgument {
        /// Argument value that was not recognised.
        value: String,
    },
    /// A numeric value failed to parse.
    #[error("invalid number for {flag}: '{value}' ({message})")]
    InvalidNumber {
        /// Flag associated with the invalid number.
        flag: &'static str,
        /// Raw value supplied for the flag.
        value: String,
        /// Parser error message.
        message: String,
    },
    /// The output directory could not be created or opened.
    #[error("cannot use output directory '{path}': {message}")]
    OutputDirectory {
        /// Directory that could not be used.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
    /// Generation parameters were rejected.
    #[error("generation error: {source}")]
    Generation {
        /// Underlying generation error.
        #[from]
        #[source]
        source: GenerationError,
    },
    /// Settings could not be interpreted.
    #[error("settings error: {source}")]
    Settings {
        /// Underlying settings error.
        #[from]
        #[source]
        source: SettingsError,
    },
    /// A dataset file could not be written.
    #[error("output error: {source}")]
    Output {
        /// Underlying output error.
        #[from]
        #[source]
        source: OutputError,
    },
}
