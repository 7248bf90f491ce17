//! CLI support for writing generated sales datasets.
//!
//! This module provides parsing and generation helpers for the `sales-data`
//! binary. The binary delegates to these functions so they can be exercised
//! in tests without spawning a subprocess.

mod error;

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use mockable::Clock;
use tracing::info;

use crate::atomic_io::write_atomic;
use crate::error::OutputError;
use crate::generator::{SalesDataParams, generate_sales_data};
use crate::settings::ObserverSettings;
use crate::table_name::TableName;

pub use error::CliError;

/// Parsed options for the sales data CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    output_dir: Utf8PathBuf,
    rows: Vec<usize>,
    seed: Option<u64>,
    base_demand: Option<u32>,
    day_range: Option<u32>,
}

impl Options {
    /// Returns the directory datasets are written to.
    ///
    /// # Example
    ///
    /// ```
    /// use llm_observer_data::sales_data_cli::{ParseOutcome, parse_args};
    ///
    /// let args = vec!["--output-dir".to_string(), "out".to_string()];
    /// let ParseOutcome::Options(options) = parse_args(args.into_iter()).expect("parse") else {
    ///     panic!("expected options");
    /// };
    ///
    /// assert_eq!(options.output_dir(), "out");
    /// ```
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Returns the row counts requested on the command line.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

/// Outcome of parsing CLI arguments.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// Show help output and exit successfully.
    Help,
    /// Continue with the parsed options.
    Options(Options),
}

/// A dataset file written by [`run_generation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDataset {
    /// Destination table the dataset is intended for.
    pub table: TableName,
    /// Path of the written JSON file.
    pub path: Utf8PathBuf,
    /// Number of records written.
    pub rows: usize,
}

/// Parses CLI arguments into generation options.
///
/// `--rows` may be repeated; each occurrence produces one dataset.
///
/// # Errors
///
/// Returns [`CliError`] when required flags are missing or values cannot be
/// parsed.
///
/// # Example
///
/// ```
/// use llm_observer_data::sales_data_cli::{ParseOutcome, parse_args};
///
/// let args = vec![
///     "--output-dir".to_string(),
///     "out".to_string(),
///     "--rows".to_string(),
///     "100".to_string(),
///     "--rows".to_string(),
///     "200".to_string(),
/// ];
///
/// let ParseOutcome::Options(options) = parse_args(args.into_iter()).expect("parse") else {
///     panic!("expected options");
/// };
/// assert_eq!(options.rows(), &[100, 200]);
/// ```
pub fn parse_args<I>(mut args: I) -> Result<ParseOutcome, CliError>
where
    I: Iterator<Item = String>,
{
    let mut output_dir: Option<Utf8PathBuf> = None;
    let mut rows: Vec<usize> = Vec::new();
    let mut seed: Option<u64> = None;
    let mut base_demand: Option<u32> = None;
    let mut day_range: Option<u32> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParseOutcome::Help),
            "--output-dir" => {
                let value = next_value(&mut args, "--output-dir")?;
                output_dir = Some(Utf8PathBuf::from(value));
            }
            "--rows" => {
                let value = next_value(&mut args, "--rows")?;
                rows.push(parse_number(&value, "--rows")?);
            }
            "--seed" => {
                let value = next_value(&mut args, "--seed")?;
                seed = Some(parse_number(&value, "--seed")?);
            }
            "--base-demand" => {
                let value = next_value(&mut args, "--base-demand")?;
                base_demand = Some(parse_number(&value, "--base-demand")?);
            }
            "--day-range" => {
                let value = next_value(&mut args, "--day-range")?;
                day_range = Some(parse_number(&value, "--day-range")?);
            }
            _ => return Err(CliError::UnknownArgument { value: arg }),
        }
    }

    let resolved_output_dir = output_dir.ok_or(CliError::MissingOutputDir)?;
    Ok(ParseOutcome::Options(Options {
        output_dir: resolved_output_dir,
        rows,
        seed,
        base_demand,
        day_range,
    }))
}

/// Generates one dataset per requested row count and writes each to
/// `<catalog>.<schema>.<table>.json` in the output directory.
///
/// Row counts come from `--rows` when given, otherwise from the settings'
/// sample dataset sizes. Unset generation parameters fall back to the
/// settings.
///
/// # Errors
///
/// Returns [`CliError`] when settings are invalid, generation parameters are
/// rejected, or a file cannot be written.
pub fn run_generation(
    options: &Options,
    settings: &ObserverSettings,
    clock: &dyn Clock,
) -> Result<Vec<GeneratedDataset>, CliError> {
    let sizes = if options.rows.is_empty() {
        settings.dataset_sizes()?
    } else {
        options.rows.clone()
    };
    let calendar = settings.holiday_calendar()?;
    let dir = open_output_dir(&options.output_dir)?;

    let base_params = SalesDataParams::new(0)
        .with_base_demand(options.base_demand.unwrap_or_else(|| settings.base_demand()))
        .with_day_range(options.day_range.unwrap_or_else(|| settings.day_range()))
        .with_seed(options.seed.unwrap_or_else(|| settings.seed()));

    sizes
        .into_iter()
        .map(|n_rows| -> Result<GeneratedDataset, CliError> {
            let params = SalesDataParams {
                n_rows,
                ..base_params
            };
            let records = generate_sales_data(&params, &calendar, clock)?;
            let table = settings.table_name(&format!("sales_data_{n_rows}"));
            let file_name = format!("{table}.json");
            let path = options.output_dir.join(&file_name);

            let json = serde_json::to_vec_pretty(&records).map_err(|err| {
                OutputError::Serialize {
                    message: err.to_string(),
                }
            })?;
            write_atomic(&dir, &file_name, &path, &json)?;
            info!(table = %table, path = %path, rows = records.len(), "sales dataset written");

            Ok(GeneratedDataset {
                table,
                path,
                rows: records.len(),
            })
        })
        .collect()
}

/// Formats the success message emitted by the CLI.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use llm_observer_data::TableName;
/// use llm_observer_data::sales_data_cli::{GeneratedDataset, success_message};
///
/// let dataset = GeneratedDataset {
///     table: TableName::new("llm_observer", "default", "sales_data_100"),
///     path: Utf8PathBuf::from("out/llm_observer.default.sales_data_100.json"),
///     rows: 100,
/// };
///
/// assert!(success_message(&[dataset]).contains("sales_data_100"));
/// ```
#[must_use]
pub fn success_message(datasets: &[GeneratedDataset]) -> String {
    datasets
        .iter()
        .map(|dataset| {
            format!(
                "Wrote {} records for {} to {}",
                dataset.rows, dataset.table, dataset.path
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn open_output_dir(path: &Utf8Path) -> Result<Dir, CliError> {
    let to_error = |err: std::io::Error| CliError::OutputDirectory {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    Dir::create_ambient_dir_all(path, ambient_authority()).map_err(to_error)?;
    Dir::open_ambient_dir(path, ambient_authority()).map_err(to_error)
}

fn next_value<I>(args: &mut I, flag: &'static str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(CliError::MissingValue { flag })
}

fn parse_number<T>(value: &str, flag: &'static str) -> Result<T, CliError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.parse::<T>().map_err(|err| CliError::InvalidNumber {
        flag,
        value: value.to_owned(),
        message: err.to_string(),
    })
}
