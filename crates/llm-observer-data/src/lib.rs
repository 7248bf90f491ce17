//! Test data and benchmarking helpers for LLM observability notebooks.
//!
//! This crate provides the small, self-contained routines the benchmark
//! notebooks call between model runs. None of them share state.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Deterministic synthetic sales data generation
//! - Timed query execution that overwrites a destination table and returns
//!   a run log
//! - Normalising arbitrary strings into valid table identifiers
//! - Flattening tagged markup text into indexed entries
//!
//! Data platforms, holiday rules, and markup parsers stay outside the crate
//! behind the [`QueryEngine`], [`HolidayCalendar`], and [`TagSearch`] traits.
//!
//! # Example
//!
//! ```
//! use llm_observer_data::{
//!     DEFAULT_MAX_TABLE_NAME_LENGTH, NoHolidays, SalesDataParams, generate_sales_data,
//!     to_valid_table_name,
//! };
//! use mockable::DefaultClock;
//!
//! let params = SalesDataParams::new(3).with_seed(42);
//! let records = generate_sales_data(&params, &NoHolidays, &DefaultClock).expect("generated");
//! let table = to_valid_table_name(Some("Sales Data (3 rows)"), DEFAULT_MAX_TABLE_NAME_LENGTH);
//!
//! assert_eq!(records.len(), 3);
//! assert_eq!(table, "sales_data_3_rows");
//! ```

mod atomic_io;
mod error;
mod generator;
mod holidays;
mod query_runner;
mod sales;
pub mod sales_data_cli;
mod settings;
mod table_name;
mod tag_index;

pub use error::{GenerationError, OutputError, SettingsError};
pub use generator::{
    DEFAULT_BASE_DEMAND, DEFAULT_DAY_RANGE, DEFAULT_SEED, SalesDataParams, generate_sales_data,
};
pub use holidays::{FixedHolidayCalendar, HolidayCalendar, NoHolidays};
pub use query_runner::{QueryEngine, QueryRunLog, ResultFrame, WriteMode, run_sample_query};
pub use sales::SalesRecord;
pub use settings::ObserverSettings;
pub use table_name::{
    DEFAULT_MAX_TABLE_NAME_LENGTH, FALLBACK_TABLE_NAME, TableName, to_valid_table_name,
};
pub use tag_index::{ElementText, TagSearch, TaggedTextEntry, index_tagged_text};
