//! Sales data CLI for writing deterministic benchmark datasets.
//!
//! This binary delegates to `llm_observer_data::sales_data_cli` for parsing
//! and generation logic, keeping the CLI behaviour testable without spawning
//! a process.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use llm_observer_data::ObserverSettings;
use llm_observer_data::sales_data_cli::{
    CliError, ParseOutcome, parse_args, run_generation, success_message,
};
use mockable::DefaultClock;
use tracing_subscriber::{EnvFilter, fmt};

const PROGRAM_NAME: &str = "sales-data";

fn main() -> ExitCode {
    init_tracing(io::stderr().lock());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            write_line(io::stderr().lock(), &err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    match parse_args(env::args().skip(1))? {
        ParseOutcome::Help => {
            print_usage(io::stdout().lock());
            Ok(())
        }
        ParseOutcome::Options(options) => {
            let settings = ObserverSettings::load_without_cli(PROGRAM_NAME)?;
            let datasets = run_generation(&options, &settings, &DefaultClock)?;
            write_line(io::stdout().lock(), &success_message(&datasets));
            Ok(())
        }
    }
}

fn print_usage(mut out: impl Write) {
    let usage = concat!(
        "Usage: sales-data --output-dir <dir> [options]\n",
        "\n",
        "Options:\n",
        "  --output-dir <dir>   Directory for generated JSON datasets\n",
        "  --rows <n>           Rows per dataset; repeat for several datasets\n",
        "                       (defaults to LLM_OBSERVER_SAMPLE_DATASET_SIZES or 100,200)\n",
        "  --seed <n>           RNG seed (defaults to 123456789)\n",
        "  --base-demand <n>    Demand ceiling (defaults to 1000)\n",
        "  --day-range <n>      Look-back window in days (defaults to 100)\n",
        "  -h, --help           Print this help output\n",
    );
    if let Err(err) = out.write_all(usage.as_bytes()) {
        drop(err);
    }
}

/// Installs the JSON subscriber, reporting failure on `diagnostics` since no
/// subscriber is available to receive it.
fn init_tracing(diagnostics: impl Write) {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        write_line(diagnostics, &format!("tracing init failed: {err}"));
    }
}

fn write_line(mut out: impl Write, message: &str) {
    if let Err(err) = writeln!(out, "{message}") {
        drop(err);
    }
}
