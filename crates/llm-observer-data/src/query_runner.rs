//! Timed query execution with overwrite persistence.
//!
//! The runner executes SQL through a [`QueryEngine`], overwrites the
//! destination table with the result, and returns a [`QueryRunLog`] that the
//! benchmark notebooks append to their run history. Engine failures are
//! returned unchanged; nothing is retried and no partial log is produced.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::table_name::TableName;

/// How a result set is written to its destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Replace the table contents.
    Overwrite,
    /// Add rows to the existing table.
    Append,
}

/// A materialised query result.
pub trait ResultFrame {
    /// Error raised by the underlying engine.
    type Error;

    /// Persists the result to `name` using `mode`.
    ///
    /// # Errors
    ///
    /// Returns the engine error if the write fails.
    fn save_as_table(&self, name: &TableName, mode: WriteMode) -> Result<(), Self::Error>;

    /// Counts the rows in the result.
    ///
    /// # Errors
    ///
    /// Returns the engine error if counting fails.
    fn count(&self) -> Result<u64, Self::Error>;

    /// Returns the number of columns in the result.
    fn column_count(&self) -> usize;
}

/// An engine that turns SQL text into a [`ResultFrame`].
pub trait QueryEngine {
    /// Error raised by the engine.
    type Error;
    /// Result type produced by [`QueryEngine::sql`].
    type Frame: ResultFrame<Error = Self::Error>;

    /// Executes `sql`.
    ///
    /// # Errors
    ///
    /// Returns the engine error if the query cannot be executed.
    fn sql(&self, sql: &str) -> Result<Self::Frame, Self::Error>;
}

/// Execution log for one query run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRunLog {
    /// Unique run identifier (32 lowercase hex digits).
    pub run_id: String,
    /// Destination table as `catalog.schema.table`.
    pub output_table: String,
    /// Rows in the persisted result.
    pub n_rows: u64,
    /// Columns in the persisted result.
    pub n_columns: usize,
    /// When execution started.
    pub start_time: DateTime<Utc>,
    /// When the write finished.
    pub end_time: DateTime<Utc>,
    /// `end_time - start_time` in seconds.
    pub elapsed_time: f64,
    /// The executed SQL text.
    pub sql: String,
}

/// Runs `sql`, overwrites `output_table` with the result, and logs the run.
///
/// The timed span covers execution and the write; counting rows happens
/// afterwards and is not included in `elapsed_time`.
///
/// # Errors
///
/// Returns the engine's error unchanged if execution, the write, or the row
/// count fails.
pub fn run_sample_query<E>(
    engine: &E,
    clock: &dyn Clock,
    sql: &str,
    output_table: &TableName,
) -> Result<QueryRunLog, E::Error>
where
    E: QueryEngine,
{
    let start_time = clock.utc();
    let frame = engine.sql(sql)?;
    frame.save_as_table(output_table, WriteMode::Overwrite)?;
    let end_time = clock.utc();
    info!(output_table = %output_table, "query results written to table");

    let n_rows = frame.count()?;
    let n_columns = frame.column_count();
    let elapsed_time = (end_time - start_time)
        .to_std()
        .map_or(0.0, |elapsed| elapsed.as_secs_f64());

    Ok(QueryRunLog {
        run_id: Uuid::new_v4().simple().to_string(),
        output_table: output_table.to_string(),
        n_rows,
        n_columns,
        start_time,
        end_time,
        elapsed_time,
        sql: sql.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    //! Exercises timing, persistence mode, and error propagation with mocked
    //! engines.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{Local, TimeDelta, TimeZone};
    use mockall::mock;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct EngineFailure(&'static str);

    mock! {
        Frame {}
        impl ResultFrame for Frame {
            type Error = EngineFailure;
            fn save_as_table(&self, name: &TableName, mode: WriteMode) -> Result<(), EngineFailure>;
            fn count(&self) -> Result<u64, EngineFailure>;
            fn column_count(&self) -> usize;
        }
    }

    mock! {
        Engine {}
        impl QueryEngine for Engine {
            type Error = EngineFailure;
            type Frame = MockFrame;
            fn sql(&self, sql: &str) -> Result<MockFrame, EngineFailure>;
        }
    }

    /// Clock returning queued instants, then repeating the last one.
    struct SteppingClock {
        instants: Mutex<VecDeque<DateTime<Utc>>>,
    }

    impl SteppingClock {
        fn new(instants: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
            Self {
                instants: Mutex::new(instants.into_iter().collect()),
            }
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut instants = self.instants.lock().expect("clock lock");
            if instants.len() > 1 {
                instants.pop_front().expect("queued instant")
            } else {
                *instants.front().expect("queued instant")
            }
        }
    }

    fn instant(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid timestamp")
            + TimeDelta::seconds(seconds)
    }

    #[fixture]
    fn table() -> TableName {
        TableName::new("llm_observer", "default", "sonnet_100")
    }

    fn frame_with_counts(table: &TableName, rows: u64, columns: usize) -> MockFrame {
        let mut frame = MockFrame::new();
        frame
            .expect_save_as_table()
            .with(eq(table.clone()), eq(WriteMode::Overwrite))
            .times(1)
            .returning(|_, _| Ok(()));
        frame.expect_count().times(1).returning(move || Ok(rows));
        frame.expect_column_count().return_const(columns);
        frame
    }

    fn engine_returning(frame: MockFrame) -> MockEngine {
        let mut engine = MockEngine::new();
        engine
            .expect_sql()
            .times(1)
            .return_once(move |_| Ok(frame));
        engine
    }

    #[rstest]
    fn logs_successful_run(table: TableName) {
        let engine = engine_returning(frame_with_counts(&table, 42, 9));
        let clock = SteppingClock::new([instant(0), instant(3)]);
        let sql = "SELECT * FROM sales";

        let log = run_sample_query(&engine, &clock, sql, &table).expect("run succeeds");

        assert_eq!(log.output_table, "llm_observer.default.sonnet_100");
        assert_eq!(log.n_rows, 42);
        assert_eq!(log.n_columns, 9);
        assert_eq!(log.start_time, instant(0));
        assert_eq!(log.end_time, instant(3));
        assert_eq!(Duration::from_secs_f64(log.elapsed_time), Duration::from_secs(3));
        assert_eq!(log.sql, sql);
    }

    #[rstest]
    fn run_ids_are_unique_hex(table: TableName) {
        let clock = SteppingClock::new([instant(0)]);
        let first = run_sample_query(
            &engine_returning(frame_with_counts(&table, 1, 1)),
            &clock,
            "SELECT 1",
            &table,
        )
        .expect("run succeeds");
        let second = run_sample_query(
            &engine_returning(frame_with_counts(&table, 1, 1)),
            &clock,
            "SELECT 1",
            &table,
        )
        .expect("run succeeds");

        assert_ne!(first.run_id, second.run_id);
        assert_eq!(first.run_id.len(), 32);
        assert!(first.run_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn backwards_clock_clamps_elapsed_time(table: TableName) {
        let engine = engine_returning(frame_with_counts(&table, 0, 0));
        let clock = SteppingClock::new([instant(10), instant(5)]);

        let log = run_sample_query(&engine, &clock, "SELECT 1", &table).expect("run succeeds");

        assert!(log.elapsed_time >= 0.0);
    }

    #[rstest]
    fn execution_failure_propagates(table: TableName) {
        let mut engine = MockEngine::new();
        engine
            .expect_sql()
            .returning(|_| Err(EngineFailure("syntax error")));
        let clock = SteppingClock::new([instant(0)]);

        let err = run_sample_query(&engine, &clock, "SELEC", &table).expect_err("run fails");

        assert_eq!(err, EngineFailure("syntax error"));
    }

    #[rstest]
    fn write_failure_propagates_before_counting(table: TableName) {
        let mut frame = MockFrame::new();
        frame
            .expect_save_as_table()
            .returning(|_, _| Err(EngineFailure("permission denied")));
        frame.expect_count().never();
        let engine = engine_returning(frame);
        let clock = SteppingClock::new([instant(0)]);

        let err = run_sample_query(&engine, &clock, "SELECT 1", &table).expect_err("run fails");

        assert_eq!(err, EngineFailure("permission denied"));
    }

    #[rstest]
    fn count_failure_propagates(table: TableName) {
        let mut frame = MockFrame::new();
        frame.expect_save_as_table().returning(|_, _| Ok(()));
        frame
            .expect_count()
            .returning(|| Err(EngineFailure("count failed")));
        let engine = engine_returning(frame);
        let clock = SteppingClock::new([instant(0)]);

        let err = run_sample_query(&engine, &clock, "SELECT 1", &table).expect_err("run fails");

        assert_eq!(err, EngineFailure("count failed"));
    }

    #[test]
    fn run_log_serializes_with_column_names() {
        let log = QueryRunLog {
            run_id: "0".repeat(32),
            output_table: "c.s.t".to_owned(),
            n_rows: 1,
            n_columns: 2,
            start_time: instant(0),
            end_time: instant(1),
            elapsed_time: 1.0,
            sql: "SELECT 1".to_owned(),
        };
        let json = serde_json::to_string(&log).expect("serialize");
        for column in ["run_id", "output_table", "n_rows", "n_columns", "elapsed_time"] {
            assert!(json.contains(column), "missing {column}");
        }
    }
}
