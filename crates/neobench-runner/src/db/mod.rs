//! Database gateway.
//!
//! `RecordStore` is the seam between the driver and a concrete backend. Errors
//! fall in two classes: fatal ones are returned as `Err` (connect, create,
//! begin/prepare/commit, read) and ignored ones are logged at `warn` and
//! swallowed (drop, per-row insert, update, delete).

pub mod mysql;
pub mod sqlite;

use tokio::runtime::{Handle, RuntimeFlavor};

use neobench_core::error::{NeoBenchError, Result};
use neobench_core::Record;

pub use mysql::{MySqlStore, MySqlTarget};
pub use sqlite::SqliteStore;

pub(crate) fn db_err<E: std::fmt::Display>(ctx: &'static str) -> impl FnOnce(E) -> NeoBenchError {
    move |e| NeoBenchError::Database(format!("{ctx}: {e}"))
}

/// Table DDL shared by every backend.
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE {table} (
            id INT,
            name VARCHAR(255),
            est_diameter_min DOUBLE,
            est_diameter_max DOUBLE,
            relative_velocity DOUBLE,
            miss_distance DOUBLE,
            orbiting_body VARCHAR(255),
            sentry_object BOOLEAN,
            absolute_magnitude FLOAT,
            hazardous BOOLEAN
        )"
    )
}

/// Run a blocking store call without starving the sampler and endpoint
/// tasks. Falls back to a plain call outside a multi-threaded runtime.
pub fn blocking<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current() {
        Ok(h) if matches!(h.runtime_flavor(), RuntimeFlavor::MultiThread) => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Result of one batch insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Rows handed to the statement.
    pub attempted: usize,
    /// Rows whose execution failed inside the transaction.
    pub failed: usize,
}

impl InsertOutcome {
    pub fn inserted(&self) -> usize {
        self.attempted - self.failed
    }
}

/// Synchronous store interface. Callers on a tokio runtime go through [`blocking`].
pub trait RecordStore: Send {
    /// Backend name for logs.
    fn name(&self) -> &str;

    fn create_table(&mut self) -> Result<()>;

    /// Drop the table. Failures (including "no such table") are ignored.
    fn drop_table(&mut self);

    /// Drop then create, leaving an empty table.
    fn clean(&mut self) -> Result<()> {
        self.drop_table();
        self.create_table()
    }

    fn insert_batch(&mut self, records: &[Record]) -> Result<InsertOutcome>;

    /// Read up to `n` rows and discard them. Returns how many rows were stepped.
    fn read_n(&mut self, n: usize) -> Result<usize>;

    /// Set `relative_velocity` on every row. Failures are ignored.
    fn update_all(&mut self, value: f64);

    /// Empty the table. Failures are ignored.
    fn delete_all(&mut self);

    fn count_rows(&mut self) -> Result<u64>;
}
