//! SQLite backend (via rusqlite).

use rusqlite::{params, Connection};

use neobench_core::error::{NeoBenchError, Result};
use neobench_core::record::COLUMNS;
use neobench_core::Record;

use super::{create_table_sql, db_err, InsertOutcome, RecordStore};
use crate::config::schema::is_identifier;
use crate::config::DatabaseSection;

pub struct SqliteStore {
    conn: Connection,
    table: String,
}

impl SqliteStore {
    /// Open the configured database and ping it.
    pub fn open(cfg: &DatabaseSection) -> Result<Self> {
        let conn = if cfg.path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(&cfg.path)
        }
        .map_err(db_err("open"))?;

        let store = Self::with_connection(conn, &cfg.table)?;
        tracing::info!(path = %cfg.path, table = %store.table(), "connected to database");
        Ok(store)
    }

    pub fn open_in_memory(table: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err("open"))?;
        Self::with_connection(conn, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self> {
        if !is_identifier(table) {
            return Err(NeoBenchError::Database(format!("invalid table name: {table:?}")));
        }
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))
            .map_err(db_err("ping"))?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Underlying connection, for ad hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn create_table(&mut self) -> Result<()> {
        let sql = create_table_sql(&self.table);
        self.conn.execute_batch(&sql).map_err(db_err("create table"))
    }

    fn drop_table(&mut self) {
        let sql = format!("DROP TABLE {}", self.table);
        if let Err(e) = self.conn.execute_batch(&sql) {
            tracing::warn!(table = %self.table, error = %e, "drop table ignored");
        }
    }

    fn insert_batch(&mut self, records: &[Record]) -> Result<InsertOutcome> {
        let placeholders = (1..=COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            COLUMNS.join(", "),
            placeholders
        );

        let tx = self.conn.transaction().map_err(db_err("begin"))?;
        let mut outcome = InsertOutcome {
            attempted: records.len(),
            failed: 0,
        };
        {
            let mut stmt = tx.prepare(&sql).map_err(db_err("prepare insert"))?;
            for r in records {
                let res = stmt.execute(params![
                    r.id,
                    r.name,
                    r.min_diameter,
                    r.max_diameter,
                    r.relative_velocity,
                    r.miss_distance,
                    r.orbiting_body,
                    r.is_sentry_object,
                    f64::from(r.absolute_magnitude),
                    r.is_hazardous,
                ]);
                if let Err(e) = res {
                    outcome.failed += 1;
                    tracing::warn!(id = r.id, error = %e, "row insert failed");
                }
            }
        }
        tx.commit().map_err(db_err("commit"))?;

        if outcome.failed > 0 {
            tracing::warn!(
                attempted = outcome.attempted,
                failed = outcome.failed,
                "batch insert committed with failed rows"
            );
        }
        Ok(outcome)
    }

    fn read_n(&mut self, n: usize) -> Result<usize> {
        let sql = format!("SELECT * FROM {} LIMIT ?1", self.table);
        let limit = i64::try_from(n).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(&sql).map_err(db_err("prepare read"))?;
        let mut rows = stmt.query([limit]).map_err(db_err("read"))?;
        let mut stepped = 0;
        while rows.next().map_err(db_err("read"))?.is_some() {
            stepped += 1;
        }
        Ok(stepped)
    }

    fn update_all(&mut self, value: f64) {
        let sql = format!("UPDATE {} SET relative_velocity = {}", self.table, value);
        if let Err(e) = self.conn.execute(&sql, []) {
            tracing::warn!(table = %self.table, error = %e, "update ignored");
        }
    }

    fn delete_all(&mut self) {
        let sql = format!("DELETE FROM {}", self.table);
        if let Err(e) = self.conn.execute(&sql, []) {
            tracing::warn!(table = %self.table, error = %e, "delete ignored");
        }
    }

    fn count_rows(&mut self) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let n = self
            .conn
            .query_row(&sql, [], |r| r.get::<_, i64>(0))
            .map_err(db_err("count"))?;
        Ok(u64::try_from(n).unwrap_or(0))
    }
}
