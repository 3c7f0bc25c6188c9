//! MySQL backend (via sqlx).
//!
//! sqlx is async while `RecordStore` is not, so the store keeps the handle of
//! the runtime it connected on and blocks on it. Calls must come through
//! `db::blocking` on the multi-threaded runtime; `connect` refuses anything else.

use std::fmt;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor, Statement};
use tokio::runtime::{Handle, RuntimeFlavor};

use neobench_core::error::{NeoBenchError, Result};
use neobench_core::record::COLUMNS;
use neobench_core::Record;

use super::{create_table_sql, db_err, InsertOutcome, RecordStore};
use crate::config::schema::is_identifier;
use crate::config::DatabaseSection;

pub const DEFAULT_PORT: u16 = 3306;

/// Where to connect, without the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

impl MySqlTarget {
    /// Resolve the first address of `database.addrs` (`MYSQL_SERVICE_ADDRS`).
    pub fn from_config(cfg: &DatabaseSection) -> Result<Self> {
        let addr = cfg
            .addrs
            .split(',')
            .map(str::trim)
            .find(|a| !a.is_empty())
            .ok_or_else(|| {
                NeoBenchError::Database(
                    "no mysql address configured (database.addrs / MYSQL_SERVICE_ADDRS)".into(),
                )
            })?;

        let (host, port) = match addr.rsplit_once(':') {
            Some((h, p)) if !h.ends_with(':') => {
                let port = p.parse::<u16>().map_err(|e| {
                    NeoBenchError::Database(format!("invalid port in mysql address {addr:?}: {e}"))
                })?;
                (h, port)
            }
            _ => (addr, DEFAULT_PORT),
        };
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(NeoBenchError::Database(format!("missing host in mysql address {addr:?}")));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            user: cfg.user.clone(),
            database: cfg.name.clone(),
        })
    }

    pub fn connect_options(&self, password: &str) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(password)
            .database(&self.database)
    }
}

impl fmt::Display for MySqlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

pub struct MySqlStore {
    conn: MySqlConnection,
    table: String,
    rt: Handle,
}

impl MySqlStore {
    /// Connect to the configured server and ping it.
    pub async fn connect(cfg: &DatabaseSection) -> Result<Self> {
        let rt = Handle::current();
        if !matches!(rt.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return Err(NeoBenchError::Database(
                "mysql backend requires the multi-threaded tokio runtime".into(),
            ));
        }
        if !is_identifier(&cfg.table) {
            return Err(NeoBenchError::Database(format!("invalid table name: {:?}", cfg.table)));
        }

        let target = MySqlTarget::from_config(cfg)?;
        let mut conn = MySqlConnection::connect_with(&target.connect_options(&cfg.password))
            .await
            .map_err(db_err("connect"))?;
        conn.ping().await.map_err(db_err("ping"))?;

        tracing::info!(%target, table = %cfg.table, "connected to database");
        Ok(Self {
            conn,
            table: cfg.table.clone(),
            rt,
        })
    }

    fn exec_ignored(&mut self, sql: String, what: &'static str) {
        let conn = &mut self.conn;
        let res = self.rt.block_on(async move { conn.execute(sql.as_str()).await });
        if let Err(e) = res {
            tracing::warn!(table = %self.table, error = %e, "{what} ignored");
        }
    }
}

impl RecordStore for MySqlStore {
    fn name(&self) -> &str {
        "mysql"
    }

    fn create_table(&mut self) -> Result<()> {
        let sql = create_table_sql(&self.table);
        let conn = &mut self.conn;
        self.rt
            .block_on(async move { conn.execute(sql.as_str()).await })
            .map(|_| ())
            .map_err(db_err("create table"))
    }

    fn drop_table(&mut self) {
        let sql = format!("DROP TABLE {}", self.table);
        self.exec_ignored(sql, "drop table");
    }

    fn insert_batch(&mut self, records: &[Record]) -> Result<InsertOutcome> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            COLUMNS.join(", "),
            vec!["?"; COLUMNS.len()].join(", ")
        );
        let conn = &mut self.conn;

        let outcome = self.rt.block_on(async move {
            let mut tx = conn.begin().await.map_err(db_err("begin"))?;
            let stmt = (&mut *tx)
                .prepare(sql.as_str())
                .await
                .map_err(db_err("prepare insert"))?;

            let mut outcome = InsertOutcome {
                attempted: records.len(),
                failed: 0,
            };
            for r in records {
                let res = stmt
                    .query()
                    .bind(r.id)
                    .bind(r.name.as_str())
                    .bind(r.min_diameter)
                    .bind(r.max_diameter)
                    .bind(r.relative_velocity)
                    .bind(r.miss_distance)
                    .bind(r.orbiting_body.as_str())
                    .bind(r.is_sentry_object)
                    .bind(r.absolute_magnitude)
                    .bind(r.is_hazardous)
                    .execute(&mut *tx)
                    .await;
                if let Err(e) = res {
                    outcome.failed += 1;
                    tracing::warn!(id = r.id, error = %e, "row insert failed");
                }
            }

            tx.commit().await.map_err(db_err("commit"))?;
            Ok::<_, NeoBenchError>(outcome)
        })?;

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
        let sql = format!("SELECT * FROM {} LIMIT ?", self.table);
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let conn = &mut self.conn;
        self.rt
            .block_on(async move { sqlx::query(sql.as_str()).bind(limit).fetch_all(conn).await })
            .map(|rows| rows.len())
            .map_err(db_err("read"))
    }

    fn update_all(&mut self, value: f64) {
        let sql = format!("UPDATE {} SET relative_velocity = {}", self.table, value);
        self.exec_ignored(sql, "update");
    }

    fn delete_all(&mut self) {
        let sql = format!("DELETE FROM {}", self.table);
        self.exec_ignored(sql, "delete");
    }

    fn count_rows(&mut self) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let conn = &mut self.conn;
        let n = self
            .rt
            .block_on(async move {
                sqlx::query_scalar::<_, i64>(sql.as_str()).fetch_one(conn).await
            })
            .map_err(db_err("count"))?;
        Ok(u64::try_from(n).unwrap_or(0))
    }
}
