use std::net::SocketAddr;

use neobench_core::error::{NeoBenchError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    pub version: u32,

    #[serde(default)]
    pub dataset: DatasetSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub bench: BenchSection,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            dataset: DatasetSection::default(),
            database: DatabaseSection::default(),
            metrics: MetricsSection::default(),
            bench: BenchSection::default(),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(NeoBenchError::UnsupportedVersion);
        }
        if self.dataset.path.trim().is_empty() {
            return Err(NeoBenchError::Config("dataset.path must not be empty".into()));
        }

        self.database.validate()?;
        self.metrics.validate()?;
        self.bench.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSection {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

impl Default for DatasetSection {
    fn default() -> Self {
        Self { path: default_dataset_path() }
    }
}

/// Which `RecordStore` the run is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// MySQL server reached over TCP.
    Mysql,
    /// Local SQLite file or `:memory:`.
    Sqlite,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Mysql => "mysql",
            Backend::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// SQLite file path, or `:memory:`. Only read by the sqlite backend.
    #[serde(default = "default_database_path")]
    pub path: String,

    /// MySQL service address(es), `host[:port]`, comma separated. The first one is dialled.
    #[serde(default)]
    pub addrs: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// MySQL database (schema) name.
    #[serde(default = "default_database_name")]
    pub name: String,

    #[serde(default = "default_table")]
    pub table: String,

    /// Replica count of the deployment under test. Only used as a metric label.
    #[serde(default = "default_replicas")]
    pub replicas: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_database_path(),
            addrs: String::new(),
            user: default_user(),
            password: String::new(),
            name: default_database_name(),
            table: default_table(),
            replicas: default_replicas(),
        }
    }
}

impl DatabaseSection {
    pub fn validate(&self) -> Result<()> {
        if self.backend == Backend::Sqlite && self.path.trim().is_empty() {
            return Err(NeoBenchError::Config("database.path must not be empty".into()));
        }
        if self.backend == Backend::Mysql && !is_identifier(&self.name) {
            return Err(NeoBenchError::Config(format!(
                "database.name must be a plain identifier, got {:?}",
                self.name
            )));
        }
        if !is_identifier(&self.table) {
            return Err(NeoBenchError::Config(format!(
                "database.table must be a plain identifier, got {:?}",
                self.table
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_metrics_path(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') || self.path.len() < 2 {
            return Err(NeoBenchError::Config(
                "metrics.path must start with '/' and name a route".into(),
            ));
        }
        if self.path == "/healthz" || self.path == "/readyz" {
            return Err(NeoBenchError::Config(format!(
                "metrics.path {} collides with an ops route",
                self.path
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            NeoBenchError::Config(format!("metrics.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchSection {
    /// Outer repetitions of the full three-batch pass.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    /// Samples each operation must collect before its sampler is stopped. 0 disables the wait.
    #[serde(default = "default_min_samples_per_op")]
    pub min_samples_per_op: u64,

    /// Upper bound on the wait for `min_samples_per_op`.
    #[serde(default = "default_sample_wait_timeout_ms")]
    pub sample_wait_timeout_ms: u64,

    /// Exit after the run instead of serving metrics until interrupted.
    #[serde(default)]
    pub exit_when_done: bool,
}

impl Default for BenchSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            sample_interval_ms: default_sample_interval_ms(),
            min_samples_per_op: default_min_samples_per_op(),
            sample_wait_timeout_ms: default_sample_wait_timeout_ms(),
            exit_when_done: false,
        }
    }
}

impl BenchSection {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(NeoBenchError::Config("bench.iterations must be at least 1".into()));
        }
        if !(10..=60000).contains(&self.sample_interval_ms) {
            return Err(NeoBenchError::Config(
                "bench.sample_interval_ms must be between 10 and 60000".into(),
            ));
        }
        if self.min_samples_per_op > 0 && self.sample_wait_timeout_ms < self.sample_interval_ms {
            return Err(NeoBenchError::Config(
                "bench.sample_wait_timeout_ms must be at least sample_interval_ms".into(),
            ));
        }
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`; table names are interpolated into SQL.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_dataset_path() -> String {
    "./dataset/neo.csv".into()
}
fn default_backend() -> Backend {
    Backend::Mysql
}
fn default_user() -> String {
    "root".into()
}
fn default_database_name() -> String {
    "my_database".into()
}
fn default_database_path() -> String {
    "neobench.db".into()
}
fn default_table() -> String {
    "nearest_objects".into()
}
fn default_replicas() -> String {
    "1".into()
}
fn default_listen() -> String {
    "0.0.0.0:2112".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_iterations() -> u32 {
    30
}
fn default_sample_interval_ms() -> u64 {
    100
}
fn default_min_samples_per_op() -> u64 {
    1
}
fn default_sample_wait_timeout_ms() -> u64 {
    5000
}
