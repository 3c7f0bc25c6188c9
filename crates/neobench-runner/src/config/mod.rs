//! Benchmark config loader (strict parsing + environment overrides).

pub mod schema;

use std::fs;
use std::path::Path;

use neobench_core::error::{NeoBenchError, Result};

pub use schema::{
    Backend, BenchConfig, BenchSection, DatabaseSection, DatasetSection, MetricsSection,
};

/// Config file read when `NEOBENCH_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "neobench.yaml";

/// Environment variables layered over the file.
pub const ENV_CONFIG: &str = "NEOBENCH_CONFIG";
pub const ENV_DATASET_PATH: &str = "DATASET_PATH";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";
pub const ENV_DATABASE_REPLICAS: &str = "DATABASE_REPLICAS";
pub const ENV_MYSQL_ROOT_PASSWORD: &str = "MYSQL_ROOT_PASSWORD";
pub const ENV_MYSQL_SERVICE_ADDRS: &str = "MYSQL_SERVICE_ADDRS";

pub fn load_from_file(path: &str) -> Result<BenchConfig> {
    load_from_str(&read(path)?)
}

pub fn load_from_str(s: &str) -> Result<BenchConfig> {
    let cfg = parse(s)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the process config: file (explicit, default, or built-in defaults),
/// then environment overrides, then validation.
pub fn load() -> Result<BenchConfig> {
    let mut cfg = match std::env::var(ENV_CONFIG) {
        Ok(path) => parse(&read(&path)?)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => parse(&read(DEFAULT_CONFIG_PATH)?)?,
        Err(_) => BenchConfig::default(),
    };
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}

/// Apply `DATASET_PATH`, `DATABASE_PATH`, `DATABASE_REPLICAS`, `MYSQL_ROOT_PASSWORD`
/// and `MYSQL_SERVICE_ADDRS` from `lookup`. Empty values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut BenchConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_DATASET_PATH) {
        cfg.dataset.path = v;
    }
    if let Some(v) = get(ENV_DATABASE_PATH) {
        cfg.database.path = v;
    }
    if let Some(v) = get(ENV_DATABASE_REPLICAS) {
        cfg.database.replicas = v;
    }
    if let Some(v) = get(ENV_MYSQL_ROOT_PASSWORD) {
        cfg.database.password = v;
    }
    if let Some(v) = get(ENV_MYSQL_SERVICE_ADDRS) {
        cfg.database.addrs = v;
    }
}

fn read(path: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| NeoBenchError::Config(format!("read config {path} failed: {e}")))
}

fn parse(s: &str) -> Result<BenchConfig> {
    serde_yaml::from_str(s).map_err(|e| NeoBenchError::Config(format!("invalid yaml: {e}")))
}
