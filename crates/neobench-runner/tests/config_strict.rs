#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use neobench_core::{NeoBenchError, Stage};
use neobench_runner::config::{self, Backend, BenchConfig};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
database:
  path: ":memory:"
  tabel: "nearest_objects" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.stage(), Stage::Config);
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.dataset.path, "./dataset/neo.csv");
    assert_eq!(cfg.database.backend, Backend::Mysql);
    assert_eq!(cfg.database.user, "root");
    assert_eq!(cfg.database.name, "my_database");
    assert!(cfg.database.addrs.is_empty());
    assert_eq!(cfg.database.table, "nearest_objects");
    assert_eq!(cfg.database.replicas, "1");
    assert_eq!(cfg.metrics.listen, "0.0.0.0:2112");
    assert_eq!(cfg.metrics.path, "/metrics");
    assert_eq!(cfg.bench.iterations, 30);
    assert_eq!(cfg.bench.sample_interval_ms, 100);
    assert_eq!(cfg.bench.min_samples_per_op, 1);
    assert_eq!(cfg.bench.sample_wait_timeout_ms, 5000);
    assert!(!cfg.bench.exit_when_done);
}

#[test]
fn full_config_round_trips_values() {
    let ok = r#"
version: 1
dataset:
  path: "/data/neo.csv"
database:
  backend: sqlite
  path: ":memory:"
  table: "neo_bench"
  replicas: "3"
metrics:
  listen: "127.0.0.1:9100"
  path: "/prom"
bench:
  iterations: 2
  sample_interval_ms: 50
  min_samples_per_op: 0
  sample_wait_timeout_ms: 10
  exit_when_done: true
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.database.backend, Backend::Sqlite);
    assert_eq!(cfg.database.table, "neo_bench");
    assert_eq!(cfg.database.replicas, "3");
    assert_eq!(cfg.metrics.listen_addr().unwrap().port(), 9100);
    assert_eq!(cfg.bench.iterations, 2);
    // timeout below the interval is fine when the wait is disabled
    assert_eq!(cfg.bench.min_samples_per_op, 0);
    assert!(cfg.bench.exit_when_done);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(matches!(err, NeoBenchError::UnsupportedVersion));
}

#[test]
fn rejects_out_of_range_values() {
    let cases = [
        "version: 1\nbench: { iterations: 0 }\n",
        "version: 1\nbench: { sample_interval_ms: 1 }\n",
        "version: 1\nbench: { sample_interval_ms: 200, sample_wait_timeout_ms: 100 }\n",
        "version: 1\ndatabase: { table: \"neo; DROP TABLE x\" }\n",
        "version: 1\nmetrics: { listen: \"not-an-addr\" }\n",
        "version: 1\nmetrics: { path: \"metrics\" }\n",
        "version: 1\nmetrics: { path: \"/healthz\" }\n",
        "version: 1\ndataset: { path: \"\" }\n",
        "version: 1\ndatabase: { backend: postgres }\n",
        "version: 1\ndatabase: { name: \"my-db\" }\n",
        "version: 1\ndatabase: { backend: sqlite, path: \"\" }\n",
    ];
    for bad in cases {
        let err = config::load_from_str(bad).expect_err(bad);
        assert!(matches!(err, NeoBenchError::Config(_)), "{bad}: {err}");
    }
}

#[test]
fn env_overrides_apply_and_skip_empty_values() {
    let mut cfg = BenchConfig::default();
    config::apply_env_overrides(&mut cfg, |k| match k {
        "DATASET_PATH" => Some("/tmp/neo.csv".into()),
        "DATABASE_PATH" => Some("   ".into()),
        "DATABASE_REPLICAS" => Some("5".into()),
        "MYSQL_ROOT_PASSWORD" => Some("s3cret".into()),
        "MYSQL_SERVICE_ADDRS" => Some("mysql-0.mysql:3306,mysql-1.mysql:3306".into()),
        _ => None,
    });
    assert_eq!(cfg.dataset.path, "/tmp/neo.csv");
    assert_eq!(cfg.database.path, "neobench.db");
    assert_eq!(cfg.database.replicas, "5");
    assert_eq!(cfg.database.password, "s3cret");
    assert_eq!(cfg.database.addrs, "mysql-0.mysql:3306,mysql-1.mysql:3306");
    cfg.validate().expect("still valid");
}

#[test]
fn empty_mysql_env_keeps_file_values() {
    let mut cfg = config::load_from_str(
        "version: 1\ndatabase: { addrs: \"db:3307\", password: \"from-file\" }\n",
    )
    .expect("must parse");
    config::apply_env_overrides(&mut cfg, |k| match k {
        "MYSQL_ROOT_PASSWORD" | "MYSQL_SERVICE_ADDRS" => Some(String::new()),
        _ => None,
    });
    assert_eq!(cfg.database.addrs, "db:3307");
    assert_eq!(cfg.database.password, "from-file");
}

#[test]
fn missing_file_is_a_config_error() {
    let err = config::load_from_file("/nonexistent/neobench.yaml").expect_err("must fail");
    assert_eq!(err.stage(), Stage::Config);
}
