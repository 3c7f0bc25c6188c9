//! neobench: time batched CRUD against a database and export the timings
//! alongside host CPU/memory over a Prometheus endpoint.
//!
//! Any fatal error (config, dataset, connect, DDL, transaction) is logged and
//! the process exits with status 1.

use tracing_subscriber::{fmt, EnvFilter};

use neobench_runner::{app, config};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let result = match config::load() {
        Ok(cfg) => app::run(cfg).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(stage = e.stage().as_str(), error = %e, "fatal");
        std::process::exit(1);
    }
}
