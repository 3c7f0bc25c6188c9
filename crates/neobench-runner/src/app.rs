//! Process wiring: connect, expose metrics, load the dataset, run the driver.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use neobench_core::error::{NeoBenchError, Result};

use crate::app_state::AppState;
use crate::config::{Backend, BenchConfig};
use crate::dataset;
use crate::db::{blocking, MySqlStore, RecordStore, SqliteStore};
use crate::driver::{Driver, DriverOptions, RunSummary};
use crate::obs::BenchMetrics;
use crate::router;
use crate::sampler::SysinfoProbe;

/// Bind the metrics listener and serve it on a background task.
/// Returns the bound address (useful with port 0) and the server task.
pub async fn spawn_metrics_server(state: AppState) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listen = state.cfg().metrics.listen_addr()?;
    let listener = TcpListener::bind(listen).await?;
    let local = listener.local_addr()?;
    let path = state.cfg().metrics.path.clone();
    let app = router::build_router(state);

    tracing::info!(%local, %path, "metrics endpoint listening");
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics endpoint stopped");
        }
    });
    Ok((local, task))
}

/// Full benchmark run against the configured backend.
///
/// The database is connected before the endpoint binds; a failed connect or
/// ping ends the process.
pub async fn run(cfg: BenchConfig) -> Result<()> {
    tracing::info!(backend = cfg.database.backend.as_str(), "connecting to database");
    match cfg.database.backend {
        Backend::Mysql => {
            let store = MySqlStore::connect(&cfg.database).await?;
            run_with(store, cfg).await
        }
        Backend::Sqlite => {
            let store = SqliteStore::open(&cfg.database)?;
            run_with(store, cfg).await
        }
    }
}

async fn run_with<S: RecordStore>(mut store: S, cfg: BenchConfig) -> Result<()> {
    let metrics = Arc::new(BenchMetrics::new());

    let state = AppState::new(cfg.clone(), Arc::clone(&metrics));
    let (_, server) = spawn_metrics_server(state).await?;

    tracing::info!("cleaning database");
    blocking(|| store.clean())?;

    let records = dataset::load_from_path(&cfg.dataset.path)?;

    let mut driver = Driver::new(store, SysinfoProbe::new(), metrics, DriverOptions::from(&cfg));
    let summary = driver.run(&records).await?;
    log_summary(&summary);

    if cfg.bench.exit_when_done {
        server.abort();
        return Ok(());
    }

    tracing::info!("run complete; serving metrics until interrupted");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| NeoBenchError::Internal(format!("signal handler failed: {e}")))?;
    tracing::info!("shutting down");
    server.abort();
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    let total: f64 = summary.reports.iter().map(|r| r.elapsed.as_secs_f64()).sum();
    tracing::info!(
        operations = summary.reports.len(),
        total_secs = total,
        insert_failures = summary.insert_failures,
        "run summary"
    );
}
