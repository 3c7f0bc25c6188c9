//! Shared application state for the metrics endpoint.

use std::sync::Arc;

use crate::config::BenchConfig;
use crate::obs::BenchMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: BenchConfig,
    metrics: Arc<BenchMetrics>,
}

impl AppState {
    pub fn new(cfg: BenchConfig, metrics: Arc<BenchMetrics>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg, metrics }),
        }
    }

    pub fn cfg(&self) -> &BenchConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &BenchMetrics {
        &self.inner.metrics
    }

    pub fn is_run_complete(&self) -> bool {
        self.inner.metrics.is_run_complete()
    }
}
