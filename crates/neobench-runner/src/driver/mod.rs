//! Benchmark driver.
//!
//! For every iteration and every batch size the table is cleaned, then
//! INSERT, UPDATE, READ, and DELETE are each timed under their own sampler.
//! Elapsed seconds go into the timing gauge labelled with the batch size and
//! the replica count.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use neobench_core::error::Result;
use neobench_core::{Operation, Record};

use crate::config::BenchConfig;
use crate::dataset::batch_sizes;
use crate::db::{blocking, RecordStore};
use crate::obs::BenchMetrics;
use crate::sampler::{ResourceProbe, Sampler};

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub iterations: u32,
    pub sample_interval: Duration,
    pub min_samples_per_op: u64,
    pub sample_wait_timeout: Duration,
    /// Value of the `replicas` label.
    pub replicas: String,
}

impl From<&BenchConfig> for DriverOptions {
    fn from(cfg: &BenchConfig) -> Self {
        Self {
            iterations: cfg.bench.iterations,
            sample_interval: Duration::from_millis(cfg.bench.sample_interval_ms),
            min_samples_per_op: cfg.bench.min_samples_per_op,
            sample_wait_timeout: Duration::from_millis(cfg.bench.sample_wait_timeout_ms),
            replicas: cfg.database.replicas.clone(),
        }
    }
}

/// One timed operation.
#[derive(Debug, Clone)]
pub struct OperationReport {
    pub iteration: u32,
    pub operation: Operation,
    /// Batch size passed to the operation (the `elements` label).
    pub elements: usize,
    pub elapsed: Duration,
    /// Resource samples written while the operation was measured.
    pub samples: u64,
    /// Table row count right after the operation.
    pub rows_after: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub reports: Vec<OperationReport>,
    /// Rows that failed inside committed insert batches.
    pub insert_failures: usize,
}

impl RunSummary {
    pub fn find(&self, iteration: u32, op: Operation, elements: usize) -> Option<&OperationReport> {
        self.reports
            .iter()
            .find(|r| r.iteration == iteration && r.operation == op && r.elements == elements)
    }
}

pub struct Driver<S, P> {
    store: S,
    probe: Arc<Mutex<P>>,
    metrics: Arc<BenchMetrics>,
    opts: DriverOptions,
}

impl<S: RecordStore, P: ResourceProbe> Driver<S, P> {
    pub fn new(store: S, probe: P, metrics: Arc<BenchMetrics>, opts: DriverOptions) -> Self {
        Self {
            store,
            probe: Arc::new(Mutex::new(probe)),
            metrics,
            opts,
        }
    }

    /// Run every iteration over the three batch sizes derived from `records`.
    pub async fn run(&mut self, records: &[Record]) -> Result<RunSummary> {
        let sizes = batch_sizes(records.len());
        let mut summary = RunSummary::default();

        tracing::info!(
            backend = self.store.name(),
            records = records.len(),
            batches = ?sizes,
            iterations = self.opts.iterations,
            "benchmark starting"
        );

        for iteration in 0..self.opts.iterations {
            tracing::info!(iteration, "starting iteration");
            for &n in &sizes {
                self.run_batch(iteration, &records[..n], &mut summary).await?;
            }
            self.metrics.set_iterations_completed(u64::from(iteration) + 1);
        }

        self.metrics.set_run_complete();
        tracing::info!(
            operations = summary.reports.len(),
            insert_failures = summary.insert_failures,
            "benchmark finished"
        );
        Ok(summary)
    }

    /// Clean the table, then time each operation over `batch`.
    pub async fn run_batch(
        &mut self,
        iteration: u32,
        batch: &[Record],
        summary: &mut RunSummary,
    ) -> Result<()> {
        tracing::debug!(elements = batch.len(), "cleaning table");
        blocking(|| self.store.clean())?;

        for op in Operation::ALL {
            let report = self.measure(iteration, op, batch, summary).await?;
            summary.reports.push(report);
        }
        Ok(())
    }

    async fn measure(
        &mut self,
        iteration: u32,
        op: Operation,
        batch: &[Record],
        summary: &mut RunSummary,
    ) -> Result<OperationReport> {
        let elements = batch.len();
        let sampler = Sampler::start(
            Arc::clone(&self.probe),
            Arc::clone(&self.metrics),
            self.opts.replicas.clone(),
            op,
            self.opts.sample_interval,
        );

        let started = Instant::now();
        let res = blocking(|| self.execute(op, batch));
        let elapsed = started.elapsed();

        if !sampler
            .wait_for_samples(self.opts.min_samples_per_op, self.opts.sample_wait_timeout)
            .await
        {
            tracing::warn!(%op, elements, "no resource sample observed before timeout");
        }
        let samples = sampler.stop().await;

        summary.insert_failures += res?;

        let elements_label = elements.to_string();
        self.metrics.timing(op).set(
            &[("elements", elements_label.as_str()), ("replicas", self.opts.replicas.as_str())],
            elapsed.as_secs_f64(),
        );

        let rows_after = blocking(|| self.store.count_rows())?;
        tracing::info!(
            iteration,
            %op,
            elements,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            samples,
            rows_after,
            "operation timed"
        );

        Ok(OperationReport {
            iteration,
            operation: op,
            elements,
            elapsed,
            samples,
            rows_after,
        })
    }

    /// Perform `op` against the store. Returns the failed-row count for inserts.
    fn execute(&mut self, op: Operation, batch: &[Record]) -> Result<usize> {
        match op {
            Operation::Insert => Ok(self.store.insert_batch(batch)?.failed),
            Operation::Update => {
                self.store.update_all(rand::random::<f64>() * 100.0);
                Ok(0)
            }
            Operation::Read => {
                self.store.read_n(batch.len())?;
                Ok(0)
            }
            Operation::Delete => {
                self.store.delete_all();
                Ok(0)
            }
        }
    }
}
