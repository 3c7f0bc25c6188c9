//! Host resource sampler.
//!
//! One sampler runs per timed operation: a tokio task on a fixed interval that
//! reads CPU and memory utilisation through a `ResourceProbe` and writes them
//! into `system_cpu` / `system_memory`, labelled with the operation in flight.
//!
//! `SamplerHandle::stop` awaits the task, so once it returns no sample can land
//! under the label of the next operation.

pub mod probe;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use neobench_core::Operation;

use crate::obs::{BenchMetrics, Resource};

pub use probe::{ResourceProbe, ResourceSample, SysinfoProbe};

pub struct Sampler;

impl Sampler {
    /// Spawn a sampler task. The probe baseline is reset here and the first
    /// sample is taken one `interval` later, so every reading written under
    /// `operation` covers time after the operation began.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<P: ResourceProbe>(
        probe: Arc<Mutex<P>>,
        metrics: Arc<BenchMetrics>,
        replicas: String,
        operation: Operation,
        interval: Duration,
    ) -> SamplerHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (count_tx, count_rx) = watch::channel(0u64);

        probe.lock().unwrap_or_else(PoisonError::into_inner).reset();
        let first = Instant::now() + interval;

        let join = tokio::spawn(async move {
            tracing::debug!(%operation, "sampler started");
            let mut tick = tokio::time::interval_at(first, interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut written = 0u64;

            loop {
                tokio::select! {
                    biased;

                    // stop requested, or the handle was dropped
                    _ = &mut stop_rx => break,

                    _ = tick.tick() => {
                        let s = probe.lock().unwrap_or_else(PoisonError::into_inner).sample();
                        let labels = [("replicas", replicas.as_str()), ("operation", operation.as_str())];
                        metrics.resource(Resource::Cpu).set(&labels, s.cpu_percent);
                        metrics.resource(Resource::Memory).set(&labels, s.memory_percent);
                        written += 1;
                        count_tx.send_replace(written);
                    }
                }
            }

            tracing::debug!(%operation, samples = written, "sampler stopped");
            written
        });

        SamplerHandle {
            operation,
            stop_tx: Some(stop_tx),
            samples: count_rx,
            join,
        }
    }
}

pub struct SamplerHandle {
    operation: Operation,
    stop_tx: Option<oneshot::Sender<()>>,
    samples: watch::Receiver<u64>,
    join: JoinHandle<u64>,
}

impl SamplerHandle {
    /// Wait until at least `n` samples have been written, up to `timeout`.
    /// Returns `false` on timeout. `n == 0` returns immediately.
    pub async fn wait_for_samples(&self, n: u64, timeout: Duration) -> bool {
        if n == 0 {
            return true;
        }
        let mut rx = self.samples.clone();
        let res = tokio::time::timeout(timeout, rx.wait_for(|c| *c >= n)).await;
        matches!(res, Ok(Ok(_)))
    }

    /// Stop the task and wait for it to finish. Returns the number of samples written.
    pub async fn stop(mut self) -> u64 {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        match self.join.await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(operation = %self.operation, error = %e, "sampler task failed");
                *self.samples.borrow()
            }
        }
    }
}
