//! Benchmark metrics registry.
//!
//! Gauges with dynamic labels backed by `DashMap`. Labels are flattened into
//! sorted key vectors to keep deterministic ordering. Values are `f64` stored
//! as raw bits in an `AtomicU64`, so a `set` is a single atomic store and the
//! driver and sampler can write concurrently while `/metrics` renders.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use neobench_core::Operation;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// Last-write-wins gauge family.
pub struct GaugeVec {
    name: &'static str,
    help: &'static str,
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl GaugeVec {
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            map: DashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Overwrite the value for this label combination, creating it on first use.
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        let key = label_key(labels);
        match self.map.get(&key) {
            Some(slot) => slot.store(v.to_bits(), Ordering::Relaxed),
            None => {
                self.map
                    .entry(key)
                    .or_insert_with(|| AtomicU64::new(0))
                    .store(v.to_bits(), Ordering::Relaxed);
            }
        }
    }

    /// Current value, if the label combination has been written.
    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map
            .get(&label_key(labels))
            .map(|r| f64::from_bits(r.value().load(Ordering::Relaxed)))
    }

    /// Number of label combinations written so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} gauge", self.name);

        let mut rows: Vec<(String, f64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, f64::from_bits(r.value().load(Ordering::Relaxed)))
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (label_str, val) in rows {
            if label_str.is_empty() {
                let _ = writeln!(out, "{} {}", self.name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", self.name, label_str, val);
            }
        }
    }
}

/// Host resource gauge families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Cpu,
    Memory,
}

/// The full registry. Built once at startup and shared by `Arc`.
pub struct BenchMetrics {
    pub database_insert: GaugeVec,
    pub database_read: GaugeVec,
    pub database_update: GaugeVec,
    pub database_delete: GaugeVec,
    pub system_cpu: GaugeVec,
    pub system_memory: GaugeVec,
    iterations_completed: AtomicU64,
    run_complete: AtomicBool,
}

impl Default for BenchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchMetrics {
    pub fn new() -> Self {
        Self {
            database_insert: GaugeVec::new(
                "database_insert",
                "time (in seconds) taken to insert X elements on the database",
            ),
            database_read: GaugeVec::new(
                "database_read",
                "time (in seconds) taken to read X elements on the database",
            ),
            database_update: GaugeVec::new(
                "database_update",
                "time (in seconds) taken to update X elements on the database",
            ),
            database_delete: GaugeVec::new(
                "database_delete",
                "time (in seconds) taken to delete X elements on the database",
            ),
            system_cpu: GaugeVec::new(
                "system_cpu",
                "cpu consumption in percentage during a given operation",
            ),
            system_memory: GaugeVec::new(
                "system_memory",
                "memory usage in percentage during a given operation",
            ),
            iterations_completed: AtomicU64::new(0),
            run_complete: AtomicBool::new(false),
        }
    }

    /// Timing gauge for an operation (labels: `elements`, `replicas`).
    pub fn timing(&self, op: Operation) -> &GaugeVec {
        match op {
            Operation::Insert => &self.database_insert,
            Operation::Read => &self.database_read,
            Operation::Update => &self.database_update,
            Operation::Delete => &self.database_delete,
        }
    }

    /// Resource gauge (labels: `replicas`, `operation`).
    pub fn resource(&self, r: Resource) -> &GaugeVec {
        match r {
            Resource::Cpu => &self.system_cpu,
            Resource::Memory => &self.system_memory,
        }
    }

    pub fn set_iterations_completed(&self, n: u64) {
        self.iterations_completed.store(n, Ordering::Relaxed);
    }
    pub fn iterations_completed(&self) -> u64 {
        self.iterations_completed.load(Ordering::Relaxed)
    }

    /// Mark the run finished.
    pub fn set_run_complete(&self) {
        self.run_complete.store(true, Ordering::Relaxed);
    }
    /// Return whether the run has finished.
    pub fn is_run_complete(&self) -> bool {
        self.run_complete.load(Ordering::Relaxed)
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.database_insert.render(&mut out);
        self.database_read.render(&mut out);
        self.database_update.render(&mut out);
        self.database_delete.render(&mut out);
        self.system_cpu.render(&mut out);
        self.system_memory.render(&mut out);

        let _ = writeln!(
            out,
            "# HELP neobench_iterations_completed benchmark iterations finished so far\n\
             # TYPE neobench_iterations_completed gauge\n\
             neobench_iterations_completed {}",
            self.iterations_completed()
        );
        let _ = writeln!(
            out,
            "# HELP neobench_run_complete 1 once every iteration has finished\n\
             # TYPE neobench_run_complete gauge\n\
             neobench_run_complete {}",
            if self.is_run_complete() { 1 } else { 0 }
        );
        out
    }
}
