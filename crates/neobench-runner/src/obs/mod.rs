//! In-process metrics.
//!
//! Gauges are stored as atomics and rendered in the Prometheus text format by
//! the `/metrics` handler. No client library is involved.

pub mod metrics;

pub use metrics::{BenchMetrics, GaugeVec, Resource};
