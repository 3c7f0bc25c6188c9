//! neobench runner library entry.
//!
//! Wires the dataset loader, the database gateway, the metrics registry, the
//! resource sampler, and the driver into one benchmark run, plus the HTTP
//! endpoint that exposes the registry. Consumed by the binary (`main.rs`) and
//! by integration tests.

pub mod app;
pub mod app_state;
pub mod config;
pub mod dataset;
pub mod db;
pub mod driver;
pub mod obs;
pub mod ops;
pub mod router;
pub mod sampler;
