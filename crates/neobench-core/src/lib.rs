//! neobench core: the record schema, operation kinds, and the error surface
//! shared by the runner and its tooling.
//!
//! This crate carries no runtime, database, or HTTP dependencies so the data
//! model can be reused by loaders and tests without pulling in the runner.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here; every fallible path
//! surfaces as `NeoBenchError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod operation;
pub mod record;

pub use error::{NeoBenchError, Result, Stage};
pub use operation::Operation;
pub use record::Record;
