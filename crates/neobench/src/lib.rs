//! Top-level facade crate for neobench.
//!
//! Re-exports the core data model and the runner library so users can depend on a single crate.

pub mod core {
    pub use neobench_core::*;
}

pub mod runner {
    pub use neobench_runner::*;
}
