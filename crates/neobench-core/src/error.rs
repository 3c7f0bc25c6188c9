//! Shared error type across neobench crates.

use thiserror::Error;

/// Stage of the benchmark a fatal error came from (stable log tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Configuration load or validation.
    Config,
    /// Dataset file open / parse.
    Dataset,
    /// Database connect, DDL, or transaction handling.
    Database,
    /// Filesystem or socket I/O outside the dataset.
    Io,
    /// Anything else.
    Internal,
}

impl Stage {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Config => "config",
            Stage::Dataset => "dataset",
            Stage::Database => "database",
            Stage::Io => "io",
            Stage::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, NeoBenchError>;

/// Unified error type used by core and runner.
#[derive(Debug, Error)]
pub enum NeoBenchError {
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("dataset: {0}")]
    Dataset(String),
    #[error("database: {0}")]
    Database(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl NeoBenchError {
    /// Map an error to the stage that produced it.
    pub fn stage(&self) -> Stage {
        match self {
            NeoBenchError::Config(_) | NeoBenchError::UnsupportedVersion => Stage::Config,
            NeoBenchError::Dataset(_) => Stage::Dataset,
            NeoBenchError::Database(_) => Stage::Database,
            NeoBenchError::Io(_) => Stage::Io,
            NeoBenchError::Internal(_) => Stage::Internal,
        }
    }
}
