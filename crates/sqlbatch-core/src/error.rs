//! Error types for sqlbatch execution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid connection arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    #[error("connect failed: {0}")]
    Connect(String),

    /// Raw failure reported by the store backend, before the executor
    /// attributes it to a statement index.
    #[error("store error: {0}")]
    Store(String),

    #[error("statement {index} failed: {message}")]
    Statement { index: usize, message: String },

    #[error("commit failed: {0}")]
    Commit(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("cleanup failed: {0}")]
    Cleanup(String),

    /// Primary failure with a cleanup failure attached instead of dropped.
    #[error("{source} (cleanup also failed: {cleanup})")]
    CleanupFailed { source: Box<Error>, cleanup: String },
}

pub type Result<T> = std::result::Result<T, Error>;
