//! Job-definition parsing errors.

use sqlbatch_core::StatementKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("duplicate definition: {0}")]
    Duplicate(String),

    #[error("unknown block: {0}")]
    UnknownBlock(String),

    #[error("no parser registered for {0} blocks")]
    MissingParser(StatementKind),

    #[error("sql block appears before the job block")]
    StatementBeforeJobEntry,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
