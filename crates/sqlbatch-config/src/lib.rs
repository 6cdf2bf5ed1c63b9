//! KDL job-definition parsing for sqlbatch.
//!
//! This crate handles parsing of batch job definitions (job.kdl):
//! statement-block classification, per-kind parsing, and assembly of the
//! validated job descriptor.

pub mod error;
pub mod job;
pub mod statement;

pub use error::{ConfigError, ConfigResult};
pub use job::BatchJobParser;
pub use statement::{BlockData, StatementParser, statement_kind};
