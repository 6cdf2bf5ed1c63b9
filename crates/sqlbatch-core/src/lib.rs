//! Core domain types and traits for sqlbatch.
//!
//! This crate contains:
//! - The job descriptor and its parts (entry, statements, dependencies)
//! - Connection argument extraction and validation
//! - The executor trait and position-tracker seam
//! - The template-substitution seam

pub mod error;
pub mod executor;
pub mod job;
pub mod template;

pub use error::{Error, Result};
pub use executor::{BatchJobExecutor, ExecutePositionTracker, InMemoryTracker, StatementClass};
pub use job::{
    BatchJob, ConnectionArguments, JobEntry, JobKind, JobParams, SqlStatement, StatementKind,
};
pub use template::{DateTemplateEngine, NoopTemplateEngine, TemplateEngine};
