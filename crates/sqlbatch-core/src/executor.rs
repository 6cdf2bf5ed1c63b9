//! Executor trait and execution-progress seam.
//!
//! Executors run a job's statement set against a relational store inside one
//! explicit transaction per invocation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::{BatchJob, Result};

/// Read/write classification of a statement, by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementClass {
    Read,
    Write,
}

impl StatementClass {
    /// Classify by the leading keyword of the trimmed, case-normalized text.
    pub fn of(sql: &str) -> Self {
        match sql.trim().split_whitespace().next() {
            Some(word) if word.eq_ignore_ascii_case("SELECT") => StatementClass::Read,
            _ => StatementClass::Write,
        }
    }
}

/// Records per-job execution progress for resumable runs.
///
/// Contract: `record_commit` stores the index of the last statement covered
/// by a commit; a subsequent invocation resumes at that index plus one;
/// `clear` forgets the position once the full statement set has committed,
/// so the next fire runs from the start.
pub trait ExecutePositionTracker: Send {
    /// Index of the last committed statement for `job_name`, if any.
    fn position(&self, job_name: &str) -> Option<usize>;

    /// Record that statements up to and including `last_index` are committed.
    fn record_commit(&mut self, job_name: &str, last_index: usize);

    /// Forget the recorded position after a complete run.
    fn clear(&mut self, job_name: &str);
}

/// Process-local tracker. Durable implementations plug in behind the same
/// trait.
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    positions: HashMap<String, usize>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExecutePositionTracker for InMemoryTracker {
    fn position(&self, job_name: &str) -> Option<usize> {
        self.positions.get(job_name).copied()
    }

    fn record_commit(&mut self, job_name: &str, last_index: usize) {
        self.positions.insert(job_name.to_string(), last_index);
    }

    fn clear(&mut self, job_name: &str) {
        self.positions.remove(job_name);
    }
}

/// Trait for batch job executors.
#[async_trait]
pub trait BatchJobExecutor: Send + Sync {
    /// Name of this executor.
    fn name(&self) -> &'static str;

    /// Execute one job invocation. The caller sees either a clean success
    /// (the single commit happened) or an error (nothing committed).
    async fn execute_job(
        &self,
        fire_time: DateTime<Utc>,
        job: &BatchJob,
        tracker: &mut dyn ExecutePositionTracker,
    ) -> Result<()>;
}
