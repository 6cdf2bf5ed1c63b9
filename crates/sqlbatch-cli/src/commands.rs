//! CLI command implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlbatch_config::BatchJobParser;
use sqlbatch_core::{BatchJob, BatchJobExecutor, DateTemplateEngine, InMemoryTracker};
use sqlbatch_executor::{DriverRegistry, PostgresFactory, SqlJobExecutor};

fn parse_file(path: &str) -> Result<BatchJob> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job definition: {}", path))?;
    let parser = BatchJobParser::new(Arc::new(DateTemplateEngine::new()));
    parser
        .parse_job(&content)
        .with_context(|| format!("Failed to parse job definition: {}", path))
}

/// Parse a job definition and print its descriptor summary.
pub fn validate(path: &str) -> Result<()> {
    let job = parse_file(path)?;
    println!("Job: {}", job.job_name);
    println!("Kind: {}", job.job_entry.job_kind);
    println!("Cron: {}", job.cron_time);
    println!("Dependencies: {}", job.dependent_job_names.len());
    println!("Statements: {}", job.sql_statements.len());
    Ok(())
}

/// Parse a job definition and execute it once, fire time = now.
pub async fn run(path: &str, statement_timeout: Option<u64>) -> Result<()> {
    let job = parse_file(path)?;

    let mut drivers = DriverRegistry::new();
    drivers.register("postgres", Arc::new(PostgresFactory::new()));

    let mut executor = SqlJobExecutor::new(drivers);
    if let Some(secs) = statement_timeout {
        executor = executor.with_statement_timeout(Duration::from_secs(secs));
    }

    let mut tracker = InMemoryTracker::new();
    executor
        .execute_job(Utc::now(), &job, &mut tracker)
        .await
        .with_context(|| format!("Job '{}' failed", job.job_name))?;

    println!("Job '{}' committed", job.job_name);
    Ok(())
}
