//! Transactional batch job executor.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlbatch_core::{
    BatchJob, BatchJobExecutor, Error, ExecutePositionTracker, Result, StatementClass,
};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::{DriverRegistry, StoreConnection};

/// Runs a job's statement set inside one explicit transaction.
///
/// Each invocation owns its connection exclusively and commits exactly once
/// after the full set processes cleanly; any failure aborts the whole job
/// with nothing committed. Retry, if desired, belongs to the trigger layer.
pub struct SqlJobExecutor {
    drivers: DriverRegistry,
    statement_timeout: Option<Duration>,
}

impl SqlJobExecutor {
    pub fn new(drivers: DriverRegistry) -> Self {
        Self {
            drivers,
            statement_timeout: None,
        }
    }

    /// Bound each connect, statement, and commit call by `limit`.
    pub fn with_statement_timeout(mut self, limit: Duration) -> Self {
        self.statement_timeout = Some(limit);
        self
    }

    async fn bounded<F, T>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.statement_timeout {
            Some(limit) => match timeout(limit, fut).await {
                Ok(res) => res,
                Err(_) => Err(Error::Timeout(format!(
                    "{} exceeded {}ms",
                    what,
                    limit.as_millis()
                ))),
            },
            None => fut.await,
        }
    }

    /// Run the statement set from `start` and commit. Returns the total
    /// number of statements processed.
    async fn run_statements(
        &self,
        job: &BatchJob,
        conn: &mut Box<dyn StoreConnection>,
        start: usize,
    ) -> Result<usize> {
        conn.begin().await?;
        for (index, statement) in job.sql_statements.iter().enumerate().skip(start) {
            match StatementClass::of(&statement.text) {
                StatementClass::Read => {
                    // Reads are classified but not sent to the store.
                    debug!(job = %job.job_name, index, "skipping read statement");
                }
                StatementClass::Write => {
                    let rows = self
                        .bounded("statement", conn.execute(&statement.text))
                        .await
                        .map_err(|e| match e {
                            Error::Store(message) => Error::Statement { index, message },
                            other => other,
                        })?;
                    debug!(job = %job.job_name, index, rows, "executed statement");
                }
            }
        }
        self.bounded("commit", conn.commit()).await?;
        Ok(job.sql_statements.len())
    }
}

#[async_trait]
impl BatchJobExecutor for SqlJobExecutor {
    fn name(&self) -> &'static str {
        "sql"
    }

    async fn execute_job(
        &self,
        fire_time: DateTime<Utc>,
        job: &BatchJob,
        tracker: &mut dyn ExecutePositionTracker,
    ) -> Result<()> {
        let args = job.connection_arguments()?;
        let factory = self.drivers.resolve(&args.driver)?;
        info!(
            job = %job.job_name,
            driver = %args.driver,
            fire_time = %fire_time,
            statements = job.sql_statements.len(),
            "executing batch job"
        );

        let mut conn = self.bounded("connect", factory.connect(&args)).await?;

        let start = tracker.position(&job.job_name).map(|i| i + 1).unwrap_or(0);
        if start > 0 {
            info!(job = %job.job_name, start, "resuming after last committed statement");
        }

        let run = self.run_statements(job, &mut conn, start).await;
        let cleanup = conn.close().await;

        match (run, cleanup) {
            (Ok(total), Ok(())) => {
                tracker.clear(&job.job_name);
                info!(job = %job.job_name, statements = total, "batch job committed");
                Ok(())
            }
            (Ok(_), Err(cleanup_err)) => {
                // The commit happened; the run is complete for the tracker
                // even though the release failed.
                tracker.clear(&job.job_name);
                warn!(job = %job.job_name, error = %cleanup_err, "connection release failed after commit");
                Err(cleanup_err)
            }
            (Err(primary), Ok(())) => Err(primary),
            (Err(primary), Err(cleanup_err)) => Err(Error::CleanupFailed {
                source: Box::new(primary),
                cleanup: cleanup_err.to_string(),
            }),
        }
    }
}
