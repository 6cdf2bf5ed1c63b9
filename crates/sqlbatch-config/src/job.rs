//! Batch job assembly.
//!
//! Folds the ordered block sequence of a definition into one validated
//! `BatchJob`. Every required-field check is a precondition: a violation
//! aborts assembly and no partial descriptor escapes.

use kdl::KdlDocument;
use sqlbatch_core::{
    BatchJob, JobEntry, SqlStatement, StatementKind, TemplateEngine,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::statement::{
    BlockData, DependentSqlParser, JobEntryParser, SqlStatementParser, StatementParser,
    statement_kind,
};
use crate::{ConfigError, ConfigResult};

/// Parses a KDL job definition into a `BatchJob`.
///
/// The parser registry is bound once at construction and closed for
/// modification during a parse run.
pub struct BatchJobParser {
    parsers: HashMap<StatementKind, Box<dyn StatementParser>>,
    template: Arc<dyn TemplateEngine>,
}

impl BatchJobParser {
    pub fn new(template: Arc<dyn TemplateEngine>) -> Self {
        let mut parsers: HashMap<StatementKind, Box<dyn StatementParser>> = HashMap::new();
        parsers.insert(StatementKind::JobEntry, Box::new(JobEntryParser));
        parsers.insert(StatementKind::DependentSql, Box::new(DependentSqlParser));
        parsers.insert(StatementKind::SqlStatement, Box::new(SqlStatementParser));
        Self { parsers, template }
    }

    /// Parse one job definition.
    pub fn parse_job(&self, kdl: &str) -> ConfigResult<BatchJob> {
        let doc: KdlDocument = kdl.parse()?;

        // Stage one: classify each block and parse it with the registered
        // parser for its kind.
        let mut blocks = Vec::new();
        for node in doc.nodes() {
            let kind = statement_kind(node)?;
            let parser = self
                .parsers
                .get(&kind)
                .ok_or(ConfigError::MissingParser(kind))?;
            blocks.push(parser.parse(node)?);
        }

        // Stage two: fold the bundles into the descriptor, in source order.
        let mut entry: Option<JobEntry> = None;
        let mut cron_time = String::new();
        let mut dependent_job_names = Vec::new();
        let mut sql_statements = Vec::new();

        for block in blocks {
            match block {
                BlockData::JobEntry { params, kind } => {
                    if entry.is_some() {
                        return Err(ConfigError::Duplicate("job".to_string()));
                    }
                    let job_name = params.get("jobName").unwrap_or_default().to_string();
                    if job_name.is_empty() {
                        return Err(ConfigError::MissingField("jobName".to_string()));
                    }
                    let cron = params.get("cronTime").unwrap_or_default().to_string();
                    if cron.is_empty() {
                        return Err(ConfigError::MissingField("cronTime".to_string()));
                    }
                    debug!(job = %job_name, kind = %kind, "parsed job entry");
                    cron_time = cron;
                    entry = Some(JobEntry {
                        job_name,
                        job_kind: kind,
                        params,
                    });
                }
                BlockData::DependentSql { job_name } => {
                    if job_name.is_empty() {
                        return Err(ConfigError::MissingField(
                            "dependency job name".to_string(),
                        ));
                    }
                    dependent_job_names.push(job_name);
                }
                BlockData::SqlStatements { statements } => {
                    // Statements are stamped with the owning job name, so the
                    // job block must come first.
                    let owner = entry
                        .as_ref()
                        .map(|e| e.job_name.clone())
                        .ok_or(ConfigError::StatementBeforeJobEntry)?;
                    let mut stamped: Vec<SqlStatement> = statements
                        .into_iter()
                        .map(|text| SqlStatement::new(owner.clone(), text))
                        .collect();
                    self.template.template_replace(&mut stamped);
                    sql_statements.extend(stamped);
                }
            }
        }

        let entry = entry.ok_or_else(|| ConfigError::MissingField("job".to_string()))?;
        debug!(
            job = %entry.job_name,
            dependencies = dependent_job_names.len(),
            statements = sql_statements.len(),
            "assembled batch job"
        );
        Ok(BatchJob {
            job_name: entry.job_name.clone(),
            job_entry: entry,
            cron_time,
            dependent_job_names,
            sql_statements,
        })
    }
}
