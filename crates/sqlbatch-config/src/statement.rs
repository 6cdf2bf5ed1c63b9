//! Per-kind statement block parsers.
//!
//! Each top-level node of a job definition is one statement block. A block's
//! kind comes from its node name; a parser for that kind turns the node into
//! a kind-specific bundle. New kinds are added by registering a new parser,
//! not by editing the assembly fold.

use kdl::KdlNode;
use sqlbatch_core::{JobKind, JobParams, StatementKind};

use crate::{ConfigError, ConfigResult};

/// Kind-specific bundle produced by one statement parser.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    JobEntry { params: JobParams, kind: JobKind },
    DependentSql { job_name: String },
    SqlStatements { statements: Vec<String> },
}

/// Classify a top-level block by its node name.
///
/// Unrecognized names fail fast instead of being skipped; a silent drop
/// would mask a malformed definition.
pub fn statement_kind(node: &KdlNode) -> ConfigResult<StatementKind> {
    match node.name().value() {
        "job" => Ok(StatementKind::JobEntry),
        "depends-on" => Ok(StatementKind::DependentSql),
        "sql" => Ok(StatementKind::SqlStatement),
        other => Err(ConfigError::UnknownBlock(other.to_string())),
    }
}

/// Parses one raw block of its kind into a bundle of named fields.
pub trait StatementParser: Send + Sync {
    fn parse(&self, node: &KdlNode) -> ConfigResult<BlockData>;
}

/// Parser for `job` blocks.
///
/// The job name and cron expression land in the params bundle under
/// `jobName` and `cronTime`, alongside the free-form `param` children.
pub struct JobEntryParser;

impl StatementParser for JobEntryParser {
    fn parse(&self, node: &KdlNode) -> ConfigResult<BlockData> {
        let name = get_first_string_arg(node)
            .ok_or_else(|| ConfigError::MissingField("job name".to_string()))?;
        let kind_str = get_string_prop(node, "kind")
            .ok_or_else(|| ConfigError::MissingField("job kind".to_string()))?;
        let kind = JobKind::parse(&kind_str).ok_or_else(|| ConfigError::InvalidValue {
            field: "kind".to_string(),
            message: format!("unknown job kind: {}", kind_str),
        })?;

        let mut params = JobParams::new();
        params.insert("jobName", name);

        if let Some(children) = node.children() {
            for child in children.nodes() {
                match child.name().value() {
                    "cron" => {
                        if let Some(cron) = get_first_string_arg(child) {
                            params.insert("cronTime", cron);
                        }
                    }
                    "param" => {
                        let args = get_all_string_args(child);
                        if args.len() != 2 {
                            return Err(ConfigError::InvalidValue {
                                field: "param".to_string(),
                                message: "expected a key and a value".to_string(),
                            });
                        }
                        let mut args = args.into_iter();
                        let key = args.next().unwrap_or_default();
                        let value = args.next().unwrap_or_default();
                        params.insert(key, value);
                    }
                    other => {
                        return Err(ConfigError::InvalidValue {
                            field: "job".to_string(),
                            message: format!("unexpected child '{}'", other),
                        });
                    }
                }
            }
        }

        Ok(BlockData::JobEntry { params, kind })
    }
}

/// Parser for `depends-on` blocks.
pub struct DependentSqlParser;

impl StatementParser for DependentSqlParser {
    fn parse(&self, node: &KdlNode) -> ConfigResult<BlockData> {
        let job_name = get_first_string_arg(node)
            .ok_or_else(|| ConfigError::MissingField("dependency job name".to_string()))?;
        Ok(BlockData::DependentSql { job_name })
    }
}

/// Parser for `sql` blocks. The block itself is the required key; an empty
/// statement list is legal.
pub struct SqlStatementParser;

impl StatementParser for SqlStatementParser {
    fn parse(&self, node: &KdlNode) -> ConfigResult<BlockData> {
        let mut statements = Vec::new();
        if let Some(children) = node.children() {
            for child in children.nodes() {
                if child.name().value() != "statement" {
                    return Err(ConfigError::InvalidValue {
                        field: "sql".to_string(),
                        message: format!("unexpected child '{}'", child.name().value()),
                    });
                }
                let text = get_first_string_arg(child)
                    .ok_or_else(|| ConfigError::MissingField("statement text".to_string()))?;
                statements.push(text);
            }
        }
        Ok(BlockData::SqlStatements { statements })
    }
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}

fn get_string_prop(node: &KdlNode, name: &str) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}
