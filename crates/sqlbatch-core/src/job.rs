//! Job descriptor types.
//!
//! A `BatchJob` is assembled once from a job definition, is immutable
//! thereafter, and is read (never mutated) by every execution of that job.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// The closed set of raw-block categories a job definition may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    JobEntry,
    DependentSql,
    SqlStatement,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::JobEntry => "job entry",
            StatementKind::DependentSql => "dependent sql",
            StatementKind::SqlStatement => "sql statement",
        };
        f.write_str(name)
    }
}

/// Kind of job a definition describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    Batch,
    Stream,
}

impl JobKind {
    /// Parse a job kind, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "batch" => Some(JobKind::Batch),
            "stream" => Some(JobKind::Stream),
            _ => None,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Batch => f.write_str("batch"),
            JobKind::Stream => f.write_str("stream"),
        }
    }
}

/// String parameters in source order. Lookups are by key; insertion of an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobParams {
    entries: Vec<(String, String)>,
}

impl JobParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Identity, kind, and schedule of a job, plus its free-form parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    pub job_name: String,
    pub job_kind: JobKind,
    pub params: JobParams,
}

/// One SQL text unit bound to its owning job. The text may be rewritten in
/// place by the template collaborator before execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlStatement {
    pub owner_job_name: String,
    pub text: String,
}

impl SqlStatement {
    pub fn new(owner_job_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            owner_job_name: owner_job_name.into(),
            text: text.into(),
        }
    }
}

/// The fully assembled job descriptor consumed by the executor.
///
/// Invariants: `job_name` and `cron_time` come from the single job-entry
/// block; every statement's owner equals `job_name`; dependency order is
/// preserved and duplicates are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    pub job_name: String,
    pub job_entry: JobEntry,
    pub cron_time: String,
    pub dependent_job_names: Vec<String>,
    pub sql_statements: Vec<SqlStatement>,
}

impl BatchJob {
    /// Extract and validate the connection arguments from the job params.
    pub fn connection_arguments(&self) -> Result<ConnectionArguments> {
        ConnectionArguments::from_params(&self.job_entry.params)
    }
}

/// Connection parameters resolved from job arguments.
///
/// `driver` and `url` are required and non-empty. `user` and `password` are
/// optional; the credentialed connect path is taken only when both are
/// present (both-or-neither).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionArguments {
    pub driver: String,
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ConnectionArguments {
    pub fn from_params(params: &JobParams) -> Result<Self> {
        if params.is_empty() {
            return Err(Error::InvalidArguments("job arguments are empty".into()));
        }
        let driver = require(params, "driver")?;
        let url = require(params, "url")?;
        let user = optional(params, "user");
        let password = optional(params, "password");
        Ok(Self {
            driver,
            url,
            user,
            password,
        })
    }

    /// Credentials for the credentialed connect path, only when both the
    /// user and the password are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

fn require(params: &JobParams, key: &str) -> Result<String> {
    match params.get(key) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::InvalidArguments(format!(
            "missing or empty '{}'",
            key
        ))),
    }
}

fn optional(params: &JobParams, key: &str) -> Option<String> {
    params.get(key).filter(|v| !v.is_empty()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> JobParams {
        let mut p = JobParams::new();
        for (k, v) in pairs {
            p.insert(*k, *v);
        }
        p
    }

    #[test]
    fn test_params_preserve_source_order() {
        let p = params(&[("b", "1"), ("a", "2"), ("c", "3")]);
        let keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_params_insert_replaces_existing_key() {
        let mut p = params(&[("driver", "postgres")]);
        p.insert("driver", "other");
        assert_eq!(p.get("driver"), Some("other"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_connection_arguments_require_driver_and_url() {
        let err = ConnectionArguments::from_params(&params(&[("url", "postgres://x")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));

        let err = ConnectionArguments::from_params(&params(&[("driver", "postgres")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));

        let err = ConnectionArguments::from_params(&JobParams::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[test]
    fn test_empty_required_value_is_rejected() {
        let err = ConnectionArguments::from_params(&params(&[
            ("driver", ""),
            ("url", "postgres://x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[test]
    fn test_credentials_require_both_user_and_password() {
        let args = ConnectionArguments::from_params(&params(&[
            ("driver", "postgres"),
            ("url", "postgres://x"),
            ("user", "app"),
            ("password", "secret"),
        ]))
        .unwrap();
        assert_eq!(args.credentials(), Some(("app", "secret")));

        let args = ConnectionArguments::from_params(&params(&[
            ("driver", "postgres"),
            ("url", "postgres://x"),
            ("user", "app"),
        ]))
        .unwrap();
        assert_eq!(args.credentials(), None);

        let args = ConnectionArguments::from_params(&params(&[
            ("driver", "postgres"),
            ("url", "postgres://x"),
            ("user", "app"),
            ("password", ""),
        ]))
        .unwrap();
        assert_eq!(args.credentials(), None);
    }

    #[test]
    fn test_job_kind_parses_case_insensitively() {
        assert_eq!(JobKind::parse("BATCH"), Some(JobKind::Batch));
        assert_eq!(JobKind::parse("stream"), Some(JobKind::Stream));
        assert_eq!(JobKind::parse("cron"), None);
    }
}
