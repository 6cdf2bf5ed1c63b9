//! Template substitution seam.
//!
//! The assembly engine hands each SQL block's statements to a
//! `TemplateEngine` exactly once, before they are appended to the job.
//! The engine rewrites statement text in place and the caller does not
//! re-validate the result.

use chrono::{NaiveDate, Utc};

use crate::SqlStatement;

pub trait TemplateEngine: Send + Sync {
    /// Rewrite statement text in place, substituting template tokens.
    fn template_replace(&self, statements: &mut [SqlStatement]);
}

/// Leaves statement text untouched.
#[derive(Debug, Default)]
pub struct NoopTemplateEngine;

impl TemplateEngine for NoopTemplateEngine {
    fn template_replace(&self, _statements: &mut [SqlStatement]) {}
}

/// Substitutes date tokens with the current date:
/// `${yyyyMMdd}` -> `20260828`, `${yyyy-MM-dd}` -> `2026-08-28`.
#[derive(Debug, Default)]
pub struct DateTemplateEngine {
    fixed: Option<NaiveDate>,
}

impl DateTemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitute a fixed date instead of the wall clock.
    pub fn with_date(date: NaiveDate) -> Self {
        Self { fixed: Some(date) }
    }

    fn date(&self) -> NaiveDate {
        self.fixed.unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl TemplateEngine for DateTemplateEngine {
    fn template_replace(&self, statements: &mut [SqlStatement]) {
        let date = self.date();
        let compact = date.format("%Y%m%d").to_string();
        let dashed = date.format("%Y-%m-%d").to_string();
        for statement in statements {
            if statement.text.contains("${yyyyMMdd}") {
                statement.text = statement.text.replace("${yyyyMMdd}", &compact);
            }
            if statement.text.contains("${yyyy-MM-dd}") {
                statement.text = statement.text.replace("${yyyy-MM-dd}", &dashed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_tokens_are_substituted_in_place() {
        let engine = DateTemplateEngine::with_date(
            NaiveDate::from_ymd_opt(2020, 11, 20).unwrap(),
        );
        let mut statements = vec![
            SqlStatement::new("sync_orders", "DELETE FROM stats WHERE day = '${yyyy-MM-dd}'"),
            SqlStatement::new("sync_orders", "INSERT INTO stats_${yyyyMMdd} SELECT 1"),
        ];
        engine.template_replace(&mut statements);
        assert_eq!(
            statements[0].text,
            "DELETE FROM stats WHERE day = '2020-11-20'"
        );
        assert_eq!(statements[1].text, "INSERT INTO stats_20201120 SELECT 1");
    }

    #[test]
    fn test_noop_engine_leaves_text_untouched() {
        let mut statements = vec![SqlStatement::new("j", "SELECT '${yyyyMMdd}'")];
        NoopTemplateEngine.template_replace(&mut statements);
        assert_eq!(statements[0].text, "SELECT '${yyyyMMdd}'");
    }
}
