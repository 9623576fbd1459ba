//! Per-file report aggregation.
//!
//! The aggregator tags every issue with its source rule, resolves the
//! offending source line for rendering, and emits each finding through
//! `tracing` the moment it is recorded.

use serde::Serialize;
use tracing::{error, warn};

use crate::rule::{Issue, Severity};

/// An issue tagged with its rule and bound to its source line.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub rule_id: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    /// 1-based source line.
    pub line: u32,
    /// The exact text of the offending line.
    pub source_line: String,
    pub message: String,
}

impl Diagnostic {
    /// The stable human-readable rendering used in persisted reports.
    pub fn render(&self) -> String {
        format!(
            "[{}] {}\n{} at line {}: {}\n{}",
            self.rule_id, self.category, self.severity, self.line, self.source_line, self.message
        )
    }
}

/// The structured result of analyzing one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Record one issue under its rule, looking up the 1-based source
    /// line in the 0-based line array.
    pub fn record(
        &mut self,
        rule_id: &'static str,
        category: &'static str,
        issue: Issue,
        lines: &[String],
    ) {
        let source_line = lines
            .get(issue.line.saturating_sub(1) as usize)
            .map_or_else(String::new, |l| l.trim().to_string());

        let diagnostic = Diagnostic {
            rule_id,
            category,
            severity: issue.severity,
            line: issue.line,
            source_line,
            message: issue.message,
        };

        match diagnostic.severity {
            Severity::Error => {
                error!(
                    "[{}] line {}: {}",
                    diagnostic.rule_id, diagnostic.line, diagnostic.message
                );
                self.errors.push(diagnostic);
            }
            Severity::Warning => {
                warn!(
                    "[{}] line {}: {}",
                    diagnostic.rule_id, diagnostic.line, diagnostic.message
                );
                self.warnings.push(diagnostic);
            }
        }
    }

    pub fn record_all(
        &mut self,
        rule_id: &'static str,
        category: &'static str,
        issues: Vec<Issue>,
        lines: &[String],
    ) {
        for issue in issues {
            self.record(rule_id, category, issue, lines);
        }
    }
}
