//! The rule trait and issue types.

use serde::Serialize;
use std::fmt;

use qlint_ast::Facts;

use crate::state::AnalysisState;

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// One finding from one checker.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// 1-based source line.
    pub line: u32,
    /// The specific condition violated.
    pub message: String,
}

impl Issue {
    pub fn error(line: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            line,
            message: message.into(),
        }
    }

    pub fn warning(line: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            line,
            message: message.into(),
        }
    }
}

/// An independent analysis pass over the extracted facts.
///
/// Rules run after the register-size checker has established the shared
/// [`AnalysisState`]; they read the facts and the frozen state, own any
/// mutable state of their own pass, and never touch each other's.
pub trait Rule: Send + Sync {
    /// Stable identifier used to tag issues.
    fn id(&self) -> &'static str;

    /// Human-readable category for rendered diagnostics.
    fn category(&self) -> &'static str;

    /// Run the check and return every finding, in scan order.
    fn check(&self, facts: &Facts, state: &AnalysisState) -> Vec<Issue>;
}
