//! The rule engine: ordered establishment, parallel fan-out, fan-in.

use std::sync::Arc;

use tracing::{debug, error, info};

use qlint_ast::Facts;

use crate::checkers::{DuplicateIndex, MeasurementOrder, RegisterSize, Reserved};
use crate::report::Report;
use crate::rule::Rule;
use crate::state::AnalysisState;

/// Runs the checkers over one file's facts.
///
/// The register-size checker always runs first, to completion, on the
/// calling task: it is the sole writer of the declared qubit count the
/// other rules read. The remaining rules then fan out as one task each
/// over the frozen facts and state, and their results are gathered in a
/// fixed order so reports are deterministic regardless of task timing.
pub struct RuleEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleEngine {
    /// Engine with the built-in rule set.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Arc::new(MeasurementOrder),
                Arc::new(DuplicateIndex),
                Arc::new(Reserved),
            ],
        }
    }

    /// Add a rule to the parallel set.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Total number of rules, including the ordered register-size pass.
    pub fn num_rules(&self) -> usize {
        self.rules.len() + 1
    }

    /// Analyze one file's facts against its source lines.
    ///
    /// State is constructed fresh here on every call: nothing leaks
    /// between files.
    pub async fn analyze(&self, facts: Facts, lines: &[String]) -> Report {
        let mut report = Report::new();
        let mut state = AnalysisState::new();

        let register = RegisterSize;
        debug!(
            "running '{}' ahead of {} parallel rules",
            register.id(),
            self.rules.len()
        );
        let issues = register.establish(&facts, &mut state);
        report.record_all(register.id(), register.category(), issues, lines);

        // Freeze: from here on the facts and state are only read.
        let facts = Arc::new(facts);
        let state = Arc::new(state);

        let mut handles = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let id = rule.id();
            let category = rule.category();
            let rule = Arc::clone(rule);
            let facts = Arc::clone(&facts);
            let state = Arc::clone(&state);
            let handle = tokio::spawn(async move { rule.check(&facts, &state) });
            handles.push((id, category, handle));
        }

        for (id, category, handle) in handles {
            match handle.await {
                Ok(issues) => report.record_all(id, category, issues, lines),
                Err(e) => error!("rule '{id}' aborted: {e}"),
            }
        }

        info!(
            "analysis complete: {} errors, {} warnings",
            report.errors.len(),
            report.warnings.len()
        );
        report
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
