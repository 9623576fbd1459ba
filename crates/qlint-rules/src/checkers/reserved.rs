//! Reserved rule slot.

use qlint_ast::Facts;

use crate::rule::{Issue, Rule};
use crate::state::AnalysisState;

/// A placeholder that keeps a slot in the dispatch set so new rules can
/// be added without touching the engine's contract. Always clean.
pub struct Reserved;

impl Rule for Reserved {
    fn id(&self) -> &'static str {
        "reserved"
    }

    fn category(&self) -> &'static str {
        "Reserved"
    }

    fn check(&self, _facts: &Facts, _state: &AnalysisState) -> Vec<Issue> {
        Vec::new()
    }
}
