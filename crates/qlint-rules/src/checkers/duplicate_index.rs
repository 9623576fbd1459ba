//! Duplicate-index checking: control and target qubits must be distinct.

use qlint_ast::Facts;

use crate::chain::split;
use crate::gates::is_bare_gate;
use crate::resolve::{ResolvedValue, Resolver, flatten};
use crate::rule::{Issue, Rule};
use crate::state::AnalysisState;

/// Flags gate applications whose flattened operands repeat a qubit
/// index, and `on(...)` calls carrying more than the two argument groups
/// (targets, controls) the fluent API defines.
pub struct DuplicateIndex;

impl Rule for DuplicateIndex {
    fn id(&self) -> &'static str {
        "duplicate-index"
    }

    fn category(&self) -> &'static str {
        "Duplicate Qubit Index"
    }

    fn check(&self, facts: &Facts, _state: &AnalysisState) -> Vec<Issue> {
        let resolver = Resolver::new(facts);
        let mut issues = Vec::new();

        for fact in &facts.calls {
            for segment in split(&fact.call) {
                let Some(args) = &segment.args else {
                    continue;
                };

                if segment.name == "on" {
                    if args.positional.len() + args.keywords.len() > 2 {
                        issues.push(Issue::error(
                            fact.line,
                            "'on' supplies more than two argument groups",
                        ));
                    }
                    let flat = flatten(&resolver.resolve_segment(&segment));
                    self.check_distinct(&flat, fact.line, &mut issues);
                } else if is_bare_gate(&segment.name) {
                    let flat = flatten(&resolver.resolve_segment(&segment));
                    if !flat.is_empty() {
                        self.check_distinct(&flat, fact.line, &mut issues);
                    }
                }
            }
        }

        issues
    }
}

impl DuplicateIndex {
    fn check_distinct(&self, values: &[ResolvedValue], line: u32, issues: &mut Vec<Issue>) {
        if let Some(repeated) = find_duplicate(values) {
            issues.push(Issue::error(
                line,
                format!(
                    "control and target qubits must be pairwise distinct ({} repeats)",
                    repeated.display()
                ),
            ));
        }
    }
}

fn find_duplicate(values: &[ResolvedValue]) -> Option<&ResolvedValue> {
    values
        .iter()
        .enumerate()
        .find(|(i, value)| values[..*i].contains(value))
        .map(|(_, value)| value)
}
