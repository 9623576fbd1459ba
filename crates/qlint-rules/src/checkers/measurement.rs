//! Measurement-order checking: a measured qubit reused as a control.

use qlint_ast::Facts;

use crate::chain::{CallSegment, split};
use crate::gates::takes_control_argument;
use crate::resolve::{ResolvedValue, Resolver, flatten};
use crate::rule::{Issue, Rule};
use crate::state::AnalysisState;

/// Tracks which qubits have been measured while scanning the call chains
/// in order, and warns whenever a later gate uses one as a control.
///
/// Measuring collapses the qubit; controlling on it afterwards is almost
/// always a mistake, but classically-controlled feedback is legal, so
/// this stays a warning rather than an error.
pub struct MeasurementOrder;

impl Rule for MeasurementOrder {
    fn id(&self) -> &'static str {
        "measurement-order"
    }

    fn category(&self) -> &'static str {
        "Measurement Order"
    }

    fn check(&self, facts: &Facts, state: &AnalysisState) -> Vec<Issue> {
        let resolver = Resolver::new(facts);
        // Own the measured set: parallel rules never share mutable state.
        let mut tracker = state.clone();
        let mut issues = Vec::new();

        for fact in &facts.calls {
            let segments = split(&fact.call);
            for (idx, segment) in segments.iter().enumerate() {
                let name = segment.name.as_str();

                if name == "measure_all" {
                    tracker.mark_all_measured();
                } else if name == "measure" && segment.is_call() {
                    self.check_measure(segment, fact.line, &resolver, &mut tracker, &mut issues);
                } else if name == "Measure" {
                    let next = segments.get(idx + 1);
                    if let Some(on) = next.filter(|s| s.name == "on" && s.is_call()) {
                        self.check_measure_on(on, fact.line, &resolver, &mut tracker, &mut issues);
                    }
                } else if takes_control_argument(name) && segment.is_call() {
                    let values = resolver.resolve_segment(segment);
                    if let Some(control) = values.get(1) {
                        self.check_control(
                            control,
                            &format!("gate '{name}'"),
                            fact.line,
                            &tracker,
                            &mut issues,
                        );
                    }
                } else if name == "on"
                    && segment.is_call()
                    && idx > 0
                    && segments[idx - 1].name != "Measure"
                {
                    let values = resolver.resolve_segment(segment);
                    if let Some(control) = values.get(1) {
                        self.check_control(
                            control,
                            "'on' call",
                            fact.line,
                            &tracker,
                            &mut issues,
                        );
                    }
                }
            }
        }

        issues
    }
}

impl MeasurementOrder {
    /// `measure(q)` targets exactly one qubit.
    fn check_measure(
        &self,
        segment: &CallSegment,
        line: u32,
        resolver: &Resolver<'_>,
        tracker: &mut AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        let values = resolver.resolve_segment(segment);
        let Some(target) = values.first() else {
            return;
        };
        if target.is_list() {
            issues.push(Issue::error(
                line,
                "measurement must target exactly one qubit",
            ));
        } else if let Some(qubit) = target.as_int() {
            tracker.mark_measured(qubit);
        }
    }

    /// `Measure().on(target)`: no list target, no control qubit.
    fn check_measure_on(
        &self,
        on: &CallSegment,
        line: u32,
        resolver: &Resolver<'_>,
        tracker: &mut AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        let values = resolver.resolve_segment(on);
        let Some(target) = values.first() else {
            return;
        };

        if target.is_list() {
            issues.push(Issue::error(
                line,
                "measurement must target exactly one qubit",
            ));
        }
        let positional = on.args.as_ref().map_or(0, |a| a.positional.len());
        if positional >= 2 {
            issues.push(Issue::error(
                line,
                "measurement must not declare a control qubit",
            ));
        }

        match target {
            ResolvedValue::List(items) => {
                for qubit in flatten(items).iter().filter_map(ResolvedValue::as_int) {
                    tracker.mark_measured(qubit);
                }
            }
            other => {
                if let Some(qubit) = other.as_int() {
                    tracker.mark_measured(qubit);
                }
            }
        }
    }

    /// Warn for every already-measured qubit among the control operands.
    fn check_control(
        &self,
        control: &ResolvedValue,
        context: &str,
        line: u32,
        tracker: &AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        let candidates = match control {
            ResolvedValue::List(items) => flatten(items),
            other => vec![other.clone()],
        };
        for qubit in candidates.iter().filter_map(ResolvedValue::as_int) {
            if tracker.is_measured(qubit) {
                issues.push(Issue::warning(
                    line,
                    format!("qubit {qubit} was already measured and is reused as a control ({context})"),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Severity;
    use qlint_ast::{extract, parse};

    fn run(source: &str) -> Vec<Issue> {
        run_with_count(source, 3)
    }

    fn run_with_count(source: &str, declared: i64) -> Vec<Issue> {
        let facts = extract(&parse(source).unwrap());
        let mut state = AnalysisState::new();
        state.declared_qubit_count = declared;
        MeasurementOrder.check(&facts, &state)
    }

    #[test]
    fn test_measured_qubit_reused_as_control() {
        let issues = run("circuit.measure(0)\ncircuit.cx(1, 0)\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("qubit 0"));
        assert_eq!(issues[0].line, 2);
    }

    #[test]
    fn test_untouched_control_is_clean() {
        let issues = run("circuit.measure(0)\ncircuit.cx(1, 2)\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_control_before_measurement_is_clean() {
        let issues = run("circuit.cx(1, 0)\ncircuit.measure(0)\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_measure_all_marks_every_qubit() {
        let issues = run("circuit.measure_all()\ncircuit.cx(0, 2)\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("qubit 2"));
    }

    #[test]
    fn test_measure_list_target_is_error() {
        let issues = run("circuit.measure([0, 1])\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("exactly one qubit"));
    }

    #[test]
    fn test_measure_constructor_list_target_is_error() {
        let issues = run("Measure().on([0, 1])\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("exactly one qubit"));
    }

    #[test]
    fn test_measure_constructor_with_control_is_error() {
        let issues = run("Measure().on(0, 1)\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("must not declare a control"));
    }

    #[test]
    fn test_measure_on_marks_target() {
        let issues = run("Measure().on(1)\nX.on(0, 1)\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("qubit 1"));
        assert!(issues[0].message.contains("'on' call"));
    }

    #[test]
    fn test_on_after_measure_constructor_not_treated_as_control_use() {
        // The on() attached to the measurement constructor itself must
        // not be inspected as a controlled-gate application.
        let issues = run("Measure().on(0)\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_control_list_flattened() {
        let issues = run("circuit.measure(2)\nX.on(0, [1, 2])\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("qubit 2"));
    }

    #[test]
    fn test_variable_control_resolves() {
        let issues = run("c = 1\ncircuit.measure(1)\ncircuit.cz(0, c)\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("gate 'cz'"));
    }

    #[test]
    fn test_chain_order_respected_within_statement() {
        let issues = run("Circuit().measure(0).cx(1, 0)\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
