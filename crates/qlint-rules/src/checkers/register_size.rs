//! Register-size checking: simulator construction and qubit bounds.
//!
//! This checker is the sole writer of `declared_qubit_count` and must run
//! to completion before every other checker starts.

use tracing::info;

use qlint_ast::{CallExpr, Expr, Facts};

use crate::chain::split;
use crate::gates::{is_bare_gate, is_controlled_gate, is_valid_backend};
use crate::resolve::{Literal, ResolvedValue, Resolver, flatten, int_values};
use crate::rule::Issue;
use crate::state::AnalysisState;

/// Validates simulator/backend construction calls, establishes the
/// declared register size, and flags every qubit reference beyond it.
pub struct RegisterSize;

impl RegisterSize {
    pub fn id(&self) -> &'static str {
        "register-size"
    }

    pub fn category(&self) -> &'static str {
        "Register Size"
    }

    /// Run the check, writing the declared qubit count into `state`.
    pub fn establish(&self, facts: &Facts, state: &mut AnalysisState) -> Vec<Issue> {
        let resolver = Resolver::new(facts);
        let mut issues = Vec::new();

        // Construction calls first: they establish the bound everything
        // below reads.
        for fact in &facts.calls {
            if fact.call.name() == Some("Simulator") {
                self.check_construction(&fact.call, fact.line, facts, &resolver, state, &mut issues);
            }
        }

        self.check_bounds(facts, &resolver, state, &mut issues);

        if state.declared_qubit_count == 1 {
            self.check_single_qubit_register(facts, state, &mut issues);
        }

        issues
    }

    /// Validate one `Simulator(...)` construction.
    fn check_construction(
        &self,
        call: &CallExpr,
        line: u32,
        facts: &Facts,
        resolver: &Resolver<'_>,
        state: &mut AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        let args: Vec<&Expr> = call
            .args
            .iter()
            .chain(call.kwargs.iter().map(|kw| &kw.value))
            .collect();

        let Some(&backend_arg) = args.first() else {
            issues.push(Issue::error(
                line,
                "simulator construction is missing its backend argument",
            ));
            return;
        };

        // A backend bound to a variable behaves like the expression it
        // was assigned.
        let backend_arg = deref_binding(backend_arg, facts);

        if let Expr::Call(noise) = backend_arg {
            if noise.name() == Some("NoiseBackend") {
                self.check_noise_backend(noise, line, resolver, state, issues);
                return;
            }
        }

        let backend = resolver.resolve(backend_arg);
        let backend_name = backend
            .as_str()
            .map_or_else(|| backend.display(), str::to_string);
        if !is_valid_backend(&backend_name) {
            issues.push(Issue::error(
                line,
                format!("unknown backend '{backend_name}'"),
            ));
        }

        if let Some(&count_arg) = args.get(1) {
            self.check_qubit_count(&resolver.resolve(count_arg), line, state, issues);
        }
    }

    /// Validate a noise-wrapped backend: the wrapped backend's own
    /// arguments carry the base backend name and the qubit count.
    fn check_noise_backend(
        &self,
        call: &CallExpr,
        line: u32,
        resolver: &Resolver<'_>,
        state: &mut AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        let args: Vec<&Expr> = call
            .args
            .iter()
            .chain(call.kwargs.iter().map(|kw| &kw.value))
            .collect();

        if args.len() < 3 {
            issues.push(Issue::error(
                line,
                "noise backend construction needs a base backend, qubit count, and noise model",
            ));
            return;
        }

        let base = resolver.resolve(args[0]);
        let base_name = base
            .as_str()
            .map_or_else(|| base.display(), str::to_string);
        if !is_valid_backend(&base_name) {
            issues.push(Issue::error(
                line,
                format!("unknown base backend '{base_name}'"),
            ));
        }

        self.check_qubit_count(&resolver.resolve(args[1]), line, state, issues);
    }

    /// A valid positive integer count establishes the register size. A
    /// fractional count is an error, not a warning: the author clearly
    /// meant a size, just not a usable one.
    fn check_qubit_count(
        &self,
        count: &ResolvedValue,
        line: u32,
        state: &mut AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        match count {
            ResolvedValue::Literal(Literal::Float(v)) => {
                issues.push(Issue::error(
                    line,
                    format!("qubit count must be a whole number, got {v}"),
                ));
            }
            ResolvedValue::Literal(Literal::Int(v)) => {
                if *v <= 0 {
                    issues.push(Issue::error(
                        line,
                        format!("qubit count must be a positive integer, got {v}"),
                    ));
                } else {
                    state.declared_qubit_count = *v;
                    info!("declared register size: {v} qubits");
                }
            }
            other => {
                issues.push(Issue::warning(
                    line,
                    format!(
                        "cannot statically determine the qubit count from '{}'",
                        other.display()
                    ),
                ));
            }
        }
    }

    /// Flag every `on(...)` and bare gate call referencing a qubit index
    /// at or beyond the declared register size.
    fn check_bounds(
        &self,
        facts: &Facts,
        resolver: &Resolver<'_>,
        state: &AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        for fact in &facts.calls {
            for segment in split(&fact.call) {
                if !segment.is_call() {
                    continue;
                }
                let out_of_range = if segment.name == "on" || is_bare_gate(&segment.name) {
                    let flat = flatten(&resolver.resolve_segment(&segment));
                    int_values(&flat)
                        .into_iter()
                        .max()
                        .filter(|&max| max >= state.declared_qubit_count)
                } else {
                    None
                };

                if let Some(max) = out_of_range {
                    let what = if segment.name == "on" {
                        "'on' call".to_string()
                    } else {
                        format!("gate '{}'", segment.name)
                    };
                    issues.push(Issue::error(
                        fact.line,
                        format!(
                            "{what} touches qubit {max}, out of range for a register of size {}",
                            state.declared_qubit_count
                        ),
                    ));
                }
            }
        }
    }

    /// A 1-qubit register cannot host any multi-qubit/controlled gate,
    /// whatever its arguments resolve to.
    fn check_single_qubit_register(
        &self,
        facts: &Facts,
        state: &AnalysisState,
        issues: &mut Vec<Issue>,
    ) {
        debug_assert_eq!(state.declared_qubit_count, 1);
        for fact in &facts.calls {
            for segment in split(&fact.call) {
                if segment.is_call() && is_controlled_gate(&segment.name) {
                    issues.push(Issue::error(
                        fact.line,
                        format!(
                            "controlled gate '{}' cannot be used on a single-qubit register",
                            segment.name
                        ),
                    ));
                }
            }
        }
    }
}

/// Follow a plain-name argument to the expression it was assigned, if
/// any. One level only; deeper chains stay symbolic.
fn deref_binding<'a>(expr: &'a Expr, facts: &'a Facts) -> &'a Expr {
    if let Expr::Name(name) = expr {
        if let Some(fact) = facts.assignments.iter().find(|a| a.target == *name) {
            return &fact.value;
        }
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Severity;
    use qlint_ast::{extract, parse};

    fn run(source: &str) -> (Vec<Issue>, AnalysisState) {
        let facts = extract(&parse(source).unwrap());
        let mut state = AnalysisState::new();
        let issues = RegisterSize.establish(&facts, &mut state);
        (issues, state)
    }

    #[test]
    fn test_valid_construction_sets_count() {
        let (issues, state) = run("sim = Simulator(\"mqvector\", 3)\n");
        assert!(issues.is_empty());
        assert_eq!(state.declared_qubit_count, 3);
    }

    #[test]
    fn test_unknown_backend() {
        let (issues, _) = run("sim = Simulator(\"qvector\", 3)\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("unknown backend 'qvector'"));
    }

    #[test]
    fn test_fractional_count_is_error_not_warning() {
        let (issues, state) = run("sim = Simulator(\"mqvector\", 2.5)\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("whole number"));
        assert!(!state.is_bounded());
    }

    #[test]
    fn test_symbolic_count_is_warning_not_error() {
        let (issues, _) = run("sim = Simulator(\"mqvector\", n)\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("cannot statically determine"));
    }

    #[test]
    fn test_count_resolved_through_variable() {
        let (issues, state) = run("n = 4\nsim = Simulator(\"mqvector\", n)\n");
        assert!(issues.is_empty());
        assert_eq!(state.declared_qubit_count, 4);
    }

    #[test]
    fn test_nonpositive_count() {
        let (issues, _) = run("sim = Simulator(\"mqvector\", 0)\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("positive integer"));
    }

    #[test]
    fn test_missing_arguments() {
        let (issues, _) = run("sim = Simulator()\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("missing its backend argument"));
    }

    #[test]
    fn test_noise_backend() {
        let (issues, state) =
            run("sim = Simulator(NoiseBackend(\"mqvector\", 2, model))\n");
        assert!(issues.is_empty());
        assert_eq!(state.declared_qubit_count, 2);
    }

    #[test]
    fn test_noise_backend_through_variable() {
        let (issues, state) =
            run("backend = NoiseBackend(\"mqmatrix\", 5, model)\nsim = Simulator(backend)\n");
        assert!(issues.is_empty());
        assert_eq!(state.declared_qubit_count, 5);
    }

    #[test]
    fn test_noise_backend_too_few_arguments() {
        let (issues, _) = run("sim = Simulator(NoiseBackend(\"mqvector\", 2))\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("noise backend construction"));
    }

    #[test]
    fn test_noise_backend_bad_base() {
        let (issues, _) = run("sim = Simulator(NoiseBackend(\"fast\", 2, model))\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("unknown base backend 'fast'"));
    }

    #[test]
    fn test_gate_beyond_bound() {
        let (issues, _) = run("sim = Simulator(\"mqvector\", 3)\ncircuit.h(3)\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("qubit 3"));
        assert!(issues[0].message.contains("size 3"));
        assert_eq!(issues[0].line, 2);
    }

    #[test]
    fn test_on_call_beyond_bound_flattens_lists() {
        let (issues, _) =
            run("sim = Simulator(\"mqvector\", 2)\nX.on([0, 1], 2)\n");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("qubit 2"));
    }

    #[test]
    fn test_within_bound_is_clean() {
        let (issues, _) = run("sim = Simulator(\"mqvector\", 3)\ncircuit.h(2)\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_no_bound_means_no_range_errors() {
        let (issues, _) = run("circuit.h(40)\n");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_single_qubit_register_rejects_controlled_gates() {
        let (issues, _) = run("sim = Simulator(\"mqvector\", 1)\ncircuit.cx(0, 0)\n");
        assert!(
            issues
                .iter()
                .any(|i| i.message.contains("controlled gate 'cx'"))
        );
    }

    #[test]
    fn test_count_via_keyword_argument() {
        let (issues, state) = run("sim = Simulator(\"mqvector\", n_qubits=6)\n");
        assert!(issues.is_empty());
        assert_eq!(state.declared_qubit_count, 6);
    }
}
