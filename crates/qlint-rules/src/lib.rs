//! Rule engine for qlint.
//!
//! Consumes the fact sequences produced by `qlint-ast` and runs the
//! semantic checks a generic syntax checker cannot express:
//!
//! - **Chain splitting** ([`chain`]): re-linearizes nested call trees
//!   into ordered atomic segments.
//! - **Value resolution** ([`resolve`]): literals, assignment-fact
//!   lookups, and opaque symbolic tokens, with no argument ever dropped.
//! - **Checkers** ([`checkers`]): register size, measurement order,
//!   duplicate indices, plus a reserved slot.
//! - **Engine** ([`RuleEngine`]): ordered establishment of the shared
//!   state, then parallel fan-out of the independent rules.
//! - **Report** ([`Report`]): issues tagged by rule, split by severity.
//!
//! # Example
//!
//! ```
//! use qlint_ast::{extract, parse};
//! use qlint_rules::RuleEngine;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let source = "sim = Simulator(\"mqvector\", 2)\ncircuit.h(5)\n";
//! let facts = extract(&parse(source).unwrap());
//! let lines: Vec<String> = source.split('\n').map(String::from).collect();
//!
//! let report = RuleEngine::new().analyze(facts, &lines).await;
//! assert_eq!(report.errors.len(), 1);
//! # }
//! ```

pub mod chain;
pub mod checkers;
pub mod engine;
pub mod gates;
pub mod report;
pub mod resolve;
pub mod rule;
pub mod state;

pub use chain::{CallSegment, SegmentArgs, split};
pub use engine::RuleEngine;
pub use report::{Diagnostic, Report};
pub use resolve::{Literal, ResolvedValue, Resolver, flatten, int_values};
pub use rule::{Issue, Rule, Severity};
pub use state::{AnalysisState, UNBOUNDED_QUBITS};
