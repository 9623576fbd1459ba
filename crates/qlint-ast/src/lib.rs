//! Script front end for qlint.
//!
//! This crate turns the text of a circuit-construction script into the
//! normalized inputs the rule engine consumes:
//!
//! - **Lexer + parser** ([`parse`]): a recursive-descent front end for the
//!   statement/expression subset the fluent gate-construction API uses.
//!   Malformed input yields a typed [`ParseError`]; no partial trees.
//! - **Canonicalizer** ([`canon`]): deterministic string rendering of any
//!   expression node, with unsupported shapes degrading to omission.
//! - **Fact extractor** ([`extract`]): one walk over the tree producing
//!   the ordered [`AssignmentFact`] and [`CallFact`] sequences.
//!
//! # Example
//!
//! ```
//! use qlint_ast::{extract, parse};
//!
//! let module = parse("sim = Simulator(\"mqvector\", 3)\n").unwrap();
//! let facts = extract(&module);
//!
//! assert_eq!(facts.assignments[0].target, "sim");
//! assert_eq!(facts.calls[0].description, "Simulator(\"mqvector\",3)");
//! ```

pub mod ast;
pub mod canon;
pub mod error;
pub mod facts;
pub mod lexer;
pub mod parser;

pub use ast::{BinOpKind, CallExpr, Expr, Keyword, Module, Stmt};
pub use error::{ParseError, ParseResult};
pub use facts::{AssignmentFact, CallFact, Facts, UNKNOWN_TARGET, extract};
pub use parser::parse;
