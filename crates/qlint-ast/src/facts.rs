//! Fact extraction: one walk over the tree producing the ordered
//! assignment and call sequences every checker consumes.
//!
//! Facts are immutable once extracted. The two sequences are parallel to
//! source line numbers but not to each other; checkers re-scan both as
//! needed.

use serde::Serialize;
use tracing::debug;

use crate::ast::{CallExpr, Expr, Module, Stmt};
use crate::canon;

/// Sentinel target for assignment shapes that do not bind a usable name.
pub const UNKNOWN_TARGET: &str = "<unknown>";

/// One variable binding.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentFact {
    /// The bound name: a plain identifier, a comma-joined tuple of
    /// identifiers, a canonical subscript rendering, or [`UNKNOWN_TARGET`].
    pub target: String,
    /// The bound value, kept as a typed expression for resolution.
    pub value: Expr,
    /// Canonical description of the value.
    pub description: String,
    /// 1-based source line.
    pub line: u32,
}

/// One call expression, anywhere in the tree.
#[derive(Debug, Clone, Serialize)]
pub struct CallFact {
    /// The call, kept as a typed expression for chain splitting.
    pub call: CallExpr,
    /// Canonical rendering of the whole call.
    pub description: String,
    /// 1-based source line.
    pub line: u32,
}

/// The extracted fact sequences for one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facts {
    pub assignments: Vec<AssignmentFact>,
    pub calls: Vec<CallFact>,
}

/// Extract both fact sequences in a single pre-order traversal.
///
/// Calls nested inside other calls, argument lists, or attribute chains
/// are all discovered; their order is the deterministic walk order, outer
/// call first.
pub fn extract(module: &Module) -> Facts {
    let mut facts = Facts::default();

    for stmt in &module.statements {
        match stmt {
            Stmt::Import { module, .. } => {
                debug!("skipping import of '{module}'");
            }
            Stmt::Assign { target, value, line } => {
                record_assignment(&mut facts, target, value, *line);
                walk_expr(&mut facts, target);
                walk_expr(&mut facts, value);
            }
            Stmt::Expr { value, .. } => {
                walk_expr(&mut facts, value);
            }
        }
    }

    debug!(
        "extracted {} assignment facts and {} call facts",
        facts.assignments.len(),
        facts.calls.len()
    );
    facts
}

/// Record the primary assignment fact and, for a dict value, one
/// synthesized fact per entry directly after it. The per-entry facts let
/// dictionary-valued configuration (a parameter-name-to-value mapping
/// passed by reference) resolve later.
fn record_assignment(facts: &mut Facts, target: &Expr, value: &Expr, line: u32) {
    let target_name = derive_target(target);
    facts.assignments.push(AssignmentFact {
        target: target_name,
        value: value.clone(),
        description: describe(value),
        line,
    });

    if let Expr::Dict(entries) = value {
        for (key, entry_value) in entries {
            facts.assignments.push(AssignmentFact {
                target: canon::render_index(key),
                value: entry_value.clone(),
                description: describe(entry_value),
                line,
            });
        }
    }
}

/// Derive the bound name from an assignment target.
fn derive_target(target: &Expr) -> String {
    match target {
        Expr::Name(name) => name.clone(),
        Expr::Tuple(items) => {
            // Only plain names contribute; other element shapes are ignored.
            let names: Vec<&str> = items
                .iter()
                .filter_map(|item| match item {
                    Expr::Name(name) => Some(name.as_str()),
                    _ => None,
                })
                .collect();
            names.join(",")
        }
        Expr::Subscript { .. } => canon::render_subscript(target),
        _ => UNKNOWN_TARGET.to_string(),
    }
}

/// Describe a bound value: the literal's printed form for a constant, the
/// canonical string for a call or attribute access, the `{key:value,...}`
/// form for a dict, and a sentinel for anything else.
fn describe(value: &Expr) -> String {
    match value {
        Expr::Int(v) => v.to_string(),
        Expr::Float(v) => v.to_string(),
        Expr::Str(s) => s.clone(),
        Expr::Call(call) => canon::render_call(call),
        Expr::Attribute { .. } => canon::render(value),
        Expr::Dict(entries) => canon::render_dict(entries),
        _ => UNKNOWN_TARGET.to_string(),
    }
}

/// Pre-order walk collecting every call expression.
fn walk_expr(facts: &mut Facts, expr: &Expr) {
    match expr {
        Expr::Call(call) => {
            facts.calls.push(CallFact {
                call: call.clone(),
                description: canon::render_call(call),
                line: call.line,
            });
            walk_expr(facts, &call.callee);
            for arg in &call.args {
                walk_expr(facts, arg);
            }
            for kw in &call.kwargs {
                walk_expr(facts, &kw.value);
            }
        }
        Expr::Attribute { base, .. } => walk_expr(facts, base),
        Expr::Subscript { base, index } => {
            walk_expr(facts, base);
            walk_expr(facts, index);
        }
        Expr::List(items) | Expr::Tuple(items) => {
            for item in items {
                walk_expr(facts, item);
            }
        }
        Expr::Dict(entries) => {
            for (key, value) in entries {
                walk_expr(facts, key);
                walk_expr(facts, value);
            }
        }
        Expr::Neg(inner) => walk_expr(facts, inner),
        Expr::BinOp { left, right, .. } => {
            walk_expr(facts, left);
            walk_expr(facts, right);
        }
        Expr::Int(_) | Expr::Float(_) | Expr::Str(_) | Expr::Name(_) => {}
    }
}
