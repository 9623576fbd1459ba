//! Method-chain splitting.
//!
//! A chained expression like `Circuit().h(0).cx(1,0)` nests in the tree
//! as calls whose callees are attributes of inner calls. Splitting walks
//! the callee-chain pointers directly and re-linearizes the chain into
//! atomic segments, in source order.

use qlint_ast::{CallExpr, Expr, Keyword, canon};

/// The arguments of one call segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentArgs {
    pub positional: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

impl SegmentArgs {
    fn of(call: &CallExpr) -> Self {
        Self {
            positional: call.args.clone(),
            keywords: call.kwargs.clone(),
        }
    }
}

/// One atomic unit of a method chain: a called name with its arguments,
/// or a bare head reference (`CNOT` in `CNOT.on(0, 1)`) with no argument
/// list at all.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSegment {
    pub name: String,
    pub args: Option<SegmentArgs>,
}

impl CallSegment {
    /// Whether this segment is an actual call (`Circuit()`), as opposed
    /// to a bare head reference (`CNOT`).
    pub fn is_call(&self) -> bool {
        self.args.is_some()
    }
}

/// Split a call into its ordered chain segments.
///
/// `Circuit().h(0).cx(1,0)` becomes `[Circuit(), h(0), cx(1,0)]`: the
/// circuit-builder head is a zero-argument constructor segment.
/// `CNOT.on(0, 1)` becomes `[CNOT, on(0,1)]`: the standalone gate head
/// is a bare reference segment. Both shapes are the first atomic segment
/// of their chains.
pub fn split(call: &CallExpr) -> Vec<CallSegment> {
    let mut segments = Vec::new();
    collect_call(call, &mut segments);
    segments
}

fn collect_call(call: &CallExpr, out: &mut Vec<CallSegment>) {
    match call.callee.as_ref() {
        Expr::Name(name) => out.push(CallSegment {
            name: name.clone(),
            args: Some(SegmentArgs::of(call)),
        }),
        Expr::Attribute { base, attr } => {
            collect_head(base, out);
            out.push(CallSegment {
                name: attr.clone(),
                args: Some(SegmentArgs::of(call)),
            });
        }
        Expr::Call(inner) => {
            // f(...)(...): keep the inner chain, record the outer
            // application under an empty name.
            collect_call(inner, out);
            out.push(CallSegment {
                name: String::new(),
                args: Some(SegmentArgs::of(call)),
            });
        }
        _ => out.push(CallSegment {
            name: String::new(),
            args: Some(SegmentArgs::of(call)),
        }),
    }
}

/// Collect the head of a chain reached through an attribute base.
fn collect_head(expr: &Expr, out: &mut Vec<CallSegment>) {
    match expr {
        Expr::Call(call) => collect_call(call, out),
        Expr::Attribute { base, attr } => {
            collect_head(base, out);
            out.push(CallSegment {
                name: attr.clone(),
                args: None,
            });
        }
        Expr::Name(name) => out.push(CallSegment {
            name: name.clone(),
            args: None,
        }),
        Expr::Subscript { .. } => out.push(CallSegment {
            name: canon::render_subscript(expr),
            args: None,
        }),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlint_ast::parse;

    fn split_source(source: &str) -> Vec<CallSegment> {
        let module = parse(source).unwrap();
        let facts = qlint_ast::extract(&module);
        split(&facts.calls[0].call)
    }

    fn names(segments: &[CallSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_constructor_chain() {
        let segments = split_source("Circuit().h(0).cx(1, 0)\n");
        assert_eq!(names(&segments), vec!["Circuit", "h", "cx"]);
        assert!(segments.iter().all(CallSegment::is_call));
        assert!(segments[0].args.as_ref().unwrap().positional.is_empty());
        assert_eq!(segments[2].args.as_ref().unwrap().positional.len(), 2);
    }

    #[test]
    fn test_bare_head_chain() {
        let segments = split_source("CNOT.on(0, 1)\n");
        assert_eq!(names(&segments), vec!["CNOT", "on"]);
        assert!(!segments[0].is_call());
        assert!(segments[1].is_call());
    }

    #[test]
    fn test_single_call() {
        let segments = split_source("Simulator(\"mqvector\", 3)\n");
        assert_eq!(names(&segments), vec!["Simulator"]);
    }

    #[test]
    fn test_object_method() {
        let segments = split_source("circuit.h(0)\n");
        assert_eq!(names(&segments), vec!["circuit", "h"]);
        assert!(!segments[0].is_call());
    }

    #[test]
    fn test_subscript_head() {
        let segments = split_source("gates[0].on(1)\n");
        assert_eq!(names(&segments), vec!["gates[0]", "on"]);
    }

    #[test]
    fn test_attribute_without_call_in_chain() {
        let segments = split_source("module.CNOT.on(2, 3)\n");
        assert_eq!(names(&segments), vec!["module", "CNOT", "on"]);
        assert!(!segments[1].is_call());
    }

    #[test]
    fn test_keyword_arguments_preserved() {
        let segments = split_source("Measure().on(0, ctrl_qubits=1)\n");
        let args = segments[1].args.as_ref().unwrap();
        assert_eq!(args.positional.len(), 1);
        assert_eq!(args.keywords.len(), 1);
    }
}
