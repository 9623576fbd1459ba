//! Property-based tests for canonicalization and chain splitting.
//!
//! For any chain built from supported node shapes, rendering it to the
//! canonical string and re-parsing must recover one segment per chained
//! call, and the canonical rendering of the re-parsed call must equal
//! the original string.

use proptest::prelude::*;

use qlint_ast::{Expr, Stmt, extract, parse};
use qlint_rules::split;

/// A chain head: a standalone gate value (bare class reference) or a
/// circuit-builder value (zero-argument constructor call).
#[derive(Debug, Clone)]
enum Head {
    Bare(&'static str),
    Constructor(&'static str),
}

impl Head {
    fn render(&self) -> String {
        match self {
            Head::Bare(name) => (*name).to_string(),
            Head::Constructor(name) => format!("{name}()"),
        }
    }
}

fn arb_head() -> impl Strategy<Value = Head> {
    prop_oneof![
        prop_oneof![Just("CNOT"), Just("X"), Just("SWAP"), Just("Measure")].prop_map(Head::Bare),
        prop_oneof![Just("Circuit"), Just("QubitRegister")].prop_map(Head::Constructor),
    ]
}

fn arb_segment() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("h"), Just("x"), Just("cx"), Just("on"), Just("rz")],
        prop::collection::vec(0i64..10, 0..3),
    )
        .prop_map(|(name, args)| {
            let rendered: Vec<String> = args.iter().map(i64::to_string).collect();
            format!("{name}({})", rendered.join(","))
        })
}

fn arb_chain() -> impl Strategy<Value = (Head, Vec<String>)> {
    arb_head().prop_flat_map(|head| {
        // A bare head is only a chain once something is called on it.
        let min = match head {
            Head::Bare(_) => 1,
            Head::Constructor(_) => 0,
        };
        (
            Just(head),
            prop::collection::vec(arb_segment(), min..5),
        )
    })
}

proptest! {
    #[test]
    fn roundtrip_recovers_every_segment((head, tail) in arb_chain()) {
        let mut source = head.render();
        for segment in &tail {
            source.push('.');
            source.push_str(segment);
        }

        let module = parse(&source).unwrap();
        let facts = extract(&module);

        // The outermost call is discovered first.
        let call = &facts.calls[0].call;
        let segments = split(call);
        prop_assert_eq!(segments.len(), tail.len() + 1);

        // The head keeps its shape: bare references have no argument
        // list, constructors an empty one.
        match head {
            Head::Bare(_) => prop_assert!(!segments[0].is_call()),
            Head::Constructor(_) => prop_assert!(
                segments[0].is_call()
                    && segments[0].args.as_ref().unwrap().positional.is_empty()
            ),
        }

        // Canonicalizing the re-parsed expression reproduces the input.
        prop_assert_eq!(facts.calls[0].description.as_str(), source.as_str());
    }

    #[test]
    fn canonical_form_reparses_to_equivalent_shape(
        (head, tail) in arb_chain(),
    ) {
        let mut source = head.render();
        for segment in &tail {
            source.push('.');
            source.push_str(segment);
        }

        let module = parse(&source).unwrap();
        let Stmt::Expr { value: Expr::Call(first), .. } = &module.statements[0] else {
            panic!("expected a call statement");
        };

        // Render, re-parse, render again: a fixed point after one pass.
        let rendered = qlint_ast::canon::render_call(first);
        let reparsed = parse(&rendered).unwrap();
        let Stmt::Expr { value: Expr::Call(second), .. } = &reparsed.statements[0] else {
            panic!("canonical form must stay a call");
        };
        prop_assert_eq!(&rendered, &qlint_ast::canon::render_call(second));
        prop_assert_eq!(split(first).len(), split(second).len());
    }
}
