//! Typed expression tree for circuit-construction scripts.
//!
//! Every supported expression shape is a variant of [`Expr`]; downstream
//! analysis (chain splitting, argument resolution) works directly on this
//! tree instead of re-parsing rendered strings.

use serde::{Deserialize, Serialize};

/// A parsed script: an ordered list of top-level statements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Module {
    /// Statements in source order.
    pub statements: Vec<Stmt>,
}

/// A top-level statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// `import x.y as z` / `from x import y`; carries no facts.
    Import { module: String, line: u32 },

    /// `target = value`. The target is an arbitrary expression; fact
    /// extraction decides how (and whether) it names a binding.
    Assign { target: Expr, value: Expr, line: u32 },

    /// A bare expression statement, typically a call.
    Expr { value: Expr, line: u32 },
}

impl Stmt {
    /// The 1-based source line the statement starts on.
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Import { line, .. } | Stmt::Assign { line, .. } | Stmt::Expr { line, .. } => {
                *line
            }
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer constant.
    Int(i64),
    /// Floating-point constant.
    Float(f64),
    /// String constant.
    Str(String),
    /// Identifier reference.
    Name(String),
    /// Attribute access `base.attr`.
    Attribute { base: Box<Expr>, attr: String },
    /// Subscript `base[index]`.
    Subscript { base: Box<Expr>, index: Box<Expr> },
    /// List literal `[a, b, ...]`.
    List(Vec<Expr>),
    /// Tuple, parenthesized or bare (`a, b`).
    Tuple(Vec<Expr>),
    /// Dict literal `{k: v, ...}`.
    Dict(Vec<(Expr, Expr)>),
    /// Call expression, possibly the tail of a method chain.
    Call(CallExpr),
    /// Unary negation.
    Neg(Box<Expr>),
    /// Binary arithmetic. Parsed so the tree stays faithful, but treated
    /// as an unsupported shape by the canonicalizer.
    BinOp {
        left: Box<Expr>,
        op: BinOpKind,
        right: Box<Expr>,
    },
}

/// A call expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// The called expression: a name, an attribute chain, or another call.
    pub callee: Box<Expr>,
    /// Positional arguments.
    pub args: Vec<Expr>,
    /// Keyword arguments, in source order after the positional ones.
    pub kwargs: Vec<Keyword>,
    /// 1-based line the call starts on.
    pub line: u32,
}

/// A keyword argument `name=value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl CallExpr {
    /// The name this call is invoked under: the identifier for `f(...)`,
    /// the final attribute for `a.b.f(...)`, `None` for anything else.
    pub fn name(&self) -> Option<&str> {
        match self.callee.as_ref() {
            Expr::Name(n) => Some(n),
            Expr::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_name() {
        let call = CallExpr {
            callee: Box::new(Expr::Name("Simulator".into())),
            args: vec![],
            kwargs: vec![],
            line: 1,
        };
        assert_eq!(call.name(), Some("Simulator"));

        let method = CallExpr {
            callee: Box::new(Expr::Attribute {
                base: Box::new(Expr::Name("sim".into())),
                attr: "apply".into(),
            }),
            args: vec![],
            kwargs: vec![],
            line: 1,
        };
        assert_eq!(method.name(), Some("apply"));
    }

    #[test]
    fn test_stmt_line() {
        let stmt = Stmt::Expr {
            value: Expr::Int(1),
            line: 7,
        };
        assert_eq!(stmt.line(), 7);
    }
}
