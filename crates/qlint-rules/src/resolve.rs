//! Argument resolution against the extracted assignment facts.
//!
//! Resolution is total: every argument becomes a [`ResolvedValue`], and
//! anything that cannot be interpreted statically stays an [`Unresolved`]
//! token so positional meaning is preserved for downstream checks.
//!
//! [`Unresolved`]: ResolvedValue::Unresolved

use qlint_ast::{AssignmentFact, Expr, Facts, canon};

use crate::chain::CallSegment;

/// Guard against pathological assignment cycles (`a = b` / `b = a`).
const MAX_LOOKUP_DEPTH: usize = 8;

/// The placeholder token dropped during flattening.
const NONE_TOKEN: &str = "None";

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A resolved argument: a literal, a list of resolved arguments, or an
/// opaque token left exactly where it was.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Literal(Literal),
    List(Vec<ResolvedValue>),
    Unresolved(String),
}

impl ResolvedValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ResolvedValue::Literal(Literal::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResolvedValue::Literal(Literal::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ResolvedValue::List(_))
    }

    /// A short rendering for issue messages.
    pub fn display(&self) -> String {
        match self {
            ResolvedValue::Literal(Literal::Int(v)) => v.to_string(),
            ResolvedValue::Literal(Literal::Float(v)) => v.to_string(),
            ResolvedValue::Literal(Literal::Str(s)) => s.clone(),
            ResolvedValue::List(items) => {
                let inner: Vec<String> = items.iter().map(ResolvedValue::display).collect();
                format!("[{}]", inner.join(","))
            }
            ResolvedValue::Unresolved(token) => token.clone(),
        }
    }
}

/// Resolves argument expressions against the assignment facts.
pub struct Resolver<'a> {
    assignments: &'a [AssignmentFact],
}

impl<'a> Resolver<'a> {
    pub fn new(facts: &'a Facts) -> Self {
        Self {
            assignments: &facts.assignments,
        }
    }

    /// Resolve one expression.
    pub fn resolve(&self, expr: &Expr) -> ResolvedValue {
        self.resolve_at(expr, 0)
    }

    /// Resolve a segment's arguments: positional values in order, then
    /// keyword argument values in source order.
    pub fn resolve_segment(&self, segment: &CallSegment) -> Vec<ResolvedValue> {
        let Some(args) = &segment.args else {
            return Vec::new();
        };
        let mut values: Vec<ResolvedValue> =
            args.positional.iter().map(|a| self.resolve(a)).collect();
        values.extend(args.keywords.iter().map(|kw| self.resolve(&kw.value)));
        values
    }

    fn resolve_at(&self, expr: &Expr, depth: usize) -> ResolvedValue {
        match expr {
            Expr::Int(v) => ResolvedValue::Literal(Literal::Int(*v)),
            Expr::Float(v) => ResolvedValue::Literal(Literal::Float(*v)),
            Expr::Str(s) => ResolvedValue::Literal(Literal::Str(s.clone())),
            Expr::Neg(inner) => match self.resolve_at(inner, depth) {
                ResolvedValue::Literal(Literal::Int(v)) => {
                    ResolvedValue::Literal(Literal::Int(-v))
                }
                ResolvedValue::Literal(Literal::Float(v)) => {
                    ResolvedValue::Literal(Literal::Float(-v))
                }
                _ => ResolvedValue::Unresolved(canon::render(expr)),
            },
            Expr::List(items) => ResolvedValue::List(
                items.iter().map(|i| self.resolve_at(i, depth)).collect(),
            ),
            Expr::Name(name) => self.lookup(name, depth),
            other => ResolvedValue::Unresolved(canon::render(other)),
        }
    }

    /// Substitute a name with the value bound by a prior assignment fact.
    /// The first matching fact wins. Missing names stay as their own
    /// token.
    fn lookup(&self, name: &str, depth: usize) -> ResolvedValue {
        if depth >= MAX_LOOKUP_DEPTH {
            return ResolvedValue::Unresolved(name.to_string());
        }
        match self.assignments.iter().find(|a| a.target == name) {
            Some(fact) => match &fact.value {
                Expr::Call(_) | Expr::Attribute { .. } | Expr::Subscript { .. } => {
                    ResolvedValue::Unresolved(fact.description.clone())
                }
                value => self.resolve_at(value, depth + 1),
            },
            None => ResolvedValue::Unresolved(name.to_string()),
        }
    }
}

/// Flatten list values into their elements, recursively, dropping the
/// `None` placeholder token. Everything else survives, resolved or not.
pub fn flatten(values: &[ResolvedValue]) -> Vec<ResolvedValue> {
    let mut flat = Vec::new();
    for value in values {
        match value {
            ResolvedValue::List(items) => flat.extend(flatten(items)),
            ResolvedValue::Unresolved(token) if token == NONE_TOKEN => {}
            other => flat.push(other.clone()),
        }
    }
    flat
}

/// The integer values among an already-flattened slice.
pub fn int_values(values: &[ResolvedValue]) -> Vec<i64> {
    values.iter().filter_map(ResolvedValue::as_int).collect()
}
