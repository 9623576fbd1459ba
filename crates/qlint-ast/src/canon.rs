//! Canonical rendering of expression nodes.
//!
//! Every supported node renders to a deterministic string with no interior
//! whitespace, such that a rendered call re-parses to an equivalent shape.
//! Unsupported shapes degrade to omission; rendering is total and never
//! fails. The omission cases are logged at debug level so an operator can
//! spot expressions the analysis cannot see.

use tracing::debug;

use crate::ast::{CallExpr, Expr, Keyword};

/// Render an expression in argument position.
///
/// Supported kinds: constants, names, calls, attributes, subscripts,
/// lists, and unary negation of a constant. Anything else renders empty.
pub fn render(expr: &Expr) -> String {
    match expr {
        Expr::Int(v) => v.to_string(),
        Expr::Float(v) => v.to_string(),
        Expr::Str(s) => format!("\"{s}\""),
        Expr::Name(n) => n.clone(),
        Expr::Call(call) => render_call(call),
        Expr::Attribute { .. } => render_attribute(expr),
        Expr::Subscript { .. } => render_subscript(expr),
        Expr::List(items) => render_list(items),
        Expr::Neg(inner) => render_neg(inner),
        other => {
            debug!("skipping unsupported expression in argument position: {other:?}");
            String::new()
        }
    }
}

/// Render a call: callee followed by the comma-joined arguments.
///
/// Keyword arguments render as `key=value`, or the key alone when the
/// value has no rendering. Empty argument renderings are dropped from the
/// join so omitted shapes leave no stray commas.
pub fn render_call(call: &CallExpr) -> String {
    let mut parts: Vec<String> = call.args.iter().map(render).collect();
    parts.extend(call.kwargs.iter().map(render_keyword));
    let args = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    let callee = match call.callee.as_ref() {
        Expr::Name(n) => n.clone(),
        Expr::Attribute { .. } => render_attribute(&call.callee),
        Expr::Call(inner) => render_call(inner),
        other => {
            debug!("skipping unsupported callee: {other:?}");
            String::new()
        }
    };

    format!("{callee}({args})")
}

/// Render an attribute access: the base (when it is a name, call, or
/// another attribute) followed by `.attr`.
fn render_attribute(expr: &Expr) -> String {
    let Expr::Attribute { base, attr } = expr else {
        return String::new();
    };
    let prefix = match base.as_ref() {
        Expr::Name(n) => n.clone(),
        Expr::Call(call) => render_call(call),
        Expr::Attribute { .. } => render_attribute(base),
        _ => String::new(),
    };
    format!("{prefix}.{attr}")
}

/// Render a subscript. The base is rendered only when it is a plain name.
pub fn render_subscript(expr: &Expr) -> String {
    let Expr::Subscript { base, index } = expr else {
        return String::new();
    };
    let suffix = format!("[{}]", render_index(index));
    match base.as_ref() {
        Expr::Name(n) => format!("{n}{suffix}"),
        _ => suffix,
    }
}

/// Render an index or dict key/value position.
pub fn render_index(expr: &Expr) -> String {
    match expr {
        Expr::Int(_) | Expr::Float(_) | Expr::Str(_) => render(expr),
        Expr::Name(n) => n.clone(),
        Expr::Call(call) => render_call(call),
        Expr::Attribute { .. } => render_attribute(expr),
        Expr::Subscript { .. } => render_subscript(expr),
        _ => String::new(),
    }
}

/// Render a list. Element kinds outside the supported set are silently
/// omitted; this is a documented limitation of the canonical form.
fn render_list(items: &[Expr]) -> String {
    let rendered: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Expr::Int(_)
            | Expr::Float(_)
            | Expr::Str(_)
            | Expr::Name(_)
            | Expr::Call(_)
            | Expr::Attribute { .. }
            | Expr::Subscript { .. }
            | Expr::List(_) => Some(render(item)),
            other => {
                debug!("skipping unsupported list element: {other:?}");
                None
            }
        })
        .collect();
    format!("[{}]", rendered.join(","))
}

/// Render a dict literal as `{key:value,...}`.
pub fn render_dict(entries: &[(Expr, Expr)]) -> String {
    let rendered: Vec<String> = entries
        .iter()
        .map(|(k, v)| format!("{}:{}", render_index(k), render_index(v)))
        .collect();
    format!("{{{}}}", rendered.join(","))
}

/// Render a keyword argument as `key=value`, or the key alone when the
/// value renders empty.
fn render_keyword(kw: &Keyword) -> String {
    let value = match &kw.value {
        Expr::Int(_) | Expr::Float(_) | Expr::Str(_) | Expr::Name(_) => render(&kw.value),
        Expr::Call(call) => render_call(call),
        Expr::Attribute { .. } => render_attribute(&kw.value),
        Expr::Subscript { .. } => render_subscript(&kw.value),
        Expr::List(items) => render_list(items),
        _ => String::new(),
    };
    if value.is_empty() {
        kw.name.clone()
    } else {
        format!("{}={value}", kw.name)
    }
}

/// Unary negation renders only for numeric constants.
fn render_neg(inner: &Expr) -> String {
    match inner {
        Expr::Int(v) => format!("-{v}"),
        Expr::Float(v) => format!("-{v}"),
        _ => String::new(),
    }
}
