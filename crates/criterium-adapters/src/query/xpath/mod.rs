//! Path query (XPath) backend.
//!
//! Statements have the shape
//!
//! ```text
//! <scope><step>[<filter>] order by <key> <direction>, ...
//! ```
//!
//! where the scope is `//` or `/jcr:root/<path>//`, and the step is `*` or
//! `element(*, <type>)`.
//!
//! The grammar has no descendant-of predicate. A `DescendantOf` criterion
//! can only become the scope, which works when it is the whole criterion
//! or the single descendant-of conjunct of a top-level conjunction, and no
//! base path already occupies the scope. Anywhere else rendering fails.

pub mod iso9075;

use criterium_common::types::{QueryLanguage, Value};
use criterium_common::utils::error::{Error, Result};
use criterium_core::criterion::property::is_root;
use criterium_core::criterion::{Direction, Lowered, Order, Predicate, lower};
use tracing::trace;

use super::literal;
use super::{RenderRequest, Renderer};

/// Filter that no node passes: every node has a primary type.
const NEVER: &str = "not(@jcr:primaryType)";

/// Renders statements in the path query grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct XPathRenderer;

impl Renderer for XPathRenderer {
    fn language(&self) -> QueryLanguage {
        QueryLanguage::XPath
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<String> {
        render(request)
    }
}

/// Renders a request as an XPath statement.
///
/// # Errors
///
/// Returns [`Error::UnsupportedInTarget`] for a descendant-of criterion
/// that cannot be folded into the path scope, and
/// [`Error::InvalidArgument`] for an illegal node type or a non-finite
/// double.
pub fn render(request: &RenderRequest<'_>) -> Result<String> {
    let node_type = request.checked_node_type()?;
    let base = request.base_path.filter(|p| !is_root(p));
    let (scope, filter) = match base {
        Some(base) => (Some(base.to_string()), lower(request.criterion)),
        None => hoist_scope(lower(request.criterion)),
    };

    let mut out = String::new();
    match scope {
        Some(path) => {
            out.push_str("/jcr:root");
            out.push_str(&iso9075::encode_path(&path));
            out.push_str("//");
        }
        None => out.push_str("//"),
    }
    match node_type {
        Some(t) => {
            out.push_str("element(*, ");
            out.push_str(t);
            out.push(')');
        }
        None => out.push('*'),
    }
    match filter {
        Lowered::Always => {}
        Lowered::Never => {
            out.push('[');
            out.push_str(NEVER);
            out.push(']');
        }
        Lowered::Predicate(p) => {
            out.push('[');
            write_predicate(&mut out, &p, false)?;
            out.push(']');
        }
    }
    write_order(&mut out, request.order);

    trace!(statement = %out, "rendered xpath");
    Ok(out)
}

/// Moves a top-level descendant-of criterion into the scope.
fn hoist_scope(lowered: Lowered) -> (Option<String>, Lowered) {
    match lowered {
        Lowered::Predicate(Predicate::DescendantOf { path }) => (Some(path), Lowered::Always),
        Lowered::Predicate(Predicate::And(mut parts)) => {
            let scope = take_single_descendant(&mut parts);
            let rest = if parts.len() == 1 {
                parts.pop().map_or(Lowered::Always, Lowered::Predicate)
            } else {
                Lowered::Predicate(Predicate::And(parts))
            };
            (scope, rest)
        }
        other => (None, other),
    }
}

fn take_single_descendant(parts: &mut Vec<Predicate>) -> Option<String> {
    let index = {
        let mut found = parts
            .iter()
            .enumerate()
            .filter(|(_, p)| matches!(p, Predicate::DescendantOf { .. }))
            .map(|(i, _)| i);
        let first = found.next()?;
        if found.next().is_some() {
            return None;
        }
        first
    };
    match parts.remove(index) {
        Predicate::DescendantOf { path } => Some(path),
        other => {
            parts.insert(index, other);
            None
        }
    }
}

fn write_predicate(out: &mut String, predicate: &Predicate, nested: bool) -> Result<()> {
    match predicate {
        Predicate::Compare {
            property,
            op,
            value,
        } => {
            out.push_str(&format!("{property} {} ", op.symbol()));
            out.push_str(&value_literal(value)?);
        }
        Predicate::Like { property, pattern } => {
            let pattern = pattern.render('%', '_', '\\');
            out.push_str(&format!(
                "jcr:like({property}, {})",
                literal::string(&pattern)
            ));
        }
        Predicate::Contains { property, text } => {
            out.push_str(&format!(
                "jcr:contains({property}, {})",
                literal::string(text)
            ));
        }
        Predicate::NullCheck {
            property,
            not_null: true,
        } => out.push_str(&property.to_string()),
        Predicate::NullCheck {
            property,
            not_null: false,
        } => out.push_str(&format!("not({property})")),
        Predicate::DescendantOf { .. } => {
            return Err(Error::unsupported(predicate, QueryLanguage::XPath));
        }
        Predicate::Not(inner) => {
            out.push_str("not(");
            write_predicate(out, inner, false)?;
            out.push(')');
        }
        Predicate::And(parts) => write_junction(out, parts, " and ", nested)?,
        Predicate::Or(parts) => write_junction(out, parts, " or ", nested)?,
    }
    Ok(())
}

fn write_junction(out: &mut String, parts: &[Predicate], joiner: &str, nested: bool) -> Result<()> {
    if nested {
        out.push('(');
    }
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push_str(joiner);
        }
        write_predicate(out, part, true)?;
    }
    if nested {
        out.push(')');
    }
    Ok(())
}

fn value_literal(value: &Value) -> Result<String> {
    Ok(match value {
        Value::String(s) => literal::string(s),
        Value::Long(v) => literal::long(*v),
        Value::Double(v) => literal::double(*v)?,
        Value::Boolean(true) => "true()".to_string(),
        Value::Boolean(false) => "false()".to_string(),
        Value::Date(d) => format!("xs:dateTime('{}')", Value::format_date(d)),
    })
}

fn write_order(out: &mut String, order: &[Order]) {
    for (i, entry) in order.iter().enumerate() {
        out.push_str(if i == 0 { " order by " } else { ", " });
        out.push_str(&entry.key.to_string());
        out.push_str(match entry.direction {
            Direction::Ascending => " ascending",
            Direction::Descending => " descending",
        });
    }
}
