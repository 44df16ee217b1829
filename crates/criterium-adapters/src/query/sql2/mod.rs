//! JCR-SQL2 backend.
//!
//! ```text
//! SELECT a.* FROM [<type>] AS a WHERE <condition> ORDER BY <key> <direction>, ...
//! ```
//!
//! Every predicate refers to the single selector `a`. Junction children
//! are always parenthesized, so the text never depends on operator
//! precedence. A base path becomes an `ISDESCENDANTNODE` conjunct in
//! front of the criterion.

use criterium_common::types::{QueryLanguage, Value};
use criterium_common::utils::error::Result;
use criterium_core::criterion::property::is_root;
use criterium_core::criterion::{
    CompareOp, Direction, Lowered, Order, OrderKey, Predicate, Property, lower,
};
use tracing::trace;

use super::literal;
use super::{RenderRequest, Renderer};

/// The selector name.
pub const SELECTOR: &str = "a";

/// Type selected when no node type is given.
const DEFAULT_TYPE: &str = "nt:base";

/// Condition that no node satisfies.
const NEVER: &str = "a.[jcr:primaryType] IS NULL";

/// Renders statements in JCR-SQL2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sql2Renderer;

impl Renderer for Sql2Renderer {
    fn language(&self) -> QueryLanguage {
        QueryLanguage::Sql2
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<String> {
        render(request)
    }
}

/// Renders a request as a JCR-SQL2 statement.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`](criterium_common::utils::error::Error::InvalidArgument)
/// for an illegal node type or a non-finite double. Every criterion has a
/// JCR-SQL2 form.
pub fn render(request: &RenderRequest<'_>) -> Result<String> {
    let node_type = request.checked_node_type()?.unwrap_or(DEFAULT_TYPE);
    let scope = request
        .base_path
        .filter(|p| !is_root(p))
        .map(|path| Predicate::DescendantOf {
            path: path.to_string(),
        });
    let condition = match (scope, lower(request.criterion)) {
        (_, Lowered::Never) => Lowered::Never,
        (None, lowered) => lowered,
        (Some(scope), Lowered::Always) => Lowered::Predicate(scope),
        (Some(scope), Lowered::Predicate(Predicate::And(parts))) => {
            let mut all = Vec::with_capacity(parts.len() + 1);
            all.push(scope);
            all.extend(parts);
            Lowered::Predicate(Predicate::And(all))
        }
        (Some(scope), Lowered::Predicate(p)) => Lowered::Predicate(Predicate::And(vec![scope, p])),
    };

    let mut out = format!("SELECT {SELECTOR}.* FROM [{node_type}] AS {SELECTOR}");
    match condition {
        Lowered::Always => {}
        Lowered::Never => {
            out.push_str(" WHERE ");
            out.push_str(NEVER);
        }
        Lowered::Predicate(p) => {
            out.push_str(" WHERE ");
            write_predicate(&mut out, &p)?;
        }
    }
    write_order(&mut out, request.order);

    trace!(statement = %out, "rendered sql2");
    Ok(out)
}

fn column(property: &Property) -> String {
    if property.is_node() {
        format!("{SELECTOR}.*")
    } else {
        format!("{SELECTOR}.[{}]", property.name())
    }
}

fn operator(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Ne => "<>",
        other => other.symbol(),
    }
}

fn write_predicate(out: &mut String, predicate: &Predicate) -> Result<()> {
    match predicate {
        Predicate::Compare {
            property,
            op,
            value,
        } => {
            out.push_str(&column(property));
            out.push(' ');
            out.push_str(operator(*op));
            out.push(' ');
            out.push_str(&value_literal(value)?);
        }
        Predicate::Like { property, pattern } => {
            out.push_str(&column(property));
            out.push_str(" LIKE ");
            out.push_str(&literal::string(&pattern.render('%', '_', '\\')));
        }
        Predicate::Contains { property, text } => {
            out.push_str(&format!(
                "CONTAINS({}, {})",
                column(property),
                literal::string(text)
            ));
        }
        Predicate::NullCheck { property, not_null } => {
            out.push_str(&column(property));
            out.push_str(if *not_null { " IS NOT NULL" } else { " IS NULL" });
        }
        Predicate::DescendantOf { path } => {
            out.push_str(&format!(
                "ISDESCENDANTNODE({SELECTOR}, {})",
                literal::string(path)
            ));
        }
        Predicate::Not(inner) => {
            out.push_str("NOT (");
            write_predicate(out, inner)?;
            out.push(')');
        }
        Predicate::And(parts) => write_junction(out, parts, " AND ")?,
        Predicate::Or(parts) => write_junction(out, parts, " OR ")?,
    }
    Ok(())
}

fn write_junction(out: &mut String, parts: &[Predicate], joiner: &str) -> Result<()> {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push_str(joiner);
        }
        out.push('(');
        write_predicate(out, part)?;
        out.push(')');
    }
    Ok(())
}

fn value_literal(value: &Value) -> Result<String> {
    Ok(match value {
        Value::String(s) => literal::string(s),
        Value::Long(v) => literal::long(*v),
        Value::Double(v) => literal::double(*v)?,
        Value::Boolean(v) => format!("CAST('{v}' AS BOOLEAN)"),
        Value::Date(d) => format!("CAST('{}' AS DATE)", Value::format_date(d)),
    })
}

fn write_order(out: &mut String, order: &[Order]) {
    for (i, entry) in order.iter().enumerate() {
        out.push_str(if i == 0 { " ORDER BY " } else { ", " });
        match &entry.key {
            OrderKey::Score => out.push_str(&format!("SCORE({SELECTOR})")),
            OrderKey::Property(p) => out.push_str(&column(p)),
        }
        out.push_str(match entry.direction {
            Direction::Ascending => " ASC",
            Direction::Descending => " DESC",
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use criterium_core::criterion::restrictions::*;
    use criterium_core::criterion::{Criterion, MatchMode};

    fn sql2(c: &Criterion) -> String {
        render(&RenderRequest::new(c)).unwrap()
    }

    const ALL: &str = "SELECT a.* FROM [nt:base] AS a";

    #[test]
    fn test_empty_criteria() {
        assert_eq!(sql2(&and([])), ALL);
        assert_eq!(
            sql2(&or([])),
            format!("{ALL} WHERE a.[jcr:primaryType] IS NULL")
        );
    }

    #[test]
    fn test_comparisons_and_literals() {
        assert_eq!(sql2(&eq("@a", "it's").unwrap()), format!("{ALL} WHERE a.[a] = 'it''s'"));
        assert_eq!(sql2(&ne("@a", 5).unwrap()), format!("{ALL} WHERE a.[a] <> 5"));
        assert_eq!(
            sql2(&eq("@a", false).unwrap()),
            format!("{ALL} WHERE a.[a] = CAST('false' AS BOOLEAN)")
        );
        let date = NaiveDate::from_ymd_opt(2019, 1, 8).unwrap();
        assert_eq!(
            sql2(&le("@date", date).unwrap()),
            format!("{ALL} WHERE a.[date] <= CAST('2019-01-08T00:00:00.000Z' AS DATE)")
        );
    }

    #[test]
    fn test_functions_and_null_checks() {
        assert_eq!(
            sql2(&like("@title", "a_b", MatchMode::Anywhere).unwrap()),
            format!("{ALL} WHERE a.[title] LIKE '%a\\_b%'")
        );
        assert_eq!(
            sql2(&contains(".", "news").unwrap()),
            format!("{ALL} WHERE CONTAINS(a.*, 'news')")
        );
        assert_eq!(
            sql2(&contains("@body", "it's").unwrap()),
            format!("{ALL} WHERE CONTAINS(a.[body], 'it''s')")
        );
        assert_eq!(
            sql2(&is_not_null("@a").unwrap()),
            format!("{ALL} WHERE a.[a] IS NOT NULL")
        );
        assert_eq!(sql2(&is_null("@a").unwrap()), format!("{ALL} WHERE a.[a] IS NULL"));
    }

    #[test]
    fn test_full_parenthesization() {
        let c = and([
            eq("@a", 1).unwrap(),
            or([eq("@b", 1).unwrap(), not(eq("@c", 1).unwrap())]),
        ]);
        assert_eq!(
            sql2(&c),
            format!("{ALL} WHERE (a.[a] = 1) AND ((a.[b] = 1) OR (NOT (a.[c] = 1)))")
        );
        assert_eq!(
            sql2(&between("@n", 4, 8).unwrap()),
            format!("{ALL} WHERE (a.[n] >= 4) AND (a.[n] <= 8)")
        );
    }

    #[test]
    fn test_descendant_of_composes() {
        let c = or([
            descendant_of("/a").unwrap(),
            not(descendant_of("/b").unwrap()),
        ]);
        assert_eq!(
            sql2(&c),
            format!("{ALL} WHERE (ISDESCENDANTNODE(a, '/a')) OR (NOT (ISDESCENDANTNODE(a, '/b')))")
        );
    }

    #[test]
    fn test_base_path_is_first_conjunct() {
        let c = and([eq("@x", 1).unwrap(), eq("@y", 2).unwrap()]);
        let request = RenderRequest::new(&c)
            .with_base_path(Some("/node1"))
            .with_node_type(Some("nt:unstructured"));
        assert_eq!(
            render(&request).unwrap(),
            "SELECT a.* FROM [nt:unstructured] AS a WHERE (ISDESCENDANTNODE(a, '/node1')) AND (a.[x] = 1) AND (a.[y] = 2)"
        );

        let all = and([]);
        let scoped = RenderRequest::new(&all).with_base_path(Some("/node1"));
        assert_eq!(
            render(&scoped).unwrap(),
            format!("{ALL} WHERE ISDESCENDANTNODE(a, '/node1')")
        );
        let root = RenderRequest::new(&all).with_base_path(Some("/"));
        assert_eq!(render(&root).unwrap(), ALL);
    }

    #[test]
    fn test_ordering() {
        let order = [Order::desc("@long").unwrap(), Order::by_score()];
        let all = and([]);
        let request = RenderRequest::new(&all).with_order(&order);
        assert_eq!(
            render(&request).unwrap(),
            format!("{ALL} ORDER BY a.[long] DESC, SCORE(a) DESC")
        );
    }
}
