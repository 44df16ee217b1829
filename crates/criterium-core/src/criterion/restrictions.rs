//! Constructors for criteria.
//!
//! Every constructor that takes a property validates it immediately and
//! returns [`Error::InvalidArgument`] on malformed input; nothing is
//! deferred to render time.

use std::cmp::Ordering;

use criterium_common::types::Value;
use criterium_common::utils::error::{Error, Result};

use super::property::{IntoProperty, Property, normalize_path};
use super::{CompareOp, Criterion, Junction, JunctionKind, MatchMode};

/// Validates a property reference. Shorthand for `Property::new`.
pub fn attr(name: &str) -> Result<Property> {
    Property::new(name)
}

fn named(property: impl IntoProperty) -> Result<Property> {
    let property = property.into_property()?;
    if property.is_node() {
        return Err(Error::InvalidArgument(
            "the node itself can only be used for containment".to_string(),
        ));
    }
    Ok(property)
}

/// `property op value`.
pub fn compare(
    property: impl IntoProperty,
    op: CompareOp,
    value: impl Into<Value>,
) -> Result<Criterion> {
    Ok(Criterion::Comparison {
        property: named(property)?,
        op,
        value: value.into(),
    })
}

/// `property = value`.
pub fn eq(property: impl IntoProperty, value: impl Into<Value>) -> Result<Criterion> {
    compare(property, CompareOp::Eq, value)
}

/// `property != value`.
pub fn ne(property: impl IntoProperty, value: impl Into<Value>) -> Result<Criterion> {
    compare(property, CompareOp::Ne, value)
}

/// `property < value`.
pub fn lt(property: impl IntoProperty, value: impl Into<Value>) -> Result<Criterion> {
    compare(property, CompareOp::Lt, value)
}

/// `property <= value`.
pub fn le(property: impl IntoProperty, value: impl Into<Value>) -> Result<Criterion> {
    compare(property, CompareOp::Le, value)
}

/// `property > value`.
pub fn gt(property: impl IntoProperty, value: impl Into<Value>) -> Result<Criterion> {
    compare(property, CompareOp::Gt, value)
}

/// `property >= value`.
pub fn ge(property: impl IntoProperty, value: impl Into<Value>) -> Result<Criterion> {
    compare(property, CompareOp::Ge, value)
}

/// Inclusive range: `lower <= property <= upper`.
///
/// # Errors
///
/// Fails when the bounds have different types, or are comparable and
/// `lower > upper`. Boolean bounds are rejected as they have no order.
pub fn between(
    property: impl IntoProperty,
    lower: impl Into<Value>,
    upper: impl Into<Value>,
) -> Result<Criterion> {
    let property = named(property)?;
    let lower = lower.into();
    let upper = upper.into();
    if matches!(lower, Value::Boolean(_)) || matches!(upper, Value::Boolean(_)) {
        return Err(Error::InvalidArgument(format!(
            "between({property}) needs ordered bounds, got booleans"
        )));
    }
    match lower.compare(&upper) {
        Some(Ordering::Greater) => Err(Error::InvalidArgument(format!(
            "between({property}): lower bound {lower} exceeds upper bound {upper}"
        ))),
        Some(_) => Ok(Criterion::Range {
            property,
            lower,
            upper,
        }),
        None => Err(Error::InvalidArgument(format!(
            "between({property}): bounds {} and {} are not comparable",
            lower.type_name(),
            upper.type_name()
        ))),
    }
}

/// Pattern match anchored by `mode`.
pub fn like(
    property: impl IntoProperty,
    value: impl Into<String>,
    mode: MatchMode,
) -> Result<Criterion> {
    Ok(Criterion::PatternMatch {
        property: named(property)?,
        value: value.into(),
        match_mode: mode,
    })
}

/// The property is absent.
pub fn is_null(property: impl IntoProperty) -> Result<Criterion> {
    Ok(Criterion::NullCheck {
        property: named(property)?,
        not_null: false,
    })
}

/// The property is present.
pub fn is_not_null(property: impl IntoProperty) -> Result<Criterion> {
    Ok(Criterion::NullCheck {
        property: named(property)?,
        not_null: true,
    })
}

/// The property is absent or `false`.
pub fn is_falsy(property: impl IntoProperty) -> Result<Criterion> {
    let property = named(property)?;
    Ok(or([
        is_null(&property)?,
        eq(&property, false)?,
    ]))
}

/// The property's text contains any of `values`.
pub fn in_values<S: Into<String>>(
    property: impl IntoProperty,
    values: impl IntoIterator<Item = S>,
) -> Result<Criterion> {
    Ok(Criterion::SetMembership {
        property: named(property)?,
        values: values.into_iter().map(Into::into).collect(),
    })
}

/// Full-text containment. Use `"."` to search the whole node.
pub fn contains(property: impl IntoProperty, value: impl Into<String>) -> Result<Criterion> {
    Ok(Criterion::Containment {
        property: property.into_property()?,
        value: value.into(),
    })
}

/// The node lies strictly below `path`.
///
/// # Errors
///
/// Fails for relative paths.
pub fn descendant_of(path: &str) -> Result<Criterion> {
    Ok(Criterion::DescendantOf {
        path: normalize_path(path)?,
    })
}

/// Negates a criterion.
#[must_use]
pub fn not(criterion: Criterion) -> Criterion {
    Criterion::Not {
        inner: Box::new(criterion),
    }
}

/// Conjunction of all given criteria.
pub fn and(criteria: impl IntoIterator<Item = Criterion>) -> Criterion {
    junction(JunctionKind::And, criteria)
}

/// Disjunction of all given criteria.
pub fn or(criteria: impl IntoIterator<Item = Criterion>) -> Criterion {
    junction(JunctionKind::Or, criteria)
}

fn junction(kind: JunctionKind, criteria: impl IntoIterator<Item = Criterion>) -> Criterion {
    let mut junction = Junction::new(kind);
    for criterion in criteria {
        junction.push(criterion);
    }
    Criterion::Junction(junction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fail_fast_on_bad_property() {
        assert!(matches!(eq("", 1), Err(Error::InvalidArgument(_))));
        assert!(matches!(is_null("@"), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            like("a'b", "x", MatchMode::Start),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_node_only_for_containment() {
        assert!(contains(".", "text").is_ok());
        assert!(eq(".", "text").is_err());
        assert!(is_not_null(".").is_err());
    }

    #[test]
    fn test_between_checks_bounds() {
        assert!(between("@long", 4, 8).is_ok());
        assert!(between("@long", 4, 4).is_ok());
        assert!(between("@long", 4, 8.5).is_ok());
        assert!(matches!(
            between("@long", 8, 4),
            Err(Error::InvalidArgument(_))
        ));
        assert!(between("@long", 4, "8").is_err());
        assert!(between("@flag", false, true).is_err());

        let lo = NaiveDate::from_ymd_opt(2019, 1, 5).unwrap();
        let hi = NaiveDate::from_ymd_opt(2019, 1, 8).unwrap();
        assert!(between("@date", lo, hi).is_ok());
        assert!(between("@date", hi, lo).is_err());
    }

    #[test]
    fn test_descendant_of_normalizes() {
        assert_eq!(
            descendant_of("/a/b//*").unwrap(),
            Criterion::DescendantOf {
                path: "/a/b".to_string()
            }
        );
        assert!(descendant_of("a").is_err());
    }

    #[test]
    fn test_is_falsy_is_a_disjunction() {
        let c = is_falsy("@a").unwrap();
        let Criterion::Junction(j) = c else {
            panic!("expected junction");
        };
        assert_eq!(j.kind(), JunctionKind::Or);
        assert_eq!(j.clauses().len(), 2);
    }
}
