//! Lowering of criteria to a canonical predicate tree.
//!
//! Renderers never see a [`Criterion`](super::Criterion) directly. They see
//! the output of [`lower`], which has desugared ranges and set membership,
//! resolved match modes into [`LikePattern`]s, and folded away the
//! constant cases:
//!
//! | Input                              | Lowers to            |
//! |------------------------------------|----------------------|
//! | empty conjunction                  | `Always`             |
//! | empty disjunction, empty `in(..)`  | `Never`              |
//! | `isDescendantOf('/')`              | `Always`             |
//! | `and(.., Never, ..)`               | `Never`              |
//! | `or(.., Always, ..)`               | `Always`             |
//! | `not(not(p))`                      | `p`                  |
//! | single-clause junction             | the clause           |
//!
//! Nested junctions keep their shape; only constants are removed.

use std::fmt;

use criterium_common::types::Value;

use super::match_mode::LikePattern;
use super::property::{Property, is_root};
use super::{CompareOp, Criterion, JunctionKind};

/// A canonical predicate with no constant subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// `property op value`.
    Compare {
        /// The property compared.
        property: Property,
        /// The operator.
        op: CompareOp,
        /// The operand.
        value: Value,
    },
    /// LIKE against an anchored pattern.
    Like {
        /// The property matched.
        property: Property,
        /// The pattern, anchored but not yet escaped.
        pattern: LikePattern,
    },
    /// Full-text containment.
    Contains {
        /// The property searched, or the node itself.
        property: Property,
        /// The search text.
        text: String,
    },
    /// Presence or absence of a property.
    NullCheck {
        /// The property checked.
        property: Property,
        /// True for "is not null".
        not_null: bool,
    },
    /// Strictly below a non-root path.
    DescendantOf {
        /// The ancestor path.
        path: String,
    },
    /// Negation.
    Not(Box<Predicate>),
    /// Conjunction of at least two predicates.
    And(Vec<Predicate>),
    /// Disjunction of at least two predicates.
    Or(Vec<Predicate>),
}

/// The result of lowering: a predicate, or a constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lowered {
    /// Matches every node.
    Always,
    /// Matches no node.
    Never,
    /// Matches the nodes the predicate accepts.
    Predicate(Predicate),
}

impl Lowered {
    /// Returns the predicate, or `None` for a constant.
    #[must_use]
    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            Lowered::Predicate(p) => Some(p),
            _ => None,
        }
    }

    /// Returns true if this matches every node.
    #[must_use]
    pub fn is_always(&self) -> bool {
        matches!(self, Lowered::Always)
    }

    /// Returns true if this matches no node.
    #[must_use]
    pub fn is_never(&self) -> bool {
        matches!(self, Lowered::Never)
    }

    fn negate(self) -> Self {
        match self {
            Lowered::Always => Lowered::Never,
            Lowered::Never => Lowered::Always,
            Lowered::Predicate(Predicate::Not(inner)) => Lowered::Predicate(*inner),
            Lowered::Predicate(p) => Lowered::Predicate(Predicate::Not(Box::new(p))),
        }
    }
}

/// Lowers a criterion tree.
#[must_use]
pub fn lower(criterion: &Criterion) -> Lowered {
    match criterion {
        Criterion::Comparison {
            property,
            op,
            value,
        } => Lowered::Predicate(Predicate::Compare {
            property: property.clone(),
            op: *op,
            value: value.clone(),
        }),
        Criterion::Range {
            property,
            lower,
            upper,
        } => Lowered::Predicate(Predicate::And(vec![
            Predicate::Compare {
                property: property.clone(),
                op: CompareOp::Ge,
                value: lower.clone(),
            },
            Predicate::Compare {
                property: property.clone(),
                op: CompareOp::Le,
                value: upper.clone(),
            },
        ])),
        Criterion::PatternMatch {
            property,
            value,
            match_mode,
        } => Lowered::Predicate(Predicate::Like {
            property: property.clone(),
            pattern: match_mode.resolve(value),
        }),
        Criterion::NullCheck { property, not_null } => Lowered::Predicate(Predicate::NullCheck {
            property: property.clone(),
            not_null: *not_null,
        }),
        Criterion::SetMembership { property, values } => {
            let terms = values.iter().map(|v| Predicate::Contains {
                property: property.clone(),
                text: v.clone(),
            });
            fold(JunctionKind::Or, terms.map(Lowered::Predicate))
        }
        Criterion::Containment { property, value } => Lowered::Predicate(Predicate::Contains {
            property: property.clone(),
            text: value.clone(),
        }),
        Criterion::DescendantOf { path } if is_root(path) => Lowered::Always,
        Criterion::DescendantOf { path } => {
            Lowered::Predicate(Predicate::DescendantOf { path: path.clone() })
        }
        Criterion::Not { inner } => lower(inner).negate(),
        Criterion::Junction(junction) => {
            fold(junction.kind(), junction.clauses().iter().map(lower))
        }
    }
}

fn fold(kind: JunctionKind, parts: impl Iterator<Item = Lowered>) -> Lowered {
    // The absorbing constant short-circuits; the identity is dropped.
    let (absorbing, identity) = match kind {
        JunctionKind::And => (Lowered::Never, Lowered::Always),
        JunctionKind::Or => (Lowered::Always, Lowered::Never),
    };
    let mut kept = Vec::new();
    for part in parts {
        match part {
            Lowered::Predicate(p) => kept.push(p),
            constant if constant == absorbing => return absorbing,
            _ => {}
        }
    }
    match kept.len() {
        0 => identity,
        1 => kept.pop().map_or(identity, Lowered::Predicate),
        _ => Lowered::Predicate(match kind {
            JunctionKind::And => Predicate::And(kept),
            JunctionKind::Or => Predicate::Or(kept),
        }),
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare {
                property,
                op,
                value,
            } => write!(f, "{property} {} {value}", op.symbol()),
            Predicate::Like { property, pattern } => write!(f, "like({property}, '{pattern}')"),
            Predicate::Contains { property, text } => write!(f, "contains({property}, '{text}')"),
            Predicate::NullCheck {
                property,
                not_null: true,
            } => write!(f, "{property} is not null"),
            Predicate::NullCheck {
                property,
                not_null: false,
            } => write!(f, "{property} is null"),
            Predicate::DescendantOf { path } => write!(f, "isDescendantOf('{path}')"),
            Predicate::Not(inner) => write!(f, "not({inner})"),
            Predicate::And(parts) => write_joined(f, parts, " and "),
            Predicate::Or(parts) => write_joined(f, parts, " or "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[Predicate], joiner: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(joiner)?;
        }
        write!(f, "{part}")?;
    }
    f.write_str(")")
}
