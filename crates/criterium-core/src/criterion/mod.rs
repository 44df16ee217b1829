//! The condition model.
//!
//! A [`Criterion`] is a node in a boolean predicate tree. Atomic nodes
//! compare a property against values; [`Junction`]s and `Not` combine
//! other nodes to arbitrary depth. Nothing here is executable: the tree
//! only carries intent, and is rendered to text by a backend after being
//! [lowered](lower) to a [`Predicate`](lower::Predicate).
//!
//! Construct nodes with the functions in [`restrictions`]; they validate
//! their input, so every `Criterion` value is well formed.

pub mod lower;
pub mod match_mode;
pub mod order;
pub mod property;
pub mod restrictions;

use std::fmt;

use criterium_common::types::Value;
use criterium_common::utils::error::Error;
use serde::{Deserialize, Serialize};

pub use lower::{Lowered, Predicate, lower};
pub use match_mode::{LikePattern, MatchMode};
pub use order::{Direction, Order, OrderKey, OrderSpec};
pub use property::{IntoProperty, Property};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CompareOp {
    /// Returns the operator's symbol in the path grammar.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// The connective of a [`Junction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionKind {
    /// All clauses must hold. An empty conjunction matches everything.
    And,
    /// Any clause must hold. An empty disjunction matches nothing.
    Or,
}

/// An ordered list of clauses joined by one connective.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Junction {
    connective: JunctionKind,
    #[serde(default)]
    clauses: Vec<Criterion>,
}

impl Junction {
    /// Creates an empty junction.
    #[must_use]
    pub fn new(connective: JunctionKind) -> Self {
        Self {
            connective,
            clauses: Vec::new(),
        }
    }

    /// Creates an empty conjunction.
    #[must_use]
    pub fn conjunction() -> Self {
        Self::new(JunctionKind::And)
    }

    /// Creates an empty disjunction.
    #[must_use]
    pub fn disjunction() -> Self {
        Self::new(JunctionKind::Or)
    }

    /// Adds a clause, builder style.
    #[must_use]
    pub fn add(mut self, criterion: Criterion) -> Self {
        self.clauses.push(criterion);
        self
    }

    /// Adds a clause in place.
    pub fn push(&mut self, criterion: Criterion) {
        self.clauses.push(criterion);
    }

    /// Returns the connective.
    #[must_use]
    pub fn kind(&self) -> JunctionKind {
        self.connective
    }

    /// Returns the clauses in insertion order.
    #[must_use]
    pub fn clauses(&self) -> &[Criterion] {
        &self.clauses
    }

    /// Returns true if there are no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl From<Junction> for Criterion {
    fn from(junction: Junction) -> Self {
        Criterion::Junction(junction)
    }
}

/// A node in the condition tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", try_from = "unchecked::Criterion")]
pub enum Criterion {
    /// `property op value`.
    Comparison {
        /// The property compared.
        property: Property,
        /// The operator.
        op: CompareOp,
        /// The operand.
        value: Value,
    },
    /// `lower <= property <= upper`, inclusive on both ends.
    Range {
        /// The property compared.
        property: Property,
        /// Inclusive lower bound.
        lower: Value,
        /// Inclusive upper bound.
        upper: Value,
    },
    /// A LIKE-style pattern match anchored by a match mode.
    PatternMatch {
        /// The property matched.
        property: Property,
        /// The raw literal, without wildcards.
        value: String,
        /// How the literal is anchored.
        match_mode: MatchMode,
    },
    /// Presence (`not_null`) or absence of a property.
    NullCheck {
        /// The property checked.
        property: Property,
        /// True for "is not null".
        not_null: bool,
    },
    /// The property's text contains any of the given terms.
    SetMembership {
        /// The property searched.
        property: Property,
        /// Candidate terms; empty matches nothing.
        values: Vec<String>,
    },
    /// Full-text containment of a search expression.
    Containment {
        /// The property searched, or the node itself.
        property: Property,
        /// The search text.
        value: String,
    },
    /// The node lies strictly below an absolute path.
    DescendantOf {
        /// The ancestor path, normalized.
        path: String,
    },
    /// Negation of exactly one child.
    Not {
        /// The negated criterion.
        inner: Box<Criterion>,
    },
    /// A conjunction or disjunction.
    Junction(Junction),
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Comparison {
                property,
                op,
                value,
            } => write!(f, "{property} {} {value}", op.symbol()),
            Criterion::Range {
                property,
                lower,
                upper,
            } => write!(f, "between({property}, {lower}, {upper})"),
            Criterion::PatternMatch {
                property,
                value,
                match_mode,
            } => write!(f, "like({property}, '{value}', {match_mode})"),
            Criterion::NullCheck {
                property,
                not_null: true,
            } => write!(f, "{property} is not null"),
            Criterion::NullCheck {
                property,
                not_null: false,
            } => write!(f, "{property} is null"),
            Criterion::SetMembership { property, values } => {
                write!(f, "in({property}, [{}])", quoted(values))
            }
            Criterion::Containment { property, value } => {
                write!(f, "contains({property}, '{value}')")
            }
            Criterion::DescendantOf { path } => write!(f, "isDescendantOf('{path}')"),
            Criterion::Not { inner } => write!(f, "not({inner})"),
            Criterion::Junction(junction) => {
                let joiner = match junction.kind() {
                    JunctionKind::And => " and ",
                    JunctionKind::Or => " or ",
                };
                let parts: Vec<String> =
                    junction.clauses().iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(joiner))
            }
        }
    }
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unvalidated mirror of [`Criterion`] used by deserialization, so that
/// criteria read from JSON go through the same checks as the
/// [`restrictions`] constructors.
mod unchecked {
    use super::{CompareOp, Junction, MatchMode, Property};
    use criterium_common::types::Value;
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum Criterion {
        Comparison {
            property: Property,
            op: CompareOp,
            value: Value,
        },
        Range {
            property: Property,
            lower: Value,
            upper: Value,
        },
        PatternMatch {
            property: Property,
            value: String,
            match_mode: MatchMode,
        },
        NullCheck {
            property: Property,
            not_null: bool,
        },
        SetMembership {
            property: Property,
            values: Vec<String>,
        },
        Containment {
            property: Property,
            value: String,
        },
        DescendantOf {
            path: String,
        },
        Not {
            inner: Box<super::Criterion>,
        },
        Junction(Junction),
    }
}

impl TryFrom<unchecked::Criterion> for Criterion {
    type Error = Error;

    fn try_from(raw: unchecked::Criterion) -> Result<Self, Error> {
        use restrictions as r;
        match raw {
            unchecked::Criterion::Comparison {
                property,
                op,
                value,
            } => r::compare(property, op, value),
            unchecked::Criterion::Range {
                property,
                lower,
                upper,
            } => r::between(property, lower, upper),
            unchecked::Criterion::PatternMatch {
                property,
                value,
                match_mode,
            } => r::like(property, value, match_mode),
            unchecked::Criterion::NullCheck {
                property,
                not_null: true,
            } => r::is_not_null(property),
            unchecked::Criterion::NullCheck {
                property,
                not_null: false,
            } => r::is_null(property),
            unchecked::Criterion::SetMembership { property, values } => {
                r::in_values(property, values)
            }
            unchecked::Criterion::Containment { property, value } => r::contains(property, value),
            unchecked::Criterion::DescendantOf { path } => r::descendant_of(&path),
            unchecked::Criterion::Not { inner } => Ok(r::not(*inner)),
            unchecked::Criterion::Junction(junction) => Ok(Criterion::Junction(junction)),
        }
    }
}
