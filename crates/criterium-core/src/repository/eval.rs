//! Predicate evaluation against stored nodes.
//!
//! Semantics follow the rendered grammars: a comparison against a
//! missing property is false (so `not(@a = 1)` holds for nodes without
//! `@a`), values only compare within a type family, and containment is
//! word based and case insensitive.

use std::cmp::Ordering;

use criterium_common::types::Value;
use criterium_common::utils::error::{Error, Result};
use hashbrown::HashSet;
use regex::Regex;

use super::store::MemoryNode;
use crate::criterion::{CompareOp, LikePattern, Lowered, Predicate, Property};

/// A predicate prepared for repeated evaluation.
#[derive(Debug)]
pub(crate) enum Matcher {
    Always,
    Never,
    Compare {
        property: Property,
        op: CompareOp,
        value: Value,
    },
    Like {
        property: Property,
        regex: Regex,
    },
    Contains {
        property: Property,
        terms: Vec<String>,
    },
    NullCheck {
        property: Property,
        not_null: bool,
    },
    DescendantOf {
        prefix: String,
    },
    Not(Box<Matcher>),
    And(Vec<Matcher>),
    Or(Vec<Matcher>),
}

impl Matcher {
    /// Prepares a lowered criterion.
    pub(crate) fn new(lowered: &Lowered) -> Result<Self> {
        match lowered {
            Lowered::Always => Ok(Matcher::Always),
            Lowered::Never => Ok(Matcher::Never),
            Lowered::Predicate(p) => Self::compile(p),
        }
    }

    fn compile(predicate: &Predicate) -> Result<Self> {
        Ok(match predicate {
            Predicate::Compare {
                property,
                op,
                value,
            } => Matcher::Compare {
                property: property.clone(),
                op: *op,
                value: value.clone(),
            },
            Predicate::Like { property, pattern } => Matcher::Like {
                property: property.clone(),
                regex: like_regex(pattern)?,
            },
            Predicate::Contains { property, text } => Matcher::Contains {
                property: property.clone(),
                terms: words(text).into_iter().collect(),
            },
            Predicate::NullCheck { property, not_null } => Matcher::NullCheck {
                property: property.clone(),
                not_null: *not_null,
            },
            Predicate::DescendantOf { path } => Matcher::DescendantOf {
                prefix: format!("{path}/"),
            },
            Predicate::Not(inner) => Matcher::Not(Box::new(Self::compile(inner)?)),
            Predicate::And(parts) => {
                Matcher::And(parts.iter().map(Self::compile).collect::<Result<_>>()?)
            }
            Predicate::Or(parts) => {
                Matcher::Or(parts.iter().map(Self::compile).collect::<Result<_>>()?)
            }
        })
    }

    /// Returns true if `node` satisfies the predicate.
    pub(crate) fn matches(&self, node: &MemoryNode) -> bool {
        match self {
            Matcher::Always => true,
            Matcher::Never => false,
            Matcher::Compare {
                property,
                op,
                value,
            } => node
                .property(property.name())
                .is_some_and(|actual| compare(actual, *op, value)),
            Matcher::Like { property, regex } => node
                .property(property.name())
                .is_some_and(|actual| regex.is_match(&lexical(actual))),
            Matcher::Contains { property, terms } => {
                if terms.is_empty() {
                    return false;
                }
                let found: HashSet<String> = if property.is_node() {
                    node.properties().flat_map(|(_, v)| words(&lexical(v))).collect()
                } else {
                    match node.property(property.name()) {
                        Some(v) => words(&lexical(v)),
                        None => return false,
                    }
                };
                terms.iter().all(|t| found.contains(t))
            }
            Matcher::NullCheck { property, not_null } => {
                node.property(property.name()).is_some() == *not_null
            }
            Matcher::DescendantOf { prefix } => node.path().starts_with(prefix.as_str()),
            Matcher::Not(inner) => !inner.matches(node),
            Matcher::And(parts) => parts.iter().all(|m| m.matches(node)),
            Matcher::Or(parts) => parts.iter().any(|m| m.matches(node)),
        }
    }
}

fn compare(actual: &Value, op: CompareOp, operand: &Value) -> bool {
    if let (Value::Boolean(a), Value::Boolean(b)) = (actual, operand) {
        return match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            _ => false,
        };
    }
    let Some(ordering) = actual.compare(operand) else {
        return false;
    };
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    }
}

/// The text form a value is matched in by LIKE and containment.
pub(crate) fn lexical(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string(),
        Value::Long(v) => v.to_string(),
        Value::Double(v) => format!("{v:?}"),
        Value::Boolean(v) => v.to_string(),
        Value::Date(d) => Value::format_date(d),
    }
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn like_regex(pattern: &LikePattern) -> Result<Regex> {
    let mut source = String::from("(?s)^");
    if pattern.leading_wildcard() {
        source.push_str(".*");
    }
    source.push_str(&regex::escape(pattern.literal()));
    if pattern.trailing_wildcard() {
        source.push_str(".*");
    }
    source.push('$');
    Regex::new(&source).map_err(|e| Error::Internal(format!("LIKE pattern {pattern}: {e}")))
}
