//! Result ordering.

use std::fmt;

use criterium_common::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::property::{IntoProperty, Property};

/// The pseudo-property repositories use for the relevance score.
pub const SCORE: &str = "jcr:score";

/// An ordered list of sort keys; the first entry is the primary key.
pub type OrderSpec = SmallVec<[Order; 2]>;

/// What to sort by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderKey {
    /// A stored property.
    Property(Property),
    /// The relevance score of the match.
    Score,
}

impl OrderKey {
    /// Parses a key; `jcr:score` (with or without `@`) is the score.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the name is not a valid property.
    pub fn parse(name: &str) -> Result<Self> {
        Property::new(name).and_then(Self::try_from)
    }
}

impl TryFrom<Property> for OrderKey {
    type Error = Error;

    fn try_from(property: Property) -> Result<Self> {
        if property.is_node() {
            return Err(Error::InvalidArgument(
                "cannot order by the node itself".to_string(),
            ));
        }
        if property.name() == SCORE {
            Ok(OrderKey::Score)
        } else {
            Ok(OrderKey::Property(property))
        }
    }
}

impl TryFrom<String> for OrderKey {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        OrderKey::parse(&name)
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Property(p) => write!(f, "{p}"),
            OrderKey::Score => write!(f, "@{SCORE}"),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Smallest first.
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest first.
    #[serde(alias = "desc")]
    Descending,
}

/// A single sort key with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// What to sort by.
    pub key: OrderKey,
    /// Which way.
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    /// Ascending order on a property, or on the score for `jcr:score`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an invalid property name.
    pub fn asc(key: impl IntoProperty) -> Result<Self> {
        Ok(Self {
            key: OrderKey::try_from(key.into_property()?)?,
            direction: Direction::Ascending,
        })
    }

    /// Descending order on a property, or on the score for `jcr:score`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an invalid property name.
    pub fn desc(key: impl IntoProperty) -> Result<Self> {
        Ok(Self {
            key: OrderKey::try_from(key.into_property()?)?,
            direction: Direction::Descending,
        })
    }

    /// Descending order on the relevance score.
    #[must_use]
    pub fn by_score() -> Self {
        Self {
            key: OrderKey::Score,
            direction: Direction::Descending,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{} asc", self.key),
            Direction::Descending => write!(f, "{} desc", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_marker() {
        assert_eq!(Order::desc("@jcr:score").unwrap(), Order::by_score());
        assert_eq!(OrderKey::parse("jcr:score").unwrap(), OrderKey::Score);
    }

    #[test]
    fn test_property_key() {
        let order = Order::asc("@integer").unwrap();
        assert_eq!(order.direction, Direction::Ascending);
        assert_eq!(order.to_string(), "@integer asc");
        assert!(Order::asc(".").is_err());
        assert!(Order::asc("").is_err());
    }

    #[test]
    fn test_serde_round_trip_through_validation() {
        let order: Order =
            serde_json::from_str(r#"{"key":"@long","direction":"desc"}"#).unwrap();
        assert_eq!(order, Order::desc("long").unwrap());
        assert!(serde_json::from_str::<Order>(r#"{"key":"a b"}"#).is_err());
    }
}
