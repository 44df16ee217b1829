//! Property references and repository paths.

use std::fmt;
use std::sync::Arc;

use criterium_common::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Characters that would let a property name escape its clause in either
/// grammar.
const FORBIDDEN: &[char] = &[
    '[', ']', '\'', '"', '/', '@', '(', ')', ',', '=', '<', '>', '!', '*', '|',
];

/// The name that stands for the node itself (full-text over all properties).
const NODE: &str = ".";

/// A reference to a node property.
///
/// Accepts both `name` and the attribute form `@name`; the `@` is not
/// stored. Validation happens here, so a criterion holding a `Property`
/// always renders to a well-formed clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Property(Arc<str>);

impl Property {
    /// Creates a property reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for empty names and names that
    /// contain quoting, bracket, path, or operator characters.
    pub fn new(name: &str) -> Result<Self> {
        let trimmed = name.strip_prefix('@').unwrap_or(name);
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument(
                "property name must not be empty".to_string(),
            ));
        }
        if trimmed == NODE {
            return Ok(Self(NODE.into()));
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || FORBIDDEN.contains(c))
        {
            return Err(Error::InvalidArgument(format!(
                "property name {name:?} contains illegal character {c:?}"
            )));
        }
        Ok(Self(trimmed.into()))
    }

    /// The node itself, for node-wide full-text containment.
    #[must_use]
    pub fn node() -> Self {
        Self(NODE.into())
    }

    /// Returns the bare property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns true if this references the node rather than a property.
    #[must_use]
    pub fn is_node(&self) -> bool {
        &*self.0 == NODE
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_node() {
            f.write_str(NODE)
        } else {
            write!(f, "@{}", self.0)
        }
    }
}

impl TryFrom<String> for Property {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        Property::new(&name)
    }
}

impl From<Property> for String {
    fn from(property: Property) -> Self {
        property.to_string()
    }
}

/// Conversion into a validated [`Property`].
pub trait IntoProperty {
    /// Performs the conversion.
    fn into_property(self) -> Result<Property>;
}

impl IntoProperty for Property {
    fn into_property(self) -> Result<Property> {
        Ok(self)
    }
}

impl IntoProperty for &Property {
    fn into_property(self) -> Result<Property> {
        Ok(self.clone())
    }
}

impl IntoProperty for &str {
    fn into_property(self) -> Result<Property> {
        Property::new(self)
    }
}

impl IntoProperty for String {
    fn into_property(self) -> Result<Property> {
        Property::new(&self)
    }
}

impl IntoProperty for &String {
    fn into_property(self) -> Result<Property> {
        Property::new(self)
    }
}

/// Suffix some callers append to mean "every element below".
const ALL_ELEMENTS: &str = "//*";

/// Normalizes an absolute repository path.
///
/// Strips an "all elements" suffix and trailing slashes; the root stays `/`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for relative paths and paths that
/// contain a quote.
pub fn normalize_path(path: &str) -> Result<String> {
    let path = path.trim();
    if !path.starts_with('/') {
        return Err(Error::InvalidArgument(format!(
            "path {path:?} must be absolute"
        )));
    }
    if path.contains('\'') {
        return Err(Error::InvalidArgument(format!(
            "path {path:?} must not contain quotes"
        )));
    }
    let path = path.strip_suffix(ALL_ELEMENTS).unwrap_or(path);
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(path.to_string())
    }
}

/// Returns true for the root path, which scopes nothing.
#[must_use]
pub fn is_root(path: &str) -> bool {
    path == "/"
}
