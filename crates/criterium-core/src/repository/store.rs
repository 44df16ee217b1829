//! Hierarchical node storage.

use std::sync::Arc;

use criterium_common::types::Value;
use criterium_common::utils::error::{Error, Result};
use hashbrown::HashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::criterion::Property;
use crate::criterion::property::normalize_path;

/// Primary type given to nodes created without one.
pub const NT_UNSTRUCTURED: &str = "nt:unstructured";

/// The supertype of every node type.
pub const NT_BASE: &str = "nt:base";

/// The root path.
pub const ROOT: &str = "/";

/// A stored node.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    path: Arc<str>,
    primary_type: Arc<str>,
    properties: IndexMap<Arc<str>, Value>,
    children: Vec<Arc<str>>,
}

impl MemoryNode {
    fn new(path: &str, primary_type: &str) -> Self {
        Self {
            path: path.into(),
            primary_type: primary_type.into(),
            properties: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// The absolute path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment; empty for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// The primary node type.
    #[must_use]
    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    /// Reads a property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// All properties in the order they were first set.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (&**k, v))
    }
}

/// A node description used to bulk-load a repository, e.g. from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Absolute path; the parent must already exist or be listed earlier.
    pub path: String,
    /// Primary type; defaults to `nt:unstructured`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub primary_type: Option<String>,
    /// Properties in declaration order.
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

/// An in-memory content repository.
///
/// Nodes form a tree under `/`. The root is `nt:unstructured`. Reads and
/// writes may happen from any thread.
pub struct MemoryRepository {
    nodes: RwLock<HashMap<Arc<str>, Arc<MemoryNode>>>,
}

impl MemoryRepository {
    /// Creates a repository holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            Arc::from(ROOT),
            Arc::new(MemoryNode::new(ROOT, NT_UNSTRUCTURED)),
        );
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Adds an `nt:unstructured` child and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the parent does not exist, the
    /// name is malformed, or the child already exists.
    pub fn add_node(&self, parent: &str, name: &str) -> Result<String> {
        self.add_typed_node(parent, name, NT_UNSTRUCTURED)
    }

    /// Adds a child of the given primary type and returns its path.
    ///
    /// # Errors
    ///
    /// See [`add_node`](Self::add_node).
    pub fn add_typed_node(&self, parent: &str, name: &str, primary_type: &str) -> Result<String> {
        if name.is_empty() || name.contains(['/', '\'', '[', ']']) {
            return Err(Error::InvalidArgument(format!("illegal node name {name:?}")));
        }
        let parent = normalize_path(parent)?;
        let path = if parent == ROOT {
            format!("/{name}")
        } else {
            format!("{parent}/{name}")
        };

        let mut nodes = self.nodes.write();
        if nodes.contains_key(path.as_str()) {
            return Err(Error::InvalidArgument(format!("node {path} already exists")));
        }
        let parent_node = nodes
            .get_mut(parent.as_str())
            .ok_or_else(|| Error::InvalidArgument(format!("parent {parent} does not exist")))?;
        let key: Arc<str> = Arc::from(path.as_str());
        Arc::make_mut(parent_node).children.push(Arc::clone(&key));
        nodes.insert(key, Arc::new(MemoryNode::new(&path, primary_type)));
        Ok(path)
    }

    /// Sets a property on an existing node, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a missing node or an invalid
    /// property name.
    pub fn set_property(&self, path: &str, name: &str, value: impl Into<Value>) -> Result<()> {
        let property = Property::new(name)?;
        if property.is_node() {
            return Err(Error::InvalidArgument(
                "\".\" is not a property name".to_string(),
            ));
        }
        let mut nodes = self.nodes.write();
        let node = nodes
            .get_mut(path)
            .ok_or_else(|| Error::InvalidArgument(format!("node {path} does not exist")))?;
        Arc::make_mut(node)
            .properties
            .insert(property.name().into(), value.into());
        Ok(())
    }

    /// Creates the nodes described by `specs`, in order.
    ///
    /// The root may be listed to set its properties; its type is fixed.
    ///
    /// # Errors
    ///
    /// Fails on the first node that cannot be added; earlier nodes stay.
    pub fn load<'a>(&self, specs: impl IntoIterator<Item = &'a NodeSpec>) -> Result<()> {
        for spec in specs {
            let path = normalize_path(&spec.path)?;
            if path != ROOT {
                let (parent, name) = path.rsplit_once('/').unwrap_or(("", path.as_str()));
                let parent = if parent.is_empty() { ROOT } else { parent };
                let primary_type = spec.primary_type.as_deref().unwrap_or(NT_UNSTRUCTURED);
                self.add_typed_node(parent, name, primary_type)?;
            }
            for (name, value) in &spec.properties {
                self.set_property(&path, name, value.clone())?;
            }
        }
        Ok(())
    }

    /// Returns a snapshot of a node.
    #[must_use]
    pub fn node(&self, path: &str) -> Option<Arc<MemoryNode>> {
        self.nodes.read().get(path).cloned()
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Snapshot of all nodes in document order: depth first, children in
    /// the order they were added.
    #[must_use]
    pub fn document_order(&self) -> Vec<Arc<MemoryNode>> {
        let nodes = self.nodes.read();
        let mut out = Vec::with_capacity(nodes.len());
        let mut stack: Vec<Arc<str>> = vec![Arc::from(ROOT)];
        while let Some(path) = stack.pop() {
            if let Some(node) = nodes.get(&path) {
                stack.extend(node.children.iter().rev().cloned());
                out.push(Arc::clone(node));
            }
        }
        out
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}
