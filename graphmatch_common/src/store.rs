//! The graph store collaborator.
//!
//! The matcher never owns graph data. Everything it needs from the
//! underlying property graph goes through [`GraphStore`], which any storage
//! backend can implement. [`crate::MemoryGraph`] is the reference
//! implementation used by the tests.

use std::fmt::{self, Debug};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::{StoreError, Value};

/// Direction of a relationship relative to one of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// The node is the start of the relationship.
    Outgoing,
    /// The node is the end of the relationship.
    Incoming,
    /// Either endpoint.
    Both,
}

impl Direction {
    /// The same relationship seen from the other endpoint.
    pub const fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}

/// Name of a relationship type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelType(String);

impl RelType {
    /// Create a relationship type from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only view of a property graph.
///
/// Implementations are expected to give a stable view for as long as a
/// search borrows them; transaction scoping is the implementor's concern.
pub trait GraphStore {
    /// Node identity. Equality is node identity.
    type NodeId: Copy + Eq + Hash + Debug;
    /// Relationship identity. Equality is relationship identity.
    type RelId: Copy + Eq + Hash + Debug;

    /// Relationships incident to `node`, filtered by type (`None` means any
    /// type) and by direction relative to `node`.
    ///
    /// A self-loop is reported once, whatever the direction filter.
    fn relationships(
        &self,
        node: Self::NodeId,
        rel_type: Option<&RelType>,
        direction: Direction,
    ) -> Result<Vec<Self::RelId>, StoreError>;

    /// Read a node property. `Ok(None)` means the property is not set.
    fn node_property(&self, node: Self::NodeId, key: &str) -> Result<Option<Value>, StoreError>;

    /// Read a relationship property. `Ok(None)` means the property is not set.
    fn relationship_property(
        &self,
        rel: Self::RelId,
        key: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// `(start, end)` of a relationship.
    fn endpoints(&self, rel: Self::RelId) -> Result<(Self::NodeId, Self::NodeId), StoreError>;

    /// Type of a relationship.
    fn relationship_type(&self, rel: Self::RelId) -> Result<RelType, StoreError>;

    /// The node at the other end of `rel`, seen from `node`.
    fn other_node(
        &self,
        rel: Self::RelId,
        node: Self::NodeId,
    ) -> Result<Self::NodeId, StoreError> {
        let (start, end) = self.endpoints(rel)?;
        if start == node {
            Ok(end)
        } else if end == node {
            Ok(start)
        } else {
            Err(StoreError::backend(format!(
                "{node:?} is not an endpoint of relationship {rel:?}"
            )))
        }
    }
}

impl<G: GraphStore + ?Sized> GraphStore for &G {
    type NodeId = G::NodeId;
    type RelId = G::RelId;

    fn relationships(
        &self,
        node: Self::NodeId,
        rel_type: Option<&RelType>,
        direction: Direction,
    ) -> Result<Vec<Self::RelId>, StoreError> {
        (**self).relationships(node, rel_type, direction)
    }

    fn node_property(&self, node: Self::NodeId, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).node_property(node, key)
    }

    fn relationship_property(
        &self,
        rel: Self::RelId,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        (**self).relationship_property(rel, key)
    }

    fn endpoints(&self, rel: Self::RelId) -> Result<(Self::NodeId, Self::NodeId), StoreError> {
        (**self).endpoints(rel)
    }

    fn relationship_type(&self, rel: Self::RelId) -> Result<RelType, StoreError> {
        (**self).relationship_type(rel)
    }

    fn other_node(
        &self,
        rel: Self::RelId,
        node: Self::NodeId,
    ) -> Result<Self::NodeId, StoreError> {
        (**self).other_node(rel, node)
    }
}
