//! In-memory property graph.
//!
//! Adjacency is kept per node in insertion order, so enumeration order of
//! incident relationships (and therefore match order) is deterministic.

use std::fmt;

use contracts::debug_ensures;
use indexmap::IndexMap;
use tracing::trace;

use crate::{Direction, GraphStore, RelType, StoreError, Value};

/// Node handle into a [`MemoryGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Relationship handle into a [`MemoryGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelId(u32);

impl NodeId {
    /// Raw index of the node.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl RelId {
    /// Raw index of the relationship.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for RelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[derive(Clone, Debug, Default)]
struct NodeData {
    properties: IndexMap<String, Value>,
    /// Incident relationships, each listed once (self-loops included).
    relationships: Vec<RelId>,
}

#[derive(Clone, Debug)]
struct RelData {
    start: NodeId,
    end: NodeId,
    rel_type: RelType,
    properties: IndexMap<String, Value>,
}

/// A small, owned property graph.
#[derive(Clone, Debug, Default)]
pub struct MemoryGraph {
    nodes: Vec<NodeData>,
    relationships: Vec<RelData>,
}

impl MemoryGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// All node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// All relationship ids in creation order.
    pub fn relationship_ids(&self) -> impl Iterator<Item = RelId> + '_ {
        (0..self.relationships.len() as u32).map(RelId)
    }

    /// Add a node without properties.
    #[debug_ensures(self.node_count() == old(self.node_count()) + 1)]
    pub fn create_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::default());
        trace!("created node {}", id);
        id
    }

    /// Add a node carrying a `name` property, the convention used by the
    /// test fixtures to make failures readable.
    pub fn create_named_node(&mut self, name: &str) -> NodeId {
        let id = self.create_node();
        self.nodes[id.index()]
            .properties
            .insert("name".to_string(), Value::from(name));
        id
    }

    /// Add a relationship of the given type from `start` to `end`.
    #[debug_ensures(ret.is_err() || self.relationship_count() == old(self.relationship_count()) + 1)]
    pub fn create_relationship(
        &mut self,
        start: NodeId,
        end: NodeId,
        rel_type: impl Into<RelType>,
    ) -> Result<RelId, StoreError> {
        self.node(start)?;
        self.node(end)?;

        let id = RelId(self.relationships.len() as u32);
        let rel_type = rel_type.into();
        trace!("created relationship {} ({})-[{}]->({})", id, start, rel_type, end);
        self.relationships.push(RelData {
            start,
            end,
            rel_type,
            properties: IndexMap::new(),
        });
        self.nodes[start.index()].relationships.push(id);
        if start != end {
            self.nodes[end.index()].relationships.push(id);
        }
        Ok(id)
    }

    /// Set (or overwrite) a node property.
    pub fn set_node_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), StoreError> {
        self.node_mut(node)?
            .properties
            .insert(key.to_string(), value.into());
        Ok(())
    }

    /// Set (or overwrite) a relationship property.
    pub fn set_relationship_property(
        &mut self,
        rel: RelId,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), StoreError> {
        self.relationship_mut(rel)?
            .properties
            .insert(key.to_string(), value.into());
        Ok(())
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, StoreError> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| StoreError::node_not_found(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, StoreError> {
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| StoreError::node_not_found(id))
    }

    fn relationship(&self, id: RelId) -> Result<&RelData, StoreError> {
        self.relationships
            .get(id.index())
            .ok_or_else(|| StoreError::relationship_not_found(id))
    }

    fn relationship_mut(&mut self, id: RelId) -> Result<&mut RelData, StoreError> {
        self.relationships
            .get_mut(id.index())
            .ok_or_else(|| StoreError::relationship_not_found(id))
    }
}

impl GraphStore for MemoryGraph {
    type NodeId = NodeId;
    type RelId = RelId;

    fn relationships(
        &self,
        node: NodeId,
        rel_type: Option<&RelType>,
        direction: Direction,
    ) -> Result<Vec<RelId>, StoreError> {
        let data = self.node(node)?;
        let mut out = Vec::with_capacity(data.relationships.len());
        for &id in &data.relationships {
            let rel = self.relationship(id)?;
            if rel_type.is_some_and(|t| *t != rel.rel_type) {
                continue;
            }
            let keep = match direction {
                Direction::Outgoing => rel.start == node,
                Direction::Incoming => rel.end == node,
                Direction::Both => true,
            };
            if keep {
                out.push(id);
            }
        }
        Ok(out)
    }

    fn node_property(&self, node: NodeId, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.node(node)?.properties.get(key).cloned())
    }

    fn relationship_property(&self, rel: RelId, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.relationship(rel)?.properties.get(key).cloned())
    }

    fn endpoints(&self, rel: RelId) -> Result<(NodeId, NodeId), StoreError> {
        let data = self.relationship(rel)?;
        Ok((data.start, data.end))
    }

    fn relationship_type(&self, rel: RelId) -> Result<RelType, StoreError> {
        Ok(self.relationship(rel)?.rel_type.clone())
    }
}
