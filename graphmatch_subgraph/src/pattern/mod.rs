//! The pattern graph: a small query graph of placeholders.
//!
//! Nodes and relationships live in arenas owned by [`PatternGraph`] and are
//! addressed by [`PatternNodeId`] / [`PatternRelId`]. Each node keeps the
//! ids of its incident relationships, each relationship keeps its two
//! endpoint ids, so the graph can be walked in both directions without
//! shared ownership.

mod constraint;
mod node;
mod relationship;

use std::fmt;

use contracts::{debug_ensures, requires};
use graphmatch_common::{NodeId, RelId};

pub use self::constraint::{PropertyConstraints, ValueMatcher};
pub use self::node::PatternNode;
pub use self::relationship::{PatternRelationship, RelationshipSpec};

/// Handle to a node in a [`PatternGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternNodeId(u32);

/// Handle to a relationship in a [`PatternGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternRelId(u32);

impl PatternNodeId {
    /// Raw arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl PatternRelId {
    /// Raw arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PatternNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl fmt::Display for PatternRelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pr{}", self.0)
    }
}

/// A pattern: labelled placeholder nodes joined by typed placeholder
/// relationships, generic over the graph store's identity types.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternGraph<N = NodeId, R = RelId> {
    nodes: Vec<PatternNode<N>>,
    relationships: Vec<PatternRelationship<R>>,
}

impl<N, R> Default for PatternGraph<N, R> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            relationships: Vec::new(),
        }
    }
}

impl<N, R> PatternGraph<N, R> {
    /// Create an empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a labelled node.
    #[debug_ensures(self.node_count() == old(self.node_count()) + 1)]
    pub fn create_node(&mut self, label: impl Into<String>) -> PatternNodeId {
        let id = PatternNodeId(self.nodes.len() as u32);
        self.nodes.push(PatternNode::new(label.into()));
        id
    }

    /// Add a node with an empty label.
    pub fn create_anonymous_node(&mut self) -> PatternNodeId {
        self.create_node(String::new())
    }

    /// Join two nodes of this pattern. `from` is the start node if the
    /// relationship is directed. `from == to` creates a self-loop.
    ///
    /// # Panics
    ///
    /// If either endpoint belongs to another pattern.
    #[requires(self.contains_node(from) && self.contains_node(to), "endpoints must belong to this pattern")]
    pub fn create_relationship(
        &mut self,
        from: PatternNodeId,
        to: PatternNodeId,
        spec: RelationshipSpec,
    ) -> PatternRelId {
        let id = PatternRelId(self.relationships.len() as u32);
        self.relationships.push(PatternRelationship::new(from, to, spec));
        self.nodes[from.index()].attach(id);
        self.nodes[to.index()].attach(id);
        id
    }

    /// Shorthand for a required, directed relationship of one type.
    pub fn create_typed_relationship(
        &mut self,
        from: PatternNodeId,
        to: PatternNodeId,
        rel_type: &str,
    ) -> PatternRelId {
        self.create_relationship(from, to, RelationshipSpec::of_type(rel_type))
    }

    /// Shorthand for an optional, directed relationship of one type.
    pub fn create_optional_relationship(
        &mut self,
        from: PatternNodeId,
        to: PatternNodeId,
        rel_type: &str,
    ) -> PatternRelId {
        self.create_relationship(from, to, RelationshipSpec::of_type(rel_type).optional())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Whether `id` addresses a node of this pattern.
    pub fn contains_node(&self, id: PatternNodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Whether `id` addresses a relationship of this pattern.
    pub fn contains_relationship(&self, id: PatternRelId) -> bool {
        id.index() < self.relationships.len()
    }

    /// Look up a node.
    pub fn get_node(&self, id: PatternNodeId) -> Option<&PatternNode<N>> {
        self.nodes.get(id.index())
    }

    /// Look up a relationship.
    pub fn get_relationship(&self, id: PatternRelId) -> Option<&PatternRelationship<R>> {
        self.relationships.get(id.index())
    }

    /// Access a node of this pattern.
    ///
    /// # Panics
    ///
    /// If `id` belongs to another pattern.
    pub fn node(&self, id: PatternNodeId) -> &PatternNode<N> {
        &self.nodes[id.index()]
    }

    /// Mutable access to a node, for adding constraints or associations.
    ///
    /// # Panics
    ///
    /// If `id` belongs to another pattern.
    pub fn node_mut(&mut self, id: PatternNodeId) -> &mut PatternNode<N> {
        &mut self.nodes[id.index()]
    }

    /// Access a relationship of this pattern.
    ///
    /// # Panics
    ///
    /// If `id` belongs to another pattern.
    pub fn relationship(&self, id: PatternRelId) -> &PatternRelationship<R> {
        &self.relationships[id.index()]
    }

    /// Mutable access to a relationship.
    ///
    /// # Panics
    ///
    /// If `id` belongs to another pattern.
    pub fn relationship_mut(&mut self, id: PatternRelId) -> &mut PatternRelationship<R> {
        &mut self.relationships[id.index()]
    }

    /// All nodes with their ids, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (PatternNodeId, &PatternNode<N>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (PatternNodeId(i as u32), n))
    }

    /// All relationships with their ids, in creation order.
    pub fn relationships(&self) -> impl Iterator<Item = (PatternRelId, &PatternRelationship<R>)> {
        self.relationships
            .iter()
            .enumerate()
            .map(|(i, r)| (PatternRelId(i as u32), r))
    }
}
