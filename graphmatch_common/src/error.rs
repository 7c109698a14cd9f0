//! Errors raised by graph store implementations.

use thiserror::Error;

/// Failures reported by a [`crate::GraphStore`].
///
/// The matching engine never recovers from these: a store that cannot
/// answer a lookup mid-search has lost the consistent view the search
/// depends on, so the error is handed back to whoever is pulling matches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A node id did not resolve to a live node.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A relationship id did not resolve to a live relationship.
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    /// Backend specific failure (I/O, lock poisoning, ...).
    #[error("Graph store failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a node not found error.
    pub fn node_not_found(id: impl std::fmt::Debug) -> Self {
        Self::NodeNotFound(format!("{id:?}"))
    }

    /// Create a relationship not found error.
    pub fn relationship_not_found(id: impl std::fmt::Debug) -> Self {
        Self::RelationshipNotFound(format!("{id:?}"))
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
