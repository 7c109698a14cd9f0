//! Errors raised while building or running a search.

use graphmatch_common::StoreError;
use thiserror::Error;

use crate::PatternNodeId;

/// Errors surfaced while matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The graph store failed; the search that hit it is finished.
    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),
    /// A root handed to the matcher does not belong to the pattern.
    #[error("Pattern node {0} does not belong to the pattern graph")]
    UnknownPatternNode(PatternNodeId),
}

impl MatchError {
    /// Helper for the unknown pattern node error.
    pub fn unknown_pattern_node(id: PatternNodeId) -> Self {
        Self::UnknownPatternNode(id)
    }
}
