//! Explicit stack state for the resumable search.

use std::vec;

use contracts::{debug_ensures, requires};

use crate::{PatternNodeId, PatternRelId};

/// A pattern node currently bound to a graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Position<N> {
    pub(crate) pattern_node: PatternNodeId,
    pub(crate) node: N,
}

impl<N> Position<N> {
    pub(crate) fn new(pattern_node: PatternNodeId, node: N) -> Self {
        Self { pattern_node, node }
    }
}

/// One level of the search: the pattern relationship being expanded from
/// `position` and the graph relationships still to try for it.
#[derive(Debug)]
pub(crate) struct Frame<N, R> {
    pub(crate) position: Position<N>,
    pub(crate) relationship: PatternRelId,
    pub(crate) candidates: vec::IntoIter<R>,
    /// Candidate that is currently bound below this frame.
    pub(crate) last: Option<R>,
    /// Whether opening this frame pushed `position` onto the pending stack.
    pub(crate) deferred: bool,
}

impl<N, R> Frame<N, R> {
    pub(crate) fn new(
        position: Position<N>,
        relationship: PatternRelId,
        candidates: Vec<R>,
        deferred: bool,
    ) -> Self {
        Self {
            position,
            relationship,
            candidates: candidates.into_iter(),
            last: None,
            deferred,
        }
    }
}

/// Per-search markers over pattern relationships: a relationship is marked
/// while some frame on the stack is expanding it.
#[derive(Clone, Debug, Default)]
pub(crate) struct MarkSet {
    marked: Vec<bool>,
}

impl MarkSet {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            marked: vec![false; len],
        }
    }

    pub(crate) fn is_marked(&self, rel: PatternRelId) -> bool {
        self.marked.get(rel.index()).copied().unwrap_or(false)
    }

    #[requires(!self.is_marked(rel), "pattern relationship is already marked")]
    #[debug_ensures(self.is_marked(rel))]
    pub(crate) fn mark(&mut self, rel: PatternRelId) {
        self.marked[rel.index()] = true;
    }

    #[debug_ensures(!self.is_marked(rel))]
    pub(crate) fn unmark(&mut self, rel: PatternRelId) {
        if let Some(m) = self.marked.get_mut(rel.index()) {
            *m = false;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.marked.fill(false);
    }
}
