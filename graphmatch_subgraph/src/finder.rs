//! The resumable depth-first search over one pattern component.
//!
//! A [`PatternFinder`] starts from one pattern node bound to one graph node
//! and walks the pattern by following pattern relationships, binding each
//! to an unused graph relationship of matching type, direction and
//! properties. The search state is an explicit stack, so the finder can
//! stop after each complete match and continue from exactly that point on
//! the next pull.
//!
//! Branching patterns are handled with a pending stack: when a pattern node
//! still has unexplored relationships after one is opened, it is pushed
//! there, and a leaf with nothing left to expand resumes from the topmost
//! pending node that still has work. Every frame remembers whether it
//! pushed a pending entry so that backtracking restores the stack exactly.
//!
//! A finder follows either only required relationships or only optional
//! ones; optional fragments are searched by separate finders anchored at
//! a node of the required match (see [`crate::OptionalFinder`]).

use std::collections::HashSet;
use std::iter::FusedIterator;

use contracts::debug_requires;
use graphmatch_common::GraphStore;
use tracing::{debug, trace};

use crate::state::{Frame, MarkSet, Position};
use crate::{MatchError, PatternElement, PatternGraph, PatternMatch, PatternNodeId, PatternRelId};

type NodeOf<G> = <G as GraphStore>::NodeId;
type RelOf<G> = <G as GraphStore>::RelId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Fresh,
    Suspended,
    Exhausted,
}

/// Outcome of trying to extend the current partial match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Every reachable relationship is bound.
    Matched,
    /// A new frame was pushed and has to be explored.
    Descend,
    /// Nothing fits; the caller backtracks.
    Failed,
}

/// Lazy enumerator of the embeddings of one pattern component.
pub struct PatternFinder<'p, 'g, G: GraphStore> {
    pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
    store: &'g G,
    root: Position<NodeOf<G>>,
    optional: bool,
    anchor: Option<NodeOf<G>>,
    status: Status,
    visited: HashSet<RelOf<G>>,
    marks: MarkSet,
    frames: Vec<Frame<NodeOf<G>, RelOf<G>>>,
    pending: Vec<Position<NodeOf<G>>>,
    elements: Vec<PatternElement<NodeOf<G>, RelOf<G>>>,
}

impl<'p, 'g, G: GraphStore> PatternFinder<'p, 'g, G> {
    /// Create a finder binding `root` to `start`.
    ///
    /// With `optional` unset the finder follows required relationships only;
    /// with it set, optional relationships only.
    pub fn new(
        pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
        store: &'g G,
        root: PatternNodeId,
        start: NodeOf<G>,
        optional: bool,
    ) -> Result<Self, MatchError> {
        if !pattern.contains_node(root) {
            return Err(MatchError::unknown_pattern_node(root));
        }
        Ok(Self {
            pattern,
            store,
            root: Position::new(root, start),
            optional,
            anchor: None,
            status: Status::Fresh,
            visited: HashSet::new(),
            marks: MarkSet::new(pattern.relationship_count()),
            frames: Vec::new(),
            pending: Vec::new(),
            elements: Vec::new(),
        })
    }

    /// Pin the root to the start node for this search only, as if the root
    /// pattern node were associated with it.
    pub fn anchored(mut self) -> Self {
        self.anchor = Some(self.root.node);
        self
    }

    /// The root pattern node.
    pub fn root(&self) -> PatternNodeId {
        self.root.pattern_node
    }

    /// Whether this finder follows optional relationships.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the finder will never produce another match.
    pub fn is_exhausted(&self) -> bool {
        self.status == Status::Exhausted
    }

    /// Produce the next match, or `None` once the search space is
    /// exhausted. After an error the finder is exhausted.
    pub fn next_match(&mut self) -> Result<Option<PatternMatch<NodeOf<G>, RelOf<G>>>, MatchError> {
        let found = match self.status {
            Status::Exhausted => return Ok(None),
            Status::Fresh => {
                debug!(
                    "starting {} search at {} = {:?}",
                    if self.optional { "optional" } else { "required" },
                    self.root.pattern_node,
                    self.root.node
                );
                self.status = Status::Suspended;
                self.search_from_root()
            }
            Status::Suspended => self.resume(),
        };

        match found {
            Ok(true) => {
                let m = PatternMatch::from_elements(&self.elements);
                self.elements.pop();
                if self.frames.is_empty() {
                    self.finish();
                }
                trace!("match: {:?}", m.node_signature());
                Ok(Some(m))
            }
            Ok(false) => {
                self.finish();
                Ok(None)
            }
            Err(e) => {
                debug!("search from {} aborted: {}", self.root.pattern_node, e);
                self.finish();
                Err(e)
            }
        }
    }

    fn search_from_root(&mut self) -> Result<bool, MatchError> {
        match self.enter(self.root, None)? {
            Step::Matched => Ok(true),
            Step::Failed => Ok(false),
            Step::Descend => self.resume(),
        }
    }

    /// Drive the frame stack until a match is found or it is empty.
    fn resume(&mut self) -> Result<bool, MatchError> {
        while let Some(frame) = self.frames.last_mut() {
            if let Some(last) = frame.last.take() {
                self.visited.remove(&last);
            }
            match self.advance_top()? {
                Step::Matched => return Ok(true),
                Step::Descend => {}
                Step::Failed => self.pop_frame(),
            }
        }
        Ok(false)
    }

    /// Try the remaining candidates of the top frame.
    #[debug_requires(!self.frames.is_empty())]
    fn advance_top(&mut self) -> Result<Step, MatchError> {
        let pattern = self.pattern;
        let depth = self.frames.len() - 1;
        loop {
            let frame = &mut self.frames[depth];
            let Some(rel) = frame.candidates.next() else {
                return Ok(Step::Failed);
            };
            let (position, prel_id) = (frame.position, frame.relationship);

            if self.visited.contains(&rel) {
                continue;
            }
            let prel = pattern.relationship(prel_id);
            if prel.association().is_some_and(|a| *a != rel) {
                continue;
            }
            if !prel
                .constraints()
                .check(|key| self.store.relationship_property(rel, key))?
            {
                trace!("{:?} rejected for {}: properties", rel, prel_id);
                continue;
            }

            let other = Position::new(
                prel.other_node(position.pattern_node),
                self.store.other_node(rel, position.node)?,
            );
            self.visited.insert(rel);
            self.frames[depth].last = Some(rel);
            match self.enter(other, Some((prel_id, rel)))? {
                Step::Failed => {
                    self.visited.remove(&rel);
                    self.frames[depth].last = None;
                }
                step => return Ok(step),
            }
        }
    }

    /// Bind `position` if it is consistent, then look for more work.
    fn enter(
        &mut self,
        position: Position<NodeOf<G>>,
        via: Option<(PatternRelId, RelOf<G>)>,
    ) -> Result<Step, MatchError> {
        if !self.node_matches(position)? {
            return Ok(Step::Failed);
        }
        self.elements
            .push(PatternElement::new(position.pattern_node, position.node, via));
        self.continue_from(position)
    }

    fn node_matches(&self, position: Position<NodeOf<G>>) -> Result<bool, MatchError> {
        let pnode = self.pattern.node(position.pattern_node);
        if pnode.association().is_some_and(|a| *a != position.node) {
            return Ok(false);
        }
        if position.pattern_node == self.root.pattern_node
            && self.anchor.is_some_and(|a| a != position.node)
        {
            return Ok(false);
        }
        // Re-entering a bound pattern node through a cycle must land on the
        // same graph node.
        if let Some(bound) = self
            .elements
            .iter()
            .find(|e| e.pattern_node() == position.pattern_node)
        {
            return Ok(bound.node() == position.node);
        }
        let ok = pnode
            .constraints()
            .check(|key| self.store.node_property(position.node, key))?;
        if !ok {
            trace!("{:?} rejected for {}: properties", position.node, position.pattern_node);
        }
        Ok(ok)
    }

    /// Open a frame at `position`, or at the topmost pending position that
    /// still has unexplored relationships. `Matched` when neither exists.
    fn continue_from(&mut self, position: Position<NodeOf<G>>) -> Result<Step, MatchError> {
        if self.open_frame(position)? {
            return Ok(Step::Descend);
        }
        let resume_at = self
            .pending
            .iter()
            .rev()
            .copied()
            .find(|p| self.unexplored(p.pattern_node).next().is_some());
        match resume_at {
            Some(p) => {
                let opened = self.open_frame(p)?;
                debug_assert!(opened);
                Ok(Step::Descend)
            }
            None => Ok(Step::Matched),
        }
    }

    fn open_frame(&mut self, position: Position<NodeOf<G>>) -> Result<bool, MatchError> {
        let (first, deferred) = {
            let mut edges = self.unexplored(position.pattern_node);
            (edges.next(), edges.next().is_some())
        };
        let Some(prel_id) = first else {
            return Ok(false);
        };
        let prel = self.pattern.relationship(prel_id);
        let candidates = self.store.relationships(
            position.node,
            prel.rel_type(),
            prel.direction_from(position.pattern_node),
        )?;
        trace!(
            "expanding {} from {} = {:?}: {} candidates",
            prel_id,
            position.pattern_node,
            position.node,
            candidates.len()
        );

        if deferred {
            self.pending.push(position);
        }
        self.marks.mark(prel_id);
        self.frames
            .push(Frame::new(position, prel_id, candidates, deferred));
        Ok(true)
    }

    fn pop_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        debug_assert!(frame.last.is_none());
        self.marks.unmark(frame.relationship);
        if frame.deferred {
            self.pending.pop();
        }
        // The element that opened this frame.
        self.elements.pop();
    }

    /// Unmarked incident relationships this finder is allowed to follow.
    fn unexplored(&self, pattern_node: PatternNodeId) -> impl Iterator<Item = PatternRelId> {
        let pattern = self.pattern;
        pattern
            .node(pattern_node)
            .relationships()
            .iter()
            .copied()
            .filter(move |&r| {
                pattern.relationship(r).is_optional() == self.optional && !self.marks.is_marked(r)
            })
    }

    fn finish(&mut self) {
        self.status = Status::Exhausted;
        self.frames.clear();
        self.pending.clear();
        self.elements.clear();
        self.visited.clear();
        self.marks.clear();
    }
}

impl<G: GraphStore> Iterator for PatternFinder<'_, '_, G> {
    type Item = Result<PatternMatch<NodeOf<G>, RelOf<G>>, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_match().transpose()
    }
}

impl<G: GraphStore> FusedIterator for PatternFinder<'_, '_, G> {}
