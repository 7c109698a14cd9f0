//! Optional fragments: extending one required match with every combination
//! of optional-fragment matches.
//!
//! Each optional root gets a slot. The slot's start node is found by label
//! correlation: the first node of the base match whose pattern node shares
//! the root's label. A slot whose fragment never matches stays empty and
//! contributes nothing, so a base match with no fragment matches at all is
//! yielded exactly once, unchanged.
//!
//! Combinations are produced in odometer order: the last non-empty slot
//! advances fastest, and whenever a slot advances every later non-empty slot
//! is restarted from its first match.

use std::iter::FusedIterator;

use graphmatch_common::GraphStore;
use tracing::{debug, warn};

use crate::{MatchError, PatternFinder, PatternGraph, PatternMatch, PatternNodeId};

type NodeOf<G> = <G as GraphStore>::NodeId;
type RelOf<G> = <G as GraphStore>::RelId;
type MatchOf<G> = PatternMatch<NodeOf<G>, RelOf<G>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Fresh,
    Active,
    Done,
}

struct Slot<'p, 'g, G: GraphStore> {
    root: PatternNodeId,
    start: Option<NodeOf<G>>,
    finder: Option<PatternFinder<'p, 'g, G>>,
    current: Option<MatchOf<G>>,
}

/// Lazy enumerator of a base match extended by its optional fragments.
pub struct OptionalFinder<'p, 'g, G: GraphStore> {
    pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
    store: &'g G,
    base: MatchOf<G>,
    roots: Vec<PatternNodeId>,
    slots: Vec<Slot<'p, 'g, G>>,
    status: Status,
    any_match: bool,
}

impl<'p, 'g, G: GraphStore> OptionalFinder<'p, 'g, G> {
    /// Combine `base` with the fragments rooted at `roots`.
    pub fn new(
        pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
        store: &'g G,
        base: MatchOf<G>,
        roots: &[PatternNodeId],
    ) -> Result<Self, MatchError> {
        if let Some(&bad) = roots.iter().find(|&&r| !pattern.contains_node(r)) {
            return Err(MatchError::unknown_pattern_node(bad));
        }
        Ok(Self {
            pattern,
            store,
            base,
            roots: roots.to_vec(),
            slots: Vec::with_capacity(roots.len()),
            status: Status::Fresh,
            any_match: false,
        })
    }

    /// Whether any fragment produced at least one match so far.
    pub fn any_match_found(&self) -> bool {
        self.any_match
    }

    /// The required match being extended.
    pub fn base(&self) -> &MatchOf<G> {
        &self.base
    }

    /// Next combination, `None` when all have been produced. After an
    /// error no further combinations are produced.
    pub fn next_combination(&mut self) -> Result<Option<MatchOf<G>>, MatchError> {
        let result = match self.status {
            Status::Done => return Ok(None),
            Status::Fresh => {
                self.status = Status::Active;
                self.initialize().map(|()| Some(self.combine()))
            }
            Status::Active => self.advance(),
        };
        if !matches!(result, Ok(Some(_))) {
            self.status = Status::Done;
        }
        result
    }

    fn initialize(&mut self) -> Result<(), MatchError> {
        for &root in &self.roots {
            let label = self.pattern.node(root).label();
            let start = self
                .base
                .node_for(root)
                .or_else(|| self.base.node_for_label(self.pattern, label));
            if start.is_none() {
                warn!(
                    "optional root {} ({:?}) has no counterpart in the required match",
                    root, label
                );
            }
            let mut slot = Slot {
                root,
                start,
                finder: None,
                current: None,
            };
            Self::restart(self.pattern, self.store, &mut slot)?;
            self.any_match |= slot.current.is_some();
            self.slots.push(slot);
        }
        debug!(
            "optional fragments: {}/{} matched",
            self.slots.iter().filter(|s| s.current.is_some()).count(),
            self.slots.len()
        );
        Ok(())
    }

    /// Replace the slot's finder with a fresh one and pull its first match.
    fn restart(
        pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
        store: &'g G,
        slot: &mut Slot<'p, 'g, G>,
    ) -> Result<(), MatchError> {
        let Some(start) = slot.start else {
            return Ok(());
        };
        let mut finder = PatternFinder::new(pattern, store, slot.root, start, true)?.anchored();
        slot.current = finder.next_match()?;
        slot.finder = Some(finder);
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<MatchOf<G>>, MatchError> {
        for i in (0..self.slots.len()).rev() {
            let slot = &mut self.slots[i];
            if slot.current.is_none() {
                continue;
            }
            let next = match slot.finder.as_mut() {
                Some(finder) => finder.next_match()?,
                None => None,
            };
            let Some(next) = next else {
                continue;
            };
            slot.current = Some(next);
            for later in &mut self.slots[i + 1..] {
                if later.current.is_some() {
                    Self::restart(self.pattern, self.store, later)?;
                }
            }
            return Ok(Some(self.combine()));
        }
        Ok(None)
    }

    fn combine(&self) -> MatchOf<G> {
        self.slots
            .iter()
            .filter_map(|s| s.current.as_ref())
            .fold(self.base.clone(), |acc, m| acc.merge(m))
    }
}

impl<G: GraphStore> Iterator for OptionalFinder<'_, '_, G> {
    type Item = Result<MatchOf<G>, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_combination().transpose()
    }
}

impl<G: GraphStore> FusedIterator for OptionalFinder<'_, '_, G> {}
