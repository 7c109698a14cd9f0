//! Entry point for matching a pattern against a graph store.

use std::collections::HashSet;
use std::iter::FusedIterator;

use graphmatch_common::{Config, GraphStore};
use tracing::{debug, info, trace};

use crate::{MatchError, OptionalFinder, PatternFinder, PatternGraph, PatternMatch, PatternNodeId};

type NodeOf<G> = <G as GraphStore>::NodeId;
type RelOf<G> = <G as GraphStore>::RelId;
type MatchOf<G> = PatternMatch<NodeOf<G>, RelOf<G>>;

/// Matches a pattern against a store under a [`Config`].
///
/// ```
/// use graphmatch_common::MemoryGraph;
/// use graphmatch_subgraph::{PatternGraph, PatternMatcher};
///
/// let mut g = MemoryGraph::new();
/// let a = g.create_named_node("a");
/// let b = g.create_named_node("b");
/// g.create_relationship(a, b, "KNOWS").unwrap();
///
/// let mut p = PatternGraph::new();
/// let pa = p.create_node("a");
/// let pb = p.create_node("b");
/// p.create_typed_relationship(pa, pb, "KNOWS");
///
/// let matcher = PatternMatcher::new(&p, &g);
/// let m = matcher.find_first(pa, a).unwrap().unwrap();
/// assert_eq!(m.node_for(pb), Some(b));
/// ```
pub struct PatternMatcher<'p, 'g, G: GraphStore> {
    pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
    store: &'g G,
    config: Config,
}

impl<'p, 'g, G: GraphStore> PatternMatcher<'p, 'g, G> {
    /// Matcher with the default configuration.
    pub fn new(pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>, store: &'g G) -> Self {
        Self::with_config(pattern, store, Config::default())
    }

    /// Matcher with an explicit configuration.
    pub fn with_config(
        pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
        store: &'g G,
        config: Config,
    ) -> Self {
        Self {
            pattern,
            store,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All matches of the required part of the pattern with `root` bound to
    /// `start`.
    pub fn matches(&self, root: PatternNodeId, start: NodeOf<G>) -> Result<Matches<'p, 'g, G>, MatchError> {
        self.matches_with_optional(root, start, &[])
    }

    /// All matches of the required part, each extended by every combination
    /// of the optional fragments rooted at `optional_roots`.
    pub fn matches_with_optional(
        &self,
        root: PatternNodeId,
        start: NodeOf<G>,
        optional_roots: &[PatternNodeId],
    ) -> Result<Matches<'p, 'g, G>, MatchError> {
        if let Some(&bad) = optional_roots
            .iter()
            .find(|&&r| !self.pattern.contains_node(r))
        {
            return Err(MatchError::unknown_pattern_node(bad));
        }
        let required = PatternFinder::new(self.pattern, self.store, root, start, false)?;
        debug!(
            "matching from {} = {:?} with {} optional roots, {:?}",
            root,
            start,
            optional_roots.len(),
            self.config
        );
        Ok(Matches {
            pattern: self.pattern,
            store: self.store,
            config: self.config.clone(),
            required,
            optional_roots: optional_roots.to_vec(),
            current: None,
            seen: HashSet::new(),
            yielded: 0,
            done: false,
        })
    }

    /// The first match, if any.
    pub fn find_first(&self, root: PatternNodeId, start: NodeOf<G>) -> Result<Option<MatchOf<G>>, MatchError> {
        self.matches(root, start)?.next().transpose()
    }

    /// Number of matches (after limit and dedupe).
    pub fn count(
        &self,
        root: PatternNodeId,
        start: NodeOf<G>,
        optional_roots: &[PatternNodeId],
    ) -> Result<usize, MatchError> {
        let mut n = 0;
        for m in self.matches_with_optional(root, start, optional_roots)? {
            m?;
            n += 1;
        }
        Ok(n)
    }
}

/// Lazy sequence of matches produced by [`PatternMatcher`].
///
/// Yields `Err` at most once; the sequence ends after an error.
pub struct Matches<'p, 'g, G: GraphStore> {
    pattern: &'p PatternGraph<NodeOf<G>, RelOf<G>>,
    store: &'g G,
    config: Config,
    required: PatternFinder<'p, 'g, G>,
    optional_roots: Vec<PatternNodeId>,
    current: Option<OptionalFinder<'p, 'g, G>>,
    seen: HashSet<Vec<(PatternNodeId, NodeOf<G>)>>,
    yielded: usize,
    done: bool,
}

impl<G: GraphStore> Matches<'_, '_, G> {
    /// Number of matches yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn pull(&mut self) -> Result<Option<MatchOf<G>>, MatchError> {
        loop {
            if let Some(optional) = self.current.as_mut() {
                if let Some(m) = optional.next_combination()? {
                    return Ok(Some(m));
                }
                self.current = None;
            }
            let Some(base) = self.required.next_match()? else {
                return Ok(None);
            };
            if self.optional_roots.is_empty() {
                return Ok(Some(base));
            }
            self.current = Some(OptionalFinder::new(
                self.pattern,
                self.store,
                base,
                &self.optional_roots,
            )?);
        }
    }

    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            self.current = None;
            info!("pattern matching finished: {} matches", self.yielded);
        }
    }
}

impl<G: GraphStore> Iterator for Matches<'_, '_, G> {
    type Item = Result<MatchOf<G>, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.config.limit.is_some_and(|l| self.yielded >= l) {
            debug!("match limit reached");
            self.finish();
            return None;
        }
        loop {
            let m = match self.pull() {
                Ok(Some(m)) => m,
                Ok(None) => {
                    self.finish();
                    return None;
                }
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            };
            if self.config.dedupe.enabled() && !self.seen.insert(m.node_signature()) {
                trace!("dropping duplicate node assignment");
                continue;
            }
            self.yielded += 1;
            return Some(Ok(m));
        }
    }
}

impl<G: GraphStore> FusedIterator for Matches<'_, '_, G> {}
