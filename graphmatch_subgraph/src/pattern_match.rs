//! Matches: immutable snapshots of the bindings found by a search.

use std::fmt::Debug;
use std::hash::Hash;

use contracts::debug_ensures;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::{PatternGraph, PatternNodeId, PatternRelId};

/// One binding made while walking the pattern: a pattern node, the graph
/// node bound to it, and the relationship pair it was reached through
/// (`None` for the root).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatternElement<N, R> {
    pattern_node: PatternNodeId,
    node: N,
    via: Option<(PatternRelId, R)>,
}

impl<N: Copy, R: Copy> PatternElement<N, R> {
    pub(crate) fn new(pattern_node: PatternNodeId, node: N, via: Option<(PatternRelId, R)>) -> Self {
        Self {
            pattern_node,
            node,
            via,
        }
    }

    /// The pattern node.
    pub fn pattern_node(&self) -> PatternNodeId {
        self.pattern_node
    }

    /// The graph node bound to it.
    pub fn node(&self) -> N {
        self.node
    }

    /// The pattern relationship this element was reached through.
    pub fn from_pattern_relationship(&self) -> Option<PatternRelId> {
        self.via.map(|(p, _)| p)
    }

    /// The graph relationship this element was reached through.
    pub fn from_relationship(&self) -> Option<R> {
        self.via.map(|(_, r)| r)
    }
}

/// A complete embedding of (part of) a pattern.
///
/// Maps each bound pattern node to its element and each bound pattern
/// relationship to its graph relationship. Iteration follows binding order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch<N, R> {
    elements: IndexMap<PatternNodeId, PatternElement<N, R>>,
    relationships: IndexMap<PatternRelId, R>,
}

impl<N, R> PatternMatch<N, R>
where
    N: Copy + Eq + Hash + Debug,
    R: Copy + Eq + Hash + Debug,
{
    /// Snapshot an accumulator stack. A pattern node that was entered twice
    /// (closing a cycle) keeps its first element; the closing relationship is
    /// still recorded.
    pub(crate) fn from_elements(stack: &[PatternElement<N, R>]) -> Self {
        let mut elements = IndexMap::with_capacity(stack.len());
        let mut relationships = IndexMap::with_capacity(stack.len());
        for element in stack {
            if let Some((prel, rel)) = element.via {
                relationships.insert(prel, rel);
            }
            elements.entry(element.pattern_node).or_insert(*element);
        }
        Self {
            elements,
            relationships,
        }
    }

    /// Graph node bound to `pattern_node`.
    pub fn node_for(&self, pattern_node: PatternNodeId) -> Option<N> {
        self.elements.get(&pattern_node).map(PatternElement::node)
    }

    /// Graph relationship bound to `pattern_rel`.
    pub fn relationship_for(&self, pattern_rel: PatternRelId) -> Option<R> {
        self.relationships.get(&pattern_rel).copied()
    }

    /// Element bound to `pattern_node`.
    pub fn element_for(&self, pattern_node: PatternNodeId) -> Option<&PatternElement<N, R>> {
        self.elements.get(&pattern_node)
    }

    /// The first bound graph node (in binding order) whose pattern node
    /// carries `label`.
    pub fn node_for_label(&self, pattern: &PatternGraph<N, R>, label: &str) -> Option<N> {
        self.elements
            .values()
            .find(|e| {
                pattern
                    .get_node(e.pattern_node)
                    .is_some_and(|n| n.label() == label)
            })
            .map(PatternElement::node)
    }

    /// Elements in binding order.
    pub fn elements(&self) -> impl Iterator<Item = &PatternElement<N, R>> {
        self.elements.values()
    }

    /// `(pattern node, graph node)` pairs in binding order.
    pub fn nodes(&self) -> impl Iterator<Item = (PatternNodeId, N)> + '_ {
        self.elements.iter().map(|(&p, e)| (p, e.node))
    }

    /// `(pattern relationship, graph relationship)` pairs in binding order.
    pub fn relationships(&self) -> impl Iterator<Item = (PatternRelId, R)> + '_ {
        self.relationships.iter().map(|(&p, &r)| (p, r))
    }

    /// Number of bound pattern nodes.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of bound pattern relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Node bindings ordered by pattern node, independent of binding order.
    pub fn node_signature(&self) -> Vec<(PatternNodeId, N)> {
        self.nodes().sorted_by_key(|(p, _)| *p).collect()
    }

    /// Union of two matches. Entries of `self` win over entries of `other`.
    #[debug_ensures(ret.len() >= self.len() && ret.len() >= other.len())]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (&p, e) in &other.elements {
            let kept = merged.elements.entry(p).or_insert(*e);
            debug_assert_eq!(kept.node, e.node, "merged matches disagree on {p}");
        }
        for (&p, &r) in &other.relationships {
            merged.relationships.entry(p).or_insert(r);
        }
        merged
    }
}
