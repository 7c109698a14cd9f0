use graphmatch_common::Value;

use super::{PatternRelId, PropertyConstraints};

/// A placeholder for one graph node in a pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternNode<N> {
    label: String,
    association: Option<N>,
    constraints: PropertyConstraints,
    relationships: Vec<PatternRelId>,
}

impl<N> PatternNode<N> {
    pub(super) fn new(label: String) -> Self {
        Self {
            label,
            association: None,
            constraints: PropertyConstraints::default(),
            relationships: Vec::new(),
        }
    }

    /// Human-readable label; used to correlate optional fragments with the
    /// required part of a match.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The graph node this pattern node is pinned to, if any.
    pub fn association(&self) -> Option<&N> {
        self.association.as_ref()
    }

    /// Pin this pattern node to one graph node, or unpin it with `None`.
    pub fn set_association(&mut self, node: Option<N>) {
        self.association = node;
    }

    /// Property constraints checked for every candidate graph node.
    pub fn constraints(&self) -> &PropertyConstraints {
        &self.constraints
    }

    /// Require the property `key` to be set.
    pub fn add_property_exist_constraint(&mut self, key: impl Into<String>) {
        self.constraints.add_exists(key);
    }

    /// Require the property `key` to equal `value` (or contain it, for
    /// multi-valued properties).
    pub fn add_property_equal_constraint(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.constraints.add_equals(key, value);
    }

    /// Incident pattern relationships in creation order. A self-loop is
    /// listed once.
    pub fn relationships(&self) -> &[PatternRelId] {
        &self.relationships
    }

    pub(super) fn attach(&mut self, rel: PatternRelId) {
        if !self.relationships.contains(&rel) {
            self.relationships.push(rel);
        }
    }
}
