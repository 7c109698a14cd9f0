use graphmatch_common::{Direction, RelType, Value};

use super::{PatternNodeId, PropertyConstraints};

/// Shape of a pattern relationship, given at creation time.
///
/// ```
/// use graphmatch_subgraph::RelationshipSpec;
/// let spec = RelationshipSpec::of_type("KNOWS").optional().undirected();
/// assert!(spec.is_optional());
/// assert!(!spec.is_directed());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationshipSpec {
    rel_type: Option<RelType>,
    directed: bool,
    optional: bool,
}

impl RelationshipSpec {
    /// A required, directed relationship matching any type.
    pub fn any() -> Self {
        Self {
            rel_type: None,
            directed: true,
            optional: false,
        }
    }

    /// A required, directed relationship of one type.
    pub fn of_type(rel_type: impl Into<RelType>) -> Self {
        Self {
            rel_type: Some(rel_type.into()),
            ..Self::any()
        }
    }

    /// Mark the relationship as belonging to an optional fragment.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Match in either direction.
    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    /// Whether the relationship is optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether direction matters.
    pub fn is_directed(&self) -> bool {
        self.directed
    }
}

impl Default for RelationshipSpec {
    fn default() -> Self {
        Self::any()
    }
}

/// A placeholder for one graph relationship between two pattern nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternRelationship<R> {
    first: PatternNodeId,
    second: PatternNodeId,
    spec: RelationshipSpec,
    association: Option<R>,
    constraints: PropertyConstraints,
}

impl<R> PatternRelationship<R> {
    pub(super) fn new(first: PatternNodeId, second: PatternNodeId, spec: RelationshipSpec) -> Self {
        Self {
            first,
            second,
            spec,
            association: None,
            constraints: PropertyConstraints::default(),
        }
    }

    /// Start node (for directed relationships).
    pub fn first(&self) -> PatternNodeId {
        self.first
    }

    /// End node (for directed relationships).
    pub fn second(&self) -> PatternNodeId {
        self.second
    }

    /// Required type, `None` for any type.
    pub fn rel_type(&self) -> Option<&RelType> {
        self.spec.rel_type.as_ref()
    }

    /// Whether direction matters.
    pub fn is_directed(&self) -> bool {
        self.spec.directed
    }

    /// Whether this relationship belongs to an optional fragment.
    pub fn is_optional(&self) -> bool {
        self.spec.optional
    }

    /// The endpoint opposite `node`. For a self-loop this is `node` itself.
    pub fn other_node(&self, node: PatternNodeId) -> PatternNodeId {
        if node == self.first { self.second } else { self.first }
    }

    /// Direction to query the store with when expanding from `node`.
    pub fn direction_from(&self, node: PatternNodeId) -> Direction {
        if !self.spec.directed {
            Direction::Both
        } else if node == self.first {
            Direction::Outgoing
        } else {
            Direction::Incoming
        }
    }

    /// The graph relationship this pattern relationship is pinned to.
    pub fn association(&self) -> Option<&R> {
        self.association.as_ref()
    }

    /// Pin to one graph relationship, or unpin with `None`.
    pub fn set_association(&mut self, rel: Option<R>) {
        self.association = rel;
    }

    /// Property constraints checked for every candidate relationship.
    pub fn constraints(&self) -> &PropertyConstraints {
        &self.constraints
    }

    /// Require the property `key` to be set.
    pub fn add_property_exist_constraint(&mut self, key: impl Into<String>) {
        self.constraints.add_exists(key);
    }

    /// Require the property `key` to equal `value` (or contain it).
    pub fn add_property_equal_constraint(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.constraints.add_equals(key, value);
    }
}
