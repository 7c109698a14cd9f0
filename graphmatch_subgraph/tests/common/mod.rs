#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Once;

use graphmatch_common::{
    Direction, GraphStore, MemoryGraph, NodeId, RelId, RelType, StoreError, Value,
};

// Ensure logging only initializes once across all tests
static INIT: Once = Once::new();

pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A memory graph with nodes addressable by their `name` property.
#[derive(Clone, Debug, Default)]
pub struct NamedGraph {
    pub graph: MemoryGraph,
    names: HashMap<String, NodeId>,
}

impl NamedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.graph.create_named_node(name);
        self.names.insert(name.to_string(), id);
        id
    }

    pub fn rel(&mut self, from: &str, to: &str, rel_type: &str) -> RelId {
        let (a, b) = (self.node(from), self.node(to));
        self.graph.create_relationship(a, b, rel_type).unwrap()
    }

    pub fn set(&mut self, name: &str, key: &str, value: impl Into<Value>) {
        let id = self.node(name);
        self.graph.set_node_property(id, key, value).unwrap();
    }

    pub fn id(&self, name: &str) -> NodeId {
        self.names[name]
    }

    pub fn name_of(&self, id: NodeId) -> String {
        match self.graph.node_property(id, "name").unwrap() {
            Some(Value::String(s)) => s,
            other => panic!("node {id} has no name: {other:?}"),
        }
    }
}

/// Wraps a store and fails every call after `budget` successful ones.
pub struct FailingStore<'a> {
    inner: &'a MemoryGraph,
    budget: Cell<usize>,
}

impl<'a> FailingStore<'a> {
    pub fn new(inner: &'a MemoryGraph, budget: usize) -> Self {
        Self {
            inner,
            budget: Cell::new(budget),
        }
    }

    fn spend(&self) -> Result<(), StoreError> {
        match self.budget.get() {
            0 => Err(StoreError::backend("store went away")),
            n => {
                self.budget.set(n - 1);
                Ok(())
            }
        }
    }
}

impl GraphStore for FailingStore<'_> {
    type NodeId = NodeId;
    type RelId = RelId;

    fn relationships(
        &self,
        node: NodeId,
        rel_type: Option<&RelType>,
        direction: Direction,
    ) -> Result<Vec<RelId>, StoreError> {
        self.spend()?;
        self.inner.relationships(node, rel_type, direction)
    }

    fn node_property(&self, node: NodeId, key: &str) -> Result<Option<Value>, StoreError> {
        self.spend()?;
        self.inner.node_property(node, key)
    }

    fn relationship_property(&self, rel: RelId, key: &str) -> Result<Option<Value>, StoreError> {
        self.spend()?;
        self.inner.relationship_property(rel, key)
    }

    fn endpoints(&self, rel: RelId) -> Result<(NodeId, NodeId), StoreError> {
        self.spend()?;
        self.inner.endpoints(rel)
    }

    fn relationship_type(&self, rel: RelId) -> Result<RelType, StoreError> {
        self.spend()?;
        self.inner.relationship_type(rel)
    }
}

/// a -> b1/b2/b3 -> c, all of type R1.
pub fn abc_graph() -> NamedGraph {
    let mut g = NamedGraph::new();
    for b in ["B1", "B2", "B3"] {
        g.rel("A", b, "R1");
    }
    for b in ["B1", "B2", "B3"] {
        g.rel(b, "C", "R1");
    }
    g
}
