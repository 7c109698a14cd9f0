mod common;

use std::collections::HashSet;

use common::{NamedGraph, abc_graph, setup_test_logging};
use graphmatch_common::{Config, Dedupe, GraphStore, NodeId, RelId, Value};
use graphmatch_subgraph::{PatternGraph, PatternMatch, PatternMatcher, PatternNodeId, RelationshipSpec};
use rstest::rstest;

lazy_static::lazy_static! {
    static ref ABC: NamedGraph = abc_graph();
    static ref TEETH: NamedGraph = teeth_graph();
    static ref FOLLOWERS: NamedGraph = followers_graph();
}

fn collect(
    pattern: &PatternGraph,
    g: &NamedGraph,
    root: PatternNodeId,
    start: NodeId,
) -> Vec<PatternMatch<NodeId, RelId>> {
    setup_test_logging();
    PatternMatcher::new(pattern, &g.graph)
        .matches(root, start)
        .unwrap()
        .map(Result::unwrap)
        .collect()
}

fn names(g: &NamedGraph, matches: &[PatternMatch<NodeId, RelId>], p: PatternNodeId) -> Vec<String> {
    let mut out: Vec<_> = matches
        .iter()
        .map(|m| g.name_of(m.node_for(p).unwrap()))
        .collect();
    out.sort();
    out
}

#[test]
fn any_type_relationship_matches_every_parallel_edge() {
    let mut g = NamedGraph::new();
    let r1 = g.rel("a1", "b1", "R1");
    let r2 = g.rel("a1", "b1", "R2");

    let mut p = PatternGraph::new();
    let pa = p.create_node("pA");
    let pb = p.create_node("pB");
    let prel = p.create_relationship(pa, pb, RelationshipSpec::any());

    let matches = collect(&p, &g, pa, g.id("a1"));
    assert_eq!(matches.len(), 2);
    let mut rels = HashSet::from([r1, r2]);
    for m in &matches {
        assert_eq!(m.node_for(pa), Some(g.id("a1")));
        assert_eq!(m.node_for(pb), Some(g.id("b1")));
        assert!(rels.remove(&m.relationship_for(prel).unwrap()));
    }
    assert!(rels.is_empty());
}

#[test]
fn relationship_property_constraint_filters_parallel_edges() {
    let mut g = NamedGraph::new();
    g.rel("a1", "b1", "R1");
    let with_prop = g.rel("a1", "b1", "R2");
    g.graph
        .set_relationship_property(with_prop, "musthave", true)
        .unwrap();

    let mut p = PatternGraph::new();
    let pa = p.create_node("pA");
    let pb = p.create_node("pB");
    let prel = p.create_relationship(pa, pb, RelationshipSpec::any());
    p.relationship_mut(prel).add_property_exist_constraint("musthave");

    let matches = collect(&p, &g, pa, g.id("a1"));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].relationship_for(prel), Some(with_prop));
}

fn teeth_graph() -> NamedGraph {
    let mut g = NamedGraph::new();
    for (t, i) in [
        ("aT", "a1"),
        ("bT", "b1"),
        ("cT", "c1"),
        ("cT", "c2"),
        ("dT", "d1"),
        ("dT", "d2"),
        ("eT", "e1"),
    ] {
        g.rel(t, i, "R1");
    }
    for (x, y) in [
        ("a1", "b1"),
        ("b1", "c1"),
        ("b1", "c2"),
        ("c1", "d1"),
        ("c2", "d2"),
        ("d1", "e1"),
        ("d2", "e1"),
    ] {
        g.rel(x, y, "R2");
    }
    g
}

/// Type nodes each linked to an instance node, instances chained.
fn teeth_pattern() -> (PatternGraph, Vec<PatternNodeId>, Vec<PatternNodeId>) {
    let mut p = PatternGraph::new();
    let mut types = Vec::new();
    let mut instances = Vec::new();
    for l in ["A", "B", "C", "D", "E"] {
        let t = p.create_node(format!("p{l}"));
        let i = p.create_node(format!("p{l}I"));
        p.create_typed_relationship(t, i, "R1");
        types.push(t);
        instances.push(i);
    }
    for w in instances.windows(2) {
        p.create_typed_relationship(w[0], w[1], "R2");
    }
    (p, types, instances)
}

#[test]
fn teeth_structure_from_type_node() {
    let (p, types, inst) = teeth_pattern();
    let g = &*TEETH;
    let matches = collect(&p, g, types[0], g.id("aT"));
    assert_eq!(matches.len(), 2);
    for m in &matches {
        for (t, name) in types.iter().zip(["aT", "bT", "cT", "dT", "eT"]) {
            assert_eq!(m.node_for(*t), Some(g.id(name)));
        }
        assert_eq!(m.node_for(inst[0]), Some(g.id("a1")));
        assert_eq!(m.node_for(inst[4]), Some(g.id("e1")));
        assert_eq!(m.len(), 10);
        assert_eq!(m.relationship_count(), 9);
    }
    assert_eq!(names(g, &matches, inst[2]), vec!["c1", "c2"]);
    assert_eq!(names(g, &matches, inst[3]), vec!["d1", "d2"]);
}

#[test]
fn teeth_structure_from_middle_instance() {
    let (p, _, inst) = teeth_pattern();
    let g = &*TEETH;
    let matches = collect(&p, g, inst[2], g.id("c2"));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node_for(inst[3]), Some(g.id("d2")));
    assert_eq!(matches[0].node_for(inst[0]), Some(g.id("a1")));
}

fn abc_pattern(cyclic: bool) -> (PatternGraph, [PatternNodeId; 3]) {
    let mut p = PatternGraph::new();
    let pa = p.create_node("pA");
    let pb = p.create_node("pB");
    let pc = p.create_node("pC");
    p.create_typed_relationship(pa, pb, "R1");
    p.create_typed_relationship(pb, pc, "R1");
    if cyclic {
        p.create_typed_relationship(pc, pa, "R1");
    }
    (p, [pa, pb, pc])
}

#[rstest]
#[case("A", 0, 3)]
#[case("B2", 1, 1)]
#[case("C", 2, 3)]
#[case("B2", 0, 0)]
fn non_cyclic_abc(#[case] start: &str, #[case] root: usize, #[case] expected: usize) {
    let (p, roots) = abc_pattern(false);
    let matches = collect(&p, &ABC, roots[root], ABC.id(start));
    assert_eq!(matches.len(), expected);
    for m in &matches {
        assert_eq!(m.node_for(roots[0]), Some(ABC.id("A")));
        assert_eq!(m.node_for(roots[2]), Some(ABC.id("C")));
        let rels: HashSet<_> = m.relationships().map(|(_, r)| r).collect();
        assert_eq!(rels.len(), 2);
    }
    let bs = match expected {
        0 => vec![],
        1 => vec![start],
        _ => vec!["B1", "B2", "B3"],
    };
    assert_eq!(names(&ABC, &matches, roots[1]), bs);
}

#[test]
fn cyclic_abc_requires_cycle_to_close_on_bound_nodes() {
    let mut g = abc_graph();
    g.rel("C", "A", "R1");
    let (p, [pa, pb, pc]) = abc_pattern(true);

    let matches = collect(&p, &g, pa, g.id("A"));
    assert_eq!(matches.len(), 3);
    assert_eq!(names(&g, &matches, pb), vec!["B1", "B2", "B3"]);
    for m in &matches {
        assert_eq!(m.node_for(pc), Some(g.id("C")));
        assert_eq!(m.relationship_count(), 3);
    }

    // Starting at B2 the cycle must come back to B2.
    let matches = collect(&p, &g, pb, g.id("B2"));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node_for(pa), Some(g.id("A")));
    assert_eq!(matches[0].node_for(pc), Some(g.id("C")));
}

fn property_abc(b1: Value, b2: Value, b3: Value) -> NamedGraph {
    let mut g = abc_graph();
    g.set("A", "hasProperty", true);
    g.set("B1", "equals", b1);
    g.set("B2", "equals", b2);
    g.set("B3", "equals", b3);
    g
}

#[rstest]
#[case::scalars(Value::Int(1), Value::Int(1), Value::Int(2))]
#[case::arrays(Value::from(vec![19, 1]), Value::from(vec![1, 10, 12]), Value::Int(2))]
fn node_property_constraints(#[case] b1: Value, #[case] b2: Value, #[case] b3: Value) {
    let g = property_abc(b1, b2, b3);
    let (mut p, [pa, pb, pc]) = abc_pattern(false);
    p.node_mut(pa).add_property_exist_constraint("hasProperty");
    p.node_mut(pb).add_property_equal_constraint("equals", 1);

    let matches = collect(&p, &g, pa, g.id("A"));
    assert_eq!(names(&g, &matches, pb), vec!["B1", "B2"]);

    let matches = collect(&p, &g, pb, g.id("B2"));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node_for(pa), Some(g.id("A")));
    assert_eq!(matches[0].node_for(pc), Some(g.id("C")));

    assert!(collect(&p, &g, pb, g.id("B3")).is_empty());
}

#[test]
fn missing_root_property_yields_nothing() {
    let (mut p, [pa, ..]) = abc_pattern(false);
    p.node_mut(pa).add_property_exist_constraint("hasProperty");
    assert!(collect(&p, &ABC, pa, ABC.id("A")).is_empty());
}

fn followers_graph() -> NamedGraph {
    let mut g = NamedGraph::new();
    g.rel("user", "user1", "FOLLOWS");
    g.rel("user1", "user3", "FOLLOWS");
    g.rel("user", "user2", "FOLLOWS");
    let messages: [(&str, &str, &[&str]); 7] = [
        ("user", "invisible", &["user1", "user2"]),
        ("user1", "visible", &["user", "user2", "user3"]),
        ("user1", "visible", &["user"]),
        ("user2", "visible", &["user", "user1"]),
        ("user2", "invisible", &["user1", "user3"]),
        ("user3", "invisible", &["user1", "user2"]),
        ("user3", "invisible", &["user"]),
    ];
    for (i, (creator, text, visible_by)) in messages.into_iter().enumerate() {
        let msg = format!("m{i}");
        g.rel(creator, &msg, "CREATED");
        g.set(&msg, "text", text);
        for user in visible_by {
            g.rel(&msg, user, "IS_VISIBLE_BY");
        }
    }
    g
}

#[test]
fn circular_pattern_returns_each_visible_message_once() {
    let g = &*FOLLOWERS;
    let mut p = PatternGraph::new();
    let start = p.create_node("start");
    let user = p.create_node("user");
    let message = p.create_node("message");
    p.create_typed_relationship(start, user, "FOLLOWS");
    p.create_typed_relationship(user, message, "CREATED");
    p.create_typed_relationship(message, start, "IS_VISIBLE_BY");

    let matches = collect(&p, g, start, g.id("user"));
    assert_eq!(matches.len(), 3);

    let messages: HashSet<_> = matches.iter().map(|m| m.node_for(message).unwrap()).collect();
    assert_eq!(messages.len(), 3);
    for m in messages {
        assert_eq!(
            g.graph.node_property(m, "text").unwrap(),
            Some(Value::from("visible"))
        );
    }
}

#[test]
fn star_pattern_binds_distinct_relationships() {
    // A -> B x3 -> C, pattern with two branches from A.
    let g = &*ABC;
    let mut p = PatternGraph::new();
    let pa = p.create_node("pA");
    let left = p.create_node("left");
    let right = p.create_node("right");
    let pc = p.create_node("pC");
    p.create_typed_relationship(pa, left, "R1");
    p.create_typed_relationship(pa, right, "R1");
    p.create_typed_relationship(left, pc, "R1");

    let matches = collect(&p, g, pa, g.id("A"));
    // Ordered pairs of distinct edges out of A.
    assert_eq!(matches.len(), 6);
    for m in &matches {
        assert_ne!(m.node_for(left), m.node_for(right));
        assert_eq!(m.node_for(pc), Some(g.id("C")));
        let rels: HashSet<_> = m.relationships().map(|(_, r)| r).collect();
        assert_eq!(rels.len(), m.relationship_count());
    }
}

#[test]
fn associations_pin_nodes_and_relationships() {
    let g = &*ABC;
    let (mut p, [pa, pb, _]) = abc_pattern(false);
    p.node_mut(pb).set_association(Some(g.id("B3")));
    let matches = collect(&p, g, pa, g.id("A"));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node_for(pb), Some(g.id("B3")));

    let (mut p, [pa, pb, _]) = abc_pattern(false);
    let ab = p.node(pa).relationships()[0];
    let target = g
        .graph
        .relationships(g.id("A"), None, graphmatch_common::Direction::Outgoing)
        .unwrap()[1];
    p.relationship_mut(ab).set_association(Some(target));
    let matches = collect(&p, g, pa, g.id("A"));
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node_for(pb), Some(g.id("B2")));

    // Root associated elsewhere: nothing.
    let (mut p, [pa, ..]) = abc_pattern(false);
    p.node_mut(pa).set_association(Some(g.id("C")));
    assert!(collect(&p, g, pa, g.id("A")).is_empty());
}

#[test]
fn matching_is_repeatable() {
    let g = &*ABC;
    let (p, [pa, ..]) = abc_pattern(false);
    let matcher = PatternMatcher::new(&p, &g.graph);
    let first: Vec<_> = matcher.matches(pa, g.id("A")).unwrap().map(Result::unwrap).collect();
    let second: Vec<_> = matcher.matches(pa, g.id("A")).unwrap().map(Result::unwrap).collect();
    assert_eq!(first, second);
    assert_eq!(matcher.count(pa, g.id("A"), &[]).unwrap(), 3);

    let mut it = matcher.matches(pa, g.id("A")).unwrap();
    assert_eq!(it.by_ref().count(), 3);
    assert!(it.next().is_none());
    assert!(it.next().is_none());
    assert_eq!(it.yielded(), 3);
}

#[rstest]
#[case(Some(2), Dedupe::None, 2)]
#[case(Some(0), Dedupe::None, 0)]
#[case(None, Dedupe::None, 2)]
#[case(None, Dedupe::Nodes, 1)]
#[case(Some(5), Dedupe::Nodes, 1)]
fn config_limit_and_dedupe(#[case] limit: Option<usize>, #[case] dedupe: Dedupe, #[case] expected: usize) {
    let mut g = NamedGraph::new();
    g.rel("a", "b", "R1");
    g.rel("a", "b", "R2");

    let mut p = PatternGraph::new();
    let pa = p.create_node("pA");
    let pb = p.create_node("pB");
    p.create_relationship(pa, pb, RelationshipSpec::any());

    let config = Config { limit, dedupe };
    let matcher = PatternMatcher::with_config(&p, &g.graph, config);
    assert_eq!(matcher.count(pa, g.id("a"), &[]).unwrap(), expected);
}

#[test]
fn find_first_and_unknown_root() {
    let g = &*ABC;
    let (p, [pa, pb, _]) = abc_pattern(false);
    let matcher = PatternMatcher::new(&p, &g.graph);
    let m = matcher.find_first(pa, g.id("A")).unwrap().unwrap();
    assert_eq!(m.node_for(pb), Some(g.id("B1")));

    let mut other: PatternGraph = PatternGraph::new();
    for _ in 0..5 {
        other.create_anonymous_node();
    }
    let foreign_id = other.nodes().map(|(id, _)| id).last().unwrap();
    assert!(matches!(
        matcher.matches(foreign_id, g.id("A")),
        Err(graphmatch_subgraph::MatchError::UnknownPatternNode(id)) if id == foreign_id
    ));
}
