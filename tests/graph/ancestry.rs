//! Integration tests for ancestor and descendant queries

use edmview_foundation::{DetectorConfig, ParticleId, ParticleSet};
use edmview_graph::DecayGraph;
use edmview_storage::{EventStore, EventTables, ParticleRecord};
use proptest::prelude::*;

fn store_with_edges(n: usize, edges: &[(usize, usize)]) -> EventStore {
    let mut tables = EventTables::new();
    let ids: Vec<ParticleId> = (0..n)
        .map(|_| tables.add_particle(ParticleRecord::default()))
        .collect();
    let edges: Vec<_> = edges.iter().map(|&(p, d)| (ids[p], ids[d])).collect();
    tables.set_decay_edges(&edges);
    EventStore::new(tables, DetectorConfig::default()).unwrap()
}

fn set(ids: &[u32]) -> ParticleSet {
    ids.iter().copied().map(ParticleId::new).collect()
}

#[test]
fn three_particle_scenario() {
    let store = store_with_edges(3, &[(0, 1), (0, 2)]);
    let graph = store.decay_graph().unwrap();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.ancestors(ParticleId::new(2)).unwrap(), set(&[0]));
    assert_eq!(graph.descendants(ParticleId::new(0)).unwrap(), set(&[1, 2]));
    assert!(graph.descendants(ParticleId::new(1)).unwrap().is_empty());
}

#[test]
fn deep_chain() {
    let edges: Vec<_> = (0..9).map(|i| (i, i + 1)).collect();
    let store = store_with_edges(10, &edges);
    let graph = store.decay_graph().unwrap();
    assert_eq!(graph.ancestors(ParticleId::new(9)).unwrap().len(), 9);
    assert_eq!(graph.descendants(ParticleId::new(0)).unwrap().len(), 9);
    assert_eq!(graph.roots().collect::<Vec<_>>(), vec![ParticleId::new(0)]);
    assert_eq!(graph.leaves().collect::<Vec<_>>(), vec![ParticleId::new(9)]);
}

#[test]
fn isolated_particles_are_nodes() {
    let store = store_with_edges(4, &[(0, 1)]);
    let graph = store.decay_graph().unwrap();
    assert_eq!(graph.node_count(), 4);
    assert!(graph.contains(ParticleId::new(3)));
    assert!(graph.ancestors(ParticleId::new(3)).unwrap().is_empty());
}

#[test]
fn cyclic_input_terminates() {
    let store = store_with_edges(3, &[(0, 1), (1, 2), (2, 0)]);
    let graph = store.decay_graph().unwrap();
    assert_eq!(graph.descendants(ParticleId::new(0)).unwrap(), set(&[1, 2]));
    assert_eq!(graph.ancestors(ParticleId::new(0)).unwrap(), set(&[1, 2]));
}

#[test]
fn unknown_particle_is_not_found() {
    let store = store_with_edges(2, &[(0, 1)]);
    let graph = store.decay_graph().unwrap();
    assert!(graph.ancestors(ParticleId::new(2)).unwrap_err().is_not_found());
}

#[test]
fn graph_agrees_with_link_tables() {
    let store = store_with_edges(5, &[(0, 1), (0, 2), (2, 3), (2, 4), (1, 4)]);
    let graph = store.decay_graph().unwrap();
    for p in store.iter_particles() {
        let mut expected: Vec<_> = p.daughters().unwrap().iter().map(|d| d.id()).collect();
        expected.sort();
        let mut from_graph = graph.daughters(p.id()).unwrap();
        from_graph.sort();
        assert_eq!(from_graph, expected);
    }
}

#[test]
fn from_edges_rejects_out_of_range_node() {
    let err = DecayGraph::from_edges(2, [(ParticleId::new(0), ParticleId::new(2))]).unwrap_err();
    assert!(err.is_not_found());
}

fn arb_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..20).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..40)))
}

proptest! {
    #[test]
    fn ancestry_is_path_consistent((n, edges) in arb_graph()) {
        let store = store_with_edges(n, &edges);
        let graph = store.decay_graph().unwrap();
        for a in store.ids::<ParticleId>() {
            let descendants = graph.descendants(a).unwrap();
            prop_assert!(!descendants.contains(&a));
            for b in store.ids::<ParticleId>() {
                let ancestors_of_b = graph.ancestors(b).unwrap();
                if a != b {
                    prop_assert_eq!(descendants.contains(&b), ancestors_of_b.contains(&a));
                }
            }
        }
    }

    #[test]
    fn daughters_are_descendants((n, edges) in arb_graph()) {
        let store = store_with_edges(n, &edges);
        let graph = store.decay_graph().unwrap();
        for (parent, daughter) in graph.edges() {
            if parent != daughter {
                prop_assert!(graph.descendants(parent).unwrap().contains(&daughter));
                prop_assert!(graph.ancestors(daughter).unwrap().contains(&parent));
            }
        }
    }
}
