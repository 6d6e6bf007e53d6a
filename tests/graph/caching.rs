//! Integration tests for decay graph caching

use std::thread;

use edmview_foundation::{DetectorConfig, ParticleId};
use edmview_graph::DecayGraph;
use edmview_storage::{EventStore, EventTables, ParticleRecord};

fn chain(n: u32) -> EventStore {
    let mut tables = EventTables::new();
    for _ in 0..n {
        tables.add_particle(ParticleRecord::default());
    }
    let edges: Vec<_> = (1..n)
        .map(|i| (ParticleId::new(i - 1), ParticleId::new(i)))
        .collect();
    tables.set_decay_edges(&edges);
    EventStore::new(tables, DetectorConfig::default()).unwrap()
}

#[test]
fn graph_is_built_on_first_request() {
    let store = chain(4);
    assert!(!store.has_decay_graph());
    store.particle(ParticleId::new(0)).unwrap().daughters().unwrap();
    assert!(!store.has_decay_graph());
    store.particle(ParticleId::new(3)).unwrap().ancestors().unwrap();
    assert!(store.has_decay_graph());
}

#[test]
fn concurrent_first_callers_share_one_graph() {
    let store = chain(500);
    let addresses: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let graph: *const DecayGraph = store.decay_graph().unwrap();
                    graph as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(store.decay_graph().unwrap().edge_count(), 499);
}

#[test]
fn invalidation_rebuilds() {
    let mut store = chain(3);
    let before = store.decay_graph().unwrap().clone();
    store.invalidate_decay_graph();
    assert!(!store.has_decay_graph());
    let after = store.decay_graph().unwrap();
    assert_eq!(before.edges().collect::<Vec<_>>(), after.edges().collect::<Vec<_>>());
}
