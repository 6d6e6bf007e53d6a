//! Shared event builders.

use edmview_foundation::{DetectorConfig, ParticleId, Vector3};
use edmview_storage::{
    CaloHitRecord, ContributionRecord, EventStore, EventTables, ParticleRecord, TrackerHitRecord,
};
use proptest::prelude::*;

/// Z -> mu+ mu-, with the mu- radiating a photon that showers in the calorimeter.
pub fn z_decay() -> EventStore {
    let mut tables = EventTables::new();
    let tracker = tables.label("InnerTracker");
    let ecal = tables.label("ECalBarrel");
    let z = tables.add_particle(ParticleRecord {
        pdg: 23,
        mass: 91.19,
        ..ParticleRecord::default()
    });
    let mu_minus = tables.add_particle(ParticleRecord {
        pdg: 13,
        charge: -1.0,
        momentum: Vector3::new(20.0, 0.0, 15.0),
        ..ParticleRecord::default()
    });
    let mu_plus = tables.add_particle(ParticleRecord {
        pdg: -13,
        charge: 1.0,
        momentum: Vector3::new(-20.0, 0.0, -15.0),
        ..ParticleRecord::default()
    });
    let gamma = tables.add_particle(ParticleRecord {
        pdg: 22,
        momentum: Vector3::new(2.0, 0.0, 0.0),
        vertex: Vector3::new(400.0, 0.0, 300.0),
        ..ParticleRecord::default()
    });
    tables.set_decay_edges(&[(z, mu_minus), (z, mu_plus), (mu_minus, gamma)]);
    for particle in [mu_minus, mu_minus, mu_plus] {
        tables.add_tracker_hit(
            TrackerHitRecord {
                detector: tracker,
                ..TrackerHitRecord::default()
            },
            particle,
        );
    }
    tables.add_calo_hit(
        CaloHitRecord {
            energy: 1.5,
            detector: ecal,
            ..CaloHitRecord::default()
        },
        [
            (contribution(22, 1.0), gamma),
            (contribution(22, 0.5), gamma),
        ],
    );
    tables.add_calo_hit(
        CaloHitRecord {
            energy: 0.25,
            detector: ecal,
            ..CaloHitRecord::default()
        },
        [(contribution(13, 0.25), mu_minus)],
    );
    EventStore::new(tables, DetectorConfig::default()).unwrap()
}

pub fn contribution(pdg: i32, energy: f64) -> ContributionRecord {
    ContributionRecord {
        pdg,
        energy,
        ..ContributionRecord::default()
    }
}

/// Random well-formed events: a decay edge list over `n` particles plus calo
/// hits with contiguous contribution ranges.
pub fn arb_event() -> impl Strategy<Value = EventStore> {
    (1usize..25).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..40),
            prop::collection::vec(prop::collection::vec(0..n, 0..4), 0..10),
            prop::collection::vec(0..n, 0..20),
        )
            .prop_map(|(n, edges, calo_hits, tracker_hits)| {
                let mut tables = EventTables::new();
                let ids: Vec<ParticleId> = (0..n)
                    .map(|i| {
                        tables.add_particle(ParticleRecord {
                            pdg: i32::try_from(i).unwrap_or_default(),
                            ..ParticleRecord::default()
                        })
                    })
                    .collect();
                let edges: Vec<_> = edges.into_iter().map(|(p, d)| (ids[p], ids[d])).collect();
                tables.set_decay_edges(&edges);
                for particles in calo_hits {
                    tables.add_calo_hit(
                        CaloHitRecord::default(),
                        particles.into_iter().map(|p| (contribution(0, 1.0), ids[p])),
                    );
                }
                for p in tracker_hits {
                    tables.add_tracker_hit(TrackerHitRecord::default(), ids[p]);
                }
                EventStore::new(tables, DetectorConfig::default()).unwrap()
            })
    })
}
