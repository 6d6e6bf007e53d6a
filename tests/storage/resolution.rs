//! Integration tests for range-linked relationship resolution
//!
//! Tests forward slicing, empty and malformed ranges, and reverse lookups.

use edmview_foundation::{
    CaloHitId, ContributionId, DetectorConfig, LinkRange, ParticleId, RowId, TrackerHitId,
};
use edmview_storage::{
    CaloHitRecord, Contributions, Daughters, EventStore, EventTables, ParticleRecord, Parents,
};
use proptest::prelude::*;

use crate::fixtures::{arb_event, z_decay};

// =============================================================================
// Forward Resolution
// =============================================================================

#[test]
fn daughters_in_link_table_order() {
    let store = z_decay();
    let resolver = store.resolver();
    let p = ParticleId::new;
    assert_eq!(resolver.resolve_forward::<Daughters>(p(0)).unwrap(), vec![p(1), p(2)]);
    assert_eq!(resolver.resolve_forward::<Daughters>(p(1)).unwrap(), vec![p(3)]);
    assert!(resolver.resolve_forward::<Daughters>(p(3)).unwrap().is_empty());
    assert_eq!(resolver.resolve_forward::<Parents>(p(3)).unwrap(), vec![p(1)]);
}

#[test]
fn three_particle_scenario() {
    let mut tables = EventTables::new();
    let p = ParticleId::new;
    for _ in 0..3 {
        tables.add_particle(ParticleRecord::default());
    }
    tables.set_decay_edges(&[(p(0), p(1)), (p(0), p(2))]);
    let store = EventStore::new(tables, DetectorConfig::default()).unwrap();

    let resolver = store.resolver();
    assert_eq!(resolver.resolve_forward::<Daughters>(p(0)).unwrap(), vec![p(1), p(2)]);
    assert_eq!(resolver.resolve_forward::<Parents>(p(1)).unwrap(), vec![p(0)]);
    assert_eq!(resolver.resolve_forward::<Parents>(p(2)).unwrap(), vec![p(0)]);
    assert!(resolver.resolve_forward::<Parents>(p(0)).unwrap().is_empty());
}

#[test]
fn unknown_owner_is_not_found() {
    let store = z_decay();
    let err = store
        .resolver()
        .resolve_forward::<Daughters>(ParticleId::new(99))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn malformed_range_is_range_error_with_owner() {
    let mut tables = EventTables::new();
    tables.add_particle(ParticleRecord {
        daughters: LinkRange::new(2, 1),
        ..ParticleRecord::default()
    });
    let store = EventStore::new(tables, DetectorConfig::default()).unwrap();
    let err = store
        .resolver()
        .resolve_forward::<Daughters>(ParticleId::new(0))
        .unwrap_err();
    assert!(err.is_range());
    assert!(format!("{err}").contains("particle 0"));
}

#[test]
fn calo_hit_with_empty_range_past_table_end() {
    let mut tables = EventTables::new();
    for _ in 0..5 {
        tables.add_calo_hit(CaloHitRecord::default(), []);
    }
    tables.calo_hits.push(CaloHitRecord {
        contributions: LinkRange::new(5, 5),
        ..CaloHitRecord::default()
    });
    let store = EventStore::new(tables, DetectorConfig::default()).unwrap();
    let contributions = store
        .resolver()
        .resolve_forward::<Contributions>(CaloHitId::new(5))
        .unwrap();
    assert!(contributions.is_empty());
}

// =============================================================================
// Reverse Resolution
// =============================================================================

#[test]
fn contribution_owner_by_range() {
    let store = z_decay();
    let resolver = store.resolver();
    let c = ContributionId::new;
    assert_eq!(resolver.resolve_reverse_by_scan(c(0)).unwrap(), CaloHitId::new(0));
    assert_eq!(resolver.resolve_reverse_by_scan(c(1)).unwrap(), CaloHitId::new(0));
    assert_eq!(resolver.resolve_reverse_by_scan(c(2)).unwrap(), CaloHitId::new(1));
    assert!(resolver.resolve_reverse_by_scan(c(3)).unwrap_err().is_not_found());
}

#[test]
fn hit_to_particle_links() {
    let store = z_decay();
    let resolver = store.resolver();
    assert_eq!(
        resolver.tracker_hit_particle(TrackerHitId::new(2)).unwrap(),
        ParticleId::new(2)
    );
    assert_eq!(
        resolver.contribution_particle(ContributionId::new(2)).unwrap(),
        ParticleId::new(1)
    );
    assert_eq!(
        resolver.particle_tracker_hits(ParticleId::new(1)).unwrap(),
        &[TrackerHitId::new(0), TrackerHitId::new(1)]
    );
    assert_eq!(
        resolver.particle_contributions(ParticleId::new(3)).unwrap(),
        &[ContributionId::new(0), ContributionId::new(1)]
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn parent_daughter_symmetry(store in arb_event()) {
        let resolver = store.resolver();
        for a in store.ids::<ParticleId>() {
            for b in resolver.resolve_forward::<Daughters>(a).unwrap() {
                prop_assert!(resolver.resolve_forward::<Parents>(b).unwrap().contains(&a));
            }
            for b in resolver.resolve_forward::<Parents>(a).unwrap() {
                prop_assert!(resolver.resolve_forward::<Daughters>(b).unwrap().contains(&a));
            }
        }
    }

    #[test]
    fn every_contribution_has_one_containing_owner(store in arb_event()) {
        let resolver = store.resolver();
        for c in store.ids::<ContributionId>() {
            let hit = resolver.resolve_reverse_by_scan(c).unwrap();
            let range = store.link_range::<Contributions>(hit).unwrap();
            prop_assert!(range.contains(c.raw()));
            let owners = store
                .ids::<CaloHitId>()
                .filter(|&h| store.link_range::<Contributions>(h).unwrap().contains(c.raw()))
                .count();
            prop_assert_eq!(owners, 1);
        }
    }

    #[test]
    fn reverse_indices_agree_with_links(store in arb_event()) {
        let resolver = store.resolver();
        for p in store.ids::<ParticleId>() {
            for &hit in resolver.particle_tracker_hits(p).unwrap() {
                prop_assert_eq!(resolver.tracker_hit_particle(hit).unwrap(), p);
            }
        }
        let total: usize = store
            .ids::<ParticleId>()
            .map(|p| resolver.particle_contributions(p).unwrap().len())
            .sum();
        prop_assert_eq!(total, store.contributions().len());
    }
}
