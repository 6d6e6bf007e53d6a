//! Integration tests for entity views

use std::collections::HashSet;

use edmview_foundation::{CaloHitId, ContributionId, ParticleId, TrackerHitId};
use edmview_storage::CaloContribution;

use crate::fixtures::z_decay;

#[test]
fn views_are_validated_on_creation() {
    let store = z_decay();
    assert!(store.particle(ParticleId::new(4)).unwrap_err().is_not_found());
    assert!(store.tracker_hit(TrackerHitId::new(3)).is_err());
    assert!(store.calo_hit(CaloHitId::new(2)).is_err());
    assert!(store.contribution(ContributionId::new(3)).is_err());
}

#[test]
fn particle_navigation() {
    let store = z_decay();
    let z = store.particle(ParticleId::new(0)).unwrap();
    let daughters = z.daughters().unwrap();
    assert_eq!(daughters.iter().map(|p| p.pdg()).collect::<Vec<_>>(), vec![13, -13]);
    assert_eq!(daughters[0].parents().unwrap(), vec![z]);
    let gamma = daughters[0].daughters().unwrap()[0];
    assert_eq!(gamma.pdg(), 22);
    assert_eq!(
        gamma.ancestors().unwrap().iter().map(|p| p.pdg()).collect::<Vec<_>>(),
        vec![23, 13]
    );
}

#[test]
fn kinematics() {
    let store = z_decay();
    let mu = store.particle(ParticleId::new(1)).unwrap();
    assert!((mu.pt() - 20.0).abs() < 1e-12);
    assert!((mu.p() - 25.0).abs() < 1e-12);
    assert!(mu.eta() > 0.0);
    assert!(mu.phi().abs() < 1e-12);
}

#[test]
fn views_compare_by_identity() {
    let store = z_decay();
    let other = z_decay();
    let a = store.particle(ParticleId::new(1)).unwrap();
    assert_eq!(a, store.particle(ParticleId::new(1)).unwrap());
    assert_ne!(a, other.particle(ParticleId::new(1)).unwrap());
    let set: HashSet<_> = store.iter_particles().chain(store.iter_particles()).collect();
    assert_eq!(set.len(), 4);
}

#[test]
fn tracker_hits_of_particle() {
    let store = z_decay();
    let mu = store.particle(ParticleId::new(1)).unwrap();
    let hits = mu.tracker_hits().unwrap();
    assert_eq!(hits.len(), 2);
    for hit in hits {
        assert_eq!(hit.particle().unwrap(), mu);
        assert_eq!(hit.detector_name(), Some("InnerTracker"));
    }
}

#[test]
fn calo_hit_contributions_and_owner() {
    let store = z_decay();
    for hit in store.iter_calo_hits() {
        let contributions = hit.contributions().unwrap();
        let total: f64 = contributions.iter().map(CaloContribution::energy).sum();
        assert!((total - hit.energy()).abs() < 1e-12);
        for c in contributions {
            assert_eq!(c.hit().unwrap(), hit);
        }
    }
    let gamma = store.particle(ParticleId::new(3)).unwrap();
    assert_eq!(gamma.calo_contributions().unwrap().len(), 2);
}

#[test]
fn selection_helpers() {
    let store = z_decay();
    let gamma = store.particle(ParticleId::new(3)).unwrap();
    assert!(gamma.created_in_tracker());
    assert!(gamma.passes_energy_threshold());
}

#[test]
fn record_matches_table_row() {
    let store = z_decay();
    let mu = store.particle(ParticleId::new(2)).unwrap();
    assert_eq!(mu.record(), store.row(ParticleId::new(2)).unwrap());
    assert_eq!(mu.record().momentum, mu.momentum());
}
