//! Entity views: identity-only handles onto store rows.
//!
//! A view is a store reference plus a row id. Views are validated when
//! created, read their store on every attribute access (one row read per
//! call, nothing cached), and compare equal when they address the same row
//! of the same store.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

use edmview_foundation::{
    CaloHitId, ContributionId, DetectorLabel, LinkRange, ParticleId, Result, RowId,
    SimulatorStatus, TrackerHitId, Vector3,
};

use crate::relationship::{Contributions, Daughters, Parents};
use crate::store::{EventStore, StoredRow};
use crate::table::{CaloHitRecord, ContributionRecord, ParticleRecord, TrackerHitRecord};

macro_rules! entity_view {
    ($(#[$meta:meta])* $view:ident, $id:ty, $record:ty) => {
        $(#[$meta])*
        #[derive(Copy, Clone)]
        pub struct $view<'s> {
            store: &'s EventStore,
            id: $id,
        }

        impl<'s> $view<'s> {
            pub(crate) fn new(store: &'s EventStore, id: $id) -> Result<Self> {
                store.check(id)?;
                Ok(Self { store, id })
            }

            /// `id` must already be known to be in bounds.
            pub(crate) fn new_unchecked(store: &'s EventStore, id: $id) -> Self {
                debug_assert!(store.contains(id));
                Self { store, id }
            }

            /// Row id of this entity.
            #[must_use]
            pub fn id(&self) -> $id {
                self.id
            }

            /// The store this view reads from.
            #[must_use]
            pub fn store(&self) -> &'s EventStore {
                self.store
            }

            /// Copies this entity's row out of the store.
            #[must_use]
            pub fn record(&self) -> $record {
                <$id as StoredRow>::read(self.store, self.id.index())
            }
        }

        impl PartialEq for $view<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id && ptr::eq(self.store, other.store)
            }
        }

        impl Eq for $view<'_> {}

        impl Hash for $view<'_> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
                ptr::hash(self.store, state);
            }
        }

        impl fmt::Debug for $view<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($view)).field(&self.id).finish()
            }
        }
    };
}

entity_view!(
    /// View of one particle.
    Particle,
    ParticleId,
    ParticleRecord
);
entity_view!(
    /// View of one tracker hit.
    TrackerHit,
    TrackerHitId,
    TrackerHitRecord
);
entity_view!(
    /// View of one calorimeter hit.
    CaloHit,
    CaloHitId,
    CaloHitRecord
);
entity_view!(
    /// View of one calorimeter contribution.
    CaloContribution,
    ContributionId,
    ContributionRecord
);

fn wrap<'s, I, V>(
    store: &'s EventStore,
    ids: impl IntoIterator<Item = I>,
    view: fn(&'s EventStore, I) -> Result<V>,
) -> Result<Vec<V>> {
    ids.into_iter().map(|id| view(store, id)).collect()
}

// =============================================================================
// Particle
// =============================================================================

impl<'s> Particle<'s> {
    /// PDG code.
    #[must_use]
    pub fn pdg(&self) -> i32 {
        self.record().pdg
    }

    /// Charge.
    #[must_use]
    pub fn charge(&self) -> f32 {
        self.record().charge
    }

    /// Mass.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.record().mass
    }

    /// Creation time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.record().time
    }

    /// Momentum at the production vertex.
    #[must_use]
    pub fn momentum(&self) -> Vector3 {
        self.record().momentum
    }

    /// Transverse momentum.
    #[must_use]
    pub fn pt(&self) -> f64 {
        self.record().pt()
    }

    /// Pseudorapidity.
    #[must_use]
    pub fn eta(&self) -> f64 {
        self.record().eta()
    }

    /// Azimuthal angle.
    #[must_use]
    pub fn phi(&self) -> f64 {
        self.record().phi()
    }

    /// Momentum magnitude.
    #[must_use]
    pub fn p(&self) -> f64 {
        self.record().p()
    }

    /// Energy.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.record().energy()
    }

    /// Production vertex.
    #[must_use]
    pub fn vertex(&self) -> Vector3 {
        self.record().vertex
    }

    /// Endpoint.
    #[must_use]
    pub fn endpoint(&self) -> Vector3 {
        self.record().endpoint
    }

    /// Generator status code.
    #[must_use]
    pub fn generator_status(&self) -> i32 {
        self.record().generator_status
    }

    /// Simulator status bitfield.
    #[must_use]
    pub fn simulator_status(&self) -> SimulatorStatus {
        self.record().simulator_status
    }

    /// Parent particles, in link-table order.
    ///
    /// # Errors
    ///
    /// Range error for a malformed parent range; not-found for a link naming
    /// a particle outside the table.
    pub fn parents(&self) -> Result<Vec<Particle<'s>>> {
        let ids = self.store.resolver().resolve_forward::<Parents>(self.id)?;
        wrap(self.store, ids, Particle::new)
    }

    /// Daughter particles, in link-table order.
    ///
    /// # Errors
    ///
    /// Range error for a malformed daughter range; not-found for a link naming
    /// a particle outside the table.
    pub fn daughters(&self) -> Result<Vec<Particle<'s>>> {
        let ids = self.store.resolver().resolve_forward::<Daughters>(self.id)?;
        wrap(self.store, ids, Particle::new)
    }

    /// Every particle with a decay path to this one, by row id.
    ///
    /// # Errors
    ///
    /// Any error from building the store's decay graph.
    pub fn ancestors(&self) -> Result<Vec<Particle<'s>>> {
        let ids = self.store.decay_graph()?.ancestors(self.id)?;
        wrap(self.store, ids, Particle::new)
    }

    /// Every particle reachable by decay from this one, by row id.
    ///
    /// # Errors
    ///
    /// Any error from building the store's decay graph.
    pub fn descendants(&self) -> Result<Vec<Particle<'s>>> {
        let ids = self.store.decay_graph()?.descendants(self.id)?;
        wrap(self.store, ids, Particle::new)
    }

    /// Tracker hits this particle produced, by row id.
    ///
    /// # Errors
    ///
    /// Not-found if any tracker link in the store names a missing particle.
    pub fn tracker_hits(&self) -> Result<Vec<TrackerHit<'s>>> {
        let ids = self.store.resolver().particle_tracker_hits(self.id)?;
        Ok(ids
            .iter()
            .map(|&id| TrackerHit::new_unchecked(self.store, id))
            .collect())
    }

    /// Calorimeter contributions this particle made, by row id.
    ///
    /// # Errors
    ///
    /// Not-found if any contribution link in the store names a missing particle.
    pub fn calo_contributions(&self) -> Result<Vec<CaloContribution<'s>>> {
        let ids = self.store.resolver().particle_contributions(self.id)?;
        Ok(ids
            .iter()
            .map(|&id| CaloContribution::new_unchecked(self.store, id))
            .collect())
    }

    /// Returns true if the production vertex lies inside the store's tracking volume.
    #[must_use]
    pub fn created_in_tracker(&self) -> bool {
        self.store.config().within_tracking_volume(self.vertex())
    }

    /// Returns true if the energy reaches the store's energy threshold.
    #[must_use]
    pub fn passes_energy_threshold(&self) -> bool {
        self.store.config().passes_energy_threshold(self.energy())
    }
}

// =============================================================================
// Tracker hit
// =============================================================================

impl<'s> TrackerHit<'s> {
    /// Hit position.
    #[must_use]
    pub fn position(&self) -> Vector3 {
        self.record().position
    }

    /// Particle momentum at the hit.
    #[must_use]
    pub fn momentum(&self) -> Vector3 {
        self.record().momentum
    }

    /// Hit time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.record().time
    }

    /// Deposited energy.
    #[must_use]
    pub fn edep(&self) -> f64 {
        self.record().edep
    }

    /// Path length in the sensitive material.
    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.record().path_length
    }

    /// Quality flags.
    #[must_use]
    pub fn quality(&self) -> i32 {
        self.record().quality
    }

    /// Detector cell id.
    #[must_use]
    pub fn cell_id(&self) -> u64 {
        self.record().cell_id
    }

    /// Detector label.
    #[must_use]
    pub fn detector(&self) -> DetectorLabel {
        self.record().detector
    }

    /// Detector name, if the label is known to the store.
    #[must_use]
    pub fn detector_name(&self) -> Option<&'s str> {
        self.store.labels().resolve(self.detector())
    }

    /// The particle that produced this hit.
    ///
    /// # Errors
    ///
    /// Not-found if the hit's link names a particle outside the table.
    pub fn particle(&self) -> Result<Particle<'s>> {
        let id = self.store.resolver().tracker_hit_particle(self.id)?;
        Ok(Particle::new_unchecked(self.store, id))
    }
}

// =============================================================================
// Calo hit
// =============================================================================

impl<'s> CaloHit<'s> {
    /// Cell position.
    #[must_use]
    pub fn position(&self) -> Vector3 {
        self.record().position
    }

    /// Total cell energy.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.record().energy
    }

    /// Detector cell id.
    #[must_use]
    pub fn cell_id(&self) -> u64 {
        self.record().cell_id
    }

    /// Detector label.
    #[must_use]
    pub fn detector(&self) -> DetectorLabel {
        self.record().detector
    }

    /// Detector name, if the label is known to the store.
    #[must_use]
    pub fn detector_name(&self) -> Option<&'s str> {
        self.store.labels().resolve(self.detector())
    }

    /// Slice of the contribution table owned by this hit.
    #[must_use]
    pub fn contribution_range(&self) -> LinkRange {
        self.record().contributions
    }

    /// Contributions to this hit, in table order. Empty when the range is empty.
    ///
    /// # Errors
    ///
    /// Range error if the hit's contribution range is malformed.
    pub fn contributions(&self) -> Result<Vec<CaloContribution<'s>>> {
        let ids = self.store.resolver().resolve_forward::<Contributions>(self.id)?;
        Ok(ids
            .into_iter()
            .map(|id| CaloContribution::new_unchecked(self.store, id))
            .collect())
    }
}

// =============================================================================
// Calo contribution
// =============================================================================

impl<'s> CaloContribution<'s> {
    /// PDG code of the depositing particle.
    #[must_use]
    pub fn pdg(&self) -> i32 {
        self.record().pdg
    }

    /// Deposited energy.
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.record().energy
    }

    /// Deposit time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.record().time
    }

    /// Position of the simulation step.
    #[must_use]
    pub fn step_position(&self) -> Vector3 {
        self.record().step_position
    }

    /// The calo hit whose contribution range contains this contribution.
    ///
    /// # Errors
    ///
    /// Orphaned-entity if no calo hit owns it; range error if the calo hit
    /// ranges are malformed or overlap.
    pub fn hit(&self) -> Result<CaloHit<'s>> {
        let id = self.store.resolver().resolve_reverse_by_scan(self.id)?;
        Ok(CaloHit::new_unchecked(self.store, id))
    }

    /// The particle that made this contribution.
    ///
    /// # Errors
    ///
    /// Not-found if the contribution's link names a particle outside the table.
    pub fn particle(&self) -> Result<Particle<'s>> {
        let id = self.store.resolver().contribution_particle(self.id)?;
        Ok(Particle::new_unchecked(self.store, id))
    }
}
