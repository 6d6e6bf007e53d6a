//! The columnar event store.
//!
//! An `EventStore` exclusively owns one event's tables plus everything derived
//! from them: the decay graph and the reverse-lookup indices. Tables are
//! immutable once the store is assembled, so derived structures are built on
//! first request and kept until explicitly invalidated.

use edmview_foundation::{
    CaloHitId, ContributionId, DetectorConfig, EntityKind, Error, Labels, LinkRange, ParticleId,
    Result, RowId, TrackerHitId,
};
use edmview_graph::DecayGraph;

use crate::lazy::BuildOnce;
use crate::relationship::{Daughters, OwnerIndex, Parents, RangeRelation, Resolver, ReverseIndex};
use crate::table::{
    CaloHitRecord, CaloHitTable, ContributionRecord, ContributionTable, EventTables,
    ParticleRecord, ParticleTable, TrackerHitRecord, TrackerHitTable,
};
use crate::view::{CaloContribution, CaloHit, Particle, TrackerHit};

/// A row id whose table lives in an [`EventStore`].
pub trait StoredRow: RowId {
    /// The row copied out of the table.
    type Record: Copy;

    /// Number of rows in this id's table.
    fn row_count(store: &EventStore) -> usize;

    /// Copies row `index` out of the table. `index` must be in bounds.
    fn read(store: &EventStore, index: usize) -> Self::Record;
}

impl StoredRow for ParticleId {
    type Record = ParticleRecord;

    fn row_count(store: &EventStore) -> usize {
        store.tables.particles.len()
    }

    fn read(store: &EventStore, index: usize) -> ParticleRecord {
        store.tables.particles.record(index)
    }
}

impl StoredRow for TrackerHitId {
    type Record = TrackerHitRecord;

    fn row_count(store: &EventStore) -> usize {
        store.tables.tracker_hits.len()
    }

    fn read(store: &EventStore, index: usize) -> TrackerHitRecord {
        store.tables.tracker_hits.record(index)
    }
}

impl StoredRow for CaloHitId {
    type Record = CaloHitRecord;

    fn row_count(store: &EventStore) -> usize {
        store.tables.calo_hits.len()
    }

    fn read(store: &EventStore, index: usize) -> CaloHitRecord {
        store.tables.calo_hits.record(index)
    }
}

impl StoredRow for ContributionId {
    type Record = ContributionRecord;

    fn row_count(store: &EventStore) -> usize {
        store.tables.contributions.len()
    }

    fn read(store: &EventStore, index: usize) -> ContributionRecord {
        store.tables.contributions.record(index)
    }
}

/// One event's tables and the structures derived from them.
#[derive(Debug)]
pub struct EventStore {
    tables: EventTables,
    config: DetectorConfig,
    decay_graph: BuildOnce<DecayGraph>,
    contribution_owners: BuildOnce<OwnerIndex>,
    particle_tracker_hits: BuildOnce<ReverseIndex<TrackerHitId>>,
    particle_contributions: BuildOnce<ReverseIndex<ContributionId>>,
}

impl EventStore {
    /// Takes ownership of already-loaded tables.
    ///
    /// Only the table shapes are checked here; range contents are checked
    /// when a range is sliced, or all at once by [`Self::validate`].
    ///
    /// # Errors
    ///
    /// Misaligned-column error if a table's columns differ in length or a
    /// row-aligned link table does not match its table; invalid-config error
    /// if a table has more rows than a row id can address.
    pub fn new(tables: EventTables, config: DetectorConfig) -> Result<Self> {
        let particles = tables.particles.check_columns()?;
        let tracker_hits = tables.tracker_hits.check_columns()?;
        let calo_hits = tables.calo_hits.check_columns()?;
        let contributions = tables.contributions.check_columns()?;
        if tables.tracker_links.len() != tracker_hits {
            return Err(Error::misaligned(
                "tracker_hits",
                "particle_link",
                tracker_hits,
                tables.tracker_links.len(),
            ));
        }
        if tables.contribution_links.len() != contributions {
            return Err(Error::misaligned(
                "contributions",
                "particle_link",
                contributions,
                tables.contribution_links.len(),
            ));
        }
        for (kind, rows) in [
            (EntityKind::Particle, particles),
            (EntityKind::TrackerHit, tracker_hits),
            (EntityKind::CaloHit, calo_hits),
            (EntityKind::CaloContribution, contributions),
        ] {
            if u32::try_from(rows).is_err() {
                return Err(Error::invalid_config(format!(
                    "{kind} table has {rows} rows, more than row ids can address"
                )));
            }
        }
        tracing::debug!(
            particles,
            tracker_hits,
            calo_hits,
            contributions,
            "assembled event store"
        );
        Ok(Self {
            tables,
            config,
            decay_graph: BuildOnce::new(),
            contribution_owners: BuildOnce::new(),
            particle_tracker_hits: BuildOnce::new(),
            particle_contributions: BuildOnce::new(),
        })
    }

    /// Detector parameters this event was loaded with.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// All tables, for bulk columnar access.
    #[must_use]
    pub fn tables(&self) -> &EventTables {
        &self.tables
    }

    /// Particle table.
    #[must_use]
    pub fn particles(&self) -> &ParticleTable {
        &self.tables.particles
    }

    /// Tracker hit table.
    #[must_use]
    pub fn tracker_hits(&self) -> &TrackerHitTable {
        &self.tables.tracker_hits
    }

    /// Calo hit table.
    #[must_use]
    pub fn calo_hits(&self) -> &CaloHitTable {
        &self.tables.calo_hits
    }

    /// Calo contribution table.
    #[must_use]
    pub fn contributions(&self) -> &ContributionTable {
        &self.tables.contributions
    }

    /// Flat parent link table.
    #[must_use]
    pub fn parent_links(&self) -> &[ParticleId] {
        &self.tables.parent_links
    }

    /// Flat daughter link table.
    #[must_use]
    pub fn daughter_links(&self) -> &[ParticleId] {
        &self.tables.daughter_links
    }

    /// Row-aligned tracker hit -> particle links.
    #[must_use]
    pub fn tracker_links(&self) -> &[ParticleId] {
        &self.tables.tracker_links
    }

    /// Row-aligned contribution -> particle links.
    #[must_use]
    pub fn contribution_links(&self) -> &[ParticleId] {
        &self.tables.contribution_links
    }

    /// Detector label names.
    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.tables.labels
    }

    /// Number of rows of the given kind.
    #[must_use]
    pub fn row_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Particle => self.tables.particles.len(),
            EntityKind::TrackerHit => self.tables.tracker_hits.len(),
            EntityKind::CaloHit => self.tables.calo_hits.len(),
            EntityKind::CaloContribution => self.tables.contributions.len(),
        }
    }

    /// Returns true if `id` addresses an existing row.
    #[must_use]
    pub fn contains<I: StoredRow>(&self, id: I) -> bool {
        id.index() < I::row_count(self)
    }

    /// Fails with not-found unless `id` addresses an existing row.
    ///
    /// # Errors
    ///
    /// Not-found if `id` is outside `[0, row_count)`.
    pub fn check<I: StoredRow>(&self, id: I) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::not_found(id, I::row_count(self)))
        }
    }

    /// Copies one row out of its table.
    ///
    /// # Errors
    ///
    /// Not-found if `id` is outside `[0, row_count)`.
    pub fn row<I: StoredRow>(&self, id: I) -> Result<I::Record> {
        self.check(id)?;
        Ok(I::read(self, id.index()))
    }

    /// All ids of one table, ascending.
    pub fn ids<I: StoredRow>(&self) -> impl Iterator<Item = I> + use<I> {
        (0..I::row_count(self)).map_while(I::from_index)
    }

    /// Reads the `(begin, end)` columns of `owner` for relation `R`.
    ///
    /// An owner without related rows has an empty range; that is not an error.
    ///
    /// # Errors
    ///
    /// Not-found if `owner` is outside its table.
    pub fn link_range<R: RangeRelation>(&self, owner: R::Owner) -> Result<LinkRange> {
        self.check(owner)?;
        Ok(R::range(self, owner.index()))
    }

    /// Slices relation `R`'s link table.
    ///
    /// `(x, x)` yields an empty vector, even when `x` lies past the table end.
    ///
    /// # Errors
    ///
    /// Range error if `begin > end` or `end` exceeds the link table.
    pub fn slice<R: RangeRelation>(&self, range: LinkRange) -> Result<Vec<R::Target>> {
        let len = R::table_len(self);
        if !range.fits(len) {
            return Err(Error::range(R::TABLE, range.begin, range.end, len));
        }
        Ok((range.begin..range.end).map(|position| R::target(self, position)).collect())
    }

    /// Relationship resolver over this store.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// View of one particle.
    ///
    /// # Errors
    ///
    /// Not-found if `id` is outside the particle table.
    pub fn particle(&self, id: ParticleId) -> Result<Particle<'_>> {
        Particle::new(self, id)
    }

    /// View of one tracker hit.
    ///
    /// # Errors
    ///
    /// Not-found if `id` is outside the tracker hit table.
    pub fn tracker_hit(&self, id: TrackerHitId) -> Result<TrackerHit<'_>> {
        TrackerHit::new(self, id)
    }

    /// View of one calo hit.
    ///
    /// # Errors
    ///
    /// Not-found if `id` is outside the calo hit table.
    pub fn calo_hit(&self, id: CaloHitId) -> Result<CaloHit<'_>> {
        CaloHit::new(self, id)
    }

    /// View of one calo contribution.
    ///
    /// # Errors
    ///
    /// Not-found if `id` is outside the contribution table.
    pub fn contribution(&self, id: ContributionId) -> Result<CaloContribution<'_>> {
        CaloContribution::new(self, id)
    }

    /// Views of every particle, in row order.
    pub fn iter_particles(&self) -> impl Iterator<Item = Particle<'_>> + '_ {
        self.ids::<ParticleId>().map(|id| Particle::new_unchecked(self, id))
    }

    /// Views of every tracker hit, in row order.
    pub fn iter_tracker_hits(&self) -> impl Iterator<Item = TrackerHit<'_>> + '_ {
        self.ids::<TrackerHitId>().map(|id| TrackerHit::new_unchecked(self, id))
    }

    /// Views of every calo hit, in row order.
    pub fn iter_calo_hits(&self) -> impl Iterator<Item = CaloHit<'_>> + '_ {
        self.ids::<CaloHitId>().map(|id| CaloHit::new_unchecked(self, id))
    }

    // =========================================================================
    // Derived structures
    // =========================================================================

    /// The decay graph, built on first request and cached.
    ///
    /// Every particle is a node; every daughter link is a `parent -> daughter`
    /// edge.
    ///
    /// # Errors
    ///
    /// Range error if a daughter range is malformed; not-found if a daughter
    /// link names a particle outside the table. Failures are not cached.
    pub fn decay_graph(&self) -> Result<&DecayGraph> {
        self.decay_graph.get_or_try_build(|| {
            let resolver = self.resolver();
            let mut edges = Vec::with_capacity(self.tables.daughter_links.len());
            for parent in self.ids::<ParticleId>() {
                for daughter in resolver.resolve_forward::<Daughters>(parent)? {
                    edges.push((parent, daughter));
                }
            }
            DecayGraph::from_edges(self.tables.particles.len(), edges)
        })
    }

    /// Returns true if the decay graph has been built and not invalidated.
    #[must_use]
    pub fn has_decay_graph(&self) -> bool {
        self.decay_graph.get().is_some()
    }

    /// Drops the cached decay graph; the next request rebuilds it.
    pub fn invalidate_decay_graph(&mut self) {
        self.decay_graph.reset();
    }

    pub(crate) fn contribution_owners(&self) -> Result<&OwnerIndex> {
        self.contribution_owners
            .get_or_try_build(|| OwnerIndex::build(self))
    }

    pub(crate) fn particle_tracker_hits(&self) -> Result<&ReverseIndex<TrackerHitId>> {
        self.particle_tracker_hits.get_or_try_build(|| {
            ReverseIndex::build(self.tables.particles.len(), &self.tables.tracker_links)
        })
    }

    pub(crate) fn particle_contributions(&self) -> Result<&ReverseIndex<ContributionId>> {
        self.particle_contributions.get_or_try_build(|| {
            ReverseIndex::build(self.tables.particles.len(), &self.tables.contribution_links)
        })
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Checks every range and link of the store at once.
    ///
    /// Verifies that all parent, daughter, and contribution ranges are well
    /// formed, every link names an existing particle, no two calo hits share a
    /// contribution, and every contribution has an owning calo hit.
    ///
    /// # Errors
    ///
    /// The first range, not-found, or orphaned-entity error encountered.
    pub fn validate(&self) -> Result<()> {
        let resolver = self.resolver();
        for particle in self.ids::<ParticleId>() {
            for linked in resolver
                .resolve_forward::<Parents>(particle)?
                .into_iter()
                .chain(resolver.resolve_forward::<Daughters>(particle)?)
            {
                self.check(linked)
                    .map_err(|e| e.with_context(particle.to_string()))?;
            }
        }
        self.particle_tracker_hits()?;
        self.particle_contributions()?;
        let owners = self.contribution_owners()?;
        for contribution in self.ids::<ContributionId>() {
            if owners.owner(contribution).is_none() {
                return Err(Error::orphaned(contribution));
            }
        }
        Ok(())
    }
}
