//! Range-linked relationship resolution.
//!
//! Every one-to-many relation funnels through [`Resolver::resolve_forward`]:
//! read the owner's `(begin, end)` columns, then slice the link table.
//! Relations stored in one direction only are answered by indices built
//! once per store:
//! - [`OwnerIndex`]: contribution -> owning calo hit, by binary search over
//!   the sorted calo hit ranges
//! - [`ReverseIndex`]: particle -> tracker hits / contributions, grouped from
//!   the row-aligned particle link columns

use edmview_foundation::{
    CaloHitId, ContributionId, Error, LinkRange, LinkTable, ParticleId, Result, RowId,
    TrackerHitId,
};

use crate::store::{EventStore, StoredRow};

// =============================================================================
// Relation kinds
// =============================================================================

/// A one-to-many relation encoded as ranges into a flat link table.
pub trait RangeRelation {
    /// Row id type of the owning table.
    type Owner: StoredRow;
    /// Row id type the link table refers to.
    type Target: RowId;
    /// The link table sliced by this relation.
    const TABLE: LinkTable;

    /// Reads the owner's `(begin, end)` columns. `owner` must be in bounds.
    fn range(store: &EventStore, owner: usize) -> LinkRange;

    /// Length of the link table.
    fn table_len(store: &EventStore) -> usize;

    /// The target stored at `position`. `position` must be below `table_len`.
    fn target(store: &EventStore, position: u32) -> Self::Target;
}

/// Particle -> parent particles.
#[derive(Copy, Clone, Debug)]
pub struct Parents;

/// Particle -> daughter particles.
#[derive(Copy, Clone, Debug)]
pub struct Daughters;

/// Calo hit -> contributions.
#[derive(Copy, Clone, Debug)]
pub struct Contributions;

impl RangeRelation for Parents {
    type Owner = ParticleId;
    type Target = ParticleId;
    const TABLE: LinkTable = LinkTable::Parents;

    fn range(store: &EventStore, owner: usize) -> LinkRange {
        store.particles().parents(owner)
    }

    fn table_len(store: &EventStore) -> usize {
        store.parent_links().len()
    }

    fn target(store: &EventStore, position: u32) -> ParticleId {
        store.parent_links()[position as usize]
    }
}

impl RangeRelation for Daughters {
    type Owner = ParticleId;
    type Target = ParticleId;
    const TABLE: LinkTable = LinkTable::Daughters;

    fn range(store: &EventStore, owner: usize) -> LinkRange {
        store.particles().daughters(owner)
    }

    fn table_len(store: &EventStore) -> usize {
        store.daughter_links().len()
    }

    fn target(store: &EventStore, position: u32) -> ParticleId {
        store.daughter_links()[position as usize]
    }
}

impl RangeRelation for Contributions {
    type Owner = CaloHitId;
    type Target = ContributionId;
    const TABLE: LinkTable = LinkTable::Contributions;

    fn range(store: &EventStore, owner: usize) -> LinkRange {
        store.calo_hits().contributions(owner)
    }

    fn table_len(store: &EventStore) -> usize {
        store.contributions().len()
    }

    fn target(_store: &EventStore, position: u32) -> ContributionId {
        ContributionId::new(position)
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves relationships of one store into row ids.
#[derive(Copy, Clone, Debug)]
pub struct Resolver<'s> {
    store: &'s EventStore,
}

impl<'s> Resolver<'s> {
    pub(crate) fn new(store: &'s EventStore) -> Self {
        Self { store }
    }

    /// Resolves the targets of `owner` through relation `R`, in link-table order.
    ///
    /// An empty range yields an empty vector.
    ///
    /// # Errors
    ///
    /// Not-found if `owner` is outside its table; range error if the owner's
    /// range is malformed.
    pub fn resolve_forward<R: RangeRelation>(&self, owner: R::Owner) -> Result<Vec<R::Target>> {
        let range = self.store.link_range::<R>(owner)?;
        self.store
            .slice::<R>(range)
            .map_err(|e| e.with_context(owner.to_string()))
    }

    /// Finds the calo hit whose contribution range contains `contribution`.
    ///
    /// # Errors
    ///
    /// Not-found if `contribution` is outside its table; orphaned-entity if no
    /// calo hit range contains it; range error if the calo hit ranges are
    /// malformed or overlap.
    pub fn resolve_reverse_by_scan(&self, contribution: ContributionId) -> Result<CaloHitId> {
        self.store.check(contribution)?;
        self.store
            .contribution_owners()?
            .owner(contribution)
            .ok_or_else(|| Error::orphaned(contribution))
    }

    /// The particle that produced a tracker hit.
    ///
    /// # Errors
    ///
    /// Not-found if the hit, or the particle its link names, does not exist.
    pub fn tracker_hit_particle(&self, hit: TrackerHitId) -> Result<ParticleId> {
        self.store.check(hit)?;
        let particle = self.store.tracker_links()[hit.index()];
        self.store
            .check(particle)
            .map_err(|e| e.with_context(hit.to_string()))?;
        Ok(particle)
    }

    /// The particle that made a calorimeter contribution.
    ///
    /// # Errors
    ///
    /// Not-found if the contribution, or the particle its link names, does not exist.
    pub fn contribution_particle(&self, contribution: ContributionId) -> Result<ParticleId> {
        self.store.check(contribution)?;
        let particle = self.store.contribution_links()[contribution.index()];
        self.store
            .check(particle)
            .map_err(|e| e.with_context(contribution.to_string()))?;
        Ok(particle)
    }

    /// Tracker hits produced by a particle, in row order.
    ///
    /// # Errors
    ///
    /// Not-found if `particle` does not exist or any tracker link names a
    /// particle outside the table.
    pub fn particle_tracker_hits(&self, particle: ParticleId) -> Result<&'s [TrackerHitId]> {
        self.store.check(particle)?;
        Ok(self.store.particle_tracker_hits()?.members(particle))
    }

    /// Calorimeter contributions made by a particle, in row order.
    ///
    /// # Errors
    ///
    /// Not-found if `particle` does not exist or any contribution link names a
    /// particle outside the table.
    pub fn particle_contributions(&self, particle: ParticleId) -> Result<&'s [ContributionId]> {
        self.store.check(particle)?;
        Ok(self.store.particle_contributions()?.members(particle))
    }
}

// =============================================================================
// Owner index
// =============================================================================

/// Sorted, non-overlapping calo hit contribution ranges.
#[derive(Clone, Debug, Default)]
pub struct OwnerIndex {
    /// `(range, owner)` for every non-empty range, sorted by `range.begin`.
    spans: Vec<(LinkRange, CaloHitId)>,
}

impl OwnerIndex {
    /// Builds the index over every calo hit of `store`.
    ///
    /// # Errors
    ///
    /// Range error if a calo hit range is malformed or two non-empty ranges overlap.
    pub fn build(store: &EventStore) -> Result<Self> {
        let len = store.contributions().len();
        let mut spans = Vec::with_capacity(store.calo_hits().len());
        for hit in store.ids::<CaloHitId>() {
            let range = Contributions::range(store, hit.index());
            if !range.fits(len) {
                return Err(Error::range(LinkTable::Contributions, range.begin, range.end, len)
                    .with_context(hit.to_string()));
            }
            if !range.is_empty() {
                spans.push((range, hit));
            }
        }
        spans.sort_unstable_by_key(|(range, _)| range.begin);
        for pair in spans.windows(2) {
            let ((prev, prev_hit), (next, next_hit)) = (pair[0], pair[1]);
            if prev.end > next.begin {
                return Err(Error::range(LinkTable::Contributions, next.begin, next.end, len)
                    .with_context(format!("{next_hit}, which overlaps {prev_hit}")));
            }
        }
        tracing::debug!(spans = spans.len(), contributions = len, "built contribution owner index");
        Ok(Self { spans })
    }

    /// The calo hit whose range contains `contribution`, if any.
    #[must_use]
    pub fn owner(&self, contribution: ContributionId) -> Option<CaloHitId> {
        let position = contribution.raw();
        let after = self.spans.partition_point(|(range, _)| range.begin <= position);
        let (range, hit) = *self.spans.get(after.checked_sub(1)?)?;
        range.contains(position).then_some(hit)
    }

    /// Number of non-empty ranges indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns true if no calo hit owns any contribution.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

// =============================================================================
// Reverse index
// =============================================================================

/// Rows grouped by the particle their row-aligned link names.
#[derive(Clone, Debug)]
pub struct ReverseIndex<T> {
    /// `offsets[p]..offsets[p + 1]` selects particle `p`'s rows in `members`.
    offsets: Vec<usize>,
    members: Vec<T>,
}

impl<T: RowId> ReverseIndex<T> {
    /// Groups rows by linked particle.
    ///
    /// `links[i]` is the particle of row `i`.
    ///
    /// # Errors
    ///
    /// Not-found if a link names a particle at or beyond `particle_count`.
    pub fn build(particle_count: usize, links: &[ParticleId]) -> Result<Self> {
        let mut offsets = vec![0usize; particle_count + 1];
        for (row, particle) in links.iter().enumerate() {
            if particle.index() >= particle_count {
                let context = T::from_index(row)
                    .map_or_else(|| format!("row {row}"), |id| id.to_string());
                return Err(Error::not_found(*particle, particle_count).with_context(context));
            }
            offsets[particle.index() + 1] += 1;
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }
        let mut fill = offsets.clone();
        let mut members = vec![T::from_raw(0); links.len()];
        for (row, particle) in links.iter().enumerate() {
            let Some(member) = T::from_index(row) else {
                break;
            };
            let slot = &mut fill[particle.index()];
            members[*slot] = member;
            *slot += 1;
        }
        let kind = T::KIND;
        tracing::debug!(
            %kind,
            particles = particle_count,
            rows = links.len(),
            "built particle reverse index"
        );
        Ok(Self { offsets, members })
    }

    /// Rows linked to `particle`, ascending. Empty for unknown particles.
    #[must_use]
    pub fn members(&self, particle: ParticleId) -> &[T] {
        let i = particle.index();
        match (self.offsets.get(i), self.offsets.get(i + 1)) {
            (Some(&begin), Some(&end)) => &self.members[begin..end],
            _ => &[],
        }
    }
}
