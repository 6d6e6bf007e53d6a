//! Columnar tables for one event.
//!
//! Each table is a struct of equally long column vectors. A `*Record` is one
//! row copied out of its table; records are what views and row lookups hand
//! back.

// Row counts are bounded to u32 when a store is assembled.
#![allow(clippy::cast_possible_truncation)]

use edmview_foundation::{
    CaloHitId, ContributionId, DetectorLabel, Error, Labels, LinkRange, ParticleId, Result, RowId,
    SimulatorStatus, TrackerHitId, Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn check_column(
    table: &'static str,
    column: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::misaligned(table, column, expected, actual))
    }
}

macro_rules! check_columns {
    ($self:ident, $table:literal, $lead:ident; $($column:ident),* $(,)?) => {{
        let rows = $self.$lead.len();
        $(check_column($table, stringify!($column), rows, $self.$column.len())?;)*
        Ok(rows)
    }};
}

// =============================================================================
// Particles
// =============================================================================

/// One particle row.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleRecord {
    /// PDG particle code.
    pub pdg: i32,
    /// Generator status code.
    pub generator_status: i32,
    /// Simulator status bitfield.
    pub simulator_status: SimulatorStatus,
    /// Electric charge (units of e).
    pub charge: f32,
    /// Creation time (ns).
    pub time: f64,
    /// Mass (GeV).
    pub mass: f64,
    /// Production vertex (mm).
    pub vertex: Vector3,
    /// Endpoint (mm).
    pub endpoint: Vector3,
    /// Momentum at the production vertex (GeV).
    pub momentum: Vector3,
    /// Slice of the parent link table.
    pub parents: LinkRange,
    /// Slice of the daughter link table.
    pub daughters: LinkRange,
}

impl ParticleRecord {
    /// Transverse momentum.
    #[must_use]
    pub fn pt(&self) -> f64 {
        self.momentum.rho()
    }

    /// Momentum magnitude.
    #[must_use]
    pub fn p(&self) -> f64 {
        self.momentum.norm()
    }

    /// Energy from momentum and mass.
    #[must_use]
    pub fn energy(&self) -> f64 {
        let p = self.p();
        (p * p + self.mass * self.mass).sqrt()
    }

    /// Pseudorapidity. Infinite along the beam axis, zero for a particle at rest.
    #[must_use]
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        let pz = self.momentum.z;
        if pt > 0.0 {
            (pz / pt).asinh()
        } else if pz > 0.0 {
            f64::INFINITY
        } else if pz < 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        }
    }

    /// Azimuthal angle in `(-pi, pi]`.
    #[must_use]
    pub fn phi(&self) -> f64 {
        self.momentum.y.atan2(self.momentum.x)
    }
}

/// Particle table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleTable {
    /// PDG codes.
    pub pdg: Vec<i32>,
    /// Generator status codes.
    pub generator_status: Vec<i32>,
    /// Simulator status bitfields.
    pub simulator_status: Vec<SimulatorStatus>,
    /// Charges.
    pub charge: Vec<f32>,
    /// Creation times.
    pub time: Vec<f64>,
    /// Masses.
    pub mass: Vec<f64>,
    /// Production vertices.
    pub vertex: Vec<Vector3>,
    /// Endpoints.
    pub endpoint: Vec<Vector3>,
    /// Momenta.
    pub momentum: Vec<Vector3>,
    /// Parent range starts.
    pub parents_begin: Vec<u32>,
    /// Parent range ends.
    pub parents_end: Vec<u32>,
    /// Daughter range starts.
    pub daughters_begin: Vec<u32>,
    /// Daughter range ends.
    pub daughters_end: Vec<u32>,
}

impl ParticleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pdg.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pdg.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, record: ParticleRecord) -> ParticleId {
        let id = ParticleId::new(self.len() as u32);
        self.pdg.push(record.pdg);
        self.generator_status.push(record.generator_status);
        self.simulator_status.push(record.simulator_status);
        self.charge.push(record.charge);
        self.time.push(record.time);
        self.mass.push(record.mass);
        self.vertex.push(record.vertex);
        self.endpoint.push(record.endpoint);
        self.momentum.push(record.momentum);
        self.parents_begin.push(record.parents.begin);
        self.parents_end.push(record.parents.end);
        self.daughters_begin.push(record.daughters.begin);
        self.daughters_end.push(record.daughters.end);
        id
    }

    /// Copies row `index` out of the columns.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn record(&self, index: usize) -> ParticleRecord {
        ParticleRecord {
            pdg: self.pdg[index],
            generator_status: self.generator_status[index],
            simulator_status: self.simulator_status[index],
            charge: self.charge[index],
            time: self.time[index],
            mass: self.mass[index],
            vertex: self.vertex[index],
            endpoint: self.endpoint[index],
            momentum: self.momentum[index],
            parents: self.parents(index),
            daughters: self.daughters(index),
        }
    }

    /// Parent range of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn parents(&self, index: usize) -> LinkRange {
        LinkRange::new(self.parents_begin[index], self.parents_end[index])
    }

    /// Daughter range of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn daughters(&self, index: usize) -> LinkRange {
        LinkRange::new(self.daughters_begin[index], self.daughters_end[index])
    }

    /// Checks that every column has the same length, returning it.
    ///
    /// # Errors
    ///
    /// Returns a misaligned-column error naming the first short or long column.
    pub fn check_columns(&self) -> Result<usize> {
        check_columns!(self, "particles", pdg;
            generator_status, simulator_status, charge, time, mass, vertex, endpoint,
            momentum, parents_begin, parents_end, daughters_begin, daughters_end)
    }
}

// =============================================================================
// Tracker hits
// =============================================================================

/// One tracker hit row.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackerHitRecord {
    /// Hit position (mm).
    pub position: Vector3,
    /// Particle momentum at the hit (GeV).
    pub momentum: Vector3,
    /// Hit time (ns).
    pub time: f64,
    /// Deposited energy (GeV).
    pub edep: f64,
    /// Path length in the sensitive material (mm).
    pub path_length: f64,
    /// Quality flags.
    pub quality: i32,
    /// Detector cell id.
    pub cell_id: u64,
    /// Detector the hit was recorded in.
    pub detector: DetectorLabel,
}

/// Tracker hit table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackerHitTable {
    /// Positions.
    pub position: Vec<Vector3>,
    /// Momenta.
    pub momentum: Vec<Vector3>,
    /// Times.
    pub time: Vec<f64>,
    /// Deposited energies.
    pub edep: Vec<f64>,
    /// Path lengths.
    pub path_length: Vec<f64>,
    /// Quality flags.
    pub quality: Vec<i32>,
    /// Cell ids.
    pub cell_id: Vec<u64>,
    /// Detector labels.
    pub detector: Vec<DetectorLabel>,
}

impl TrackerHitTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, record: TrackerHitRecord) -> TrackerHitId {
        let id = TrackerHitId::new(self.len() as u32);
        self.position.push(record.position);
        self.momentum.push(record.momentum);
        self.time.push(record.time);
        self.edep.push(record.edep);
        self.path_length.push(record.path_length);
        self.quality.push(record.quality);
        self.cell_id.push(record.cell_id);
        self.detector.push(record.detector);
        id
    }

    /// Copies row `index` out of the columns.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn record(&self, index: usize) -> TrackerHitRecord {
        TrackerHitRecord {
            position: self.position[index],
            momentum: self.momentum[index],
            time: self.time[index],
            edep: self.edep[index],
            path_length: self.path_length[index],
            quality: self.quality[index],
            cell_id: self.cell_id[index],
            detector: self.detector[index],
        }
    }

    /// Checks that every column has the same length, returning it.
    ///
    /// # Errors
    ///
    /// Returns a misaligned-column error naming the first short or long column.
    pub fn check_columns(&self) -> Result<usize> {
        check_columns!(self, "tracker_hits", position;
            momentum, time, edep, path_length, quality, cell_id, detector)
    }
}

// =============================================================================
// Calorimeter hits and contributions
// =============================================================================

/// One calorimeter hit row.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaloHitRecord {
    /// Cell position (mm).
    pub position: Vector3,
    /// Total energy in the cell (GeV).
    pub energy: f64,
    /// Detector cell id.
    pub cell_id: u64,
    /// Detector the hit was recorded in.
    pub detector: DetectorLabel,
    /// Slice of the contribution table.
    pub contributions: LinkRange,
}

/// Calorimeter hit table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaloHitTable {
    /// Positions.
    pub position: Vec<Vector3>,
    /// Energies.
    pub energy: Vec<f64>,
    /// Cell ids.
    pub cell_id: Vec<u64>,
    /// Detector labels.
    pub detector: Vec<DetectorLabel>,
    /// Contribution range starts.
    pub contrib_begin: Vec<u32>,
    /// Contribution range ends.
    pub contrib_end: Vec<u32>,
}

impl CaloHitTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, record: CaloHitRecord) -> CaloHitId {
        let id = CaloHitId::new(self.len() as u32);
        self.position.push(record.position);
        self.energy.push(record.energy);
        self.cell_id.push(record.cell_id);
        self.detector.push(record.detector);
        self.contrib_begin.push(record.contributions.begin);
        self.contrib_end.push(record.contributions.end);
        id
    }

    /// Copies row `index` out of the columns.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn record(&self, index: usize) -> CaloHitRecord {
        CaloHitRecord {
            position: self.position[index],
            energy: self.energy[index],
            cell_id: self.cell_id[index],
            detector: self.detector[index],
            contributions: self.contributions(index),
        }
    }

    /// Contribution range of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn contributions(&self, index: usize) -> LinkRange {
        LinkRange::new(self.contrib_begin[index], self.contrib_end[index])
    }

    /// Checks that every column has the same length, returning it.
    ///
    /// # Errors
    ///
    /// Returns a misaligned-column error naming the first short or long column.
    pub fn check_columns(&self) -> Result<usize> {
        check_columns!(self, "calo_hits", position;
            energy, cell_id, detector, contrib_begin, contrib_end)
    }
}

/// One calorimeter contribution row.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContributionRecord {
    /// PDG code of the depositing particle.
    pub pdg: i32,
    /// Deposited energy (GeV).
    pub energy: f64,
    /// Deposit time (ns).
    pub time: f64,
    /// Position of the simulation step (mm).
    pub step_position: Vector3,
}

/// Calorimeter contribution table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContributionTable {
    /// PDG codes.
    pub pdg: Vec<i32>,
    /// Energies.
    pub energy: Vec<f64>,
    /// Times.
    pub time: Vec<f64>,
    /// Step positions.
    pub step_position: Vec<Vector3>,
}

impl ContributionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pdg.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pdg.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, record: ContributionRecord) -> ContributionId {
        let id = ContributionId::new(self.len() as u32);
        self.pdg.push(record.pdg);
        self.energy.push(record.energy);
        self.time.push(record.time);
        self.step_position.push(record.step_position);
        id
    }

    /// Copies row `index` out of the columns.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn record(&self, index: usize) -> ContributionRecord {
        ContributionRecord {
            pdg: self.pdg[index],
            energy: self.energy[index],
            time: self.time[index],
            step_position: self.step_position[index],
        }
    }

    /// Checks that every column has the same length, returning it.
    ///
    /// # Errors
    ///
    /// Returns a misaligned-column error naming the first short or long column.
    pub fn check_columns(&self) -> Result<usize> {
        check_columns!(self, "contributions", pdg; energy, time, step_position)
    }
}

// =============================================================================
// Event tables
// =============================================================================

/// Every table of one event, as handed over by an ingestion layer.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventTables {
    /// Particles.
    pub particles: ParticleTable,
    /// Flat parent link table sliced by particle parent ranges.
    pub parent_links: Vec<ParticleId>,
    /// Flat daughter link table sliced by particle daughter ranges.
    pub daughter_links: Vec<ParticleId>,
    /// Tracker hits.
    pub tracker_hits: TrackerHitTable,
    /// Originating particle per tracker hit (row-aligned).
    pub tracker_links: Vec<ParticleId>,
    /// Calorimeter hits.
    pub calo_hits: CaloHitTable,
    /// Calorimeter contributions.
    pub contributions: ContributionTable,
    /// Originating particle per contribution (row-aligned).
    pub contribution_links: Vec<ParticleId>,
    /// Detector label names.
    pub labels: Labels,
}

impl EventTables {
    /// Creates an empty set of tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a particle. Its link ranges are taken from the record as-is.
    pub fn add_particle(&mut self, record: ParticleRecord) -> ParticleId {
        self.particles.push(record)
    }

    /// Appends a tracker hit produced by `particle`.
    pub fn add_tracker_hit(
        &mut self,
        record: TrackerHitRecord,
        particle: ParticleId,
    ) -> TrackerHitId {
        self.tracker_links.push(particle);
        self.tracker_hits.push(record)
    }

    /// Appends a calorimeter hit whose contributions are appended
    /// contiguously to the contribution table; the hit's range is set to
    /// cover exactly those rows.
    pub fn add_calo_hit<I>(&mut self, mut record: CaloHitRecord, contributions: I) -> CaloHitId
    where
        I: IntoIterator<Item = (ContributionRecord, ParticleId)>,
    {
        let begin = self.contributions.len() as u32;
        for (contribution, particle) in contributions {
            self.contributions.push(contribution);
            self.contribution_links.push(particle);
        }
        let end = self.contributions.len() as u32;
        record.contributions = LinkRange::new(begin, end);
        self.calo_hits.push(record)
    }

    /// Rewrites both particle link tables from a `parent -> daughter` edge list.
    ///
    /// Every particle's parent and daughter ranges are reassigned; particles
    /// without edges get an empty range. Within a range, links keep the order
    /// they appear in `edges`.
    pub fn set_decay_edges(&mut self, edges: &[(ParticleId, ParticleId)]) {
        let rows = self.particles.len();
        let (daughter_links, daughter_ranges) =
            group_links(rows, edges.iter().map(|&(p, d)| (p, d)));
        let (parent_links, parent_ranges) = group_links(rows, edges.iter().map(|&(p, d)| (d, p)));
        self.daughter_links = daughter_links;
        self.parent_links = parent_links;
        for (index, range) in daughter_ranges.into_iter().enumerate() {
            self.particles.daughters_begin[index] = range.begin;
            self.particles.daughters_end[index] = range.end;
        }
        for (index, range) in parent_ranges.into_iter().enumerate() {
            self.particles.parents_begin[index] = range.begin;
            self.particles.parents_end[index] = range.end;
        }
    }

    /// Interns a detector name.
    pub fn label(&mut self, name: &str) -> DetectorLabel {
        self.labels.intern(name)
    }
}

/// Groups `(owner, target)` pairs by owner into a flat table plus one range per owner.
///
/// Owners at or beyond `rows` are dropped.
fn group_links<I>(rows: usize, pairs: I) -> (Vec<ParticleId>, Vec<LinkRange>)
where
    I: Iterator<Item = (ParticleId, ParticleId)> + Clone,
{
    let mut counts = vec![0u32; rows];
    for (owner, _) in pairs.clone() {
        if let Some(count) = counts.get_mut(owner.index()) {
            *count += 1;
        }
    }
    let mut ranges = Vec::with_capacity(rows);
    let mut cursor = 0u32;
    for count in &counts {
        ranges.push(LinkRange::new(cursor, cursor + count));
        cursor += count;
    }
    let mut links = vec![ParticleId::new(0); cursor as usize];
    let mut fill: Vec<u32> = ranges.iter().map(|r| r.begin).collect();
    for (owner, target) in pairs {
        if let Some(slot) = fill.get_mut(owner.index()) {
            links[*slot as usize] = target;
            *slot += 1;
        }
    }
    (links, ranges)
}
