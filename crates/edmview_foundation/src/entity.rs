//! Entity kinds and typed row identifiers.
//!
//! Every table in an event store is addressed by its own id type, so a
//! tracker-hit row can never be passed where a particle row is expected.

use std::fmt;
use std::hash::Hash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kinds of entity held by an event store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    /// A simulated particle.
    Particle,
    /// A tracker hit.
    TrackerHit,
    /// A cell-level calorimeter hit.
    CaloHit,
    /// One particle's energy deposit within a calorimeter hit.
    CaloContribution,
}

impl EntityKind {
    /// All kinds, in table order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Particle,
        EntityKind::TrackerHit,
        EntityKind::CaloHit,
        EntityKind::CaloContribution,
    ];

    /// Human-readable name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Particle => "particle",
            Self::TrackerHit => "tracker hit",
            Self::CaloHit => "calo hit",
            Self::CaloContribution => "calo contribution",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A row identifier scoped to one entity kind.
///
/// Row ids are positions within their own table only; they carry no meaning
/// in any other table.
pub trait RowId: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    /// The entity kind this id addresses.
    const KIND: EntityKind;

    /// Creates an id from a raw row number.
    fn from_raw(raw: u32) -> Self;

    /// Returns the raw row number.
    fn raw(self) -> u32;

    /// Returns the row number as a table position.
    #[must_use]
    fn index(self) -> usize {
        self.raw() as usize
    }

    /// Creates an id from a table position, if it fits the id width.
    #[must_use]
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self::from_raw)
    }
}

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u32);

        impl $name {
            /// Creates an id for the given row.
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl RowId for $name {
            const KIND: EntityKind = $kind;

            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $kind, self.0)
            }
        }
    };
}

row_id!(
    /// Row id into the particle table.
    ParticleId,
    EntityKind::Particle
);
row_id!(
    /// Row id into the tracker hit table.
    TrackerHitId,
    EntityKind::TrackerHit
);
row_id!(
    /// Row id into the calo hit table.
    CaloHitId,
    EntityKind::CaloHit
);
row_id!(
    /// Row id into the calo contribution table.
    ContributionId,
    EntityKind::CaloContribution
);
