//! Range-encoded one-to-many links.
//!
//! A one-to-many relation is stored as a `(begin, end)` pair on the owning
//! row that slices a flat, shared link table. `begin == end` is the normal
//! encoding of "no related rows".

use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// The flat tables sliced by [`LinkRange`]s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkTable {
    /// Particle -> parent particles.
    Parents,
    /// Particle -> daughter particles.
    Daughters,
    /// Calo hit -> contributions. Ranges index the contribution table directly.
    Contributions,
}

impl LinkTable {
    /// The kind of entity owning ranges into this table.
    #[must_use]
    pub const fn owner_kind(self) -> EntityKind {
        match self {
            Self::Parents | Self::Daughters => EntityKind::Particle,
            Self::Contributions => EntityKind::CaloHit,
        }
    }

    /// The kind of entity the table's entries refer to.
    #[must_use]
    pub const fn target_kind(self) -> EntityKind {
        match self {
            Self::Parents | Self::Daughters => EntityKind::Particle,
            Self::Contributions => EntityKind::CaloContribution,
        }
    }

    /// Human-readable table name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Parents => "parents",
            Self::Daughters => "daughters",
            Self::Contributions => "contributions",
        }
    }
}

impl fmt::Display for LinkTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A half-open `[begin, end)` slice of a link table.
///
/// A range is only *well formed* relative to a table: either `begin == end`,
/// or `begin < end <= len`. Construction never validates; the store does when
/// slicing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkRange {
    /// First position in the link table.
    pub begin: u32,
    /// One past the last position in the link table.
    pub end: u32,
}

impl LinkRange {
    /// The empty range at position zero.
    pub const EMPTY: LinkRange = LinkRange { begin: 0, end: 0 };

    /// Creates a new range.
    #[must_use]
    pub const fn new(begin: u32, end: u32) -> Self {
        Self { begin, end }
    }

    /// Returns true when the range selects nothing (`begin >= end`).
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.begin >= self.end
    }

    /// Number of positions selected; zero for inverted ranges.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.begin) as usize
    }

    /// Returns true if `position` lies in `[begin, end)`.
    #[must_use]
    pub const fn contains(self, position: u32) -> bool {
        self.begin <= position && position < self.end
    }

    /// Returns true if the range is well formed for a table of `table_len` entries.
    ///
    /// `(x, x)` always fits: it is the empty range wherever it points.
    #[must_use]
    pub const fn fits(self, table_len: usize) -> bool {
        self.begin == self.end || (self.begin < self.end && (self.end as usize) <= table_len)
    }

    /// The range as table positions.
    #[must_use]
    pub const fn positions(self) -> Range<usize> {
        self.begin as usize..self.end as usize
    }
}

impl fmt::Display for LinkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
