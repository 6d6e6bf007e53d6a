//! Columnar event storage, relationships, and entity views for edmview.
//!
//! This crate provides:
//! - [`EventTables`] - Column vectors for particles, hits, and contributions
//! - [`EventStore`] - One event's tables plus lazily built derived structures
//! - [`Resolver`] - Range-linked relationship resolution
//! - [`Particle`], [`TrackerHit`], [`CaloHit`], [`CaloContribution`] - Entity views

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod lazy;
pub mod relationship;
pub mod store;
pub mod table;
pub mod view;

pub use relationship::{
    Contributions, Daughters, OwnerIndex, Parents, RangeRelation, Resolver, ReverseIndex,
};
pub use store::{EventStore, StoredRow};
pub use table::{
    CaloHitRecord, CaloHitTable, ContributionRecord, ContributionTable, EventTables,
    ParticleRecord, ParticleTable, TrackerHitRecord, TrackerHitTable,
};
pub use view::{CaloContribution, CaloHit, Particle, TrackerHit};
