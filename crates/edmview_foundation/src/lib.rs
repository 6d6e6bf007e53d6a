//! Core types for edmview.
//!
//! This crate provides:
//! - [`RowId`] and the per-kind row identifiers ([`ParticleId`], [`TrackerHitId`],
//!   [`CaloHitId`], [`ContributionId`])
//! - [`LinkRange`] and [`LinkTable`] - `(begin, end)` slices into flat link tables
//! - [`Error`] - Error types shared by every layer
//! - [`DetectorConfig`] - Detector geometry and energy cut-offs
//! - [`Labels`] - Interned detector labels

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod entity;
pub mod error;
pub mod intern;
pub mod link;
pub mod types;

pub use config::DetectorConfig;
pub use entity::{CaloHitId, ContributionId, EntityKind, ParticleId, RowId, TrackerHitId};
pub use error::{Error, ErrorKind, Result};
pub use intern::{DetectorLabel, Labels};
pub use link::{LinkRange, LinkTable};
pub use types::{SimulatorStatus, Vector3};

/// Ordered, persistent set of particle ids returned by graph queries.
pub type ParticleSet = im::OrdSet<ParticleId>;
