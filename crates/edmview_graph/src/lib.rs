//! Particle decay graph for edmview.
//!
//! This crate provides:
//! - [`DecayGraph`] - Directed `parent -> daughter` graph over particle rows
//!   with ancestor/descendant reachability queries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod decay;

pub use decay::DecayGraph;
