//! Cross-event particle matching for edmview.
//!
//! This crate provides:
//! - [`Feature`] and [`FeatureVector`] - Particle attributes compared by the matcher
//! - [`MatchConfig`] - Feature list and numeric tolerance
//! - [`Matcher`] - Best-match search over one target store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod feature;
pub mod matcher;

pub use config::{DEFAULT_TOLERANCE, MatchConfig};
pub use feature::{Feature, FeatureKind, FeatureValue, FeatureVector};
pub use matcher::{MatchOutcome, Matcher};
