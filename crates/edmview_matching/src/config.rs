//! Matcher configuration.

use edmview_foundation::{Error, Result};

use crate::feature::Feature;

/// Tolerance used when none is configured.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Which features the matcher compares, and how closely numeric ones must agree.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Largest accepted absolute difference per numeric feature.
    pub tolerance: f64,
    /// Compared features, in order.
    pub features: Vec<Feature>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            features: Feature::DEFAULT.to_vec(),
        }
    }
}

impl MatchConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Replaces the feature list.
    #[must_use]
    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features = features.into_iter().collect();
        self
    }

    /// Checks that the configuration can be used for matching.
    ///
    /// # Errors
    ///
    /// Invalid-config if the feature list is empty or repeats a feature, or
    /// the tolerance is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(Error::invalid_config("match feature list is empty"));
        }
        for (i, feature) in self.features.iter().enumerate() {
            if self.features[..i].contains(feature) {
                return Err(Error::invalid_config(format!(
                    "match feature `{feature}` listed twice"
                )));
            }
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::invalid_config(format!(
                "match tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
