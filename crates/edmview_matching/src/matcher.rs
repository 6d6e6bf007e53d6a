//! Cross-event particle matching.
//!
//! A [`Matcher`] holds one target store and answers "which target particle
//! has these features?" for particles of any other store. A candidate must
//! agree exactly on every categorical feature and within the tolerance on
//! every numeric feature. Among accepted candidates the smallest sum of
//! numeric differences wins; equal sums go to the lowest row id.

use std::sync::OnceLock;

use edmview_foundation::{Error, ParticleId, Result, RowId};
use edmview_storage::{EventStore, Particle};

use crate::config::MatchConfig;
use crate::feature::{FeatureKind, FeatureValue, FeatureVector};

/// Result of matching one source particle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    /// The best accepted target particle.
    Matched {
        /// Target row id.
        id: ParticleId,
        /// Sum of absolute numeric differences.
        score: f64,
    },
    /// No target particle agrees on every feature.
    NoMatch,
}

impl MatchOutcome {
    /// Returns true for [`MatchOutcome::Matched`].
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    /// The matched target id, if any.
    #[must_use]
    pub fn id(&self) -> Option<ParticleId> {
        match self {
            MatchOutcome::Matched { id, .. } => Some(*id),
            MatchOutcome::NoMatch => None,
        }
    }
}

/// Target feature columns, one per configured feature.
#[derive(Debug)]
struct FeatureMatrix {
    rows: usize,
    numeric: Vec<(usize, Vec<f64>)>,
    categorical: Vec<(usize, Vec<i64>)>,
}

impl FeatureMatrix {
    fn build(store: &EventStore, config: &MatchConfig) -> Self {
        let rows = store.particles().len();
        let records: Vec<_> = store.iter_particles().map(|p| p.record()).collect();
        let mut numeric = Vec::new();
        let mut categorical = Vec::new();
        for (slot, &feature) in config.features.iter().enumerate() {
            let values = records.iter().map(|record| feature.extract(record));
            match feature.kind() {
                FeatureKind::Numeric => {
                    numeric.push((slot, values.filter_map(FeatureValue::as_numeric).collect()));
                }
                FeatureKind::Categorical => {
                    let column = values.filter_map(FeatureValue::as_categorical).collect();
                    categorical.push((slot, column));
                }
            }
        }
        tracing::debug!(
            rows,
            numeric = numeric.len(),
            categorical = categorical.len(),
            "built match feature matrix"
        );
        Self {
            rows,
            numeric,
            categorical,
        }
    }
}

/// Finds particles of one target store that match particles from elsewhere.
#[derive(Debug)]
pub struct Matcher<'t> {
    target: &'t EventStore,
    config: MatchConfig,
    matrix: OnceLock<FeatureMatrix>,
}

impl<'t> Matcher<'t> {
    /// Creates a matcher over `target`. The feature matrix is built on the
    /// first match call and reused for the matcher's lifetime.
    ///
    /// # Errors
    ///
    /// Invalid-config if `config` fails [`MatchConfig::validate`].
    pub fn new(target: &'t EventStore, config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            target,
            config,
            matrix: OnceLock::new(),
        })
    }

    /// Creates a matcher with the default features and tolerance.
    #[must_use]
    pub fn with_defaults(target: &'t EventStore) -> Self {
        Self {
            target,
            config: MatchConfig::default(),
            matrix: OnceLock::new(),
        }
    }

    /// The store matched against.
    #[must_use]
    pub fn target(&self) -> &'t EventStore {
        self.target
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns true once the target feature matrix has been built.
    #[must_use]
    pub fn has_feature_matrix(&self) -> bool {
        self.matrix.get().is_some()
    }

    fn matrix(&self) -> &FeatureMatrix {
        self.matrix
            .get_or_init(|| FeatureMatrix::build(self.target, &self.config))
    }

    /// Best target match for a particle of any store.
    #[must_use]
    pub fn find_match(&self, particle: &Particle<'_>) -> MatchOutcome {
        let source = FeatureVector::from_particle(&self.config.features, particle);
        let outcome = self.best(source.values());
        tracing::trace!(source = %particle.id(), ?outcome, "matched particle");
        outcome
    }

    /// Best target match for caller-supplied feature values.
    ///
    /// # Errors
    ///
    /// Invalid-config if the vector's features differ from the configured
    /// features, in content or order.
    pub fn find_match_features(&self, source: &FeatureVector) -> Result<MatchOutcome> {
        if source.features() != self.config.features.as_slice() {
            return Err(Error::invalid_config(
                "feature vector does not match the matcher's feature list",
            ));
        }
        let outcome = self.best(source.values());
        tracing::trace!(?outcome, "matched feature vector");
        Ok(outcome)
    }

    /// Matches every particle of `source`, in row order.
    #[must_use]
    pub fn match_event(&self, source: &EventStore) -> Vec<(ParticleId, MatchOutcome)> {
        source
            .iter_particles()
            .map(|particle| (particle.id(), self.find_match(&particle)))
            .collect()
    }

    fn best(&self, source: &[FeatureValue]) -> MatchOutcome {
        let matrix = self.matrix();
        let tolerance = self.config.tolerance;
        let mut best: Option<(usize, f64)> = None;
        'rows: for row in 0..matrix.rows {
            for (slot, column) in &matrix.categorical {
                if source[*slot] != FeatureValue::Categorical(column[row]) {
                    continue 'rows;
                }
            }
            let mut score = 0.0;
            for (slot, column) in &matrix.numeric {
                let Some(value) = source[*slot].as_numeric() else {
                    continue 'rows;
                };
                let diff = (column[row] - value).abs();
                if diff.is_nan() || diff > tolerance {
                    continue 'rows;
                }
                score += diff;
            }
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((row, score));
            }
        }
        match best.and_then(|(row, score)| Some((ParticleId::from_index(row)?, score))) {
            Some((id, score)) => MatchOutcome::Matched { id, score },
            None => MatchOutcome::NoMatch,
        }
    }
}
