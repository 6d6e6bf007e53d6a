//! Particle features compared by the matcher.

use std::fmt;
use std::str::FromStr;

use edmview_foundation::{Error, Result};
use edmview_storage::{Particle, ParticleRecord};

/// Whether a feature is compared by tolerance or by equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Compared by absolute difference against the tolerance.
    Numeric,
    /// Compared by exact equality.
    Categorical,
}

/// One particle attribute usable as a matching feature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    /// Creation time.
    Time,
    /// Momentum x component.
    Px,
    /// Momentum y component.
    Py,
    /// Momentum z component.
    Pz,
    /// Energy.
    Energy,
    /// Mass.
    Mass,
    /// Charge.
    Charge,
    /// Transverse momentum.
    Pt,
    /// Pseudorapidity.
    Eta,
    /// Azimuthal angle.
    Phi,
    /// Production vertex x.
    VertexX,
    /// Production vertex y.
    VertexY,
    /// Production vertex z.
    VertexZ,
    /// Endpoint x.
    EndpointX,
    /// Endpoint y.
    EndpointY,
    /// Endpoint z.
    EndpointZ,
    /// PDG code.
    Pdg,
    /// Generator status code.
    GeneratorStatus,
    /// Simulator status bitfield.
    SimulatorStatus,
}

impl Feature {
    /// Every feature, numeric ones first.
    pub const ALL: [Feature; 19] = [
        Feature::Time,
        Feature::Px,
        Feature::Py,
        Feature::Pz,
        Feature::Energy,
        Feature::Mass,
        Feature::Charge,
        Feature::Pt,
        Feature::Eta,
        Feature::Phi,
        Feature::VertexX,
        Feature::VertexY,
        Feature::VertexZ,
        Feature::EndpointX,
        Feature::EndpointY,
        Feature::EndpointZ,
        Feature::Pdg,
        Feature::GeneratorStatus,
        Feature::SimulatorStatus,
    ];

    /// Features compared when none are configured.
    pub const DEFAULT: [Feature; 5] = [
        Feature::Time,
        Feature::Px,
        Feature::Py,
        Feature::Pz,
        Feature::Pdg,
    ];

    /// How this feature is compared.
    #[must_use]
    pub const fn kind(self) -> FeatureKind {
        match self {
            Feature::Pdg | Feature::GeneratorStatus | Feature::SimulatorStatus => {
                FeatureKind::Categorical
            }
            _ => FeatureKind::Numeric,
        }
    }

    /// Lower-case name, as accepted by [`str::parse`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Feature::Time => "time",
            Feature::Px => "px",
            Feature::Py => "py",
            Feature::Pz => "pz",
            Feature::Energy => "energy",
            Feature::Mass => "mass",
            Feature::Charge => "charge",
            Feature::Pt => "pt",
            Feature::Eta => "eta",
            Feature::Phi => "phi",
            Feature::VertexX => "vertex_x",
            Feature::VertexY => "vertex_y",
            Feature::VertexZ => "vertex_z",
            Feature::EndpointX => "endpoint_x",
            Feature::EndpointY => "endpoint_y",
            Feature::EndpointZ => "endpoint_z",
            Feature::Pdg => "pdg",
            Feature::GeneratorStatus => "generator_status",
            Feature::SimulatorStatus => "simulator_status",
        }
    }

    /// Reads this feature from a particle row.
    #[must_use]
    pub fn extract(self, record: &ParticleRecord) -> FeatureValue {
        use FeatureValue::{Categorical, Numeric};
        match self {
            Feature::Time => Numeric(record.time),
            Feature::Px => Numeric(record.momentum.x),
            Feature::Py => Numeric(record.momentum.y),
            Feature::Pz => Numeric(record.momentum.z),
            Feature::Energy => Numeric(record.energy()),
            Feature::Mass => Numeric(record.mass),
            Feature::Charge => Numeric(f64::from(record.charge)),
            Feature::Pt => Numeric(record.pt()),
            Feature::Eta => Numeric(record.eta()),
            Feature::Phi => Numeric(record.phi()),
            Feature::VertexX => Numeric(record.vertex.x),
            Feature::VertexY => Numeric(record.vertex.y),
            Feature::VertexZ => Numeric(record.vertex.z),
            Feature::EndpointX => Numeric(record.endpoint.x),
            Feature::EndpointY => Numeric(record.endpoint.y),
            Feature::EndpointZ => Numeric(record.endpoint.z),
            Feature::Pdg => Categorical(i64::from(record.pdg)),
            Feature::GeneratorStatus => Categorical(i64::from(record.generator_status)),
            Feature::SimulatorStatus => Categorical(i64::from(record.simulator_status.0)),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.name() == s)
            .ok_or_else(|| Error::invalid_config(format!("unknown match feature `{s}`")))
    }
}

/// A feature's value for one particle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FeatureValue {
    /// Value of a numeric feature.
    Numeric(f64),
    /// Value of a categorical feature.
    Categorical(i64),
}

impl FeatureValue {
    /// The kind this value belongs to.
    #[must_use]
    pub const fn kind(self) -> FeatureKind {
        match self {
            FeatureValue::Numeric(_) => FeatureKind::Numeric,
            FeatureValue::Categorical(_) => FeatureKind::Categorical,
        }
    }

    /// The value of a numeric feature.
    #[must_use]
    pub const fn as_numeric(self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(v) => Some(v),
            FeatureValue::Categorical(_) => None,
        }
    }

    /// The value of a categorical feature.
    #[must_use]
    pub const fn as_categorical(self) -> Option<i64> {
        match self {
            FeatureValue::Numeric(_) => None,
            FeatureValue::Categorical(v) => Some(v),
        }
    }
}

/// Values of an ordered list of features, for one particle.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    features: Vec<Feature>,
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    /// Pairs features with caller-supplied values.
    ///
    /// # Errors
    ///
    /// Invalid-config if the lists differ in length or a value's kind does
    /// not match its feature.
    pub fn new(features: Vec<Feature>, values: Vec<FeatureValue>) -> Result<Self> {
        if features.len() != values.len() {
            return Err(Error::invalid_config(format!(
                "{} features but {} values",
                features.len(),
                values.len()
            )));
        }
        if let Some((feature, _)) = features
            .iter()
            .zip(&values)
            .find(|(feature, value)| feature.kind() != value.kind())
        {
            return Err(Error::invalid_config(format!(
                "value for `{feature}` has the wrong kind"
            )));
        }
        Ok(Self { features, values })
    }

    /// Reads `features` from a particle row.
    #[must_use]
    pub fn from_record(features: &[Feature], record: &ParticleRecord) -> Self {
        Self {
            features: features.to_vec(),
            values: features.iter().map(|f| f.extract(record)).collect(),
        }
    }

    /// Reads `features` from a particle view.
    #[must_use]
    pub fn from_particle(features: &[Feature], particle: &Particle<'_>) -> Self {
        Self::from_record(features, &particle.record())
    }

    /// The features, in order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The values, aligned with [`Self::features`].
    #[must_use]
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// The value of `feature`, if present.
    #[must_use]
    pub fn get(&self, feature: Feature) -> Option<FeatureValue> {
        self.features
            .iter()
            .position(|&f| f == feature)
            .map(|i| self.values[i])
    }
}
