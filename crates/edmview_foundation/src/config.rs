//! Detector parameters carried alongside each event store.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Vector3;

/// Detector geometry and energy cut-offs.
///
/// These are consumed by selection helpers and downstream analysis; the
/// relationship and graph layers never read them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DetectorConfig {
    /// Maximum radial extent of the tracking volume (mm).
    pub tracking_radius: f64,

    /// Maximum longitudinal extent of the tracking volume, `|z|` (mm).
    pub tracking_z_max: f64,

    /// Minimum energy for decay-tree oriented analyses (GeV).
    pub energy_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tracking_radius: 2150.0,
            tracking_z_max: 2210.0,
            energy_threshold: 0.0,
        }
    }
}

impl DetectorConfig {
    /// Recognised option names, in declaration order.
    pub const OPTIONS: [&'static str; 3] =
        ["tracking_radius", "tracking_z_max", "energy_threshold"];

    /// Builds a configuration from named options on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ErrorKind::InvalidConfig`] for an unknown option name
    /// or a value that is negative or not finite.
    pub fn from_options<'a, I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut config = Self::default();
        for (name, value) in options {
            config = config.with_option(name, value)?;
        }
        Ok(config)
    }

    /// Sets one named option.
    ///
    /// # Errors
    ///
    /// See [`Self::from_options`].
    pub fn with_option(mut self, name: &str, value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::invalid_config(format!(
                "{name} must be a finite non-negative number, got {value}"
            )));
        }
        match name {
            "tracking_radius" => self.tracking_radius = value,
            "tracking_z_max" => self.tracking_z_max = value,
            "energy_threshold" => self.energy_threshold = value,
            other => {
                return Err(Error::invalid_config(format!(
                    "unknown detector option {other:?} (expected one of {:?})",
                    Self::OPTIONS
                )));
            }
        }
        Ok(self)
    }

    /// Builder method to set the tracking radius.
    #[must_use]
    pub fn with_tracking_radius(mut self, radius: f64) -> Self {
        self.tracking_radius = radius;
        self
    }

    /// Builder method to set the tracking half-length.
    #[must_use]
    pub fn with_tracking_z_max(mut self, z_max: f64) -> Self {
        self.tracking_z_max = z_max;
        self
    }

    /// Builder method to set the energy threshold.
    #[must_use]
    pub fn with_energy_threshold(mut self, threshold: f64) -> Self {
        self.energy_threshold = threshold;
        self
    }

    /// Returns true if `point` lies inside the tracking cylinder (boundary inclusive).
    #[must_use]
    pub fn within_tracking_volume(&self, point: Vector3) -> bool {
        point.rho() <= self.tracking_radius && point.z.abs() <= self.tracking_z_max
    }

    /// Returns true if `energy` reaches the configured threshold.
    #[must_use]
    pub fn passes_energy_threshold(&self, energy: f64) -> bool {
        energy >= self.energy_threshold
    }
}
