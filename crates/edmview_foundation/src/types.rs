//! Small value types shared by the tables.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A three-component vector (positions in mm, momenta in GeV).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3 {
    /// x component.
    pub x: f64,
    /// y component.
    pub y: f64,
    /// z component.
    pub z: f64,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Transverse (xy-plane) length.
    #[must_use]
    pub fn rho(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Simulator status bitfield of a particle.
///
/// Bit positions follow the EDM4hep convention.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimulatorStatus(pub u32);

impl SimulatorStatus {
    /// Particle was created by the simulator, not the generator.
    pub const CREATED_IN_SIMULATION: u32 = 1 << 30;
    /// Particle was created by a secondary that re-entered from the calorimeter.
    pub const BACKSCATTER: u32 = 1 << 29;
    /// Production vertex is not the endpoint of the parent.
    pub const VERTEX_IS_NOT_ENDPOINT_OF_PARENT: u32 = 1 << 28;
    /// Particle decayed or interacted in a tracking region.
    pub const DECAYED_IN_TRACKER: u32 = 1 << 27;
    /// Particle decayed or interacted in a calorimeter region.
    pub const DECAYED_IN_CALORIMETER: u32 = 1 << 26;
    /// Particle left the world volume.
    pub const LEFT_DETECTOR: u32 = 1 << 25;
    /// Particle stopped in the simulation.
    pub const STOPPED: u32 = 1 << 24;
    /// Particle is from an overlay.
    pub const OVERLAY: u32 = 1 << 23;

    const NAMES: [(u32, &'static str); 8] = [
        (Self::CREATED_IN_SIMULATION, "created-in-simulation"),
        (Self::BACKSCATTER, "backscatter"),
        (
            Self::VERTEX_IS_NOT_ENDPOINT_OF_PARENT,
            "vertex-is-not-endpoint-of-parent",
        ),
        (Self::DECAYED_IN_TRACKER, "decayed-in-tracker"),
        (Self::DECAYED_IN_CALORIMETER, "decayed-in-calorimeter"),
        (Self::LEFT_DETECTOR, "left-detector"),
        (Self::STOPPED, "stopped"),
        (Self::OVERLAY, "overlay"),
    ];

    /// Returns true if every bit of `flag` is set.
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// Returns a copy with `flag` set.
    #[must_use]
    pub const fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }

    /// Shorthand for [`Self::CREATED_IN_SIMULATION`].
    #[must_use]
    pub const fn created_in_simulation(self) -> bool {
        self.has(Self::CREATED_IN_SIMULATION)
    }

    /// Shorthand for [`Self::BACKSCATTER`].
    #[must_use]
    pub const fn is_backscatter(self) -> bool {
        self.has(Self::BACKSCATTER)
    }

    /// Shorthand for [`Self::DECAYED_IN_TRACKER`].
    #[must_use]
    pub const fn decayed_in_tracker(self) -> bool {
        self.has(Self::DECAYED_IN_TRACKER)
    }

    /// Shorthand for [`Self::DECAYED_IN_CALORIMETER`].
    #[must_use]
    pub const fn decayed_in_calorimeter(self) -> bool {
        self.has(Self::DECAYED_IN_CALORIMETER)
    }

    /// Shorthand for [`Self::LEFT_DETECTOR`].
    #[must_use]
    pub const fn has_left_detector(self) -> bool {
        self.has(Self::LEFT_DETECTOR)
    }

    /// Shorthand for [`Self::STOPPED`].
    #[must_use]
    pub const fn is_stopped(self) -> bool {
        self.has(Self::STOPPED)
    }

    /// Shorthand for [`Self::OVERLAY`].
    #[must_use]
    pub const fn is_overlay(self) -> bool {
        self.has(Self::OVERLAY)
    }
}

impl fmt::Debug for SimulatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_set();
        for (bit, name) in Self::NAMES {
            if self.has(bit) {
                list.entry(&name);
            }
        }
        list.finish()
    }
}
