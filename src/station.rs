//! Geodetic stations
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Station position, as found in the input dataset
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Position {
    /// Geocentric cartesian coordinates (m)
    Cartesian { x: f64, y: f64, z: f64 },
    /// Geodetic coordinates: latitude and longitude in decimal degrees,
    /// ellipsoidal height in m. Uncertainty reports do not list heights.
    Geodetic {
        latitude: f64,
        longitude: f64,
        height: Option<f64>,
    },
}

impl Position {
    /// Returns cartesian coordinates as a vector, if this is a [Position::Cartesian]
    pub fn ecef(&self) -> Option<Vector3<f64>> {
        match self {
            Self::Cartesian { x, y, z } => Some(Vector3::new(*x, *y, *z)),
            _ => None,
        }
    }
    /// Returns (latitude, longitude) in decimal degrees, if this is a [Position::Geodetic]
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        match self {
            Self::Geodetic {
                latitude,
                longitude,
                ..
            } => Some((*latitude, *longitude)),
            _ => None,
        }
    }
}

/// Local standard deviations (m) derived from the local VCV
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StdDev {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

/// A station, name is possibly discontinuity qualified (`ALIC_2011201`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Station {
    pub name: String,
    position: Position,
    uncertainty: Option<StdDev>,
}

impl Station {
    pub fn new(name: &str, position: Position) -> Self {
        Self {
            name: name.to_string(),
            position,
            uncertainty: None,
        }
    }
    /// Builds a [Station] from ECEF coordinates
    pub fn cartesian(name: &str, x: f64, y: f64, z: f64) -> Self {
        Self::new(name, Position::Cartesian { x, y, z })
    }
    /// Builds a [Station] from latitude and longitude (decimal degrees), height unknown
    pub fn geodetic(name: &str, latitude: f64, longitude: f64) -> Self {
        Self::new(
            name,
            Position::Geodetic {
                latitude,
                longitude,
                height: None,
            },
        )
    }
    pub fn position(&self) -> &Position {
        &self.position
    }
    /// Local uncertainty, only defined once Type B terms have been applied
    pub fn uncertainty(&self) -> Option<&StdDev> {
        self.uncertainty.as_ref()
    }
    pub(crate) fn with_uncertainty(&self, sd: StdDev) -> Self {
        let mut s = self.clone();
        s.uncertainty = Some(sd);
        s
    }
}
