//! Processing configurations
use crate::{lists::StationList, propagation::ReferencePolicy, station::StdDev};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// What happens to the remaining files when one of them is structurally invalid
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum FailurePolicy {
    /// Abort the run
    #[default]
    Stop,
    /// Record the failure and move on to the next file
    Continue,
}

/// Variance scale factor of a baseline cluster
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum VScale {
    /// Fixed scale factor
    Fixed(f64),
    /// Rigorous sigma zero of the companion `<stem>.simult.adj` adjustment
    SigmaZero,
}

impl Default for VScale {
    fn default() -> Self {
        Self::Fixed(1.0)
    }
}

fn default_frame() -> String {
    "GDA94".to_string()
}

fn default_scale() -> f64 {
    1.0
}

/// Baseline cluster generation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct ClusterConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference: ReferencePolicy,
    /// Reference frame label of the measurements
    #[cfg_attr(feature = "serde", serde(default = "default_frame"))]
    pub reference_frame: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vscale: VScale,
    #[cfg_attr(feature = "serde", serde(default = "default_scale"))]
    pub pscale: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_scale"))]
    pub lscale: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_scale"))]
    pub hscale: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub failure: FailurePolicy,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            reference: ReferencePolicy::default(),
            reference_frame: default_frame(),
            vscale: VScale::default(),
            pscale: default_scale(),
            lscale: default_scale(),
            hscale: default_scale(),
            failure: FailurePolicy::default(),
        }
    }
}

impl ClusterConfig {
    pub fn with_reference(&self, reference: ReferencePolicy) -> Self {
        let mut s = self.clone();
        s.reference = reference;
        s
    }
    pub fn with_reference_frame(&self, frame: &str) -> Self {
        let mut s = self.clone();
        s.reference_frame = frame.to_string();
        s
    }
    pub fn with_vscale(&self, vscale: VScale) -> Self {
        let mut s = self.clone();
        s.vscale = vscale;
        s
    }
    pub fn with_failure_policy(&self, failure: FailurePolicy) -> Self {
        let mut s = self.clone();
        s.failure = failure;
        s
    }
}

/// Angle notation of the error ellipse orientation, in reports
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum AngleFormat {
    /// Decimal degrees
    #[default]
    Decimal,
    /// Packed DDD.MMSSsss
    Hp,
}

fn default_reference_grade() -> StdDev {
    StdDev {
        east: 0.003,
        north: 0.003,
        up: 0.006,
    }
}

fn default_other() -> StdDev {
    StdDev {
        east: 0.006,
        north: 0.006,
        up: 0.012,
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Type B uncertainty injection
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct TypeBConfig {
    /// Standard deviations (m) added to reference grade stations
    #[cfg_attr(feature = "serde", serde(default = "default_reference_grade"))]
    pub reference_grade: StdDev,
    /// Standard deviations (m) added to every other station
    #[cfg_attr(feature = "serde", serde(default = "default_other"))]
    pub other: StdDev,
    /// Reference grade stations. Empty list means the built-in set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stations: StationList,
    #[cfg_attr(feature = "serde", serde(default))]
    pub orientation: AngleFormat,
    /// Version reported in the output banner
    #[cfg_attr(feature = "serde", serde(default = "default_version"))]
    pub version: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub failure: FailurePolicy,
}

impl Default for TypeBConfig {
    fn default() -> Self {
        Self {
            reference_grade: default_reference_grade(),
            other: default_other(),
            stations: StationList::default(),
            orientation: AngleFormat::default(),
            version: default_version(),
            failure: FailurePolicy::default(),
        }
    }
}

impl TypeBConfig {
    pub fn with_stations(&self, stations: StationList) -> Self {
        let mut s = self.clone();
        s.stations = stations;
        s
    }
    pub fn with_orientation(&self, orientation: AngleFormat) -> Self {
        let mut s = self.clone();
        s.orientation = orientation;
        s
    }
    pub fn with_failure_policy(&self, failure: FailurePolicy) -> Self {
        let mut s = self.clone();
        s.failure = failure;
        s
    }
    pub fn with_terms(&self, reference_grade: StdDev, other: StdDev) -> Self {
        let mut s = self.clone();
        s.reference_grade = reference_grade;
        s.other = other;
        s
    }
}
