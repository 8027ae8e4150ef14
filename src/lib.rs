#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod angle;
pub mod baselines;
pub mod cfg;
pub mod codec;
pub mod dynadjust;
pub mod dynaml;
pub mod ellipse;
pub mod lists;
pub mod propagation;
pub mod reader;
pub mod report;
pub mod rotation;
pub mod sinex;
pub mod station;
pub mod typeb;
pub mod vcv;

mod error;

pub use error::{DomainError, Error, FormatError, LookupError};

#[cfg(test)]
mod tests;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        angle::{ddeg_to_hp, hp_to_ddeg},
        baselines::{generate, ClusterWriter},
        cfg::{AngleFormat, ClusterConfig, FailurePolicy, TypeBConfig, VScale},
        dynadjust::{ApuReport, Listing, ListingKind, TypeBJob},
        ellipse::{ErrorEllipse, PositionalUncertainty},
        error::{DomainError, Error, FormatError, LookupError},
        lists::StationList,
        propagation::{Baseline, BaselineCluster, DesignMatrix, ReferencePolicy},
        report::RunReport,
        rotation::Rotation,
        sinex::Solution,
        station::{Position, Station, StdDev},
        typeb::{StationClass, TypeBModel, VarianceUnits},
        vcv::CovarianceMatrix,
    };
    // pub re-export
    pub use hifitime::Epoch;
    pub use nalgebra::{Matrix3, Vector3};
}
