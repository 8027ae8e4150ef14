//! Type B (systematic) uncertainties
use crate::{
    cfg::TypeBConfig, ellipse::PositionalUncertainty, error::DomainError, lists::StationList,
    rotation::Rotation, station::StdDev,
};

use nalgebra::Matrix3;
use strum_macros::{Display, EnumString};

/// Built-in reference grade stations
/// (national reference frame backbone, discontinuity qualified where needed)
pub const REFERENCE_GRADE_STATIONS: &[&str] = &[
    "ALBY", "ALIC_2011201", "ANDA", "ARMC", "ARUB", "BALA", "BBOO", "BDLE", "BDVL", "BEEC", "BING",
    "BKNL", "BNDY", "BRO1", "BROC", "BULA", "BUR2", "BURA", "CEDU", "CNBN", "COEN", "COOB", "COOL",
    "DARW_2003094", "DODA", "EDSV", "ESPA_2016055", "EXMT", "FLND", "FROY", "GABO", "GASC", "HERN",
    "HIL1_2006222", "HNIS", "HOB2_2004358", "HUGH", "HYDN", "IHOE", "JAB2_2016065", "JERV", "JLCK",
    "KALG", "KARR_2013254", "KAT1", "KELN", "KGIS", "KILK", "KMAN", "LAMB", "LARR_2011062", "LIAW",
    "LKYA", "LONA", "LORD_2014185", "LURA", "MAIN", "MEDO", "MOBS_2004358", "MRO1", "MTCV", "MTDN",
    "MTEM", "MTMA", "MULG", "NBRK", "NCLF", "NEBO", "NHIL", "NMTN", "NNOR_2012276", "NORF", "NORS",
    "NSTA", "NTJN", "PARK", "PERT_2012297", "PTHL", "PTKL", "PTLD_2012123", "RAVN", "RKLD",
    "RNSP_2015349", "RSBY", "SA45", "SPBY_2011326", "STNY", "STR1_2003311", "SYDN", "TBOB", "THEV",
    "TID1_2004348", "TMBO", "TOMP", "TOOW", "TOW2_2011266", "TURO", "UCLA", "WAGN", "WALH", "WARA",
    "WILU", "WLAL", "WMGA", "WWLG", "XMIS_2014177", "YAR2_2013171", "YEEL", "YELO_2016082",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum StationClass {
    #[strum(serialize = "reference grade")]
    ReferenceGrade,
    #[strum(serialize = "non reference grade")]
    NonReferenceGrade,
}

/// Axes of the 3x3 VCV blocks of a report, as stated by its units marker
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, Display)]
pub enum VarianceUnits {
    /// Geocentric cartesian
    #[strum(serialize = "XYZ")]
    Cartesian,
    /// Local East, North, Up
    #[strum(serialize = "ENU")]
    Local,
}

/// Outcome of the Type B injection, for one station
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    pub class: StationClass,
    /// Standard deviations that were added (m)
    pub terms: StdDev,
    /// Updated local VCV (m²)
    pub local: Matrix3<f64>,
    /// Updated VCV, expressed in the input axes (m²)
    pub vcv: Matrix3<f64>,
    pub pu: PositionalUncertainty,
    /// Updated local standard deviations (m)
    pub sd: StdDev,
}

/// Station classification and the Type B terms of each class
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBModel {
    reference_grade: StdDev,
    other: StdDev,
    stations: StationList,
}

impl Default for TypeBModel {
    fn default() -> Self {
        Self::from_config(&TypeBConfig::default())
    }
}

impl TypeBModel {
    pub fn new(reference_grade: StdDev, other: StdDev, stations: StationList) -> Self {
        Self {
            reference_grade,
            other,
            stations,
        }
    }

    /// Builds the model, an empty station list selects [REFERENCE_GRADE_STATIONS]
    pub fn from_config(cfg: &TypeBConfig) -> Self {
        let stations = if cfg.stations.is_empty() {
            StationList::from_names(REFERENCE_GRADE_STATIONS)
        } else {
            cfg.stations.clone()
        };
        Self::new(cfg.reference_grade, cfg.other, stations)
    }

    pub fn classify(&self, name: &str) -> StationClass {
        if self.stations.contains(&name.trim().to_uppercase()) {
            StationClass::ReferenceGrade
        } else {
            StationClass::NonReferenceGrade
        }
    }

    /// Standard deviations (m) of given class
    pub fn terms(&self, class: StationClass) -> StdDev {
        match class {
            StationClass::ReferenceGrade => self.reference_grade,
            StationClass::NonReferenceGrade => self.other,
        }
    }

    /// Adds the Type B variances of `name` to the diagonal of a local VCV.
    /// Off diagonal terms are untouched. Returns the applied terms.
    pub fn inject(&self, name: &str, local: &mut Matrix3<f64>) -> StdDev {
        let terms = self.terms(self.classify(name));
        local[(0, 0)] += terms.east.powi(2);
        local[(1, 1)] += terms.north.powi(2);
        local[(2, 2)] += terms.up.powi(2);
        terms
    }

    /// Injects the Type B terms into `vcv` of station `name` located at
    /// (`latitude`, `longitude`) in decimal degrees, then recalculates the
    /// positional uncertainties. Cartesian blocks are rotated to the local
    /// frame and back.
    pub fn apply(
        &self,
        name: &str,
        vcv: &Matrix3<f64>,
        units: VarianceUnits,
        latitude: f64,
        longitude: f64,
    ) -> Result<Injection, DomainError> {
        let rotation = Rotation::from_lat_lon(latitude, longitude);
        let mut local = match units {
            VarianceUnits::Cartesian => rotation.to_local(vcv),
            VarianceUnits::Local => *vcv,
        };
        let class = self.classify(name);
        let terms = self.inject(name, &mut local);
        let pu = PositionalUncertainty::from_local(&local)?;
        let vcv = match units {
            VarianceUnits::Cartesian => rotation.to_cartesian(&local),
            VarianceUnits::Local => local,
        };
        Ok(Injection {
            class,
            terms,
            local,
            vcv,
            pu,
            sd: StdDev {
                east: local[(0, 0)].sqrt(),
                north: local[(1, 1)].sqrt(),
                up: local[(2, 2)].sqrt(),
            },
        })
    }
}
