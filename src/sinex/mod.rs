//! SINEX station coordinate solutions
//! (`SOLUTION/ESTIMATE` and `SOLUTION/MATRIX_ESTIMATE` blocks)
use crate::{
    error::{Error, FormatError},
    reader::BufferedReader,
    station::Station,
    vcv::CovarianceMatrix,
};

use hifitime::Epoch;
use nalgebra::DVector;
use std::path::Path;
use std::str::FromStr;

mod parsing;

/// A SINEX coordinates solution
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Reference epoch of the first estimate
    pub epoch: Epoch,
    /// Stations, in file order. This order indexes the VCV blocks.
    pub stations: Vec<Station>,
    /// Full VCV of the stacked station coordinates (m²)
    pub covariance: CovarianceMatrix,
}

impl Solution {
    /// Parses given SINEX file, which may be gzip compressed
    /// when the `flate2` feature is enabled.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = BufferedReader::new(path)?.read_content()?;
        Ok(Self::from_str(&content)?)
    }

    /// Returns index of given station, in file order
    pub fn station_index(&self, name: &str) -> Option<usize> {
        self.stations.iter().position(|s| s.name == name)
    }

    /// Stacked (X, Y, Z) coordinates of all stations
    pub fn coordinates(&self) -> DVector<f64> {
        let mut xyz = DVector::zeros(3 * self.stations.len());
        for (i, station) in self.stations.iter().enumerate() {
            if let Some(ecef) = station.position().ecef() {
                xyz.fixed_rows_mut::<3>(3 * i).copy_from(&ecef);
            }
        }
        xyz
    }
}

impl FromStr for Solution {
    type Err = FormatError;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        parsing::parse(content)
    }
}
