//! Cartesian (geocentric) <=> local (East, North, Up) VCV rotations
use nalgebra::Matrix3;

/// Orthonormal rotation whose columns are the local East, North and Up
/// unit vectors, expressed in geocentric cartesian axes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation(Matrix3<f64>);

impl Rotation {
    /// Builds the rotation at given latitude and longitude (decimal degrees)
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
        Self(Matrix3::new(
            -sin_lon,
            -sin_lat * cos_lon,
            cos_lat * cos_lon,
            cos_lon,
            -sin_lat * sin_lon,
            cos_lat * sin_lon,
            0.0,
            cos_lat,
            sin_lat,
        ))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Cartesian VCV to local (ENU) VCV: Rt . C . R
    pub fn to_local(&self, cartesian: &Matrix3<f64>) -> Matrix3<f64> {
        self.0.transpose() * cartesian * self.0
    }

    /// Local (ENU) VCV to cartesian VCV: R . L . Rt
    pub fn to_cartesian(&self, local: &Matrix3<f64>) -> Matrix3<f64> {
        self.0 * local * self.0.transpose()
    }
}
