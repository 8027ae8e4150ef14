//! Variance covariance matrices of stacked 3D coordinates
use nalgebra::{DMatrix, Matrix3};

/// Dense, symmetric 3N x 3N variance covariance matrix
/// of N stacked (X, Y, Z) triplets.
/// Station `i` owns rows and columns `3i..3i+3`.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix(DMatrix<f64>);

impl CovarianceMatrix {
    /// Null VCV for given number of stations
    pub fn zeros(stations: usize) -> Self {
        Self(DMatrix::zeros(3 * stations, 3 * stations))
    }

    /// Wraps a dense matrix, which must be square with a multiple of 3 dimension.
    pub(crate) fn from_dense(matrix: DMatrix<f64>) -> Self {
        debug_assert!(matrix.is_square() && matrix.nrows() % 3 == 0);
        Self(matrix)
    }

    /// Stores `value` at (row, col) and its mirror (col, row),
    /// which is how triangular storage is expanded: the diagonal is written once.
    pub fn set_symmetric(&mut self, row: usize, col: usize, value: f64) {
        self.0[(row, col)] = value;
        self.0[(col, row)] = value;
    }

    /// Returns the matrix dimension (3N)
    pub fn dimension(&self) -> usize {
        self.0.nrows()
    }

    /// Returns number of 3D blocks (N)
    pub fn blocks(&self) -> usize {
        self.0.nrows() / 3
    }

    /// Returns the 3x3 variance block of the `i`th triplet
    pub fn block(&self, i: usize) -> Matrix3<f64> {
        self.cross_block(i, i)
    }

    /// Returns the 3x3 covariance block between triplets `i` (rows) and `j` (columns)
    pub fn cross_block(&self, i: usize, j: usize) -> Matrix3<f64> {
        self.0.fixed_view::<3, 3>(3 * i, 3 * j).into_owned()
    }

    /// Overwrites the 3x3 variance block of the `i`th triplet
    pub fn set_block(&mut self, i: usize, block: &Matrix3<f64>) {
        self.0.fixed_view_mut::<3, 3>(3 * i, 3 * i).copy_from(block);
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.0
    }

    /// Largest |a(i,j) - a(j,i)|, relative to the Frobenius norm.
    pub fn asymmetry(&self) -> f64 {
        let norm = self.0.norm();
        if norm == 0.0 {
            return 0.0;
        }
        (&self.0 - self.0.transpose()).amax() / norm
    }
}

/// Builds a symmetric 3x3 matrix from its upper triangle
pub fn symmetric3(xx: f64, xy: f64, xz: f64, yy: f64, yz: f64, zz: f64) -> Matrix3<f64> {
    Matrix3::new(xx, xy, xz, xy, yy, yz, xz, yz, zz)
}
