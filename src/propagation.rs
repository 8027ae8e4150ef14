//! Baseline clusters: station differencing and VCV propagation
use crate::{
    error::{DomainError, LookupError},
    lists::StationList,
    sinex::Solution,
    vcv::CovarianceMatrix,
};

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the reference station of a cluster is chosen
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferencePolicy {
    /// First station of the solution, in file order
    #[default]
    FirstInFile,
    /// This station, which must exist in the solution
    Explicit(String),
    /// First station of this list that exists in the solution,
    /// otherwise first station in file order
    Priority(StationList),
}

impl ReferencePolicy {
    /// Resolves the reference station index. `source` names the solution in errors.
    pub fn select(&self, solution: &Solution, source: &str) -> Result<usize, LookupError> {
        match self {
            Self::FirstInFile => Ok(0),
            Self::Explicit(name) => solution
                .station_index(&name.to_uppercase())
                .ok_or_else(|| LookupError::ReferenceStation(name.clone(), source.to_string())),
            Self::Priority(list) => Ok(list
                .iter()
                .find_map(|name| solution.station_index(name))
                .unwrap_or(0)),
        }
    }
}

/// (3(N-1)) x 3N station differencing matrix. Row block `k` is
/// `-I` on the reference station columns and `+I` on the columns of
/// the `k`th non reference station (file order).
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    matrix: DMatrix<f64>,
    reference: usize,
    /// Station index of each row block
    differenced: Vec<usize>,
}

impl DesignMatrix {
    /// Builds the design matrix of `stations` stations, relative to `reference`.
    pub fn new(stations: usize, reference: usize) -> Result<Self, DomainError> {
        if reference >= stations {
            return Err(DomainError::ReferenceIndex {
                reference,
                stations,
            });
        }
        let differenced: Vec<usize> = (0..stations).filter(|i| *i != reference).collect();
        let mut matrix = DMatrix::zeros(3 * differenced.len(), 3 * stations);
        for (block, station) in differenced.iter().enumerate() {
            for axis in 0..3 {
                matrix[(3 * block + axis, 3 * reference + axis)] = -1.0;
                matrix[(3 * block + axis, 3 * station + axis)] = 1.0;
            }
        }
        Ok(Self {
            matrix,
            reference,
            differenced,
        })
    }

    pub fn reference(&self) -> usize {
        self.reference
    }

    /// Station index differenced in given row block
    pub fn differenced(&self, block: usize) -> usize {
        self.differenced[block]
    }

    /// Number of row blocks (N-1)
    pub fn blocks(&self) -> usize {
        self.differenced.len()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// A . x
    pub fn apply(&self, coordinates: &DVector<f64>) -> DVector<f64> {
        &self.matrix * coordinates
    }

    /// A . C . At. The result is mirrored from its lower triangle
    /// so it is exactly symmetric.
    pub fn propagate(&self, vcv: &CovarianceMatrix) -> CovarianceMatrix {
        let mut propagated = &self.matrix * vcv.as_matrix() * self.matrix.transpose();
        let dim = propagated.nrows();
        for i in 0..dim {
            for j in 0..i {
                propagated[(j, i)] = propagated[(i, j)];
            }
        }
        CovarianceMatrix::from_dense(propagated)
    }
}

/// One baseline of a cluster
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    /// Reference station
    pub first: String,
    /// Differenced station
    pub second: String,
    /// second - first (m)
    pub delta: Vector3<f64>,
    /// Baseline VCV (m²)
    pub covariance: Matrix3<f64>,
}

/// Correlated baselines sharing one reference station
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineCluster {
    pub reference: String,
    pub baselines: Vec<Baseline>,
    /// Joint VCV of all baselines, blocks follow `baselines` order
    pub covariance: CovarianceMatrix,
}

impl BaselineCluster {
    /// Differences every station of the solution against the `reference` station
    pub fn new(solution: &Solution, reference: usize) -> Result<Self, DomainError> {
        let design = DesignMatrix::new(solution.stations.len(), reference)?;
        let deltas = design.apply(&solution.coordinates());
        let covariance = design.propagate(&solution.covariance);
        let first = solution.stations[reference].name.clone();
        let baselines = (0..design.blocks())
            .map(|k| Baseline {
                first: first.clone(),
                second: solution.stations[design.differenced(k)].name.clone(),
                delta: deltas.fixed_rows::<3>(3 * k).into_owned(),
                covariance: covariance.block(k),
            })
            .collect();
        Ok(Self {
            reference: first,
            baselines,
            covariance,
        })
    }

    /// Cross covariance between baselines `i` (rows) and `j` (columns)
    pub fn cross_covariance(&self, i: usize, j: usize) -> Matrix3<f64> {
        self.covariance.cross_block(i, j)
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::station::Station;
    use rand::{thread_rng, Rng};

    fn solution(n: usize) -> Solution {
        let mut rng = thread_rng();
        let stations = (0..n)
            .map(|i| {
                Station::cartesian(
                    &format!("S{:03}", i),
                    rng.gen_range(-6.4E6..6.4E6),
                    rng.gen_range(-6.4E6..6.4E6),
                    rng.gen_range(-6.4E6..6.4E6),
                )
            })
            .collect();
        // L . Lt is a valid (semi definite) VCV
        let l = DMatrix::<f64>::from_fn(3 * n, 3 * n, |_, _| rng.gen_range(-1.0E-3..1.0E-3));
        Solution {
            epoch: hifitime::Epoch::from_gregorian_utc_at_midnight(2020, 1, 1),
            stations,
            covariance: CovarianceMatrix::from_dense(&l * l.transpose()),
        }
    }

    #[test]
    fn design_matrix() {
        let design = DesignMatrix::new(4, 2).unwrap();
        assert_eq!(design.blocks(), 3);
        assert_eq!(design.as_matrix().shape(), (9, 12));
        assert_eq!(design.reference(), 2);
        assert_eq!(
            (0..3).map(|k| design.differenced(k)).collect::<Vec<_>>(),
            vec![0, 1, 3]
        );
        for row in 0..9 {
            let row = design.as_matrix().row(row);
            assert_eq!(row.iter().filter(|v| **v == -1.0).count(), 1);
            assert_eq!(row.iter().filter(|v| **v == 1.0).count(), 1);
            assert_eq!(row.sum(), 0.0);
        }
        for axis in 0..3 {
            assert_eq!(design.as_matrix()[(3 + axis, 6 + axis)], -1.0);
            assert_eq!(design.as_matrix()[(3 + axis, 3 + axis)], 1.0);
        }
    }

    #[test]
    fn propagated_symmetry() {
        for n in [2, 3, 7, 12] {
            let solution = solution(n);
            let reference = n / 2;
            let cluster = BaselineCluster::new(&solution, reference).unwrap();
            assert_eq!(cluster.len(), n - 1);
            assert_eq!(cluster.covariance.dimension(), 3 * (n - 1));
            assert!(cluster.covariance.asymmetry() < 1.0E-12);
            for (k, baseline) in cluster.baselines.iter().enumerate() {
                assert_eq!(baseline.covariance, cluster.cross_covariance(k, k));
            }
        }
    }

    #[test]
    fn cluster_deltas() {
        let solution = solution(4);
        let cluster = BaselineCluster::new(&solution, 1).unwrap();
        let reference = solution.stations[1].position().ecef().unwrap();
        for baseline in cluster.baselines.iter() {
            let index = solution.station_index(&baseline.second).unwrap();
            let station = solution.stations[index].position().ecef().unwrap();
            assert_eq!(baseline.first, "S001");
            assert!((baseline.delta - (station - reference)).amax() < 1.0E-6);
        }
    }

    #[test]
    fn reference_out_of_range() {
        let solution = solution(3);
        assert_eq!(
            BaselineCluster::new(&solution, 3),
            Err(DomainError::ReferenceIndex {
                reference: 3,
                stations: 3
            })
        );
        let empty = Solution {
            stations: Vec::new(),
            covariance: CovarianceMatrix::zeros(0),
            ..solution
        };
        assert!(BaselineCluster::new(&empty, 0).is_err());
        assert!(DesignMatrix::new(0, 0).is_err());
        let single = DesignMatrix::new(1, 0).unwrap();
        assert_eq!(single.blocks(), 0);
    }

    #[test]
    fn reference_policies() {
        let solution = solution(3);
        assert_eq!(ReferencePolicy::FirstInFile.select(&solution, "test"), Ok(0));
        let policy = ReferencePolicy::Explicit("s002".to_string());
        assert_eq!(policy.select(&solution, "test"), Ok(2));
        let policy = ReferencePolicy::Explicit("NONE".to_string());
        assert!(policy.select(&solution, "test").is_err());
        let list = StationList::from_names(["XXXX", "S001", "S002"]);
        let policy = ReferencePolicy::Priority(list);
        assert_eq!(policy.select(&solution, "test"), Ok(1));
        let policy = ReferencePolicy::Priority(StationList::from_names(["XXXX"]));
        assert_eq!(policy.select(&solution, "test"), Ok(0));
    }
}
