//! Error ellipses and positional uncertainties (95%)
use crate::error::DomainError;
use nalgebra::Matrix3;

/// Circularized horizontal PU(95%) polynomial coefficients
const Q: [f64; 4] = [1.960790, 0.004071, 0.114276, 0.371625];

/// 95% quantile of the normal distribution
const VERTICAL_95: f64 = 1.96;

/// Horizontal (standard) error ellipse
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ErrorEllipse {
    /// Semi major axis (m)
    pub semi_major: f64,
    /// Semi minor axis (m)
    pub semi_minor: f64,
    /// Orientation of the semi major axis,
    /// decimal degrees clockwise from North, in [0, 180[
    pub orientation: f64,
}

impl ErrorEllipse {
    /// Builds the ellipse from the east-east, north-north and east-north variances
    pub fn from_horizontal(ee: f64, nn: f64, en: f64) -> Result<Self, DomainError> {
        let z = ((ee - nn).powi(2) + 4.0 * en.powi(2)).sqrt();
        let semi_major = (0.5 * (ee + nn + z)).sqrt();
        // z >= |ee - nn| so this is only negative by rounding
        let semi_minor = (0.5 * (ee + nn - z)).max(0.0).sqrt();
        if !semi_major.is_finite() || !semi_minor.is_finite() {
            return Err(DomainError::UndefinedEllipse(semi_major, semi_minor));
        }
        let mut orientation = (90.0 - (0.5 * (2.0 * en).atan2(ee - nn)).to_degrees())
            .rem_euclid(180.0);
        // tiny negative angles round up to 180
        if orientation >= 180.0 {
            orientation = 0.0;
        }
        Ok(Self {
            semi_major,
            semi_minor,
            orientation,
        })
    }

    /// Builds the ellipse from the horizontal part of a local (ENU) VCV
    pub fn from_local(local: &Matrix3<f64>) -> Result<Self, DomainError> {
        Self::from_horizontal(local[(0, 0)], local[(1, 1)], local[(0, 1)])
    }

    /// Circularized horizontal PU(95%): a . k(b/a)
    pub fn circularized_pu(&self) -> Result<f64, DomainError> {
        if self.semi_major == 0.0 {
            return Err(DomainError::NullSemiMajor);
        }
        let c = self.semi_minor / self.semi_major;
        let k = Q[0] + Q[1] * c + Q[2] * c.powi(2) + Q[3] * c.powi(3);
        Ok(self.semi_major * k)
    }
}

/// Positional uncertainties (95%) of a local (ENU) VCV
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionalUncertainty {
    /// Circularized horizontal PU (m)
    pub horizontal: f64,
    /// Vertical PU (m)
    pub vertical: f64,
    pub ellipse: ErrorEllipse,
}

impl PositionalUncertainty {
    pub fn from_local(local: &Matrix3<f64>) -> Result<Self, DomainError> {
        let ellipse = ErrorEllipse::from_local(local)?;
        let uu = local[(2, 2)];
        if uu < 0.0 {
            return Err(DomainError::NegativeVariance(uu));
        }
        Ok(Self {
            horizontal: ellipse.circularized_pu()?,
            vertical: VERTICAL_95 * uu.sqrt(),
            ellipse,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vcv::symmetric3;
    use rand::{thread_rng, Rng};
    #[test]
    fn circular() {
        let ellipse = ErrorEllipse::from_horizontal(4.0E-6, 4.0E-6, 0.0).unwrap();
        assert!((ellipse.semi_major - 2.0E-3).abs() < 1.0E-15);
        assert!((ellipse.semi_minor - 2.0E-3).abs() < 1.0E-15);
        let k: f64 = Q.iter().sum();
        assert!((ellipse.circularized_pu().unwrap() - 2.0E-3 * k).abs() < 1.0E-15);
    }
    #[test]
    fn north_elongated() {
        let ellipse = ErrorEllipse::from_horizontal(1.0E-6, 9.0E-6, 0.0).unwrap();
        assert!((ellipse.semi_major - 3.0E-3).abs() < 1.0E-12);
        assert!((ellipse.semi_minor - 1.0E-3).abs() < 1.0E-12);
        assert!(ellipse.orientation < 1.0E-9);
    }
    #[test]
    fn east_elongated() {
        let ellipse = ErrorEllipse::from_horizontal(9.0E-6, 1.0E-6, 0.0).unwrap();
        assert_eq!(ellipse.orientation, 90.0);
    }
    #[test]
    fn negative_zero_covariance() {
        let ellipse = ErrorEllipse::from_horizontal(1.0E-6, 9.0E-6, -0.0).unwrap();
        assert!(ellipse.orientation >= 0.0 && ellipse.orientation < 180.0);
    }
    #[test]
    fn degenerate() {
        let ellipse = ErrorEllipse::from_horizontal(0.0, 0.0, 0.0).unwrap();
        assert_eq!(ellipse.circularized_pu(), Err(DomainError::NullSemiMajor));
        let local = symmetric3(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        assert!(PositionalUncertainty::from_local(&local).is_err());
        assert!(ErrorEllipse::from_horizontal(-1.0, -1.0, 0.0).is_err());
    }
    #[test]
    fn random_ordering() {
        let mut rng = thread_rng();
        for _ in 0..1000 {
            let ee: f64 = rng.gen_range(1.0E-8..1.0E-4);
            let nn: f64 = rng.gen_range(1.0E-8..1.0E-4);
            // |en| < sqrt(ee.nn): positive definite
            let en = rng.gen_range(-0.99..0.99) * (ee * nn).sqrt();
            let ellipse = ErrorEllipse::from_horizontal(ee, nn, en).unwrap();
            assert!(ellipse.semi_major >= ellipse.semi_minor);
            assert!((0.0..180.0).contains(&ellipse.orientation));
            let pu = ellipse.circularized_pu().unwrap();
            assert!(pu >= Q[0] * ellipse.semi_major);
        }
    }
    #[test]
    fn vertical() {
        let local = symmetric3(1.0E-6, 0.0, 0.0, 1.0E-6, 0.0, 4.0E-6);
        let pu = PositionalUncertainty::from_local(&local).unwrap();
        assert!((pu.vertical - 1.96 * 2.0E-3).abs() < 1.0E-15);
    }
}
