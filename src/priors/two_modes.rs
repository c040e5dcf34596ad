use super::base_prior::{check_positive, coordinates, radius, PriorDistribution};
use crate::error::Result;
use crate::misc::log_density::log1p_exp_neg;
use tch::Tensor;

/// Ring of radius `loc` concentrated into two modes at `z[0] = ±loc`.
///
/// log p = -½ ((‖z‖ - loc) / 2s)² - ½ ((|z₀| - |loc|) / 3s)²
///         + log(1 + exp(-2 |z₀| |loc| / (3s)²))
#[derive(Debug, Clone, Copy)]
pub struct TwoModes {
    loc: f64,
    scale: f64,
}

impl TwoModes {
    pub fn new(loc: f64, scale: f64) -> Result<Self> {
        check_positive("scale", scale)?;
        Ok(TwoModes { loc, scale })
    }
}

impl PriorDistribution for TwoModes {
    fn log_prob(&self, z: &Tensor) -> Result<Tensor> {
        let (z0, _) = coordinates(z)?;
        let a = z0.abs();
        let eps = self.loc.abs();
        let ring = (radius(z) - self.loc) / (2.0 * self.scale);
        let modes = (&a - eps) / (3.0 * self.scale);
        let fold = log1p_exp_neg(&(2.0 * eps * &a / (3.0 * self.scale).powi(2)));
        Ok(-0.5 * ring.square() - 0.5 * modes.square() + fold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{Device, Kind};

    fn reference(z0: f64, z1: f64, loc: f64, scale: f64) -> f64 {
        let r = (z0 * z0 + z1 * z1).sqrt();
        let a = z0.abs();
        -0.5 * ((r - loc) / (2.0 * scale)).powi(2) - 0.5 * ((a - loc.abs()) / (3.0 * scale)).powi(2)
            + (1.0 + (-2.0 * a * loc.abs() / (3.0 * scale).powi(2)).exp()).ln()
    }

    #[test]
    fn test_log_prob_value() {
        let prior = TwoModes::new(2.0, 0.5).unwrap();
        let z = Tensor::from_slice(&[2.0f32, 0.0, 0.5, -1.0, 0.0, 0.0]).view([3, 2]);
        let log_p = prior.log_prob(&z).unwrap();
        assert_eq!(log_p.size(), vec![3]);
        for (i, (z0, z1)) in [(2.0, 0.0), (0.5, -1.0), (0.0, 0.0)].iter().enumerate() {
            let expected = reference(*z0, *z1, 2.0, 0.5);
            assert!((log_p.double_value(&[i as i64]) - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_modes_and_symmetry() {
        let prior = TwoModes::new(2.0, 0.5).unwrap();
        let z = Tensor::from_slice(&[2.0f32, 0.0, -2.0, 0.0, 0.0, 0.0]).view([3, 2]);
        let log_p = prior.log_prob(&z).unwrap();
        assert!((log_p.double_value(&[0]) - log_p.double_value(&[1])).abs() < 1e-6);
        assert!(log_p.double_value(&[0]) > log_p.double_value(&[2]));
    }

    #[test]
    fn test_batch_shape_is_kept() {
        let prior = TwoModes::new(1.0, 1.0).unwrap();
        let z = Tensor::randn(&[4, 5, 2], (Kind::Float, Device::Cpu));
        assert_eq!(prior.log_prob(&z).unwrap().size(), vec![4, 5]);
        let point = Tensor::from_slice(&[1.0f32, 1.0]);
        assert!(prior.log_prob(&point).unwrap().size().is_empty());
    }

    #[test]
    fn test_invalid_scale() {
        assert!(TwoModes::new(2.0, 0.0).is_err());
    }
}
