use super::base_encoder::BaseEncoder;
use crate::error::{FlowError, Result};
use crate::misc::log_density::{gaussian_log_prob, gaussian_log_prob_from_noise};
use crate::misc::shape::{check_num_samples, check_trailing_dims};
use tch::{nn, Kind, Tensor};

/// Diagonal Gaussian whose `loc` and `scale` do not depend on `x`.
///
/// `x` only fixes the batch size (1 when absent). `scale` is stored as a
/// standard deviation, so an optimizer must keep it strictly positive;
/// every call re-checks it.
pub struct ConstDiagGaussian {
    d: i64,
    loc: Tensor,
    scale: Tensor,
}

impl ConstDiagGaussian {
    pub fn new(p: &nn::Path, loc: &[f64], scale: &[f64]) -> Result<Self> {
        let d = loc.len() as i64;
        if loc.len() != scale.len() {
            return Err(FlowError::shape(&[d], &[scale.len() as i64]));
        }
        if d == 0 {
            return Err(FlowError::Config("dimension must be positive, got 0".into()));
        }
        if scale.iter().any(|s| !(*s > 0.0) || !s.is_finite()) {
            return Err(FlowError::Numerical(format!(
                "scale must be strictly positive and finite, got {:?}",
                scale
            )));
        }
        let loc = p.var_copy(
            "loc",
            &Tensor::from_slice(loc).view([1, 1, d]).to_kind(Kind::Float),
        );
        let scale = p.var_copy("scale", &Tensor::from_slice(scale).to_kind(Kind::Float));
        Ok(ConstDiagGaussian { d, loc, scale })
    }

    pub fn dim(&self) -> i64 {
        self.d
    }

    pub fn loc(&self) -> &Tensor {
        &self.loc
    }

    pub fn scale(&self) -> &Tensor {
        &self.scale
    }

    fn log_scale(&self) -> Result<Tensor> {
        let min_scale = self.scale.min().double_value(&[]);
        if !(min_scale > 0.0) {
            return Err(FlowError::Numerical(format!(
                "scale must stay strictly positive, smallest entry is {}",
                min_scale
            )));
        }
        Ok(self.scale.log())
    }
}

impl BaseEncoder for ConstDiagGaussian {
    fn sample(&self, x: Option<&Tensor>, num_samples: i64) -> Result<(Tensor, Tensor)> {
        check_num_samples(num_samples)?;
        let batch_size = match x {
            Some(x) if x.dim() == 0 => {
                return Err(FlowError::Shape {
                    expected: vec![-1],
                    got: vec![],
                })
            }
            Some(x) => x.size()[0],
            None => 1,
        };
        let log_scale = self.log_scale()?;
        let eps = Tensor::randn(
            &[batch_size, num_samples, self.d],
            (Kind::Float, self.loc.device()),
        );
        let z = &self.loc + &self.scale * &eps;
        let log_p = gaussian_log_prob_from_noise(&log_scale, &eps, &[2], self.d);
        Ok((z, log_p))
    }

    fn log_prob(&self, z: &Tensor, _x: Option<&Tensor>) -> Result<Tensor> {
        let z = match z.dim() {
            1 => z.unsqueeze(0).unsqueeze(0),
            2 => z.unsqueeze(0),
            _ => z.shallow_clone(),
        };
        check_trailing_dims(&z, &[self.d])?;
        let log_scale = self.log_scale()?;
        Ok(gaussian_log_prob(&z, &self.loc, &log_scale, &[-1], self.d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::misc::log_density::LOG_2PI;
    use tch::Device;

    #[test]
    fn test_log_prob_without_condition() {
        let vs = nn::VarStore::new(Device::Cpu);
        let enc = ConstDiagGaussian::new(&vs.root(), &[1.0], &[2.0]).unwrap();
        let z = Tensor::from_slice(&[1.0f32]);
        let log_p = enc.log_prob(&z, None).unwrap();
        assert_eq!(log_p.size(), vec![1, 1]);
        let expected = -0.5 * LOG_2PI - 2f64.ln();
        assert!((log_p.double_value(&[0, 0]) - expected).abs() < 1e-5);
        assert!((log_p.double_value(&[0, 0]) - (-1.612086)).abs() < 1e-5);
    }

    #[test]
    fn test_sample_without_condition_has_batch_one() {
        let vs = nn::VarStore::new(Device::Cpu);
        let enc = ConstDiagGaussian::new(&vs.root(), &[1.0, 0.0], &[2.0, 0.5]).unwrap();
        let (z, log_p) = enc.sample(None, 4).unwrap();
        assert_eq!(z.size(), vec![1, 4, 2]);
        assert_eq!(log_p.size(), vec![1, 4]);
    }

    #[test]
    fn test_sample_log_prob_consistency() {
        tch::manual_seed(7);
        let vs = nn::VarStore::new(Device::Cpu);
        let enc =
            ConstDiagGaussian::new(&vs.root(), &[1.0, -0.5, 3.0], &[2.0, 0.3, 1.0]).unwrap();
        for batch in [1, 8] {
            for num_samples in [1, 5] {
                let x = Tensor::zeros(&[batch, 10], (Kind::Float, Device::Cpu));
                let (z, log_p) = enc.sample(Some(&x), num_samples).unwrap();
                assert_eq!(z.size(), vec![batch, num_samples, 3]);
                assert_eq!(log_p.size(), vec![batch, num_samples]);
                let log_q = enc.log_prob(&z, Some(&x)).unwrap();
                assert!(log_p.allclose(&log_q, 1e-5, 1e-5, false));
            }
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let vs = nn::VarStore::new(Device::Cpu);
        assert!(matches!(
            ConstDiagGaussian::new(&vs.root(), &[0.0, 0.0], &[1.0]),
            Err(FlowError::Shape { .. })
        ));
        assert!(matches!(
            ConstDiagGaussian::new(&vs.root(), &[0.0], &[0.0]),
            Err(FlowError::Numerical(_))
        ));
        assert!(ConstDiagGaussian::new(&vs.root(), &[0.0], &[-1.0]).is_err());
    }

    #[test]
    fn test_scale_pushed_to_zero_is_reported() {
        let vs = nn::VarStore::new(Device::Cpu);
        let mut enc = ConstDiagGaussian::new(&vs.root(), &[0.0], &[1.0]).unwrap();
        tch::no_grad(|| {
            let _ = enc.scale.fill_(0.0);
        });
        let z = Tensor::zeros(&[1, 1, 1], (Kind::Float, Device::Cpu));
        assert!(matches!(
            enc.log_prob(&z, None),
            Err(FlowError::Numerical(_))
        ));
        assert!(enc.sample(None, 1).is_err());
    }

    #[test]
    fn test_negative_sample_count() {
        let vs = nn::VarStore::new(Device::Cpu);
        let enc = ConstDiagGaussian::new(&vs.root(), &[0.0], &[1.0]).unwrap();
        assert!(matches!(enc.sample(None, -1), Err(FlowError::Config(_))));
        let x = Tensor::zeros(&[2, 3], (Kind::Float, Device::Cpu));
        assert!(matches!(
            enc.sample(Some(&x), -3),
            Err(FlowError::Config(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let vs = nn::VarStore::new(Device::Cpu);
        let enc = ConstDiagGaussian::new(&vs.root(), &[0.0, 0.0], &[1.0, 1.0]).unwrap();
        let z = Tensor::zeros(&[2, 3, 3], (Kind::Float, Device::Cpu));
        assert!(matches!(
            enc.log_prob(&z, None),
            Err(FlowError::Shape { .. })
        ));
    }
}
