use super::base_distribution::BaseDistribution;
use crate::error::{FlowError, Result};
use crate::misc::log_density::{gaussian_log_prob, gaussian_log_prob_from_noise};
use crate::misc::shape::{check_num_samples, check_trailing_dims};
use tch::{nn, Kind, Tensor};

/// Multivariate Gaussian with diagonal covariance and learnable
/// `loc` / `log_scale`, both shaped `(1, d)`.
pub struct DiagGaussian {
    d: i64,
    loc: Tensor,
    log_scale: Tensor,
}

impl DiagGaussian {
    /// Standard normal in `d` dimensions, parameters registered under `p`.
    pub fn new(p: &nn::Path, d: i64) -> Result<Self> {
        if d <= 0 {
            return Err(FlowError::Config(format!(
                "dimension must be positive, got {}",
                d
            )));
        }
        let loc = p.zeros("loc", &[1, d]);
        let log_scale = p.zeros("log_scale", &[1, d]);
        Ok(DiagGaussian { d, loc, log_scale })
    }

    pub fn from_params(p: &nn::Path, loc: &[f64], log_scale: &[f64]) -> Result<Self> {
        let d = loc.len() as i64;
        if loc.len() != log_scale.len() {
            return Err(FlowError::shape(&[d], &[log_scale.len() as i64]));
        }
        if d == 0 {
            return Err(FlowError::Config("dimension must be positive, got 0".into()));
        }
        if log_scale.iter().any(|v| !v.is_finite()) {
            return Err(FlowError::Numerical(
                "log_scale must be finite so that the scale is strictly positive".into(),
            ));
        }
        let loc = p.var_copy(
            "loc",
            &Tensor::from_slice(loc).view([1, d]).to_kind(Kind::Float),
        );
        let log_scale = p.var_copy(
            "log_scale",
            &Tensor::from_slice(log_scale).view([1, d]).to_kind(Kind::Float),
        );
        Ok(DiagGaussian { d, loc, log_scale })
    }

    pub fn loc(&self) -> &Tensor {
        &self.loc
    }

    pub fn log_scale(&self) -> &Tensor {
        &self.log_scale
    }

    /// Deterministic half of [`BaseDistribution::sample`]: maps standard
    /// normal noise `eps` of shape `(..., d)` to `z = loc + exp(log_scale) ⊙ eps`.
    pub fn reparameterize(&self, eps: &Tensor) -> Result<(Tensor, Tensor)> {
        check_trailing_dims(eps, &[self.d])?;
        let z = &self.loc + self.log_scale.exp() * eps;
        let log_p = gaussian_log_prob_from_noise(&self.log_scale, eps, &[-1], self.d);
        Ok((z, log_p))
    }
}

impl BaseDistribution for DiagGaussian {
    fn sample(&self, num_samples: i64) -> Result<(Tensor, Tensor)> {
        check_num_samples(num_samples)?;
        let eps = Tensor::randn(&[num_samples, self.d], (Kind::Float, self.loc.device()));
        self.reparameterize(&eps)
    }

    fn log_prob(&self, z: &Tensor) -> Result<Tensor> {
        check_trailing_dims(z, &[self.d])?;
        Ok(gaussian_log_prob(
            z,
            &self.loc,
            &self.log_scale,
            &[-1],
            self.d,
        ))
    }

    fn dim(&self) -> i64 {
        self.d
    }
}
