use super::base_encoder::{require_condition, BaseEncoder};
use crate::error::{FlowError, Result};
use crate::misc::log_density::{gaussian_log_prob, gaussian_log_prob_from_noise};
use crate::misc::shape::{axes_from, check_num_samples, check_trailing_dims, numel, split_channels};
use tch::nn::Module;
use tch::{Kind, Tensor};

/// Diagonal Gaussian whose mean and log-variance come from a network.
///
/// `net(x)` must return `(batch, 2 * c, ...)`: channels `[0, c)` hold the
/// mean, channels `[c, 2c)` the log-variance (not the log-std). Any trailing
/// spatial axes are part of the latent, and log-densities are reduced over
/// all of them.
#[derive(Debug)]
pub struct NNDiagGaussian {
    net: Box<dyn Module>,
}

impl NNDiagGaussian {
    pub fn new(net: impl Module + 'static) -> Self {
        NNDiagGaussian { net: Box::new(net) }
    }

    /// Mean and log-variance shaped `(batch, 1, c, ...)`.
    fn mean_and_log_var(&self, x: &Tensor) -> Result<(Tensor, Tensor)> {
        let out = self.net.forward(x);
        if out.dim() < 2 || out.size()[0] != x.size()[0] {
            return Err(FlowError::shape(&[x.size()[0], -1], &out.size()));
        }
        let (mean, log_var) = split_channels(&out, 1)?;
        Ok((mean.unsqueeze(1), log_var.unsqueeze(1)))
    }
}

impl BaseEncoder for NNDiagGaussian {
    fn sample(&self, x: Option<&Tensor>, num_samples: i64) -> Result<(Tensor, Tensor)> {
        check_num_samples(num_samples)?;
        let x = require_condition(x, "NNDiagGaussian")?;
        let (mean, log_var) = self.mean_and_log_var(x)?;
        let mut size = mean.size();
        size[1] = num_samples;
        let eps = Tensor::randn(size.as_slice(), (Kind::Float, mean.device()));

        let log_std = 0.5_f64 * log_var;
        let z = &mean + log_std.exp() * &eps;
        let axes = axes_from(2, z.dim());
        let n_dims = numel(&size[2..]);
        let log_p = gaussian_log_prob_from_noise(&log_std, &eps, &axes, n_dims);
        Ok((z, log_p))
    }

    fn log_prob(&self, z: &Tensor, x: Option<&Tensor>) -> Result<Tensor> {
        let x = require_condition(x, "NNDiagGaussian")?;
        let (mean, log_var) = self.mean_and_log_var(x)?;
        let latent = mean.size()[2..].to_vec();

        // (batch, ...latent) is read as a single sample per batch element
        let z = if z.dim() == mean.dim() - 1 {
            z.unsqueeze(1)
        } else {
            z.shallow_clone()
        };
        check_trailing_dims(&z, &latent)?;
        if z.dim() != mean.dim() || z.size()[0] != mean.size()[0] {
            let mut expected = vec![mean.size()[0], -1];
            expected.extend_from_slice(&latent);
            return Err(FlowError::shape(&expected, &z.size()));
        }

        let axes = axes_from(2, z.dim());
        Ok(gaussian_log_prob(
            &z,
            &mean,
            &(0.5 * log_var),
            &axes,
            numel(&latent),
        ))
    }
}
