use super::base_decoder::{check_observable, forward_over_samples, BaseDecoder};
use crate::error::Result;
use crate::misc::log_density::gaussian_log_prob;
use crate::misc::shape::{axes_from, numel, split_channels};
use tch::nn::Module;
use tch::Tensor;

/// Diagonal Gaussian decoder. `net` maps a batch of latents to
/// `(n, 2 * c, ...)`, the first `c` channels being the mean and the rest
/// the log-variance of the observable.
#[derive(Debug)]
pub struct GaussianDecoder {
    net: Box<dyn Module>,
}

impl GaussianDecoder {
    pub fn new(net: impl Module + 'static) -> Self {
        GaussianDecoder { net: Box::new(net) }
    }

    fn mean_and_log_var(&self, z: &Tensor) -> Result<(Tensor, Tensor)> {
        let out = forward_over_samples(self.net.as_ref(), z)?;
        split_channels(&out, 2)
    }
}

impl BaseDecoder for GaussianDecoder {
    /// `(mean, std)`, each `(batch, num_samples, ...obs_dims)`.
    type Params = (Tensor, Tensor);

    fn sample(&self, z: &Tensor) -> Result<(Tensor, Tensor)> {
        let (mean, log_var) = self.mean_and_log_var(z)?;
        Ok((mean, (0.5_f64 * log_var).exp()))
    }

    fn log_prob(&self, x: &Tensor, z: &Tensor) -> Result<Tensor> {
        let (mean, log_var) = self.mean_and_log_var(z)?;
        check_observable(x, &mean)?;
        let axes = axes_from(2, mean.dim());
        Ok(gaussian_log_prob(
            &x.unsqueeze(1),
            &mean,
            &(0.5 * log_var),
            &axes,
            numel(&x.size()[1..]),
        ))
    }
}
