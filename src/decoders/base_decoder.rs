use crate::error::{FlowError, Result};
use crate::misc::shape::batch_and_samples;
use tch::nn::Module;
use tch::Tensor;

/// Distribution over an observable `x` conditioned on a latent `z`.
///
/// Latents are laid out as `(batch, num_samples, ...latent_dims)`, the
/// observable as `(batch, ...obs_dims)` and log-densities as
/// `(batch, num_samples)`.
pub trait BaseDecoder {
    /// Parameters of the decoded distribution.
    type Params;

    fn sample(&self, z: &Tensor) -> Result<Self::Params>;

    /// log p(x | z) for every latent sample, `x` shared across samples.
    fn log_prob(&self, x: &Tensor, z: &Tensor) -> Result<Tensor>;
}

/// Runs `net` on `z` with the sample axis folded into the batch axis and
/// unfolds the result back to `(batch, num_samples, ...)`.
pub(crate) fn forward_over_samples(net: &dyn Module, z: &Tensor) -> Result<Tensor> {
    let [batch, samples] = batch_and_samples(z)?;
    let out = net.forward(&z.flatten(0, 1));
    if out.dim() < 1 || out.size()[0] != batch * samples {
        return Err(FlowError::shape(&[batch * samples, -1], &out.size()));
    }
    let mut size = vec![batch, samples];
    size.extend_from_slice(&out.size()[1..]);
    Ok(out.reshape(size.as_slice()))
}

/// Checks that `x` is `(batch, ...obs)` for parameters shaped
/// `(batch, samples, ...obs)`.
pub(crate) fn check_observable(x: &Tensor, params: &Tensor) -> Result<()> {
    let size = params.size();
    let mut expected = vec![size[0]];
    expected.extend_from_slice(&size[2..]);
    if x.dim() < 2 || x.size() != expected {
        return Err(FlowError::shape(&expected, &x.size()));
    }
    Ok(())
}
