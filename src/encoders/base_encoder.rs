use crate::error::{FlowError, Result};
use tch::Tensor;

/// Distribution over a latent `z` conditioned on an observable `x`.
///
/// Samples are laid out as `(batch, num_samples, ...latent_dims)` and
/// log-densities as `(batch, num_samples)`.
pub trait BaseEncoder {
    /// Draws `num_samples` latents per batch element of `x` together with
    /// their log-density.
    fn sample(&self, x: Option<&Tensor>, num_samples: i64) -> Result<(Tensor, Tensor)>;

    fn log_prob(&self, z: &Tensor, x: Option<&Tensor>) -> Result<Tensor>;
}

pub(crate) fn require_condition<'a>(x: Option<&'a Tensor>, encoder: &str) -> Result<&'a Tensor> {
    let x = x.ok_or_else(|| {
        FlowError::Precondition(format!("{} needs a conditioning input", encoder))
    })?;
    if x.dim() == 0 {
        return Err(FlowError::Shape {
            expected: vec![-1],
            got: vec![],
        });
    }
    Ok(x)
}

/// `x` of shape `(batch, ...)` copied into `(batch, num_samples, ...)`.
pub(crate) fn replicate_over_samples(x: &Tensor, num_samples: i64) -> Tensor {
    let mut repeats = vec![1i64; x.dim() + 1];
    repeats[1] = num_samples;
    x.unsqueeze(1).repeat(repeats.as_slice())
}
