use crate::error::Result;
use tch::Tensor;

/// Unconditional distribution at the input end of a flow.
pub trait BaseDistribution {
    /// Draws `num_samples` points and returns them with their log-density,
    /// computed from the same noise that produced them.
    fn sample(&self, num_samples: i64) -> Result<(Tensor, Tensor)>;

    /// Log-density of each point in `z`, reduced over the last axis.
    fn log_prob(&self, z: &Tensor) -> Result<Tensor>;

    fn dim(&self) -> i64;
}
