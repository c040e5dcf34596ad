use crate::error::{FlowError, Result};
use crate::misc::shape::check_trailing_dims;
use tch::{Kind, Tensor};

/// Unnormalised target density over 2-D points.
///
/// `z` is `(..., 2)`; the result drops the last axis.
pub trait PriorDistribution: std::fmt::Debug {
    fn log_prob(&self, z: &Tensor) -> Result<Tensor>;
}

/// `(z[..., 0], z[..., 1])`
pub(crate) fn coordinates(z: &Tensor) -> Result<(Tensor, Tensor)> {
    check_trailing_dims(z, &[2])?;
    Ok((z.select(-1, 0), z.select(-1, 1)))
}

/// Euclidean norm over the last axis.
pub(crate) fn radius(z: &Tensor) -> Tensor {
    z.square()
        .sum_dim_intlist([-1i64].as_ref(), false, Kind::Float)
        .sqrt()
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(FlowError::Config(format!(
            "{} must be positive and finite, got {}",
            name, value
        )));
    }
    Ok(())
}
