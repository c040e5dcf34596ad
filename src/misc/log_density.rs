//! Closed-form log-density pieces shared by the sampling and evaluation paths.
//!
//! Sampling code evaluates the density from the drawn noise `eps`, evaluation
//! code recovers `eps` from the point. Both end up in
//! [`gaussian_log_prob_from_noise`], so the two paths agree to rounding.

use tch::{Kind, Tensor};

/// ln(2π)
pub const LOG_2PI: f64 = 1.837_877_066_409_345_5;

/// Diagonal Gaussian log-density written in terms of the standardised noise.
///
/// log p = -½·D·ln(2π) - Σ (log σ + ½ ε²)
///
/// * `log_scale` - log standard deviation, broadcastable against `eps`
/// * `eps` - standardised noise
/// * `axes` - axes of one random variable, reduced away
/// * `n_dims` - number of scalar components `D` per random variable
///
pub fn gaussian_log_prob_from_noise(
    log_scale: &Tensor,
    eps: &Tensor,
    axes: &[i64],
    n_dims: i64,
) -> Tensor {
    let eltwise = log_scale + 0.5_f64 * eps.square();
    -0.5 * n_dims as f64 * LOG_2PI - eltwise.sum_dim_intlist(axes, false, Kind::Float)
}

/// Diagonal Gaussian log-density at an arbitrary point.
///
/// log p = -½·D·ln(2π) - Σ (log σ + ½ ((z - μ) / σ)²)
pub fn gaussian_log_prob(
    z: &Tensor,
    loc: &Tensor,
    log_scale: &Tensor,
    axes: &[i64],
    n_dims: i64,
) -> Tensor {
    let eps = (z - loc) / log_scale.exp();
    gaussian_log_prob_from_noise(log_scale, &eps, axes, n_dims)
}

/// log σ(a) = -relu(-a) - log(1 + exp(-|a|)), finite for any finite `a`.
pub fn log_sigmoid(a: &Tensor) -> Tensor {
    -(-a).relu() - (-a.abs()).exp().log1p()
}

/// log(1 + exp(-x)) for non-negative `x`.
pub fn log1p_exp_neg(x: &Tensor) -> Tensor {
    (-x).exp().log1p()
}

/// -½ (‖z‖₄ / (20·scale))⁴ over the last axis, keeps 2-D priors integrable.
pub fn quartic_envelope(z: &Tensor, scale: f64) -> Tensor {
    let norm4 = z
        .pow_tensor_scalar(4.0)
        .sum_dim_intlist([-1i64].as_ref(), false, Kind::Float);
    -0.5 * norm4 / (20.0 * scale).powi(4)
}
