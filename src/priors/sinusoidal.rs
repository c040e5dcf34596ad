use super::base_prior::{check_positive, coordinates, PriorDistribution};
use crate::error::Result;
use crate::misc::log_density::{log1p_exp_neg, quartic_envelope};
use std::f64::consts::PI;
use tch::Tensor;

/// w₁(z) = sin(2π z₀ / period)
fn wave(z0: &Tensor, period: f64) -> Tensor {
    (2.0 * PI / period * z0).sin()
}

/// Band along `z₁ = w₁` split into two lobes `bump` apart, with the
/// quartic envelope added.
fn split_band(z: &Tensor, bump: &Tensor, scale: f64, period: f64) -> Result<Tensor> {
    let (z0, z1) = coordinates(z)?;
    let eps = (bump / 2.0).abs();
    let a = (z1 - wave(&z0, period) + bump / 2.0).abs();
    let band = (&a - &eps) / scale;
    let fold = log1p_exp_neg(&(2.0 * &eps * &a / scale.powi(2)));
    Ok(-0.5 * band.square() + fold + quartic_envelope(z, scale))
}

/// Density concentrated along the sine curve `z₁ = sin(2π z₀ / period)`.
#[derive(Debug, Clone, Copy)]
pub struct Sinusoidal {
    scale: f64,
    period: f64,
}

impl Sinusoidal {
    pub fn new(scale: f64, period: f64) -> Result<Self> {
        check_positive("scale", scale)?;
        check_positive("period", period)?;
        Ok(Sinusoidal { scale, period })
    }
}

impl PriorDistribution for Sinusoidal {
    fn log_prob(&self, z: &Tensor) -> Result<Tensor> {
        let (z0, z1) = coordinates(z)?;
        let band = (z1 - wave(&z0, self.period)) / self.scale;
        Ok(-0.5 * band.square() + quartic_envelope(z, self.scale))
    }
}

/// Sine band that opens into two branches around `z₀ = 1`, the gap carved
/// by a Gaussian bump w₂ = 3·exp(-½ ((z₀ - 1) / 0.6)²).
#[derive(Debug, Clone, Copy)]
pub struct SinusoidalGap {
    scale: f64,
    period: f64,
    w2_scale: f64,
    w2_amp: f64,
    w2_mu: f64,
}

impl SinusoidalGap {
    pub fn new(scale: f64, period: f64) -> Result<Self> {
        check_positive("scale", scale)?;
        check_positive("period", period)?;
        Ok(SinusoidalGap {
            scale,
            period,
            w2_scale: 0.6,
            w2_amp: 3.0,
            w2_mu: 1.0,
        })
    }
}

impl PriorDistribution for SinusoidalGap {
    fn log_prob(&self, z: &Tensor) -> Result<Tensor> {
        let (z0, _) = coordinates(z)?;
        let bump = self.w2_amp * (-0.5_f64 * ((z0 - self.w2_mu) / self.w2_scale).square()).exp();
        split_band(z, &bump, self.scale, self.period)
    }
}

/// Sine band that splits for good past `z₀ = 1`, the split driven by a
/// sigmoid step w₃ = 3·σ((z₀ - 1) / 0.3).
#[derive(Debug, Clone, Copy)]
pub struct SinusoidalSplit {
    scale: f64,
    period: f64,
    w3_scale: f64,
    w3_amp: f64,
    w3_mu: f64,
}

impl SinusoidalSplit {
    pub fn new(scale: f64, period: f64) -> Result<Self> {
        check_positive("scale", scale)?;
        check_positive("period", period)?;
        Ok(SinusoidalSplit {
            scale,
            period,
            w3_scale: 0.3,
            w3_amp: 3.0,
            w3_mu: 1.0,
        })
    }
}

impl PriorDistribution for SinusoidalSplit {
    fn log_prob(&self, z: &Tensor) -> Result<Tensor> {
        let (z0, _) = coordinates(z)?;
        let step = self.w3_amp * ((z0 - self.w3_mu) / self.w3_scale).sigmoid();
        split_band(z, &step, self.scale, self.period)
    }
}
