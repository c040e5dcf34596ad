use super::base_prior::{check_positive, coordinates, radius, PriorDistribution};
use crate::error::Result;
use tch::Tensor;

/// Ring of radius 2 intersected with two horizontal bands at `z₁ = 0.4`
/// and `z₁ = -2`, which reads as eyes and a mouth.
#[derive(Debug, Clone, Copy)]
pub struct Smiley {
    scale: f64,
    loc: f64,
}

impl Smiley {
    pub fn new(scale: f64) -> Result<Self> {
        check_positive("scale", scale)?;
        Ok(Smiley { scale, loc: 2.0 })
    }
}

impl PriorDistribution for Smiley {
    fn log_prob(&self, z: &Tensor) -> Result<Tensor> {
        let (_, z1) = coordinates(z)?;
        let ring = (radius(z) - self.loc) / (2.0 * self.scale);
        let bands = ((z1 + 0.8).abs() - 1.2) / (2.0 * self.scale);
        Ok(-0.5 * ring.square() - 0.5 * bands.square())
    }
}
