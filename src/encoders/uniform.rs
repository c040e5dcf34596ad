use super::base_encoder::{require_condition, BaseEncoder};
use crate::error::{FlowError, Result};
use crate::misc::shape::{batch_and_samples, check_num_samples};
use tch::{Kind, Tensor};

/// Uniform latent on `[zmin, zmax]` per component, shaped like the
/// conditioning input.
///
/// The log-density is the constant `-ln(zmax - zmin)` and is not set to
/// `-inf` outside the box. A zero-width box would make it `+inf`, so such a
/// range is refused at construction.
#[derive(Debug, Clone, Copy)]
pub struct Uniform {
    zmin: f64,
    zmax: f64,
    log_p: f64,
}

impl Uniform {
    pub fn new(zmin: f64, zmax: f64) -> Result<Self> {
        if !zmin.is_finite() || !zmax.is_finite() {
            return Err(FlowError::Config(format!(
                "uniform bounds must be finite, got [{}, {}]",
                zmin, zmax
            )));
        }
        if zmax <= zmin {
            return Err(FlowError::Config(format!(
                "uniform range must have positive width, got [{}, {}]",
                zmin, zmax
            )));
        }
        Ok(Uniform {
            zmin,
            zmax,
            log_p: -(zmax - zmin).ln(),
        })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.zmin, self.zmax)
    }
}

impl Default for Uniform {
    fn default() -> Self {
        Uniform {
            zmin: 0.0,
            zmax: 1.0,
            log_p: 0.0,
        }
    }
}

impl BaseEncoder for Uniform {
    fn sample(&self, x: Option<&Tensor>, num_samples: i64) -> Result<(Tensor, Tensor)> {
        check_num_samples(num_samples)?;
        let x = require_condition(x, "Uniform")?;
        let mut size = x.size();
        size.insert(1, num_samples);
        let z = Tensor::rand(size.as_slice(), (Kind::Float, x.device())) * (self.zmax - self.zmin)
            + self.zmin;
        let log_p = Tensor::full(
            &[size[0], num_samples],
            self.log_p,
            (Kind::Float, x.device()),
        );
        Ok((z, log_p))
    }

    fn log_prob(&self, z: &Tensor, _x: Option<&Tensor>) -> Result<Tensor> {
        let [batch, samples] = batch_and_samples(z)?;
        Ok(Tensor::full(
            &[batch, samples],
            self.log_p,
            (Kind::Float, z.device()),
        ))
    }
}
