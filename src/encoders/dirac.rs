use super::base_encoder::{replicate_over_samples, require_condition, BaseEncoder};
use crate::error::Result;
use crate::misc::shape::{batch_and_samples, check_num_samples};
use tch::{Kind, Tensor};

/// Point mass at the conditioning input: `z = x` for every sample, with
/// log-density identically zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dirac;

impl Dirac {
    pub fn new() -> Self {
        Dirac
    }
}

impl BaseEncoder for Dirac {
    fn sample(&self, x: Option<&Tensor>, num_samples: i64) -> Result<(Tensor, Tensor)> {
        check_num_samples(num_samples)?;
        let x = require_condition(x, "Dirac")?;
        let z = replicate_over_samples(x, num_samples);
        let log_p = Tensor::zeros(&[x.size()[0], num_samples], (Kind::Float, x.device()));
        Ok((z, log_p))
    }

    fn log_prob(&self, z: &Tensor, _x: Option<&Tensor>) -> Result<Tensor> {
        let [batch, samples] = batch_and_samples(z)?;
        Ok(Tensor::zeros(&[batch, samples], (Kind::Float, z.device())))
    }
}
