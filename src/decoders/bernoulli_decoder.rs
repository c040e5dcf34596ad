use super::base_decoder::{check_observable, forward_over_samples, BaseDecoder};
use crate::error::Result;
use crate::misc::log_density::log_sigmoid;
use crate::misc::shape::axes_from;
use tch::nn::Module;
use tch::{Kind, Tensor};

/// Bernoulli decoder with mean `sigmoid(net(z))`.
#[derive(Debug)]
pub struct BernoulliDecoder {
    net: Box<dyn Module>,
}

impl BernoulliDecoder {
    pub fn new(net: impl Module + 'static) -> Self {
        BernoulliDecoder { net: Box::new(net) }
    }
}

impl BaseDecoder for BernoulliDecoder {
    /// Success probabilities, `(batch, num_samples, ...obs_dims)`.
    type Params = Tensor;

    fn sample(&self, z: &Tensor) -> Result<Tensor> {
        Ok(forward_over_samples(self.net.as_ref(), z)?.sigmoid())
    }

    fn log_prob(&self, x: &Tensor, z: &Tensor) -> Result<Tensor> {
        let score = forward_over_samples(self.net.as_ref(), z)?;
        check_observable(x, &score)?;
        let x = x.unsqueeze(1).expand(score.size().as_slice(), false);
        let eltwise = &x * log_sigmoid(&score) + (1.0_f64 - &x) * log_sigmoid(&(-&score));
        let axes = axes_from(2, score.dim());
        Ok(eltwise.sum_dim_intlist(axes.as_slice(), false, Kind::Float))
    }
}
