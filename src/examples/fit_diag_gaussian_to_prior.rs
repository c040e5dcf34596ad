use flowprim::priors::PriorDistribution;
use flowprim::prob_distributions::{BaseDistribution, DiagGaussian};
use flowprim::Result;
use log::info;
use tch::{nn, nn::OptimizerConfig, Device, Kind};

/// Fits a 2-D diagonal Gaussian to `prior` by minimising the reverse KL
/// E_q[log q(z) - log p(z)], with gradients flowing through the samples.
/// Returns the final loss.
pub fn fit_diag_gaussian_to_prior(
    prior: &dyn PriorDistribution,
    n_steps: usize,
    batch_size: i64,
    lr: f64,
) -> Result<f64> {
    let device: Device = Device::cuda_if_available();
    let vs: nn::VarStore = nn::VarStore::new(device);
    let base = DiagGaussian::new(&vs.root(), 2)?;
    let mut opt: nn::Optimizer = nn::Adam::default().build(&vs, lr)?;

    let mut loss_value = f64::NAN;
    for step in 0..n_steps {
        let (z, log_q) = base.sample(batch_size)?;
        let log_p = prior.log_prob(&z)?;
        let loss = (log_q - log_p).mean(Kind::Float);
        opt.backward_step(&loss);
        loss_value = loss.double_value(&[]);
        if step % 100 == 0 {
            info!("step {}: reverse KL {:.4}", step, loss_value);
        }
    }

    info!(
        "loc = ({:.3}, {:.3}), log_scale = ({:.3}, {:.3})",
        base.loc().double_value(&[0, 0]),
        base.loc().double_value(&[0, 1]),
        base.log_scale().double_value(&[0, 0]),
        base.log_scale().double_value(&[0, 1]),
    );
    Ok(loss_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowprim::priors::Smiley;

    #[test]
    fn test_fit_runs() {
        tch::manual_seed(0);
        let prior = Smiley::new(0.5).unwrap();
        let loss = fit_diag_gaussian_to_prior(&prior, 20, 64, 1e-2).unwrap();
        assert!(loss.is_finite());
    }
}
