use flowprim::priors::PriorDistribution;
use flowprim::Result;
use log::info;
use tch::{Device, Kind, Tensor};

/// Evaluates the unnormalised density of `prior` on an `n x n` grid over
/// `[-half_width, half_width]²` and returns its Riemann-sum mass.
pub fn evaluate_prior_on_grid(
    prior: &dyn PriorDistribution,
    n: i64,
    half_width: f64,
) -> Result<f64> {
    let axis = Tensor::linspace(-half_width, half_width, n, (Kind::Float, Device::Cpu));
    let xx = axis.view([n, 1]).expand([n, n], false);
    let yy = axis.view([1, n]).expand([n, n], false);
    let z = Tensor::stack(&[xx, yy], -1);

    let log_p = tch::no_grad(|| prior.log_prob(&z))?;
    let cell = (2.0 * half_width / (n - 1) as f64).powi(2);
    let mass = log_p.exp().sum(Kind::Float).double_value(&[]) * cell;
    info!(
        "grid {}x{} on [-{w}, {w}]^2: max log p {:.4}, mass {:.4}",
        n,
        n,
        log_p.max().double_value(&[]),
        mass,
        w = half_width
    );
    Ok(mass)
}
