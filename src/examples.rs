mod evaluate_prior_on_grid;
mod fit_diag_gaussian_to_prior;

pub use evaluate_prior_on_grid::evaluate_prior_on_grid;
pub use fit_diag_gaussian_to_prior::fit_diag_gaussian_to_prior;
