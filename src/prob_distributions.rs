mod base_distribution;
mod diag_gaussian;

pub use base_distribution::BaseDistribution;
pub use diag_gaussian::DiagGaussian;
