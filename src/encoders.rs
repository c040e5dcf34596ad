mod base_encoder;
mod const_diag_gaussian;
mod dirac;
mod nn_diag_gaussian;
mod uniform;

pub use base_encoder::BaseEncoder;
pub use const_diag_gaussian::ConstDiagGaussian;
pub use dirac::Dirac;
pub use nn_diag_gaussian::NNDiagGaussian;
pub use uniform::Uniform;
