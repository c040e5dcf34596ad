mod base_decoder;
mod bernoulli_decoder;
mod gaussian_decoder;

pub use base_decoder::BaseDecoder;
pub use bernoulli_decoder::BernoulliDecoder;
pub use gaussian_decoder::GaussianDecoder;
