mod base_prior;
mod image_prior;
mod sinusoidal;
mod smiley;
mod two_modes;

pub use base_prior::PriorDistribution;
pub use image_prior::ImagePrior;
pub use sinusoidal::{Sinusoidal, SinusoidalGap, SinusoidalSplit};
pub use smiley::Smiley;
pub use two_modes::TwoModes;
