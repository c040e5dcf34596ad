mod misc;

pub mod config;
pub mod decoders;
pub mod encoders;
pub mod error;
pub mod models;
pub mod priors;
pub mod prob_distributions;

pub use error::{FlowError, Result};
