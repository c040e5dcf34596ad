//! JSON-backed settings for the 2-D priors.

use crate::error::{FlowError, Result};
use crate::priors::{
    PriorDistribution, Sinusoidal, SinusoidalGap, SinusoidalSplit, Smiley, TwoModes,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One of the analytic priors with its shape constants, e.g.
/// `{"type": "two_modes", "loc": 2.0, "scale": 0.2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriorConfig {
    TwoModes { loc: f64, scale: f64 },
    Sinusoidal { scale: f64, period: f64 },
    SinusoidalGap { scale: f64, period: f64 },
    SinusoidalSplit { scale: f64, period: f64 },
    Smiley { scale: f64 },
}

impl PriorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn build(&self) -> Result<Box<dyn PriorDistribution>> {
        let prior: Box<dyn PriorDistribution> = match *self {
            PriorConfig::TwoModes { loc, scale } => Box::new(TwoModes::new(loc, scale)?),
            PriorConfig::Sinusoidal { scale, period } => Box::new(Sinusoidal::new(scale, period)?),
            PriorConfig::SinusoidalGap { scale, period } => {
                Box::new(SinusoidalGap::new(scale, period)?)
            }
            PriorConfig::SinusoidalSplit { scale, period } => {
                Box::new(SinusoidalSplit::new(scale, period)?)
            }
            PriorConfig::Smiley { scale } => Box::new(Smiley::new(scale)?),
        };
        Ok(prior)
    }
}

/// Placement and sampling settings of an [`ImagePrior`](crate::priors::ImagePrior).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePriorConfig {
    /// Horizontal extent the image is stretched over.
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    /// Added to every pixel so no cell has zero density.
    pub eps: f64,
    /// Upper bound on rejection rounds per `sample` call.
    pub max_rounds: usize,
}

impl Default for ImagePriorConfig {
    fn default() -> Self {
        ImagePriorConfig {
            x_range: [-3.0, 3.0],
            y_range: [-3.0, 3.0],
            eps: 1e-10,
            max_rounds: 10_000,
        }
    }
}

impl ImagePriorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ImagePriorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, range) in [("x_range", self.x_range), ("y_range", self.y_range)] {
            if !range.iter().all(|v| v.is_finite()) || range[1] <= range[0] {
                return Err(FlowError::Config(format!(
                    "{} must be a finite, non-empty interval, got {:?}",
                    name, range
                )));
            }
        }
        if !(self.eps > 0.0) || !self.eps.is_finite() {
            return Err(FlowError::Config(format!(
                "eps must be positive and finite, got {}",
                self.eps
            )));
        }
        if self.max_rounds == 0 {
            return Err(FlowError::Config("max_rounds must be at least 1".into()));
        }
        Ok(())
    }
}
