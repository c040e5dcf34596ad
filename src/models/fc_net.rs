use tch::nn::init::{FanInOut, NonLinearity, NormalOrUniform};
use tch::nn::{self, Init, Linear, LinearConfig, Module};
use tch::Tensor;

/// Fully connected network acting on the last axis, usable as the vector
/// function of the NN-parametrised encoders and decoders.
///
/// For a Gaussian head set `n_output_channels = 2 * d`: the first half of
/// the output is read as the mean, the second half as the log-variance.
#[derive(Debug)]
pub struct FCNet {
    hidden_layers: Vec<Linear>,
    output_layer: Linear,
    n_input_channels: i64,
    n_output_channels: i64,
}

impl FCNet {
    pub fn new(
        p: &nn::Path,
        n_input_channels: i64,
        n_output_channels: i64,
        n_hidden_layers: usize,
        n_hidden_channels: Option<i64>,
    ) -> Self {
        let mut hidden_layers: Vec<Linear> = Vec::new();
        let n_hidden_channels: i64 = n_hidden_channels.unwrap_or(256);

        let mut n_in = n_input_channels;
        for i in 0..n_hidden_layers {
            hidden_layers.push(nn::linear(
                p / format!("hidden_{}", i),
                n_in,
                n_hidden_channels,
                LinearConfig {
                    ws_init: Init::Kaiming {
                        dist: NormalOrUniform::Normal,
                        fan: FanInOut::FanIn,
                        non_linearity: NonLinearity::ReLU,
                    },
                    bs_init: Some(Init::Const(0.0)),
                    bias: true,
                },
            ));
            n_in = n_hidden_channels;
        }

        // Glorot bound; for a Gaussian head the fan-out covers both halves
        let bound = output_weight_bound(n_in, n_output_channels);
        let output_layer = nn::linear(
            p / "output",
            n_in,
            n_output_channels,
            LinearConfig {
                ws_init: Init::Uniform {
                    lo: -bound,
                    up: bound,
                },
                bs_init: Some(Init::Const(0.0)),
                bias: true,
            },
        );

        FCNet {
            hidden_layers,
            output_layer,
            n_input_channels,
            n_output_channels,
        }
    }

    pub fn n_input_channels(&self) -> i64 {
        self.n_input_channels
    }

    pub fn n_output_channels(&self) -> i64 {
        self.n_output_channels
    }
}

fn output_weight_bound(n_in: i64, n_out: i64) -> f64 {
    (6.0 / (n_in + n_out) as f64).sqrt()
}

impl Module for FCNet {
    fn forward(&self, x: &Tensor) -> Tensor {
        let mut h = x.shallow_clone();
        for layer in &self.hidden_layers {
            h = layer.forward(&h).relu();
        }
        self.output_layer.forward(&h)
    }
}
