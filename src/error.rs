use thiserror::Error;

/// Errors raised by distributions, encoders, decoders and priors.
///
/// All of them are deterministic contract violations; nothing here is worth
/// retrying.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Trailing dimensions of an input do not match the declared ones.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    Shape { expected: Vec<i64>, got: Vec<i64> },

    /// Invalid construction parameters.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Input data that makes an operation impossible (e.g. empty image).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A scale or variance reached a non-positive value.
    #[error("numerical error: {0}")]
    Numerical(String),

    #[error("rejection sampling exhausted after {rounds} rounds ({accepted}/{requested} accepted)")]
    RejectionExhausted {
        rounds: usize,
        accepted: i64,
        requested: i64,
    },

    #[error(transparent)]
    Torch(#[from] tch::TchError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;

impl FlowError {
    pub(crate) fn shape(expected: &[i64], got: &[i64]) -> Self {
        FlowError::Shape {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}
