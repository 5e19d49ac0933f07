use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use ml_core::MlError;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    InvalidBatchSize {
        got: usize,
    },
    InvalidAccuracy {
        got: f32,
    },
    InvalidMomentum {
        got: f32,
    },
    InvalidErrorMemory {
        got: usize,
    },
    MissingSource,
    DatasetLengthMismatch {
        inputs: usize,
        targets: usize,
    },
    EmptyDataset,
    EmptyBlock,
    SourceExhausted {
        filled: usize,
        expected: usize,
    },
    InvalidDataset(&'static str),
    InvalidQueueCapacity,
    InvalidInit(String),
    Model(MlError),
    Json(serde_json::Error),
    Io(io::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::InvalidBatchSize { got } => {
                write!(f, "The batch size must be at least 1, got {got}")
            }
            MlErr::InvalidAccuracy { got } => {
                write!(f, "The accuracy must be greater than zero, got {got}")
            }
            MlErr::InvalidMomentum { got } => {
                write!(f, "The momentum cannot be lower than zero, got {got}")
            }
            MlErr::InvalidErrorMemory { got } => {
                write!(f, "The error memory length must be at least 1, got {got}")
            }
            MlErr::MissingSource => write!(f, "No example source is bound to the trainer"),
            MlErr::DatasetLengthMismatch { inputs, targets } => write!(
                f,
                "Both inputs and targets must be of the same length, got {inputs} inputs and {targets} targets"
            ),
            MlErr::EmptyDataset => write!(f, "The dataset has no examples"),
            MlErr::EmptyBlock => write!(f, "Tried to aggregate an empty block of gradients"),
            MlErr::SourceExhausted { filled, expected } => write!(
                f,
                "The example source closed after {filled} of the {expected} examples of a block"
            ),
            MlErr::InvalidDataset(msg) => write!(f, "Invalid dataset: {msg}"),
            MlErr::InvalidQueueCapacity => {
                write!(f, "The example queue must be able to hold at least 1 example")
            }
            MlErr::InvalidInit(msg) => write!(f, "Invalid parameter initialisation: {msg}"),
            MlErr::Model(e) => write!(f, "Model error: {e}"),
            MlErr::Json(e) => write!(f, "Invalid json: {e}"),
            MlErr::Io(e) => write!(f, "Io error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Model(e) => Some(e),
            MlErr::Json(e) => Some(e),
            MlErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlError> for MlErr {
    fn from(value: MlError) -> Self {
        Self::Model(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
