use std::fmt;

/// Errors produced at the model boundary when inputs are invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A per-layer shape invariant was violated.
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "weights", "biases").
        what: &'static str,
        /// Index of the offending layer.
        layer: usize,
        /// Observed shape.
        got: Vec<usize>,
        /// Expected shape.
        expected: Vec<usize>,
    },

    /// Two gradient sets (or a gradient set and a model) disagree on the number of layers.
    LayerCountMismatch { got: usize, expected: usize },
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch {
                what,
                layer,
                got,
                expected,
            } => {
                write!(
                    f,
                    "shape mismatch for {what} at layer {layer}: got {got:?}, expected {expected:?}"
                )
            }
            MlError::LayerCountMismatch { got, expected } => {
                write!(f, "layer count mismatch: got {got}, expected {expected}")
            }
        }
    }
}

impl std::error::Error for MlError {}
