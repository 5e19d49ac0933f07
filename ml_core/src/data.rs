use ndarray::Array2;

/// A single supervised sample: an input matrix and the output expected for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub input: Array2<f32>,
    pub target: Array2<f32>,
}

impl Example {
    /// Creates a new `Example`.
    ///
    /// # Arguments
    /// * `input` - The model input.
    /// * `target` - The expected model output for `input`.
    pub fn new(input: Array2<f32>, target: Array2<f32>) -> Self {
        Self { input, target }
    }

    /// An empty placeholder, used to preallocate block slots before they are first filled.
    pub fn empty() -> Self {
        Self {
            input: Array2::zeros((0, 0)),
            target: Array2::zeros((0, 0)),
        }
    }
}

impl Default for Example {
    fn default() -> Self {
        Self::empty()
    }
}

/// The fixed-size buffer of examples processed together before one parameter update.
///
/// Slots are overwritten in place on every block, the buffer itself is only reallocated when the
/// batch size changes.
pub type ExampleBlock = Vec<Example>;
