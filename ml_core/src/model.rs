use ndarray::ArrayView2;

use crate::{GradientSet, MlError};

/// A trainable model as seen by the training loop.
///
/// A `Model` knows how to compute the gradient of its loss for a single example and how to apply
/// an update to its own parameters. It does not:
/// - fetch examples,
/// - aggregate gradients across a block,
/// - keep any optimizer state.
pub trait Model: Send + Sync {
    /// Returns the number of parameterised layers.
    fn layer_count(&self) -> usize;

    /// Returns a zero-filled `GradientSet` shaped like this model's parameters.
    fn gradient_frame(&self) -> GradientSet;

    /// Computes the loss gradient for one example, along with the scalar loss.
    ///
    /// Must not modify the model's parameters.
    ///
    /// # Errors
    /// Returns `MlError` if `input` or `target` do not fit the model.
    fn compute_gradients(
        &self,
        input: ArrayView2<f32>,
        target: ArrayView2<f32>,
    ) -> Result<(GradientSet, f32), MlError>;

    /// Applies `update` to the model's parameters in place.
    ///
    /// # Errors
    /// Returns `MlError` if `update` is not shaped like the model, in which case no parameter is
    /// modified.
    fn apply_update(&mut self, update: &GradientSet) -> Result<(), MlError>;
}
