use ndarray::{Array2, ArrayView2};

/// A loss function measuring the difference between a model's output and the expected one.
pub trait LossFn: Send + Sync {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32;

    /// The derivative of `loss` with respect to `y_pred`.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32>;
}
