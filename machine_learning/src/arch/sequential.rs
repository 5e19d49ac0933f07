use ml_core::{GradientSet, LayerShape, MlError, Model};
use ndarray::{Array2, ArrayView2};

use super::{
    layers::Dense,
    loss::{LossFn, Mse},
};

type MlResult<T> = std::result::Result<T, MlError>;

/// A sequential model: information flows forward when computing an output and backward when
/// computing the gradients of its layers.
#[derive(Debug, Clone)]
pub struct Sequential<L = Mse> {
    layers: Vec<Dense>,
    loss_fn: L,
}

impl Sequential<Mse> {
    /// Creates a new `Sequential` trained against the mean squared error.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// An error if there are no layers or consecutive layers do not fit.
    pub fn new<I>(layers: I) -> MlResult<Self>
    where
        I: IntoIterator<Item = Dense>,
    {
        Self::with_loss(layers, Mse)
    }
}

impl<L: LossFn> Sequential<L> {
    /// Creates a new `Sequential` trained against `loss_fn`.
    pub fn with_loss<I>(layers: I, loss_fn: L) -> MlResult<Self>
    where
        I: IntoIterator<Item = Dense>,
    {
        let layers: Vec<Dense> = layers.into_iter().collect();

        if layers.is_empty() {
            return Err(MlError::InvalidInput("a sequential model needs at least one layer"));
        }

        for (i, pair) in layers.windows(2).enumerate() {
            let (outputs, inputs) = (pair[0].dim().1, pair[1].dim().0);
            if outputs != inputs {
                return Err(MlError::ShapeMismatch {
                    what: "layer inputs",
                    layer: i + 1,
                    got: vec![inputs],
                    expected: vec![outputs],
                });
            }
        }

        Ok(Self { layers, loss_fn })
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Returns the per-layer parameter shapes.
    pub fn shapes(&self) -> Vec<LayerShape> {
        self.layers.iter().map(Dense::shape).collect()
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `x` - The input data, one example per row.
    ///
    /// # Returns
    /// The prediction for the given input or an error if its width does not fit the model.
    pub fn forward(&self, x: ArrayView2<f32>) -> MlResult<Array2<f32>> {
        self.check_input(x)?;

        let mut a = x.to_owned();
        for layer in &self.layers {
            a = layer.forward(a.view()).1;
        }

        Ok(a)
    }

    /// Returns the loss of the model's prediction for `x` against `y`.
    pub fn loss(&self, x: ArrayView2<f32>, y: ArrayView2<f32>) -> MlResult<f32> {
        self.check_target(x, y)?;
        let y_pred = self.forward(x)?;
        Ok(self.loss_fn.loss(y_pred.view(), y))
    }

    fn check_input(&self, x: ArrayView2<f32>) -> MlResult<()> {
        let inputs = self.layers[0].dim().0;

        if x.ncols() != inputs {
            return Err(MlError::ShapeMismatch {
                what: "input",
                layer: 0,
                got: x.shape().to_vec(),
                expected: vec![x.nrows(), inputs],
            });
        }

        Ok(())
    }

    fn check_target(&self, x: ArrayView2<f32>, y: ArrayView2<f32>) -> MlResult<()> {
        let last = self.layers.len() - 1;
        let expected = (x.nrows(), self.layers[last].dim().1);

        if y.dim() != expected {
            return Err(MlError::ShapeMismatch {
                what: "target",
                layer: last,
                got: y.shape().to_vec(),
                expected: vec![expected.0, expected.1],
            });
        }

        Ok(())
    }
}

impl<L: LossFn> Model for Sequential<L> {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn gradient_frame(&self) -> GradientSet {
        GradientSet::from_shapes(&self.shapes())
    }

    fn compute_gradients(
        &self,
        input: ArrayView2<f32>,
        target: ArrayView2<f32>,
    ) -> MlResult<(GradientSet, f32)> {
        self.check_input(input)?;
        self.check_target(input, target)?;

        // inputs[i] feeds layer i, inputs[nlayers] is the prediction.
        let nlayers = self.layers.len();
        let mut inputs = Vec::with_capacity(nlayers + 1);
        let mut sums = Vec::with_capacity(nlayers);
        inputs.push(input.to_owned());

        for layer in &self.layers {
            let (z, a) = layer.forward(inputs[inputs.len() - 1].view());
            sums.push(z);
            inputs.push(a);
        }

        let y_pred = inputs[nlayers].view();
        let loss = self.loss_fn.loss(y_pred, target);
        let mut d = self.loss_fn.loss_prime(y_pred, target);

        let mut grads = Vec::with_capacity(nlayers);
        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (grad, d_prev) = layer.backward(inputs[i].view(), &sums[i], d);
            grads.push(grad);
            d = d_prev;
        }
        grads.reverse();

        Ok((GradientSet::new(grads), loss))
    }

    fn apply_update(&mut self, update: &GradientSet) -> MlResult<()> {
        update.check_shapes(&self.shapes())?;

        for (layer, grad) in self.layers.iter_mut().zip(update.layers()) {
            layer.apply(grad);
        }

        Ok(())
    }
}
