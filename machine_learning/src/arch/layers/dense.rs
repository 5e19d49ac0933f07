use ml_core::{LayerGrad, LayerShape, MlError};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;

use crate::{
    Result,
    arch::{ParamInit, activations::ActFn},
};

/// A fully connected layer: `a = act(x · W + b)`, with one example per row of `x`.
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Array2<f32>,
    biases: Array1<f32>,
    act_fn: Option<ActFn>,
}

impl Dense {
    /// Creates a new `Dense` from its parameters.
    ///
    /// # Arguments
    /// * `weights` - A `(inputs, outputs)` matrix.
    /// * `biases` - One bias per output.
    /// * `act_fn` - The activation function, if any.
    ///
    /// # Returns
    /// An error if `biases` does not have one element per column of `weights`.
    pub fn new(
        weights: Array2<f32>,
        biases: Array1<f32>,
        act_fn: Option<ActFn>,
    ) -> std::result::Result<Self, MlError> {
        if weights.ncols() != biases.len() {
            return Err(MlError::ShapeMismatch {
                what: "biases",
                layer: 0,
                got: vec![biases.len()],
                expected: vec![weights.ncols()],
            });
        }

        Ok(Self {
            weights,
            biases,
            act_fn,
        })
    }

    /// Creates a new `Dense` with every parameter set to zero.
    pub fn zeros(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            weights: Array2::zeros(dim),
            biases: Array1::zeros(dim.1),
            act_fn,
        }
    }

    /// Creates a new `Dense` with weights sampled from `init` and zero biases.
    pub fn init<R: Rng>(
        dim: (usize, usize),
        act_fn: Option<ActFn>,
        init: ParamInit,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            weights: init.weights(dim, rng)?,
            biases: Array1::zeros(dim.1),
            act_fn,
        })
    }

    /// Returns the `(inputs, outputs)` dimension of this layer.
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    pub fn shape(&self) -> LayerShape {
        LayerShape {
            weights: self.weights.dim(),
            biases: self.biases.len(),
        }
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    /// Returns the weighted sums and the activations for `x`.
    pub(crate) fn forward(&self, x: ArrayView2<f32>) -> (Array2<f32>, Array2<f32>) {
        let z = x.dot(&self.weights) + &self.biases;

        let a = match &self.act_fn {
            Some(act_fn) => z.mapv(|z| act_fn.f(z)),
            None => z.clone(),
        };

        (z, a)
    }

    /// Back propagates `d`, the loss derivative with respect to this layer's output.
    ///
    /// # Arguments
    /// * `x` - The input this layer was forwarded with.
    /// * `z` - The weighted sums computed on that forward.
    /// * `d` - The loss derivative with respect to the layer's activations.
    ///
    /// # Returns
    /// This layer's gradients and the loss derivative with respect to `x`.
    pub(crate) fn backward(
        &self,
        x: ArrayView2<f32>,
        z: &Array2<f32>,
        mut d: Array2<f32>,
    ) -> (LayerGrad, Array2<f32>) {
        if let Some(act_fn) = &self.act_fn {
            d.zip_mut_with(z, |d, &z| *d *= act_fn.df(z));
        }

        let dw = x.t().dot(&d);
        let db = d.sum_axis(Axis(0));
        let d_prev = d.dot(&self.weights.t());

        (LayerGrad::new(dw, db), d_prev)
    }

    /// Takes a step against `update`.
    pub(crate) fn apply(&mut self, update: &LayerGrad) {
        self.weights -= &update.weights;
        self.biases -= &update.biases;
    }
}
