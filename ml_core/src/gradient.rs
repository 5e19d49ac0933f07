use ndarray::{Array1, Array2};

use crate::MlError;

/// The shape of one layer's parameters: a `(inputs, outputs)` weight matrix and an `outputs`
/// long bias vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerShape {
    pub weights: (usize, usize),
    pub biases: usize,
}

/// The weight and bias gradients of a single layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGrad {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

impl LayerGrad {
    /// Creates a new `LayerGrad`.
    pub fn new(weights: Array2<f32>, biases: Array1<f32>) -> Self {
        Self { weights, biases }
    }

    /// Returns a zero-filled `LayerGrad` of the given shape.
    pub fn zeros(shape: LayerShape) -> Self {
        Self {
            weights: Array2::zeros(shape.weights),
            biases: Array1::zeros(shape.biases),
        }
    }

    /// Returns the shape of this layer's gradients.
    pub fn shape(&self) -> LayerShape {
        LayerShape {
            weights: self.weights.dim(),
            biases: self.biases.len(),
        }
    }
}

/// Per-layer weight and bias arrays, shaped exactly like a model's parameters.
///
/// Used both for gradients and for anything that is added onto parameters (momentum, updates).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientSet {
    layers: Vec<LayerGrad>,
}

impl GradientSet {
    /// Creates a new `GradientSet` from its layers.
    pub fn new(layers: Vec<LayerGrad>) -> Self {
        Self { layers }
    }

    /// Returns a zero-filled set for the given per-layer shapes.
    pub fn from_shapes(shapes: &[LayerShape]) -> Self {
        Self {
            layers: shapes.iter().copied().map(LayerGrad::zeros).collect(),
        }
    }

    /// Returns a zero-filled set shaped like `self`.
    pub fn zeros_like(&self) -> Self {
        Self::from_shapes(&self.shapes())
    }

    pub fn layers(&self) -> &[LayerGrad] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [LayerGrad] {
        &mut self.layers
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the per-layer shapes.
    pub fn shapes(&self) -> Vec<LayerShape> {
        self.layers.iter().map(LayerGrad::shape).collect()
    }

    /// Checks that `self` has the same per-layer shapes as `expected`.
    ///
    /// # Errors
    /// `MlError::LayerCountMismatch` if the layer counts differ, otherwise
    /// `MlError::ShapeMismatch` for the first layer whose weights or biases disagree.
    pub fn check_shape(&self, expected: &GradientSet) -> Result<(), MlError> {
        self.check_shapes(&expected.shapes())
    }

    /// Same as `check_shape`, against a list of per-layer shapes.
    pub fn check_shapes(&self, expected: &[LayerShape]) -> Result<(), MlError> {
        if self.len() != expected.len() {
            return Err(MlError::LayerCountMismatch {
                got: self.len(),
                expected: expected.len(),
            });
        }

        for (layer, (got, exp)) in self.layers.iter().zip(expected).enumerate() {
            if got.weights.dim() != exp.weights {
                return Err(MlError::ShapeMismatch {
                    what: "weights",
                    layer,
                    got: got.weights.shape().to_vec(),
                    expected: vec![exp.weights.0, exp.weights.1],
                });
            }

            if got.biases.len() != exp.biases {
                return Err(MlError::ShapeMismatch {
                    what: "biases",
                    layer,
                    got: got.biases.shape().to_vec(),
                    expected: vec![exp.biases],
                });
            }
        }

        Ok(())
    }

    /// Adds `other` elementwise into `self`.
    ///
    /// # Errors
    /// Returns an error if the shapes differ, in which case `self` is left untouched.
    pub fn add_assign(&mut self, other: &GradientSet) -> Result<(), MlError> {
        other.check_shape(self)?;

        for (acc, g) in self.layers.iter_mut().zip(&other.layers) {
            acc.weights += &g.weights;
            acc.biases += &g.biases;
        }

        Ok(())
    }

    /// Copies `other` into `self` without reallocating.
    ///
    /// # Errors
    /// Returns an error if the shapes differ, in which case `self` is left untouched.
    pub fn assign(&mut self, other: &GradientSet) -> Result<(), MlError> {
        other.check_shape(self)?;

        for (dst, src) in self.layers.iter_mut().zip(&other.layers) {
            dst.weights.assign(&src.weights);
            dst.biases.assign(&src.biases);
        }

        Ok(())
    }

    /// Divides every element by `divisor`.
    pub fn div(&mut self, divisor: f32) {
        for layer in &mut self.layers {
            layer.weights /= divisor;
            layer.biases /= divisor;
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array1, Array2};

    use super::*;

    fn set(w: Array2<f32>, b: Array1<f32>) -> GradientSet {
        GradientSet::new(vec![LayerGrad::new(w, b)])
    }

    #[test]
    fn add_assign_sums_elementwise() {
        let mut acc = set(array![[1., 2.]], array![3., 4.]);
        acc.add_assign(&set(array![[10., 20.]], array![30., 40.]))
            .unwrap();

        assert_eq!(acc, set(array![[11., 22.]], array![33., 44.]));
    }

    #[test]
    fn add_assign_rejects_mismatched_weights_without_touching_self() {
        let mut acc = set(array![[1., 2.]], array![3., 4.]);
        let before = acc.clone();
        let err = acc
            .add_assign(&set(array![[1.], [2.]], array![3., 4.]))
            .unwrap_err();

        assert_eq!(
            err,
            MlError::ShapeMismatch {
                what: "weights",
                layer: 0,
                got: vec![2, 1],
                expected: vec![1, 2],
            }
        );
        assert_eq!(acc, before);
    }

    #[test]
    fn check_shape_reports_layer_count_first() {
        let one = set(array![[1.]], array![1.]);
        let two = GradientSet::new(vec![one.layers()[0].clone(), one.layers()[0].clone()]);

        assert_eq!(
            one.check_shape(&two),
            Err(MlError::LayerCountMismatch {
                got: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn zeros_like_keeps_shapes() {
        let grad = set(array![[1., 2.], [3., 4.], [5., 6.]], array![7., 8.]);
        let zeros = grad.zeros_like();

        assert_eq!(zeros.shapes(), grad.shapes());
        assert!(zeros.layers()[0].weights.iter().all(|&x| x == 0.));
        assert_eq!(
            zeros.shapes()[0],
            LayerShape {
                weights: (3, 2),
                biases: 2
            }
        );
    }

    #[test]
    fn div_is_exact_where_the_reciprocal_rounds() {
        let mut grad = set(array![[-21., 14.]], array![-21.]);
        grad.div(7.0);

        assert_eq!(grad, set(array![[-3., 2.]], array![-3.]));
    }
}
