use ml_core::GradientSet;

use crate::Result;

/// The momentum accumulator carried across every block of a training run.
///
/// Each update computes, per layer and per parameter kind,
///
/// ```text
/// state = averaged / accuracy + state * momentum
/// ```
///
/// This is not a normalised moving average: `accuracy` is an inverse step size applied to the
/// fresh gradient and `momentum` keeps an unnormalised fraction of the previous state. With
/// `momentum >= 1` nothing decays and the state can grow without bound.
#[derive(Debug, Clone)]
pub struct MomentumState {
    state: GradientSet,
}

impl MomentumState {
    /// Creates a new `MomentumState`.
    ///
    /// # Arguments
    /// * `frame` - The initial state, normally a model's zero-filled gradient frame.
    pub fn new(frame: GradientSet) -> Self {
        Self { state: frame }
    }

    /// Folds a freshly averaged gradient into the state.
    ///
    /// # Arguments
    /// * `averaged` - The block's averaged gradient.
    /// * `accuracy` - Divisor applied to `averaged`, must be greater than zero.
    /// * `momentum` - Fraction of the previous state that is kept.
    ///
    /// # Returns
    /// The new state, which is also the update to apply to the model. An error if `averaged` is
    /// not shaped like the state, in which case the state is left untouched.
    pub fn update(
        &mut self,
        averaged: &GradientSet,
        accuracy: f32,
        momentum: f32,
    ) -> Result<&GradientSet> {
        averaged.check_shape(&self.state)?;

        for (s, g) in self.state.layers_mut().iter_mut().zip(averaged.layers()) {
            s.weights
                .zip_mut_with(&g.weights, |s, &g| *s = g / accuracy + *s * momentum);
            s.biases
                .zip_mut_with(&g.biases, |s, &g| *s = g / accuracy + *s * momentum);
        }

        Ok(&self.state)
    }

    /// Returns the current state.
    pub fn state(&self) -> &GradientSet {
        &self.state
    }

    /// Replaces the state with `frame`, dropping everything accumulated so far.
    pub fn reset(&mut self, frame: GradientSet) {
        self.state = frame;
    }
}

#[cfg(test)]
mod tests {
    use ml_core::{LayerGrad, MlError};
    use ndarray::array;

    use super::*;
    use crate::MlErr;

    fn grad(w: [f32; 2], b: f32) -> GradientSet {
        GradientSet::new(vec![LayerGrad::new(array![[w[0]], [w[1]]], array![b])])
    }

    #[test]
    fn first_update_from_zero_is_scaled_gradient() {
        let mut momentum = MomentumState::new(grad([0., 0.], 0.));
        let state = momentum.update(&grad([4., -8.], 2.), 4.0, 0.9).unwrap();

        assert_eq!(state, &grad([1., -2.], 0.5));
    }

    #[test]
    fn update_combines_fresh_gradient_and_previous_state() {
        let mut momentum = MomentumState::new(grad([1., 2.], 3.));
        let state = momentum.update(&grad([10., 10.], 10.), 10.0, 0.5).unwrap();

        assert_eq!(state, &grad([1.5, 2.0], 2.5));
    }

    #[test]
    fn two_zero_gradient_updates_scale_by_momentum_squared() {
        let initial = grad([2., -4.], 8.);
        let mut momentum = MomentumState::new(initial.clone());
        let zero = initial.zeros_like();

        momentum.update(&zero, 1.0, 0.5).unwrap();
        let state = momentum.update(&zero, 1.0, 0.5).unwrap();

        assert_eq!(state, &grad([0.5, -1.], 2.));
    }

    #[test]
    fn momentum_above_one_grows_without_bound() {
        let mut momentum = MomentumState::new(grad([1., 1.], 1.));
        let zero = grad([0., 0.], 0.);

        for _ in 0..10 {
            momentum.update(&zero, 1.0, 2.0).unwrap();
        }

        assert_eq!(momentum.state().layers()[0].biases[0], 1024.0);
    }

    #[test]
    fn mismatched_update_leaves_state_untouched() {
        let mut momentum = MomentumState::new(grad([1., 1.], 1.));
        let bad = GradientSet::new(vec![LayerGrad::new(array![[1., 1.]], array![1.])]);

        let err = momentum.update(&bad, 1.0, 0.5).unwrap_err();
        assert!(matches!(err, MlErr::Model(MlError::ShapeMismatch { .. })));
        assert_eq!(momentum.state(), &grad([1., 1.], 1.));
    }

    #[test]
    fn reset_drops_accumulated_state() {
        let mut momentum = MomentumState::new(grad([1., 1.], 1.));
        momentum.reset(grad([0., 0.], 0.));

        assert_eq!(momentum.state(), &grad([0., 0.], 0.));
    }
}
