use ml_core::GradientSet;

use crate::{MlErr, Result};

/// Averages the per-example gradients of a block.
///
/// Keeps a sum buffer between calls so that aggregating a block of the same shape as the
/// previous one does not allocate.
#[derive(Debug, Default)]
pub struct GradientAccumulator {
    sum: Option<GradientSet>,
}

impl GradientAccumulator {
    /// Returns a new `GradientAccumulator`.
    pub fn new() -> Self {
        Self { sum: None }
    }

    /// Computes the elementwise arithmetic mean of `grads`.
    ///
    /// # Arguments
    /// * `grads` - The per-example gradients of one block, all shaped alike.
    ///
    /// # Returns
    /// The averaged gradient, or an error if `grads` is empty or its shapes disagree.
    pub fn aggregate(&mut self, grads: &[GradientSet]) -> Result<&GradientSet> {
        let Some((first, rest)) = grads.split_first() else {
            return Err(MlErr::EmptyBlock);
        };

        let sum = match self.sum.take() {
            Some(mut sum) if sum.check_shape(first).is_ok() => {
                sum.assign(first)?;
                sum
            }
            _ => first.clone(),
        };
        let sum = self.sum.insert(sum);

        for grad in rest {
            sum.add_assign(grad)?;
        }

        sum.div(grads.len() as f32);
        Ok(&*sum)
    }
}
