use ml_core::{Example, Progress};
use ndarray::Array2;

use super::ExampleSource;
use crate::{MlErr, Result};

/// Walks a pre-supplied dataset, wrapping back to the first example after the last one so that
/// training can go on indefinitely.
///
/// `D` is anything that can be viewed as a slice of matrices, owned (`Vec`) or borrowed.
#[derive(Debug, Clone)]
pub struct CyclicSource<D = Vec<Array2<f32>>> {
    inputs: D,
    targets: D,
    cursor: usize,
    wraps: usize,
}

impl<D: AsRef<[Array2<f32>]>> CyclicSource<D> {
    /// Creates a new `CyclicSource` starting at the first example.
    ///
    /// # Arguments
    /// * `inputs` - The model inputs.
    /// * `targets` - The expected output for each input.
    ///
    /// # Returns
    /// An error if the lengths differ or the dataset is empty.
    pub fn new(inputs: D, targets: D) -> Result<Self> {
        let (n_inputs, n_targets) = (inputs.as_ref().len(), targets.as_ref().len());

        if n_inputs != n_targets {
            return Err(MlErr::DatasetLengthMismatch {
                inputs: n_inputs,
                targets: n_targets,
            });
        }

        if n_inputs == 0 {
            return Err(MlErr::EmptyDataset);
        }

        Ok(Self {
            inputs,
            targets,
            cursor: 0,
            wraps: 0,
        })
    }

    /// Returns the number of examples in the dataset.
    pub fn len(&self) -> usize {
        self.inputs.as_ref().len()
    }

    /// Returns the index of the next example to be read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns how many times the cursor went past the last example.
    pub fn wraps(&self) -> usize {
        self.wraps
    }
}

impl<D> ExampleSource for CyclicSource<D>
where
    D: AsRef<[Array2<f32>]> + Send,
{
    fn fill_block(&mut self, _: &Progress, block: &mut [Example]) -> Result<()> {
        let inputs = self.inputs.as_ref();
        let targets = self.targets.as_ref();

        for slot in block.iter_mut() {
            slot.input.clone_from(&inputs[self.cursor]);
            slot.target.clone_from(&targets[self.cursor]);

            self.cursor += 1;
            if self.cursor >= inputs.len() {
                self.cursor = 0;
                self.wraps += 1;
            }
        }

        Ok(())
    }
}
