use ndarray::{Array2, ArrayView2, Axis, s};

use crate::{MlErr, Result, specs::DatasetSpec};

/// An in-memory dataset of `1 x x_size` inputs paired with `1 x y_size` targets.
///
/// Inputs and targets are kept apart so they can be handed to `BlockTrainer::learn_dataset`
/// as borrowed slices.
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Vec<Array2<f32>>,
    targets: Vec<Array2<f32>>,
}

impl Dataset {
    /// Splits row-major `data` into samples of `x_size` inputs followed by `y_size` targets.
    ///
    /// # Returns
    /// An error if either size is zero, `data` is empty or it does not hold a whole number of
    /// samples.
    pub fn new(data: &[f32], x_size: usize, y_size: usize) -> Result<Self> {
        if x_size == 0 || y_size == 0 {
            return Err(MlErr::InvalidDataset("sample sizes must be positive"));
        }

        let row = x_size + y_size;
        if data.len() % row != 0 {
            return Err(MlErr::InvalidDataset(
                "data length is not a multiple of x_size + y_size",
            ));
        }

        if data.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        let samples = data.len() / row;
        let view = ArrayView2::from_shape((samples, row), data)
            .map_err(|_| MlErr::InvalidDataset("data does not fit its sample layout"))?;

        let (inputs, targets) = view
            .rows()
            .into_iter()
            .map(|sample| {
                let x = sample.slice(s![..x_size]).to_owned();
                let y = sample.slice(s![x_size..]).to_owned();
                (x.insert_axis(Axis(0)), y.insert_axis(Axis(0)))
            })
            .unzip();

        Ok(Self { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[Array2<f32>] {
        &self.inputs
    }

    pub fn targets(&self) -> &[Array2<f32>] {
        &self.targets
    }

    /// Returns both halves of the dataset.
    pub fn split(&self) -> (&[Array2<f32>], &[Array2<f32>]) {
        (&self.inputs, &self.targets)
    }

    /// Takes ownership of the inputs and targets.
    pub fn into_parts(self) -> (Vec<Array2<f32>>, Vec<Array2<f32>>) {
        (self.inputs, self.targets)
    }
}

impl TryFrom<&DatasetSpec> for Dataset {
    type Error = MlErr;

    fn try_from(spec: &DatasetSpec) -> Result<Self> {
        Self::new(&spec.data, spec.x_size, spec.y_size)
    }
}
