use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::{MlErr, Result};

/// How a layer's weights are initialised. Biases always start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamInit {
    Const { value: f32 },
    Uniform { low: f32, high: f32 },
    Normal { mean: f32, std_dev: f32 },
    /// Uniform in `[-l, l]` with `l = sqrt(6 / (fan_in + fan_out))`.
    XavierUniform,
}

impl Default for ParamInit {
    fn default() -> Self {
        Self::XavierUniform
    }
}

impl ParamInit {
    /// Samples a weight matrix.
    ///
    /// # Arguments
    /// * `dim` - The `(fan_in, fan_out)` shape of the matrix.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// The weights, or an error if the distribution's parameters are invalid.
    pub fn weights<R: Rng>(&self, dim: (usize, usize), rng: &mut R) -> Result<Array2<f32>> {
        let invalid = |e: &dyn std::fmt::Display| MlErr::InvalidInit(e.to_string());

        let weights = match *self {
            ParamInit::Const { value } => Array2::from_elem(dim, value),
            ParamInit::Uniform { low, high } => {
                let dist = Uniform::new(low, high).map_err(|e| invalid(&e))?;
                Array2::random_using(dim, dist, rng)
            }
            ParamInit::Normal { mean, std_dev } => {
                if std_dev.is_nan() || std_dev < 0.0 {
                    return Err(MlErr::InvalidInit(format!(
                        "standard deviation must be non-negative, got {std_dev}"
                    )));
                }

                let dist = Normal::new(mean, std_dev).map_err(|e| invalid(&e))?;
                Array2::random_using(dim, dist, rng)
            }
            ParamInit::XavierUniform => {
                let limit = (6.0 / (dim.0 + dim.1) as f32).sqrt();
                let dist = Uniform::new_inclusive(-limit, limit).map_err(|e| invalid(&e))?;
                Array2::random_using(dim, dist, rng)
            }
        };

        Ok(weights)
    }
}
