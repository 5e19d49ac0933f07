use log::warn;
use serde::{Deserialize, Serialize};

use crate::{MlErr, Result};

/// What a single `ErrorTracker` slot holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorGranularity {
    /// One slot per example.
    #[default]
    PerExample,
    /// One slot per block, holding the mean loss of its examples.
    PerBlock,
}

/// The hyperparameters of a `BlockTrainer`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Examples aggregated per parameter update, at least 1.
    pub batch_size: usize,
    /// Fraction of the previous momentum kept on each update, at least 0. Values of 1 or more
    /// are accepted, but the momentum then never decays.
    pub momentum: f32,
    /// Inverse step size applied to each averaged gradient, greater than 0.
    pub accuracy: f32,
    /// Capacity of the running mean error window, at least 1.
    pub error_memory: usize,
    /// Whether per-example gradients are computed in parallel.
    pub parallel: bool,
    pub error_granularity: ErrorGranularity,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            momentum: 0.1,
            accuracy: 10.0,
            error_memory: 10,
            parallel: false,
            error_granularity: ErrorGranularity::PerExample,
        }
    }
}

impl TrainerConfig {
    /// Checks every hyperparameter.
    ///
    /// # Returns
    /// The first invalid hyperparameter as an error.
    pub fn validate(&self) -> Result<()> {
        check_batch_size(self.batch_size)?;
        check_momentum(self.momentum)?;
        check_accuracy(self.accuracy)?;
        check_error_memory(self.error_memory)
    }
}

pub(super) fn check_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(MlErr::InvalidBatchSize { got: batch_size });
    }

    Ok(())
}

pub(super) fn check_momentum(momentum: f32) -> Result<()> {
    if momentum.is_nan() || momentum < 0.0 {
        return Err(MlErr::InvalidMomentum { got: momentum });
    }

    if momentum >= 1.0 {
        warn!(momentum = momentum; "momentum coefficient of 1 or more never decays, updates may grow without bound");
    }

    Ok(())
}

pub(super) fn check_accuracy(accuracy: f32) -> Result<()> {
    if accuracy.is_nan() || accuracy <= 0.0 {
        return Err(MlErr::InvalidAccuracy { got: accuracy });
    }

    Ok(())
}

pub(super) fn check_error_memory(error_memory: usize) -> Result<()> {
    if error_memory == 0 {
        return Err(MlErr::InvalidErrorMemory { got: error_memory });
    }

    Ok(())
}
