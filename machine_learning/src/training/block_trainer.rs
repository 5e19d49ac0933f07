use std::mem;

use log::{debug, info, warn};
use ml_core::{Example, ExampleBlock, GradientSet, MlError, Model, Progress};
use ndarray::Array2;
use rayon::prelude::*;

use super::{
    ErrorGranularity, ErrorTracker, GradientAccumulator, MomentumState, TrainerConfig,
    config::{check_accuracy, check_batch_size, check_momentum},
    source::{CyclicSource, ExampleSource, Extractor, PullSource},
};
use crate::{MlErr, Result};

type BlockDoneFn = Box<dyn FnMut(usize, f32) + Send>;

/// Trains a `Model` one block of examples at a time, with momentum smoothed updates.
///
/// A block goes through these steps:
/// 1. `batch_size` examples are taken from the example source.
/// 2. The model computes the gradient and loss of every example.
/// 3. The per-example gradients are averaged.
/// 4. The average is folded into the momentum state.
/// 5. The momentum state is applied to the model.
/// 6. The progress counters are bumped, the losses feed the running mean error and the block
///    done callback, if any, is notified.
///
/// Steps 1 to 4 leave the model, the counters and the error window untouched, step 5 is the only
/// one that commits the block. An error anywhere aborts the current block only.
pub struct BlockTrainer<M: Model> {
    model: M,
    config: TrainerConfig,
    source: Option<Box<dyn ExampleSource>>,
    block: ExampleBlock,
    accumulator: GradientAccumulator,
    momentum: MomentumState,
    errors: ErrorTracker,
    progress: Progress,
    on_block_done: Option<BlockDoneFn>,
}

impl<M: Model> BlockTrainer<M> {
    /// Creates a new `BlockTrainer` with no example source bound.
    ///
    /// # Arguments
    /// * `model` - The model to train.
    /// * `config` - The training hyperparameters.
    ///
    /// # Returns
    /// An error if any hyperparameter is invalid.
    pub fn new(model: M, config: TrainerConfig) -> Result<Self> {
        config.validate()?;

        let errors = ErrorTracker::new(config.error_memory)?;
        let momentum = MomentumState::new(model.gradient_frame());
        let progress = Progress::new(0, 0, errors.mean());

        Ok(Self {
            block: vec![Example::empty(); config.batch_size],
            accumulator: GradientAccumulator::new(),
            source: None,
            on_block_done: None,
            model,
            config,
            momentum,
            errors,
            progress,
        })
    }

    /// Binds `source` and returns the trainer.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: ExampleSource + 'static,
    {
        self.set_source(source);
        self
    }

    /// Replaces the example source used by `learn_block` and the protocols built on it.
    pub fn set_source<S>(&mut self, source: S)
    where
        S: ExampleSource + 'static,
    {
        self.source = Some(Box::new(source));
    }

    /// Binds an example extracting callback as the example source.
    pub fn set_extractor(&mut self, extractor: Extractor) {
        self.set_source(PullSource::new(extractor));
    }

    /// Sets a callback notified with `(blocks_done, mean_error)` after every committed block.
    pub fn on_block_done<F>(&mut self, f: F)
    where
        F: FnMut(usize, f32) + Send + 'static,
    {
        self.on_block_done = Some(Box::new(f));
    }

    /// Sets the batch size, reallocating the block buffer if it changes.
    pub fn set_batch_size(&mut self, batch_size: usize) -> Result<()> {
        check_batch_size(batch_size)?;

        if batch_size != self.block.len() {
            self.block = vec![Example::empty(); batch_size];
        }

        self.config.batch_size = batch_size;
        Ok(())
    }

    pub fn set_momentum(&mut self, momentum: f32) -> Result<()> {
        check_momentum(momentum)?;
        self.config.momentum = momentum;
        Ok(())
    }

    pub fn set_accuracy(&mut self, accuracy: f32) -> Result<()> {
        check_accuracy(accuracy)?;
        self.config.accuracy = accuracy;
        Ok(())
    }

    /// Resizes the error window. Every recorded error is lost.
    pub fn set_error_memory(&mut self, error_memory: usize) -> Result<()> {
        if error_memory == self.errors.capacity() {
            self.errors.reset();
        } else {
            self.errors = ErrorTracker::new(error_memory)?;
        }

        self.config.error_memory = error_memory;
        self.progress.set_mean_error(self.errors.mean());
        Ok(())
    }

    /// Binds a new model and reinitialises the momentum state from its gradient frame.
    ///
    /// # Returns
    /// The previously bound model.
    pub fn bind_model(&mut self, model: M) -> M {
        let previous = mem::replace(&mut self.model, model);
        self.reset_momentum();
        previous
    }

    /// Drops the accumulated momentum, reshaping it after the bound model.
    ///
    /// Must be called after changing the model's topology through `model_mut`, until then every
    /// block fails with a shape error and nothing is applied.
    pub fn reset_momentum(&mut self) {
        info!(layers = self.model.layer_count(); "reinitialising momentum state");
        self.momentum.reset(self.model.gradient_frame());
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn blocks_done(&self) -> usize {
        self.progress.blocks_done()
    }

    pub fn examples_done(&self) -> u64 {
        self.progress.examples_done()
    }

    /// Returns the running mean error, see `ErrorTracker` for its warm-up behaviour.
    pub fn mean_error(&self) -> f32 {
        self.progress.mean_error()
    }

    /// Returns the current momentum state, which is also the last update applied to the model.
    pub fn momentum_state(&self) -> &GradientSet {
        self.momentum.state()
    }

    /// Trains on one block from the bound example source.
    ///
    /// # Returns
    /// The running mean error after the block, or an error if no source is bound or the block
    /// failed.
    pub fn learn_block(&mut self) -> Result<f32> {
        let mut source = self.source.take().ok_or(MlErr::MissingSource)?;
        let ret = self.run_block(source.as_mut());
        self.source = Some(source);
        ret
    }

    /// Trains on exactly `count` blocks from the bound example source.
    pub fn learn_blocks(&mut self, count: usize) -> Result<f32> {
        self.ensure_source()?;
        info!(blocks = count; "learning a fixed amount of blocks");

        for _ in 0..count {
            self.learn_block()?;
        }

        Ok(self.mean_error())
    }

    /// Makes one pass over a dataset, that is, `ceil(len / batch_size)` blocks. The last block
    /// wraps around to the first examples when the length is not a multiple of the batch size.
    ///
    /// The bound example source is neither used nor modified.
    ///
    /// # Returns
    /// An error if the lengths differ or the dataset is empty, before any block runs.
    pub fn learn_dataset(&mut self, inputs: &[Array2<f32>], targets: &[Array2<f32>]) -> Result<f32> {
        let mut source = CyclicSource::new(inputs, targets)?;
        let blocks = source.len().div_ceil(self.config.batch_size);
        info!(examples = source.len(), blocks = blocks; "learning a dataset pass");

        for _ in 0..blocks {
            self.run_block(&mut source)?;
        }

        Ok(self.mean_error())
    }

    /// Trains on blocks from the bound example source until the running mean error is at or
    /// below `threshold`.
    ///
    /// There is no iteration cap: if `threshold` is never reached (including a `NaN` loss) this
    /// never returns. Keep the error warm-up in mind, the mean starts far above any sensible
    /// threshold. Use `learn_while` to bound the run.
    pub fn learn_to_error(&mut self, threshold: f32) -> Result<f32> {
        self.ensure_source()?;
        info!(threshold = threshold; "learning until the mean error threshold");

        loop {
            let error = self.learn_block()?;
            if error <= threshold {
                info!(blocks_done = self.blocks_done(), mean_error = error; "mean error threshold reached");
                return Ok(error);
            }
        }
    }

    /// Trains on blocks from the bound example source while `condition` holds. `condition` is
    /// checked before every block.
    pub fn learn_while<F>(&mut self, mut condition: F) -> Result<f32>
    where
        F: FnMut(&Progress) -> bool,
    {
        self.ensure_source()?;

        while condition(&self.progress) {
            self.learn_block()?;
        }

        Ok(self.mean_error())
    }

    /// Cycles over a dataset while `condition` holds, starting at its first example. `condition`
    /// is checked before every block.
    ///
    /// The bound example source is neither used nor modified.
    pub fn learn_dataset_while<F>(
        &mut self,
        inputs: &[Array2<f32>],
        targets: &[Array2<f32>],
        mut condition: F,
    ) -> Result<f32>
    where
        F: FnMut(&Progress) -> bool,
    {
        let mut source = CyclicSource::new(inputs, targets)?;

        while condition(&self.progress) {
            self.run_block(&mut source)?;
        }

        Ok(self.mean_error())
    }

    fn ensure_source(&self) -> Result<()> {
        match self.source {
            Some(_) => Ok(()),
            None => Err(MlErr::MissingSource),
        }
    }

    fn run_block(&mut self, source: &mut dyn ExampleSource) -> Result<f32> {
        source.fill_block(&self.progress, &mut self.block)?;

        let (grads, losses) = per_example(&self.model, &self.block, self.config.parallel)?;
        let averaged = self.accumulator.aggregate(&grads)?;
        let update = self
            .momentum
            .update(averaged, self.config.accuracy, self.config.momentum)?;
        self.model.apply_update(update)?;

        self.progress.accept_block(self.block.len());
        let mean_error = self.record_losses(&losses);

        let blocks_done = self.progress.blocks_done();
        debug!(blocks_done = blocks_done, mean_error = mean_error; "block complete");

        if let Some(notify) = &mut self.on_block_done {
            notify(blocks_done, mean_error);
        }

        Ok(mean_error)
    }

    fn record_losses(&mut self, losses: &[f32]) -> f32 {
        let mean_error = match self.config.error_granularity {
            ErrorGranularity::PerExample => {
                let mut mean = self.errors.mean();
                for &loss in losses {
                    mean = self.errors.record(loss);
                }
                mean
            }
            ErrorGranularity::PerBlock => {
                let block_loss = losses.iter().sum::<f32>() / losses.len() as f32;
                self.errors.record(block_loss)
            }
        };

        if mean_error.is_nan() {
            warn!(blocks_done = self.progress.blocks_done(); "mean error is NaN");
        }

        self.progress.set_mean_error(mean_error);
        mean_error
    }
}

/// Computes every example's gradient and loss, in block order.
///
/// When `parallel` is set the examples are spread over the rayon pool, results are only used once
/// every example of the block is done.
fn per_example<M: Model>(
    model: &M,
    block: &[Example],
    parallel: bool,
) -> Result<(Vec<GradientSet>, Vec<f32>)> {
    let compute = |ex: &Example| model.compute_gradients(ex.input.view(), ex.target.view());

    let results: std::result::Result<Vec<_>, MlError> = if parallel {
        block.par_iter().map(compute).collect()
    } else {
        block.iter().map(compute).collect()
    };

    Ok(results?.into_iter().unzip())
}
