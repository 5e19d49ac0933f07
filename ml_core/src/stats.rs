/// Progress counters of a training run.
///
/// `blocks_done` and `examples_done` only ever grow, by exactly `1` and the batch size
/// respectively, once per accepted block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    blocks_done: usize,
    examples_done: u64,
    mean_error: f32,
}

impl Progress {
    /// Creates a new `Progress`.
    ///
    /// # Args
    /// * `blocks_done` - Number of blocks accepted so far.
    /// * `examples_done` - Number of examples accepted so far.
    /// * `mean_error` - The current running mean error.
    pub fn new(blocks_done: usize, examples_done: u64, mean_error: f32) -> Self {
        Self {
            blocks_done,
            examples_done,
            mean_error,
        }
    }

    /// Returns the number of blocks accepted so far.
    pub fn blocks_done(&self) -> usize {
        self.blocks_done
    }

    /// Returns the number of examples accepted so far.
    pub fn examples_done(&self) -> u64 {
        self.examples_done
    }

    /// Returns the running mean error at the time of the snapshot.
    pub fn mean_error(&self) -> f32 {
        self.mean_error
    }

    /// Marks a block of `batch_size` examples as accepted.
    pub fn accept_block(&mut self, batch_size: usize) {
        self.blocks_done += 1;
        self.examples_done += batch_size as u64;
    }

    /// Overwrites the running mean error.
    pub fn set_mean_error(&mut self, mean_error: f32) {
        self.mean_error = mean_error;
    }
}
