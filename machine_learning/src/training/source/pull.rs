use ml_core::{Example, Progress};

use super::ExampleSource;
use crate::Result;

type ByExamplesDoneFn = Box<dyn FnMut(usize, u64) -> Example + Send>;
type ByBlockIndexFn = Box<dyn FnMut(usize, usize) -> Example + Send>;

/// A callback producing one example at a time.
pub enum Extractor {
    /// Called with `(blocks_done, examples_done)` as they were before the block started, the same
    /// pair for every slot of the block.
    ByExamplesDone(ByExamplesDoneFn),
    /// Called with `(blocks_done, slot)`, where `slot` is the index within the current block.
    ByBlockIndex(ByBlockIndexFn),
}

impl Extractor {
    pub fn by_examples_done<F>(f: F) -> Self
    where
        F: FnMut(usize, u64) -> Example + Send + 'static,
    {
        Self::ByExamplesDone(Box::new(f))
    }

    pub fn by_block_index<F>(f: F) -> Self
    where
        F: FnMut(usize, usize) -> Example + Send + 'static,
    {
        Self::ByBlockIndex(Box::new(f))
    }
}

/// Pulls every example of a block from an `Extractor`, exactly once per slot.
pub struct PullSource {
    extractor: Extractor,
}

impl PullSource {
    /// Creates a new `PullSource`.
    pub fn new(extractor: Extractor) -> Self {
        Self { extractor }
    }
}

impl From<Extractor> for PullSource {
    fn from(extractor: Extractor) -> Self {
        Self::new(extractor)
    }
}

impl ExampleSource for PullSource {
    fn fill_block(&mut self, progress: &Progress, block: &mut [Example]) -> Result<()> {
        let blocks_done = progress.blocks_done();
        let examples_done = progress.examples_done();

        for (i, slot) in block.iter_mut().enumerate() {
            *slot = match &mut self.extractor {
                Extractor::ByExamplesDone(f) => f(blocks_done, examples_done),
                Extractor::ByBlockIndex(f) => f(blocks_done, i),
            };
        }

        Ok(())
    }
}
