mod cyclic;
mod pull;
mod queue;

pub use cyclic::CyclicSource;
pub use pull::{Extractor, PullSource};
pub use queue::QueueSource;

use ml_core::{Example, Progress};

use crate::Result;

/// Where the examples of a block come from.
///
/// The trainer is written once against this trait, every way of feeding examples (pulling them
/// from a callback, cycling over an in-memory dataset, draining a queue) sits behind it.
pub trait ExampleSource: Send {
    /// Overwrites every slot of `block`, in increasing index order.
    ///
    /// # Arguments
    /// * `progress` - The trainer's counters before this block is accepted.
    /// * `block` - The reused block buffer.
    ///
    /// # Returns
    /// An error if the block could not be completely filled. The trainer discards a partially
    /// filled block.
    fn fill_block(&mut self, progress: &Progress, block: &mut [Example]) -> Result<()>;
}
