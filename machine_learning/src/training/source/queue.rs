use ml_core::{Example, Progress};
use tokio::sync::mpsc;

use super::ExampleSource;
use crate::{MlErr, Result};

/// Drains examples from a bounded channel fed by one or more producers.
///
/// Ordering: examples are placed in the block in the order they are received, slot `i` gets the
/// `i`-th example received since the block started filling.
///
/// Backpressure: at most `capacity` examples are queued, producers wait (`send().await` or
/// `blocking_send`) until the trainer makes room.
///
/// Filling a block blocks the calling thread until the block is complete, so it must not be
/// driven from inside an async context, use `tokio::task::spawn_blocking` or a plain thread. If
/// every sender is dropped before the block is complete, filling fails with
/// `MlErr::SourceExhausted` and the examples already taken for that block are lost.
#[derive(Debug)]
pub struct QueueSource {
    rx: mpsc::Receiver<Example>,
}

impl QueueSource {
    /// Creates a bounded example channel.
    ///
    /// # Arguments
    /// * `capacity` - The maximum amount of queued examples.
    ///
    /// # Returns
    /// The producing end and the source, or an error if `capacity` is zero.
    pub fn channel(capacity: usize) -> Result<(mpsc::Sender<Example>, Self)> {
        if capacity == 0 {
            return Err(MlErr::InvalidQueueCapacity);
        }

        let (tx, rx) = mpsc::channel(capacity);
        Ok((tx, Self { rx }))
    }
}

impl ExampleSource for QueueSource {
    fn fill_block(&mut self, _: &Progress, block: &mut [Example]) -> Result<()> {
        let expected = block.len();

        for (filled, slot) in block.iter_mut().enumerate() {
            let Some(example) = self.rx.blocking_recv() else {
                return Err(MlErr::SourceExhausted { filled, expected });
            };

            *slot = example;
        }

        Ok(())
    }
}
